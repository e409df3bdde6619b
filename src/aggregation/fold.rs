/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 反射填充的梯度折叠。
 *                 输入梯度先在“虚拟填充”后的网格上计算，其两侧各 pad 行/列的边距对应前向时
 *                 被反射读取的元素，需要逆序加回有效区域，最后裁剪回原始 (H, W)。
 *
 * 行方向（列方向同理），有效行 h 的梯度来自填充网格中的：
 * - 第 pad + h 行（直接读取）；
 * - 第 pad - h 行，当 1 <= h <= pad（上边距的镜像）；
 * - 第 pad + 2*(H-1) - h 行，当 H-1-pad <= h <= H-2（下边距的镜像）。
 * 即上边距逆序后落在填充网格的 [pad+1, 2*pad+1)，下边距逆序后落在 [H-1, H+pad-1)。
 *
 * 所有函数都只读输入缓冲区、返回新缓冲区，不在原缓冲区上做切片自加。
 */

use ndarray::{Array4, ArrayView4, Axis, s};

use crate::utils::traits::float::Element;

/// 沿 H 轴（第 2 轴）折叠上下边距；`pad`为单侧填充量，`height`为原始高度
pub fn fold_reflected_rows<T: Element>(
    padded: ArrayView4<'_, T>,
    pad: usize,
    height: usize,
) -> Array4<T> {
    fold_axis(padded, Axis(2), pad, height)
}

/// 沿 W 轴（第 3 轴）折叠左右边距；`pad`为单侧填充量，`width`为原始宽度
pub fn fold_reflected_cols<T: Element>(
    padded: ArrayView4<'_, T>,
    pad: usize,
    width: usize,
) -> Array4<T> {
    fold_axis(padded, Axis(3), pad, width)
}

/// 取出有效区域 [pad_h, pad_h+height) × [pad_w, pad_w+width)
pub fn crop_valid<T: Element>(
    padded: ArrayView4<'_, T>,
    pad: (usize, usize),
    size: (usize, usize),
) -> Array4<T> {
    let (pad_h, pad_w) = pad;
    let (height, width) = size;
    padded
        .slice(s![.., .., pad_h..pad_h + height, pad_w..pad_w + width])
        .to_owned()
}

/// “填充缓冲区 → 逐轴折叠 → 裁剪”的完整流程
pub fn fold_reflected_margins<T: Element>(
    padded: ArrayView4<'_, T>,
    pad: (usize, usize),
    size: (usize, usize),
) -> Array4<T> {
    log::trace!(
        "fold reflected margins: padded={:?}, pad={pad:?}, size={size:?}",
        padded.shape()
    );
    let rows_folded = fold_reflected_rows(padded, pad.0, size.0);
    let cols_folded = fold_reflected_cols(rows_folded.view(), pad.1, size.1);
    crop_valid(cols_folded.view(), pad, size)
}

fn fold_axis<T: Element>(
    padded: ArrayView4<'_, T>,
    axis: Axis,
    pad: usize,
    len: usize,
) -> Array4<T> {
    let mut folded = padded.to_owned();
    if pad == 0 {
        return folded;
    }
    debug_assert_eq!(padded.len_of(axis), len + 2 * pad);

    // 上（左）边距：[0, pad) 逆序 → [pad+1, 2*pad+1)
    let mut head = padded.slice_axis(axis, (0..pad).into()).to_owned();
    head.invert_axis(axis);
    let mut target = folded.slice_axis_mut(axis, (pad + 1..2 * pad + 1).into());
    target += &head;

    // 下（右）边距：[len+pad, len+2*pad) 逆序 → [len-1, len+pad-1)
    let mut tail = padded
        .slice_axis(axis, (len + pad..len + 2 * pad).into())
        .to_owned();
    tail.invert_axis(axis);
    let mut target = folded.slice_axis_mut(axis, (len - 1..len + pad - 1).into());
    target += &tail;

    folded
}
