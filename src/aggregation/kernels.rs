/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 聚合算子的三个内核。
 *                 每个内核都是“给定扁平输出下标，算出该槽位的值”的纯函数：
 *                 只读共享输入，不写任何共享状态，因此可由`Device::launch`任意并行。
 *                 几何参数在运行时传入（而非为每组参数生成并编译内核源码）。
 */

use num_integer::Integer;

use crate::aggregation::geometry::Geometry;
use crate::utils::traits::float::Element;

/// 前向：`index`遍历输出 Y[N, C_in, H_out, W_out]
#[inline]
pub(crate) fn forward<T: Element>(g: &Geometry, bottom: &[T], weight: &[T], index: usize) -> T {
    let n = index / g.input_channels / g.top_height / g.top_width;
    let c = (index / g.top_height / g.top_width) % g.input_channels;
    let h = (index / g.top_width) % g.top_height;
    let w = index % g.top_width;

    let mut value = T::zero();
    for kh in 0..g.kernel_h {
        for kw in 0..g.kernel_w {
            if let Some((h_in, w_in)) = g.source_coords(h, w, kh, kw) {
                // 同一权重组内的所有通道共享这一权重
                let offset_weight = g.weight_offset(n, c % g.weight_channels, kh, kw, h, w);
                value += weight[offset_weight] * bottom[g.bottom_offset(n, c, h_in, w_in)];
            }
        }
    }
    value
}

/// 输入梯度：`index`遍历虚拟填充后的输入 [N, C_in, H+2*pad_h, W+2*pad_w]。
/// 对每个核偏移反解出（若存在）读取过该坐标的输出位置，累加`权重 * 输出梯度`。
#[inline]
pub(crate) fn input_backward<T: Element>(
    g: &Geometry,
    top_diff: &[T],
    weight: &[T],
    index: usize,
) -> T {
    let padded_h = g.padded_height();
    let padded_w = g.padded_width();
    let n = index / g.input_channels / padded_h / padded_w;
    let c = (index / padded_h / padded_w) % g.input_channels;
    let h = (index / padded_w) % padded_h;
    let w = index % padded_w;

    let stride_h = g.stride_h as isize;
    let stride_w = g.stride_w as isize;
    let mut value = T::zero();
    for kh in 0..g.kernel_h {
        for kw in 0..g.kernel_w {
            let h_out_s = h as isize - (kh * g.dilation_h) as isize;
            let w_out_s = w as isize - (kw * g.dilation_w) as isize;
            let (h_out, h_rem) = h_out_s.div_rem(&stride_h);
            let (w_out, w_rem) = w_out_s.div_rem(&stride_w);
            if h_rem != 0 || w_rem != 0 {
                continue;
            }
            if !(0..g.top_height as isize).contains(&h_out)
                || !(0..g.top_width as isize).contains(&w_out)
            {
                continue;
            }
            let (h_out, w_out) = (h_out as usize, w_out as usize);
            let offset_top = g.top_offset(n, c, h_out, w_out);
            let offset_weight = g.weight_offset(n, c % g.weight_channels, kh, kw, h_out, w_out);
            value += weight[offset_weight] * top_diff[offset_top];
        }
    }
    value
}

/// 权重梯度：`index`遍历 dW[N, C_w, kernel_h*kernel_w, H_out*W_out]。
/// 对权重组内的所有输入通道`cc = c, c+C_w, ...`求和，每个目标元素只被写一次。
#[inline]
pub(crate) fn weight_backward<T: Element>(
    g: &Geometry,
    top_diff: &[T],
    bottom: &[T],
    index: usize,
) -> T {
    let top_area = g.top_area();
    let kernel_area = g.kernel_area();
    let n = index / g.weight_channels / kernel_area / top_area;
    let c = (index / kernel_area / top_area) % g.weight_channels;
    let k = (index / top_area) % kernel_area;
    let (kh, kw) = (k / g.kernel_w, k % g.kernel_w);
    let l = index % top_area;
    let (h, w) = (l / g.top_width, l % g.top_width);

    let Some((h_in, w_in)) = g.source_coords(h, w, kh, kw) else {
        return T::zero();
    };
    let mut value = T::zero();
    for cc in (c..g.input_channels).step_by(g.weight_channels) {
        value += bottom[g.bottom_offset(n, cc, h_in, w_in)] * top_diff[g.top_offset(n, cc, h, w)];
    }
    value
}
