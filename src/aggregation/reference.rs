/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 参考实现（用于校验）。
 *                 按“先整体填充 → unfold（im2col）取出每个输出位置的邻域 → 与权重逐元素相乘后沿核轴求和”
 *                 的方式重新表述聚合算子，与内核实现完全独立；
 *                 反向则是该表述的伴随（col2im 散射 + 填充的伴随），外加中心差分数值梯度。
 */

use ndarray::{Array, Array4, ArrayView4, Ix4};

use crate::aggregation::config::{AggregationConfig, PaddingMode};
use crate::aggregation::geometry::{Geometry, reflect};
use crate::errors::{AggregationError, Result};
use crate::tensor::Tensor;
use crate::utils::traits::float::Element;

/// 反射填充（不含边缘本身），要求`pad < dim`
///
/// ```text
/// [[1, 2, 3],        [[5, 4, 5, 6, 5],
///  [4, 5, 6],   →     [2, 1, 2, 3, 2],
///  [7, 8, 9]]         [5, 4, 5, 6, 5],
///                     [8, 7, 8, 9, 8],
///                     [5, 4, 5, 6, 5]]
/// ```
pub fn reflection_pad2d<T: Element>(input: ArrayView4<'_, T>, padding: (usize, usize)) -> Array4<T> {
    let (n, c, h, w) = input.dim();
    let (pad_h, pad_w) = padding;
    Array4::from_shape_fn((n, c, h + 2 * pad_h, w + 2 * pad_w), |(ni, ci, i, j)| {
        let src_h = reflect(i as isize - pad_h as isize, h);
        let src_w = reflect(j as isize - pad_w as isize, w);
        input[[ni, ci, src_h, src_w]]
    })
}

/// 零填充
pub fn zero_pad2d<T: Element>(input: ArrayView4<'_, T>, padding: (usize, usize)) -> Array4<T> {
    let (n, c, h, w) = input.dim();
    let (pad_h, pad_w) = padding;
    let mut padded = Array4::zeros((n, c, h + 2 * pad_h, w + 2 * pad_w));
    padded
        .slice_mut(ndarray::s![.., .., pad_h..pad_h + h, pad_w..pad_w + w])
        .assign(&input);
    padded
}

/// 把已填充的输入展开为 [N, C, kernel_h*kernel_w, H_out*W_out]
pub fn unfold<T: Element>(
    padded: ArrayView4<'_, T>,
    config: &AggregationConfig,
    output_size: (usize, usize),
) -> Array4<T> {
    let (n, c, _, _) = padded.dim();
    let (k_h, k_w) = config.kernel_size;
    let (s_h, s_w) = config.stride;
    let (d_h, d_w) = config.dilation;
    let (out_h, out_w) = output_size;
    Array4::from_shape_fn((n, c, k_h * k_w, out_h * out_w), |(ni, ci, k, l)| {
        let (kh, kw) = (k / k_w, k % k_w);
        let (oh, ow) = (l / out_w, l % out_w);
        padded[[ni, ci, oh * s_h + kh * d_h, ow * s_w + kw * d_w]]
    })
}

/// 参考前向：`Y[n, c, l] = Σ_k W[n, c % C_w, k, l] * unfold(pad(X))[n, c, k, l]`
pub fn aggregate_reference<T: Element>(
    input: &Tensor<T>,
    weight: &Tensor<T>,
    config: &AggregationConfig,
) -> Result<Tensor<T>> {
    let geometry = Geometry::resolve(input, weight, config)?;
    let x = as_array4(input)?;
    let w = as_array4(weight)?;
    let columns = unfold(pad(x.view(), config).view(), config, output_size(&geometry));

    let [n, c, out_h, out_w] = geometry.output_shape();
    let output = Array4::from_shape_fn((n, c, out_h, out_w), |(ni, ci, oh, ow)| {
        let l = oh * out_w + ow;
        (0..geometry.kernel_area()).fold(T::zero(), |acc, k| {
            acc + w[[ni, ci % geometry.weight_channels, k, l]] * columns[[ni, ci, k, l]]
        })
    });
    Ok(Tensor::from_array(output.into_dyn()).to_device(input.device()))
}

/// 参考反向：返回 (dX, dW)
pub fn aggregate_reference_backward<T: Element>(
    input: &Tensor<T>,
    weight: &Tensor<T>,
    grad_output: &Tensor<T>,
    config: &AggregationConfig,
) -> Result<(Tensor<T>, Tensor<T>)> {
    let geometry = Geometry::resolve(input, weight, config)?;
    geometry.check_grad_output(grad_output)?;
    let x = as_array4(input)?;
    let w = as_array4(weight)?;
    let dy = as_array4(grad_output)?;
    let columns = unfold(pad(x.view(), config).view(), config, output_size(&geometry));

    let (n, c, k_area, top_area) = columns.dim();
    let c_w = geometry.weight_channels;
    let out_w = geometry.top_width;
    let dy_at = |ni: usize, ci: usize, l: usize| dy[[ni, ci, l / out_w, l % out_w]];

    // dW：对共享同一权重通道的所有输入通道求和
    let grad_weight = Array4::from_shape_fn((n, c_w, k_area, top_area), |(ni, cw, k, l)| {
        (cw..c)
            .step_by(c_w)
            .fold(T::zero(), |acc, ci| acc + columns[[ni, ci, k, l]] * dy_at(ni, ci, l))
    });

    // col2im：把每列的梯度散射回填充后的坐标
    let mut grad_padded = Array4::<T>::zeros((
        n,
        c,
        geometry.padded_height(),
        geometry.padded_width(),
    ));
    for ((ni, ci, k, l), _) in columns.indexed_iter() {
        let (kh, kw) = (k / geometry.kernel_w, k % geometry.kernel_w);
        let (oh, ow) = (l / out_w, l % out_w);
        let row = oh * geometry.stride_h + kh * geometry.dilation_h;
        let col = ow * geometry.stride_w + kw * geometry.dilation_w;
        grad_padded[[ni, ci, row, col]] += w[[ni, ci % c_w, k, l]] * dy_at(ni, ci, l);
    }

    // 填充的伴随：每个填充坐标把梯度加回它所读取的原始坐标
    let (h, w_len) = (geometry.bottom_height, geometry.bottom_width);
    let (pad_h, pad_w) = (geometry.pad_h, geometry.pad_w);
    let mut grad_input = Array4::<T>::zeros((n, c, h, w_len));
    for ((ni, ci, i, j), &g) in grad_padded.indexed_iter() {
        let src_h = i as isize - pad_h as isize;
        let src_w = j as isize - pad_w as isize;
        let target = match config.padding_mode {
            PaddingMode::Reflect => Some((reflect(src_h, h), reflect(src_w, w_len))),
            PaddingMode::Zeros => ((0..h as isize).contains(&src_h)
                && (0..w_len as isize).contains(&src_w))
            .then_some((src_h as usize, src_w as usize)),
        };
        if let Some((ti, tj)) = target {
            grad_input[[ni, ci, ti, tj]] += g;
        }
    }

    Ok((
        Tensor::from_array(grad_input.into_dyn()).to_device(input.device()),
        Tensor::from_array(grad_weight.into_dyn()).to_device(weight.device()),
    ))
}

/// 中心差分数值梯度：`∂loss/∂point ≈ (loss(p+ε) - loss(p-ε)) / 2ε`
pub fn numerical_gradient<T, F>(loss: F, point: &Tensor<T>, eps: T) -> Result<Tensor<T>>
where
    T: Element,
    F: Fn(&Tensor<T>) -> Result<T>,
{
    let base = point.data().clone();
    let two = T::one() + T::one();
    let mut grad = Array::zeros(base.raw_dim());
    for (index, slot) in grad.indexed_iter_mut() {
        let mut plus = base.clone();
        plus[index.clone()] += eps;
        let mut minus = base.clone();
        minus[index] -= eps;

        let loss_plus = loss(&Tensor::from_array(plus).to_device(point.device()))?;
        let loss_minus = loss(&Tensor::from_array(minus).to_device(point.device()))?;
        *slot = (loss_plus - loss_minus) / (two * eps);
    }
    Ok(Tensor::from_array(grad).to_device(point.device()))
}

fn pad<T: Element>(input: ArrayView4<'_, T>, config: &AggregationConfig) -> Array4<T> {
    match config.padding_mode {
        PaddingMode::Reflect => reflection_pad2d(input, config.padding),
        PaddingMode::Zeros => zero_pad2d(input, config.padding),
    }
}

const fn output_size(geometry: &Geometry) -> (usize, usize) {
    (geometry.top_height, geometry.top_width)
}

fn as_array4<T: Element>(tensor: &Tensor<T>) -> Result<Array4<T>> {
    let shape = tensor.shape().to_vec();
    tensor
        .data()
        .clone()
        .into_dimensionality::<Ix4>()
        .map_err(|_| AggregationError::DimensionMismatch {
            arg: "tensor",
            expected: 4,
            got: shape.len(),
            shape,
        })
}
