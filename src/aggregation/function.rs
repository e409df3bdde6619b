/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 聚合算子的前向/反向入口。
 *
 * 与“在可变上下文对象上挂载保存张量”的做法不同，这里前向直接返回一个不可变的
 * `AggregationContext`，其中借用原始输入与权重并记录配置；反向时显式传入并消耗它，
 * 因此一份上下文只能用于一次反向传播。
 *
 * 数据流：
 * - forward(X, W) → (Y, ctx)
 * - ctx.backward(dY) → (dX?, dW?)，两个梯度互不依赖，并行设备上并发计算；
 *   某操作数不需要梯度时，对应结果为 None（而非全零张量）。
 */

use ndarray::{ArrayView4, IntoDimension};

use crate::aggregation::config::{AggregationConfig, PaddingMode};
use crate::aggregation::fold::{crop_valid, fold_reflected_margins};
use crate::aggregation::geometry::Geometry;
use crate::aggregation::kernels;
use crate::errors::{AggregationError, Result};
use crate::tensor::Tensor;
use crate::utils::traits::float::Element;

/// 前向传播时保存的上下文：原始输入、权重（只读借用）与配置
#[derive(Debug)]
pub struct AggregationContext<'a, T: Element = f64> {
    input: &'a Tensor<T>,
    weight: &'a Tensor<T>,
    config: AggregationConfig,
    geometry: Geometry,
}

/// 反向传播的结果；不需要梯度的操作数对应`None`
#[derive(Debug, Clone)]
pub struct AggregationGrads<T: Element = f64> {
    pub input: Option<Tensor<T>>,
    pub weight: Option<Tensor<T>>,
}

/// 前向传播，返回输出与供反向使用的上下文
pub fn forward<'a, T: Element>(
    input: &'a Tensor<T>,
    weight: &'a Tensor<T>,
    config: &AggregationConfig,
) -> Result<(Tensor<T>, AggregationContext<'a, T>)> {
    let geometry = Geometry::resolve(input, weight, config)?;
    let output_shape = geometry.output_shape();
    let len = output_shape.iter().product::<usize>();
    log::debug!(
        "aggregation forward: input={:?}, weight={:?}, output={:?}, mode={:?}, device={}",
        input.shape(),
        weight.shape(),
        output_shape,
        geometry.padding_mode,
        geometry.device
    );

    let bottom = input.contiguous_data();
    let weight_data = weight.contiguous_data();
    let values = geometry.device.launch(len, |index| {
        kernels::forward(&geometry, &bottom, &weight_data, index)
    })?;
    let output = Tensor::from_vec_on(values, &output_shape, geometry.device)?
        .requires_grad(input.is_requires_grad() || weight.is_requires_grad());

    let context = AggregationContext {
        input,
        weight,
        config: *config,
        geometry,
    };
    Ok((output, context))
}

/// 只做前向计算
pub fn aggregate<T: Element>(
    input: &Tensor<T>,
    weight: &Tensor<T>,
    config: &AggregationConfig,
) -> Result<Tensor<T>> {
    forward(input, weight, config).map(|(output, _)| output)
}

/// 使用默认配置（kernel=3, stride=1, padding=0, dilation=1, 反射填充）
pub fn aggregate_with_defaults<T: Element>(
    input: &Tensor<T>,
    weight: &Tensor<T>,
) -> Result<Tensor<T>> {
    aggregate(input, weight, &AggregationConfig::default())
}

/// 反射填充版本（忽略`config`中的填充模式）
pub fn aggregation_refpad<T: Element>(
    input: &Tensor<T>,
    weight: &Tensor<T>,
    config: &AggregationConfig,
) -> Result<Tensor<T>> {
    aggregate(input, weight, &config.with_padding_mode(PaddingMode::Reflect))
}

/// 零填充版本（忽略`config`中的填充模式）
pub fn aggregation_zeropad<T: Element>(
    input: &Tensor<T>,
    weight: &Tensor<T>,
    config: &AggregationConfig,
) -> Result<Tensor<T>> {
    aggregate(input, weight, &config.with_padding_mode(PaddingMode::Zeros))
}

impl<'a, T: Element> AggregationContext<'a, T> {
    pub const fn config(&self) -> &AggregationConfig {
        &self.config
    }

    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub const fn needs_input_grad(&self) -> bool {
        self.input.is_requires_grad()
    }

    pub const fn needs_weight_grad(&self) -> bool {
        self.weight.is_requires_grad()
    }

    /// 反向传播：只为需要梯度的操作数计算梯度，并消耗上下文
    pub fn backward(self, grad_output: &Tensor<T>) -> Result<AggregationGrads<T>> {
        self.geometry.check_grad_output(grad_output)?;
        let top_diff = grad_output.contiguous_data();
        let top_diff: &[T] = &top_diff;

        let (input, weight) = self.geometry.device.join(
            || {
                self.needs_input_grad()
                    .then(|| self.input_grad_from(top_diff))
                    .transpose()
            },
            || {
                self.needs_weight_grad()
                    .then(|| self.weight_grad_from(top_diff))
                    .transpose()
            },
        );
        Ok(AggregationGrads {
            input: input?,
            weight: weight?,
        })
    }

    /// 单独计算输入梯度（不检查`requires_grad`）
    pub fn backward_input(&self, grad_output: &Tensor<T>) -> Result<Tensor<T>> {
        self.geometry.check_grad_output(grad_output)?;
        self.input_grad_from(&grad_output.contiguous_data())
    }

    /// 单独计算权重梯度（不检查`requires_grad`）
    pub fn backward_weight(&self, grad_output: &Tensor<T>) -> Result<Tensor<T>> {
        self.geometry.check_grad_output(grad_output)?;
        self.weight_grad_from(&grad_output.contiguous_data())
    }

    fn input_grad_from(&self, top_diff: &[T]) -> Result<Tensor<T>> {
        let g = &self.geometry;
        let padded_shape = g.padded_input_shape();
        let len = padded_shape.iter().product::<usize>();
        log::debug!(
            "aggregation input backward: padded={:?}, input={:?}, device={}",
            padded_shape,
            g.input_shape(),
            g.device
        );

        let weight_data = self.weight.contiguous_data();
        let scratch = g.device.launch(len, |index| {
            kernels::input_backward(g, top_diff, &weight_data, index)
        })?;
        let scratch = ArrayView4::from_shape(padded_shape.into_dimension(), &scratch).map_err(
            |_| AggregationError::DataShapeMismatch {
                len,
                shape: padded_shape.to_vec(),
            },
        )?;

        let pad = (g.pad_h, g.pad_w);
        let size = (g.bottom_height, g.bottom_width);
        let grad_input = match g.padding_mode {
            PaddingMode::Reflect => fold_reflected_margins(scratch, pad, size),
            PaddingMode::Zeros => crop_valid(scratch, pad, size),
        };
        Ok(Tensor::from_array(grad_input.into_dyn()).to_device(g.device))
    }

    fn weight_grad_from(&self, top_diff: &[T]) -> Result<Tensor<T>> {
        let g = &self.geometry;
        let weight_shape = g.weight_shape();
        let len = weight_shape.iter().product::<usize>();
        log::debug!(
            "aggregation weight backward: weight={:?}, group_factor={}, device={}",
            weight_shape,
            g.group_factor(),
            g.device
        );

        let bottom = self.input.contiguous_data();
        let values = g.device.launch(len, |index| {
            kernels::weight_backward(g, top_diff, &bottom, index)
        })?;
        Tensor::from_vec_on(values, &weight_shape, g.device)
    }
}
