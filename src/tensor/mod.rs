use ndarray::{Array, IxDyn};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::device::Device;
use crate::errors::{AggregationError, Result};
use crate::utils::traits::float::Element;

mod index;
mod print;
mod property;

mod ops {
    pub mod others;
}

#[cfg(test)]
mod tests;

/// 定义张量的结构体。聚合算子只处理4维张量（`[N, C, H, W]`这类布局），
/// 但张量本身可以是任意阶。
/// 除数据外，张量还记录其所在的计算设备，以及调用方声明的“是否需要梯度”标记。
#[derive(Debug, Clone)]
pub struct Tensor<T: Element = f64> {
    data: Array<T, IxDyn>,
    device: Device,
    requires_grad: bool,
}

impl<T: Element> Tensor<T> {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]...；
    /// 若为更高维度的数组，`shape`可以是[n,c,h,w,...]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[T], shape: &[usize]) -> Self {
        match Self::try_new(data, shape) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{e}"),
        }
    }

    /// 同`new`，但长度与形状不符时返回错误而非panic
    pub fn try_new(data: &[T], shape: &[usize]) -> Result<Self> {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).map_err(|_| {
            AggregationError::DataShapeMismatch {
                len: data.len(),
                shape: shape.to_vec(),
            }
        })?;
        Ok(Self::from_array(data))
    }

    /// 由`ndarray`数组直接构造（默认设备，不需要梯度）
    pub fn from_array(data: Array<T, IxDyn>) -> Self {
        Self {
            data,
            device: Device::default(),
            requires_grad: false,
        }
    }

    /// 由按行优先排布的数据构造，并放置在指定设备上（内核输出使用）
    pub(crate) fn from_vec_on(data: Vec<T>, shape: &[usize], device: Device) -> Result<Self> {
        let len = data.len();
        let data = Array::from_shape_vec(IxDyn(shape), data).map_err(|_| {
            AggregationError::DataShapeMismatch {
                len,
                shape: shape.to_vec(),
            }
        })?;
        Ok(Self::from_array(data).to_device(device))
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::from_array(Array::zeros(IxDyn(shape)))
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::from_array(Array::ones(IxDyn(shape)))
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间
    pub fn new_random(min: T, max: T, shape: &[usize]) -> Self {
        Self::random_with(&mut rand::thread_rng(), min, max, shape)
    }

    /// 同`new_random`，但使用固定种子，便于复现
    pub fn new_random_seeded(min: T, max: T, shape: &[usize], seed: u64) -> Self {
        Self::random_with(&mut StdRng::seed_from_u64(seed), min, max, shape)
    }

    /// 创建一个服从正态分布的随机张量
    pub fn new_normal(mean: T, std_dev: T, shape: &[usize]) -> Self {
        Self::normal_with(&mut rand::thread_rng(), mean, std_dev, shape)
    }

    /// 同`new_normal`，但使用固定种子，便于复现
    pub fn new_normal_seeded(mean: T, std_dev: T, shape: &[usize], seed: u64) -> Self {
        Self::normal_with(&mut StdRng::seed_from_u64(seed), mean, std_dev, shape)
    }
}

// 私有方法
impl<T: Element> Tensor<T> {
    fn random_with<R: Rng>(rng: &mut R, min: T, max: T, shape: &[usize]) -> Self {
        let (min, max) = (to_f64(min), to_f64(max));
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| from_f64(uniform.sample(rng)))
            .collect::<Vec<T>>();
        Self::new(&data, shape)
    }

    // Box-Muller 变换
    fn normal_with<R: Rng>(rng: &mut R, mean: T, std_dev: T, shape: &[usize]) -> Self {
        let (mean, std_dev) = (to_f64(mean), to_f64(std_dev));
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f64 = rng.r#gen();
            let u2: f64 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f64::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(from_f64(z0));
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(from_f64(z1));
            }
        }

        Self::new(&data, shape)
    }
}

fn to_f64<T: Element>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn from_f64<T: Element>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}
