use ndarray::{Array, IxDyn};

use crate::assert_err;
use crate::device::Device;
use crate::errors::AggregationError;
use crate::tensor::Tensor;

#[test]
fn test_new_scalar() {
    let tensor = Tensor::new(&[1.], &[]);
    assert_eq!(tensor.shape(), &[] as &[usize]);
    assert_eq!(
        tensor.data,
        Array::from_shape_vec(IxDyn(&[]), vec![1.]).unwrap()
    );

    let tensor = Tensor::new(&[1.], &[1, 1, 1, 1]);
    assert_eq!(tensor.shape(), &[1, 1, 1, 1]);
    assert_eq!(tensor.size(), 1);
}

#[test]
fn test_new_4d() {
    let data = (0..24).map(f64::from).collect::<Vec<_>>();
    let tensor = Tensor::new(&data, &[1, 2, 3, 4]);
    assert_eq!(tensor.shape(), &[1, 2, 3, 4]);
    assert_eq!(tensor.dimension(), 4);
    assert_eq!(tensor.size(), 24);
    assert_eq!(tensor[[0, 1, 2, 3]], 23.);
    // 默认设备为多核 CPU，且不需要梯度
    assert_eq!(tensor.device(), Device::CpuParallel);
    assert!(!tensor.is_requires_grad());
}

#[test]
#[should_panic]
fn test_new_invalid_shape() {
    let _ = Tensor::new(&[1., 2.], &[1, 1, 1]);
}

#[test]
fn test_try_new() {
    assert!(Tensor::try_new(&[1., 2., 3., 4.], &[2, 2]).is_ok());
    assert_err!(
        Tensor::try_new(&[1., 2., 3.], &[2, 2]),
        AggregationError::DataShapeMismatch { len: 3, shape } if shape == &vec![2, 2]
    );
}

#[test]
fn test_from_vec_on() {
    let tensor = Tensor::from_vec_on(vec![1., 2.], &[1, 2], Device::Cpu).unwrap();
    assert_eq!(tensor.device(), Device::Cpu);
    assert_eq!(tensor, Tensor::new(&[1., 2.], &[1, 2]));
    assert_err!(
        Tensor::<f64>::from_vec_on(vec![1.], &[1, 2], Device::Cpu),
        AggregationError::DataShapeMismatch { len: 1, .. }
    );
}

#[test]
fn test_zeros_and_ones() {
    let zeros = Tensor::<f32>::zeros(&[2, 3]);
    assert_eq!(zeros.shape(), &[2, 3]);
    assert!(zeros.data().iter().all(|&x| x == 0.));

    let ones = Tensor::<f64>::ones(&[1, 1, 2, 2]);
    assert_eq!(ones.sum(), 4.);
}

#[test]
fn test_new_random() {
    let tensor = Tensor::new_random(-1., 1., &[3, 4, 5]);
    assert_eq!(tensor.shape(), &[3, 4, 5]);
    assert!(tensor.data().iter().all(|&x| (-1. ..=1.).contains(&x)));

    let a = Tensor::new_random_seeded(0., 10., &[16], 7);
    let b = Tensor::new_random_seeded(0., 10., &[16], 7);
    let c = Tensor::new_random_seeded(0., 10., &[16], 8);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

/// 正态分布的样本均值与标准差应接近设定值
#[test]
fn test_new_normal() {
    let tensor = Tensor::<f64>::new_normal_seeded(2., 3., &[100, 100], 1);
    let mean = tensor.mean();
    let variance = tensor.data().mapv(|x| (x - mean).powi(2)).sum() / tensor.size() as f64;
    assert!((mean - 2.).abs() < 0.1, "均值{mean}偏离过大");
    assert!((variance.sqrt() - 3.).abs() < 0.1, "标准差{}偏离过大", variance.sqrt());

    // 奇数长度也能填满
    assert_eq!(Tensor::new_normal(0., 1., &[3, 3]).size(), 9);
    assert_eq!(
        Tensor::new_normal_seeded(0., 1., &[5], 3),
        Tensor::new_normal_seeded(0., 1., &[5], 3)
    );
}
