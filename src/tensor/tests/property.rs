use std::borrow::Cow;

use crate::device::Device;
use crate::tensor::Tensor;

#[test]
fn test_is_same_shape() {
    let a = Tensor::new(&[1., 2., 3., 4.], &[1, 4]);
    let b = Tensor::new(&[5., 6., 7., 8.], &[1, 4]);
    let c = Tensor::new(&[1., 2., 3., 4.], &[4]);
    assert!(a.is_same_shape(&b));
    assert!(!a.is_same_shape(&c));
}

#[test]
fn test_device_and_requires_grad_builders() {
    let tensor = Tensor::new(&[1., 2.], &[2])
        .to_device(Device::Cpu)
        .requires_grad(true);
    assert_eq!(tensor.device(), Device::Cpu);
    assert!(tensor.is_requires_grad());

    let tensor = tensor.requires_grad(false).to_device(Device::Cuda(0));
    assert_eq!(tensor.device(), Device::Cuda(0));
    assert!(!tensor.is_requires_grad());
}

/// 连续张量直接借用；非连续张量拷贝出行优先数据，原张量不变
#[test]
fn test_contiguous_data() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    assert!(tensor.is_contiguous());
    assert!(matches!(tensor.contiguous_data(), Cow::Borrowed(_)));

    let mut transposed = tensor.clone().into_array();
    transposed.swap_axes(0, 1);
    let transposed = Tensor::from_array(transposed);
    assert!(!transposed.is_contiguous());
    let data = transposed.contiguous_data();
    assert!(matches!(data, Cow::Owned(_)));
    assert_eq!(&*data, &[1., 4., 2., 5., 3., 6.]);
    assert_eq!(transposed.shape(), &[3, 2]);
    assert_eq!(transposed[[2, 1]], 6.);
}

#[test]
fn test_view_and_into_array() {
    let tensor = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    assert_eq!(tensor.view().sum(), 10.);
    let array = tensor.clone().into_array();
    assert_eq!(&array, tensor.data());
}
