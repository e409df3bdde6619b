use approx::{assert_abs_diff_eq, assert_abs_diff_ne};

use crate::assert_panic;
use crate::tensor::Tensor;

#[test]
fn test_sum_and_mean() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[1, 1, 2, 3]);
    assert_eq!(tensor.sum(), 21.);
    assert_eq!(tensor.mean(), 3.5);
    assert_eq!(Tensor::<f64>::zeros(&[0, 3]).mean(), 0.);
}

#[test]
fn test_max_abs_diff() {
    let a = Tensor::new(&[1., 2., 3.], &[3]);
    let b = Tensor::new(&[1.5, 2., 1.], &[3]);
    assert_eq!(a.max_abs_diff(&b), 2.);
    assert_eq!(a.max_abs_diff(&a), 0.);
    assert_panic!(a.max_abs_diff(&Tensor::new(&[1., 2., 3.], &[1, 3])));
}

#[test]
fn test_eq_ignores_device_and_grad_flag() {
    let a = Tensor::new(&[1., 2.], &[2]);
    let b = a.clone().requires_grad(true);
    assert_eq!(a, b);
    assert_ne!(a, Tensor::new(&[1., 2.], &[1, 2]));
}

#[test]
fn test_abs_diff_eq() {
    let a = Tensor::new(&[1., 2.], &[2]);
    let b = Tensor::new(&[1. + 1e-10, 2.], &[2]);
    assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    assert_abs_diff_ne!(a, Tensor::new(&[1.1, 2.], &[2]), epsilon = 1e-9);
    // 形状不同则不相等
    assert_abs_diff_ne!(a, Tensor::new(&[1., 2.], &[1, 2]), epsilon = 1.);
}
