use std::fmt::Write;

use crate::tensor::Tensor;

#[test]
fn test_print_matrix() {
    let tensor = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let mut buffer = String::new();
    write!(&mut buffer, "{}", tensor).unwrap();
    assert_eq!(
        buffer,
        "[[  1.0000,   2.0000,   3.0000], \n [  4.0000,   5.0000,   6.0000]]\n形状: [2, 3]\n"
    );
}

#[test]
fn test_print_high_rank() {
    let tensor = Tensor::<f64>::zeros(&[1, 2, 3, 3]);
    let printed = tensor.to_string();
    assert!(printed.contains("[1, 2, 3, 3]"));
    assert!(printed.contains("cpu(parallel)"));

    // 只有一个元素的高阶张量照常打印
    let scalar_like = Tensor::new(&[7.], &[1, 1, 1, 1]);
    assert_eq!(scalar_like.to_string(), "[[[[  7.0000]]]]\n形状: [1, 1, 1, 1]\n");
}
