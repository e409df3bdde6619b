/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 聚合算子单元测试
 *
 * 测试策略：
 * 1. 配置与前置条件检查（形状、设备、参数）
 * 2. 手算的字面量用例（反射/零填充边界、分组共享权重）
 * 3. 与 unfold 参考实现逐元素比较（前向、反向，f64 下误差 1e-9）
 * 4. 中心差分数值梯度校验
 * 5. 随机配置的性质测试（proptest）
 */

mod device;

use crate::aggregation::AggregationConfig;
use crate::tensor::Tensor;

/// 按配置生成一对随机（正态分布）输入与权重，形状自动推导
fn random_operands(
    batch_size: usize,
    input_channels: usize,
    weight_channels: usize,
    input_size: (usize, usize),
    config: &AggregationConfig,
    seed: u64,
) -> (Tensor, Tensor) {
    let (h, w) = input_size;
    let (out_h, out_w) = config
        .output_size(h, w)
        .expect("测试配置的输出尺寸应有效");
    let input = Tensor::new_normal_seeded(0., 1., &[batch_size, input_channels, h, w], seed);
    let weight = Tensor::new_normal_seeded(
        0.,
        1.,
        &[batch_size, weight_channels, config.kernel_area(), out_h * out_w],
        seed.wrapping_add(1),
    );
    (input, weight)
}

/// 标量损失`mean(Y)`对 Y 的梯度
fn mean_grad(shape: &[usize]) -> Tensor {
    let len = shape.iter().product::<usize>();
    Tensor::new(&vec![1. / len as f64; len], shape)
}

/// 3x3 输入 1..=9
fn literal_3x3() -> Tensor {
    Tensor::new(&[1., 2., 3., 4., 5., 6., 7., 8., 9.], &[1, 1, 3, 3])
}

/// 5x5 输入 1..=25
fn literal_5x5() -> Tensor {
    let data = (1..=25).map(f64::from).collect::<Vec<_>>();
    Tensor::new(&data, &[1, 1, 5, 5])
}

/// 论文/原始自测用的配置：kernel=5, stride=4, dilation=2, padding=(2*4+1)/2=4
fn san_test_config() -> AggregationConfig {
    AggregationConfig::new(5)
        .with_stride(4)
        .with_dilation(2)
        .with_same_padding()
}
