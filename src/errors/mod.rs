/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 聚合算子的错误类型。
 *                 所有错误都属于“契约违例”：在任何计算开始前就地检查并立即返回，
 *                 不存在可重试的错误，也不会返回部分结果。
 */

use thiserror::Error;

use crate::device::Device;

pub type Result<T> = std::result::Result<T, AggregationError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AggregationError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },

    // 形状相关
    #[error("{arg}必须是{expected}维张量，实际为{got}维：{shape:?}")]
    DimensionMismatch {
        arg: &'static str,
        expected: usize,
        got: usize,
        shape: Vec<usize>,
    },
    #[error("输入与权重的批大小不一致：输入为{input}，权重为{weight}")]
    BatchMismatch { input: usize, weight: usize },
    #[error("输入通道数{input_channels}必须是权重通道数{weight_channels}的整数倍")]
    IndivisibleChannels {
        input_channels: usize,
        weight_channels: usize,
    },
    #[error("权重第3维须等于kernel_h·kernel_w={expected}，实际为{got}")]
    KernelAreaMismatch { expected: usize, got: usize },
    #[error("权重最后一维须等于H_out·W_out={expected}，实际为{got}")]
    WeightSpatialMismatch { expected: usize, got: usize },
    #[error(
        "输出尺寸无效：输入{input_size:?}，填充{padding:?}，膨胀后的核尺寸{effective_kernel:?}"
    )]
    InvalidOutputSize {
        input_size: (usize, usize),
        padding: (usize, usize),
        effective_kernel: (usize, usize),
    },
    #[error("反射填充要求填充量小于对应维度：填充{padding:?}，输入尺寸{input_size:?}")]
    ReflectPaddingTooLarge {
        padding: (usize, usize),
        input_size: (usize, usize),
    },
    #[error("输出梯度的形状须为{expected:?}，实际为{got:?}")]
    GradShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("数据长度{len}与形状{shape:?}不符")]
    DataShapeMismatch { len: usize, shape: Vec<usize> },

    // 设备相关
    #[error("参与运算的张量必须位于同一设备：{first}与{second}")]
    DeviceMismatch { first: Device, second: Device },
    #[error("设备{0}不支持聚合算子所需的并行内核")]
    UnsupportedDevice(Device),

    // 配置
    #[error("配置解析失败：{0}")]
    Config(String),
}

use std::fmt::{self, Display};

/// 比较运算符
#[derive(Debug, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterOrEqual,
    LessOrEqual,
    GreaterThan,
    LessThan,
    Equal,
    NotEqual,
}
impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator_name = match self {
            ComparisonOperator::GreaterOrEqual => "≥",
            ComparisonOperator::LessOrEqual => "≤",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        };
        write!(f, "{}", operator_name)
    }
}
