/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 聚合算子的超参数配置（核大小、步长、填充、膨胀、填充模式）。
 *                 每个几何参数都是 (h, w) 二元组；传入单个数字时对两个轴广播。
 *                 前向与反向必须使用同一份配置，因此它会被保存在前向上下文中。
 *
 * 输出尺寸计算：
 * H_out = (H + 2*pad_h - (dilation_h*(kernel_h-1)+1)) / stride_h + 1
 * W_out = (W + 2*pad_w - (dilation_w*(kernel_w-1)+1)) / stride_w + 1
 */

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{AggregationError, ComparisonOperator, Result};

/// 邻域越界时的取值方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingMode {
    /// 越界位置视为 0
    Zeros,
    /// 镜像反射（不含边缘本身）：`-x`，或`2*(dim-1)-x`。要求填充量小于对应维度
    #[default]
    Reflect,
}

/// 可转换为 (h, w) 二元组的参数
pub trait IntoPair {
    fn into_pair(self) -> (usize, usize);
}

impl IntoPair for usize {
    fn into_pair(self) -> (usize, usize) {
        (self, self)
    }
}

impl IntoPair for (usize, usize) {
    fn into_pair(self) -> (usize, usize) {
        self
    }
}

impl IntoPair for [usize; 2] {
    fn into_pair(self) -> (usize, usize) {
        (self[0], self[1])
    }
}

/// 聚合算子配置
///
/// # 使用示例
/// ```ignore
/// let config = AggregationConfig::new(5)
///     .with_stride(4)
///     .with_dilation(2)
///     .with_same_padding();
/// assert_eq!(config.padding, (4, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// 核大小 (kernel_h, kernel_w)
    #[serde(deserialize_with = "deserialize_pair")]
    pub kernel_size: (usize, usize),
    /// 步长 (stride_h, stride_w)
    #[serde(deserialize_with = "deserialize_pair")]
    pub stride: (usize, usize),
    /// 填充 (pad_h, pad_w)，允许为 0
    #[serde(deserialize_with = "deserialize_pair")]
    pub padding: (usize, usize),
    /// 膨胀 (dilation_h, dilation_w)
    #[serde(deserialize_with = "deserialize_pair")]
    pub dilation: (usize, usize),
    /// 越界取值方式
    pub padding_mode: PaddingMode,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            kernel_size: (3, 3),
            stride: (1, 1),
            padding: (0, 0),
            dilation: (1, 1),
            padding_mode: PaddingMode::Reflect,
        }
    }
}

impl AggregationConfig {
    /// 以指定核大小创建配置，其余参数取默认值（stride=1, padding=0, dilation=1, 反射填充）
    pub fn new(kernel_size: impl IntoPair) -> Self {
        Self {
            kernel_size: kernel_size.into_pair(),
            ..Self::default()
        }
    }

    pub fn with_stride(mut self, stride: impl IntoPair) -> Self {
        self.stride = stride.into_pair();
        self
    }

    pub fn with_padding(mut self, padding: impl IntoPair) -> Self {
        self.padding = padding.into_pair();
        self
    }

    pub fn with_dilation(mut self, dilation: impl IntoPair) -> Self {
        self.dilation = dilation.into_pair();
        self
    }

    pub fn with_padding_mode(mut self, padding_mode: PaddingMode) -> Self {
        self.padding_mode = padding_mode;
        self
    }

    /// 将填充设为膨胀后核尺寸的一半：`(dilation*(kernel-1)+1)/2`
    pub fn with_same_padding(mut self) -> Self {
        let (eff_h, eff_w) = self.effective_kernel_size();
        self.padding = (eff_h / 2, eff_w / 2);
        self
    }

    /// 膨胀后的核尺寸：`dilation*(kernel-1)+1`
    pub fn effective_kernel_size(&self) -> (usize, usize) {
        let (k_h, k_w) = self.kernel_size;
        let (d_h, d_w) = self.dilation;
        (
            d_h * k_h.saturating_sub(1) + 1,
            d_w * k_w.saturating_sub(1) + 1,
        )
    }

    pub const fn kernel_area(&self) -> usize {
        self.kernel_size.0 * self.kernel_size.1
    }

    /// 计算输出尺寸 (H_out, W_out)；若膨胀后的核大于填充后的输入则返回`None`
    pub fn output_size(&self, input_h: usize, input_w: usize) -> Option<(usize, usize)> {
        let (eff_h, eff_w) = self.effective_kernel_size();
        let padded_h = input_h + 2 * self.padding.0;
        let padded_w = input_w + 2 * self.padding.1;
        if padded_h < eff_h || padded_w < eff_w || self.stride.0 == 0 || self.stride.1 == 0 {
            return None;
        }
        Some((
            (padded_h - eff_h) / self.stride.0 + 1,
            (padded_w - eff_w) / self.stride.1 + 1,
        ))
    }

    /// 检查核大小、步长、膨胀均为正数
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("kernel_h", self.kernel_size.0),
            ("kernel_w", self.kernel_size.1),
            ("stride_h", self.stride.0),
            ("stride_w", self.stride.1),
            ("dilation_h", self.dilation.0),
            ("dilation_w", self.dilation.1),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(AggregationError::ValueMustSatisfyComparison {
                    value_name: name.to_string(),
                    operator: ComparisonOperator::GreaterThan,
                    threshold: 0,
                });
            }
        }
        Ok(())
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓JSON读写↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    /// 从 JSON 字符串解析配置，缺省字段取默认值，并做合法性检查
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AggregationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| AggregationError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| AggregationError::Config(e.to_string()))
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑JSON读写↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}

/// JSON 中既可写单个数字（两轴相同），也可写`[h, w]`
fn deserialize_pair<'de, D>(deserializer: D) -> std::result::Result<(usize, usize), D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PairRepr {
        Scalar(usize),
        Pair(usize, usize),
    }

    Ok(match PairRepr::deserialize(deserializer)? {
        PairRepr::Scalar(v) => v.into_pair(),
        PairRepr::Pair(h, w) => (h, w),
    })
}
