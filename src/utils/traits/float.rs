use std::fmt::{Debug, Display};

use ndarray::ScalarOperand;
use num_traits::{Float, FromPrimitive, NumAssign};

/// 张量元素（标量）类型的约束。
/// 目前仅为`f32`和`f64`实现；梯度校验等需要高精度的场合请使用`f64`。
pub trait Element:
    Float + NumAssign + FromPrimitive + ScalarOperand + Send + Sync + Debug + Display + 'static
{
}

impl Element for f32 {}
impl Element for f64 {}
