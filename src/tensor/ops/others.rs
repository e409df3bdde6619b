use approx::AbsDiffEq;

use crate::tensor::Tensor;
use crate::utils::traits::float::Element;

impl<T: Element> PartialEq for Tensor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Element + AbsDiffEq<Epsilon = T>> AbsDiffEq for Tensor<T> {
    type Epsilon = T;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.is_same_shape(other)
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<T: Element> Tensor<T> {
    /// 对张量中的所有元素求和
    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    /// 所有元素的均值；空张量返回0
    pub fn mean(&self) -> T {
        if self.size() == 0 {
            return T::zero();
        }
        self.sum() / T::from_usize(self.size()).unwrap_or_else(T::nan)
    }

    /// 两个同形张量逐元素之差的最大绝对值（用于与参考实现比较）
    pub fn max_abs_diff(&self, other: &Self) -> T {
        assert!(
            self.is_same_shape(other),
            "形状不一致，故无法比较：第一个张量的形状为{:?}，第二个张量的形状为{:?}",
            self.shape(),
            other.shape()
        );
        self.data
            .iter()
            .zip(other.data.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc.max((a - b).abs()))
    }
}
