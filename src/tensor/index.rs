use std::ops::{Index, IndexMut};

use super::Tensor;
use crate::utils::traits::float::Element;

// 引用式索引：`tensor[[n, c, h, w]]`
impl<T: Element, const N: usize> Index<[usize; N]> for Tensor<T> {
    type Output = T;

    fn index(&self, index: [usize; N]) -> &Self::Output {
        assert!(
            N == self.dimension(),
            "索引维数{}与张量维数{}不一致",
            N,
            self.dimension()
        );
        &self.data[&index[..]]
    }
}

impl<T: Element, const N: usize> IndexMut<[usize; N]> for Tensor<T> {
    fn index_mut(&mut self, index: [usize; N]) -> &mut Self::Output {
        assert!(
            N == self.dimension(),
            "索引维数{}与张量维数{}不一致",
            N,
            self.dimension()
        );
        &mut self.data[&index[..]]
    }
}
