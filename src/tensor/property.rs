/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @Description  : 本类仅包含一些属性方法（以及设备/梯度标记的构建器），不包含任何运算方法
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12 16:20:05
 */

use std::borrow::Cow;

use ndarray::{Array, ArrayViewD, IxDyn};

use super::Tensor;
use crate::device::Device;
use crate::utils::traits::float::Element;

impl<T: Element> Tensor<T> {
    pub fn view(&self) -> ArrayViewD<'_, T> {
        self.data.view()
    }

    pub fn data(&self) -> &Array<T, IxDyn> {
        &self.data
    }

    pub fn into_array(self) -> Array<T, IxDyn> {
        self.data
    }

    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[n,c,h,w,...]。
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓设备与梯度标记↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub const fn device(&self) -> Device {
        self.device
    }

    /// 将张量（逻辑上）放置到指定设备
    pub fn to_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub const fn is_requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// 声明该张量在反向传播时是否需要梯度
    pub fn requires_grad(mut self, requires_grad: bool) -> Self {
        self.requires_grad = requires_grad;
        self
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑设备与梯度标记↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /// 数据是否按行优先（C 风格）连续排布
    pub fn is_contiguous(&self) -> bool {
        self.data.is_standard_layout()
    }

    /// 获取按行优先排布的数据。
    /// 若本身已连续则直接借用，否则拷贝出一份连续数据，调用方的张量不会被修改。
    pub fn contiguous_data(&self) -> Cow<'_, [T]> {
        match self.data.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.data.iter().copied().collect()),
        }
    }
}
