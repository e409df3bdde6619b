/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 邻域聚合算子（SAN 风格的 aggregation）。
 *                 类似卷积，但“卷积核”是调用方逐位置、逐权重组给出的权重张量，
 *                 越界邻域按镜像反射（或零填充）取值。
 *
 * 输入/输出形状：
 * - 输入：[N, C_in, H, W]
 * - 权重：[N, C_w, kernel_h*kernel_w, H_out*W_out]，要求 C_in % C_w == 0
 * - 输出：[N, C_in, H_out, W_out]
 *
 * 计算：Y[n, c, h, w] = Σ_{kh,kw} W[n, c % C_w, kh*kernel_w+kw, h*W_out+w] * X[n, c, h_in', w_in']
 */

pub mod config;
pub mod fold;
pub mod function;
pub mod geometry;
mod kernels;
pub mod reference;

#[cfg(test)]
mod tests;

pub use config::{AggregationConfig, IntoPair, PaddingMode};
pub use function::{
    AggregationContext, AggregationGrads, aggregate, aggregate_with_defaults, aggregation_refpad,
    aggregation_zeropad, forward,
};
pub use geometry::Geometry;
