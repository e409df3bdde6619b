//! # San Aggregation
//!
//! `san_aggregation`用纯rust实现自注意力网络（SAN）中的邻域聚合算子：
//! 对输入特征图的每个输出位置，取其（带步长、膨胀的）邻域，按调用方给出的逐位置、逐权重组的权重加权求和；
//! 越界的邻域坐标按镜像反射取值。同时提供对输入与权重的完整反向传播。
//!
//! ```ignore
//! use san_aggregation::{AggregationConfig, Tensor, forward};
//!
//! let config = AggregationConfig::new(3).with_padding(1);
//! let x = Tensor::<f64>::new_normal(0., 1., &[2, 8, 5, 5]).requires_grad(true);
//! let w = Tensor::<f64>::new_normal(0., 1., &[2, 4, 9, 25]).requires_grad(true);
//! let (y, ctx) = forward(&x, &w, &config)?;
//! let grads = ctx.backward(&Tensor::ones(y.shape()))?;
//! ```

pub mod aggregation;
pub mod device;
pub mod errors;
pub mod tensor;
pub mod utils;

pub use aggregation::{
    AggregationConfig, AggregationContext, AggregationGrads, PaddingMode, aggregate,
    aggregate_with_defaults, aggregation_refpad, aggregation_zeropad, forward,
};
pub use device::Device;
pub use errors::{AggregationError, Result};
pub use tensor::Tensor;
pub use utils::traits::float::Element;
