/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 一次聚合调用所需的全部尺寸（几何信息），以及共享的下标运算。
 *                 三个内核（前向、输入梯度、权重梯度）都通过这里计算扁平偏移量与源坐标，
 *                 保证前向与反向的下标算术完全一致。
 *
 * 张量布局（均为行优先连续）：
 * - 输入 X:  [N, C_in, H, W]
 * - 权重 W:  [N, C_w, kernel_h*kernel_w, H_out*W_out]
 * - 输出 Y:  [N, C_in, H_out, W_out]
 */

use crate::aggregation::config::{AggregationConfig, PaddingMode};
use crate::device::Device;
use crate::errors::{AggregationError, Result};
use crate::tensor::Tensor;
use crate::utils::traits::float::Element;

/// 验证张量为 4 维
#[inline]
fn validate_4d_tensor(shape: &[usize], arg: &'static str) -> Result<()> {
    if shape.len() != 4 {
        return Err(AggregationError::DimensionMismatch {
            arg,
            expected: 4,
            got: shape.len(),
            shape: shape.to_vec(),
        });
    }
    Ok(())
}

/// 验证两个张量位于同一设备
#[inline]
fn validate_same_device(first: Device, second: Device) -> Result<()> {
    if first != second {
        return Err(AggregationError::DeviceMismatch { first, second });
    }
    Ok(())
}

/// 单次折叠的镜像反射：负坐标取绝对值，超出上界则关于`dim-1`对称。
/// 调用方需保证`coord`位于`(-dim, 2*dim-1)`内。
#[inline]
pub fn reflect(coord: isize, dim: usize) -> usize {
    let dim = dim as isize;
    let reflected = if coord < 0 {
        -coord
    } else if coord >= dim {
        2 * (dim - 1) - coord
    } else {
        coord
    };
    debug_assert!((0..dim).contains(&reflected), "反射后坐标{reflected}越界");
    reflected as usize
}

/// 聚合算子的几何信息（已验证）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub batch_size: usize,
    pub input_channels: usize,
    pub weight_channels: usize,
    pub bottom_height: usize,
    pub bottom_width: usize,
    pub top_height: usize,
    pub top_width: usize,
    pub kernel_h: usize,
    pub kernel_w: usize,
    pub stride_h: usize,
    pub stride_w: usize,
    pub pad_h: usize,
    pub pad_w: usize,
    pub dilation_h: usize,
    pub dilation_w: usize,
    pub padding_mode: PaddingMode,
    pub device: Device,
}

impl Geometry {
    /// 根据输入、权重与配置解析几何信息，并按固定顺序检查所有前置条件（首个失败即返回）
    pub fn resolve<T: Element>(
        input: &Tensor<T>,
        weight: &Tensor<T>,
        config: &AggregationConfig,
    ) -> Result<Self> {
        config.validate()?;

        let input_shape = input.shape();
        let weight_shape = weight.shape();
        validate_4d_tensor(input_shape, "input")?;
        validate_4d_tensor(weight_shape, "weight")?;

        validate_same_device(input.device(), weight.device())?;
        input.device().ensure_supported()?;

        let (batch_size, input_channels, bottom_height, bottom_width) = (
            input_shape[0],
            input_shape[1],
            input_shape[2],
            input_shape[3],
        );
        let (weight_batch, weight_channels, weight_kernel_area, weight_top_area) = (
            weight_shape[0],
            weight_shape[1],
            weight_shape[2],
            weight_shape[3],
        );

        if batch_size != weight_batch {
            return Err(AggregationError::BatchMismatch {
                input: batch_size,
                weight: weight_batch,
            });
        }
        if weight_channels == 0 || input_channels % weight_channels != 0 {
            return Err(AggregationError::IndivisibleChannels {
                input_channels,
                weight_channels,
            });
        }
        if weight_kernel_area != config.kernel_area() {
            return Err(AggregationError::KernelAreaMismatch {
                expected: config.kernel_area(),
                got: weight_kernel_area,
            });
        }

        let (top_height, top_width) = config
            .output_size(bottom_height, bottom_width)
            .filter(|&(h, w)| h > 0 && w > 0 && bottom_height > 0 && bottom_width > 0)
            .ok_or(AggregationError::InvalidOutputSize {
                input_size: (bottom_height, bottom_width),
                padding: config.padding,
                effective_kernel: config.effective_kernel_size(),
            })?;
        if weight_top_area != top_height * top_width {
            return Err(AggregationError::WeightSpatialMismatch {
                expected: top_height * top_width,
                got: weight_top_area,
            });
        }

        let (pad_h, pad_w) = config.padding;
        if config.padding_mode == PaddingMode::Reflect
            && (pad_h >= bottom_height || pad_w >= bottom_width)
        {
            return Err(AggregationError::ReflectPaddingTooLarge {
                padding: config.padding,
                input_size: (bottom_height, bottom_width),
            });
        }

        Ok(Self {
            batch_size,
            input_channels,
            weight_channels,
            bottom_height,
            bottom_width,
            top_height,
            top_width,
            kernel_h: config.kernel_size.0,
            kernel_w: config.kernel_size.1,
            stride_h: config.stride.0,
            stride_w: config.stride.1,
            pad_h,
            pad_w,
            dilation_h: config.dilation.0,
            dilation_w: config.dilation.1,
            padding_mode: config.padding_mode,
            device: input.device(),
        })
    }

    /// 检查输出梯度与前向输出同形、同设备
    pub fn check_grad_output<T: Element>(&self, grad_output: &Tensor<T>) -> Result<()> {
        let expected = self.output_shape();
        if grad_output.shape() != expected {
            return Err(AggregationError::GradShapeMismatch {
                expected: expected.to_vec(),
                got: grad_output.shape().to_vec(),
            });
        }
        validate_same_device(self.device, grad_output.device())
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓形状↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub const fn input_shape(&self) -> [usize; 4] {
        [
            self.batch_size,
            self.input_channels,
            self.bottom_height,
            self.bottom_width,
        ]
    }

    pub const fn weight_shape(&self) -> [usize; 4] {
        [
            self.batch_size,
            self.weight_channels,
            self.kernel_area(),
            self.top_area(),
        ]
    }

    pub const fn output_shape(&self) -> [usize; 4] {
        [
            self.batch_size,
            self.input_channels,
            self.top_height,
            self.top_width,
        ]
    }

    /// 输入梯度的中间缓冲区：在 H、W 两侧各虚拟地填充 pad
    pub const fn padded_input_shape(&self) -> [usize; 4] {
        [
            self.batch_size,
            self.input_channels,
            self.padded_height(),
            self.padded_width(),
        ]
    }

    pub const fn padded_height(&self) -> usize {
        self.bottom_height + 2 * self.pad_h
    }

    pub const fn padded_width(&self) -> usize {
        self.bottom_width + 2 * self.pad_w
    }

    pub const fn kernel_area(&self) -> usize {
        self.kernel_h * self.kernel_w
    }

    pub const fn top_area(&self) -> usize {
        self.top_height * self.top_width
    }

    /// 同一权重通道被多少个输入通道共享
    pub const fn group_factor(&self) -> usize {
        self.input_channels / self.weight_channels
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑形状↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓扁平偏移量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    #[inline]
    pub const fn bottom_offset(&self, n: usize, c: usize, h: usize, w: usize) -> usize {
        ((n * self.input_channels + c) * self.bottom_height + h) * self.bottom_width + w
    }

    #[inline]
    pub const fn top_offset(&self, n: usize, c: usize, h: usize, w: usize) -> usize {
        ((n * self.input_channels + c) * self.top_height + h) * self.top_width + w
    }

    /// `c`为权重通道（已对`C_w`取模），`h`、`w`为输出位置
    #[inline]
    pub const fn weight_offset(
        &self,
        n: usize,
        c: usize,
        kh: usize,
        kw: usize,
        h: usize,
        w: usize,
    ) -> usize {
        ((n * self.weight_channels + c) * self.kernel_area() + kh * self.kernel_w + kw)
            * self.top_area()
            + h * self.top_width
            + w
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑扁平偏移量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /// 输出位置`(h, w)`在核偏移`(kh, kw)`处读取的输入坐标。
    /// 反射模式下越界坐标按轴独立反射；零填充模式下越界返回`None`（贡献为 0）。
    #[inline]
    pub fn source_coords(&self, h: usize, w: usize, kh: usize, kw: usize) -> Option<(usize, usize)> {
        let h_in = (h * self.stride_h + kh * self.dilation_h) as isize - self.pad_h as isize;
        let w_in = (w * self.stride_w + kw * self.dilation_w) as isize - self.pad_w as isize;
        let inside = (0..self.bottom_height as isize).contains(&h_in)
            && (0..self.bottom_width as isize).contains(&w_in);

        if inside {
            return Some((h_in as usize, w_in as usize));
        }
        match self.padding_mode {
            PaddingMode::Reflect => Some((
                reflect(h_in, self.bottom_height),
                reflect(w_in, self.bottom_width),
            )),
            PaddingMode::Zeros => None,
        }
    }
}
