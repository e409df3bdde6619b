/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 计算设备与并行启动。
 *                 每个内核都是“按输出下标独立计算”的纯函数，这里把它们分发到具体设备上：
 *                 - Cpu：单线程顺序执行；
 *                 - CpuParallel：使用 Rayon 按输出下标并行；
 *                 - Cuda：本库不附带 GPU 内核，直接报错而非悄悄回退。
 */

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{AggregationError, Result};

/// 张量所在的计算设备
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Device {
    /// 单线程 CPU
    Cpu,
    /// 多核 CPU（Rayon 线程池）
    #[default]
    CpuParallel,
    /// CUDA 设备（序号）
    Cuda(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::CpuParallel => write!(f, "cpu(parallel)"),
            Self::Cuda(ordinal) => write!(f, "cuda:{ordinal}"),
        }
    }
}

impl Device {
    /// 该设备能否执行聚合算子的内核
    pub const fn supports_aggregation(&self) -> bool {
        matches!(self, Self::Cpu | Self::CpuParallel)
    }

    /// 不支持时返回 `UnsupportedDevice`
    pub fn ensure_supported(&self) -> Result<()> {
        if self.supports_aggregation() {
            Ok(())
        } else {
            Err(AggregationError::UnsupportedDevice(*self))
        }
    }

    /// 对 `[0, len)` 中的每个下标调用一次 `kernel`，结果按下标顺序收集。
    ///
    /// `kernel` 只能读取共享的不可变输入，返回值即该下标对应的输出槽位，
    /// 因此各并行单元之间无需任何同步。
    pub fn launch<T, F>(&self, len: usize, kernel: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        match self {
            Self::Cpu => Ok((0..len).map(kernel).collect()),
            Self::CpuParallel => Ok((0..len).into_par_iter().map(kernel).collect()),
            Self::Cuda(_) => Err(AggregationError::UnsupportedDevice(*self)),
        }
    }

    /// 执行两个互不依赖的任务；并行设备上二者并发执行
    pub fn join<A, B, RA, RB>(&self, task_a: A, task_b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        match self {
            Self::CpuParallel => rayon::join(task_a, task_b),
            _ => (task_a(), task_b()),
        }
    }
}
