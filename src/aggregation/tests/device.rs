use crate::aggregation::{AggregationConfig, aggregate};
use crate::assert_err;
use crate::device::Device;
use crate::errors::AggregationError;
use crate::tensor::Tensor;

#[test]
fn test_device_default_and_display() {
    assert_eq!(Device::default(), Device::CpuParallel);
    assert_eq!(Device::Cpu.to_string(), "cpu");
    assert_eq!(Device::CpuParallel.to_string(), "cpu(parallel)");
    assert_eq!(Device::Cuda(1).to_string(), "cuda:1");

    assert!(Device::Cpu.supports_aggregation());
    assert!(Device::CpuParallel.supports_aggregation());
    assert!(!Device::Cuda(0).supports_aggregation());
}

/// 结果按下标顺序收集，与是否并行无关
#[test]
fn test_launch_preserves_order() -> Result<(), AggregationError> {
    let square = |i: usize| i * i;
    let sequential = Device::Cpu.launch(1000, square)?;
    let parallel = Device::CpuParallel.launch(1000, square)?;
    assert_eq!(sequential, parallel);
    assert_eq!(parallel[31], 961);
    assert!(Device::Cpu.launch(0, square)?.is_empty());
    Ok(())
}

#[test]
fn test_cuda_is_refused() {
    assert_err!(
        Device::Cuda(0).launch(4, |i| i),
        AggregationError::UnsupportedDevice(Device::Cuda(0))
    );
    assert_err!(
        Device::Cuda(2).ensure_supported(),
        AggregationError::UnsupportedDevice(Device::Cuda(2))
    );

    let input = Tensor::<f64>::ones(&[1, 1, 3, 3]).to_device(Device::Cuda(0));
    let weight = Tensor::ones(&[1, 1, 9, 1]).to_device(Device::Cuda(0));
    assert_err!(
        aggregate(&input, &weight, &AggregationConfig::default()),
        AggregationError::UnsupportedDevice(Device::Cuda(0))
    );
}

#[test]
fn test_join() {
    for device in [Device::Cpu, Device::CpuParallel] {
        let (a, b) = device.join(|| (1..=10).sum::<i32>(), || "done");
        assert_eq!(a, 55);
        assert_eq!(b, "done");
    }
}

#[test]
fn test_device_serde() {
    let json = serde_json::to_string(&Device::Cuda(3)).unwrap();
    assert_eq!(serde_json::from_str::<Device>(&json).unwrap(), Device::Cuda(3));
    assert_eq!(
        serde_json::from_str::<Device>("\"Cpu\"").unwrap(),
        Device::Cpu
    );
}
