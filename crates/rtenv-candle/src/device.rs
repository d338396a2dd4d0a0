use candle_core::utils::{cuda_is_available, metal_is_available};
use candle_core::Device;
use tracing::{debug, warn};

use rtenv_core::error::{Error, Result};
use rtenv_core::{Accelerator, ExecutionContext, ExecutionDevice};

/// CUDA over Metal. A backend compiled in but failing to open is treated as absent.
pub fn probe_accelerator(ordinal: usize) -> Option<Accelerator> {
    if cuda_is_available() {
        match Device::new_cuda(ordinal) {
            Ok(_) => return Some(Accelerator::Cuda { ordinal }),
            Err(e) => warn!(ordinal, error = %e, "CUDA compiled in but device unavailable"),
        }
    }
    if metal_is_available() {
        match Device::new_metal(ordinal) {
            Ok(_) => return Some(Accelerator::Metal { ordinal }),
            Err(e) => warn!(ordinal, error = %e, "Metal compiled in but device unavailable"),
        }
    }
    debug!(ordinal, "no accelerator");
    None
}

pub fn to_candle_device(device: &ExecutionDevice) -> Result<Device> {
    match device {
        ExecutionDevice::Cpu => Ok(Device::Cpu),
        ExecutionDevice::Accelerator(Accelerator::Cuda { ordinal }) => {
            Device::new_cuda(*ordinal).map_err(|e| Error::Backend(format!("cuda:{}: {}", ordinal, e)))
        }
        ExecutionDevice::Accelerator(Accelerator::Metal { ordinal }) => {
            Device::new_metal(*ordinal).map_err(|e| Error::Backend(format!("metal:{}: {}", ordinal, e)))
        }
    }
}

/// candle handles for an [`ExecutionContext`].
pub trait ContextDevices {
    /// Where tensors are built and computed.
    fn candle_device(&self) -> Result<Device>;
    /// Where loaded artifacts are placed (honors `map_location`).
    fn artifact_candle_device(&self) -> Result<Device>;
}

impl ContextDevices for ExecutionContext {
    fn candle_device(&self) -> Result<Device> {
        to_candle_device(&self.device)
    }

    fn artifact_candle_device(&self) -> Result<Device> {
        to_candle_device(&self.artifact_device())
    }
}
