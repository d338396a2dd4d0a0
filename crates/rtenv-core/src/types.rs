//! Execution context produced once at startup and read by numeric code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A co-processor usable for tensor computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Accelerator {
    Cuda { ordinal: usize },
    Metal { ordinal: usize },
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accelerator::Cuda { ordinal } => write!(f, "cuda:{ordinal}"),
            Accelerator::Metal { ordinal } => write!(f, "metal:{ordinal}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionDevice {
    Accelerator(Accelerator),
    Cpu,
}

impl ExecutionDevice {
    pub fn is_accelerator(&self) -> bool {
        matches!(self, ExecutionDevice::Accelerator(_))
    }
}

impl fmt::Display for ExecutionDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionDevice::Accelerator(acc) => acc.fmt(f),
            ExecutionDevice::Cpu => f.write_str("cpu"),
        }
    }
}

/// Where deserialized tensors are remapped to. Absent means "load where saved".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MapLocation {
    Cpu,
}

/// Device and threading defaults for the process.
///
/// - `device`: where tensors are built and computed
/// - `map_location`: remap target for saved artifacts, set only without an accelerator
/// - `thread_request`: `logical_cores - reserved_cores`, CPU path only, may be <= 0
/// - `intra_op_threads`: pool size the backend applied for `thread_request`
/// - `autotune`: state the autotune flag was set to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub device: ExecutionDevice,
    pub map_location: Option<MapLocation>,
    pub thread_request: Option<i64>,
    pub intra_op_threads: Option<usize>,
    pub autotune: bool,
}

impl ExecutionContext {
    /// Device that loaded artifacts should land on.
    pub fn artifact_device(&self) -> ExecutionDevice {
        match self.map_location {
            Some(MapLocation::Cpu) => ExecutionDevice::Cpu,
            None => self.device,
        }
    }
}
