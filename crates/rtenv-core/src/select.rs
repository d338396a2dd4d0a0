use tracing::{debug, info, warn};

use crate::config::RuntimeSettings;
use crate::error::Result;
use crate::traits::NumericBackend;
use crate::types::{ExecutionContext, ExecutionDevice, MapLocation};

/// Pick the execution device and size the CPU pool. Run once at startup.
///
/// The autotune flag is applied before probing, on both paths. With an
/// accelerator the thread pool is left alone; without one, artifacts are
/// remapped to CPU and the pool is asked for `cores - reserved_cores`
/// threads, unclamped. The backend decides what a non-positive request means.
///
/// The autotune flag stays set if the pool call fails; it does not depend on
/// the device decision.
pub fn initialize<B>(backend: &B, settings: &RuntimeSettings) -> Result<ExecutionContext>
where
    B: NumericBackend + ?Sized,
{
    backend.set_autotune(settings.autotune);

    let accelerator = if settings.force_cpu {
        debug!("accelerator probe skipped (force_cpu)");
        None
    } else {
        backend.probe_accelerator(settings.accelerator_ordinal)
    };

    if let Some(acc) = accelerator {
        info!(device = %acc, autotune = settings.autotune, "execution device selected");
        return Ok(ExecutionContext {
            device: ExecutionDevice::Accelerator(acc),
            map_location: None,
            thread_request: None,
            intra_op_threads: None,
            autotune: settings.autotune,
        });
    }

    let cores = backend.logical_cores();
    let request = thread_request(cores, settings.reserved_cores);
    if request <= 0 {
        warn!(cores, reserved = settings.reserved_cores, request, "non-positive intra-op thread request");
    }
    let applied = backend.set_intra_op_threads(request)?;
    info!(device = "cpu", cores, request, applied, autotune = settings.autotune, "execution device selected");

    Ok(ExecutionContext {
        device: ExecutionDevice::Cpu,
        map_location: Some(MapLocation::Cpu),
        thread_request: Some(request),
        intra_op_threads: Some(applied),
        autotune: settings.autotune,
    })
}

/// `cores - reserved` in signed arithmetic; no floor.
pub fn thread_request(cores: usize, reserved: usize) -> i64 {
    cores as i64 - reserved as i64
}
