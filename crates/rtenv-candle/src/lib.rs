//! candle-backed runtime selection.
//!
//! ```no_run
//! let settings = rtenv_core::RuntimeSettings::default();
//! let ctx = rtenv_candle::init(&settings)?;
//! println!("running on {}", ctx.device);
//! # Ok::<(), rtenv_core::error::Error>(())
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use rtenv_core::error::Result;
use rtenv_core::traits::NumericBackend;
use rtenv_core::{Accelerator, ExecutionContext, RuntimeSettings};

pub mod artifact;
pub mod device;
pub mod threads;

pub use artifact::{load, load_pickle, load_safetensors, var_builder};
pub use device::{probe_accelerator, to_candle_device, ContextDevices};

static AUTOTUNE: AtomicBool = AtomicBool::new(false);

/// Whether kernels may benchmark algorithm variants for repeated shapes.
///
/// Advisory only: candle exposes no cuDNN benchmark switch, so nothing in
/// this workspace changes behavior on it. Downstream kernels that offer an
/// autotuned path should consult it.
pub fn autotune_enabled() -> bool {
    AUTOTUNE.load(Ordering::Relaxed)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CandleBackend;

impl NumericBackend for CandleBackend {
    fn set_autotune(&self, enabled: bool) {
        AUTOTUNE.store(enabled, Ordering::Relaxed);
    }

    fn probe_accelerator(&self, ordinal: usize) -> Option<Accelerator> {
        device::probe_accelerator(ordinal)
    }

    fn logical_cores(&self) -> usize {
        threads::logical_cores()
    }

    fn set_intra_op_threads(&self, requested: i64) -> Result<usize> {
        threads::apply_intra_op_threads(requested)
    }
}

/// [`rtenv_core::initialize`] against [`CandleBackend`].
pub fn init(settings: &RuntimeSettings) -> Result<ExecutionContext> {
    rtenv_core::initialize(&CandleBackend, settings)
}
