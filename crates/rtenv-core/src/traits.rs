use crate::error::Result;
use crate::types::Accelerator;

/// The slice of a numeric backend that device and thread selection touches.
pub trait NumericBackend: Send + Sync {
    /// Process-wide algorithm autotuning switch.
    fn set_autotune(&self, enabled: bool);

    /// `None` when no usable accelerator exists at `ordinal`.
    fn probe_accelerator(&self, ordinal: usize) -> Option<Accelerator>;

    fn logical_cores(&self) -> usize;

    /// Size the intra-op pool. `requested` may be zero or negative; returns
    /// the size actually applied.
    fn set_intra_op_threads(&self, requested: i64) -> Result<usize>;
}
