//! Load saved tensors onto the context's artifact device.
//!
//! Without an accelerator the context carries a CPU `map_location`, so weights
//! exported from a GPU run still load on CPU-only hosts.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Tensor};
use candle_nn::VarBuilder;
use tracing::info;

use rtenv_core::error::{Error, Result};
use rtenv_core::ExecutionContext;

use crate::device::ContextDevices;

fn backend_err(path: &Path, e: candle_core::Error) -> Error {
    Error::Backend(format!("{}: {}", path.display(), e))
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("artifact not found: {}", path.display()),
        )))
    }
}

pub fn load_safetensors(ctx: &ExecutionContext, path: &Path) -> Result<HashMap<String, Tensor>> {
    ensure_exists(path)?;
    let device = ctx.artifact_candle_device()?;
    let tensors = candle_core::safetensors::load(path, &device).map_err(|e| backend_err(path, e))?;
    info!(path = %path.display(), tensors = tensors.len(), device = %ctx.artifact_device(), "loaded safetensors");
    Ok(tensors)
}

/// PyTorch pickle checkpoints (`pytorch_model.bin`, `.pt`). candle reads
/// these onto CPU; tensors are then moved to the artifact device.
pub fn load_pickle(ctx: &ExecutionContext, path: &Path) -> Result<HashMap<String, Tensor>> {
    ensure_exists(path)?;
    let device = ctx.artifact_candle_device()?;
    let weights = candle_core::pickle::read_all(path).map_err(|e| backend_err(path, e))?;
    let mut tensors = HashMap::with_capacity(weights.len());
    for (name, tensor) in weights {
        let tensor = tensor.to_device(&device).map_err(|e| backend_err(path, e))?;
        tensors.insert(name, tensor);
    }
    info!(path = %path.display(), tensors = tensors.len(), device = %ctx.artifact_device(), "loaded pickle checkpoint");
    Ok(tensors)
}

/// Dispatch on extension: `safetensors`, or `bin`/`pt`/`pth` for pickle.
pub fn load(ctx: &ExecutionContext, path: &Path) -> Result<HashMap<String, Tensor>> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("safetensors") => load_safetensors(ctx, path),
        Some("bin" | "pt" | "pth") => load_pickle(ctx, path),
        other => Err(Error::Backend(format!(
            "unsupported artifact extension {:?} for {}",
            other.unwrap_or(""),
            path.display()
        ))),
    }
}

pub fn var_builder(ctx: &ExecutionContext, path: &Path, dtype: DType) -> Result<VarBuilder<'static>> {
    let device = ctx.artifact_candle_device()?;
    let tensors = load(ctx, path)?;
    Ok(VarBuilder::from_tensors(tensors, dtype, &device))
}
