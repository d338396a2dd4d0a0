use tracing::warn;

use rtenv_core::error::Result;

/// Logical cores reported by the OS, 1 if the query fails.
pub fn logical_cores() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or_else(|e| {
        warn!(error = %e, "could not query available parallelism, assuming 1");
        1
    })
}

/// rayon reads 0 as "one thread per core", which would drop the reserve; anything below one becomes one.
pub fn effective_threads(requested: i64) -> usize {
    if requested < 1 {
        warn!(requested, "intra-op thread request below 1, clamping to 1");
        1
    } else {
        requested as usize
    }
}

/// Build the rayon global pool candle's CPU kernels run on.
///
/// `RAYON_NUM_THREADS` is exported before the pool spawns so
/// `candle_core::utils::get_num_threads` agrees with it. The global pool can
/// only be built once per process; if something already initialized it, that
/// pool is kept, the export is rolled back and its size is returned.
pub fn apply_intra_op_threads(requested: i64) -> Result<usize> {
    let threads = effective_threads(requested);
    let previous = std::env::var_os("RAYON_NUM_THREADS");
    std::env::set_var("RAYON_NUM_THREADS", threads.to_string());

    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("rtenv-intra-op-{i}"))
        .build_global()
    {
        Ok(()) => Ok(threads),
        Err(e) => {
            match previous {
                Some(v) => std::env::set_var("RAYON_NUM_THREADS", v),
                None => std::env::remove_var("RAYON_NUM_THREADS"),
            }
            let existing = rayon::current_num_threads();
            warn!(requested = threads, existing, error = %e, "rayon global pool already running, keeping its size");
            Ok(existing)
        }
    }
}
