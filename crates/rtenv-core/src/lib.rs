#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod select;
pub mod traits;
pub mod types;

pub use config::RuntimeSettings;
pub use select::initialize;
pub use types::{Accelerator, ExecutionContext, ExecutionDevice, MapLocation};
