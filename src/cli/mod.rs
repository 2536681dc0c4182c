//! CLI commands
//!
//! Command implementations for the `shipsplit` binary.

mod input;
mod plan;
mod process;
mod style;

pub use plan::run_plan;
pub use process::{ProcessArgs, run_process};
