//! Msh - Minimal Shell
//!
//! Reads one command line at a time and runs it as a builtin, an external
//! program, a two-stage pipeline, or a background job.

#![deny(trivial_casts, trivial_numeric_casts, unsafe_code, unused_import_braces)]

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

#[cfg(test)]
#[macro_use]
extern crate lazy_static;

/// Logs the error of a `Result` without propagating it.
macro_rules! log_if_err {
    ($result:expr, $message:expr) => {{
        if let Err(ref e) = $result {
            error!("{}: {}", $message, e);
        }
    }};
    ($result:expr, $fmt:expr, $($arg:tt)+) => {{
        if let Err(ref e) = $result {
            error!("{}: {}", format!($fmt, $($arg)+), e);
        }
    }};
}

mod builtins;
pub mod core;
pub mod editor;
pub mod errors;
mod execute_command;
pub mod shell;
mod util;

pub use crate::shell::{Shell, ShellConfig};
pub use crate::util::MshExitStatusExt;
