//! Roster command-line front end.
//!
//! ## Architecture
//!
//! ```text
//! roster-cli
//!   ├─ Args / Command   (clap parsing, env fallbacks)
//!   ├─ CliConfig        (resolved runtime configuration)
//!   └─ run              (one command, one transaction, output to a writer)
//! ```
//!
//! Output goes to the writer handed to [`run`]; logs go to stderr.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod args;
mod commands;
mod config;
mod error;

pub use args::{Args, Command, RequestKind};
pub use commands::run;
pub use config::CliConfig;
pub use error::CliError;
