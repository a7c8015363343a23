//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Create `.gantt/config.toml` |
//! | `order` | Print (or write) tasks in rendering order |
//! | `groups` | Show each group with its root, dates and members |
//! | `chart` | Draw a text Gantt chart |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. `--verbose` (or `-v`) turns on
//! debug output; `RUST_LOG` overrides both:
//! ```bash
//! RUST_LOG=gantt_order=trace gantt order tasks.json
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod chart;
mod groups;
mod input;
mod order;
mod output;

pub use app::{run, Cli, Commands};
pub use chart::{layout, ChartRow};
pub use input::InputArgs;
pub use output::{Output, OutputFormat};
