//! Output module for logging, console output and progress.
//!
//! Provides:
//! - Tracing subscriber setup
//! - Colored console output
//! - Progress bars
//! - Statistics reporting

pub mod console;
pub mod logging;
pub mod progress;
pub mod stats;

pub use console::{print_banner, print_config_summary, print_error, print_info, print_warning};
pub use logging::init_logging;
pub use progress::create_download_bar;
pub use stats::print_fan_club_stats;
