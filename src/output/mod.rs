//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Spinners for CLI requests

pub mod console;
pub mod progress;

pub use self::console::{
    print_banner, print_error, print_hook_outcome, print_info, print_server_summary,
    print_success, print_warning,
};
pub use progress::create_spinner;
