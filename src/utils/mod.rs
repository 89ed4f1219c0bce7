//! Small helpers shared by the binary and the TUI

pub mod app_paths;
pub mod debouncer;
