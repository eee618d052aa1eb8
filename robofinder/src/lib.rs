pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use commands::{command_argument_builder, normalize_args};
pub use handlers::{request_from_matches, run_scan, save_summary};

// Re-export scan types from robofinder-core
pub use robofinder_core::{ScanRequest, ScanSummary, TargetSpec, ValidationError};
