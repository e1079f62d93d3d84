//! Utility modules for the Nikud client
//!
//! - `format`: number and file-size rendering
//! - `debounce`: trailing-edge debouncing of repeated calls
//! - `toast`: transient terminal notifications
//! - `http`: shared reqwest client construction

pub mod debounce;
pub mod format;
pub mod http;
pub mod toast;

pub use debounce::Debouncer;
pub use format::{format_file_size, format_number};
pub use toast::{Severity, Toaster};
