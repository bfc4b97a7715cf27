//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, dates, formats, report files) and `config`
//! - `assets` - Asset report metrics
//! - `income` - Bank income metrics
//! - `refresh` - Refresh comparison

pub mod assets;
pub mod core;
pub mod income;
pub mod refresh;

// Re-export command functions for main.rs
pub use assets::*;
pub use core::*;
pub use income::*;
pub use refresh::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
