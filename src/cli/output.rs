//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
/// Seeding failures carry a hint when rerunning the command is safe.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Seed(seed) if seed.is_retryable() => {
            format!("{} (safe to retry)", seed)
        }
        _ => e.to_string(),
    }
}
