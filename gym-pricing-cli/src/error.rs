//! Errors surfaced by the command-line front-end.

use gym_pricing::PricingError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Everything that can stop a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// Pricing, validation or configuration failure from the engine.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Output could not be rendered as JSON.
    #[error("cannot render output: {0}")]
    Render(#[from] serde_json::Error),
}
