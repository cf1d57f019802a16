//! Error taxonomy at the pipeline boundary (spec §6.3, §7).

use thiserror::Error;

/// Fatal errors surfaced by [`crate::generator::generate`].
///
/// Every variant carries a human-readable `context` string. There is no
/// partial [`crate::generator::WorldGenerationResult`] on error: a run either
/// completes every phase or the caller receives only this error.
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("native plate-tectonics library unavailable: {context}")]
    NativeLibraryMissing { context: String },

    #[error("native plate-tectonics solver failed to initialize: {context}")]
    NativeCreateFailed { context: String },

    #[error("native plate-tectonics solver did not converge: {context}")]
    NativeDidNotConverge { context: String },

    #[error("invalid generation parameters: {context}")]
    InvalidParams { context: String },

    #[error("hydrology invariant violated: {context}")]
    HydrologyInvariantViolated { context: String },

    #[error("generation cancelled: {context}")]
    Cancelled { context: String },
}

impl ErrorKind {
    pub fn native_library_missing(context: impl Into<String>) -> Self {
        Self::NativeLibraryMissing { context: context.into() }
    }

    pub fn native_create_failed(context: impl Into<String>) -> Self {
        Self::NativeCreateFailed { context: context.into() }
    }

    pub fn native_did_not_converge(context: impl Into<String>) -> Self {
        Self::NativeDidNotConverge { context: context.into() }
    }

    pub fn invalid_params(context: impl Into<String>) -> Self {
        Self::InvalidParams { context: context.into() }
    }

    pub fn hydrology_invariant_violated(context: impl Into<String>) -> Self {
        Self::HydrologyInvariantViolated { context: context.into() }
    }

    pub fn cancelled(context: impl Into<String>) -> Self {
        Self::Cancelled { context: context.into() }
    }
}
