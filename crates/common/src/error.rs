//! Error types shared across ShakeFind crates.

/// Top-level error type for ShakeFind operations.
#[derive(Debug, thiserror::Error)]
pub enum ShakefindError {
    #[error("Pointer capture error: {message}")]
    Capture { message: String },

    #[error("Pointer scale error: {message}")]
    Scale { message: String },

    #[error("Pointer install error: {message}")]
    Install { message: String },

    #[error("Pointer restore error: {message}")]
    Restore { message: String },

    #[error("Input tracking error: {message}")]
    InputTracking { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ShakefindError.
pub type ShakefindResult<T> = Result<T, ShakefindError>;

impl ShakefindError {
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn scale(msg: impl Into<String>) -> Self {
        Self::Scale {
            message: msg.into(),
        }
    }

    pub fn install(msg: impl Into<String>) -> Self {
        Self::Install {
            message: msg.into(),
        }
    }

    pub fn restore(msg: impl Into<String>) -> Self {
        Self::Restore {
            message: msg.into(),
        }
    }

    pub fn input_tracking(msg: impl Into<String>) -> Self {
        Self::InputTracking {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether the error prevents the enlargement service from starting.
    ///
    /// Without a baseline pointer and its enlarged variant there is nothing
    /// to install, so capture and scale failures end startup. A declined
    /// install or restore only affects a single transition.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Capture { .. } | Self::Scale { .. })
    }
}
