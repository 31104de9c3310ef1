use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Invalid media source: {0}")]
    InvalidSource(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Failure reported by a media primitive, either as the rejection of a play
/// command or through its asynchronous error event.
///
/// The variants mirror the failure identities exposed by common playback
/// engines (`NotAllowedError`, `NotSupportedError`, `MEDIA_ERR_NETWORK`, ...).
/// Hosts map their native error objects into one of these once, at the bridge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// Playback was refused by the host, typically an autoplay policy.
    #[error("Playback not allowed: {0}")]
    NotAllowed(String),

    /// The source's container or codec cannot be played by the host.
    #[error("Media not supported: {0}")]
    NotSupported(String),

    /// The operation was interrupted (e.g. a pause issued while starting).
    #[error("Playback aborted: {0}")]
    Aborted(String),

    /// Fetching the stream failed.
    #[error("Network error: {0}")]
    Network(String),

    /// The stream was fetched but could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Any other host-specific failure.
    #[error("{name}: {message}")]
    Other { name: String, message: String },
}

impl MediaError {
    /// Map a host error name (as exposed by DOM exceptions and similar
    /// engines) to a typed failure.
    pub fn from_name(name: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match name {
            "NotAllowedError" => MediaError::NotAllowed(message),
            "NotSupportedError" => MediaError::NotSupported(message),
            "AbortError" => MediaError::Aborted(message),
            "NetworkError" => MediaError::Network(message),
            "EncodingError" | "DecodeError" => MediaError::Decode(message),
            _ => MediaError::Other {
                name: name.to_string(),
                message,
            },
        }
    }
}
