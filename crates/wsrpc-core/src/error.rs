//! Shared error type across wsrpc crates.

use thiserror::Error;

/// Stable error codes (used in logs and HTTP error bodies).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Underlying stream broke.
    Transport,
    /// Peer closed the stream.
    EndOfStream,
    /// Pump was cancelled.
    Cancelled,
    /// Command name not in the palette.
    UnknownCommand,
    /// Frame was not a valid envelope.
    InvalidEnvelope,
    /// Payload did not match the registered request type.
    Decode,
    /// Outbound value could not be serialized.
    Encode,
    /// Frame exceeded the configured size limit.
    FrameTooLarge,
    /// Command name registered twice.
    DuplicateCommand,
    /// Invalid configuration.
    Config,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON bodies and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::EndOfStream => "END_OF_STREAM",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::UnknownCommand => "UNKNOWN_COMMAND",
            ErrorCode::InvalidEnvelope => "INVALID_ENVELOPE",
            ErrorCode::Decode => "DECODE",
            ErrorCode::Encode => "ENCODE",
            ErrorCode::FrameTooLarge => "FRAME_TOO_LARGE",
            ErrorCode::DuplicateCommand => "DUPLICATE_COMMAND",
            ErrorCode::Config => "CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, WsRpcError>;

/// Unified error type used by core and server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WsRpcError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("end of stream")]
    EndOfStream,
    #[error("cancelled")]
    Cancelled,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),
    #[error("decode {command}: {reason}")]
    Decode { command: String, reason: String },
    #[error("encode: {0}")]
    Encode(String),
    #[error("frame too large: {len} bytes (max {max})")]
    FrameTooLarge { len: usize, max: usize },
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl WsRpcError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            WsRpcError::Transport(_) => ErrorCode::Transport,
            WsRpcError::EndOfStream => ErrorCode::EndOfStream,
            WsRpcError::Cancelled => ErrorCode::Cancelled,
            WsRpcError::UnknownCommand(_) => ErrorCode::UnknownCommand,
            WsRpcError::InvalidEnvelope(_) => ErrorCode::InvalidEnvelope,
            WsRpcError::Decode { .. } => ErrorCode::Decode,
            WsRpcError::Encode(_) => ErrorCode::Encode,
            WsRpcError::FrameTooLarge { .. } => ErrorCode::FrameTooLarge,
            WsRpcError::DuplicateCommand(_) => ErrorCode::DuplicateCommand,
            WsRpcError::Config(_) => ErrorCode::Config,
            WsRpcError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            WsRpcError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// True when the connection (or pump) cannot make further progress.
    ///
    /// Everything else is local to one frame: the stream is still framed
    /// correctly and the next decode may succeed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WsRpcError::Transport(_) | WsRpcError::EndOfStream | WsRpcError::Cancelled
        )
    }
}
