use thiserror::Error;

/// Failure of a single backend call.
///
/// Both kinds are terminal for the action that triggered the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered but declared failure.
    #[error("server reported failure: {}", .message.as_deref().unwrap_or("no message"))]
    Application { message: Option<String> },
    /// The request never completed, or the response could not be parsed.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn application(message: Option<String>) -> Self {
        Self::Application {
            message: message.filter(|m| !m.is_empty()),
        }
    }

    pub fn transport(detail: impl std::fmt::Display) -> Self {
        Self::Transport(detail.to_string())
    }

    /// Server-supplied message, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Application { message } => message.as_deref(),
            Self::Transport(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
