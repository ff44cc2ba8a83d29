use thiserror::Error;

/// Errors from key-value store operations (used by trait definitions in linghua-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors returned by the chat controller's send path.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyInput,

    #[error("a reply is still pending")]
    Busy,

    #[error("no quick reply at position {0}")]
    UnknownQuickReply(usize),
}

/// Validation errors from the creative panels.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreativeError {
    #[error("copy theme is empty")]
    EmptyTheme,

    #[error("image description is empty")]
    EmptyDescription,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::Busy.to_string(), "a reply is still pending");
        assert!(ChatError::UnknownQuickReply(7).to_string().contains('7'));
    }
}
