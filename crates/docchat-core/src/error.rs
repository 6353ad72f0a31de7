use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("Language model backend: {0}")]
    Backend(String),
}

impl Error {
    /// Errors the interactive loop recovers from by re-prompting.
    ///
    /// A malformed query or a backend hiccup is worth a retry; a broken
    /// model, index, or configuration is not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidQuery(_) | Error::Backend(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_and_invalid_query_are_recoverable() {
        assert!(Error::Backend("connection refused".into()).is_recoverable());
        assert!(Error::InvalidQuery("empty".into()).is_recoverable());
    }

    #[test]
    fn setup_errors_are_fatal() {
        assert!(!Error::InvalidConfig("bad key".into()).is_recoverable());
        assert!(!Error::Embedding("model not loaded".into()).is_recoverable());
        assert!(!Error::Index("dim mismatch".into()).is_recoverable());
    }
}
