use thiserror::Error;

use crate::queue::QueueError;
use crate::sender::SenderError;

/// Failures the dispatch pipeline can hit. The dispatcher converts every
/// variant into a `DispatchResult`; none of them escape to the transport.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid or missing API key")]
    Forbidden,

    #[error("Route not found")]
    RouteNotFound,

    #[error("Invalid payload: {0}")]
    PayloadParse(#[from] serde_json::Error),

    #[error("Message sender error: {0}")]
    Sender(#[from] SenderError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
}

impl DispatchError {
    /// HTTP status carried by the DispatchResult this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::Forbidden => 403,
            DispatchError::RouteNotFound => 404,
            DispatchError::PayloadParse(_)
            | DispatchError::Sender(_)
            | DispatchError::Queue(_) => 500,
        }
    }

    /// Whether the error text may appear in the response body. Authorization
    /// failures stay generic; the rest go to an internal diagnostic channel.
    pub fn exposes_detail(&self) -> bool {
        !matches!(
            self,
            DispatchError::Forbidden | DispatchError::RouteNotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(DispatchError::Forbidden.status_code(), 403);
        assert_eq!(DispatchError::RouteNotFound.status_code(), 404);

        let parse_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert_eq!(DispatchError::PayloadParse(parse_err).status_code(), 500);
    }

    #[test]
    fn test_forbidden_hides_detail() {
        assert!(!DispatchError::Forbidden.exposes_detail());
        assert!(!DispatchError::RouteNotFound.exposes_detail());

        let parse_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(DispatchError::PayloadParse(parse_err).exposes_detail());
    }
}
