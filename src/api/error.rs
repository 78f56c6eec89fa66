use thiserror::Error;

/// Failure of a backend call, categorized by HTTP status inspection only
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401/403: stored credentials have already been cleared
    #[error("session expired or access denied (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx envelope with `success: false`, or no `data` where one was needed
    #[error("{0}")]
    Rejected(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    /// Rejected on the client before any request was made
    #[error("{0}")]
    Invalid(String),
}

impl ApiError {
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Message for a user-facing notification: the backend's own message
    /// when there is one, the fallback otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Unauthorized { .. } => {
                "Your session has expired, please log in again".to_string()
            }
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            Self::Rejected(message) | Self::Invalid(message) if !message.is_empty() => {
                message.clone()
            }
            Self::Transport(message) if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_message() {
        let err = ApiError::Status {
            status: 400,
            message: "Court is fully booked".to_string(),
        };
        assert_eq!(err.user_message("Booking failed"), "Court is fully booked");
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ApiError::Status {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.user_message("Booking failed"), "Booking failed");

        let err = ApiError::Decode("expected value at line 1".to_string());
        assert_eq!(err.user_message("Booking failed"), "Booking failed");
    }

    #[test]
    fn test_auth_failure() {
        assert!(ApiError::Unauthorized { status: 403 }.is_auth_failure());
        assert!(!ApiError::Rejected("nope".to_string()).is_auth_failure());
    }
}
