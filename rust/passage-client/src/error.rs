//! Error types for ceremony operations.

use thiserror::Error;

use crate::{CapabilityError, CeremonyKind, MalformedChallengeError, TransportError};

/// Why a registration, login or logout did not complete.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CeremonyError {
    /// The relying party refused to issue a challenge (HTTP 403).
    #[error("{}", permission_denied(.ceremony, .message))]
    PermissionDenied {
        /// The ceremony that was refused
        ceremony: CeremonyKind,
        /// The `message` field of the response body, if it had one
        message: Option<String>,
    },

    /// The relying party answered with a status the step does not accept.
    #[error("Server responded with error. (HTTP {status})")]
    UnexpectedStatus {
        /// The HTTP status code
        status: u16,
    },

    /// The relying party could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A successful response did not carry a JSON body.
    #[error("Server responded with an invalid body: {0}")]
    InvalidResponse(String),

    /// The user-supplied form could not be serialized to JSON.
    #[error("Could not serialize the request body: {0}")]
    InvalidRequestBody(String),

    /// The challenge could not be reshaped for the credential capability.
    #[error(transparent)]
    MalformedChallenge(#[from] MalformedChallengeError),

    /// The credential capability declined or failed.
    #[error("Credential capability failed: {0}")]
    Capability(#[from] CapabilityError),
}

fn permission_denied(ceremony: &CeremonyKind, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("{ceremony} failed: {message}."),
        None => format!("{ceremony} failed."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_includes_the_server_message_in_a_denial() {
        let error = CeremonyError::PermissionDenied {
            ceremony: CeremonyKind::Registration,
            message: Some("unknown user".into()),
        };
        assert_eq!(error.to_string(), "Registration failed: unknown user.");
    }

    #[test]
    fn it_describes_a_denial_without_a_message() {
        let error = CeremonyError::PermissionDenied {
            ceremony: CeremonyKind::Authentication,
            message: None,
        };
        assert_eq!(error.to_string(), "Authentication failed.");
    }

    #[test]
    fn it_names_the_unexpected_status() {
        let error = CeremonyError::UnexpectedStatus { status: 500 };
        assert_eq!(error.to_string(), "Server responded with error. (HTTP 500)");
    }

    #[test]
    fn it_carries_capability_errors_unchanged() {
        let source = CapabilityError::new("NotAllowedError", "cancelled");
        let error = CeremonyError::from(source.clone());
        assert_eq!(error, CeremonyError::Capability(source));
        assert_eq!(
            error.to_string(),
            "Credential capability failed: NotAllowedError: cancelled"
        );
    }
}
