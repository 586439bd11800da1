//! Errors surfaced by the storefront backend client.

use reqwest::Response;
use serde::Deserialize;
use tracing::warn;

/// Client error with the backend's message kept verbatim for display.
#[derive(Debug)]
pub enum ClientError {
    /// The request never got a response (DNS, connect, TLS, body decode)
    Transport(reqwest::Error),
    /// 4xx: validation or authentication failure reported by the backend
    Rejected { status: u16, message: String },
    /// 5xx: backend fault
    Server { status: u16, message: String },
    /// A successful login response carried no credential
    MissingToken,
    /// Input refused before sending
    Invalid(String),
    /// Endpoint URL could not be built
    InvalidUrl(url::ParseError),
}

impl ClientError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// HTTP status reported by the backend, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } | ClientError::Server { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Build the error for a non-success response, reading `{message}` or
    /// `{error}` from the body and falling back to the status reason.
    pub(super) async fn from_response(response: Response) -> Self {
        let status = response.status();

        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
            error: Option<String>,
        }

        let body = response.json::<ErrorBody>().await.ok();
        let message = body
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        if status.is_server_error() {
            warn!(status = status.as_u16(), message = %message, "Backend fault");
            ClientError::Server {
                status: status.as_u16(),
                message,
            }
        } else {
            ClientError::Rejected {
                status: status.as_u16(),
                message,
            }
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "Network error: {}", e),
            ClientError::Rejected { message, .. } => write!(f, "{}", message),
            ClientError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            ClientError::MissingToken => write!(f, "Login response did not include a token"),
            ClientError::Invalid(msg) => write!(f, "{}", msg),
            ClientError::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(e) => Some(e),
            ClientError::InvalidUrl(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e)
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        ClientError::InvalidUrl(e)
    }
}
