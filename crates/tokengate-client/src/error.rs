use thiserror::Error;
use tokengate_wire::WireError;

/// Errors surfaced by the token flow.
///
/// A service-level rejection (HTTP exchange succeeded, envelope status is
/// non-zero) is distinct from a transport failure.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error("token service rejected the request (status {status}): {message}")]
    Rejected { status: i32, message: String },
    #[error("token service reply did not include a session token")]
    MissingToken,
}
