//! Client for the internal user-token service: fetch a session token and
//! cookie, then validate the token against the service.

pub mod config;
pub mod error;
pub mod session;

pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{Session, TokenClient};
