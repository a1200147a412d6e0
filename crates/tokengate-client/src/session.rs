use reqwest::Client;
use tokengate_wire::{EnvelopeHandler, Method, WireError, WireRequest};

use crate::config::ClientConfig;
use crate::error::ClientError;

pub const GET_USER_INFO_PATH: &str = "/userToken/getUserInfo";
pub const VALIDATE_TOKEN_PATH: &str = "/userToken/validateToken";

const SET_COOKIE: &str = "Set-Cookie";

/// A session issued by the token service: the token itself plus the cookie
/// that must accompany validation calls. The service may omit the cookie.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub cookie: Option<String>,
}

/// Client for the two-step token flow.
pub struct TokenClient {
    config: ClientConfig,
    http: Client,
}

impl TokenClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(WireError::from)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Request a session token for the configured user.
    ///
    /// Captures the `Set-Cookie` reply header alongside the token; a success
    /// envelope without a token is an error.
    pub async fn fetch_session(&self) -> Result<Session, ClientError> {
        let request = WireRequest::builder(self.operation_url(GET_USER_INFO_PATH))
            .param("userName", self.config.user_name.as_str())
            .build()?;

        let mut handler = EnvelopeHandler::new();
        request.send(&self.http, &mut handler).await?;

        let status = handler.envelope_status();
        if status != 0 {
            let message = handler.message().unwrap_or_default().to_string();
            tracing::warn!(status, %message, "token request rejected by service");
            return Err(ClientError::Rejected { status, message });
        }

        let token = handler
            .result()
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or(ClientError::MissingToken)?;
        let cookie = handler.header_value(SET_COOKIE).map(str::to_string);

        Ok(Session { token, cookie })
    }

    /// Validate a previously issued session.
    ///
    /// Replays the captured cookie when one was issued. An empty token is
    /// rejected locally without contacting the service.
    pub async fn validate(&self, session: &Session) -> Result<(), ClientError> {
        if session.token.is_empty() {
            return Err(ClientError::MissingToken);
        }

        let mut builder = WireRequest::builder(self.operation_url(VALIDATE_TOKEN_PATH))
            .method(Method::Post)
            .param("userName", self.config.user_name.as_str())
            .param("userToken", session.token.as_str());
        if let Some(cookie) = &session.cookie {
            builder = builder.header("Cookie", cookie.as_str());
        }
        let request = builder.build()?;

        let mut handler = EnvelopeHandler::new();
        request.send(&self.http, &mut handler).await?;

        let status = handler.envelope_status();
        if status != 0 {
            let message = handler.message().unwrap_or_default().to_string();
            tracing::warn!(status, %message, "token validation rejected by service");
            return Err(ClientError::Rejected { status, message });
        }

        Ok(())
    }

    fn operation_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}
