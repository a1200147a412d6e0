use common_log::LogInit;
use tokengate_client::{ClientConfig, TokenClient};

const SERVICE_NAME: &str = "tokengate-demo";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    LogInit::init(SERVICE_NAME)?;

    let client = TokenClient::new(ClientConfig::from_env())?;
    tracing::info!(
        event = "client_start",
        service = SERVICE_NAME,
        version = VERSION,
        base_url = %client.config().base_url,
        user = %client.config().user_name,
        "starting token demo"
    );

    let session = match client.fetch_session().await {
        Ok(session) => session,
        Err(error) => {
            tracing::error!(%error, event = "token_request_failed", "failed to obtain session token");
            std::process::exit(1);
        }
    };
    tracing::info!(
        event = "token_issued",
        cookie_issued = session.cookie.is_some(),
        "session token issued"
    );

    match client.validate(&session).await {
        Ok(()) => tracing::info!(event = "user_validated", "user validated"),
        Err(error) => {
            tracing::error!(%error, event = "user_rejected", "user validation failed");
            std::process::exit(1);
        }
    }

    Ok(())
}
