use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use studiobook::config::AppConfig;
use studiobook::db;
use studiobook::services::notify::twilio::TwilioWhatsappProvider;
use studiobook::services::notify::walink::WaLinkProvider;
use studiobook::services::notify::NotificationProvider;
use studiobook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let notifier: Box<dyn NotificationProvider> = match config.notify_provider.as_str() {
        "twilio" => {
            anyhow::ensure!(
                !config.twilio_account_sid.is_empty(),
                "TWILIO_ACCOUNT_SID must be set when NOTIFY_PROVIDER=twilio"
            );
            tracing::info!("using Twilio WhatsApp notifications");
            Box::new(TwilioWhatsappProvider::new(
                config.twilio_account_sid.clone(),
                config.twilio_auth_token.clone(),
                config.twilio_whatsapp_number.clone(),
            ))
        }
        _ => {
            tracing::info!("using wa.me link notifications");
            Box::new(WaLinkProvider)
        }
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        notifier,
        sessions: Mutex::new(HashMap::new()),
    });

    let app = studiobook::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
