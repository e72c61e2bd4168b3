use anyhow::Context;
use async_trait::async_trait;

use super::{clean_number, NotificationProvider};

/// Link-based delivery: builds the `wa.me` deep link that opens the chat
/// with the message prefilled and logs it. Default provider when no
/// Twilio credentials are configured.
pub struct WaLinkProvider;

#[async_trait]
impl NotificationProvider for WaLinkProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        let link = build_link(to, body)?;
        tracing::info!(%link, "booking notification link");
        Ok(())
    }
}

fn build_link(to: &str, body: &str) -> anyhow::Result<reqwest::Url> {
    let base = format!("https://wa.me/{}", clean_number(to));
    reqwest::Url::parse_with_params(&base, &[("text", body)]).context("failed to build wa.me link")
}
