use anyhow::Context;
use async_trait::async_trait;

use super::{clean_number, NotificationProvider};

/// Sends booking notifications over Twilio's WhatsApp channel.
pub struct TwilioWhatsappProvider {
    account_sid: String,
    auth_token: String,
    from_number: String,
    client: reqwest::Client,
}

impl TwilioWhatsappProvider {
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Self {
        Self {
            account_sid,
            auth_token,
            from_number,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationProvider for TwilioWhatsappProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );

        self.client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", format!("whatsapp:+{}", clean_number(to))),
                ("From", format!("whatsapp:{}", self.from_number)),
                ("Body", body.to_string()),
            ])
            .send()
            .await
            .context("failed to send Twilio WhatsApp message")?
            .error_for_status()
            .context("Twilio API returned error")?;

        Ok(())
    }
}
