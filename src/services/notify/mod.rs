pub mod twilio;
pub mod walink;

use async_trait::async_trait;

/// Outbound booking notifications. Fire-and-forget: callers log a
/// delivery failure and move on, a confirmed booking never rolls back
/// because a message did not go out.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()>;
}

/// Keeps only the digits of a whatsapp number, the form both providers
/// expect.
pub fn clean_number(whatsapp: &str) -> String {
    whatsapp.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_number() {
        assert_eq!(clean_number("+55 (11) 98102-8614"), "5511981028614");
        assert_eq!(clean_number("11987654321"), "11987654321");
    }
}
