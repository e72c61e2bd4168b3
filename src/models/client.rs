use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    /// Natural key used to match appointments back to their client.
    pub whatsapp: String,
    pub email: String,
    pub total_spent: f64,
}
