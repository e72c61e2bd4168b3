use serde::{Deserialize, Serialize};

/// Studio branding and contact data, shown publicly and editable by admin.
/// The whatsapp number is also the recipient of booking notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Studio {
    pub name: String,
    pub owner_name: String,
    pub whatsapp: String,
    pub address: String,
    pub email: String,
    pub history: String,
    pub mission: String,
}
