use serde::{Deserialize, Serialize};

/// A confirmed booking. Service and contact fields are snapshots taken at
/// booking time and do not follow later catalog or profile edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub service_id: String,
    pub service_name: String,
    pub client_name: String,
    pub client_whatsapp: String,
    /// Day of month, 1-31.
    pub date: u32,
    /// Month name as displayed ("Janeiro".."Dezembro"). No year is stored,
    /// so the slot key is only unambiguous within a single year.
    pub month: String,
    pub time: String,
    pub status: AppointmentStatus,
    pub price: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Upcoming => "upcoming",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => AppointmentStatus::Completed,
            "cancelled" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Upcoming,
        }
    }
}
