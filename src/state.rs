use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::notify::NotificationProvider;
use crate::services::selection::BookingSession;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub notifier: Box<dyn NotificationProvider>,
    /// In-progress booking flows, keyed by session id. Nothing here
    /// survives a restart.
    pub sessions: Mutex<HashMap<String, BookingSession>>,
}
