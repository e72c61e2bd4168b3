pub mod appointment;
pub mod client;
pub mod service;
pub mod studio;

pub use appointment::{Appointment, AppointmentStatus};
pub use client::Client;
pub use service::{parse_price, Service};
pub use studio::Studio;
