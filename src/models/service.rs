use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Formatted display price, e.g. "R$ 130,00". See [`parse_price`].
    pub price: String,
    pub description: String,
    pub long_description: String,
    pub duration: String,
    pub maintenance: String,
    pub image: String,
}

/// Parses a formatted price string back to a number for aggregation.
/// Strips everything but digits and the comma, which is treated as the
/// decimal separator. Unparseable input counts as zero.
pub fn parse_price(price: &str) -> f64 {
    let cleaned: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    cleaned.replace(',', ".").parse().unwrap_or(0.0)
}
