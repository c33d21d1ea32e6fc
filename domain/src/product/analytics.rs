//! Price analytics over a product's price history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::{PricePoint, Product};

/// Relative change (in percent) below which the trend counts as stable.
const STABLE_THRESHOLD_PERCENT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Rising,
    Falling,
    Stable,
}

/// Summary statistics for one product's price over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAnalytics {
    pub product_id: i64,
    pub current_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub average_price: f64,
    pub sample_count: usize,
    pub trend: PriceTrend,
    /// Change from the oldest observation to the current price, in percent
    pub change_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_recorded: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_recorded: Option<DateTime<Utc>>,
}

impl PriceAnalytics {
    /// Compute analytics from the history plus the product's current price.
    ///
    /// The current price is always the final sample, so a product with no
    /// recorded history yields a single-sample, stable summary.
    pub fn from_history(product: &Product, history: &[PricePoint]) -> Self {
        let mut points: Vec<&PricePoint> = history
            .iter()
            .filter(|p| p.product_id == product.id && p.price.is_finite())
            .collect();
        points.sort_by_key(|p| p.recorded_at);

        let mut prices: Vec<f64> = points.iter().map(|p| p.price).collect();
        prices.push(product.price);

        let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let average_price = prices.iter().sum::<f64>() / prices.len() as f64;

        let oldest = prices[0];
        let change_percent = if oldest.abs() > f64::EPSILON {
            (product.price - oldest) / oldest * 100.0
        } else {
            0.0
        };
        let trend = if change_percent > STABLE_THRESHOLD_PERCENT {
            PriceTrend::Rising
        } else if change_percent < -STABLE_THRESHOLD_PERCENT {
            PriceTrend::Falling
        } else {
            PriceTrend::Stable
        };

        Self {
            product_id: product.id,
            current_price: product.price,
            min_price,
            max_price,
            average_price: round2(average_price),
            sample_count: prices.len(),
            trend,
            change_percent: round2(change_percent),
            first_recorded: points.first().map(|p| p.recorded_at),
            last_recorded: points.last().map(|p| p.recorded_at),
        }
    }

    /// Whether the current price is the lowest ever observed
    pub fn is_all_time_low(&self) -> bool {
        self.current_price <= self.min_price
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
