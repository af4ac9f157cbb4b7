//! Predictive-analytics fixtures

use serde::{Deserialize, Serialize};

/// Direction of a predicted change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Predicted above current
    Up,
    /// Predicted below current
    Down,
    /// No change
    Stable,
}

impl Trend {
    /// Trend implied by two values
    pub fn between(current: u8, predicted: u8) -> Self {
        match predicted.cmp(&current) {
            std::cmp::Ordering::Greater => Self::Up,
            std::cmp::Ordering::Less => Self::Down,
            std::cmp::Ordering::Equal => Self::Stable,
        }
    }
}

/// A prediction card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Card title
    pub title: String,
    /// Current value, percent
    pub current: u8,
    /// Predicted value, percent
    pub predicted: u8,
    /// Direction of change
    pub trend: Trend,
    /// Model confidence, percent
    pub confidence: u8,
}

impl Prediction {
    fn new(title: &str, current: u8, predicted: u8, confidence: u8) -> Self {
        Self {
            title: title.to_string(),
            current,
            predicted,
            trend: Trend::between(current, predicted),
            confidence,
        }
    }

    /// The three overview cards
    pub fn fixtures() -> Vec<Prediction> {
        vec![
            Self::new("System Failure Risk", 23, 31, 87),
            Self::new("Performance Degradation", 45, 52, 92),
            Self::new("Resource Optimization", 78, 85, 89),
        ]
    }
}

/// Risk and confidence for one horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonRisk {
    /// Failure risk, percent
    pub risk: u8,
    /// Model confidence, percent
    pub confidence: u8,
}

/// Failure risk over the analytics horizons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskHorizon {
    /// Next 7 days
    pub next_week: HorizonRisk,
    /// Next 30 days
    pub next_month: HorizonRisk,
    /// Next 90 days
    pub next_quarter: HorizonRisk,
}

impl Default for RiskHorizon {
    fn default() -> Self {
        Self {
            next_week: HorizonRisk {
                risk: 15,
                confidence: 94,
            },
            next_month: HorizonRisk {
                risk: 28,
                confidence: 87,
            },
            next_quarter: HorizonRisk {
                risk: 45,
                confidence: 72,
            },
        }
    }
}

/// One month on the failure forecast chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Month label
    pub date: String,
    /// Observed risk; absent for future months
    pub actual: Option<u8>,
    /// Predicted risk
    pub predicted: u8,
    /// Model confidence, percent
    pub confidence: u8,
}

/// Monthly failure-risk forecast
pub fn forecast() -> Vec<ForecastPoint> {
    [
        ("Jan", Some(23), 25, 85),
        ("Feb", Some(31), 32, 88),
        ("Mar", Some(45), 43, 92),
        ("Apr", Some(52), 54, 89),
        ("May", Some(67), 68, 94),
        ("Jun", None, 75, 87),
        ("Jul", None, 82, 83),
    ]
    .into_iter()
    .map(|(date, actual, predicted, confidence)| ForecastPoint {
        date: date.to_string(),
        actual,
        predicted,
        confidence,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_cards() {
        let cards = Prediction::fixtures();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].title, "System Failure Risk");
        assert_eq!((cards[1].current, cards[1].predicted), (45, 52));
        assert!(cards.iter().all(|c| c.trend == Trend::Up));
    }

    #[test]
    fn test_trend_between() {
        assert_eq!(Trend::between(50, 40), Trend::Down);
        assert_eq!(Trend::between(50, 50), Trend::Stable);
    }

    #[test]
    fn test_horizon_serializes_camel_case() {
        let json = serde_json::to_value(RiskHorizon::default()).unwrap();
        assert_eq!(json["nextWeek"]["risk"], 15);
        assert_eq!(json["nextQuarter"]["confidence"], 72);
    }

    #[test]
    fn test_forecast_future_months_have_no_actual() {
        let points = forecast();
        assert_eq!(points.len(), 7);
        assert!(points.iter().filter(|p| p.actual.is_none()).count() == 2);
        assert_eq!(points.last().map(|p| p.predicted), Some(82));
    }
}
