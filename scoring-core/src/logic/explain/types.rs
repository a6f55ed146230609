use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    IncreaseRisk,
    DecreaseRisk,
}

impl Direction {
    /// Strictly positive raises risk; zero counts as `DecreaseRisk`
    pub fn from_contribution(contribution: f64) -> Self {
        if contribution > 0.0 {
            Direction::IncreaseRisk
        } else {
            Direction::DecreaseRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::IncreaseRisk => "increase_risk",
            Direction::DecreaseRisk => "decrease_risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub feature_name: String,
    pub signed_contribution: f64,
    pub direction: Direction,
}

/// Every feature's attribution, ranked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub probability: f64,
    pub baseline_probability: f64,
    pub attributions: Vec<Attribution>,
}

impl Explanation {
    pub fn top(&self, k: usize) -> &[Attribution] {
        &self.attributions[..k.min(self.attributions.len())]
    }

    pub fn into_top(mut self, k: usize) -> Vec<Attribution> {
        self.attributions.truncate(k);
        self.attributions
    }

    /// Sum over all features, returned or not
    pub fn total(&self) -> f64 {
        self.attributions.iter().map(|a| a.signed_contribution).sum()
    }
}
