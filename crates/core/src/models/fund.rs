use serde::{Deserialize, Serialize};

/// A model fund: a named basket of securities with target weights.
///
/// Weights are taken as given by the source sheet (percentages or fractions);
/// use `normalized_weights` before computing returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFund {
    pub name: String,
    pub weights: Vec<FundWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundWeight {
    pub security_name: String,
    pub weight: f64,
}

impl ModelFund {
    pub fn new(name: impl Into<String>, weights: Vec<FundWeight>) -> Self {
        Self {
            name: name.into(),
            weights,
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().map(|w| w.weight).sum()
    }

    /// Weights rescaled to sum to 1. Empty when the total weight is not positive.
    pub fn normalized_weights(&self) -> Vec<FundWeight> {
        let total = self.total_weight();
        if total <= 0.0 || !total.is_finite() {
            return Vec::new();
        }
        self.weights
            .iter()
            .map(|w| FundWeight {
                security_name: w.security_name.clone(),
                weight: w.weight / total,
            })
            .collect()
    }

    pub fn security_names(&self) -> impl Iterator<Item = &str> {
        self.weights.iter().map(|w| w.security_name.as_str())
    }
}
