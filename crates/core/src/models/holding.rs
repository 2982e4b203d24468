use serde::{Deserialize, Serialize};

/// One row of a holdings export: an investor's position in one security.
///
/// Loaded once from the holdings spreadsheet and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Investor (account holder) name as it appears in the export
    pub investor: String,

    /// Free-text security name, e.g. "HDFC BANK LIMITED EQ NEW FV RS. 1/-"
    pub security_name: String,

    /// Number of units held
    pub quantity: f64,

    /// Value of the position on the export date
    pub current_value: f64,
}

impl Holding {
    pub fn new(
        investor: impl Into<String>,
        security_name: impl Into<String>,
        quantity: f64,
        current_value: f64,
    ) -> Self {
        Self {
            investor: investor.into().trim().to_string(),
            security_name: security_name.into().trim().to_string(),
            quantity,
            current_value,
        }
    }
}

/// All holdings of a single investor.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestorHoldings<'a> {
    pub investor: &'a str,
    pub holdings: Vec<&'a Holding>,
}

impl InvestorHoldings<'_> {
    /// Sum of `current_value` across this investor's holdings.
    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(|h| h.current_value).sum()
    }
}

/// Group holdings by investor, preserving the order in which investors first appear.
pub fn group_by_investor(holdings: &[Holding]) -> Vec<InvestorHoldings<'_>> {
    let mut groups: Vec<InvestorHoldings<'_>> = Vec::new();
    for holding in holdings {
        match groups.iter_mut().find(|g| g.investor == holding.investor) {
            Some(group) => group.holdings.push(holding),
            None => groups.push(InvestorHoldings {
                investor: &holding.investor,
                holdings: vec![holding],
            }),
        }
    }
    groups
}

/// Distinct security names in first-seen order.
pub fn unique_security_names(holdings: &[Holding]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for holding in holdings {
        if !names.iter().any(|n| n == &holding.security_name) {
            names.push(holding.security_name.clone());
        }
    }
    names
}
