pub mod analytics;
pub mod chart;
pub mod fund;
pub mod holding;
pub mod performance;
pub mod price;
pub mod settings;
pub mod ticker;
pub mod valuation;
