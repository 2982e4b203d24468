pub mod registry;
pub mod traits;

// Provider implementations
pub mod alphavantage;
pub mod local_csv;
pub mod yahoo_finance;
