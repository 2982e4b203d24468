pub mod chart_service;
pub mod fund_service;
pub mod performance_service;
pub mod price_service;
pub mod report_service;
pub mod valuation_service;
