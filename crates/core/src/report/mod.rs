//! Financial report generation.
//!
//! Aggregates the transactions of one farm's plots over a date range into
//! per-plot and farm-wide income/expense summaries with category
//! breakdowns, plus an optional transaction history.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ReportService;
pub use types::{
    CashFlowKind, CategoryBreakdown, FarmSummary, FinancialReport, PlotFinancials, PlotRef,
    ReportLine, TransactionHistoryItem,
};
