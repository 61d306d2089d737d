//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Cash-flow classification of a transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashFlowKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl CashFlowKind {
    /// Classifies a transaction type by its name, case-insensitively.
    ///
    /// Historical data carries both Spanish and English type names, so both
    /// keyword sets are accepted. Unknown names return `None` and the
    /// transaction is left out of the aggregation.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "ingreso" | "income" | "revenue" => Some(Self::Income),
            "gasto" | "expense" | "cost" => Some(Self::Expense),
            _ => None,
        }
    }
}

/// A plot included in a report.
#[derive(Debug, Clone)]
pub struct PlotRef {
    /// Plot ID.
    pub plot_id: i32,
    /// Plot name.
    pub name: String,
}

/// One transaction flattened for reporting.
#[derive(Debug, Clone)]
pub struct ReportLine {
    /// Transaction ID.
    pub transaction_id: i32,
    /// Plot the transaction belongs to.
    pub plot_id: i32,
    /// Transaction date.
    pub date: NaiveDate,
    /// Transaction type name (e.g. `Income`).
    pub transaction_type: String,
    /// Category name (e.g. `Fertilizer`).
    pub category: String,
    /// Monetary value.
    pub value: Decimal,
    /// User who recorded the transaction.
    pub creator_id: i32,
}

/// Amount aggregated for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    /// Category name.
    pub category_name: String,
    /// Aggregated amount.
    pub amount: Decimal,
}

/// Financial summary for a single plot.
#[derive(Debug, Clone, Serialize)]
pub struct PlotFinancials {
    /// Plot ID.
    pub plot_id: i32,
    /// Plot name.
    pub plot_name: String,
    /// Total income.
    pub income: Decimal,
    /// Total expense.
    pub expense: Decimal,
    /// Income minus expense.
    pub balance: Decimal,
    /// Income per category, sorted by category name.
    pub income_by_category: Vec<CategoryBreakdown>,
    /// Expense per category, sorted by category name.
    pub expense_by_category: Vec<CategoryBreakdown>,
}

/// Farm-wide financial summary.
#[derive(Debug, Clone, Serialize)]
pub struct FarmSummary {
    /// Total income across all included plots.
    pub total_income: Decimal,
    /// Total expense across all included plots.
    pub total_expense: Decimal,
    /// Income minus expense.
    pub balance: Decimal,
    /// Income per category, sorted by category name.
    pub income_by_category: Vec<CategoryBreakdown>,
    /// Expense per category, sorted by category name.
    pub expense_by_category: Vec<CategoryBreakdown>,
}

/// One entry of the optional transaction history.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionHistoryItem {
    /// Transaction date.
    pub date: NaiveDate,
    /// Plot name.
    pub plot_name: String,
    /// Farm name.
    pub farm_name: String,
    /// Transaction type name.
    pub transaction_type: String,
    /// Category name.
    pub transaction_category: String,
    /// Name of the user who recorded the transaction.
    pub creator_name: String,
    /// Monetary value.
    pub value: Decimal,
}

/// A complete financial report.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialReport {
    /// Farm name.
    pub farm_name: String,
    /// Names of the plots included.
    pub plots_included: Vec<String>,
    /// Human-readable period, `start to end`.
    pub period: String,
    /// Per-plot summaries.
    pub plot_financials: Vec<PlotFinancials>,
    /// Farm-wide summary.
    pub farm_summary: FarmSummary,
    /// Optional analysis text (not produced yet).
    pub analysis: Option<String>,
    /// Optional transaction history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_history: Option<Vec<TransactionHistoryItem>>,
}
