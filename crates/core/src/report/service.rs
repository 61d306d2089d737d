//! Report aggregation service.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{
    CashFlowKind, CategoryBreakdown, FarmSummary, FinancialReport, PlotFinancials, PlotRef,
    ReportLine, TransactionHistoryItem,
};

/// Running totals for one side (income or expense) of an aggregation.
#[derive(Debug, Default)]
struct Section {
    total: Decimal,
    by_category: BTreeMap<String, Decimal>,
}

impl Section {
    fn add(&mut self, category: &str, value: Decimal) {
        self.total += value;
        *self
            .by_category
            .entry(category.to_string())
            .or_insert(Decimal::ZERO) += value;
    }

    fn breakdown(&self) -> Vec<CategoryBreakdown> {
        self.by_category
            .iter()
            .map(|(name, amount)| CategoryBreakdown {
                category_name: name.clone(),
                amount: *amount,
            })
            .collect()
    }
}

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a financial report for one farm's plots.
    ///
    /// Lines whose plot is not in `plots` or whose transaction type cannot
    /// be classified as income or expense are skipped. When
    /// `creator_names` is supplied, a transaction history is attached;
    /// creators missing from the map degrade to `User #{id}`.
    #[must_use]
    pub fn generate(
        farm_name: &str,
        plots: &[PlotRef],
        period: (NaiveDate, NaiveDate),
        lines: &[ReportLine],
        creator_names: Option<&HashMap<i32, String>>,
    ) -> FinancialReport {
        let plot_names: HashMap<i32, &str> = plots
            .iter()
            .map(|p| (p.plot_id, p.name.as_str()))
            .collect();

        let mut per_plot: HashMap<i32, (Section, Section)> = plots
            .iter()
            .map(|p| (p.plot_id, (Section::default(), Section::default())))
            .collect();
        let mut farm_income = Section::default();
        let mut farm_expense = Section::default();

        for line in lines {
            let Some((income, expense)) = per_plot.get_mut(&line.plot_id) else {
                continue;
            };

            match CashFlowKind::from_type_name(&line.transaction_type) {
                Some(CashFlowKind::Income) => {
                    income.add(&line.category, line.value);
                    farm_income.add(&line.category, line.value);
                }
                Some(CashFlowKind::Expense) => {
                    expense.add(&line.category, line.value);
                    farm_expense.add(&line.category, line.value);
                }
                None => {}
            }
        }

        // One summary per requested plot, in request order.
        let plot_financials = plots
            .iter()
            .map(|plot| {
                let (income, expense) = &per_plot[&plot.plot_id];
                PlotFinancials {
                    plot_id: plot.plot_id,
                    plot_name: plot.name.clone(),
                    income: income.total,
                    expense: expense.total,
                    balance: income.total - expense.total,
                    income_by_category: income.breakdown(),
                    expense_by_category: expense.breakdown(),
                }
            })
            .collect();

        let farm_summary = FarmSummary {
            total_income: farm_income.total,
            total_expense: farm_expense.total,
            balance: farm_income.total - farm_expense.total,
            income_by_category: farm_income.breakdown(),
            expense_by_category: farm_expense.breakdown(),
        };

        let transaction_history = creator_names
            .map(|names| Self::history(farm_name, &plot_names, lines, names));

        FinancialReport {
            farm_name: farm_name.to_string(),
            plots_included: plots.iter().map(|p| p.name.clone()).collect(),
            period: format!("{} to {}", period.0, period.1),
            plot_financials,
            farm_summary,
            analysis: None,
            transaction_history,
        }
    }

    /// Builds the transaction history for the included plots.
    fn history(
        farm_name: &str,
        plot_names: &HashMap<i32, &str>,
        lines: &[ReportLine],
        creator_names: &HashMap<i32, String>,
    ) -> Vec<TransactionHistoryItem> {
        lines
            .iter()
            .filter_map(|line| {
                let plot_name = plot_names.get(&line.plot_id)?;

                let creator_name = creator_names
                    .get(&line.creator_id)
                    .cloned()
                    .unwrap_or_else(|| format!("User #{}", line.creator_id));

                Some(TransactionHistoryItem {
                    date: line.date,
                    plot_name: (*plot_name).to_string(),
                    farm_name: farm_name.to_string(),
                    transaction_type: line.transaction_type.clone(),
                    transaction_category: line.category.clone(),
                    creator_name,
                    value: line.value,
                })
            })
            .collect()
    }
}
