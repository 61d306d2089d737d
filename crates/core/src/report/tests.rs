//! Tests for report aggregation.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::ReportService;
use super::types::{CashFlowKind, PlotRef, ReportLine};

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid test date")
}

fn line(
    transaction_id: i32,
    plot_id: i32,
    transaction_type: &str,
    category: &str,
    value: Decimal,
) -> ReportLine {
    ReportLine {
        transaction_id,
        plot_id,
        date: date("2025-03-10"),
        transaction_type: transaction_type.to_string(),
        category: category.to_string(),
        value,
        creator_id: 42,
    }
}

fn sample_plots() -> Vec<PlotRef> {
    vec![
        PlotRef {
            plot_id: 1,
            name: "North Plot".to_string(),
        },
        PlotRef {
            plot_id: 2,
            name: "South Plot".to_string(),
        },
    ]
}

#[rstest]
#[case("Income", Some(CashFlowKind::Income))]
#[case("income", Some(CashFlowKind::Income))]
#[case("REVENUE", Some(CashFlowKind::Income))]
#[case("Ingreso", Some(CashFlowKind::Income))]
#[case("Expense", Some(CashFlowKind::Expense))]
#[case("cost", Some(CashFlowKind::Expense))]
#[case("Gasto", Some(CashFlowKind::Expense))]
#[case("GASTO", Some(CashFlowKind::Expense))]
#[case("Transfer", None)]
#[case("", None)]
fn test_cash_flow_classification(#[case] name: &str, #[case] expected: Option<CashFlowKind>) {
    assert_eq!(CashFlowKind::from_type_name(name), expected);
}

#[test]
fn test_plot_balance_is_income_minus_expense() {
    let lines = vec![
        line(1, 1, "Income", "Coffee sale", dec!(1000.00)),
        line(2, 1, "Expense", "Fertilizer", dec!(350.50)),
        line(3, 1, "Expense", "Labor", dec!(149.50)),
    ];

    let report = ReportService::generate(
        "La Esperanza",
        &sample_plots(),
        (date("2025-03-01"), date("2025-03-31")),
        &lines,
        None,
    );

    let north = &report.plot_financials[0];
    assert_eq!(north.income, dec!(1000.00));
    assert_eq!(north.expense, dec!(500.00));
    assert_eq!(north.balance, dec!(500.00));

    // The second plot had no transactions but still gets a summary.
    let south = &report.plot_financials[1];
    assert_eq!(south.income, Decimal::ZERO);
    assert_eq!(south.expense, Decimal::ZERO);
    assert_eq!(south.balance, Decimal::ZERO);
}

#[test]
fn test_category_breakdowns_sum_to_section_totals() {
    let lines = vec![
        line(1, 1, "Income", "Coffee sale", dec!(700.00)),
        line(2, 1, "Income", "Subsidy", dec!(300.00)),
        line(3, 1, "Income", "Coffee sale", dec!(250.00)),
        line(4, 1, "Expense", "Fertilizer", dec!(100.00)),
    ];

    let report = ReportService::generate(
        "La Esperanza",
        &sample_plots(),
        (date("2025-03-01"), date("2025-03-31")),
        &lines,
        None,
    );

    let north = &report.plot_financials[0];
    let breakdown_sum: Decimal = north.income_by_category.iter().map(|c| c.amount).sum();
    assert_eq!(breakdown_sum, north.income);

    // Categories are merged and sorted by name.
    let names: Vec<&str> = north
        .income_by_category
        .iter()
        .map(|c| c.category_name.as_str())
        .collect();
    assert_eq!(names, vec!["Coffee sale", "Subsidy"]);
    assert_eq!(north.income_by_category[0].amount, dec!(950.00));
}

#[test]
fn test_farm_summary_spans_all_plots() {
    let lines = vec![
        line(1, 1, "Income", "Coffee sale", dec!(1000.00)),
        line(2, 2, "Income", "Coffee sale", dec!(500.00)),
        line(3, 2, "Expense", "Labor", dec!(200.00)),
    ];

    let report = ReportService::generate(
        "La Esperanza",
        &sample_plots(),
        (date("2025-03-01"), date("2025-03-31")),
        &lines,
        None,
    );

    assert_eq!(report.farm_summary.total_income, dec!(1500.00));
    assert_eq!(report.farm_summary.total_expense, dec!(200.00));
    assert_eq!(report.farm_summary.balance, dec!(1300.00));
    assert_eq!(report.plots_included, vec!["North Plot", "South Plot"]);
    assert_eq!(report.period, "2025-03-01 to 2025-03-31");
}

#[test]
fn test_unknown_types_and_foreign_plots_are_skipped() {
    let lines = vec![
        line(1, 1, "Income", "Coffee sale", dec!(100.00)),
        line(2, 1, "Transfer", "Misc", dec!(999.00)),
        line(3, 77, "Income", "Coffee sale", dec!(999.00)),
    ];

    let report = ReportService::generate(
        "La Esperanza",
        &sample_plots(),
        (date("2025-03-01"), date("2025-03-31")),
        &lines,
        None,
    );

    assert_eq!(report.farm_summary.total_income, dec!(100.00));
    assert_eq!(report.farm_summary.total_expense, Decimal::ZERO);
}

#[test]
fn test_history_resolves_creator_names_with_fallback() {
    let mut lines = vec![line(1, 1, "Income", "Coffee sale", dec!(100.00))];
    lines[0].creator_id = 42;
    let mut unknown_creator = line(2, 2, "Expense", "Labor", dec!(50.00));
    unknown_creator.creator_id = 99;
    lines.push(unknown_creator);

    let creator_names = HashMap::from([(42, "Ana".to_string())]);

    let report = ReportService::generate(
        "La Esperanza",
        &sample_plots(),
        (date("2025-03-01"), date("2025-03-31")),
        &lines,
        Some(&creator_names),
    );

    let history = report.transaction_history.expect("history was requested");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].creator_name, "Ana");
    assert_eq!(history[0].farm_name, "La Esperanza");
    assert_eq!(history[0].plot_name, "North Plot");
    assert_eq!(history[1].creator_name, "User #99");
}

#[test]
fn test_history_absent_when_not_requested() {
    let report = ReportService::generate(
        "La Esperanza",
        &sample_plots(),
        (date("2025-03-01"), date("2025-03-31")),
        &[],
        None,
    );
    assert!(report.transaction_history.is_none());
}

proptest! {
    /// Farm totals always equal the sum of the per-plot totals, and every
    /// balance is income minus expense.
    #[test]
    fn test_farm_totals_equal_sum_of_plot_totals(
        values in prop::collection::vec((1i32..=4, 0u8..2, 1u64..100_000), 0..50),
    ) {
        let plots: Vec<PlotRef> = (1..=4)
            .map(|id| PlotRef { plot_id: id, name: format!("Plot {id}") })
            .collect();

        let lines: Vec<ReportLine> = values
            .iter()
            .enumerate()
            .map(|(i, (plot_id, kind, cents))| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let id = i as i32;
                let transaction_type = if *kind == 0 { "Income" } else { "Expense" };
                #[allow(clippy::cast_possible_wrap)]
                let value = Decimal::new(*cents as i64, 2);
                line(id, *plot_id, transaction_type, "Misc", value)
            })
            .collect();

        let report = ReportService::generate(
            "Farm",
            &plots,
            (date("2025-01-01"), date("2025-12-31")),
            &lines,
            None,
        );

        let plot_income: Decimal = report.plot_financials.iter().map(|p| p.income).sum();
        let plot_expense: Decimal = report.plot_financials.iter().map(|p| p.expense).sum();

        prop_assert_eq!(report.farm_summary.total_income, plot_income);
        prop_assert_eq!(report.farm_summary.total_expense, plot_expense);
        prop_assert_eq!(
            report.farm_summary.balance,
            plot_income - plot_expense
        );

        for plot in &report.plot_financials {
            prop_assert_eq!(plot.balance, plot.income - plot.expense);
        }
    }
}
