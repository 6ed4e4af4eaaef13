use crate::aggregator::{CategoryBucket, PeriodTotals};
use crate::config::AlertConfig;
use crate::insights::Severity;
use crate::loans::LoanSummary;
use crate::utils::{format_currency, percent_of};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    HighSpending,
    NegativeBalance,
    DebtLoad,
    OverdueLoans,
    Leisure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

pub struct AlertEvaluator<'a> {
    config: &'a AlertConfig,
    currency: &'a str,
}

impl<'a> AlertEvaluator<'a> {
    pub fn new(config: &'a AlertConfig, currency: &'a str) -> Self {
        Self { config, currency }
    }

    pub fn evaluate(
        &self,
        totals: &PeriodTotals,
        categories: &BTreeMap<String, CategoryBucket>,
        loans: &LoanSummary,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let income = totals.income;
        let expenses = totals.expenses;

        if income > 0.0 && expenses > income * self.config.high_spending_share {
            alerts.push(Alert {
                kind: AlertKind::HighSpending,
                title: "High Spending Alert".to_string(),
                message: format!(
                    "Your expenses are {:.1}% of your income.",
                    percent_of(expenses, income)
                ),
                severity: Severity::Danger,
            });
        }

        let balance = totals.net();
        if balance < 0.0 {
            alerts.push(Alert {
                kind: AlertKind::NegativeBalance,
                title: "Deficit Alert".to_string(),
                message: format!(
                    "Your account balance is negative: {}",
                    format_currency(balance.abs(), self.currency)
                ),
                severity: Severity::Danger,
            });
        }

        if loans.outstanding_debt > 0.0 {
            alerts.push(self.debt_alert(loans.outstanding_debt, income));
        }

        if loans.overdue_count > 0 {
            alerts.push(Alert {
                kind: AlertKind::OverdueLoans,
                title: "Unpaid Loans Past Due".to_string(),
                message: format!(
                    "{} unpaid loan(s) past due, {} in total.",
                    loans.overdue_count,
                    format_currency(loans.overdue_amount, self.currency)
                ),
                severity: Severity::Danger,
            });
        }

        // First configured leisure category with any spending; the others are not added
        let leisure = self
            .config
            .leisure_categories
            .iter()
            .filter_map(|name| categories.get(name))
            .map(|bucket| bucket.amount)
            .find(|amount| *amount != 0.0)
            .unwrap_or(0.0);
        if income > 0.0 && leisure / income > self.config.leisure_share {
            alerts.push(Alert {
                kind: AlertKind::Leisure,
                title: "Leisure Spending".to_string(),
                message: format!(
                    "Warning: Leisure spending exceeds {}% of your income!",
                    self.config.leisure_share * 100.0
                ),
                severity: Severity::Warning,
            });
        }

        alerts
    }

    fn debt_alert(&self, debt: f64, income: f64) -> Alert {
        let ratio = percent_of(debt, income);
        let severity = if ratio > self.config.debt_high_percent {
            Severity::Danger
        } else if ratio > self.config.debt_elevated_percent {
            Severity::Warning
        } else {
            Severity::Info
        };

        let message = if income > 0.0 {
            format!(
                "You have {} in loan debt ({:.1}% of income).",
                format_currency(debt, self.currency),
                ratio
            )
        } else {
            format!("You have {} in loan debt.", format_currency(debt, self.currency))
        };

        Alert {
            kind: AlertKind::DebtLoad,
            title: "Outstanding Loans".to_string(),
            message,
            severity,
        }
    }
}
