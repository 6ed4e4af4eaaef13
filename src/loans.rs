use crate::schema::{Loan, LoanKind, LoanStatus, Transaction, TransactionKind};
use crate::utils::{days_between, format_currency};
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanState {
    Paid,
    Overdue,
    DueSoon,
    Active,
}

impl Loan {
    pub fn amount_value(&self) -> f64 {
        self.amount.value()
    }

    pub fn is_outstanding(&self) -> bool {
        self.status != LoanStatus::Paid
    }

    /// A due date on or before `as_of` is overdue; due soon covers the next
    /// `due_soon_days` days, starting tomorrow.
    pub fn state(&self, as_of: NaiveDate, due_soon_days: i64) -> LoanState {
        if !self.is_outstanding() {
            return LoanState::Paid;
        }
        match self.due_date {
            Some(due) if due <= as_of => LoanState::Overdue,
            Some(due) if days_between(as_of, due) <= due_soon_days => LoanState::DueSoon,
            _ => LoanState::Active,
        }
    }

    /// What repaying this loan over a year would add to `monthly_expenses`.
    pub fn impact(&self, monthly_expenses: f64, currency: &str) -> LoanImpact {
        LoanImpact::analyze(self.amount_value(), monthly_expenses, currency)
    }
}

/// Repayment spread used for impact analysis.
pub const REPAYMENT_MONTHS: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImpactRisk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoanImpact {
    pub monthly_payment: f64,
    /// Monthly payment as a percentage of current monthly expenses; zero without expenses.
    pub expense_increase_percent: f64,
    pub risk: ImpactRisk,
    pub message: String,
}

impl LoanImpact {
    pub fn analyze(amount: f64, monthly_expenses: f64, currency: &str) -> Self {
        let monthly_payment = amount / REPAYMENT_MONTHS;
        let expense_increase_percent = if monthly_expenses > 0.0 {
            monthly_payment / monthly_expenses * 100.0
        } else {
            0.0
        };
        let payment = format_currency(monthly_payment, currency);

        let (risk, message) = if expense_increase_percent > 50.0 {
            (
                ImpactRisk::High,
                format!(
                    "CRITICAL: This loan will increase your monthly expenses by {:.1}%. This is unsustainable.",
                    expense_increase_percent
                ),
            )
        } else if expense_increase_percent > 30.0 {
            (
                ImpactRisk::Medium,
                format!(
                    "Monthly impact: {} (+{:.1}% increase). Be careful with your budget.",
                    payment, expense_increase_percent
                ),
            )
        } else {
            (
                ImpactRisk::Low,
                format!(
                    "Monthly impact: {} (+{:.1}% increase in expenses)",
                    payment, expense_increase_percent
                ),
            )
        };

        Self {
            monthly_payment,
            expense_increase_percent,
            risk,
            message,
        }
    }
}

/// Total expenses divided by the number of calendar months that hold any transaction.
pub fn average_monthly_expenses(transactions: &[&Transaction]) -> f64 {
    let months: BTreeSet<(i32, u32)> = transactions
        .iter()
        .map(|t| (t.occurred_on.year(), t.occurred_on.month()))
        .collect();
    let expenses: f64 = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
        .map(|t| t.amount_value())
        .sum();

    expenses / months.len().max(1) as f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoanKindTotal {
    pub kind: LoanKind,
    pub outstanding: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoanEntry {
    pub id: String,
    pub kind: LoanKind,
    pub amount: f64,
    pub due_date: Option<NaiveDate>,
    pub state: LoanState,
    /// Filled for unpaid loans once monthly expenses are known.
    #[serde(default)]
    pub impact: Option<LoanImpact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoanSummary {
    /// Sum of unpaid loan amounts.
    pub outstanding_debt: f64,
    pub outstanding_count: usize,
    pub overdue_count: usize,
    pub overdue_amount: f64,
    pub due_soon_count: usize,
    pub by_kind: Vec<LoanKindTotal>,
    pub entries: Vec<LoanEntry>,
}

impl LoanSummary {
    pub fn from_loans(loans: &[Loan], as_of: NaiveDate, due_soon_days: i64) -> Self {
        let mut summary = LoanSummary::default();

        for loan in loans {
            let amount = loan.amount_value();
            let state = loan.state(as_of, due_soon_days);

            if loan.is_outstanding() {
                summary.outstanding_debt += amount;
                summary.outstanding_count += 1;

                match summary.by_kind.iter_mut().find(|k| k.kind == loan.kind) {
                    Some(total) => {
                        total.outstanding += amount;
                        total.count += 1;
                    }
                    None => summary.by_kind.push(LoanKindTotal {
                        kind: loan.kind,
                        outstanding: amount,
                        count: 1,
                    }),
                }
            }

            match state {
                LoanState::Overdue => {
                    summary.overdue_count += 1;
                    summary.overdue_amount += amount;
                }
                LoanState::DueSoon => summary.due_soon_count += 1,
                _ => {}
            }

            summary.entries.push(LoanEntry {
                id: loan.id.clone(),
                kind: loan.kind,
                amount,
                due_date: loan.due_date,
                state,
                impact: None,
            });
        }

        summary
    }

    /// Attaches a [`LoanImpact`] to every loan that is still owed.
    pub fn with_impacts(mut self, monthly_expenses: f64, currency: &str) -> Self {
        for entry in &mut self.entries {
            if entry.state != LoanState::Paid {
                entry.impact = Some(LoanImpact::analyze(entry.amount, monthly_expenses, currency));
            }
        }
        self
    }

    /// A bare debt figure with no loan detail.
    pub fn from_total(total: f64) -> Self {
        let outstanding_debt = if total.is_finite() { total } else { 0.0 };
        Self {
            outstanding_debt,
            ..Self::default()
        }
    }
}

/// What the caller knows about outstanding debt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DebtInput {
    #[default]
    None,
    Total(f64),
    Loans(Vec<Loan>),
}

impl DebtInput {
    pub fn summarize(&self, as_of: NaiveDate, due_soon_days: i64) -> LoanSummary {
        match self {
            DebtInput::None => LoanSummary::default(),
            DebtInput::Total(total) => LoanSummary::from_total(*total),
            DebtInput::Loans(loans) => LoanSummary::from_loans(loans, as_of, due_soon_days),
        }
    }
}

impl From<f64> for DebtInput {
    fn from(total: f64) -> Self {
        DebtInput::Total(total)
    }
}

impl From<Vec<Loan>> for DebtInput {
    fn from(loans: Vec<Loan>) -> Self {
        DebtInput::Loans(loans)
    }
}
