use crate::config::SavingsGoalConfig;
use crate::schema::{SavingsTarget, Transaction, TransactionKind};
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Reached,
    OnTrack,
    BelowGoal,
}

impl GoalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GoalStatus::Reached => "Goal Reached!",
            GoalStatus::OnTrack => "On Track",
            GoalStatus::BelowGoal => "Below Goal",
        }
    }
}

/// Savings progress for the calendar month that contains the reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SavingsGoal {
    pub year: i32,
    pub month: u32,
    pub month_income: f64,
    pub month_expenses: f64,
    /// `max(0, income - expenses)` for the month.
    pub month_savings: f64,
    pub goal: f64,
    /// Within `[0, 100]`; zero when there is no goal.
    pub progress_percent: f64,
    pub status: GoalStatus,
    pub projected_next_month: f64,
}

impl SavingsGoal {
    /// Uses every transaction it is given that falls in the month of `as_of`,
    /// independently of the analysis window.
    pub fn for_month(
        transactions: &[&Transaction],
        as_of: NaiveDate,
        config: &SavingsGoalConfig,
    ) -> Self {
        let (year, month) = (as_of.year(), as_of.month());

        let (month_income, month_expenses) = transactions
            .iter()
            .filter(|t| t.occurred_on.year() == year && t.occurred_on.month() == month)
            .fold((0.0, 0.0), |(income, expenses), t| match t.kind {
                TransactionKind::Income => (income + t.amount_value(), expenses),
                TransactionKind::Expense => (income, expenses + t.amount_value()),
                TransactionKind::Savings => (income, expenses),
            });

        let month_savings = (month_income - month_expenses).max(0.0);
        let goal = month_income * config.target_share;
        let progress_percent = if goal > 0.0 {
            (month_savings / goal * 100.0).min(100.0)
        } else {
            0.0
        };

        let status = if progress_percent >= 100.0 {
            GoalStatus::Reached
        } else if progress_percent >= 50.0 {
            GoalStatus::OnTrack
        } else {
            GoalStatus::BelowGoal
        };

        Self {
            year,
            month,
            month_income,
            month_expenses,
            month_savings,
            goal,
            progress_percent,
            status,
            projected_next_month: month_savings * config.projection_factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SavingsTargetProgress {
    pub name: String,
    pub target: f64,
    pub saved: f64,
    /// `min(100, saved / target * 100)`; zero for a non-positive target.
    pub progress_percent: f64,
}

impl SavingsTarget {
    pub fn progress(&self, saved: f64) -> SavingsTargetProgress {
        let target = self.target.value();
        let progress_percent = if target > 0.0 {
            (saved / target * 100.0).min(100.0)
        } else {
            0.0
        };

        SavingsTargetProgress {
            name: self.name.clone(),
            target,
            saved,
            progress_percent,
        }
    }
}

/// Measures every target against the savings-kind total of `transactions`, whatever their date.
pub fn savings_target_progress(
    targets: &[SavingsTarget],
    transactions: &[&Transaction],
) -> Vec<SavingsTargetProgress> {
    let saved: f64 = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Savings)
        .map(|t| t.amount_value())
        .sum();

    targets.iter().map(|target| target.progress(saved)).collect()
}
