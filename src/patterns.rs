use crate::schema::{Transaction, TransactionKind};
use crate::utils::{weekday_name, WEEKDAYS_FROM_SUNDAY};
use chrono::{Datelike, Weekday};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeekdaySpending {
    #[schemars(with = "String")]
    pub day: Weekday,
    pub name: String,
    pub amount: f64,
    pub count: usize,
}

/// Expense transaction counts by day of month: 1-10, 11-20, 21-31.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MonthThirds {
    pub early: usize,
    pub mid: usize,
    pub late: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpendingPatterns {
    /// Always seven entries, Sunday first.
    pub by_weekday: Vec<WeekdaySpending>,
    pub peak_day: Option<WeekdaySpending>,
    pub month_thirds: MonthThirds,
    pub expense_count: usize,
    pub average_expense: f64,
}

impl SpendingPatterns {
    pub fn from_transactions(transactions: &[&Transaction]) -> Self {
        let mut by_weekday: Vec<WeekdaySpending> = WEEKDAYS_FROM_SUNDAY
            .iter()
            .map(|&day| WeekdaySpending {
                day,
                name: weekday_name(day).to_string(),
                amount: 0.0,
                count: 0,
            })
            .collect();
        let mut month_thirds = MonthThirds::default();
        let mut expense_count = 0usize;
        let mut expense_total = 0.0;

        for tx in transactions.iter().filter(|t| t.kind == TransactionKind::Expense) {
            let amount = tx.amount_value();
            let slot = &mut by_weekday[tx.occurred_on.weekday().num_days_from_sunday() as usize];
            slot.amount += amount;
            slot.count += 1;

            match tx.occurred_on.day() {
                1..=10 => month_thirds.early += 1,
                11..=20 => month_thirds.mid += 1,
                _ => month_thirds.late += 1,
            }

            expense_count += 1;
            expense_total += amount;
        }

        // Strict `>` keeps the first day in Sunday..Saturday order on ties
        let peak_day = by_weekday
            .iter()
            .filter(|d| d.count > 0)
            .fold(None::<&WeekdaySpending>, |best, d| match best {
                Some(b) if b.amount >= d.amount => Some(b),
                _ => Some(d),
            })
            .cloned();

        let average_expense = if expense_count > 0 {
            expense_total / expense_count as f64
        } else {
            0.0
        };

        Self {
            by_weekday,
            peak_day,
            month_thirds,
            expense_count,
            average_expense,
        }
    }

    pub fn weekday_amounts(&self) -> Vec<f64> {
        self.by_weekday.iter().map(|d| d.amount).collect()
    }
}
