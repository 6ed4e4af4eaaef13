use crate::aggregator::{PeriodBucket, PeriodTotals};
use crate::config::HealthConfig;
use crate::utils::round_one_decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    pub fn from_percent(percent: f64) -> Self {
        if percent > 0.0 {
            TrendDirection::Up
        } else if percent < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Up => "↑",
            TrendDirection::Down => "↓",
            TrendDirection::Flat => "→",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Trend {
    /// Full-precision change in percent.
    pub percent: f64,
    pub direction: TrendDirection,
}

impl Trend {
    /// `(last - previous) / previous * 100`, or a flat `0` when `previous` is not positive.
    pub fn between(previous: f64, last: f64) -> Self {
        let percent = if previous > 0.0 {
            (last - previous) / previous * 100.0
        } else {
            0.0
        };
        Self {
            percent,
            direction: TrendDirection::from_percent(percent),
        }
    }

    pub fn display_percent(&self) -> f64 {
        round_one_decimal(self.percent)
    }

    /// e.g. `↓ 20.0%`
    pub fn label(&self) -> String {
        format!("{} {:.1}%", self.direction.arrow(), self.percent.abs())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrendSummary {
    pub income: Trend,
    pub expenses: Trend,
    pub savings: Trend,
}

/// Compares the last two buckets. Needs at least two; `buckets` must be in
/// chronological order, which [`crate::aggregator::Aggregates`] guarantees.
pub fn analyze_trends(buckets: &[PeriodBucket]) -> Option<TrendSummary> {
    let [.., previous, last] = buckets else {
        return None;
    };
    let (p, l): (&PeriodTotals, &PeriodTotals) = (&previous.totals, &last.totals);

    Some(TrendSummary {
        income: Trend::between(p.income, l.income),
        expenses: Trend::between(p.expenses, l.expenses),
        savings: Trend::between(p.savings, l.savings),
    })
}

/// Population standard deviation (divides by N). Zero for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IncomeStability {
    pub mean_income: f64,
    pub std_dev: f64,
    /// Points added to the health score, within `[0, stability_cap]`.
    pub contribution: f64,
}

/// Scores how evenly income is spread across buckets.
///
/// The contribution is `max(0, cap - std_dev / mean * penalty)` and only counts once
/// there are two buckets to compare; a single bucket carries no stability signal.
pub fn income_stability(incomes: &[f64], config: &HealthConfig) -> IncomeStability {
    if incomes.is_empty() {
        return IncomeStability {
            mean_income: 0.0,
            std_dev: 0.0,
            contribution: 0.0,
        };
    }

    let mean_income = incomes.iter().sum::<f64>() / incomes.len() as f64;
    let std_dev = population_std_dev(incomes);

    let contribution = if incomes.len() >= 2 && mean_income > 0.0 {
        (config.stability_cap - std_dev / mean_income * config.stability_penalty)
            .clamp(0.0, config.stability_cap)
    } else {
        0.0
    };

    IncomeStability {
        mean_income,
        std_dev,
        contribution,
    }
}
