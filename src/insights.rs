use crate::aggregator::{CategoryBucket, PeriodBucket, PeriodTotals};
use crate::config::InsightConfig;
use crate::patterns::SpendingPatterns;
use crate::utils::{format_currency, percent_of, round_currency};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Primary,
    Success,
    Info,
    Warning,
    Danger,
}

impl Severity {
    /// Display colour as a CSS hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Primary => "#2B9FD9",
            Severity::Success => "#10b981",
            Severity::Info => "#3b82f6",
            Severity::Warning => "#f59e0b",
            Severity::Danger => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InsightIcon {
    Chart,
    Check,
    Warning,
    Info,
}

impl InsightIcon {
    pub fn symbol(&self) -> &'static str {
        match self {
            InsightIcon::Chart => "📊",
            InsightIcon::Check => "✓",
            InsightIcon::Warning => "⚠",
            InsightIcon::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    TopCategory,
    StrongSavings,
    LowSavings,
    Deficit,
    Surplus,
    HighVolume,
    PeakSpendingDay,
    MonthlyPattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub icon: InsightIcon,
    /// The figure the insight is about (shortfall, share, rate...), unrounded.
    pub metric: Option<f64>,
}

/// Read-only view of one analysis run that every rule is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct InsightSnapshot<'a> {
    pub buckets: &'a [PeriodBucket],
    pub categories: &'a BTreeMap<String, CategoryBucket>,
    pub totals: PeriodTotals,
    pub patterns: &'a SpendingPatterns,
}

impl<'a> InsightSnapshot<'a> {
    fn savings_rate(&self) -> f64 {
        percent_of(self.totals.savings, self.totals.income)
    }

    fn transactions_per_bucket(&self) -> f64 {
        self.totals.transaction_count as f64 / self.buckets.len().max(1) as f64
    }

    /// Largest expense category; on equal amounts the one seen first wins.
    fn top_category(&self) -> Option<(&'a str, &'a CategoryBucket)> {
        self.categories
            .iter()
            .fold(None, |best: Option<(&'a str, &'a CategoryBucket)>, (name, bucket)| {
                match best {
                    Some((_, b))
                        if b.amount > bucket.amount
                            || (b.amount == bucket.amount && b.first_seen <= bucket.first_seen) =>
                    {
                        best
                    }
                    _ => Some((name.as_str(), bucket)),
                }
            })
    }
}

/// One independent predicate/producer pair. Rules never look at each other's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InsightRule {
    TopCategory,
    SavingsRate,
    Balance,
    TransactionVolume,
    PeakSpendingDay,
    MonthlyPattern,
}

impl InsightRule {
    pub const DEFAULT_ORDER: [InsightRule; 6] = [
        InsightRule::TopCategory,
        InsightRule::SavingsRate,
        InsightRule::Balance,
        InsightRule::TransactionVolume,
        InsightRule::PeakSpendingDay,
        InsightRule::MonthlyPattern,
    ];

    pub fn evaluate(
        &self,
        snapshot: &InsightSnapshot<'_>,
        config: &InsightConfig,
        currency: &str,
    ) -> Option<Insight> {
        match self {
            InsightRule::TopCategory => {
                let (name, bucket) = snapshot.top_category()?;
                let share = percent_of(bucket.amount, snapshot.totals.expenses);
                Some(Insight {
                    kind: InsightKind::TopCategory,
                    title: "Top Spending Category".to_string(),
                    description: format!(
                        "{} accounts for {:.1}% of your expenses ({})",
                        name,
                        share,
                        format_currency(bucket.amount, currency)
                    ),
                    severity: Severity::Primary,
                    icon: InsightIcon::Chart,
                    metric: Some(share),
                })
            }

            InsightRule::SavingsRate => {
                let rate = snapshot.savings_rate();
                if rate >= config.strong_savings_rate {
                    Some(Insight {
                        kind: InsightKind::StrongSavings,
                        title: "Excellent Savings".to_string(),
                        description: format!(
                            "You're saving {:.1}% of your income. Keep it up!",
                            rate
                        ),
                        severity: Severity::Success,
                        icon: InsightIcon::Check,
                        metric: Some(rate),
                    })
                } else if rate < config.low_savings_rate && snapshot.totals.income > 0.0 {
                    Some(Insight {
                        kind: InsightKind::LowSavings,
                        title: "Increase Savings".to_string(),
                        description: format!(
                            "Try to save at least {}-{}% of your income. Currently at {:.1}%",
                            config.low_savings_rate, config.strong_savings_rate, rate
                        ),
                        severity: Severity::Warning,
                        icon: InsightIcon::Warning,
                        metric: Some(rate),
                    })
                } else {
                    None
                }
            }

            InsightRule::Balance => {
                let totals = &snapshot.totals;
                if totals.expenses > totals.income {
                    let shortfall = totals.expenses - totals.income;
                    Some(Insight {
                        kind: InsightKind::Deficit,
                        title: "Budget Alert".to_string(),
                        description: format!(
                            "You're spending {} more than you earn. Review your expenses.",
                            format_currency(shortfall, currency)
                        ),
                        severity: Severity::Danger,
                        icon: InsightIcon::Warning,
                        metric: Some(shortfall),
                    })
                } else {
                    let surplus = totals.income - totals.expenses;
                    Some(Insight {
                        kind: InsightKind::Surplus,
                        title: "Positive Balance".to_string(),
                        description: format!(
                            "You have a surplus of {} this period.",
                            format_currency(surplus, currency)
                        ),
                        severity: Severity::Success,
                        icon: InsightIcon::Check,
                        metric: Some(surplus),
                    })
                }
            }

            InsightRule::TransactionVolume => {
                let average = snapshot.transactions_per_bucket();
                (average > config.high_volume_per_bucket).then(|| Insight {
                    kind: InsightKind::HighVolume,
                    title: "High Transaction Volume".to_string(),
                    description: format!(
                        "You average {} transactions per period. Consider consolidating purchases.",
                        round_currency(average)
                    ),
                    severity: Severity::Info,
                    icon: InsightIcon::Info,
                    metric: Some(average),
                })
            }

            InsightRule::PeakSpendingDay => {
                let peak = snapshot.patterns.peak_day.as_ref()?;
                Some(Insight {
                    kind: InsightKind::PeakSpendingDay,
                    title: "Peak Spending Day".to_string(),
                    description: format!(
                        "You spend the most on {}s ({} in total)",
                        peak.name,
                        format_currency(peak.amount, currency)
                    ),
                    severity: Severity::Primary,
                    icon: InsightIcon::Chart,
                    metric: Some(peak.amount),
                })
            }

            InsightRule::MonthlyPattern => {
                if snapshot.patterns.expense_count == 0 {
                    return None;
                }
                let thirds = snapshot.patterns.month_thirds;
                Some(Insight {
                    kind: InsightKind::MonthlyPattern,
                    title: "Monthly Pattern".to_string(),
                    description: format!(
                        "Early month (1-10): {} expenses, mid month (11-20): {}, late month (21-31): {}",
                        thirds.early, thirds.mid, thirds.late
                    ),
                    severity: Severity::Info,
                    icon: InsightIcon::Info,
                    metric: None,
                })
            }
        }
    }
}

/// Runs an ordered rule list against a snapshot. Output order is rule order.
pub struct InsightGenerator<'a> {
    config: &'a InsightConfig,
    currency: &'a str,
    rules: Vec<InsightRule>,
}

impl<'a> InsightGenerator<'a> {
    pub fn new(config: &'a InsightConfig, currency: &'a str) -> Self {
        Self {
            config,
            currency,
            rules: InsightRule::DEFAULT_ORDER.to_vec(),
        }
    }

    pub fn with_rules(mut self, rules: Vec<InsightRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn generate(&self, snapshot: &InsightSnapshot<'_>) -> Vec<Insight> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(snapshot, self.config, self.currency))
            .collect()
    }
}
