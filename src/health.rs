use crate::aggregator::PeriodTotals;
use crate::config::{HealthConfig, InsightConfig};
use crate::insights::Severity;
use crate::trend::IncomeStability;
use crate::utils::percent_of;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthTier {
    /// Evaluated high to low, so a score sitting exactly on a cut-off takes the higher tier.
    pub fn for_score(score: f64, config: &HealthConfig) -> Self {
        if score >= config.excellent_threshold {
            HealthTier::Excellent
        } else if score >= config.good_threshold {
            HealthTier::Good
        } else if score >= config.fair_threshold {
            HealthTier::Fair
        } else {
            HealthTier::Poor
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            HealthTier::Excellent => "Excellent financial health",
            HealthTier::Good => "Good financial management",
            HealthTier::Fair => "Room for improvement",
            HealthTier::Poor => "Needs immediate attention",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            HealthTier::Excellent => Severity::Success,
            HealthTier::Good => Severity::Info,
            HealthTier::Fair => Severity::Warning,
            HealthTier::Poor => Severity::Danger,
        }
    }
}

/// Points each rule added; `expense_ratio` may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreComponents {
    pub base: f64,
    pub stability: f64,
    pub savings: f64,
    pub expense_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HealthNote {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HealthScore {
    /// Clamped to `[0, 100]`.
    pub score: f64,
    pub tier: HealthTier,
    pub components: ScoreComponents,
    pub notes: Vec<HealthNote>,
}

impl HealthScore {
    pub fn display_score(&self) -> i64 {
        self.score.round() as i64
    }
}

pub struct HealthScorer<'a> {
    config: &'a HealthConfig,
    insight_config: &'a InsightConfig,
}

impl<'a> HealthScorer<'a> {
    pub fn new(config: &'a HealthConfig, insight_config: &'a InsightConfig) -> Self {
        Self {
            config,
            insight_config,
        }
    }

    pub fn score(&self, totals: &PeriodTotals, stability: &IncomeStability) -> HealthScore {
        let cfg = self.config;
        let income = totals.income;
        let expenses = totals.expenses;

        let stability_points = if income > 0.0 {
            stability.contribution.min(cfg.stability_cap)
        } else {
            0.0
        };

        let savings_rate = percent_of(totals.savings, income);
        let savings_points = (savings_rate * cfg.savings_weight).min(cfg.savings_cap);

        let expense_points = if income > 0.0 {
            if expenses <= cfg.comfortable_expense_ratio * income {
                cfg.comfortable_bonus
            } else if expenses <= income {
                cfg.break_even_bonus
            } else {
                -cfg.overspend_penalty
            }
        } else if expenses > 0.0 {
            -cfg.overspend_penalty
        } else {
            0.0
        };

        let components = ScoreComponents {
            base: cfg.base_score,
            stability: stability_points,
            savings: savings_points,
            expense_ratio: expense_points,
        };
        let raw = components.base + components.stability + components.savings + components.expense_ratio;
        let score = if raw.is_finite() { raw.clamp(0.0, 100.0) } else { 0.0 };
        let tier = HealthTier::for_score(score, cfg);

        HealthScore {
            score,
            tier,
            components,
            notes: self.notes(tier, savings_rate, income, expenses),
        }
    }

    fn notes(&self, tier: HealthTier, savings_rate: f64, income: f64, expenses: f64) -> Vec<HealthNote> {
        let mut notes = vec![HealthNote {
            text: tier.note().to_string(),
            severity: tier.severity(),
        }];

        if savings_rate >= self.insight_config.strong_savings_rate {
            notes.push(HealthNote {
                text: "Strong savings habit".to_string(),
                severity: Severity::Success,
            });
        } else if savings_rate < self.insight_config.low_savings_rate {
            notes.push(HealthNote {
                text: "Low savings rate".to_string(),
                severity: Severity::Warning,
            });
        }

        if expenses > income {
            notes.push(HealthNote {
                text: "Spending exceeds income".to_string(),
                severity: Severity::Danger,
            });
        }

        notes
    }
}
