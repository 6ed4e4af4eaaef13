use crate::error::{Result, WalletInsightsError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable thresholds of the health score, the insight rules and the alerts.
///
/// `AnalyticsConfig::default()` is the reference calibration; every field may be
/// omitted from a JSON document and falls back to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct AnalyticsConfig {
    #[schemars(description = "Display label appended to currency amounts in insight text")]
    pub currency_label: String,

    pub health: HealthConfig,
    pub insights: InsightConfig,
    pub alerts: AlertConfig,
    pub savings_goal: SavingsGoalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct HealthConfig {
    pub base_score: f64,

    #[schemars(description = "Upper bound of the income-stability contribution")]
    pub stability_cap: f64,

    #[schemars(description = "Points removed per unit of coefficient of variation")]
    pub stability_penalty: f64,

    #[schemars(description = "Points per savings-rate percent")]
    pub savings_weight: f64,
    pub savings_cap: f64,

    #[schemars(description = "Expense/income ratio at or below which the full bonus applies")]
    pub comfortable_expense_ratio: f64,
    pub comfortable_bonus: f64,
    pub break_even_bonus: f64,
    pub overspend_penalty: f64,

    pub excellent_threshold: f64,
    pub good_threshold: f64,
    pub fair_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct InsightConfig {
    #[schemars(description = "Savings rate (%) at or above which the habit is praised")]
    pub strong_savings_rate: f64,

    #[schemars(description = "Savings rate (%) below which a warning is emitted")]
    pub low_savings_rate: f64,

    #[schemars(description = "Average transactions per bucket above which volume is flagged")]
    pub high_volume_per_bucket: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct AlertConfig {
    #[schemars(description = "Share of income (0-1) above which spending is flagged")]
    pub high_spending_share: f64,

    #[schemars(description = "Debt-to-income percent above which debt is critical")]
    pub debt_high_percent: f64,

    #[schemars(description = "Debt-to-income percent above which debt is elevated")]
    pub debt_elevated_percent: f64,

    #[schemars(description = "Share of income (0-1) leisure categories may take")]
    pub leisure_share: f64,

    pub leisure_categories: Vec<String>,

    #[schemars(description = "Days before the due date at which a loan counts as due soon")]
    pub loan_due_soon_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct SavingsGoalConfig {
    #[schemars(description = "Share of monthly income (0-1) targeted as savings")]
    pub target_share: f64,

    #[schemars(description = "Multiplier applied to this month's savings to project next month")]
    pub projection_factor: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            currency_label: "XAF".to_string(),
            health: HealthConfig::default(),
            insights: InsightConfig::default(),
            alerts: AlertConfig::default(),
            savings_goal: SavingsGoalConfig::default(),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            base_score: 50.0,
            stability_cap: 20.0,
            stability_penalty: 10.0,
            savings_weight: 1.5,
            savings_cap: 30.0,
            comfortable_expense_ratio: 0.7,
            comfortable_bonus: 20.0,
            break_even_bonus: 10.0,
            overspend_penalty: 10.0,
            excellent_threshold: 80.0,
            good_threshold: 60.0,
            fair_threshold: 40.0,
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            strong_savings_rate: 20.0,
            low_savings_rate: 10.0,
            high_volume_per_bucket: 20.0,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            high_spending_share: 0.8,
            debt_high_percent: 50.0,
            debt_elevated_percent: 30.0,
            leisure_share: 0.4,
            leisure_categories: vec!["Entertainment".to_string(), "Leisure".to_string()],
            loan_due_soon_days: 7,
        }
    }
}

impl Default for SavingsGoalConfig {
    fn default() -> Self {
        Self {
            target_share: 0.2,
            projection_factor: 1.15,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AnalyticsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let h = &self.health;
        let weights = [
            ("stability_cap", h.stability_cap),
            ("stability_penalty", h.stability_penalty),
            ("savings_weight", h.savings_weight),
            ("savings_cap", h.savings_cap),
            ("comfortable_bonus", h.comfortable_bonus),
            ("break_even_bonus", h.break_even_bonus),
            ("overspend_penalty", h.overspend_penalty),
        ];
        for (name, value) in weights {
            if !(value.is_finite() && value >= 0.0) {
                return Err(WalletInsightsError::InvalidConfig(format!(
                    "health.{} must be a non-negative number (got {})",
                    name, value
                )));
            }
        }

        if !(h.comfortable_expense_ratio > 0.0 && h.comfortable_expense_ratio <= 1.0) {
            return Err(WalletInsightsError::InvalidConfig(format!(
                "health.comfortable_expense_ratio must be in (0, 1] (got {})",
                h.comfortable_expense_ratio
            )));
        }

        if !(h.excellent_threshold > h.good_threshold && h.good_threshold > h.fair_threshold) {
            return Err(WalletInsightsError::InvalidConfig(format!(
                "health tier thresholds must be strictly descending (got {}, {}, {})",
                h.excellent_threshold, h.good_threshold, h.fair_threshold
            )));
        }

        let i = &self.insights;
        if i.low_savings_rate > i.strong_savings_rate {
            return Err(WalletInsightsError::InvalidConfig(format!(
                "insights.low_savings_rate ({}) exceeds strong_savings_rate ({})",
                i.low_savings_rate, i.strong_savings_rate
            )));
        }

        let a = &self.alerts;
        if a.debt_elevated_percent > a.debt_high_percent {
            return Err(WalletInsightsError::InvalidConfig(format!(
                "alerts.debt_elevated_percent ({}) exceeds debt_high_percent ({})",
                a.debt_elevated_percent, a.debt_high_percent
            )));
        }
        if a.loan_due_soon_days < 0 {
            return Err(WalletInsightsError::InvalidConfig(
                "alerts.loan_due_soon_days must not be negative".to_string(),
            ));
        }

        if self.savings_goal.target_share < 0.0 || self.savings_goal.projection_factor < 0.0 {
            return Err(WalletInsightsError::InvalidConfig(
                "savings_goal values must not be negative".to_string(),
            ));
        }

        Ok(())
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(AnalyticsConfig);
        serde_json::to_string_pretty(&schema)
    }
}
