//! Advisory text about a wallet.
//!
//! Only [`AdviceMetrics`] ever leaves the crate: no transaction, category or owner
//! detail is handed to an advice provider. Providers are asynchronous and may fail;
//! [`advise_or_fallback`] turns any failure into the rule-based [`OfflineAdvisor`] text.

use crate::error::Result;
use futures::future::{self, BoxFuture, FutureExt};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The aggregate figures an advice provider is allowed to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AdviceMetrics {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_savings: f64,
    pub total_debt: f64,
}

impl AdviceMetrics {
    pub fn balance(&self) -> f64 {
        self.total_income - self.total_expenses
    }

    pub fn savings_rate(&self) -> f64 {
        crate::utils::percent_of(self.total_savings, self.total_income)
    }

    pub fn debt_to_income(&self) -> f64 {
        crate::utils::percent_of(self.total_debt, self.total_income)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdviceTopic {
    /// Three short savings tips for the wallet as a whole.
    SavingsTips,
    DebtToIncome,
    /// A single savings percentage for the month.
    SavingsPercentage,
    /// A one-sentence warning once spending passes the high-spending threshold.
    BudgetWarning,
}

impl AdviceTopic {
    pub fn prompt(&self, metrics: &AdviceMetrics, currency: &str) -> String {
        match self {
            AdviceTopic::SavingsTips => format!(
                "Analyze this wallet: Income [{}], Expenses [{}], Savings [{}]. \
                 Give 3 short, localized savings tips for someone in Cameroon. \
                 Detect if spending is too high in specific categories.",
                metrics.total_income, metrics.total_expenses, metrics.total_savings
            ),
            AdviceTopic::DebtToIncome => format!(
                "My monthly income is {} {} and my total debt is {} {}. \
                 Provide a short advice on my debt-to-income ratio.",
                metrics.total_income, currency, metrics.total_debt, currency
            ),
            AdviceTopic::SavingsPercentage => format!(
                "Based on monthly income of {} {} and expenses of {} {}, suggest a specific \
                 percentage to save this month. Return ONLY the number (e.g., 15).",
                metrics.total_income, currency, metrics.total_expenses, currency
            ),
            AdviceTopic::BudgetWarning => format!(
                "URGENT: Income {} {}, Expenses {} {}. The user has exceeded 80% of their income. \
                 Give a 1-sentence forceful financial warning with a localized Cameroon tip.",
                metrics.total_income, currency, metrics.total_expenses, currency
            ),
        }
    }
}

pub trait AdviceProvider: Send + Sync {
    fn advise<'a>(
        &'a self,
        topic: AdviceTopic,
        metrics: &'a AdviceMetrics,
    ) -> BoxFuture<'a, Result<String>>;
}

/// Rule-based advice that needs no network.
#[derive(Debug, Clone)]
pub struct OfflineAdvisor {
    /// Savings rate (%) under which the emergency-fund tip is given.
    pub low_savings_rate: f64,
}

impl Default for OfflineAdvisor {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl OfflineAdvisor {
    pub fn new(low_savings_rate: f64) -> Self {
        Self { low_savings_rate }
    }

    pub fn tips(&self, metrics: &AdviceMetrics) -> Vec<String> {
        if metrics.total_income == 0.0 && metrics.total_expenses == 0.0 {
            return vec!["Add some transactions to get personalized advice!".to_string()];
        }

        let mut tips = Vec::new();
        if metrics.balance() < 0.0 {
            tips.push(
                "Warning: Your expenses exceed your income. Consider reviewing your non-essential spending."
                    .to_string(),
            );
        }
        if metrics.savings_rate() < self.low_savings_rate {
            tips.push(format!(
                "Tip: Try to set aside at least {}% of your income for emergencies.",
                self.low_savings_rate
            ));
        } else {
            tips.push("Great job on saving! Keep building your financial cushion.".to_string());
        }
        tips.push(
            "Tip: Use the 'Analysis' page to see which categories consume most of your budget."
                .to_string(),
        );
        tips
    }

    pub fn text(&self, topic: AdviceTopic, metrics: &AdviceMetrics) -> String {
        match topic {
            AdviceTopic::SavingsTips => self.tips(metrics).join("\n"),
            AdviceTopic::DebtToIncome if metrics.total_income > 0.0 => format!(
                "Your total debt is {:.1}% of your income.",
                metrics.debt_to_income()
            ),
            AdviceTopic::DebtToIncome => "Ratio advice unavailable.".to_string(),
            AdviceTopic::SavingsPercentage => "15".to_string(),
            AdviceTopic::BudgetWarning => {
                "Risk of Deficit Detected. Please reduce non-essential spending.".to_string()
            }
        }
    }
}

impl AdviceProvider for OfflineAdvisor {
    fn advise<'a>(
        &'a self,
        topic: AdviceTopic,
        metrics: &'a AdviceMetrics,
    ) -> BoxFuture<'a, Result<String>> {
        future::ready(Ok(self.text(topic, metrics))).boxed()
    }
}

/// Asks `provider` and degrades to offline advice when it fails.
pub async fn advise_or_fallback(
    provider: &dyn AdviceProvider,
    fallback: &OfflineAdvisor,
    topic: AdviceTopic,
    metrics: &AdviceMetrics,
) -> String {
    match provider.advise(topic, metrics).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("Advice provider returned empty text for {:?}; using offline advice", topic);
            fallback.text(topic, metrics)
        }
        Err(e) => {
            warn!("Advice provider failed for {:?}: {}; using offline advice", topic, e);
            fallback.text(topic, metrics)
        }
    }
}
