//! # Wallet Insights
//!
//! A library for turning a personal wallet's transaction history into period
//! summaries, a financial health score and a list of human-readable insights.
//!
//! ## Core Concepts
//!
//! - **Request**: an immutable [`AnalysisRequest`] naming the owner, the granularity
//!   (daily, weekly, monthly, yearly or a custom range) and the reference date
//! - **Buckets**: transactions grouped by calendar day, Sunday-starting week, month or
//!   year, always in chronological order
//! - **Health score**: 0 to 100, blending income stability, savings rate and expense ratio
//! - **Insights**: independent rules evaluated in a fixed order against one snapshot
//!
//! The analysis is pure: the same transactions and request always give the same
//! report, and nothing is read from the clock, the network or the disk.
//!
//! ## Example
//!
//! ```rust
//! use wallet_insights::*;
//! use chrono::NaiveDate;
//!
//! let as_of = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
//! let transactions = vec![
//!     Transaction::new("1", "ana", TransactionKind::Income, 100_000.0, as_of),
//!     Transaction::new("2", "ana", TransactionKind::Expense, "25000", as_of)
//!         .with_category("food"),
//! ];
//!
//! let request = AnalysisRequest::new("ana", Granularity::Monthly, as_of);
//! let report = analyze_transactions(&request, &transactions);
//!
//! assert_eq!(report.metrics.total_income, 100_000.0);
//! assert_eq!(report.health.display_score(), 70);
//! ```

pub mod advice;
pub mod aggregator;
pub mod alerts;
pub mod config;
pub mod engine;
pub mod error;
pub mod health;
pub mod insights;
pub mod loans;
pub mod patterns;
pub mod period;
pub mod savings_goal;
pub mod schema;
pub mod trend;
pub mod utils;

#[cfg(feature = "gemini")]
pub mod llm;

pub use advice::{advise_or_fallback, AdviceMetrics, AdviceProvider, AdviceTopic, OfflineAdvisor};
pub use aggregator::{Aggregates, Aggregator, CategoryBucket, CategoryShare, PeriodBucket, PeriodTotals};
pub use alerts::{Alert, AlertEvaluator, AlertKind};
pub use config::{AlertConfig, AnalyticsConfig, HealthConfig, InsightConfig, SavingsGoalConfig};
pub use engine::{AnalysisReport, CashFlowStatus, ChartSeries, InsightEngine, Metrics};
pub use error::{Result, WalletInsightsError};
pub use health::{HealthNote, HealthScore, HealthScorer, HealthTier, ScoreComponents};
pub use insights::{Insight, InsightGenerator, InsightIcon, InsightKind, InsightRule, InsightSnapshot, Severity};
pub use loans::{average_monthly_expenses, DebtInput, ImpactRisk, LoanImpact, LoanState, LoanSummary};
pub use patterns::{MonthThirds, SpendingPatterns};
pub use period::{BucketKey, PeriodBucketizer};
pub use savings_goal::{savings_target_progress, GoalStatus, SavingsGoal, SavingsTargetProgress};
pub use schema::*;
pub use trend::{analyze_trends, income_stability, IncomeStability, Trend, TrendDirection, TrendSummary};
pub use utils::*;

/// Analyzes `transactions` with the default calibration.
pub fn analyze_transactions(request: &AnalysisRequest, transactions: &[Transaction]) -> AnalysisReport {
    InsightEngine::default().analyze(request, transactions)
}

/// Same as [`analyze_transactions`], with outstanding debt for the debt alerts.
pub fn analyze_with_debt(
    request: &AnalysisRequest,
    transactions: &[Transaction],
    debt: &DebtInput,
) -> AnalysisReport {
    InsightEngine::default().analyze_with_debt(request, transactions, debt)
}

/// Builds a request from loose selector values and analyzes with `config`.
///
/// Fails when the selector is unknown, a custom range is incomplete or reversed,
/// or the configuration does not validate.
pub fn analyze_with_selector(
    config: AnalyticsConfig,
    owner: &str,
    selector: &str,
    range: (Option<chrono::NaiveDate>, Option<chrono::NaiveDate>),
    as_of: chrono::NaiveDate,
    transactions: &[Transaction],
) -> Result<AnalysisReport> {
    let granularity = Granularity::from_selector(selector, range.0, range.1)?;
    let request = AnalysisRequest::new(owner, granularity, as_of);
    let engine = InsightEngine::new(config)?;
    Ok(engine.analyze(&request, transactions))
}
