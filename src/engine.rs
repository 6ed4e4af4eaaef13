use crate::advice::AdviceMetrics;
use crate::aggregator::{Aggregates, Aggregator, CategoryBucket, CategoryShare, PeriodBucket, PeriodTotals};
use crate::alerts::{Alert, AlertEvaluator};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::health::{HealthScore, HealthScorer};
use crate::insights::{Insight, InsightGenerator, InsightSnapshot};
use crate::loans::{average_monthly_expenses, DebtInput, LoanSummary};
use crate::patterns::SpendingPatterns;
use crate::period::PeriodBucketizer;
use crate::savings_goal::{savings_target_progress, SavingsGoal, SavingsTargetProgress};
use crate::schema::{AnalysisRequest, Transaction};
use crate::trend::{analyze_trends, income_stability, IncomeStability, TrendSummary};
use crate::utils::{days_between, percent_of, round_currency, round_one_decimal, weekday_short_name, WEEKDAYS_FROM_SUNDAY};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowStatus {
    Positive,
    Negative,
    Balanced,
}

impl CashFlowStatus {
    pub fn from_totals(totals: &PeriodTotals) -> Self {
        let net = totals.net();
        if net > 0.0 {
            CashFlowStatus::Positive
        } else if net < 0.0 {
            CashFlowStatus::Negative
        } else {
            CashFlowStatus::Balanced
        }
    }
}

/// Scalar figures for the active window. Values are unrounded; the `display_*`
/// helpers round currency to whole units and percentages to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Metrics {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_savings: f64,
    pub net_balance: f64,
    pub transaction_count: usize,
    pub savings_rate: f64,
    pub expense_ratio: f64,
    pub average_income: f64,
    pub average_expenses: f64,
    /// Expenses per day over `days_covered`.
    pub burn_rate: f64,
    pub days_covered: i64,
    pub outstanding_debt: f64,
    pub debt_to_income: f64,
}

impl Metrics {
    fn compute(aggregates: &Aggregates, request: &AnalysisRequest, loans: &LoanSummary) -> Self {
        let totals = &aggregates.totals;

        let days_covered = aggregates
            .earliest_date
            .map(|earliest| days_between(earliest, request.as_of) + 1)
            .unwrap_or(1)
            .max(1);

        Self {
            total_income: totals.income,
            total_expenses: totals.expenses,
            total_savings: totals.savings,
            net_balance: totals.net(),
            transaction_count: totals.transaction_count,
            savings_rate: percent_of(totals.savings, totals.income),
            expense_ratio: percent_of(totals.expenses, totals.income),
            average_income: aggregates.average_income(),
            average_expenses: aggregates.average_expenses(),
            burn_rate: totals.expenses / days_covered as f64,
            days_covered,
            outstanding_debt: loans.outstanding_debt,
            debt_to_income: percent_of(loans.outstanding_debt, totals.income),
        }
    }

    pub fn display_savings_rate(&self) -> f64 {
        round_one_decimal(self.savings_rate)
    }

    pub fn display_expense_ratio(&self) -> f64 {
        round_one_decimal(self.expense_ratio)
    }

    pub fn display_burn_rate(&self) -> i64 {
        round_currency(self.burn_rate)
    }

    pub fn display_net_balance(&self) -> i64 {
        round_currency(self.net_balance)
    }
}

/// Data series ready for plotting, one point per bucket or per weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expenses: Vec<f64>,
    pub net_cash_flow: Vec<f64>,
    pub cumulative_savings: Vec<f64>,
    pub weekday_labels: Vec<String>,
    pub weekday_expenses: Vec<f64>,
}

impl ChartSeries {
    fn build(buckets: &[PeriodBucket], patterns: &SpendingPatterns) -> Self {
        let mut running = 0.0;
        let cumulative_savings = buckets
            .iter()
            .map(|b| {
                running += b.totals.savings;
                running
            })
            .collect();

        Self {
            labels: buckets.iter().map(|b| b.label.clone()).collect(),
            income: buckets.iter().map(|b| b.totals.income).collect(),
            expenses: buckets.iter().map(|b| b.totals.expenses).collect(),
            net_cash_flow: buckets.iter().map(|b| b.totals.net()).collect(),
            cumulative_savings,
            weekday_labels: WEEKDAYS_FROM_SUNDAY
                .iter()
                .map(|d| weekday_short_name(*d).to_string())
                .collect(),
            weekday_expenses: patterns.weekday_amounts(),
        }
    }
}

/// Everything one analysis run produces. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    pub request: AnalysisRequest,
    /// Chronological.
    pub period_buckets: Vec<PeriodBucket>,
    /// Expense totals keyed by category label.
    pub categories: BTreeMap<String, CategoryBucket>,
    /// Same categories, largest first.
    pub category_breakdown: Vec<CategoryShare>,
    pub metrics: Metrics,
    pub trends: Option<TrendSummary>,
    pub stability: IncomeStability,
    pub health: HealthScore,
    /// In rule order.
    pub insights: Vec<Insight>,
    pub patterns: SpendingPatterns,
    pub series: ChartSeries,
    pub cash_flow: CashFlowStatus,
    pub alerts: Vec<Alert>,
    pub loans: LoanSummary,
    pub savings_goal: SavingsGoal,
    /// One entry per requested savings target, in request order.
    pub savings_targets: Vec<SavingsTargetProgress>,
}

impl AnalysisReport {
    /// The only figures an external advice service may receive.
    pub fn advice_metrics(&self) -> AdviceMetrics {
        AdviceMetrics {
            total_income: self.metrics.total_income,
            total_expenses: self.metrics.total_expenses,
            total_savings: self.metrics.total_savings,
            total_debt: self.metrics.outstanding_debt,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(AnalysisReport);
        serde_json::to_string_pretty(&schema)
    }
}

/// Runs the analysis pipeline: filter, bucket, aggregate, then score and explain.
///
/// Holds nothing but configuration, so one engine can serve any number of requests.
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    config: AnalyticsConfig,
}

impl InsightEngine {
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn analyze(&self, request: &AnalysisRequest, transactions: &[Transaction]) -> AnalysisReport {
        self.analyze_with_debt(request, transactions, &DebtInput::None)
    }

    pub fn analyze_with_debt(
        &self,
        request: &AnalysisRequest,
        transactions: &[Transaction],
        debt: &DebtInput,
    ) -> AnalysisReport {
        let cfg = &self.config;
        info!(
            "Analyzing {} transactions for '{}' ({} as of {})",
            transactions.len(),
            request.owner,
            request.granularity.name(),
            request.as_of
        );

        let bucketizer = PeriodBucketizer::from_request(request);
        let filtered = bucketizer.filter(request, transactions);
        let aggregates = Aggregator::new(&bucketizer).aggregate(&filtered);

        // Loan impact and savings targets look at the owner's whole history
        let owned: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.owner == request.owner)
            .collect();

        let loans = debt
            .summarize(request.as_of, cfg.alerts.loan_due_soon_days)
            .with_impacts(average_monthly_expenses(&owned), &cfg.currency_label);
        let metrics = Metrics::compute(&aggregates, request, &loans);

        let trends = analyze_trends(&aggregates.period_buckets);
        let stability = income_stability(&aggregates.bucket_incomes(), &cfg.health);
        let health = HealthScorer::new(&cfg.health, &cfg.insights).score(&aggregates.totals, &stability);

        let patterns = SpendingPatterns::from_transactions(&filtered);
        let snapshot = InsightSnapshot {
            buckets: &aggregates.period_buckets,
            categories: &aggregates.categories,
            totals: aggregates.totals,
            patterns: &patterns,
        };
        let insights = InsightGenerator::new(&cfg.insights, &cfg.currency_label).generate(&snapshot);

        let alerts = AlertEvaluator::new(&cfg.alerts, &cfg.currency_label).evaluate(
            &aggregates.totals,
            &aggregates.categories,
            &loans,
        );

        let savings_goal = SavingsGoal::for_month(&owned, request.as_of, &cfg.savings_goal);
        let savings_targets = savings_target_progress(&request.savings_targets, &owned);

        debug!(
            "Health score {:.1} ({:?}), {} insights, {} alerts",
            health.score,
            health.tier,
            insights.len(),
            alerts.len()
        );

        AnalysisReport {
            request: request.clone(),
            series: ChartSeries::build(&aggregates.period_buckets, &patterns),
            cash_flow: CashFlowStatus::from_totals(&aggregates.totals),
            category_breakdown: aggregates.category_breakdown(),
            period_buckets: aggregates.period_buckets,
            categories: aggregates.categories,
            metrics,
            trends,
            stability,
            health,
            insights,
            patterns,
            alerts,
            loans,
            savings_goal,
            savings_targets,
        }
    }
}
