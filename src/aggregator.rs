use crate::period::{BucketKey, PeriodBucketizer};
use crate::schema::{Transaction, TransactionKind};
use crate::utils::percent_of;
use chrono::NaiveDate;
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodTotals {
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub transaction_count: usize,
}

impl PeriodTotals {
    /// Adds one transaction to exactly one kind total. The count always moves,
    /// even when the amount did not parse and contributes zero.
    fn add(&mut self, kind: TransactionKind, amount: f64) {
        match kind {
            TransactionKind::Income => self.income += amount,
            TransactionKind::Expense => self.expenses += amount,
            TransactionKind::Savings => self.savings += amount,
        }
        self.transaction_count += 1;
    }

    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodBucket {
    pub label: String,
    pub start: NaiveDate,
    #[serde(flatten)]
    pub totals: PeriodTotals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryBucket {
    pub amount: f64,
    pub count: usize,
    pub transaction_ids: Vec<String>,
    /// Position of the category's first expense in the filtered input.
    #[serde(default)]
    pub first_seen: usize,
}

/// One row of the category breakdown, largest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub count: usize,
    pub share_percent: f64,
    pub average_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Aggregates {
    /// Buckets in chronological order of their start date.
    pub period_buckets: Vec<PeriodBucket>,
    /// Expense totals per category label.
    pub categories: BTreeMap<String, CategoryBucket>,
    /// Sum over every bucket.
    pub totals: PeriodTotals,
    pub earliest_date: Option<NaiveDate>,
}

pub struct Aggregator<'a> {
    bucketizer: &'a PeriodBucketizer,
}

impl<'a> Aggregator<'a> {
    pub fn new(bucketizer: &'a PeriodBucketizer) -> Self {
        Self { bucketizer }
    }

    pub fn aggregate(&self, transactions: &[&Transaction]) -> Aggregates {
        let mut grid: BTreeMap<BucketKey, PeriodTotals> = BTreeMap::new();
        let mut categories: BTreeMap<String, CategoryBucket> = BTreeMap::new();
        let mut totals = PeriodTotals::default();
        let mut earliest_date: Option<NaiveDate> = None;

        for tx in transactions {
            if !tx.amount.is_parseable() {
                warn!(
                    "Transaction {} has an unparseable amount {:?}; counting it as 0",
                    tx.id, tx.amount
                );
            }
            let amount = tx.amount_value();

            grid.entry(self.bucketizer.bucket_key(tx.occurred_on))
                .or_default()
                .add(tx.kind, amount);
            totals.add(tx.kind, amount);

            if tx.kind == TransactionKind::Expense {
                let first_seen = categories.len();
                let bucket = categories
                    .entry(tx.category_label().to_string())
                    .or_insert_with(|| CategoryBucket {
                        first_seen,
                        ..CategoryBucket::default()
                    });
                bucket.amount += amount;
                bucket.count += 1;
                bucket.transaction_ids.push(tx.id.clone());
            }

            earliest_date = Some(match earliest_date {
                Some(d) if d <= tx.occurred_on => d,
                _ => tx.occurred_on,
            });
        }

        debug!(
            "Aggregated {} transactions into {} buckets and {} categories",
            transactions.len(),
            grid.len(),
            categories.len()
        );

        Aggregates {
            period_buckets: grid
                .into_iter()
                .map(|(key, totals)| PeriodBucket {
                    label: key.label,
                    start: key.start,
                    totals,
                })
                .collect(),
            categories,
            totals,
            earliest_date,
        }
    }
}

impl Aggregates {
    pub fn bucket_count(&self) -> usize {
        self.period_buckets.len()
    }

    fn divisor(&self) -> f64 {
        self.bucket_count().max(1) as f64
    }

    pub fn average_income(&self) -> f64 {
        self.totals.income / self.divisor()
    }

    pub fn average_expenses(&self) -> f64 {
        self.totals.expenses / self.divisor()
    }

    pub fn average_transactions_per_bucket(&self) -> f64 {
        self.totals.transaction_count as f64 / self.divisor()
    }

    pub fn bucket_incomes(&self) -> Vec<f64> {
        self.period_buckets.iter().map(|b| b.totals.income).collect()
    }

    /// Categories sorted by amount, largest first; ties keep first-seen order.
    pub fn category_breakdown(&self) -> Vec<CategoryShare> {
        let total: f64 = self.categories.values().map(|c| c.amount).sum();

        let mut ordered: Vec<(&String, &CategoryBucket)> = self.categories.iter().collect();
        ordered.sort_by_key(|(_, bucket)| bucket.first_seen);

        let mut rows: Vec<CategoryShare> = ordered
            .into_iter()
            .map(|(name, bucket)| CategoryShare {
                category: name.clone(),
                amount: bucket.amount,
                count: bucket.count,
                share_percent: percent_of(bucket.amount, total),
                average_amount: if bucket.count > 0 {
                    bucket.amount / bucket.count as f64
                } else {
                    0.0
                },
            })
            .collect();

        rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        rows
    }

    pub fn top_category(&self) -> Option<CategoryShare> {
        self.category_breakdown().into_iter().next()
    }
}
