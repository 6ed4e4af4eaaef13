use crate::error::{Result, WalletInsightsError};
use crate::utils::{parse_amount, safe_parse_amount};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Category label used when an expense carries no category.
pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[schemars(description = "Money received (salary, sales, gifts)")]
    Income,

    #[schemars(description = "Money spent; the only kind grouped by category")]
    Expense,

    #[schemars(description = "Money set aside into savings")]
    Savings,
}

/// An amount as the store hands it over: either a JSON number or a string.
///
/// Strings are parsed leniently, see [`safe_parse_amount`]. Anything that does not
/// parse contributes `0.0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    pub fn value(&self) -> f64 {
        match self {
            RawAmount::Number(n) if n.is_finite() => *n,
            RawAmount::Number(_) => 0.0,
            RawAmount::Text(s) => safe_parse_amount(s),
        }
    }

    /// True when the raw value yields a usable number.
    pub fn is_parseable(&self) -> bool {
        match self {
            RawAmount::Number(n) => n.is_finite(),
            RawAmount::Text(s) => parse_amount(s).is_some(),
        }
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    #[schemars(description = "Opaque identifier assigned by the store")]
    pub id: String,

    #[schemars(description = "Identifier of the user the record belongs to")]
    #[serde(alias = "username")]
    pub owner: String,

    #[serde(alias = "type")]
    pub kind: TransactionKind,

    #[serde(default)]
    #[schemars(description = "Free-form label used to group expenses. Empty means 'Other'.")]
    pub category: Option<String>,

    #[schemars(description = "Non-negative amount, as a number or a numeric string")]
    pub amount: RawAmount,

    #[serde(alias = "date")]
    #[schemars(description = "Calendar date in YYYY-MM-DD format")]
    pub occurred_on: NaiveDate,

    #[serde(default)]
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        kind: TransactionKind,
        amount: impl Into<RawAmount>,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            kind,
            category: None,
            amount: amount.into(),
            occurred_on,
            description: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn amount_value(&self) -> f64 {
        self.amount.value()
    }

    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => DEFAULT_CATEGORY,
        }
    }
}

/// Inclusive calendar range. `start <= end` always holds for a constructed value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize, JsonSchema)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = WalletInsightsError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(WalletInsightsError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[schemars(description = "Trailing 1-day window, one bucket per calendar date")]
    Daily,

    #[schemars(description = "Trailing 7-day window, one bucket per Sunday-starting week")]
    Weekly,

    #[schemars(description = "Trailing 30-day window, one bucket per calendar month")]
    Monthly,

    #[schemars(description = "Trailing 365-day window, one bucket per calendar year")]
    Yearly,

    #[schemars(description = "Inclusive start/end range, one bucket per calendar date")]
    Custom(DateRange),
}

impl Granularity {
    /// Builds a granularity from the loose selector values a form submits.
    ///
    /// `custom` needs both dates; a reversed range is rejected here so the engine
    /// never sees one.
    pub fn from_selector(
        name: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "daily" => Ok(Granularity::Daily),
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            "yearly" => Ok(Granularity::Yearly),
            "custom" => match (start, end) {
                (Some(start), Some(end)) => Ok(Granularity::Custom(DateRange::new(start, end)?)),
                _ => Err(WalletInsightsError::MissingDateRange),
            },
            other => Err(WalletInsightsError::InvalidConfig(format!(
                "Unknown granularity '{}'",
                other
            ))),
        }
    }

    /// Length of the trailing filter window in days, `None` for custom ranges.
    pub fn trailing_days(&self) -> Option<i64> {
        match self {
            Granularity::Daily => Some(1),
            Granularity::Weekly => Some(7),
            Granularity::Monthly => Some(30),
            Granularity::Yearly => Some(365),
            Granularity::Custom(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Yearly => "yearly",
            Granularity::Custom(_) => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    #[default]
    #[schemars(description = "Sliding window: keep records less than N days before the reference date")]
    Trailing,

    #[schemars(
        description = "Calendar-to-date window: today, last 7 days, since the 1st of the month, since January 1st"
    )]
    CalendarToDate,
}

/// Everything one analysis run depends on besides the transaction snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisRequest {
    #[schemars(description = "The current owner; records of other owners are ignored")]
    pub owner: String,

    pub granularity: Granularity,

    #[schemars(description = "Reference date standing in for 'today'")]
    pub as_of: NaiveDate,

    #[serde(default)]
    #[schemars(description = "Restrict the analysis to one transaction kind")]
    pub kind_filter: Option<TransactionKind>,

    #[serde(default)]
    pub window: WindowMode,

    #[serde(default)]
    #[schemars(description = "Named savings targets measured against all-time savings")]
    pub savings_targets: Vec<SavingsTarget>,
}

impl AnalysisRequest {
    pub fn new(owner: impl Into<String>, granularity: Granularity, as_of: NaiveDate) -> Self {
        Self {
            owner: owner.into(),
            granularity,
            as_of,
            kind_filter: None,
            window: WindowMode::Trailing,
            savings_targets: Vec::new(),
        }
    }

    pub fn with_kind_filter(mut self, kind: TransactionKind) -> Self {
        self.kind_filter = Some(kind);
        self
    }

    pub fn with_window(mut self, window: WindowMode) -> Self {
        self.window = window;
        self
    }

    pub fn with_savings_targets(mut self, targets: Vec<SavingsTarget>) -> Self {
        self.savings_targets = targets;
        self
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AnalysisRequest)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanKind {
    #[schemars(description = "Money lent to someone else")]
    Loan,

    #[schemars(description = "Money owed to someone else")]
    Debt,

    #[schemars(description = "Money borrowed from an institution")]
    Borrowing,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    #[default]
    Active,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Loan {
    pub id: String,

    #[serde(alias = "type")]
    pub kind: LoanKind,

    pub amount: RawAmount,

    #[serde(default, alias = "dueDate")]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub status: LoanStatus,

    #[serde(default)]
    pub description: Option<String>,
}

/// A user-named amount to save towards, e.g. "Emergency fund".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SavingsTarget {
    pub name: String,
    pub target: RawAmount,
}

impl SavingsTarget {
    pub fn new(name: impl Into<String>, target: impl Into<RawAmount>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }
}
