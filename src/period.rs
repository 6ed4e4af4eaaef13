use crate::schema::{AnalysisRequest, Granularity, Transaction, WindowMode};
use crate::utils::{days_between, first_day_of_month, first_day_of_year, week_start_sunday};
use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

/// Identifies one bucket. Ordering is by `start`, and the label of a bucket
/// sorts the same way: `YYYY-MM-DD` for days and weeks, `YYYY-MM`, `YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BucketKey {
    pub start: NaiveDate,
    pub label: String,
}

/// Decides which transactions fall into the active window and which bucket each
/// one belongs to.
///
/// The filter window and the bucket key use different notions of a period: the
/// weekly filter keeps the trailing 7 days, while the weekly key is the calendar
/// week starting on Sunday. Both are kept as they are.
pub struct PeriodBucketizer {
    granularity: Granularity,
    as_of: NaiveDate,
    window: WindowMode,
}

impl PeriodBucketizer {
    pub fn new(granularity: Granularity, as_of: NaiveDate, window: WindowMode) -> Self {
        Self {
            granularity,
            as_of,
            window,
        }
    }

    pub fn from_request(request: &AnalysisRequest) -> Self {
        Self::new(request.granularity, request.as_of, request.window)
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn in_window(&self, date: NaiveDate) -> bool {
        let trailing = match self.granularity {
            Granularity::Custom(range) => return range.contains(date),
            other => other.trailing_days().unwrap_or(i64::MAX),
        };

        match (self.window, self.granularity) {
            (WindowMode::CalendarToDate, Granularity::Daily) => date >= self.as_of,
            (WindowMode::CalendarToDate, Granularity::Monthly) => {
                date >= first_day_of_month(self.as_of)
            }
            (WindowMode::CalendarToDate, Granularity::Yearly) => {
                date >= first_day_of_year(self.as_of)
            }
            // Future-dated records have a negative distance and stay in
            _ => days_between(date, self.as_of) < trailing,
        }
    }

    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self.granularity {
            Granularity::Daily | Granularity::Custom(_) => date,
            Granularity::Weekly => week_start_sunday(date),
            Granularity::Monthly => first_day_of_month(date),
            Granularity::Yearly => first_day_of_year(date),
        }
    }

    pub fn bucket_key(&self, date: NaiveDate) -> BucketKey {
        let start = self.bucket_start(date);
        let label = match self.granularity {
            Granularity::Daily | Granularity::Weekly | Granularity::Custom(_) => {
                start.format("%Y-%m-%d").to_string()
            }
            Granularity::Monthly => format!("{:04}-{:02}", start.year(), start.month()),
            Granularity::Yearly => format!("{:04}", start.year()),
        };
        BucketKey { start, label }
    }

    /// Keeps the owner's transactions that fall in the window and match the kind filter.
    pub fn filter<'t>(
        &self,
        request: &AnalysisRequest,
        transactions: &'t [Transaction],
    ) -> Vec<&'t Transaction> {
        let mut foreign = 0usize;
        let filtered: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| {
                if t.owner != request.owner {
                    foreign += 1;
                    return false;
                }
                true
            })
            .filter(|t| request.kind_filter.map_or(true, |kind| t.kind == kind))
            .filter(|t| self.in_window(t.occurred_on))
            .collect();

        if foreign > 0 {
            debug!(
                "Ignored {} transactions not owned by '{}'",
                foreign, request.owner
            );
        }
        debug!(
            "{} of {} transactions fall in the {} window ending {}",
            filtered.len(),
            transactions.len(),
            self.granularity.name(),
            self.as_of
        );

        filtered
    }
}
