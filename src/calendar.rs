use crate::types::{Post, Result, TrackerError};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// One cell of the month grid: a calendar day and the posts whose
/// effective date (scheduled, else published) falls on it.
#[derive(Debug, Clone)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from adjacent months.
    pub in_month: bool,
    pub posts: Vec<Post>,
}

/// Calendar days shown for a month: full weeks from Sunday through
/// Saturday, including the adjacent-month days needed to square the grid.
pub fn month_grid(year: i32, month: u32) -> Result<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| TrackerError::Validation(format!("invalid month: {}-{}", year, month)))?;
    let last = last_day_of_month(first);

    let start = first - Duration::days(first.weekday().num_days_from_sunday() as i64);
    let end = last + Duration::days((Weekday::Sat.num_days_from_sunday()
        - last.weekday().num_days_from_sunday()) as i64);

    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        day = day + Duration::days(1);
    }
    Ok(days)
}

/// Bucket posts into the displayed grid for a month. Day identity is
/// date-only and timezone-naive; posts with neither a scheduled nor a
/// published date land in no bucket. Bucket order follows the grid, post
/// order within a bucket follows the collection.
pub fn day_buckets(posts: &[Post], year: i32, month: u32) -> Result<Vec<DayBucket>> {
    let days = month_grid(year, month)?;
    let buckets = days
        .into_iter()
        .map(|date| DayBucket {
            date,
            in_month: date.year() == year && date.month() == month,
            posts: posts
                .iter()
                .filter(|p| p.effective_date() == Some(date))
                .cloned()
                .collect(),
        })
        .collect();
    Ok(buckets)
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    // Valid by construction: the first of the following month always exists.
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or(first)
        .pred_opt()
        .unwrap_or(first)
}
