//! Finding dates in free text and measuring ages.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Time elapsed since a date, split the way the bot reports its own age:
/// 365-day years, 30-day months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
}

/// Every date-like substring of `text`, in order of appearance. Matches that
/// are not real calendar dates (`2023-02-30`, `Febtember 1, 2000`) are
/// skipped.
pub fn find_dates(text: &str) -> Vec<NaiveDate> {
    lazy_static::lazy_static! {
        static ref DATE_LIKE: Regex = Regex::new(
            r"(?i)\d{4}-\d{2}-\d{2}|\d{2}/\d{2}/\d{4}|\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]* \d{1,2},? \d{4}\b"
        ).expect("Static regex");
    }

    DATE_LIKE
        .find_iter(text)
        .filter_map(|found| parse_date(found.as_str()))
        .collect()
}

/// Parses `YYYY-MM-DD`, `MM/DD/YYYY` or `Month D[,] YYYY`. Slashed dates
/// whose first field cannot be a month are read as `DD/MM/YYYY`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
    {
        return Some(date);
    }

    let cleaned = input.replace(',', " ");
    let [month, day, year] = cleaned.split_whitespace().collect::<Vec<_>>()[..] else {
        return None;
    };
    let month = month_number(month)?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

/// `Jan`, `january`, `Sept` all resolve; the word must start a month name
/// and be at least three letters long.
fn month_number(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    if word.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|month| month.starts_with(&word))
        .map(|index| index as u32 + 1)
}

pub fn age_since(start: NaiveDate, now: NaiveDateTime) -> Age {
    let elapsed = now - start.and_time(NaiveTime::MIN);
    let days = elapsed.num_days();
    let hours = (elapsed - chrono::Duration::days(days)).num_hours();
    Age {
        years: days / 365,
        months: (days / 30) % 12,
        days: days % 30,
        hours,
    }
}

/// Whole 365-day years between `birthday` and `today`, rounded down, so a
/// birthday in the future gives a negative age.
pub fn years_since(birthday: NaiveDate, today: NaiveDate) -> i64 {
    (today - birthday).num_days().div_euclid(365)
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{} years, {} months, {} days and {} hours",
            self.years, self.months, self.days, self.hours
        ))
    }
}
