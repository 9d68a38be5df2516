use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::SkillError;
use crate::models::calendar::TimeInterval;

// Day-of-week arithmetic is Monday = 0 .. Sunday = 6 throughout; the week
// starts Monday and closes Sunday. Day-bounded ranges are closed and end at
// 23:59:59 local time.

const SATURDAY: i64 = 5;
const SUNDAY: i64 = 6;

/// Resolves a time-frame phrase against "now" into a concrete interval.
/// Categories are tried in order; the first match wins. Phrases outside the
/// grammar fail with `UnrecognizedTimeFrame`.
pub fn resolve(phrase: &str, now: DateTime<Tz>) -> Result<TimeInterval, SkillError> {
    let tz = now.timezone();
    let today = now.date_naive();
    let lowered = phrase.trim().to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    match *words.as_slice() {
        ["today"] | ["this", "day"] => day_interval(tz, today),
        ["tomorrow"] | ["next", "day"] => day_interval(tz, today + Duration::days(1)),
        [w] if weekday_index_of(w).is_some() => {
            day_interval(tz, upcoming_weekday(today, weekday_index_of(w).unwrap_or(0)))
        }
        ["this", w] if weekday_index_of(w).is_some() => {
            day_interval(tz, upcoming_weekday(today, weekday_index_of(w).unwrap_or(0)))
        }
        ["next", w] if weekday_index_of(w).is_some() => {
            // "next <weekday>" is the occurrence in the following week, at
            // least 7 days out, never the immediate upcoming one.
            let date = upcoming_weekday(today + Duration::days(7), weekday_index_of(w).unwrap_or(0));
            day_interval(tz, date)
        }
        ["this", "week"] => {
            // Start from now so already-elapsed times today drop out of a
            // forward-looking query; close on the week's Saturday.
            let days_to_saturday = (SATURDAY - weekday_index(today)).rem_euclid(7);
            let end = local_instant(tz, today + Duration::days(days_to_saturday), end_of_day())?;
            TimeInterval::new(now.with_timezone(&Utc), end)
        }
        ["next", "week"] => {
            let mut days_to_sunday = (SUNDAY - weekday_index(today)).rem_euclid(7);
            if days_to_sunday == 0 {
                days_to_sunday = 7;
            }
            let start_date = today + Duration::days(days_to_sunday);
            let start = local_instant(tz, start_date, NaiveTime::MIN)?;
            let end = local_instant(tz, start_date + Duration::days(6), end_of_day())?;
            TimeInterval::new(start, end)
        }
        ["this", "weekend"] => weekend_interval(now, 0),
        ["next", "weekend"] => weekend_interval(now, 7),
        [w] if part_of_day_start(w).is_some() => {
            let hour = part_of_day_start(w).unwrap_or(0);
            let time = NaiveTime::from_hms_opt(hour, 0, 0)
                .ok_or_else(|| SkillError::InvalidLocalTime(lowered.clone()))?;
            let start = local_instant(tz, today, time)?;
            TimeInterval::new(start, start + Duration::hours(4))
        }
        [m, d] if month_number(m).is_some() && day_number(d).is_some() => {
            let month = month_number(m).unwrap_or(1);
            let day = day_number(d).unwrap_or(1);
            day_interval(tz, next_occurrence(today, month, day, &lowered)?)
        }
        _ => Err(SkillError::UnrecognizedTimeFrame(phrase.to_string())),
    }
}

/// Saturday through Sunday. When now already falls inside a weekend the
/// interval starts at now; otherwise at the upcoming Saturday's midnight.
/// `offset_days` shifts the whole interval, which is how "next weekend"
/// lands exactly 7 days after "this weekend" regardless of day-of-week.
fn weekend_interval(now: DateTime<Tz>, offset_days: i64) -> Result<TimeInterval, SkillError> {
    let tz = now.timezone();
    let today = now.date_naive();
    let wd = weekday_index(today);
    let (start_date, start_time, end_date) = if wd >= SATURDAY {
        (today, now.time(), today + Duration::days(SUNDAY - wd))
    } else {
        let saturday = today + Duration::days(SATURDAY - wd);
        (saturday, NaiveTime::MIN, saturday + Duration::days(1))
    };
    let start = local_instant(tz, start_date + Duration::days(offset_days), start_time)?;
    let end = local_instant(tz, end_date + Duration::days(offset_days), end_of_day())?;
    TimeInterval::new(start, end)
}

/// Local midnight through 23:59:59 of one calendar day.
fn day_interval(tz: Tz, date: NaiveDate) -> Result<TimeInterval, SkillError> {
    let start = local_instant(tz, date, NaiveTime::MIN)?;
    let end = local_instant(tz, date, end_of_day())?;
    TimeInterval::new(start, end)
}

fn local_instant(tz: Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, SkillError> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| SkillError::InvalidLocalTime(format!("{date} {time}")))
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap()
}

fn weekday_index(date: NaiveDate) -> i64 {
    date.weekday().num_days_from_monday() as i64
}

fn weekday_index_of(word: &str) -> Option<i64> {
    let idx = [
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ]
    .iter()
    .position(|d| *d == word)?;
    Some(idx as i64)
}

/// Next date with the given weekday index, on or after `from`.
fn upcoming_weekday(from: NaiveDate, target: i64) -> NaiveDate {
    from + Duration::days((target - weekday_index(from)).rem_euclid(7))
}

/// Canonical anchor hours for part-of-day words. The four-hour window that
/// follows is a fixed width, not a precise boundary table.
fn part_of_day_start(word: &str) -> Option<u32> {
    match word {
        "morning" => Some(8),
        "noon" | "afternoon" => Some(12),
        "evening" => Some(17),
        "night" => Some(20),
        _ => None,
    }
}

fn month_number(word: &str) -> Option<u32> {
    let idx = [
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
    ]
    .iter()
    .position(|m| *m == word)?;
    Some(idx as u32 + 1)
}

fn day_number(word: &str) -> Option<u32> {
    let digits = word
        .strip_suffix("st")
        .or_else(|| word.strip_suffix("nd"))
        .or_else(|| word.strip_suffix("rd"))
        .or_else(|| word.strip_suffix("th"))
        .unwrap_or(word);
    match digits.parse::<u32>() {
        Ok(day @ 1..=31) => Some(day),
        _ => None,
    }
}

/// Explicit month/day dates without a year mean the next occurrence on or
/// after today.
fn next_occurrence(
    today: NaiveDate,
    month: u32,
    day: u32,
    phrase: &str,
) -> Result<NaiveDate, SkillError> {
    if let Some(date) = NaiveDate::from_ymd_opt(today.year(), month, day) {
        if date >= today {
            return Ok(date);
        }
    }
    NaiveDate::from_ymd_opt(today.year() + 1, month, day)
        .ok_or_else(|| SkillError::UnrecognizedTimeFrame(phrase.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::UTC;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        UTC.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    // 2026-01-05 is a Monday, 2026-01-10 a Saturday, 2026-01-11 a Sunday.

    #[test]
    fn weekday_indexing_is_monday_zero() {
        let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(weekday_index(monday), 0);
        assert_eq!(weekday_index(monday + Duration::days(6)), 6);
    }

    #[test]
    fn upcoming_weekday_includes_today() {
        let tuesday = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        assert_eq!(upcoming_weekday(tuesday, 1), tuesday);
        assert_eq!(
            upcoming_weekday(tuesday, 4),
            NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()
        );
        assert_eq!(
            upcoming_weekday(tuesday, 0),
            NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()
        );
    }

    #[test]
    fn next_occurrence_rolls_into_next_year() {
        let april = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        assert_eq!(
            next_occurrence(april, 3, 3, "march 3rd").unwrap(),
            NaiveDate::from_ymd_opt(2027, 3, 3).unwrap()
        );
        assert_eq!(
            next_occurrence(april, 4, 1, "april 1st").unwrap(),
            april
        );
    }

    #[test]
    fn part_of_day_window_is_four_hours() {
        let now = at(2026, 1, 6, 9, 0);
        let interval = resolve("evening", now).unwrap();
        assert_eq!(interval.start(), utc(2026, 1, 6, 17, 0, 0));
        assert_eq!(interval.end(), utc(2026, 1, 6, 21, 0, 0));
    }

    #[test]
    fn unknown_phrase_is_unrecognized() {
        let err = resolve("whenever", at(2026, 1, 6, 9, 0)).unwrap_err();
        assert!(matches!(err, SkillError::UnrecognizedTimeFrame(_)));
    }
}
