use chrono::{DateTime, Datelike, Duration, Timelike};
use chrono_tz::Tz;

use crate::models::calendar::TimeInterval;

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Renders an interval as a spoken confirmation phrase in the given zone.
/// Same-day events get times, all-day events a single date, and multi-day
/// spans a from/to date pair with the inclusive last day.
pub fn confirm_interval(interval: &TimeInterval, tz: Tz) -> String {
    let start = interval.start().with_timezone(&tz);
    let end = interval.end().with_timezone(&tz);

    if start.date_naive() == end.date_naive() {
        return format!(
            "on {} {} {} from {} to {}",
            weekday_name(&start),
            month_name(&start),
            ordinal(start.day()),
            time_text(start.hour(), start.minute()),
            time_text(end.hour(), end.minute()),
        );
    }

    if is_all_day(&start, &end) {
        return format!(
            "on {} {} {}",
            weekday_name(&start),
            month_name(&start),
            ordinal(start.day()),
        );
    }

    // The displayed end date is the inclusive last day: a midnight end is
    // the exclusive boundary of the previous day, any other end already
    // falls on its own last day.
    let last = if is_midnight(&end) {
        end - Duration::days(1)
    } else {
        end
    };
    format!(
        "from {} {} {} to {} {} {}",
        weekday_name(&start),
        month_name(&start),
        ordinal(start.day()),
        weekday_name(&last),
        month_name(&last),
        ordinal(last.day()),
    )
}

/// 12-hour clock rendering: hour 0 shows as "12", hours 1-9 are zero-padded,
/// minutes always two digits.
pub fn time_text(hour: u32, minute: u32) -> String {
    let (hour, suffix) = if hour < 12 {
        (hour, "am")
    } else {
        (hour - 12, "pm")
    };
    let hour_text = if hour == 0 {
        "12".to_string()
    } else if hour < 10 {
        format!("0{hour}")
    } else {
        hour.to_string()
    };
    format!("{}:{:02}{}", hour_text, minute, suffix)
}

/// English ordinal suffix: 1st, 2nd, 3rd, 4th, with 11th-13th as "th".
pub fn ordinal(day: u32) -> String {
    let suffix = match day % 100 {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{day}{suffix}")
}

fn weekday_name(dt: &DateTime<Tz>) -> &'static str {
    WEEKDAYS[dt.weekday().num_days_from_monday() as usize]
}

fn month_name(dt: &DateTime<Tz>) -> &'static str {
    MONTHS[dt.month0() as usize]
}

fn is_midnight(dt: &DateTime<Tz>) -> bool {
    dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0
}

fn is_all_day(start: &DateTime<Tz>, end: &DateTime<Tz>) -> bool {
    is_midnight(start)
        && is_midnight(end)
        && end.date_naive() == start.date_naive() + Duration::days(1)
}
