use chrono::{DateTime, Datelike, Timelike, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Order of the date fields in a locale's short date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    MonthDayYear,
    DayMonthYear,
    YearMonthDay,
}

/// Short date style of a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateStyle {
    pub order: DateOrder,
    pub separator: char,
    /// Zero pad day and month to two digits
    pub pad: bool,
    /// 12-hour clock with AM/PM
    pub hour12: bool,
}

impl DateStyle {
    /// ISO style used for unknown locales
    pub const ISO: DateStyle = DateStyle {
        order: DateOrder::YearMonthDay,
        separator: '-',
        pad: true,
        hour12: false,
    };

    /// Look up the style for a BCP 47 locale tag such as `en-US` or `pt-PT`
    pub fn for_locale(locale: &str) -> Self {
        let tag = locale.trim().replace('_', "-").to_lowercase();
        let language = tag.split('-').next().unwrap_or("");

        match (tag.as_str(), language) {
            ("en-us", _) | ("en", _) => DateStyle {
                order: DateOrder::MonthDayYear,
                separator: '/',
                pad: false,
                hour12: true,
            },
            (_, "de") => DateStyle {
                order: DateOrder::DayMonthYear,
                separator: '.',
                pad: false,
                hour12: false,
            },
            (_, "es") => DateStyle {
                order: DateOrder::DayMonthYear,
                separator: '/',
                pad: false,
                hour12: false,
            },
            (_, "pt") | (_, "fr") | (_, "it") | (_, "en") => DateStyle {
                order: DateOrder::DayMonthYear,
                separator: '/',
                pad: true,
                hour12: false,
            },
            (_, "ja") | (_, "zh") => DateStyle {
                order: DateOrder::YearMonthDay,
                separator: '/',
                pad: false,
                hour12: false,
            },
            _ => DateStyle::ISO,
        }
    }

    pub fn format_date(&self, date: &DateTime<Utc>) -> String {
        let (day, month) = if self.pad {
            (format!("{:02}", date.day()), format!("{:02}", date.month()))
        } else {
            (date.day().to_string(), date.month().to_string())
        };
        let year = date.year().to_string();

        let parts = match self.order {
            DateOrder::MonthDayYear => [month, day, year],
            DateOrder::DayMonthYear => [day, month, year],
            DateOrder::YearMonthDay => [year, month, day],
        };

        let separator = self.separator.to_string();
        parts.join(separator.as_str())
    }

    pub fn format_time(&self, date: &DateTime<Utc>) -> String {
        if self.hour12 {
            let (is_pm, hour) = date.hour12();
            format!(
                "{}:{:02} {}",
                hour,
                date.minute(),
                if is_pm { "PM" } else { "AM" }
            )
        } else {
            format!("{:02}:{:02}", date.hour(), date.minute())
        }
    }
}

/// Whole days between two instants, rounded to the nearest day.
///
/// The difference is absolute, so the argument order does not matter. A
/// movement twelve or more hours old already counts as one day.
pub fn days_passed(now: DateTime<Utc>, date: DateTime<Utc>) -> i64 {
    let millis = (now - date).num_milliseconds().abs() as f64;
    (millis / MILLIS_PER_DAY).round() as i64
}

/// Locale formatted short date
pub fn format_date(date: &DateTime<Utc>, locale: &str) -> String {
    DateStyle::for_locale(locale).format_date(date)
}

/// Human relative label for a movement date
pub fn relative_date(now: DateTime<Utc>, date: DateTime<Utc>, locale: &str) -> String {
    match days_passed(now, date) {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days if days <= 7 => format!("{} days ago", days),
        _ => format_date(&date, locale),
    }
}

/// Date and time shown next to the balance after login
pub fn format_login_timestamp(now: &DateTime<Utc>, locale: &str) -> String {
    let style = DateStyle::for_locale(locale);
    format!("{}, {}", style.format_date(now), style.format_time(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use test_case::test_case;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 12, 10, 12, 0, 0).unwrap()
    }

    #[test_case(Duration::hours(3), "Today")]
    #[test_case(Duration::days(1), "Yesterday")]
    #[test_case(Duration::days(5), "5 days ago")]
    #[test_case(Duration::days(7), "7 days ago")]
    #[test_case(Duration::days(30), "10/11/2021")]
    fn test_relative_date(age: Duration, expected: &str) {
        assert_eq!(relative_date(now(), now() - age, "pt-PT"), expected);
    }

    #[test]
    fn test_days_passed_rounds_to_nearest_day() {
        assert_eq!(days_passed(now(), now() - Duration::hours(11)), 0);
        assert_eq!(days_passed(now(), now() - Duration::hours(12)), 1);
        assert_eq!(days_passed(now(), now() - Duration::hours(36)), 2);
        // seven and a half days rounds up past the "days ago" range
        assert_eq!(days_passed(now(), now() - Duration::hours(180)), 8);
    }

    #[test]
    fn test_days_passed_is_absolute() {
        assert_eq!(days_passed(now(), now() + Duration::days(3)), 3);
        assert_eq!(relative_date(now(), now() + Duration::days(1), "en-US"), "Yesterday");
    }

    #[test_case("en-US", "1/5/2020")]
    #[test_case("pt-PT", "05/01/2020")]
    #[test_case("en-GB", "05/01/2020")]
    #[test_case("de-DE", "5.1.2020")]
    #[test_case("es-ES", "5/1/2020")]
    #[test_case("ja-JP", "2020/1/5")]
    #[test_case("xx-YY", "2020-01-05")]
    fn test_format_date_per_locale(locale: &str, expected: &str) {
        let date = Utc.with_ymd_and_hms(2020, 1, 5, 9, 7, 0).unwrap();
        assert_eq!(format_date(&date, locale), expected);
    }

    #[test]
    fn test_format_login_timestamp() {
        let date = Utc.with_ymd_and_hms(2021, 11, 26, 14, 5, 0).unwrap();
        assert_eq!(format_login_timestamp(&date, "en-US"), "11/26/2021, 2:05 PM");
        assert_eq!(format_login_timestamp(&date, "pt-PT"), "26/11/2021, 14:05");
    }
}
