//! Execution-date calendar.
//!
//! Deterministic and pure: the caller supplies "now" and gets back the
//! nominal settlement date for an order placed at that instant. All dates are
//! taken in UTC.
//!
//! # Policies
//!
//! - [`ExecutionCalendar::Weekends`] (default): Saturday rolls forward two
//!   days, Sunday one day, any weekday is kept.
//! - [`ExecutionCalendar::NyseHolidays`]: rolls forward day by day until the
//!   date is a weekday that is not one of the hard-coded US market holidays
//!   (2023–2026).

use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};

/// How an order's execution date is derived from its creation time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionCalendar {
    #[default]
    Weekends,
    NyseHolidays,
}

impl ExecutionCalendar {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionCalendar::Weekends => "weekends",
            ExecutionCalendar::NyseHolidays => "nyse_holidays",
        }
    }

    /// Execution date for an order created at `now`.
    pub fn execution_date(&self, now: DateTime<Utc>) -> NaiveDate {
        self.roll_forward(now.date_naive())
    }

    /// First valid execution date on or after `date`.
    pub fn roll_forward(&self, date: NaiveDate) -> NaiveDate {
        match self {
            ExecutionCalendar::Weekends => match date.weekday() {
                Weekday::Sat => add_days(date, 2),
                Weekday::Sun => add_days(date, 1),
                _ => date,
            },
            ExecutionCalendar::NyseHolidays => {
                let mut d = date;
                while !is_nyse_trading_day(d) {
                    d = add_days(d, 1);
                }
                d
            }
        }
    }
}

impl FromStr for ExecutionCalendar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "weekends" => Ok(ExecutionCalendar::Weekends),
            "nyse_holidays" => Ok(ExecutionCalendar::NyseHolidays),
            other => Err(format!(
                "unknown execution calendar '{other}' (expected weekends | nyse_holidays)"
            )),
        }
    }
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    // Only fails at the end of chrono's representable range (year 262143).
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}

fn is_nyse_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !is_nyse_holiday(date)
}

/// Observed NYSE full-day closures, 2023–2026. Extend as needed.
fn is_nyse_holiday(date: NaiveDate) -> bool {
    const HOLIDAYS: &[(i32, u32, u32)] = &[
        // ── 2023 ─────────────────────────────────────────────────────────
        (2023, 1, 2),   // New Year's Day (observed Mon)
        (2023, 1, 16),  // MLK Day
        (2023, 2, 20),  // Presidents' Day
        (2023, 4, 7),   // Good Friday
        (2023, 5, 29),  // Memorial Day
        (2023, 6, 19),  // Juneteenth
        (2023, 7, 4),   // Independence Day
        (2023, 9, 4),   // Labor Day
        (2023, 11, 23), // Thanksgiving
        (2023, 12, 25), // Christmas
        // ── 2024 ─────────────────────────────────────────────────────────
        (2024, 1, 1),
        (2024, 1, 15),
        (2024, 2, 19),
        (2024, 3, 29),
        (2024, 5, 27),
        (2024, 6, 19),
        (2024, 7, 4),
        (2024, 9, 2),
        (2024, 11, 28),
        (2024, 12, 25),
        // ── 2025 ─────────────────────────────────────────────────────────
        (2025, 1, 1),
        (2025, 1, 20),
        (2025, 2, 17),
        (2025, 4, 18),
        (2025, 5, 26),
        (2025, 6, 19),
        (2025, 7, 4),
        (2025, 9, 1),
        (2025, 11, 27),
        (2025, 12, 25),
        // ── 2026 ─────────────────────────────────────────────────────────
        (2026, 1, 1),
        (2026, 1, 19),
        (2026, 2, 16),
        (2026, 4, 3),
        (2026, 5, 25),
        (2026, 6, 19),
        (2026, 7, 3), // Independence Day observed (July 4 is a Saturday)
        (2026, 9, 7),
        (2026, 11, 26),
        (2026, 12, 25),
    ];
    HOLIDAYS.contains(&(date.year(), date.month(), date.day()))
}
