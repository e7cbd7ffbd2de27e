//! One month of the financial calendar.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use tax_core::FinancialEvent;
use tax_core::calculations::common::format_yen;

use crate::sample::{SampleData, SampleDataError};

/// A month grid with its totals and events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: u32,
    pub first_weekday: Weekday,
    pub revenue: i64,
    pub expenses: i64,
    pub events: Vec<FinancialEvent>,
}

impl CalendarMonth {
    /// Builds the calendar for `month` (1-12) of `year` from `data`.
    ///
    /// # Errors
    ///
    /// Returns [`SampleDataError::InvalidMonth`] if `month` is not 1-12.
    pub fn build(
        data: &SampleData,
        year: i32,
        month: u32,
    ) -> Result<Self, SampleDataError> {
        let invalid = || SampleDataError::InvalidMonth { year, month };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;

        let (revenue, expenses) = data.month_totals(year, month);

        Ok(Self {
            year,
            month,
            days: next.signed_duration_since(first).num_days() as u32,
            first_weekday: first.weekday(),
            revenue,
            expenses,
            events: data
                .events_in_month(year, month)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    /// Days of the month (1-based) that have at least one event.
    pub fn event_days(&self) -> Vec<u32> {
        let mut days: Vec<u32> = self.events.iter().map(|e| e.date.day()).collect();
        days.dedup();
        days
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{}-{:02}", self.year, self.month)?;
        writeln!(
            f,
            "Revenue {}  Expenses {}",
            format_yen(self.revenue),
            format_yen(self.expenses)
        )?;
        writeln!(f, " Su  Mo  Tu  We  Th  Fr  Sa")?;

        let event_days = self.event_days();
        let offset = self.first_weekday.num_days_from_sunday();
        for _ in 0..offset {
            write!(f, "    ")?;
        }
        for day in 1..=self.days {
            let marker = if event_days.contains(&day) { '*' } else { ' ' };
            write!(f, "{day:>3}{marker}")?;
            if (offset + day) % 7 == 0 {
                writeln!(f)?;
            }
        }
        if (offset + self.days) % 7 != 0 {
            writeln!(f)?;
        }

        for event in &self.events {
            write!(f, "{} [{}] {}", event.date, event.kind.as_str(), event.description)?;
            if let Some(amount) = event.amount {
                write!(f, " {}", format_yen(amount))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn data() -> SampleData {
        SampleData::load().unwrap()
    }

    #[test]
    fn build_counts_days_and_start_weekday() {
        let month = CalendarMonth::build(&data(), 2024, 2).unwrap();

        // 2024 is a leap year; Feb 1 2024 was a Thursday.
        assert_eq!(month.days, 29);
        assert_eq!(month.first_weekday, Weekday::Thu);
    }

    #[test]
    fn build_december_rolls_into_next_year() {
        let month = CalendarMonth::build(&data(), 2024, 12).unwrap();

        assert_eq!(month.days, 31);
    }

    #[test]
    fn build_collects_month_totals_and_events() {
        let month = CalendarMonth::build(&data(), 2024, 1).unwrap();

        assert_eq!(month.revenue, 420_000);
        assert_eq!(month.expenses, 95_000);
        assert_eq!(month.events.len(), 2);
        assert_eq!(month.event_days(), vec![15, 31]);
    }

    #[test]
    fn build_rejects_invalid_month() {
        assert_eq!(
            CalendarMonth::build(&data(), 2024, 13),
            Err(SampleDataError::InvalidMonth {
                year: 2024,
                month: 13,
            })
        );
    }

    #[test]
    fn display_marks_event_days() {
        let text = CalendarMonth::build(&data(), 2024, 1).unwrap().to_string();

        assert!(text.contains(" 15*"));
        assert!(text.contains(" 31*"));
        assert!(text.contains("¥420,000"));
    }
}
