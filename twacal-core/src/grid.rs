//! Month grid and day-to-events resolution.

use chrono::{Datelike, Days, NaiveDate};

use crate::date::{days_in_month, start_of_month};
use crate::event::Event;

/// Seven slots, Sunday first. `None` is a blank slot outside the month.
pub type Week = [Option<NaiveDate>; 7];

/// Sunday-first weeks covering the month containing `month`.
///
/// The first week is padded with blanks up to the weekday of the 1st and
/// the last week is padded until it is complete.
pub fn build_weeks(month: NaiveDate) -> Vec<Week> {
    let first = start_of_month(month);
    let offset = first.weekday().num_days_from_sunday() as usize;

    let mut slots: Vec<Option<NaiveDate>> = vec![None; offset];
    slots.extend((0..days_in_month(first)).map(|d| first.checked_add_days(Days::new(u64::from(d)))));
    while slots.len() % 7 != 0 {
        slots.push(None);
    }

    slots
        .chunks(7)
        .map(|chunk| {
            let mut week: Week = [None; 7];
            week.copy_from_slice(chunk);
            week
        })
        .collect()
}

/// Events that fall on `date`, in collection order.
///
/// Recomputed on every call; dated and annual matches are both included
/// with no precedence between them.
pub fn events_on_date(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|e| e.occurs_on(date)).collect()
}

/// A month laid out for display.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub month: NaiveDate,
    pub weeks: Vec<Week>,
}

/// One visible day and what is on it.
#[derive(Debug)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a Event>,
}

impl<'a> DayCell<'a> {
    /// The event whose category colors the cell.
    pub fn primary(&self) -> Option<&'a Event> {
        self.events.first().copied()
    }
}

impl MonthGrid {
    pub fn new(month: NaiveDate) -> Self {
        let month = start_of_month(month);
        MonthGrid {
            month,
            weeks: build_weeks(month),
        }
    }

    /// Weeks with every non-blank slot resolved against `events`.
    pub fn resolve<'a>(&self, events: &'a [Event]) -> Vec<[Option<DayCell<'a>>; 7]> {
        self.weeks
            .iter()
            .map(|week| {
                week.map(|slot| {
                    slot.map(|date| DayCell {
                        date,
                        events: events_on_date(events, date),
                    })
                })
            })
            .collect()
    }

    /// Every event that appears somewhere in this month, with its dates.
    pub fn agenda<'a>(&self, events: &'a [Event]) -> Vec<DayCell<'a>> {
        self.weeks
            .iter()
            .flatten()
            .flatten()
            .map(|&date| DayCell {
                date,
                events: events_on_date(events, date),
            })
            .filter(|cell| !cell.events.is_empty())
            .collect()
    }
}
