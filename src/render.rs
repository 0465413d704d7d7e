//! Terminal rendering for calendar types.
//!
//! Category colors and icons are presentation only and live here rather
//! than in twacal-core.

use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;
use twacal_core::date::{format_iso_date, parse_event_date};
use twacal_core::event::{Event, EventKind};
use twacal_core::grid::{DayCell, MonthGrid};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Width of one day column, separator excluded
const CELL_WIDTH: usize = 14;

/// Titles shown in a day cell before the "+N" badge
const TITLES_PER_CELL: usize = 2;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn icon(kind: &EventKind) -> &'static str {
    match kind {
        EventKind::Holiday => "⭐",
        EventKind::Birthday => "🎂",
        EventKind::Exam => "📚",
        EventKind::Meeting => "📝",
        EventKind::Event | EventKind::Other(_) => "🎉",
    }
}

/// Color text with the category's color. Unknown categories use the event
/// color.
pub fn paint(kind: &EventKind, text: &str) -> String {
    match kind {
        EventKind::Holiday => text.yellow().to_string(),
        EventKind::Birthday => text.magenta().to_string(),
        EventKind::Exam => text.blue().to_string(),
        EventKind::Meeting => text.truecolor(249, 115, 22).to_string(),
        EventKind::Event | EventKind::Other(_) => text.green().to_string(),
    }
}

impl Render for EventKind {
    fn render(&self) -> String {
        format!("{} {}", icon(self), paint(self, &self.label()))
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!("{} {}", icon(&self.kind), paint(&self.kind, &self.title));
        if self.is_annual() {
            line.push_str(&format!(" {}", "(yearly)".dimmed()));
        }
        if !self.location.is_empty() {
            line.push_str(&format!(" {}", format!("@ {}", self.location).dimmed()));
        }
        line.push_str(&format!(" {}", format!("[{}]", self.id).dimmed()));
        line
    }
}

/// "2026-03-10" or "2026-03-10 → 2026-03-12". Unparseable dates are shown
/// as stored.
pub fn render_dates(event: &Event) -> String {
    let start = match event.start_date() {
        Some(date) => format_iso_date(date),
        None => event.start.clone(),
    };

    let end = event.end.trim();
    if end.is_empty() || end == event.start.trim() {
        return start;
    }
    let end = match parse_event_date(end) {
        Some(date) => format_iso_date(date),
        None => end.to_string(),
    };
    format!("{start} → {end}")
}

/// Title, dates and details of one event, for the day view.
pub fn render_event_detail(event: &Event) -> String {
    let mut lines = vec![
        format!("  {}", event.render()),
        format!("     {}", render_dates(event).dimmed()),
    ];
    if !event.description.is_empty() {
        for line in event.description.lines() {
            lines.push(format!("     {line}"));
        }
    }
    lines.join("\n")
}

/// The month as a bordered grid, Sunday first.
pub fn render_month(grid: &MonthGrid, events: &[Event], today: NaiveDate, dark: bool) -> String {
    let total_width = 7 * (CELL_WIDTH + 1) + 1;
    let mut lines = Vec::new();

    let title = format!(
        "{:^width$}",
        grid.month.format("%B %Y").to_string(),
        width = total_width
    );
    lines.push(if dark {
        title.bold().bright_white().to_string()
    } else {
        title.bold().to_string()
    });

    let frame = |s: &str| {
        if dark {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    };
    let sep = frame("│");
    let rule = frame(&"─".repeat(total_width));

    let mut header = sep.clone();
    for day in WEEKDAYS {
        header.push_str(&format!("{:^width$}", day, width = CELL_WIDTH).bold().to_string());
        header.push_str(&sep);
    }
    lines.push(rule.clone());
    lines.push(header);
    lines.push(rule.clone());

    for week in grid.resolve(events) {
        let mut rows = vec![sep.clone(); 1 + TITLES_PER_CELL];
        for slot in &week {
            for (row, text) in rows.iter_mut().zip(render_cell(slot.as_ref(), today)) {
                row.push_str(&text);
                row.push_str(&sep);
            }
        }
        lines.extend(rows);
        lines.push(rule.clone());
    }

    lines.join("\n")
}

/// Lines of one day cell: the day number (with a "+N" badge when titles
/// are hidden), then up to two titles.
fn render_cell(cell: Option<&DayCell>, today: NaiveDate) -> Vec<String> {
    let blank = " ".repeat(CELL_WIDTH);
    let Some(cell) = cell else {
        return vec![blank; 1 + TITLES_PER_CELL];
    };

    let day = format!("{:>2}", cell.date.day());
    let day = if cell.date == today {
        day.reversed().to_string()
    } else if let Some(first) = cell.primary() {
        paint(&first.kind, &day).bold().to_string()
    } else {
        day
    };

    let hidden = cell.events.len().saturating_sub(TITLES_PER_CELL);
    let badge = if hidden > 0 {
        format!("+{hidden}")
    } else {
        String::new()
    };
    let gap = CELL_WIDTH.saturating_sub(3 + badge.len() + 1);
    let mut lines = vec![format!(" {day}{}{} ", " ".repeat(gap), badge.dimmed())];

    for i in 0..TITLES_PER_CELL {
        match cell.events.get(i) {
            Some(event) => {
                let title = fit(&event.title, CELL_WIDTH - 1);
                lines.push(format!(" {}", paint(&event.kind, &title)));
            }
            None => lines.push(blank.clone()),
        }
    }
    lines
}

/// Truncate with an ellipsis or pad with spaces to exactly `width` chars.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{text}{}", " ".repeat(width - count))
    }
}

pub fn render_legend() -> String {
    EventKind::ALL
        .iter()
        .map(|kind| kind.render())
        .collect::<Vec<_>>()
        .join("   ")
}

/// The "Calendar Stats" panel.
pub fn render_stats(counts: &[(EventKind, usize)], total: usize) -> String {
    let mut lines = vec!["Calendar Stats".bold().to_string()];
    for (kind, count) in counts {
        let label = format!("{:<10}", kind.label());
        lines.push(format!(
            "  {} {} {:>4}",
            icon(kind),
            paint(kind, &label),
            count
        ));
    }

    let other = total.saturating_sub(counts.iter().map(|(_, n)| n).sum());
    if other > 0 {
        lines.push(format!("     {} {:>4}", format!("{:<10}", "Other").dimmed(), other));
    }
    lines.push(format!("     {} {:>4}", format!("{:<10}", "Total").bold(), total));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use twacal_core::event::EventDraft;

    fn event(title: &str, start: &str, end: &str) -> Event {
        EventDraft {
            title: title.into(),
            start: start.into(),
            end: end.into(),
            ..Default::default()
        }
        .into_event("e1".into())
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("PLC", 6), "PLC   ");
        assert_eq!(fit("Foundation Day", 8), "Foundat…");
        assert_eq!(fit("Foundation Day", 8).chars().count(), 8);
    }

    #[test]
    fn test_render_dates() {
        assert_eq!(render_dates(&event("Quiz", "2026-03-10", "")), "2026-03-10");
        assert_eq!(render_dates(&event("Quiz", "2026-03-10", "2026-03-10")), "2026-03-10");
        assert_eq!(
            render_dates(&event("Camp", "2026-03-10", "2026-03-12")),
            "2026-03-10 → 2026-03-12"
        );
        assert_eq!(render_dates(&event("TBA", "soon", "")), "soon");
    }

    #[test]
    fn test_unknown_kind_uses_event_style() {
        let other = EventKind::Other("sports".into());
        assert_eq!(icon(&other), icon(&EventKind::Event));
        assert_eq!(paint(&other, "x"), paint(&EventKind::Event, "x"));
    }

    #[test]
    fn test_cell_shows_two_titles_and_badge() {
        let events = vec![
            event("Assembly", "2026-03-10", ""),
            event("Quiz Bee", "2026-03-10", ""),
            event("Science Fair", "2026-03-10", ""),
        ];
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let cell = DayCell {
            date,
            events: events.iter().collect(),
        };

        let lines = render_cell(Some(&cell), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("+1"));
        assert!(lines[1].contains("Assembly"));
        assert!(lines[2].contains("Quiz Bee"));
        assert!(!lines.iter().any(|l| l.contains("Science Fair")));
    }

    #[test]
    fn test_month_has_a_row_block_per_week() {
        let grid = MonthGrid::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let text = render_month(&grid, &[], today, false);
        // title, rule, weekdays, rule, then per week three rows and a rule
        assert_eq!(text.lines().count(), 4 + grid.weeks.len() * (1 + TITLES_PER_CELL + 1));
    }
}
