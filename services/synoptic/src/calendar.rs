//! Activity index and calendar navigation over the event log

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};

use crate::backend::HistoryEvent;

/// Event count per calendar day
pub type ActivityIndex = BTreeMap<NaiveDate, usize>;

/// Date portion of an event timestamp (`YYYY-MM-DD HH:MM:SS`)
pub fn event_date(ts: &str) -> Option<NaiveDate> {
    let date = ts.split_whitespace().next()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Bucket the event log by calendar day.
///
/// Rebuilt whole whenever the log is loaded; events whose timestamp does
/// not parse are skipped.
pub fn build_index(events: &[HistoryEvent]) -> ActivityIndex {
    let mut index = ActivityIndex::new();
    for event in events {
        if let Some(date) = event_date(&event.ts) {
            *index.entry(date).or_insert(0) += 1;
        }
    }
    index
}

/// Chronological indices of the events on a given day
pub fn events_on(events: &[HistoryEvent], date: NaiveDate) -> Vec<usize> {
    events
        .iter()
        .enumerate()
        .filter(|(_, event)| event_date(&event.ts) == Some(date))
        .map(|(i, _)| i)
        .collect()
}

/// One day cell of the visible month
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub count: usize,
    pub selected: bool,
    /// Visual weight relative to the busiest day of the visible month,
    /// clamped to [0, 1]
    pub intensity: f64,
}

/// Drives month navigation and day selection for the activity calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    /// First day of the displayed month
    visible_month: NaiveDate,
    selected: NaiveDate,
}

impl Navigator {
    /// Default focus: the last event's date, or today when the log is empty
    /// (or the last timestamp does not parse). The displayed month is the
    /// focused date's month.
    pub fn new(events: &[HistoryEvent], today: NaiveDate) -> Self {
        let selected = events
            .last()
            .and_then(|event| event_date(&event.ts))
            .unwrap_or(today);
        Self {
            visible_month: first_of_month(selected),
            selected,
        }
    }

    pub fn visible_month(&self) -> NaiveDate {
        self.visible_month
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    /// Show the previous month; the selected date stays put
    pub fn prev_month(&mut self) {
        self.visible_month = add_months(self.visible_month, -1);
    }

    /// Show the next month; the selected date stays put
    pub fn next_month(&mut self) {
        self.visible_month = add_months(self.visible_month, 1);
    }

    /// Jump selection and view back to today
    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.selected = today;
        self.visible_month = first_of_month(today);
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    /// Number of leading pad cells before day 1 in a Sunday-first grid
    pub fn leading_blanks(&self) -> u32 {
        self.visible_month.weekday().num_days_from_sunday()
    }

    /// Data for every day cell of the visible month
    pub fn day_cells(&self, index: &ActivityIndex) -> Vec<DayCell> {
        let max_count = index
            .range(self.visible_month..=last_of_month(self.visible_month))
            .map(|(_, &count)| count)
            .max()
            .unwrap_or(0)
            .max(1);

        (1..=days_in_month(self.visible_month))
            .filter_map(|day| {
                self.visible_month.with_day(day).map(|date| {
                    let count = index.get(&date).copied().unwrap_or(0);
                    DayCell {
                        date,
                        day,
                        count,
                        selected: date == self.selected,
                        intensity: (count as f64 / max_count as f64).clamp(0.0, 1.0),
                    }
                })
            })
            .collect()
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(month: NaiveDate) -> NaiveDate {
    add_months(month, 1).pred_opt().unwrap_or(month)
}

fn days_in_month(month: NaiveDate) -> u32 {
    last_of_month(month).day()
}

/// Shift a first-of-month date by whole months
fn add_months(month: NaiveDate, delta: i32) -> NaiveDate {
    let shifted = if delta >= 0 {
        month.checked_add_months(Months::new(delta as u32))
    } else {
        month.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(ts: &str) -> HistoryEvent {
        HistoryEvent {
            ts: ts.to_string(),
            id: "valveA".to_string(),
            state: true,
            user: "op".to_string(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn index_buckets_events_by_day() {
        let events = vec![
            event("2024-01-05 10:00:00"),
            event("2024-01-05 11:00:00"),
            event("2024-01-06 09:00:00"),
        ];
        let index = build_index(&events);

        assert_eq!(index.len(), 2);
        assert_eq!(index[&date("2024-01-05")], 2);
        assert_eq!(index[&date("2024-01-06")], 1);
    }

    #[test]
    fn index_skips_unparseable_timestamps() {
        let events = vec![event("garbage"), event("2024-01-05 10:00:00")];
        let index = build_index(&events);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&date("2024-01-05")], 1);
    }

    #[test]
    fn default_focus_on_empty_log_is_today() {
        let today = date("2024-06-15");
        let navigator = Navigator::new(&[], today);
        assert_eq!(navigator.selected(), today);
        assert_eq!(navigator.visible_month(), date("2024-06-01"));
    }

    #[test]
    fn default_focus_follows_the_last_event() {
        let events = vec![event("2024-01-05 10:00:00"), event("2024-03-20 08:30:00")];
        let navigator = Navigator::new(&events, date("2024-06-15"));
        assert_eq!(navigator.selected(), date("2024-03-20"));
        assert_eq!(navigator.visible_month(), date("2024-03-01"));
    }

    #[test]
    fn unparseable_last_timestamp_falls_back_to_today() {
        let events = vec![event("2024-01-05 10:00:00"), event("garbage")];
        let today = date("2024-06-15");
        let navigator = Navigator::new(&events, today);
        assert_eq!(navigator.selected(), today);
    }

    #[test]
    fn month_navigation_keeps_the_selection() {
        let mut navigator = Navigator::new(&[event("2024-03-20 08:30:00")], date("2024-06-15"));

        navigator.prev_month();
        assert_eq!(navigator.visible_month(), date("2024-02-01"));
        assert_eq!(navigator.selected(), date("2024-03-20"));

        navigator.next_month();
        navigator.next_month();
        assert_eq!(navigator.visible_month(), date("2024-04-01"));
        assert_eq!(navigator.selected(), date("2024-03-20"));
    }

    #[test]
    fn month_navigation_wraps_the_year() {
        let mut navigator = Navigator::new(&[event("2024-01-10 00:00:00")], date("2024-06-15"));
        navigator.prev_month();
        assert_eq!(navigator.visible_month(), date("2023-12-01"));
        navigator.next_month();
        assert_eq!(navigator.visible_month(), date("2024-01-01"));
    }

    #[test]
    fn go_to_today_resets_selection_and_month() {
        let mut navigator = Navigator::new(&[event("2024-03-20 08:30:00")], date("2024-06-15"));
        navigator.go_to_today(date("2024-06-15"));
        assert_eq!(navigator.selected(), date("2024-06-15"));
        assert_eq!(navigator.visible_month(), date("2024-06-01"));
    }

    #[test]
    fn day_cells_scale_intensity_within_the_visible_month() {
        let events = vec![
            event("2024-01-05 10:00:00"),
            event("2024-01-05 11:00:00"),
            event("2024-01-05 12:00:00"),
            event("2024-01-05 13:00:00"),
            event("2024-01-06 09:00:00"),
            // busier day in another month must not skew January's scale
            event("2024-02-01 09:00:00"),
            event("2024-02-01 09:01:00"),
            event("2024-02-01 09:02:00"),
            event("2024-02-01 09:03:00"),
            event("2024-02-01 09:04:00"),
            event("2024-02-01 09:05:00"),
            event("2024-02-01 09:06:00"),
            event("2024-02-01 09:07:00"),
        ];
        let index = build_index(&events);
        let mut navigator = Navigator::new(&events, date("2024-06-15"));
        navigator.select_date(date("2024-01-05"));
        navigator.prev_month();
        assert_eq!(navigator.visible_month(), date("2024-01-01"));

        let cells = navigator.day_cells(&index);
        assert_eq!(cells.len(), 31);

        let day5 = &cells[4];
        assert_eq!(day5.count, 4);
        assert!(day5.selected);
        assert!((day5.intensity - 1.0).abs() < 1e-9);

        let day6 = &cells[5];
        assert_eq!(day6.count, 1);
        assert!(!day6.selected);
        assert!((day6.intensity - 0.25).abs() < 1e-9);

        let day7 = &cells[6];
        assert_eq!(day7.count, 0);
        assert_eq!(day7.intensity, 0.0);
    }

    #[test]
    fn day_cells_on_a_quiet_month_stay_at_zero_intensity() {
        let navigator = Navigator::new(&[], date("2024-06-15"));
        let cells = navigator.day_cells(&ActivityIndex::new());
        assert_eq!(cells.len(), 30);
        assert!(cells.iter().all(|cell| cell.intensity == 0.0));
    }

    #[test]
    fn leading_blanks_match_the_weekday_of_day_one() {
        // 2024-03-01 is a Friday
        let navigator = Navigator::new(&[event("2024-03-20 08:30:00")], date("2024-06-15"));
        assert_eq!(navigator.leading_blanks(), 5);
    }

    #[test]
    fn events_on_filters_by_selected_day() {
        let events = vec![
            event("2024-01-05 10:00:00"),
            event("2024-01-06 09:00:00"),
            event("2024-01-05 11:00:00"),
        ];
        assert_eq!(events_on(&events, date("2024-01-05")), vec![0, 2]);
        assert_eq!(events_on(&events, date("2024-01-06")), vec![1]);
        assert!(events_on(&events, date("2024-01-07")).is_empty());
    }
}
