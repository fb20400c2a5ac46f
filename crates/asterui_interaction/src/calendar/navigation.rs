use std::rc::Rc;

use chrono::{Datelike, Days, NaiveDate};

use super::MonthView;

/// Predicate marking dates that can't be focused or selected.
///
/// Called synchronously, possibly many times per key press, so it should be
/// cheap and free of side effects. A panicking predicate unwinds into the
/// caller.
pub type DisabledDateFn = Rc<dyn Fn(NaiveDate) -> bool>;

/// Default bound on how many candidate dates a skip over disabled dates may
/// inspect. Runs of disabled dates longer than this block navigation.
pub const DEFAULT_MAX_SKIP: u32 = 31;

/// Keyboard input understood by the calendar grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridKey {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    /// Enter or Space.
    Commit,
    Escape,
}

/// `date` moved by `delta` days, if the result is representable.
pub fn step(date: NaiveDate, delta: i64) -> Option<NaiveDate> {
    let days = Days::new(delta.unsigned_abs());

    if delta >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    }
}

/// Inspects up to `max_skip` candidates starting at `from` and moving by
/// `delta` days each time, returning the first one that isn't disabled.
pub fn seek_enabled(
    from: NaiveDate,
    delta: i64,
    max_skip: u32,
    is_disabled: &dyn Fn(NaiveDate) -> bool,
) -> Option<NaiveDate> {
    let mut candidate = from;

    for _ in 0..max_skip {
        if !is_disabled(candidate) {
            return Some(candidate);
        }
        candidate = step(candidate, delta)?;
    }

    log::trace!("no enabled date within {max_skip} steps of {from}");
    None
}

/// Where `key` moves a cursor sitting on `cursor`.
///
/// Returns `None` when the key isn't a movement key or when every candidate
/// within the skip bound is disabled, in which case the cursor stays put.
pub fn navigate(
    cursor: NaiveDate,
    key: GridKey,
    max_skip: u32,
    is_disabled: &dyn Fn(NaiveDate) -> bool,
) -> Option<NaiveDate> {
    let month = MonthView::of(cursor);

    let (start, delta) = match key {
        GridKey::Left => (step(cursor, -1)?, -1),
        GridKey::Right => (step(cursor, 1)?, 1),
        GridKey::Up => (step(cursor, -7)?, -7),
        GridKey::Down => (step(cursor, 7)?, 7),
        GridKey::Home => (month.first_day(), 1),
        GridKey::End => (month.last_day(), -1),
        GridKey::PageUp => {
            let previous = month.previous()?;
            return Some(settle(previous.clamped_day(cursor.day()), max_skip, is_disabled));
        }
        GridKey::PageDown => {
            let next = month.next()?;
            return Some(settle(next.clamped_day(cursor.day()), max_skip, is_disabled));
        }
        GridKey::Commit | GridKey::Escape => return None,
    };

    seek_enabled(start, delta, max_skip, is_disabled)
}

/// Moves `date` onto the nearest enabled date, looking forward first. Falls
/// back to `date` itself when nothing within the bound is enabled.
pub fn settle(
    date: NaiveDate,
    max_skip: u32,
    is_disabled: &dyn Fn(NaiveDate) -> bool,
) -> NaiveDate {
    seek_enabled(date, 1, max_skip, is_disabled)
        .or_else(|| seek_enabled(date, -1, max_skip, is_disabled))
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn never(_: NaiveDate) -> bool {
        false
    }

    fn weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    #[test]
    fn test_arrow_steps() {
        let cursor = date(2024, 3, 15);

        assert_eq!(navigate(cursor, GridKey::Right, 31, &never), Some(date(2024, 3, 16)));
        assert_eq!(navigate(cursor, GridKey::Left, 31, &never), Some(date(2024, 3, 14)));
        assert_eq!(navigate(cursor, GridKey::Down, 31, &never), Some(date(2024, 3, 22)));
        assert_eq!(navigate(cursor, GridKey::Up, 31, &never), Some(date(2024, 3, 8)));
    }

    #[test]
    fn test_n_presses_move_n_days() {
        let start = date(2024, 1, 20);

        for n in 0..60 {
            let mut cursor = start;
            for _ in 0..n {
                cursor = navigate(cursor, GridKey::Right, 31, &never).unwrap();
            }
            assert_eq!(cursor, step(start, n).unwrap());

            let mut cursor = start;
            for _ in 0..n {
                cursor = navigate(cursor, GridKey::Up, 31, &never).unwrap();
            }
            assert_eq!(cursor, step(start, -7 * n).unwrap());
        }
    }

    #[test]
    fn test_right_from_friday_skips_weekend() {
        let friday = date(2024, 3, 15);
        assert_eq!(friday.weekday(), Weekday::Fri);

        let monday = navigate(friday, GridKey::Right, 31, &weekend).unwrap();
        assert_eq!(monday, date(2024, 3, 18));

        let tuesday = navigate(monday, GridKey::Right, 31, &weekend).unwrap();
        assert_eq!(tuesday, date(2024, 3, 19));

        assert_eq!(
            navigate(monday, GridKey::Left, 31, &weekend),
            Some(friday),
            "Moving back skips the weekend as well"
        );
    }

    #[test]
    fn test_home_and_end() {
        let cursor = date(2024, 6, 12);

        assert_eq!(navigate(cursor, GridKey::Home, 31, &never), Some(date(2024, 6, 1)));
        assert_eq!(navigate(cursor, GridKey::End, 31, &never), Some(date(2024, 6, 30)));

        // June 1st and 2nd 2024 are a weekend, June 29th and 30th as well.
        assert_eq!(navigate(cursor, GridKey::Home, 31, &weekend), Some(date(2024, 6, 3)));
        assert_eq!(navigate(cursor, GridKey::End, 31, &weekend), Some(date(2024, 6, 28)));
    }

    #[test]
    fn test_crossing_month_boundary() {
        assert_eq!(
            navigate(date(2024, 2, 29), GridKey::Right, 31, &never),
            Some(date(2024, 3, 1))
        );
        assert_eq!(
            navigate(date(2024, 1, 3), GridKey::Up, 31, &never),
            Some(date(2023, 12, 27))
        );
    }

    #[test]
    fn test_exhausted_skip_does_not_move() {
        let cursor = date(2024, 3, 15);
        let everything_after = |d: NaiveDate| d > cursor;

        assert_eq!(navigate(cursor, GridKey::Right, 31, &everything_after), None);
        assert_eq!(navigate(cursor, GridKey::Left, 31, &everything_after), Some(date(2024, 3, 14)));
    }

    #[test]
    fn test_skip_bound_is_respected() {
        let cursor = date(2024, 1, 1);
        let january = |d: NaiveDate| d.month() == 1 && d != cursor;

        assert_eq!(navigate(cursor, GridKey::Right, 31, &january), Some(date(2024, 2, 1)));
        assert_eq!(navigate(cursor, GridKey::Right, 30, &january), None);
    }

    #[test]
    fn test_page_keys_clamp_day() {
        assert_eq!(
            navigate(date(2024, 3, 31), GridKey::PageUp, 31, &never),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            navigate(date(2024, 1, 31), GridKey::PageDown, 31, &never),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            navigate(date(2024, 12, 15), GridKey::PageDown, 31, &never),
            Some(date(2025, 1, 15))
        );
    }

    #[test]
    fn test_non_movement_keys() {
        let cursor = date(2024, 3, 15);

        assert_eq!(navigate(cursor, GridKey::Commit, 31, &never), None);
        assert_eq!(navigate(cursor, GridKey::Escape, 31, &never), None);
    }

    #[test]
    fn test_calendar_edge_does_not_panic() {
        assert_eq!(navigate(NaiveDate::MAX, GridKey::Right, 31, &never), None);
        assert_eq!(navigate(NaiveDate::MIN, GridKey::Up, 31, &never), None);
    }

    #[test]
    fn test_settle() {
        let saturday = date(2024, 3, 16);

        assert_eq!(settle(saturday, 31, &weekend), date(2024, 3, 18));
        assert_eq!(settle(saturday, 31, &|_| true), saturday);
    }
}
