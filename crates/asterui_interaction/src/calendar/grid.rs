use chrono::{Datelike, NaiveDate, Weekday};

use super::CalendarError;

/// Number of columns in a calendar grid.
pub const DAYS_PER_WEEK: usize = 7;

/// Number of days in `month` (1-based) of `year`, taken from the day before
/// the first of the following month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .filter(|last| last.month() == month)
        .map(|last| last.day())
}

/// A displayed (year, month) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthView {
    year: i32,
    month: u32,
}

impl MonthView {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CalendarError::InvalidMonth { year, month });
        }

        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_else(|| unreachable!("validated when the view was built"))
    }

    pub fn last_day(&self) -> NaiveDate {
        self.day(self.day_count()).unwrap_or_else(|| self.first_day())
    }

    pub fn day_count(&self) -> u32 {
        // Only fails for the very last month chrono can represent.
        days_in_month(self.year, self.month).unwrap_or(31)
    }

    /// The given day of this month, if it exists.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// The given day clamped to this month's length.
    pub fn clamped_day(&self, day: u32) -> NaiveDate {
        self.day(day.clamp(1, self.day_count()))
            .unwrap_or_else(|| self.first_day())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn previous(&self) -> Option<Self> {
        self.first_day().pred_opt().map(Self::of)
    }

    pub fn next(&self) -> Option<Self> {
        self.last_day().succ_opt().map(Self::of)
    }
}

/// One cell of a [`CalendarGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    Empty,
    Day(NaiveDate),
}

impl CalendarCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Day(date) => Some(*date),
            Self::Empty => None,
        }
    }

    /// Day of the month, for labels.
    pub fn day(&self) -> Option<u32> {
        self.date().map(|date| date.day())
    }
}

/// Layout of one month: blank cells before day 1, the days, and blank cells
/// completing the last week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarGrid {
    view: MonthView,
    first_day_of_week: Weekday,
    leading_blanks: usize,
    day_count: usize,
}

impl CalendarGrid {
    pub fn new(view: MonthView, first_day_of_week: Weekday) -> Self {
        let first_weekday = view.first_day().weekday();
        let leading_blanks = (first_weekday.num_days_from_sunday() + 7
            - first_day_of_week.num_days_from_sunday()) as usize
            % DAYS_PER_WEEK;

        Self {
            view,
            first_day_of_week,
            leading_blanks,
            day_count: view.day_count() as usize,
        }
    }

    pub fn view(&self) -> MonthView {
        self.view
    }

    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    pub fn leading_blanks(&self) -> usize {
        self.leading_blanks
    }

    pub fn day_count(&self) -> usize {
        self.day_count
    }

    pub fn trailing_blanks(&self) -> usize {
        (DAYS_PER_WEEK - (self.leading_blanks + self.day_count) % DAYS_PER_WEEK) % DAYS_PER_WEEK
    }

    pub fn cell_count(&self) -> usize {
        self.leading_blanks + self.day_count + self.trailing_blanks()
    }

    pub fn week_count(&self) -> usize {
        self.cell_count() / DAYS_PER_WEEK
    }

    /// Column headers in display order.
    pub fn weekdays(&self) -> impl Iterator<Item = Weekday> {
        let mut weekday = self.first_day_of_week;
        (0..DAYS_PER_WEEK).map(move |_| {
            let current = weekday;
            weekday = weekday.succ();
            current
        })
    }

    pub fn cells(&self) -> impl Iterator<Item = CalendarCell> + '_ {
        let days = (1..=self.day_count as u32)
            .filter_map(|day| self.view.day(day))
            .map(CalendarCell::Day);

        std::iter::repeat_n(CalendarCell::Empty, self.leading_blanks)
            .chain(days)
            .chain(std::iter::repeat_n(CalendarCell::Empty, self.trailing_blanks()))
    }

    /// Cells grouped into rows of seven.
    pub fn weeks(&self) -> Vec<[CalendarCell; DAYS_PER_WEEK]> {
        let cells: Vec<CalendarCell> = self.cells().collect();

        cells
            .chunks_exact(DAYS_PER_WEEK)
            .map(|week| {
                let mut row = [CalendarCell::Empty; DAYS_PER_WEEK];
                row.copy_from_slice(week);
                row
            })
            .collect()
    }

    /// Row and column of `date`, if it belongs to this month.
    pub fn position_of(&self, date: NaiveDate) -> Option<(usize, usize)> {
        if !self.view.contains(date) {
            return None;
        }

        let index = self.leading_blanks + date.day0() as usize;
        Some((index / DAYS_PER_WEEK, index % DAYS_PER_WEEK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 1), Some(31));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_march_2024_layout() {
        let grid = CalendarGrid::new(MonthView::new(2024, 3).unwrap(), Weekday::Sun);

        assert_eq!(grid.leading_blanks(), 5, "March 1st 2024 is a Friday");
        assert_eq!(grid.day_count(), 31);
        assert_eq!(grid.cells().filter(|cell| cell.date().is_some()).count(), 31);
        assert_eq!(grid.trailing_blanks(), 6);
        assert_eq!(grid.week_count(), 6);
    }

    #[test]
    fn test_monday_week_start() {
        let grid = CalendarGrid::new(MonthView::new(2024, 3).unwrap(), Weekday::Mon);

        assert_eq!(grid.leading_blanks(), 4);
        assert_eq!(
            grid.weekdays().collect::<Vec<_>>(),
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun
            ]
        );
    }

    #[test]
    fn test_grid_always_tiles_whole_weeks() {
        for year in [1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                for week_start in [Weekday::Sun, Weekday::Mon, Weekday::Sat] {
                    let grid = CalendarGrid::new(MonthView::new(year, month).unwrap(), week_start);

                    assert_eq!(grid.cell_count() % DAYS_PER_WEEK, 0);
                    assert!(grid.leading_blanks() < DAYS_PER_WEEK);
                    assert!(grid.trailing_blanks() < DAYS_PER_WEEK);
                    assert_eq!(grid.cells().count(), grid.cell_count());
                    assert_eq!(
                        grid.day_count() as u32,
                        days_in_month(year, month).unwrap()
                    );
                }
            }
        }
    }

    #[test]
    fn test_february_2015_fits_four_weeks() {
        let grid = CalendarGrid::new(MonthView::new(2015, 2).unwrap(), Weekday::Sun);

        assert_eq!(grid.leading_blanks(), 0);
        assert_eq!(grid.trailing_blanks(), 0);
        assert_eq!(grid.weeks().len(), 4);
    }

    #[test]
    fn test_position_of() {
        let grid = CalendarGrid::new(MonthView::new(2024, 3).unwrap(), Weekday::Sun);
        let date = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();

        assert_eq!(grid.position_of(date(1)), Some((0, 5)));
        assert_eq!(grid.position_of(date(3)), Some((1, 0)));
        assert_eq!(grid.position_of(date(31)), Some((5, 0)));
        assert_eq!(grid.position_of(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()), None);
    }

    #[test]
    fn test_month_view_navigation() {
        let december = MonthView::new(2023, 12).unwrap();

        assert_eq!(december.next(), Some(MonthView::new(2024, 1).unwrap()));
        assert_eq!(
            MonthView::new(2024, 1).unwrap().previous(),
            Some(december)
        );
        assert_eq!(december.clamped_day(40).to_string(), "2023-12-31");
        assert_eq!(
            MonthView::new(2024, 2).unwrap().clamped_day(31).to_string(),
            "2024-02-29"
        );
        assert!(MonthView::new(2024, 0).is_err());
    }
}
