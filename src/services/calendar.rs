use chrono::{Datelike, NaiveDate};

/// Month names as displayed and as stored on appointments. The reverse
/// lookup in [`month_index`] is what resolves a stored month back to a
/// calendar position during reschedule.
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

pub fn month_name(month_index: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month_index as usize).copied()
}

/// First matching index for a stored month name. Stored months carry no
/// year, so the mapping is only unambiguous within a single year.
pub fn month_index(name: &str) -> Option<u32> {
    MONTH_NAMES.iter().position(|m| *m == name).map(|i| i as u32)
}

/// The cells of a month grid: `leading_blanks` empty cells align day 1
/// under its weekday column (0=Sunday..6=Saturday), then `days` run 1..=N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub leading_blanks: u32,
    pub days: Vec<u32>,
}

pub fn month_grid(year: i32, month_index: u32) -> MonthGrid {
    let total = days_in_month(year, month_index);
    let leading_blanks = weekday_of(year, month_index, 1).unwrap_or(0);
    MonthGrid {
        leading_blanks,
        days: (1..=total).collect(),
    }
}

/// Number of days in the month: the predecessor of the first day of the
/// following month.
pub fn days_in_month(year: i32, month_index: u32) -> u32 {
    let month = month_index.min(11);
    let (next_year, next_month) = if month == 11 {
        (year + 1, 1)
    } else {
        (year, month + 2)
    };
    let first_of_next =
        NaiveDate::from_ymd_opt(next_year, next_month, 1).expect("valid first of month");
    first_of_next.pred_opt().expect("previous day exists").day()
}

/// Weekday index of a day in the month, 0=Sunday..6=Saturday. None for a
/// day the month does not have.
pub fn weekday_of(year: i32, month_index: u32, day: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month_index.min(11) + 1, day)
        .map(|d| d.weekday().num_days_from_sunday())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month_lengths() {
        assert_eq!(days_in_month(2024, 0), 31); // Janeiro
        assert_eq!(days_in_month(2024, 3), 30); // Abril
        assert_eq!(days_in_month(2024, 11), 31); // Dezembro rolls into next year
    }

    #[test]
    fn test_days_in_february_leap_years() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
        assert_eq!(days_in_month(1900, 1), 28);
    }

    #[test]
    fn test_month_grid_alignment() {
        // 2024-03-01 was a Friday
        let grid = month_grid(2024, 2);
        assert_eq!(grid.leading_blanks, 5);
        assert_eq!(grid.days.len(), 31);
        assert_eq!(grid.days.first(), Some(&1));
        assert_eq!(grid.days.last(), Some(&31));

        // 2024-09-01 was a Sunday, so the grid starts flush left
        let grid = month_grid(2024, 8);
        assert_eq!(grid.leading_blanks, 0);
        assert_eq!(grid.days.len(), 30);
    }

    #[test]
    fn test_weekday_of() {
        // 2024-03-17 was a Sunday
        assert_eq!(weekday_of(2024, 2, 17), Some(0));
        assert_eq!(weekday_of(2024, 2, 15), Some(5));
        // Day 31 of a 30-day month does not exist
        assert_eq!(weekday_of(2024, 3, 31), None);
    }

    #[test]
    fn test_month_name_round_trip() {
        for i in 0..12 {
            let name = month_name(i).unwrap();
            assert_eq!(month_index(name), Some(i));
        }
        assert_eq!(month_index("March"), None);
        assert_eq!(month_name(12), None);
    }
}
