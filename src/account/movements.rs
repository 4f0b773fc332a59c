use serde::Serialize;

use crate::account::model::{Account, Movement, MovementKind};
use crate::clock::Clock;
use crate::format::relative_date;

/// One line of the movements list
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MovementRow {
    /// 1-based position in the listed order
    pub index: usize,
    pub kind: MovementKind,
    pub relative_date: String,
    pub amount: f64,
}

/// List an account's movements.
///
/// Unsorted lists keep chronological order; sorted lists are ascending by
/// amount, ties keeping their chronological order. Each movement's date
/// stays with its amount either way. The clock is read once per listing.
pub fn list_movements(account: &Account, sorted: bool, clock: &dyn Clock) -> Vec<MovementRow> {
    let now = clock.now();
    let mut movements: Vec<&Movement> = account.movements().iter().collect();
    if sorted {
        movements.sort_by(|a, b| a.amount.total_cmp(&b.amount));
    }

    movements
        .into_iter()
        .enumerate()
        .map(|(i, movement)| MovementRow {
            index: i + 1,
            kind: movement.kind(),
            relative_date: relative_date(now, movement.date, &account.locale),
            amount: movement.amount,
        })
        .collect()
}

/// Sort button state. Each press flips between sorted and chronological.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SortToggle {
    sorted: bool,
}

impl SortToggle {
    /// Flip the state and return the new one
    pub fn toggle(&mut self) -> bool {
        self.sorted = !self.sorted;
        self.sorted
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn reset(&mut self) {
        self.sorted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, MockClock};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 12, 10, 12, 0, 0).unwrap()
    }

    fn account() -> Account {
        Account::new("Jessica Davis", 2222, 1.5, "USD", "en-US").with_movements(vec![
            Movement::new(5000.0, now() - Duration::days(40)),
            Movement::new(-150.0, now() - Duration::days(3)),
            Movement::new(3400.0, now() - Duration::days(1)),
            Movement::new(-30.0, now()),
        ])
    }

    fn amounts(rows: &[MovementRow]) -> Vec<f64> {
        rows.iter().map(|r| r.amount).collect()
    }

    #[test]
    fn test_unsorted_keeps_chronological_order() {
        let rows = list_movements(&account(), false, &FixedClock(now()));

        assert_eq!(amounts(&rows), vec![5000.0, -150.0, 3400.0, -30.0]);
        assert_eq!(rows[0].relative_date, "10/31/2021");
        assert_eq!(rows[1].relative_date, "3 days ago");
        assert_eq!(rows[2].relative_date, "Yesterday");
        assert_eq!(rows[3].relative_date, "Today");
        assert_eq!(rows[3].kind, MovementKind::Withdrawal);
        assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sorted_is_ascending_and_dates_follow_amounts() {
        let rows = list_movements(&account(), true, &FixedClock(now()));

        assert_eq!(amounts(&rows), vec![-150.0, -30.0, 3400.0, 5000.0]);
        assert_eq!(rows[0].relative_date, "3 days ago");
        assert_eq!(rows[1].relative_date, "Today");
        assert_eq!(rows[3].kind, MovementKind::Deposit);
        assert_eq!(rows[0].index, 1);
    }

    #[test]
    fn test_sorting_does_not_touch_the_account() {
        let acc = account();
        let before = acc.clone();
        let _ = list_movements(&acc, true, &FixedClock(now()));
        assert_eq!(acc, before);
    }

    #[test]
    fn test_double_toggle_returns_to_chronological() {
        let acc = account();
        let mut toggle = SortToggle::default();

        assert!(toggle.toggle());
        let sorted = list_movements(&acc, toggle.is_sorted(), &FixedClock(now()));
        assert_eq!(amounts(&sorted), vec![-150.0, -30.0, 3400.0, 5000.0]);

        assert!(!toggle.toggle());
        let unsorted = list_movements(&acc, toggle.is_sorted(), &FixedClock(now()));
        assert_eq!(unsorted, list_movements(&acc, false, &FixedClock(now())));
    }

    #[test]
    fn test_one_clock_reading_per_listing() {
        let mut clock = MockClock::new();
        clock.expect_now().times(1).returning(now);

        let rows = list_movements(&account(), false, &clock);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].relative_date, "Today");
    }
}
