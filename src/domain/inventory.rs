//! Pure ledger logic for the exhibition ticket pool.
//!
//! The storage layer performs the actual decrement as a single conditional
//! `UPDATE ... WHERE available_tickets >= qty`, so concurrent purchases can
//! never oversell. The functions here derive everything else from the values
//! that update returns.

use crate::models::exhibition::{STATUS_ACTIVE, STATUS_SOLD_OUT};

/// Upper bound on tickets per single purchase.
pub const MAX_TICKETS_PER_PURCHASE: i32 = 10;

pub const TICKET_NUMBER_PREFIX: &str = "TKT";

/// Why a conditional reservation update matched zero rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveFailure {
    NotFound,
    NotBookable,
    OutOfStock,
}

/// Classifies a failed reservation from a follow-up read of the row.
/// `row` is `(status, available_tickets)`, or `None` when the exhibition
/// does not exist.
pub fn classify_reserve_failure(row: Option<(&str, i32)>, quantity: i32) -> ReserveFailure {
    match row {
        None => ReserveFailure::NotFound,
        // Shortage is reported before status: a sold-out pool with too few
        // tickets is out of stock, not merely unbookable.
        Some((_, available)) if available < quantity => ReserveFailure::OutOfStock,
        Some((status, _)) if status != STATUS_ACTIVE => ReserveFailure::NotBookable,
        // The pool refilled between the update and the re-read; still report
        // the shortage the update saw.
        Some(_) => ReserveFailure::OutOfStock,
    }
}

/// Status derived from the pool counter after a successful reservation.
pub fn status_after_reserve(new_available: i32) -> &'static str {
    if new_available == 0 {
        STATUS_SOLD_OUT
    } else {
        STATUS_ACTIVE
    }
}

/// Recomputes the available pool when an admin edits `total_tickets`.
/// Sold tickets are never un-reserved, so the new pool is the new total
/// minus everything already sold, floored at zero.
pub fn restocked_available(new_total: i32, old_total: i32, old_available: i32) -> i32 {
    let tickets_sold = old_total - old_available;
    (new_total - tickets_sold).max(0)
}

/// Ticket number format: prefix + millisecond timestamp + 3 random digits.
/// Uniqueness is enforced by the storage layer; callers retry on collision.
pub fn format_ticket_number(timestamp_millis: i64, random: u32) -> String {
    format!("{TICKET_NUMBER_PREFIX}{timestamp_millis}{:03}", random % 1000)
}

pub fn generate_ticket_number() -> String {
    use rand::Rng;
    format_ticket_number(
        chrono::Utc::now().timestamp_millis(),
        rand::thread_rng().gen_range(0..1000),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    /// Test model of the storage layer's conditional decrement: a
    /// compare-and-swap that only succeeds while enough tickets remain.
    fn try_reserve(available: &AtomicI32, quantity: i32) -> Option<i32> {
        let mut current = available.load(Ordering::Acquire);
        loop {
            if current < quantity {
                return None;
            }
            match available.compare_exchange(
                current,
                current - quantity,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(current - quantity),
                Err(actual) => current = actual,
            }
        }
    }

    #[test]
    fn sequential_purchases_drain_the_pool() {
        // 5 available: buying 3 leaves 2 and stays active, buying 2 more
        // empties the pool and flips the status.
        let pool = AtomicI32::new(5);

        let after_first = try_reserve(&pool, 3).unwrap();
        assert_eq!(after_first, 2);
        assert_eq!(status_after_reserve(after_first), STATUS_ACTIVE);

        let after_second = try_reserve(&pool, 2).unwrap();
        assert_eq!(after_second, 0);
        assert_eq!(status_after_reserve(after_second), STATUS_SOLD_OUT);
    }

    #[test]
    fn overdraw_fails_and_leaves_pool_unchanged() {
        let pool = AtomicI32::new(5);
        assert!(try_reserve(&pool, 6).is_none());
        assert_eq!(pool.load(Ordering::Acquire), 5);
    }

    #[test]
    fn concurrent_reservations_never_oversell() {
        const TOTAL: i32 = 50;
        const BUYERS: usize = 40;
        const QTY: i32 = 3;

        let pool = Arc::new(AtomicI32::new(TOTAL));
        let handles: Vec<_> = (0..BUYERS)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || try_reserve(&pool, QTY).is_some())
            })
            .collect();

        let succeeded = handles
            .into_iter()
            .filter_map(|h| h.join().ok())
            .filter(|reserved| *reserved)
            .count() as i32;

        let remaining = pool.load(Ordering::Acquire);
        assert!(remaining >= 0);
        assert_eq!(remaining, TOTAL - succeeded * QTY);
        assert!(succeeded * QTY <= TOTAL);
    }

    /// Test model of multi-line order placement: reserve each line with the
    /// conditional decrement, and undo every earlier line when one fails.
    fn try_reserve_all(stocks: &[AtomicI32], lines: &[(usize, i32)]) -> bool {
        let mut taken: Vec<(usize, i32)> = Vec::new();
        for &(idx, qty) in lines {
            if try_reserve(&stocks[idx], qty).is_none() {
                for (idx, qty) in taken.drain(..) {
                    stocks[idx].fetch_add(qty, Ordering::AcqRel);
                }
                return false;
            }
            taken.push((idx, qty));
        }
        true
    }

    #[test]
    fn short_line_rolls_back_the_whole_order() {
        // Second line is short: the first line's decrement is undone and no
        // stock moves.
        let stocks = [AtomicI32::new(10), AtomicI32::new(1)];
        assert!(!try_reserve_all(&stocks, &[(0, 4), (1, 3)]));
        assert_eq!(stocks[0].load(Ordering::Acquire), 10);
        assert_eq!(stocks[1].load(Ordering::Acquire), 1);
    }

    #[test]
    fn order_commits_when_every_line_fits() {
        let stocks = [AtomicI32::new(10), AtomicI32::new(3)];
        assert!(try_reserve_all(&stocks, &[(0, 4), (1, 3)]));
        assert_eq!(stocks[0].load(Ordering::Acquire), 6);
        assert_eq!(stocks[1].load(Ordering::Acquire), 0);
    }

    #[test]
    fn classify_missing_exhibition() {
        assert_eq!(classify_reserve_failure(None, 2), ReserveFailure::NotFound);
    }

    #[test]
    fn classify_inactive_exhibition() {
        assert_eq!(
            classify_reserve_failure(Some(("cancelled", 10)), 2),
            ReserveFailure::NotBookable
        );
        assert_eq!(
            classify_reserve_failure(Some(("completed", 5)), 1),
            ReserveFailure::NotBookable
        );
    }

    #[test]
    fn classify_shortage() {
        assert_eq!(
            classify_reserve_failure(Some((STATUS_ACTIVE, 1)), 2),
            ReserveFailure::OutOfStock
        );
    }

    #[test]
    fn shortage_reported_before_status() {
        // A sold-out pool with too few tickets is out of stock, whatever the
        // status says.
        assert_eq!(
            classify_reserve_failure(Some(("sold-out", 0)), 6),
            ReserveFailure::OutOfStock
        );
        assert_eq!(
            classify_reserve_failure(Some(("cancelled", 1)), 2),
            ReserveFailure::OutOfStock
        );
    }

    #[test]
    fn admin_status_overrides_block_booking() {
        use crate::models::exhibition::{
            EXHIBITION_STATUSES, STATUS_CANCELLED, STATUS_COMPLETED,
        };

        for status in [STATUS_CANCELLED, STATUS_COMPLETED] {
            assert!(EXHIBITION_STATUSES.contains(&status));
            assert_eq!(
                classify_reserve_failure(Some((status, 10)), 2),
                ReserveFailure::NotBookable
            );
        }
    }

    #[test]
    fn restock_preserves_sold_tickets() {
        // 100 total, 30 left: 70 sold. Raising the total to 120 leaves 50.
        assert_eq!(restocked_available(120, 100, 30), 50);
        // Shrinking below the sold count floors at zero.
        assert_eq!(restocked_available(60, 100, 30), 0);
        // No sales yet: the pool tracks the new total exactly.
        assert_eq!(restocked_available(80, 100, 100), 80);
    }

    #[test]
    fn ticket_number_shape() {
        let number = format_ticket_number(1700000000000, 7);
        assert_eq!(number, "TKT1700000000000007");
        assert!(generate_ticket_number().starts_with(TICKET_NUMBER_PREFIX));
    }

    proptest! {
        #[test]
        fn restock_stays_within_bounds(
            new_total in 1i32..10_000,
            old_total in 1i32..10_000,
            sold in 0i32..10_000,
        ) {
            let sold = sold.min(old_total);
            let old_available = old_total - sold;
            let restocked = restocked_available(new_total, old_total, old_available);
            prop_assert!(restocked >= 0);
            prop_assert!(restocked <= new_total);
            // Sold tickets stay sold.
            prop_assert_eq!(restocked, (new_total - sold).max(0));
        }

        #[test]
        fn reservations_never_drive_pool_negative(
            total in 0i32..500,
            quantities in proptest::collection::vec(1i32..=10, 0..100),
        ) {
            let pool = AtomicI32::new(total);
            let mut reserved = 0;
            for qty in quantities {
                if let Some(remaining) = try_reserve(&pool, qty) {
                    reserved += qty;
                    prop_assert!(remaining >= 0);
                }
            }
            prop_assert!(reserved <= total);
            prop_assert_eq!(pool.load(Ordering::Acquire), total - reserved);
        }
    }
}
