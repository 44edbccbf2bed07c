//! Rating aggregate arithmetic. The one-rating-per-(user, product) rule is a
//! composite unique key at the storage layer; these helpers only derive the
//! rolling mean and eligibility decisions.

use rust_decimal::{Decimal, RoundingStrategy};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

pub fn is_valid_rating(rating: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Rolling mean over all rating values, rounded to one decimal place with
/// midpoints away from zero (3.25 -> 3.3).
pub fn rounded_mean(sum: i64, count: i64) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(sum) / Decimal::from(count))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// A user may rate a product once they have received it and not yet rated it.
pub fn can_rate(has_purchased: bool, has_already_rated: bool) -> bool {
    has_purchased && !has_already_rated
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mean_of_no_ratings_is_zero() {
        assert_eq!(rounded_mean(0, 0), Decimal::ZERO);
    }

    #[test]
    fn mean_rounds_to_one_decimal() {
        // 4 + 5 + 4 = 13 over 3 -> 4.333... -> 4.3
        assert_eq!(rounded_mean(13, 3), Decimal::new(43, 1));
        // 3 + 4 = 7 over 2 -> 3.5
        assert_eq!(rounded_mean(7, 2), Decimal::new(35, 1));
        // 13 over 4 -> 3.25 -> midpoint rounds up
        assert_eq!(rounded_mean(13, 4), Decimal::new(33, 1));
    }

    #[test]
    fn rating_bounds() {
        assert!(is_valid_rating(1));
        assert!(is_valid_rating(5));
        assert!(!is_valid_rating(0));
        assert!(!is_valid_rating(6));
    }

    #[test]
    fn eligibility_requires_delivery_and_no_prior_rating() {
        assert!(can_rate(true, false));
        assert!(!can_rate(true, true));
        assert!(!can_rate(false, false));
        assert!(!can_rate(false, true));
    }

    proptest! {
        #[test]
        fn mean_stays_within_rating_range(
            ratings in proptest::collection::vec(1i64..=5, 1..200),
        ) {
            let sum: i64 = ratings.iter().sum();
            let mean = rounded_mean(sum, ratings.len() as i64);
            prop_assert!(mean >= Decimal::from(MIN_RATING));
            prop_assert!(mean <= Decimal::from(MAX_RATING));
        }
    }
}
