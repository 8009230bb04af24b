//! Split resolution
//!
//! Computes how much each household member owes for an expense. Results are
//! keyed by user id in an ordered map, so the order in which members are
//! supplied never affects the outcome (sums are also taken in id order).

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use super::frequency::monthly_amount;
use crate::models::{Expense, ShareMap, SplitStrategy, User, UserId};

/// Allowed deviation of percentage shares from a total of 1.0
pub const SPLIT_TOLERANCE: f64 = 0.001;

/// Amount owed per member
pub type Shares = BTreeMap<UserId, f64>;

/// Compute each member's share of the stated expense amount
///
/// The returned amounts sum to `expense.amount` within floating-point
/// tolerance (or within the accepted fraction tolerance for percentage
/// splits).
pub fn compute_shares(expense: &Expense, users: &[User]) -> Result<Shares, SplitValidationError> {
    distribute(expense.amount.value(), &expense.split, users)
}

/// Compute each member's share of the monthly-normalized amount
pub fn compute_monthly_shares(
    expense: &Expense,
    users: &[User],
) -> Result<Shares, SplitValidationError> {
    distribute(monthly_amount(expense), &expense.split, users)
}

/// Distribute `amount` according to a split strategy
pub fn distribute(
    amount: f64,
    split: &SplitStrategy,
    users: &[User],
) -> Result<Shares, SplitValidationError> {
    match split {
        SplitStrategy::Equal => {
            let participants = participants(users);
            if participants.is_empty() {
                return Err(SplitValidationError::NoParticipants);
            }
            let share = amount / participants.len() as f64;
            Ok(participants
                .into_keys()
                .map(|id| (id.clone(), share))
                .collect())
        }
        SplitStrategy::Percentage { shares } => {
            let fractions = if shares.is_empty() {
                debug!("percentage split has no stored shares, using income weighting");
                default_percentage_shares(users)?
            } else {
                shares.clone()
            };
            Ok(fractions
                .into_iter()
                .map(|(id, fraction)| (id, amount * fraction))
                .collect())
        }
        SplitStrategy::Fixed { owner } => {
            let mut result = Shares::new();
            result.insert(owner.clone(), amount);
            Ok(result)
        }
    }
}

/// Income-weighted default fractions
///
/// Each member's fraction is their share of total household income. When
/// nobody has any income the split falls back to equal fractions.
pub fn default_percentage_shares(users: &[User]) -> Result<ShareMap, SplitValidationError> {
    let participants = participants(users);
    if participants.is_empty() {
        return Err(SplitValidationError::NoParticipants);
    }

    let total_income: f64 = participants
        .values()
        .map(|u| u.monthly_income.max(0.0))
        .sum();

    let count = participants.len() as f64;
    Ok(participants
        .into_iter()
        .map(|(id, user)| {
            let fraction = if total_income > 0.0 {
                user.monthly_income.max(0.0) / total_income
            } else {
                1.0 / count
            };
            (id.clone(), fraction)
        })
        .collect())
}

/// Check proposed percentage fractions before they are accepted
///
/// The key set must match the household exactly and the fractions must sum
/// to one within `tolerance`. Nothing is renormalized.
pub fn validate_percentage_shares(
    shares: &ShareMap,
    users: &[User],
    tolerance: f64,
) -> Result<(), SplitValidationError> {
    let participants = participants(users);
    if participants.is_empty() {
        return Err(SplitValidationError::NoParticipants);
    }

    for (id, fraction) in shares {
        if !participants.contains_key(id) {
            return Err(SplitValidationError::UnknownParticipant(id.clone()));
        }
        if !fraction.is_finite() || *fraction < 0.0 || *fraction > 1.0 {
            return Err(SplitValidationError::InvalidFraction {
                user: id.clone(),
                value: *fraction,
            });
        }
    }

    if let Some(missing) = participants.keys().find(|id| !shares.contains_key(**id)) {
        return Err(SplitValidationError::MissingParticipant((*missing).clone()));
    }

    let sum: f64 = shares.values().sum();
    if (sum - 1.0).abs() > tolerance {
        return Err(SplitValidationError::SumOutOfTolerance { sum, tolerance });
    }

    Ok(())
}

/// Validate any strategy against the current household
pub fn validate_split(
    split: &SplitStrategy,
    users: &[User],
    tolerance: f64,
) -> Result<(), SplitValidationError> {
    match split {
        SplitStrategy::Equal => {
            if users.is_empty() {
                Err(SplitValidationError::NoParticipants)
            } else {
                Ok(())
            }
        }
        SplitStrategy::Percentage { shares } => validate_percentage_shares(shares, users, tolerance),
        SplitStrategy::Fixed { owner } => {
            if users.iter().any(|u| &u.id == owner) {
                Ok(())
            } else {
                Err(SplitValidationError::UnknownParticipant(owner.clone()))
            }
        }
    }
}

fn participants(users: &[User]) -> BTreeMap<&UserId, &User> {
    users.iter().map(|u| (&u.id, u)).collect()
}

/// Split validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum SplitValidationError {
    NoParticipants,
    UnknownParticipant(UserId),
    MissingParticipant(UserId),
    InvalidFraction { user: UserId, value: f64 },
    SumOutOfTolerance { sum: f64, tolerance: f64 },
}

impl fmt::Display for SplitValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoParticipants => write!(f, "Split has no participants"),
            Self::UnknownParticipant(id) => {
                write!(f, "Split references unknown member: {}", id)
            }
            Self::MissingParticipant(id) => write!(f, "Split is missing member: {}", id),
            Self::InvalidFraction { user, value } => {
                write!(f, "Share for {} must be between 0 and 1 (got {})", user, value)
            }
            Self::SumOutOfTolerance { sum, tolerance } => write!(
                f,
                "Split shares must sum to 1 (got {:.4}, tolerance {})",
                sum, tolerance
            ),
        }
    }
}

impl std::error::Error for SplitValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Frequency};
    use proptest::prelude::*;

    fn user(id: &str, income: f64) -> User {
        User {
            id: UserId::from(id),
            name: id.to_uppercase(),
            monthly_income: income,
            color: "#000000".into(),
            tax_rate: 0.32,
        }
    }

    fn expense(amount: f64, split: SplitStrategy) -> Expense {
        Expense::new(
            "Test",
            Amount::new(amount).unwrap(),
            Frequency::Monthly,
            split,
            UserId::from("a"),
        )
    }

    fn shares(entries: &[(&str, f64)]) -> ShareMap {
        entries
            .iter()
            .map(|(id, v)| (UserId::from(*id), *v))
            .collect()
    }

    #[test]
    fn test_equal_split() {
        let users = vec![user("a", 0.0), user("b", 0.0), user("c", 0.0)];
        let result = compute_shares(&expense(300.0, SplitStrategy::Equal), &users).unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.values().all(|v| *v == 100.0));
    }

    #[test]
    fn test_single_participant_gets_everything() {
        let users = vec![user("a", 5000.0)];
        let equal = compute_shares(&expense(80.0, SplitStrategy::Equal), &users).unwrap();
        assert_eq!(equal[&UserId::from("a")], 80.0);

        let pct = compute_shares(
            &expense(80.0, SplitStrategy::Percentage { shares: ShareMap::new() }),
            &users,
        )
        .unwrap();
        assert_eq!(pct[&UserId::from("a")], 80.0);
    }

    #[test]
    fn test_equal_split_without_users_fails() {
        let result = compute_shares(&expense(10.0, SplitStrategy::Equal), &[]);
        assert_eq!(result, Err(SplitValidationError::NoParticipants));
    }

    #[test]
    fn test_income_weighted_default() {
        let users = vec![user("a", 30000.0), user("b", 10000.0)];
        let fractions = default_percentage_shares(&users).unwrap();
        assert_eq!(fractions[&UserId::from("a")], 0.75);
        assert_eq!(fractions[&UserId::from("b")], 0.25);

        let e = expense(1000.0, SplitStrategy::Percentage { shares: fractions });
        let owed = compute_shares(&e, &users).unwrap();
        assert!((owed[&UserId::from("a")] - 750.0).abs() < 1e-9);
        assert!((owed[&UserId::from("b")] - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_income_falls_back_to_uniform() {
        let users = vec![user("a", 0.0), user("b", 0.0), user("c", 0.0), user("d", 0.0)];
        let fractions = default_percentage_shares(&users).unwrap();
        assert!(fractions.values().all(|v| *v == 0.25));
    }

    #[test]
    fn test_fixed_belongs_to_owner() {
        let users = vec![user("a", 1.0), user("b", 1.0)];
        let e = expense(
            42.0,
            SplitStrategy::Fixed {
                owner: UserId::from("b"),
            },
        );
        let owed = compute_shares(&e, &users).unwrap();
        assert_eq!(owed.len(), 1);
        assert_eq!(owed[&UserId::from("b")], 42.0);
    }

    #[test]
    fn test_monthly_shares_use_normalized_amount() {
        let users = vec![user("a", 0.0), user("b", 0.0)];
        let mut e = expense(1200.0, SplitStrategy::Equal);
        e.frequency = Frequency::Yearly;
        let owed = compute_monthly_shares(&e, &users).unwrap();
        assert_eq!(owed[&UserId::from("a")], 50.0);
        assert_eq!(owed[&UserId::from("b")], 50.0);
    }

    #[test]
    fn test_validate_accepts_within_tolerance() {
        let users = vec![user("a", 0.0), user("b", 0.0)];
        assert!(validate_percentage_shares(&shares(&[("a", 0.6), ("b", 0.4)]), &users, SPLIT_TOLERANCE).is_ok());
        assert!(validate_percentage_shares(&shares(&[("a", 0.6), ("b", 0.4005)]), &users, SPLIT_TOLERANCE).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_sum() {
        let users = vec![user("a", 0.0), user("b", 0.0)];
        let result = validate_percentage_shares(&shares(&[("a", 0.6), ("b", 0.3)]), &users, SPLIT_TOLERANCE);
        assert!(matches!(
            result,
            Err(SplitValidationError::SumOutOfTolerance { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_key_mismatch() {
        let users = vec![user("a", 0.0), user("b", 0.0)];
        assert_eq!(
            validate_percentage_shares(&shares(&[("a", 1.0)]), &users, SPLIT_TOLERANCE),
            Err(SplitValidationError::MissingParticipant(UserId::from("b")))
        );
        assert_eq!(
            validate_percentage_shares(
                &shares(&[("a", 0.5), ("b", 0.25), ("z", 0.25)]),
                &users,
                SPLIT_TOLERANCE
            ),
            Err(SplitValidationError::UnknownParticipant(UserId::from("z")))
        );
    }

    #[test]
    fn test_validate_rejects_negative_fraction() {
        let users = vec![user("a", 0.0), user("b", 0.0)];
        let result = validate_percentage_shares(&shares(&[("a", 1.5), ("b", -0.5)]), &users, SPLIT_TOLERANCE);
        assert!(matches!(result, Err(SplitValidationError::InvalidFraction { .. })));
    }

    #[test]
    fn test_validate_split_fixed_owner_must_exist() {
        let users = vec![user("a", 0.0)];
        let split = SplitStrategy::Fixed {
            owner: UserId::from("ghost"),
        };
        assert!(validate_split(&split, &users, SPLIT_TOLERANCE).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: equal shares always add back up to the stated amount.
        #[test]
        fn equal_shares_sum_to_amount(
            amount in 0.01f64..100_000.0,
            count in 1usize..12,
        ) {
            let users: Vec<User> = (0..count).map(|i| user(&format!("u{}", i), 0.0)).collect();
            let owed = compute_shares(&expense(amount, SplitStrategy::Equal), &users).unwrap();
            let total: f64 = owed.values().sum();
            prop_assert!((total - amount).abs() <= 1e-9);
            prop_assert_eq!(owed.len(), count);
        }

        /// Property: the order members are supplied in never changes the result.
        #[test]
        fn shares_are_order_invariant(
            amount in 0.01f64..100_000.0,
            incomes in prop::collection::vec(0.0f64..50_000.0, 1..8),
        ) {
            let users: Vec<User> = incomes
                .iter()
                .enumerate()
                .map(|(i, inc)| user(&format!("u{}", i), *inc))
                .collect();
            let mut reversed = users.clone();
            reversed.reverse();

            for split in [SplitStrategy::Equal, SplitStrategy::Percentage { shares: ShareMap::new() }] {
                let e = expense(amount, split);
                prop_assert_eq!(
                    compute_shares(&e, &users).unwrap(),
                    compute_shares(&e, &reversed).unwrap()
                );
            }
        }

        /// Property: income-weighted defaults always pass validation.
        #[test]
        fn default_shares_are_valid(
            incomes in prop::collection::vec(0.0f64..50_000.0, 1..8),
        ) {
            let users: Vec<User> = incomes
                .iter()
                .enumerate()
                .map(|(i, inc)| user(&format!("u{}", i), *inc))
                .collect();
            let fractions = default_percentage_shares(&users).unwrap();
            prop_assert!(validate_percentage_shares(&fractions, &users, SPLIT_TOLERANCE).is_ok());
        }

        /// Property: fractions off by more than the tolerance are always rejected.
        #[test]
        fn off_by_more_than_tolerance_is_rejected(
            first in 0.0f64..0.5,
            drift in 0.0011f64..0.4,
            over in any::<bool>(),
        ) {
            let users = vec![user("a", 0.0), user("b", 0.0)];
            let second = if over { 1.0 - first + drift } else { 1.0 - first - drift };
            prop_assume!((0.0..=1.0).contains(&second));
            let proposed = shares(&[("a", first), ("b", second)]);
            prop_assert!(validate_percentage_shares(&proposed, &users, SPLIT_TOLERANCE).is_err());
        }
    }
}
