use rust_decimal::Decimal;

use crate::errors::{Error, Result};

fn overflow(what: &str) -> Error {
    Error::Unexpected(format!("{} overflowed the decimal range", what))
}

/// `a + b`, failing instead of panicking when the result leaves the decimal range.
pub fn checked_add(a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(what))
}

/// `a - b`, failing instead of panicking when the result leaves the decimal range.
pub fn checked_sub(a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow(what))
}

/// Sums `values`; `what` names the quantity in the overflow error.
pub fn checked_sum<I>(values: I, what: &str) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| checked_add(acc, v, what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checked_sum() {
        assert_eq!(
            checked_sum([dec!(1.5), dec!(2), dec!(-0.5)], "total").unwrap(),
            dec!(3)
        );
        assert_eq!(checked_sum(Vec::new(), "total").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let result = checked_sum([Decimal::MAX, Decimal::MAX], "closedRaised");
        match result {
            Err(Error::Unexpected(msg)) => assert!(msg.contains("closedRaised")),
            other => panic!("expected overflow error, got {:?}", other),
        }
        assert!(checked_sub(Decimal::MIN, Decimal::ONE, "delta").is_err());
    }
}
