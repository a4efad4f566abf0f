//! Derived values computed from stored records. Nothing here touches the
//! database.

use time::PrimitiveDateTime;

use crate::db::types::Grade;

pub(crate) fn grade_for_marks(marks: f64) -> Grade {
    if marks >= 90.0 {
        Grade::A
    } else if marks >= 80.0 {
        Grade::B
    } else if marks >= 70.0 {
        Grade::C
    } else if marks >= 60.0 {
        Grade::D
    } else {
        Grade::F
    }
}

/// Two decimals, halves rounded away from zero on the binary value.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / total * 100` rounded to two decimals; zero when `total` is zero.
pub(crate) fn percentage(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

pub(crate) fn is_overdue(due_date: PrimitiveDateTime, now: PrimitiveDateTime) -> bool {
    now > due_date
}

pub(crate) fn is_late(submitted_at: PrimitiveDateTime, due_date: PrimitiveDateTime) -> bool {
    submitted_at > due_date
}

pub(crate) fn is_expired(expires_at: Option<PrimitiveDateTime>, now: PrimitiveDateTime) -> bool {
    expires_at.is_some_and(|expires_at| now > expires_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn grade_boundaries() {
        assert_eq!(grade_for_marks(100.0), Grade::A);
        assert_eq!(grade_for_marks(90.0), Grade::A);
        assert_eq!(grade_for_marks(89.99), Grade::B);
        assert_eq!(grade_for_marks(80.0), Grade::B);
        assert_eq!(grade_for_marks(70.0), Grade::C);
        assert_eq!(grade_for_marks(60.0), Grade::D);
        assert_eq!(grade_for_marks(59.999), Grade::F);
        assert_eq!(grade_for_marks(0.0), Grade::F);
    }

    #[test]
    fn percentage_handles_empty_totals() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(7, 10), 70.0);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
    }

    #[test]
    fn round2_rounds_halves_away_from_zero() {
        assert_eq!(round2(72.125), 72.13);
        assert_eq!(round2(85.0), 85.0);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn lateness_is_strict() {
        let due = datetime!(2025-03-01 12:00:00);
        assert!(!is_late(due, due));
        assert!(is_late(datetime!(2025-03-01 12:00:01), due));
        assert!(!is_late(datetime!(2025-03-01 11:59:59), due));
        assert!(!is_overdue(due, due));
        assert!(is_overdue(due, datetime!(2025-03-02 00:00:00)));
    }

    #[test]
    fn expiry_requires_a_deadline() {
        let now = datetime!(2025-03-01 12:00:00);
        assert!(!is_expired(None, now));
        assert!(!is_expired(Some(now), now));
        assert!(is_expired(Some(datetime!(2025-02-28 00:00:00)), now));
    }
}
