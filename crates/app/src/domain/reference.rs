//! Human-readable record references

use jiff::{Timestamp, tz::TimeZone};
use rand::{Rng, distributions::Alphanumeric, thread_rng};

/// Length of the random suffix on generated references.
const SUFFIX_LEN: usize = 4;

/// Generate a reference like `MC-20260806-7F3K`: a fixed prefix, the UTC
/// date, and a short random suffix. Monotonic-ish by construction; callers
/// still collision-check against stored records before committing one.
pub(crate) fn generate_reference(prefix: &str, now: Timestamp) -> String {
    let date = now.to_zoned(TimeZone::UTC).strftime("%Y%m%d");

    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|byte| char::from(byte).to_ascii_uppercase())
        .collect();

    format!("{prefix}-{date}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_has_prefix_date_and_suffix() {
        let now = Timestamp::UNIX_EPOCH;
        let reference = generate_reference("MC", now);

        let mut parts = reference.split('-');

        assert_eq!(parts.next(), Some("MC"));
        assert_eq!(parts.next(), Some("19700101"));

        let suffix = parts.next().unwrap_or_default();

        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
            "suffix should be uppercase alphanumeric: {suffix}"
        );
        assert_eq!(parts.next(), None);
    }

    #[test]
    fn references_vary() {
        let now = Timestamp::UNIX_EPOCH;

        let all_same = (0..16)
            .map(|_| generate_reference("QT", now))
            .collect::<std::collections::HashSet<_>>()
            .len()
            == 1;

        assert!(!all_same, "random suffixes should differ across generations");
    }
}
