//! Human-readable contract reference codes.
//!
//! Format: `PREFIX-<unix millis>-<5 base36 chars>`. Uniqueness is
//! probabilistic only; nothing checks for collisions.

use chrono::{DateTime, Utc};
use rand::Rng;

pub const REFERENCE_PREFIX: &str = "CDK";

const SUFFIX_LEN: usize = 5;
const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn generate_reference<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{REFERENCE_PREFIX}-{}-{suffix}", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn embeds_timestamp_millis() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let code = generate_reference(now, &mut StdRng::seed_from_u64(7));
        assert!(code.starts_with("CDK-1700000000123-"), "{code}");
    }

    #[test]
    fn same_instant_different_suffixes() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(42);
        let a = generate_reference(now, &mut rng);
        let b = generate_reference(now, &mut rng);
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn always_three_well_formed_parts(seed in any::<u64>(), millis in 0i64..4_000_000_000_000) {
            let now = DateTime::from_timestamp_millis(millis).unwrap();
            let code = generate_reference(now, &mut StdRng::seed_from_u64(seed));
            let parts: Vec<&str> = code.split('-').collect();

            prop_assert_eq!(parts.len(), 3);
            prop_assert_eq!(parts[0], REFERENCE_PREFIX);
            prop_assert_eq!(parts[1].parse::<i64>().unwrap(), millis);
            prop_assert_eq!(parts[2].len(), SUFFIX_LEN);
            prop_assert!(parts[2].bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
        }
    }
}
