//! UUID value generator.

use crate::FixtureRng;
use rand::Rng;
use uuid::Uuid;

/// Generate a random UUID v4 using the provided RNG.
pub fn random_uuid(rng: &mut FixtureRng) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);

    // Set version (4) and variant (RFC 4122) bits
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_random_uuid_is_v4_and_deterministic() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let a = random_uuid(&mut FixtureRng::new(42, date));
        let b = random_uuid(&mut FixtureRng::new(42, date));
        assert_eq!(a, b);
        assert_eq!(a.get_version_num(), 4);
    }
}
