use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used for a sampling call: the caller's, or a fresh one.
pub fn resolve_seed(random_state: Option<u64>) -> u64 {
    random_state.unwrap_or_else(|| rand::rng().random())
}

/// Derive an independent seed for a named sub-draw of a sampling call.
pub fn derive_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_seeds_depend_on_key_and_seed() {
        assert_eq!(derive_seed(7, "top-up"), derive_seed(7, "top-up"));
        assert_ne!(derive_seed(7, "top-up"), derive_seed(8, "top-up"));
        assert_ne!(derive_seed(7, "top-up"), derive_seed(7, "A"));
    }

    #[test]
    fn explicit_seed_is_kept() {
        assert_eq!(resolve_seed(Some(42)), 42);
    }
}
