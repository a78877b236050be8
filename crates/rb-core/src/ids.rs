//! Post identifiers.
//!
//! An id is `<unix-millis>-<n>` with `n` drawn from `0..1_000_000`. Two posts
//! created in the same millisecond can collide; nothing checks for it.

use chrono::Utc;

const RANDOM_BOUND: u32 = 1_000_000;

pub fn generate_id() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), random_component())
}

fn random_component() -> u32 {
    let mut buf = [0u8; 4];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u32::from_le_bytes(buf) % RANDOM_BOUND,
        // No OS entropy: the sub-second clock is still enough to spread ids.
        Err(_) => Utc::now().timestamp_subsec_nanos() % RANDOM_BOUND,
    }
}
