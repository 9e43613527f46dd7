/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Fixed prefix of every external order code.
pub const ORDER_CODE_PREFIX: &str = "ORD-";

/// Total length of an order code: prefix + 8 time chars + 8 random chars.
pub const ORDER_CODE_LEN: usize = 20;

// Custom epoch: 2024-01-01 00:00:00 UTC
const EPOCH_MS: i64 = 1_704_067_200_000;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate an external order code, e.g. `ORD-0K3J9X2MQ7F4ZP1C`.
///
/// Layout after the `ORD-` prefix (16 uppercase base-36 chars):
///   - 8 chars: milliseconds since 2024-01-01 UTC (~89 years, roughly
///     chronological ordering)
///   - 8 chars: random (~2.8e12 values per millisecond)
///
/// Uniqueness is enforced by the order store, not here; the caller retries
/// with a fresh code on a collision.
pub fn order_code() -> String {
    use rand::Rng;
    let elapsed = (now_millis() - EPOCH_MS).max(0) as u64;
    let random: u64 = rand::thread_rng().gen_range(0..36u64.pow(8));
    format!(
        "{ORDER_CODE_PREFIX}{}{}",
        encode_base36(elapsed, 8),
        encode_base36(random, 8)
    )
}

/// Check that a string has the exact shape produced by [`order_code`].
pub fn is_valid_order_code(code: &str) -> bool {
    code.len() == ORDER_CODE_LEN
        && code.starts_with(ORDER_CODE_PREFIX)
        && code[ORDER_CODE_PREFIX.len()..]
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}

/// Zero-padded fixed-width base-36 encoding.
fn encode_base36(mut value: u64, width: usize) -> String {
    let mut out = vec!['0'; width];
    let mut i = width;
    while value > 0 && i > 0 {
        i -= 1;
        out[i] = BASE36[(value % 36) as usize] as char;
        value /= 36;
    }
    out.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn code_has_fixed_shape() {
        let code = order_code();
        assert_eq!(code.len(), ORDER_CODE_LEN);
        assert!(code.starts_with(ORDER_CODE_PREFIX));
        assert!(is_valid_order_code(&code));
    }

    #[test]
    fn codes_do_not_collide_sequentially() {
        let mut seen = HashSet::new();
        for _ in 0..100_000 {
            assert!(seen.insert(order_code()), "duplicate order code generated");
        }
    }

    #[test]
    fn shape_check_rejects_malformed_codes() {
        assert!(!is_valid_order_code(""));
        assert!(!is_valid_order_code("ORD-"));
        assert!(!is_valid_order_code("ord-0000000000000000"));
        assert!(!is_valid_order_code("ORD-000000000000000!"));
        assert!(!is_valid_order_code("XYZ-0000000000000000"));
        assert!(is_valid_order_code("ORD-0000000000000000"));
    }

    #[test]
    fn base36_pads_to_width() {
        assert_eq!(encode_base36(0, 8), "00000000");
        assert_eq!(encode_base36(35, 4), "000Z");
        assert_eq!(encode_base36(36, 4), "0010");
    }
}
