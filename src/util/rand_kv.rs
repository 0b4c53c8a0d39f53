use bytes::Bytes;
use rand::Rng;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Deterministic, sortable test key: `"ember-kv-key-<i>"`.
pub fn get_test_key(i: usize) -> Bytes {
  Bytes::from(format!("ember-kv-key-{i:09}"))
}

/// Random printable test value of a few dozen bytes, prefixed with `i`
/// so failures are easy to trace back to the put that produced them.
pub fn get_test_value(i: usize) -> Bytes {
  let mut rng = rand::thread_rng();
  let suffix: String = (0..24)
    .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
    .collect();
  Bytes::from(format!("ember-kv-value-{i:09}-{suffix}"))
}
