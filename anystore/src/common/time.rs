use std::time::{SystemTime, UNIX_EPOCH};

// returns 0 on clock errors instead of failing the caller
#[inline]
pub fn get_current_time_or_zero() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
