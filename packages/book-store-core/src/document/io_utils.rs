//! Retry helper for snapshot I/O.

use std::time::Duration;

use crate::error::StoreError;

/// Runs `operation` up to `max_retries + 1` times, retrying only while it
/// fails with a transient error.
pub fn retry_transient<F, T>(
    operation: F,
    max_retries: u32,
    retry_delay_ms: u64,
    context: &str,
) -> Result<T, StoreError>
where
    F: Fn() -> Result<T, StoreError>,
{
    let mut attempt = 0;
    loop {
        match operation() {
            Err(err) if err.is_transient() && attempt < max_retries => {
                attempt += 1;
                tracing::warn!("{} failed (attempt {}/{}): {}", context, attempt, max_retries, err);
                if retry_delay_ms > 0 {
                    std::thread::sleep(Duration::from_millis(retry_delay_ms));
                }
            }
            result => return result,
        }
    }
}
