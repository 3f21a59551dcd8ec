use crate::errors::{StoreError, StoreResult};
use tokio_util::sync::CancellationToken;

/// Fails with [`ErrorKind::Cancelled`](crate::errors::ErrorKind::Cancelled)
/// when `cancel` has been triggered.
///
/// Backends call this at entry and again right before committing a mutation.
#[inline]
pub fn ensure_not_cancelled(cancel: &CancellationToken, operation: &str) -> StoreResult<()> {
    if cancel.is_cancelled() {
        log::debug!("Operation '{}' observed cancellation", operation);
        return Err(StoreError::cancelled(operation));
    }
    Ok(())
}
