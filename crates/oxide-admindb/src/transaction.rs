//! Transaction completion.

use tracing::{debug, warn};

use crate::driver::Driver;
use crate::error::Result;

/// Commits on success and rolls back on failure.
///
/// A failed rollback is logged and the original error is returned. A failed
/// commit is followed by a rollback attempt and reported as the error.
pub(crate) async fn finish<D, T>(db: &mut D, outcome: Result<T>) -> Result<T>
where
    D: Driver + ?Sized,
{
    match outcome {
        Ok(value) => match db.commit().await {
            Ok(()) => {
                debug!("Transaction committed");
                Ok(value)
            }
            Err(err) => {
                rollback(db).await;
                Err(err)
            }
        },
        Err(err) => {
            rollback(db).await;
            Err(err)
        }
    }
}

async fn rollback<D: Driver + ?Sized>(db: &mut D) {
    match db.rollback().await {
        Ok(()) => debug!("Transaction rolled back"),
        Err(err) => warn!(error = %err, "Rollback failed"),
    }
}
