use crate::service::{DigestNotifier, ErrorReporter, WishlistRepository, WishlistSource};
use crate::{Reconciler, Result, Summary};
use common::CancellationToken;

/// Runs one reconciliation. On failure makes a single best-effort report through
/// `reporter` and returns the original error whether or not the report went out.
pub async fn run_and_report<S, R, N, E>(
    reconciler: &Reconciler<S, R, N>,
    reporter: &E,
    cancel: &CancellationToken,
) -> Result<Summary>
where
    S: WishlistSource,
    R: WishlistRepository,
    N: DigestNotifier,
    E: ErrorReporter,
{
    match reconciler.run(cancel).await {
        Ok(summary) => {
            log::info!(
                "Run finished: {} created, {} updated, {} deleted, {} price drop(s) announced",
                summary.created,
                summary.updated,
                summary.deleted,
                summary.notified
            );
            Ok(summary)
        }
        Err(e) => {
            log::error!("Failed to notify video game prices: {e}");
            if let Err(report_err) = reporter.report(&e.to_string()).await {
                log::error!("Failed to report the error: {report_err}");
            }
            Err(e)
        }
    }
}
