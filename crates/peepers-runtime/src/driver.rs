use std::future::Future;

use peepers_core::query::{Effect, Epoch};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Spawn the work an [`Effect`] asks for. Completions come back to the
/// owning session as messages on `tx`; nothing here touches session state.
///
/// A closed channel means the session is gone, so send failures are ignored.
pub(crate) fn perform<K, M, Fut>(
    effect: Effect<K>,
    tx: &mpsc::UnboundedSender<M>,
    elapsed: fn(Epoch) -> M,
    fetch: impl FnOnce(Epoch, K) -> Fut,
) where
    M: Send + 'static,
    Fut: Future<Output = M> + Send + 'static,
{
    match effect {
        Effect::None => {}
        Effect::Debounce { epoch, delay } => {
            let tx = tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(elapsed(epoch));
            });
        }
        Effect::Fetch { epoch, key } => {
            let tx = tx.clone();
            let fut = fetch(epoch, key);
            tokio::spawn(async move {
                let _ = tx.send(fut.await);
            });
        }
    }
}

/// Sleep until `deadline`, or forever when there is none.
pub(crate) async fn sleep_or_pending(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
