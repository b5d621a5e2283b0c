use super::{JoinHandle, spawn};
use crate::sync::Semaphore;

use std::sync::Arc;

use tracing::trace;

/// Applies `f` to every element of `input` with at most `pool_size`
/// invocations outstanding at once.
///
/// One task is spawned per element, in input order, without waiting in
/// between. Each task first acquires a permit from a semaphore holding
/// `pool_size` permits, then awaits `f(x)`, then releases the permit,
/// which lets the next waiting element start.
///
/// The returned handles are positionally aligned with `input` and are not
/// awaited; combine them with [`join_all`](super::join_all) or await them
/// one by one. Errors produced by `f` travel in its output type and are
/// returned untouched by the corresponding handle.
///
/// When `pool_size` is at least the number of elements, every invocation
/// starts right away.
///
/// # Panics
///
/// Panics if `pool_size == 0` or if called outside the context of a
/// running runtime.
///
/// # Examples
///
/// ```rust
/// use pacer::task::{join_all, map_async_pool};
///
/// let runtime = pacer::RuntimeBuilder::new().build();
///
/// let doubled = runtime.block_on(async {
///     let handles = map_async_pool(vec![1, 2, 3, 4], |x| async move { x * 2 }, 2);
///     join_all(handles).await
/// });
///
/// assert_eq!(doubled, vec![2, 4, 6, 8]);
/// ```
pub fn map_async_pool<I, F, Fut>(input: I, f: F, pool_size: usize) -> Vec<JoinHandle<Fut::Output>>
where
    I: IntoIterator,
    I::Item: Send + 'static,
    F: Fn(I::Item) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    assert!(pool_size > 0, "pool_size must be > 0");

    let pool = Arc::new(Semaphore::new(pool_size));
    let f = Arc::new(f);

    input
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let pool = pool.clone();
            let f = f.clone();

            spawn(async move {
                let _permit = pool.acquire_owned().await;
                trace!(index, "pooled call started");

                (*f)(item).await
            })
        })
        .collect()
}
