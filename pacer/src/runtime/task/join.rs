use super::JoinHandle;

/// Awaits every handle and returns the outputs in iteration order.
///
/// Tasks keep running concurrently; only the collection is sequential.
/// When the outputs are `Result`s, an all-must-succeed join is a
/// `collect` away:
///
/// ```rust,ignore
/// let doubled: Result<Vec<u32>, Error> = join_all(handles).await.into_iter().collect();
/// ```
pub async fn join_all<T, I>(handles: I) -> Vec<T>
where
    I: IntoIterator<Item = JoinHandle<T>>,
{
    let handles = handles.into_iter();
    let mut outputs = Vec::with_capacity(handles.size_hint().0);

    for handle in handles {
        outputs.push(handle.await);
    }

    outputs
}
