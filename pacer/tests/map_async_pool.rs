use pacer::task::{join_all, map_async_pool};
use pacer::time::sleep;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Tracks how many calls are running at once and the highest value seen.
#[derive(Clone, Default)]
struct Gauge {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Doubles its input after 20ms, reporting to `gauge` while running.
fn doubled_slowly(gauge: Gauge) -> impl Fn(u32) -> BoxFuture<u32> + Send + Sync + 'static {
    move |x| {
        let gauge = gauge.clone();
        Box::pin(async move {
            gauge.enter();
            sleep(Duration::from_millis(20)).await;
            gauge.exit();
            x * 2
        })
    }
}

#[pacer::test]
async fn test_results_are_aligned_with_input() {
    let handles = map_async_pool(vec![1, 2, 3, 4], |x| async move { x * 2 }, 2);

    assert_eq!(handles.len(), 4);
    assert_eq!(join_all(handles).await, vec![2, 4, 6, 8]);
}

#[pacer::test]
async fn test_concurrency_is_bounded_by_pool_size() {
    let gauge = Gauge::default();

    let handles = map_async_pool(vec![1, 2, 3, 4], doubled_slowly(gauge.clone()), 2);

    assert_eq!(join_all(handles).await, vec![2, 4, 6, 8]);
    assert_eq!(gauge.peak(), 2);
}

#[pacer::test]
async fn test_large_pool_runs_everything_at_once() {
    let gauge = Gauge::default();

    let handles = map_async_pool(vec![1, 2, 3, 4], doubled_slowly(gauge.clone()), 10);

    assert_eq!(join_all(handles).await, vec![2, 4, 6, 8]);
    assert_eq!(gauge.peak(), 4);
}

#[pacer::test]
async fn test_tasks_start_without_awaiting_handles() {
    let started = Arc::new(AtomicUsize::new(0));

    let handles = {
        let started = started.clone();
        map_async_pool(
            0..5,
            move |_| {
                started.fetch_add(1, Ordering::SeqCst);
                async {}
            },
            3,
        )
    };

    sleep(Duration::from_millis(10)).await;
    assert_eq!(started.load(Ordering::SeqCst), 5);
    assert!(handles.iter().all(|h| h.is_finished()));
}

#[pacer::test]
async fn test_errors_are_surfaced_per_element() {
    let handles = map_async_pool(
        vec![1, 2, 3, 4],
        |x| async move {
            if x == 3 {
                Err(format!("cannot process {x}"))
            } else {
                Ok(x * 10)
            }
        },
        2,
    );

    let results = join_all(handles).await;

    assert_eq!(results[0], Ok(10));
    assert_eq!(results[1], Ok(20));
    assert_eq!(results[2], Err("cannot process 3".to_owned()));
    assert_eq!(results[3], Ok(40));

    let all: Result<Vec<_>, _> = results.into_iter().collect();
    assert!(all.is_err());
}

#[pacer::test]
async fn test_empty_input() {
    let handles = map_async_pool(Vec::<u32>::new(), |x| async move { x }, 1);

    assert!(handles.is_empty());
    assert!(join_all(handles).await.is_empty());
}

#[pacer::test]
#[should_panic(expected = "pool_size must be > 0")]
async fn test_zero_pool_size_is_rejected() {
    let _ = map_async_pool(vec![1], |x: u32| async move { x }, 0);
}
