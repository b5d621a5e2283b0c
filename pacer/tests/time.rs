use pacer::task;
use pacer::time::error::Elapsed;
use pacer::time::{sleep, timeout};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Wake, Waker};
use std::time::{Duration, Instant};

struct CountingWaker(AtomicUsize);

impl Wake for CountingWaker {
    fn wake(self: Arc<Self>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[pacer::test]
async fn test_sleep_basic() {
    let start = Instant::now();
    sleep(Duration::from_millis(50)).await;
    let elapsed = start.elapsed();

    assert!(
        elapsed >= Duration::from_millis(50),
        "Sleep should wait at least the specified duration"
    );
}

#[pacer::test]
async fn test_sleep_zero_duration() {
    let start = Instant::now();
    sleep(Duration::ZERO).await;

    assert!(
        start.elapsed() < Duration::from_millis(10),
        "Zero duration sleep should be fast"
    );
}

#[pacer::test]
async fn test_concurrent_sleeps_overlap() {
    let start = Instant::now();

    let handles: Vec<_> = (0..5)
        .map(|_| task::spawn(sleep(Duration::from_millis(40))))
        .collect();

    for handle in handles {
        handle.await;
    }

    assert!(
        start.elapsed() < Duration::from_millis(150),
        "Sleeps in different tasks should run concurrently"
    );
}

#[pacer::test]
async fn test_sleeps_complete_in_deadline_order() {
    let slow = task::spawn(async {
        sleep(Duration::from_millis(40)).await;
        Instant::now()
    });
    let fast = task::spawn(async {
        sleep(Duration::from_millis(10)).await;
        Instant::now()
    });

    let fast_done = fast.await;
    let slow_done = slow.await;

    assert!(fast_done < slow_done);
}

#[pacer::test]
async fn test_timeout_completes_before_deadline() {
    let handle = task::spawn(async {
        sleep(Duration::from_millis(10)).await;
        123
    });

    let result = timeout(Duration::from_millis(200), handle).await;

    assert_eq!(result, Ok(123));
}

#[pacer::test]
async fn test_timeout_expires() {
    let handle = task::spawn(async {
        sleep(Duration::from_millis(100)).await;
        456
    });

    let result = timeout(Duration::from_millis(20), handle).await;

    let err: Elapsed = result.unwrap_err();
    assert_eq!(err.to_string(), "deadline has elapsed");
}

#[pacer::test]
async fn test_timeout_accepts_unbounded_duration() {
    let result = timeout(Duration::MAX, async { 5 }).await;
    assert_eq!(result, Ok(5));

    let never = sleep(Duration::MAX);
    assert!(never.deadline() > Instant::now());
    assert!(!never.is_elapsed());
}

#[pacer::test]
async fn test_sleep_wakes_only_the_latest_waker() {
    let first = Arc::new(CountingWaker(AtomicUsize::new(0)));
    let second = Arc::new(CountingWaker(AtomicUsize::new(0)));
    let mut pending = sleep(Duration::from_millis(10));

    let waker = Waker::from(first.clone());
    let poll = Pin::new(&mut pending).poll(&mut Context::from_waker(&waker));
    assert!(poll.is_pending());

    let waker = Waker::from(second.clone());
    let poll = Pin::new(&mut pending).poll(&mut Context::from_waker(&waker));
    assert!(poll.is_pending());

    sleep(Duration::from_millis(40)).await;

    assert_eq!(first.0.load(Ordering::SeqCst), 0, "stale waker was woken");
    assert_eq!(second.0.load(Ordering::SeqCst), 1);
}
