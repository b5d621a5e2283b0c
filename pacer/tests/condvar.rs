use pacer::sync::Condvar;
use pacer::task::{self, join_all};
use pacer::time::{sleep, timeout};
use pacer::yield_now;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

#[pacer::test]
async fn test_signal_wakes_every_waiter() {
    let condvar = Arc::new(Condvar::new());
    let woken = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let condvar = condvar.clone();
            let woken = woken.clone();
            task::spawn(async move {
                condvar.wait().await;
                woken.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    // Let every task reach its wait.
    yield_now().await;
    assert_eq!(woken.load(Ordering::SeqCst), 0);

    condvar.signal();
    join_all(handles).await;

    assert_eq!(woken.load(Ordering::SeqCst), 3);
}

#[pacer::test]
async fn test_signal_without_waiters_is_lost() {
    let condvar = Condvar::new();

    condvar.signal();

    let result = timeout(Duration::from_millis(20), condvar.wait()).await;
    assert!(result.is_err(), "a wait created after the signal must suspend");
}

#[pacer::test]
async fn test_wait_created_before_signal_resolves_even_if_not_polled() {
    let condvar = Condvar::new();

    let wait = condvar.wait();
    condvar.signal();

    let result = timeout(Duration::from_millis(100), wait).await;
    assert!(result.is_ok());
}

#[pacer::test]
async fn test_next_wait_needs_a_new_signal() {
    let condvar = Arc::new(Condvar::new());

    let first = condvar.wait();
    condvar.signal();
    first.await;

    let waiter = {
        let condvar = condvar.clone();
        task::spawn(async move { condvar.wait().await })
    };

    sleep(Duration::from_millis(10)).await;
    assert!(!waiter.is_finished());

    condvar.signal();
    waiter.await;
}

#[pacer::test]
async fn test_dropped_wait_does_not_block_later_signals() {
    let condvar = Arc::new(Condvar::new());

    let abandoned = timeout(Duration::from_millis(5), condvar.wait()).await;
    assert!(abandoned.is_err());

    let waiter = {
        let condvar = condvar.clone();
        task::spawn(async move { condvar.wait().await })
    };
    yield_now().await;

    condvar.signal();
    waiter.await;
}

#[test]
fn test_signal_from_another_thread() {
    let runtime = pacer::RuntimeBuilder::new().build();
    let condvar = Arc::new(Condvar::new());

    runtime.block_on(async {
        let wait = condvar.wait();

        let signaler = {
            let condvar = condvar.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                condvar.signal();
            })
        };

        wait.await;
        signaler.join().unwrap();
    });
}

#[pacer::test]
async fn test_abandoned_waits_are_unregistered() {
    let condvar = Arc::new(Condvar::new());

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let condvar = condvar.clone();
            task::spawn(async move { timeout(Duration::from_millis(5), condvar.wait()).await })
        })
        .collect();

    yield_now().await;
    assert_eq!(
        format!("{condvar:?}"),
        "Condvar { generation: 0, waiters: 3 }"
    );

    for result in join_all(handles).await {
        assert!(result.is_err());
    }

    assert_eq!(
        format!("{condvar:?}"),
        "Condvar { generation: 0, waiters: 0 }"
    );
}
