use pacer::sync::TaskQueue;
use pacer::task::{self, join_all};
use pacer::time::{sleep, timeout};
use pacer::yield_now;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Start(usize),
    End(usize),
}

#[pacer::test]
async fn test_inflight_never_exceeds_bound() {
    let queue = Arc::new(TaskQueue::new(2));
    let log = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..3)
        .map(|id| {
            let queue = queue.clone();
            let log = log.clone();
            task::spawn(async move {
                queue
                    .push(|| async move {
                        log.lock().unwrap().push(Event::Start(id));
                        sleep(Duration::from_millis(100)).await;
                        log.lock().unwrap().push(Event::End(id));
                        id
                    })
                    .await
            })
        })
        .collect();

    yield_now().await;
    assert_eq!(queue.num_inflight(), 2);
    assert_eq!(queue.num_waiting(), 1);

    let mut peak = 0;
    while !handles.iter().all(|h| h.is_finished()) {
        peak = peak.max(queue.num_inflight());
        sleep(Duration::from_millis(10)).await;
    }
    assert!(peak <= 2, "observed {peak} tasks in flight");

    assert_eq!(join_all(handles).await, vec![0, 1, 2]);
    assert_eq!(queue.num_inflight(), 0);
    assert_eq!(queue.num_waiting(), 0);

    let log = log.lock().unwrap();
    let third_start = log.iter().position(|e| *e == Event::Start(2)).unwrap();
    let first_end = log
        .iter()
        .position(|e| matches!(e, Event::End(_)))
        .unwrap();
    assert!(
        first_end < third_start,
        "third task started before a slot was freed: {log:?}"
    );
}

#[pacer::test]
async fn test_error_is_returned_and_slot_is_freed() {
    let queue = TaskQueue::new(1);

    let result = queue
        .push(|| async { Err::<u32, String>("task failed".to_owned()) })
        .await;

    assert_eq!(result, Err("task failed".to_owned()));
    assert_eq!(queue.num_inflight(), 0);

    let result = queue.push(|| async { Ok::<u32, String>(7) }).await;
    assert_eq!(result, Ok(7));
}

#[pacer::test]
async fn test_failing_task_unblocks_waiter() {
    let queue = Arc::new(TaskQueue::new(1));

    let failing = {
        let queue = queue.clone();
        task::spawn(async move {
            queue
                .push(|| async {
                    sleep(Duration::from_millis(20)).await;
                    Err::<(), &str>("boom")
                })
                .await
        })
    };

    let waiting = {
        let queue = queue.clone();
        task::spawn(async move { queue.push(|| async { Ok::<(), &str>(()) }).await })
    };

    yield_now().await;
    assert_eq!(queue.num_inflight(), 1);
    assert_eq!(queue.num_waiting(), 1);

    assert_eq!(failing.await, Err("boom"));
    assert_eq!(waiting.await, Ok(()));
    assert_eq!(queue.num_inflight(), 0);
}

#[pacer::test]
async fn test_factory_runs_only_after_admission() {
    let queue = Arc::new(TaskQueue::new(1));
    let built = Arc::new(Mutex::new(Vec::new()));

    let holder = {
        let queue = queue.clone();
        task::spawn(async move {
            queue
                .push(|| sleep(Duration::from_millis(30)))
                .await
        })
    };
    yield_now().await;

    let second = {
        let queue = queue.clone();
        let built = built.clone();
        task::spawn(async move {
            queue
                .push(move || {
                    built.lock().unwrap().push("second");
                    async {}
                })
                .await
        })
    };

    sleep(Duration::from_millis(10)).await;
    assert!(built.lock().unwrap().is_empty(), "factory called too early");

    holder.await;
    second.await;
    assert_eq!(*built.lock().unwrap(), vec!["second"]);
}

#[pacer::test]
async fn test_abandoned_submission_is_no_longer_waiting() {
    let queue = Arc::new(TaskQueue::new(1));

    let holder = {
        let queue = queue.clone();
        task::spawn(async move { queue.push(|| sleep(Duration::from_millis(50))).await })
    };
    yield_now().await;

    let result = timeout(Duration::from_millis(10), queue.push(|| async {})).await;
    assert!(result.is_err());
    assert_eq!(queue.num_waiting(), 0);

    holder.await;
    assert_eq!(queue.num_inflight(), 0);
}

#[test]
#[should_panic(expected = "max_inflight must be > 0")]
fn test_zero_capacity_is_rejected() {
    let _ = TaskQueue::new(0);
}
