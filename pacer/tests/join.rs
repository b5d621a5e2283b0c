use pacer::task;
use pacer::time::sleep;
use pacer::{RuntimeBuilder, join};
use std::time::{Duration, Instant};

#[test]
fn test_join_single_future() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async { join!(async { 42 }) });

    assert_eq!(result, 42);
}

#[test]
fn test_join_different_types() {
    let rt = RuntimeBuilder::new().build();

    let (num, text, list) = rt.block_on(async {
        join!(async { 100i32 }, async { String::from("test") }, async {
            vec![1, 2, 3]
        })
    });

    assert_eq!(num, 100);
    assert_eq!(text, "test");
    assert_eq!(list, vec![1, 2, 3]);
}

#[test]
fn test_join_with_trailing_comma() {
    let rt = RuntimeBuilder::new().build();

    let (a, b) = rt.block_on(async { join!(async { 1 }, async { 2 },) });

    assert_eq!(a + b, 3);
}

#[pacer::test]
async fn test_join_polls_futures_concurrently() {
    let start = Instant::now();

    let (a, b) = join!(
        async {
            sleep(Duration::from_millis(40)).await;
            "a"
        },
        async {
            sleep(Duration::from_millis(40)).await;
            "b"
        }
    );

    assert_eq!((a, b), ("a", "b"));
    assert!(start.elapsed() < Duration::from_millis(75));
}

#[pacer::test]
async fn test_join_handles() {
    let first = task::spawn(async { 1 });
    let second = task::spawn(async { 2 });

    let (a, b) = join!(first, second);

    assert_eq!((a, b), (1, 2));
}
