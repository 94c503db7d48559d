//! End-to-end behaviour of futures on real executors.

use coldfuture::core::{Exclusive, FutureState, Phase, TransitionError};
use coldfuture::executor::{Job, ThreadPool};
use coldfuture::{Executor, Future, Inline, Resolver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn wait<T, E>(future: &Future<T, E>) -> Result<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    future.done(move |result| tx.send(result).unwrap());
    rx.recv_timeout(TIMEOUT).expect("future resolved in time")
}

/// Runs jobs inline after recording which executor received them.
#[derive(Clone)]
struct Recording {
    label: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Executor for Recording {
    fn execute(&self, job: Job) {
        self.log.lock().unwrap().push(self.label);
        job();
    }
}

#[test]
fn concurrent_subscribers_start_the_task_once() {
    init_tracing();
    const SUBSCRIBERS: usize = 100;

    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let future: Future<u32, String> = Future::deferred(move |resolver| {
        counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        resolver.succeed(7);
    });

    let barrier = Arc::new(Barrier::new(SUBSCRIBERS));
    let (tx, rx) = mpsc::channel();

    let threads: Vec<_> = (0..SUBSCRIBERS)
        .map(|_| {
            let future = future.clone();
            let barrier = Arc::clone(&barrier);
            let tx = tx.clone();
            thread::spawn(move || {
                barrier.wait();
                future.done(move |result| tx.send(result).unwrap());
            })
        })
        .collect();

    for handle in threads {
        handle.join().unwrap();
    }

    for _ in 0..SUBSCRIBERS {
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), Ok(7));
    }
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn chain_stays_cold_until_first_subscription() {
    init_tracing();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let log = Arc::clone(&calls);
    let source: Future<i32, String> = Future::deferred(move |resolver| {
        log.lock().unwrap().push("task");
        resolver.succeed(2);
    });

    let log_map = Arc::clone(&calls);
    let log_flat = Arc::clone(&calls);
    let chain = source
        .map(move |x| {
            log_map.lock().unwrap().push("map");
            x + 2
        })
        .flat_map(move |x| {
            log_flat.lock().unwrap().push("flat_map");
            Future::value(x + 2)
        });

    thread::sleep(Duration::from_millis(100));
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(source.phase(), Phase::NotStarted);

    assert_eq!(wait(&chain), Ok(6));
    assert_eq!(*calls.lock().unwrap(), vec!["task", "map", "flat_map"]);
}

#[test]
fn failure_skips_success_transform() {
    init_tracing();
    let transformed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&transformed);

    let future: Future<i32, String> = Future::deferred(|resolver| resolver.fail("err".into()));
    let mapped = future.map(move |x| {
        counter.fetch_add(1, Ordering::SeqCst);
        x + 2
    });

    assert_eq!(wait(&mapped), Err("err".to_string()));
    assert_eq!(transformed.load(Ordering::SeqCst), 0);
}

#[test]
fn handlers_are_dispatched_in_subscription_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (resolver_tx, resolver_rx) = mpsc::channel::<Resolver<i32, String>>();
    let future: Future<i32, String> =
        Future::deferred_on(Inline, move |resolver| resolver_tx.send(resolver).unwrap());

    for label in ["A", "B", "C"] {
        let executor = Recording {
            label,
            log: Arc::clone(&log),
        };
        future.done_on(executor, |_| {});
    }
    assert!(log.lock().unwrap().is_empty());

    resolver_rx.recv().unwrap().succeed(1);

    assert_eq!(*log.lock().unwrap(), vec!["A", "B", "C"]);
}

#[test]
fn panicking_inline_handler_still_lets_siblings_run() {
    let hits = Arc::new(AtomicUsize::new(0));
    let (resolver_tx, resolver_rx) = mpsc::channel::<Resolver<i32, String>>();
    let future: Future<i32, String> =
        Future::deferred_on(Inline, move |resolver| resolver_tx.send(resolver).unwrap());

    future.done_on(Inline, |_| panic!("subscriber failed"));
    for _ in 0..3 {
        let hits = Arc::clone(&hits);
        future.done_on(Inline, move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
    }

    let resolver = resolver_rx.recv().unwrap();
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| resolver.succeed(1)));

    assert!(outcome.is_err());
    assert!(future.is_finished());
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[test]
fn handler_runs_on_its_requested_pool() {
    let pool = ThreadPool::builder()
        .threads(1)
        .thread_name("handler-pool")
        .build()
        .unwrap();
    let future: Future<i32, String> = Future::value(1);
    let (tx, rx) = mpsc::channel();

    future.done_on(pool.clone(), move |_| {
        tx.send(thread::current().name().map(str::to_string)).unwrap();
    });

    let name = rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(name.as_deref(), Some("handler-pool-0"));
    pool.shutdown();
    pool.join();
}

#[test]
fn deferred_task_runs_on_its_executor() {
    let pool = ThreadPool::builder()
        .threads(1)
        .thread_name("task-pool")
        .build()
        .unwrap();
    let future: Future<String, String> = Future::deferred_on(pool.clone(), |resolver| {
        let name = thread::current().name().unwrap_or_default().to_string();
        resolver.succeed(name);
    });

    assert_eq!(wait(&future), Ok("task-pool-0".to_string()));
}

#[test]
fn flat_map_error_recovers_across_threads() {
    let future: Future<i32, String> = Future::deferred(|resolver| {
        thread::spawn(move || resolver.fail("offline".into()));
    });

    let recovered = future
        .map_error(|err| err.len())
        .flat_map_error(|len| Future::<i32, String>::value(len as i32));

    assert_eq!(wait(&recovered), Ok(7));
}

#[test]
fn late_subscribers_see_the_same_result() {
    let future: Future<i32, String> = Future::deferred(|resolver| resolver.succeed(11));
    assert_eq!(wait(&future), Ok(11));
    assert!(future.is_finished());

    assert_eq!(wait(&future), Ok(11));
    assert_eq!(wait(&future.clone()), Ok(11));
}

#[test]
fn second_resolve_is_rejected_under_the_lock() {
    let cell: Exclusive<FutureState<i32, String, ()>> = Exclusive::new(FutureState::pending(()));

    cell.apply(|state| state.start()).unwrap();
    cell.apply(|state| state.resolve(Ok(1))).unwrap().fire();

    let second = cell.apply(|state| state.resolve(Ok(2)).err());
    assert_eq!(
        second,
        Some(TransitionError::NotResolvable {
            phase: Phase::Finished
        })
    );
    assert!(cell.apply(|state| matches!(state, FutureState::Finished(Ok(1)))));
}

#[cfg(feature = "tokio")]
#[tokio::test(flavor = "multi_thread")]
async fn tokio_handle_can_host_tasks_and_handlers() {
    let handle = tokio::runtime::Handle::current();
    let future: Future<i32, String> = Future::deferred_on(handle.clone(), |r| r.succeed(3));
    let (tx, rx) = tokio::sync::oneshot::channel();

    future.map_on(handle.clone(), |x| x * 3).done_on(handle, move |result| {
        let _ = tx.send(result);
    });

    assert_eq!(rx.await.unwrap(), Ok(9));
}
