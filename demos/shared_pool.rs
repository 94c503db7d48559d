//! Shared Pool
//!
//! This example starts a dedicated thread pool and lets many threads
//! subscribe to one deferred future at the same time.
//!
//! Key concepts:
//! - `ThreadPoolBuilder` configures worker count and names
//! - The task runs once however many threads subscribe
//! - Every subscriber receives the same result on the pool
//!
//! Run with: cargo run --example shared_pool

use coldfuture::executor::ThreadPool;
use coldfuture::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;

const SUBSCRIBERS: usize = 16;

fn main() {
    println!("=== Shared Pool Example ===\n");

    let pool = ThreadPool::builder()
        .threads(2)
        .thread_name("demo-pool")
        .build()
        .unwrap();
    println!("Pool: {pool:?}");

    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let future: Future<String, String> = Future::deferred_on(pool.clone(), move |resolver| {
        counter.fetch_add(1, Ordering::SeqCst);
        let worker = thread::current().name().unwrap_or_default().to_string();
        resolver.succeed(format!("computed on {worker}"));
    });

    let barrier = Arc::new(Barrier::new(SUBSCRIBERS));
    let (tx, rx) = mpsc::channel();
    let subscribers: Vec<_> = (0..SUBSCRIBERS)
        .map(|i| {
            let future = future.clone();
            let barrier = Arc::clone(&barrier);
            let tx = tx.clone();
            let pool = pool.clone();
            thread::spawn(move || {
                barrier.wait();
                future.done_on(pool, move |result| tx.send((i, result)).unwrap());
            })
        })
        .collect();

    for handle in subscribers {
        handle.join().unwrap();
    }

    for _ in 0..SUBSCRIBERS {
        let (i, result) = rx.recv().unwrap();
        println!("  subscriber {i:2}: {result:?}");
    }
    println!("\nTask ran {} time(s)", runs.load(Ordering::SeqCst));

    pool.shutdown();
    pool.join();
    println!("\n=== Example Complete ===");
}
