//! Cold Chain
//!
//! This example builds a chain of transformations over a deferred lookup and
//! shows that nothing runs until the first subscription.
//!
//! Key concepts:
//! - Deferred futures are cold
//! - `map` and `flat_map` build new cold futures
//! - Failures skip success transforms and reach `map_error`
//!
//! Run with: cargo run --example cold_chain

use coldfuture::{Future, Phase};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn lookup(id: u32) -> Future<u32, String> {
    Future::deferred(move |resolver| {
        println!("  [task] looking up {id}");
        if id == 0 {
            resolver.fail(format!("no record {id}"));
        } else {
            resolver.succeed(id * 10);
        }
    })
}

fn main() {
    println!("=== Cold Chain Example ===\n");

    let source = lookup(4);
    let chain = source
        .map(|n| n + 2)
        .flat_map(|n| Future::value(n * 2))
        .map_error(|err| format!("lookup failed: {err}"));

    thread::sleep(Duration::from_millis(50));
    println!("Before subscribing: source is {}", source.phase());
    assert_eq!(source.phase(), Phase::NotStarted);

    let (tx, rx) = mpsc::channel();
    chain.done(move |result| tx.send(result).unwrap());
    println!("Result: {:?}", rx.recv().unwrap());
    println!("After subscribing: source is {}\n", source.phase());

    println!("--- Failure path ---");
    let (tx, rx) = mpsc::channel();
    lookup(0)
        .map(|n| {
            println!("  [map] never printed");
            n + 2
        })
        .map_error(|err| format!("lookup failed: {err}"))
        .done(move |result| tx.send(result).unwrap());
    println!("Result: {:?}", rx.recv().unwrap());

    println!("\n=== Example Complete ===");
}
