//! Run with `RUST_LOG=trace cargo run --example hello --features tracing` to
//! see where each callable is stored.

use tracing_subscriber::filter::EnvFilter;
use unique_function::{UniqueFnMut, UniqueFnOnce};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let answer = 42;
    let mut print = UniqueFnMut::<(), ()>::new(move || println!("{}", answer));
    print.call();

    let lines = vec!["hello", "from", "the", "heap"];
    let padding = [0u8; 64];
    let mut farewell = UniqueFnOnce::<(), usize>::new(move || {
        for line in &lines {
            println!("{}", line);
        }
        lines.len() + padding.len()
    });

    let moved = farewell.take();
    tracing::info!(placement = ?moved.placement(), "calling the moved callable");
    tracing::info!(returned = moved.call_once_with(()), "done");
    assert!(farewell.is_none());
}
