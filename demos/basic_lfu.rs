use std::time::Duration;

use lfukit::builder::LfuCacheBuilder;
use lfukit::clock::ManualClock;
use lfukit::policy::lfu::LfuCache;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // RUST_LOG=lfukit=debug shows eviction batches and expiry.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lfukit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut cache: LfuCache<&str, String> = LfuCache::new(3);
    cache.set("foo_1", "bar_1".to_string());
    cache.set("foo_2", "bar_2".to_string());
    cache.set("foo_3", "bar_3".to_string());

    cache.get("foo_1");
    cache.set_with("foo_1", "bar_1_2".to_string(), true);
    cache.set("foo_4", "bar_4".to_string());
    cache.set("foo_5", "bar_5".to_string());

    cache.for_each(|key, value, index| {
        println!("{index}: {key} = {value} (freq {:?})", cache.frequency(key));
    });

    let clock = ManualClock::new();
    let mut ttl = LfuCacheBuilder::new()
        .max_entries(10)
        .max_age(Duration::from_millis(100))
        .build_with_clock(clock.clone());
    ttl.set("session", 42);
    clock.advance(Duration::from_millis(150));
    println!("session after 150ms: {:?}", ttl.get("session"));
}

// Expected output (log lines omitted):
// 0: foo_1 = bar_1_2 (freq Some(2))
// 1: foo_4 = bar_4 (freq Some(1))
// 2: foo_5 = bar_5 (freq Some(1))
// session after 150ms: None
