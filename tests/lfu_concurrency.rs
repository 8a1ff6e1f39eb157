// ==============================================
// LFU CONCURRENCY TESTS (integration)
// ==============================================
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use lfukit::builder::LfuCacheBuilder;
use lfukit::policy::concurrent::ConcurrentLfuCache;

mod shared_handle {
    use super::*;

    #[test]
    fn mixed_operations_keep_invariants() {
        let cache: ConcurrentLfuCache<String, String> = ConcurrentLfuCache::new(100);
        let num_threads = 8;
        let operations_per_thread = 250;
        let hits = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..num_threads)
            .map(|thread_id| {
                let cache = cache.clone();
                let hits = hits.clone();

                thread::spawn(move || {
                    for i in 0..operations_per_thread {
                        match i % 4 {
                            0 => {
                                let key = format!("thread_{}_{}", thread_id, i);
                                cache.set(key, format!("value_{}_{}", thread_id, i));
                            },
                            1 => {
                                let key = format!("thread_{}_0", thread_id);
                                if cache.get(&key).is_some() {
                                    hits.fetch_add(1, Ordering::Relaxed);
                                }
                            },
                            2 => {
                                let key = format!("thread_{}_{}", thread_id, i / 2);
                                let _ = cache.peek(&key);
                            },
                            _ => {
                                if i % 20 == 3 {
                                    let key = format!("thread_{}_{}", thread_id, i / 4);
                                    cache.delete(&key);
                                }
                            },
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 100);
        assert!(hits.load(Ordering::Relaxed) > 0);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn frequently_read_key_survives_contention() {
        let cache: ConcurrentLfuCache<u64, u64> = ConcurrentLfuCache::new(32);
        cache.set(u64::MAX, 0);
        for _ in 0..64 {
            cache.get(&u64::MAX);
        }

        let writers: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..1_000u64 {
                        cache.set(t * 1_000_000 + i, i);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        assert!(cache.contains(&u64::MAX));
        assert!(cache.frequency(&u64::MAX).unwrap() >= 65);
        assert!(cache.len() <= 32);
    }

    #[test]
    fn readers_observe_overwrites_atomically() {
        let config = LfuCacheBuilder::new().max_entries(4).config();
        let cache: ConcurrentLfuCache<&'static str, (u32, u32)> =
            ConcurrentLfuCache::with_config(config);
        cache.set("pair", (0, 0));

        let writer = {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 1..=500u32 {
                    cache.set_with("pair", (i, i), true);
                }
            })
        };
        let reader = {
            let cache = cache.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    if let Some(pair) = cache.peek("pair") {
                        assert_eq!(pair.0, pair.1);
                    }
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();

        assert_eq!(cache.peek("pair").as_deref(), Some(&(500, 500)));
        assert_eq!(cache.frequency("pair"), Some(1));
    }

    #[test]
    fn clear_from_another_thread() {
        let cache: ConcurrentLfuCache<u32, u32> = ConcurrentLfuCache::new(16);
        for i in 0..16 {
            cache.set(i, i);
        }
        let other = cache.clone();
        thread::spawn(move || other.clear()).join().unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.map(|k, _, _| *k), Vec::<u32>::new());
    }
}
