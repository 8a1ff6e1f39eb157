#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use lfukit::builder::LfuCacheBuilder;
use lfukit::clock::ManualClock;

// Fuzz arbitrary operation sequences on LfuCache
//
// Byte 0 and 1 pick capacity and batch size; the rest are (op, arg) pairs
// covering set, overwrite, get, peek, delete, evict, clock advance, clear.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let max_entries = usize::from(data[0] % 16) + 1;
    let batch = usize::from(data[1] % 4) + 1;
    let clock = ManualClock::new();
    let mut cache = LfuCacheBuilder::new()
        .max_entries(max_entries)
        .evict_batch_size(batch)
        .max_age_ms(64)
        .build_with_clock::<u8, u8, _>(clock.clone());

    for chunk in data[2..].chunks_exact(2) {
        let op = chunk[0] % 8;
        let key = chunk[1] % 32;

        match op {
            0 => {
                let had = cache.peek(&key).copied();
                let stored = cache.set(key, chunk[0]).copied();
                if had.is_some() {
                    assert_eq!(stored, had);
                }
            }
            1 => {
                let stored = cache.set_with(key, chunk[0], true).copied();
                if cache.contains(&key) {
                    assert_eq!(stored, Some(chunk[0]));
                }
            }
            2 => {
                let before = cache.frequency(&key);
                if cache.get(&key).is_some() {
                    let after = cache.frequency(&key).unwrap();
                    assert!(after >= before.unwrap());
                } else {
                    assert!(!cache.contains(&key));
                }
            }
            3 => {
                let _ = cache.peek(&key);
            }
            4 => {
                let had = cache.contains(&key);
                assert_eq!(cache.delete(&key), had);
                assert!(!cache.contains(&key));
            }
            5 => {
                let before = cache.len();
                let removed = cache.evict(usize::from(key % 4));
                assert_eq!(cache.len(), before - removed);
            }
            6 => clock.advance(Duration::from_millis(u64::from(key))),
            7 => {
                if key == 0 {
                    cache.clear();
                    assert!(cache.is_empty());
                }
            }
            _ => unreachable!(),
        }

        assert!(cache.len() <= max_entries);
        if let Err(err) = cache.check_invariants() {
            panic!("{err}");
        }
    }
});
