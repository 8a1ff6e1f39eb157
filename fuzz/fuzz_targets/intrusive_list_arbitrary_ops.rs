#![no_main]

use libfuzzer_sys::fuzz_target;
use lfukit::ds::IntrusiveList;

// Fuzz arbitrary operation sequences on IntrusiveList
//
// Mirrors every operation on a Vec of (id, value) pairs and checks that
// iteration order and lengths agree after each step.
fuzz_target!(|data: &[u8]| {
    let mut list: IntrusiveList<u32> = IntrusiveList::new();
    let mut model: Vec<(lfukit::SlotId, u32)> = Vec::new();
    let mut all_ids = Vec::new();

    for chunk in data.chunks_exact(2) {
        let op = chunk[0] % 6;
        let value = u32::from(chunk[1]);

        match op {
            0 => {
                let id = list.push_front(value);
                model.insert(0, (id, value));
                all_ids.push(id);
            }
            1 => {
                let id = list.push_back(value);
                model.push((id, value));
                all_ids.push(id);
            }
            2 => {
                let popped = list.pop_front();
                let expected = if model.is_empty() {
                    None
                } else {
                    Some(model.remove(0).1)
                };
                assert_eq!(popped, expected);
            }
            3 => {
                if !all_ids.is_empty() {
                    let id = all_ids[value as usize % all_ids.len()];
                    let removed = list.remove(id);
                    let pos = model.iter().position(|(mid, _)| *mid == id);
                    assert_eq!(removed, pos.map(|p| model.remove(p).1));
                }
            }
            4 => {
                if !all_ids.is_empty() {
                    let anchor = all_ids[value as usize % all_ids.len()];
                    let inserted = list.insert_after(anchor, value);
                    match model.iter().position(|(mid, _)| *mid == anchor) {
                        Some(p) => {
                            let id = inserted.expect("live anchor accepted");
                            model.insert(p + 1, (id, value));
                            all_ids.push(id);
                        }
                        None => assert!(inserted.is_none()),
                    }
                }
            }
            5 => {
                list.clear();
                model.clear();
                all_ids.clear();
            }
            _ => unreachable!(),
        }

        // Stale ids may alias recycled slots; drop the ones no longer live.
        all_ids.retain(|id| model.iter().any(|(mid, _)| mid == id));

        assert_eq!(list.len(), model.len());
        let values: Vec<u32> = list.iter().copied().collect();
        let expected: Vec<u32> = model.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, expected);
        assert_eq!(list.front_id(), model.first().map(|(id, _)| *id));
        assert_eq!(list.back_id(), model.last().map(|(id, _)| *id));
    }
});
