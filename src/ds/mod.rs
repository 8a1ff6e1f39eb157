pub mod frequency_ladder;
pub mod intrusive_list;
pub mod key_set;
pub mod slot_arena;

pub use frequency_ladder::{FrequencyBucket, FrequencyLadder};
pub use intrusive_list::IntrusiveList;
pub use key_set::KeySet;
pub use slot_arena::{SlotArena, SlotId};
