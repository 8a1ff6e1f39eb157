//! Entry storage backing the LFU engine.

pub mod entry_store;

pub use entry_store::{Entry, EntryStore};
