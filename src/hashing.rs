//! Deterministic `HashMap` and `HashSet` aliases. The hashing data structures in the standard
//! library are randomly seeded, which would make iteration order (and therefore anything derived
//! from it) differ between two runs with the same random seed. The `rustc-hash` hasher has no
//! per-process state.
//!
//! `HashMap<K, V, S>` does not have a `new` method for a non-default hasher. Use
//! `HashMap::default()` instead.

pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
