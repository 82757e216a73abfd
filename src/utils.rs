//! FNV hashed collections. FNV beats SipHash on small keys like grid coordinates, and the maze code
//! never hashes untrusted input.

use fnv::FnvBuildHasher;
use std::hash::Hash;

pub use fnv::{FnvHashMap, FnvHashSet};

pub fn fnv_hashset<T: Hash + Eq>(capacity: usize) -> FnvHashSet<T> {
    FnvHashSet::with_capacity_and_hasher(capacity, FnvBuildHasher::default())
}

pub fn fnv_hashmap<K: Hash + Eq, V>(capacity: usize) -> FnvHashMap<K, V> {
    FnvHashMap::with_capacity_and_hasher(capacity, FnvBuildHasher::default())
}
