use fnv::FnvHasher;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use std::{
    collections::HashSet,
    hash::{BuildHasherDefault, Hash}
};

pub type FnvHashSet<T> = HashSet<T, BuildHasherDefault<FnvHasher>>;

/// The pseudorandom source used when a caller does not bring their own `Rng`.
pub type MazeRng = XorShiftRng;

/// Construct a hash set with the specified capacity. The hashing algorithm is much faster than the default
/// on short keys such as integers and small strings.
/// On large keys it is actually slower.
/// Note it is less robust against security attacks on key collisions.
pub fn fnv_hashset<T: Hash + Eq>(capacity: usize) -> FnvHashSet<T> {
    let fnv = BuildHasherDefault::<FnvHasher>::default();
    HashSet::<T, _>::with_capacity_and_hasher(capacity, fnv)
}

/// A reproducible random number generator: the same seed always gives the same maze.
pub fn seeded_rng(seed: u64) -> MazeRng {
    XorShiftRng::seed_from_u64(seed)
}

/// A random number generator seeded from the operating system.
pub fn entropy_rng() -> MazeRng {
    XorShiftRng::from_entropy()
}
