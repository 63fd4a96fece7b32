//! Stable ordering helpers.
//!
//! Snapshot computation must be a pure function of its inputs; every
//! selection between equally-plausible candidates goes through a total,
//! documented order so repeated runs pick identically.

/// Types participating in stable selections expose a total order key.
pub trait StableOrd {
    type Key: Ord;
    fn stable_key(&self) -> Self::Key;
}

/// Stable sort of a candidate slice by `StableOrd` keys.
pub fn sort_stable<T: StableOrd>(items: &mut [T]) {
    items.sort_by(|a, b| a.stable_key().cmp(&b.stable_key()));
}

#[cfg(test)]
mod tests {
    use super::*;

    struct P(u32, u32);
    impl StableOrd for P {
        type Key = (u32, u32);
        fn stable_key(&self) -> Self::Key {
            (self.0, self.1)
        }
    }

    #[test]
    fn sorts_by_composite_key() {
        let mut items = vec![P(2, 0), P(1, 9), P(1, 3)];
        sort_stable(&mut items);
        let keys: Vec<(u32, u32)> = items.iter().map(|p| p.stable_key()).collect();
        assert_eq!(keys, vec![(1, 3), (1, 9), (2, 0)]);
    }
}
