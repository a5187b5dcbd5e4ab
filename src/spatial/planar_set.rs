//! Unique set of shape handles indexed by bounding box.

use super::IntervalTree;
use crate::bounds::Aabb2;
use num_traits::Float;
use std::collections::BTreeMap;

/// A set of handles, each stored with the bounding box it was added under.
///
/// Every add and remove is mirrored into an [`IntervalTree`] so that
/// [`search`](PlanarSet::search) only visits handles whose box can overlap
/// the query. The box is remembered per handle, so a handle whose geometry
/// changed must be removed before it is mutated and added again afterwards.
///
/// # Example
///
/// ```
/// use planum::bounds::Aabb2;
/// use planum::spatial::PlanarSet;
///
/// let mut set: PlanarSet<u32, f64> = PlanarSet::new();
/// assert!(set.add(7, Aabb2::from_coords(0.0, 0.0, 2.0, 2.0)));
/// assert!(!set.add(7, Aabb2::from_coords(0.0, 0.0, 2.0, 2.0)));
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.search(&Aabb2::from_coords(1.0, 1.0, 3.0, 3.0)), vec![7]);
/// ```
#[derive(Debug, Clone)]
pub struct PlanarSet<K, F> {
    boxes: BTreeMap<K, Aabb2<F>>,
    index: IntervalTree<Aabb2<F>, K>,
}

impl<K: Copy + Ord, F: Float> Default for PlanarSet<K, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Ord, F: Float> PlanarSet<K, F> {
    pub fn new() -> Self {
        Self {
            boxes: BTreeMap::new(),
            index: IntervalTree::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.boxes.contains_key(&key)
    }

    /// Box the handle was added under.
    #[inline]
    pub fn get_box(&self, key: K) -> Option<Aabb2<F>> {
        self.boxes.get(&key).copied()
    }

    /// Adds a handle. Returns `false` and leaves the set unchanged if the
    /// handle is already present.
    pub fn add(&mut self, key: K, aabb: Aabb2<F>) -> bool {
        if self.boxes.contains_key(&key) {
            return false;
        }
        self.boxes.insert(key, aabb);
        self.index.insert(aabb, key);
        true
    }

    /// Removes a handle. Returns `false` if it was not present.
    pub fn remove(&mut self, key: K) -> bool {
        match self.boxes.remove(&key) {
            Some(aabb) => self.index.remove(&aabb, &key),
            None => false,
        }
    }

    /// Re-indexes a handle under a new box.
    pub fn update(&mut self, key: K, aabb: Aabb2<F>) {
        self.remove(key);
        self.add(key, aabb);
    }

    /// Handles whose box overlaps `query`, in box order.
    pub fn search(&self, query: &Aabb2<F>) -> Vec<K> {
        self.index.search(query)
    }

    /// Union of all stored boxes.
    #[inline]
    pub fn bounds(&self) -> Option<Aabb2<F>> {
        self.index.bounds()
    }

    /// Handles in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.boxes.keys().copied()
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
        self.index.clear();
    }
}
