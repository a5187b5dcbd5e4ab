//! Red-black interval tree for box overlap queries.
//!
//! Entries are ordered by their key's low end (ties broken by value) and
//! every node caches the merge of all keys in its subtree. A search skips
//! any subtree whose cached merge misses the query, so stabbing queries
//! stay logarithmic plus output size.
//!
//! # Example
//!
//! ```
//! use planum::bounds::Aabb2;
//! use planum::spatial::IntervalTree;
//!
//! let mut tree = IntervalTree::new();
//! tree.insert(Aabb2::from_coords(0.0, 0.0, 1.0, 1.0), 1);
//! tree.insert(Aabb2::from_coords(5.0, 5.0, 6.0, 6.0), 2);
//!
//! let hits = tree.search(&Aabb2::from_coords(0.5, 0.5, 2.0, 2.0));
//! assert_eq!(hits, vec![1]);
//! ```

use crate::bounds::Aabb2;
use num_traits::Float;
use std::cmp::Ordering;

/// A key that can be stored in an [`IntervalTree`].
pub trait Interval: Copy {
    /// Total order on the low end of the interval.
    fn cmp_low(&self, other: &Self) -> Ordering;

    /// Returns `true` if the two intervals overlap (touching counts).
    fn overlaps(&self, other: &Self) -> bool;

    /// Smallest interval covering both.
    fn merge(&self, other: &Self) -> Self;
}

impl<F: Float> Interval for Aabb2<F> {
    fn cmp_low(&self, other: &Self) -> Ordering {
        let a = [self.min.y, self.min.x, self.max.y, self.max.x];
        let b = [other.min.y, other.min.x, other.max.y, other.max.x];
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| x.partial_cmp(y).unwrap_or(Ordering::Equal))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    #[inline]
    fn overlaps(&self, other: &Self) -> bool {
        self.intersects(*other)
    }

    #[inline]
    fn merge(&self, other: &Self) -> Self {
        self.union(*other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

/// Index of the shared black leaf.
const NIL: usize = 0;

#[derive(Debug, Clone)]
struct Node<K, V> {
    /// `None` only for the sentinel and for freed slots.
    item: Option<(K, V)>,
    max: Option<K>,
    color: Color,
    left: usize,
    right: usize,
    parent: usize,
}

impl<K, V> Node<K, V> {
    fn sentinel() -> Self {
        Self {
            item: None,
            max: None,
            color: Color::Black,
            left: NIL,
            right: NIL,
            parent: NIL,
        }
    }
}

/// Augmented red-black tree mapping interval keys to values.
///
/// Nodes live in a `Vec` arena; index `0` is the black sentinel leaf.
/// Removed slots are recycled through a free list.
#[derive(Debug, Clone)]
pub struct IntervalTree<K, V> {
    nodes: Vec<Node<K, V>>,
    free: Vec<usize>,
    root: usize,
    len: usize,
}

impl<K: Interval, V: Copy + Ord> Default for IntervalTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Interval, V: Copy + Ord> IntervalTree<K, V> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::sentinel()],
            free: Vec::new(),
            root: NIL,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Merge of every stored key, or `None` when empty.
    #[inline]
    pub fn bounds(&self) -> Option<K> {
        self.nodes[self.root].max
    }

    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[NIL] = Node::sentinel();
        self.free.clear();
        self.root = NIL;
        self.len = 0;
    }

    /// Inserts an entry. Equal entries are kept side by side.
    pub fn insert(&mut self, key: K, value: V) {
        let z = self.alloc(key, value);

        let mut y = NIL;
        let mut x = self.root;
        while x != NIL {
            y = x;
            x = if self.cmp_entry(&key, &value, x) == Ordering::Less {
                self.nodes[x].left
            } else {
                self.nodes[x].right
            };
        }

        self.nodes[z].parent = y;
        if y == NIL {
            self.root = z;
        } else if self.cmp_entry(&key, &value, y) == Ordering::Less {
            self.nodes[y].left = z;
        } else {
            self.nodes[y].right = z;
        }

        self.update_max_upwards(z);
        self.insert_fixup(z);
        self.len += 1;
    }

    /// Removes one entry equal to `(key, value)`. Returns `false` if absent.
    pub fn remove(&mut self, key: &K, value: &V) -> bool {
        let z = self.find(key, value);
        if z == NIL {
            return false;
        }

        let mut y = z;
        let mut y_color = self.nodes[y].color;
        let x;

        if self.nodes[z].left == NIL {
            x = self.nodes[z].right;
            self.transplant(z, x);
        } else if self.nodes[z].right == NIL {
            x = self.nodes[z].left;
            self.transplant(z, x);
        } else {
            y = self.minimum(self.nodes[z].right);
            y_color = self.nodes[y].color;
            x = self.nodes[y].right;
            if self.nodes[y].parent == z {
                self.nodes[x].parent = y;
            } else {
                self.transplant(y, x);
                let zr = self.nodes[z].right;
                self.nodes[y].right = zr;
                self.nodes[zr].parent = y;
            }
            self.transplant(z, y);
            let zl = self.nodes[z].left;
            self.nodes[y].left = zl;
            self.nodes[zl].parent = y;
            self.nodes[y].color = self.nodes[z].color;
        }

        // `x.parent` is the lowest node whose subtree changed.
        self.update_max_upwards(self.nodes[x].parent);
        if y_color == Color::Black {
            self.delete_fixup(x);
        }

        self.nodes[z] = Node::sentinel();
        self.free.push(z);
        self.nodes[NIL] = Node::sentinel();
        self.len -= 1;
        true
    }

    /// Returns `true` if an entry equal to `(key, value)` is stored.
    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.find(key, value) != NIL
    }

    /// Values whose key intersects `query`, in key order.
    pub fn search(&self, query: &K) -> Vec<V> {
        let mut out = Vec::new();
        self.search_with(query, |_, v| out.push(*v));
        out
    }

    /// Calls `visit` for every entry whose key intersects `query`, in key order.
    pub fn search_with(&self, query: &K, mut visit: impl FnMut(&K, &V)) {
        let mut stack = Vec::new();
        let mut cur = self.root;
        loop {
            while cur != NIL && self.subtree_may_intersect(cur, query) {
                stack.push(cur);
                cur = self.nodes[cur].left;
            }
            let n = match stack.pop() {
                Some(n) => n,
                None => break,
            };
            if let Some((k, v)) = &self.nodes[n].item {
                if k.overlaps(query) {
                    visit(k, v);
                }
            }
            cur = self.nodes[n].right;
        }
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
        };
        iter.push_left(self.root);
        iter
    }

    /// Height of the tree, counting nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn go<K, V>(nodes: &[Node<K, V>], n: usize) -> usize {
            if n == NIL {
                0
            } else {
                1 + go(nodes, nodes[n].left).max(go(nodes, nodes[n].right))
            }
        }
        go(&self.nodes, self.root)
    }

    fn alloc(&mut self, key: K, value: V) -> usize {
        let node = Node {
            item: Some((key, value)),
            max: Some(key),
            color: Color::Red,
            left: NIL,
            right: NIL,
            parent: NIL,
        };
        match self.free.pop() {
            Some(i) => {
                self.nodes[i] = node;
                i
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Compares `(key, value)` against the entry stored at `n`.
    fn cmp_entry(&self, key: &K, value: &V, n: usize) -> Ordering {
        match &self.nodes[n].item {
            Some((k, v)) => key.cmp_low(k).then_with(|| value.cmp(v)),
            None => Ordering::Less,
        }
    }

    fn find(&self, key: &K, value: &V) -> usize {
        let mut x = self.root;
        while x != NIL {
            x = match self.cmp_entry(key, value, x) {
                Ordering::Equal => return x,
                Ordering::Less => self.nodes[x].left,
                Ordering::Greater => self.nodes[x].right,
            };
        }
        NIL
    }

    #[inline]
    fn subtree_may_intersect(&self, n: usize, query: &K) -> bool {
        match &self.nodes[n].max {
            Some(m) => m.overlaps(query),
            None => false,
        }
    }

    fn minimum(&self, mut n: usize) -> usize {
        while self.nodes[n].left != NIL {
            n = self.nodes[n].left;
        }
        n
    }

    fn update_max(&mut self, n: usize) {
        if n == NIL {
            return;
        }
        let node = &self.nodes[n];
        let mut max = node.item.map(|(k, _)| k);
        for child in [node.left, node.right] {
            if let Some(cm) = self.nodes[child].max {
                max = Some(match max {
                    Some(m) => m.merge(&cm),
                    None => cm,
                });
            }
        }
        self.nodes[n].max = max;
    }

    fn update_max_upwards(&mut self, mut n: usize) {
        while n != NIL {
            self.update_max(n);
            n = self.nodes[n].parent;
        }
    }

    fn transplant(&mut self, u: usize, v: usize) {
        let up = self.nodes[u].parent;
        if up == NIL {
            self.root = v;
        } else if u == self.nodes[up].left {
            self.nodes[up].left = v;
        } else {
            self.nodes[up].right = v;
        }
        self.nodes[v].parent = up;
    }

    fn rotate_left(&mut self, x: usize) {
        let y = self.nodes[x].right;
        let yl = self.nodes[y].left;
        self.nodes[x].right = yl;
        if yl != NIL {
            self.nodes[yl].parent = x;
        }
        let xp = self.nodes[x].parent;
        self.nodes[y].parent = xp;
        if xp == NIL {
            self.root = y;
        } else if x == self.nodes[xp].left {
            self.nodes[xp].left = y;
        } else {
            self.nodes[xp].right = y;
        }
        self.nodes[y].left = x;
        self.nodes[x].parent = y;

        self.update_max(x);
        self.update_max(y);
    }

    fn rotate_right(&mut self, x: usize) {
        let y = self.nodes[x].left;
        let yr = self.nodes[y].right;
        self.nodes[x].left = yr;
        if yr != NIL {
            self.nodes[yr].parent = x;
        }
        let xp = self.nodes[x].parent;
        self.nodes[y].parent = xp;
        if xp == NIL {
            self.root = y;
        } else if x == self.nodes[xp].right {
            self.nodes[xp].right = y;
        } else {
            self.nodes[xp].left = y;
        }
        self.nodes[y].right = x;
        self.nodes[x].parent = y;

        self.update_max(x);
        self.update_max(y);
    }

    fn insert_fixup(&mut self, mut z: usize) {
        while self.nodes[self.nodes[z].parent].color == Color::Red {
            let p = self.nodes[z].parent;
            let g = self.nodes[p].parent;
            if p == self.nodes[g].left {
                let uncle = self.nodes[g].right;
                if self.nodes[uncle].color == Color::Red {
                    self.nodes[p].color = Color::Black;
                    self.nodes[uncle].color = Color::Black;
                    self.nodes[g].color = Color::Red;
                    z = g;
                } else {
                    if z == self.nodes[p].right {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.nodes[z].parent;
                    let g = self.nodes[p].parent;
                    self.nodes[p].color = Color::Black;
                    self.nodes[g].color = Color::Red;
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.nodes[g].left;
                if self.nodes[uncle].color == Color::Red {
                    self.nodes[p].color = Color::Black;
                    self.nodes[uncle].color = Color::Black;
                    self.nodes[g].color = Color::Red;
                    z = g;
                } else {
                    if z == self.nodes[p].left {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.nodes[z].parent;
                    let g = self.nodes[p].parent;
                    self.nodes[p].color = Color::Black;
                    self.nodes[g].color = Color::Red;
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root;
        self.nodes[root].color = Color::Black;
    }

    fn delete_fixup(&mut self, mut x: usize) {
        while x != self.root && self.nodes[x].color == Color::Black {
            let p = self.nodes[x].parent;
            if x == self.nodes[p].left {
                let mut w = self.nodes[p].right;
                if self.nodes[w].color == Color::Red {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_left(p);
                    w = self.nodes[p].right;
                }
                let wl = self.nodes[w].left;
                let wr = self.nodes[w].right;
                if self.nodes[wl].color == Color::Black && self.nodes[wr].color == Color::Black {
                    self.nodes[w].color = Color::Red;
                    x = p;
                } else {
                    if self.nodes[wr].color == Color::Black {
                        self.nodes[wl].color = Color::Black;
                        self.nodes[w].color = Color::Red;
                        self.rotate_right(w);
                        w = self.nodes[p].right;
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    let wr = self.nodes[w].right;
                    self.nodes[wr].color = Color::Black;
                    self.rotate_left(p);
                    x = self.root;
                }
            } else {
                let mut w = self.nodes[p].left;
                if self.nodes[w].color == Color::Red {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_right(p);
                    w = self.nodes[p].left;
                }
                let wl = self.nodes[w].left;
                let wr = self.nodes[w].right;
                if self.nodes[wl].color == Color::Black && self.nodes[wr].color == Color::Black {
                    self.nodes[w].color = Color::Red;
                    x = p;
                } else {
                    if self.nodes[wl].color == Color::Black {
                        self.nodes[wr].color = Color::Black;
                        self.nodes[w].color = Color::Red;
                        self.rotate_left(w);
                        w = self.nodes[p].left;
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    let wl = self.nodes[w].left;
                    self.nodes[wl].color = Color::Black;
                    self.rotate_right(p);
                    x = self.root;
                }
            }
        }
        self.nodes[x].color = Color::Black;
    }
}

/// In-order iterator over an [`IntervalTree`].
pub struct Iter<'a, K, V> {
    tree: &'a IntervalTree<K, V>,
    stack: Vec<usize>,
}

impl<K, V> Iter<'_, K, V> {
    fn push_left(&mut self, mut n: usize) {
        while n != NIL {
            self.stack.push(n);
            n = self.tree.nodes[n].left;
        }
    }
}

impl<K: Copy, V: Copy> Iterator for Iter<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let n = self.stack.pop()?;
        self.push_left(self.tree.nodes[n].right);
        self.tree.nodes[n].item
    }
}
