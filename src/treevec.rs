//! A vector-like sequence backed by a B-tree, for the sweep-line status.
//!
//! Elements live in the leaves. Every internal node remembers how many
//! elements each of its children holds, so positional insertion, removal and
//! lookup are all logarithmic.

use arrayvec::ArrayVec;

/// A sequence with logarithmic positional insertion and removal.
///
/// `B` is the branching factor; it must be at least 4.
#[derive(Clone, Debug)]
pub struct TreeVec<T, const B: usize> {
    root: Node<T, B>,
}

#[derive(Clone, Debug)]
enum Node<T, const B: usize> {
    Leaf(ArrayVec<T, B>),
    Internal(Inner<T, B>),
}

#[derive(Clone, Debug)]
struct Inner<T, const B: usize> {
    sizes: ArrayVec<usize, B>,
    children: ArrayVec<Box<Node<T, B>>, B>,
}

impl<T, const B: usize> Default for TreeVec<T, B> {
    fn default() -> Self {
        assert!(B >= 4);
        TreeVec {
            root: Node::Leaf(ArrayVec::new()),
        }
    }
}

// Finds the child containing position `pos`. If `append` is true, a position
// just past the end of a child counts as being in that child.
fn locate(sizes: &[usize], mut pos: usize, append: bool) -> Option<(usize, usize)> {
    for (i, &size) in sizes.iter().enumerate() {
        if pos < size || (append && pos == size) {
            return Some((i, pos));
        }
        pos -= size;
    }
    None
}

// Moves elements between two siblings so that they're both at least half
// full, or moves everything into `left` if it all fits. Returns true if
// `right` ended up empty.
fn rebalance<X, const B: usize>(left: &mut ArrayVec<X, B>, right: &mut ArrayVec<X, B>) -> bool {
    if left.len() + right.len() <= B {
        left.extend(right.drain(..));
        return true;
    }
    if left.len() < right.len() {
        let k = (right.len() - left.len()) / 2;
        left.extend(right.drain(..k));
    } else {
        let k = (left.len() - right.len()) / 2;
        let moved: ArrayVec<X, B> = left.drain(left.len() - k..).collect();
        for (i, x) in moved.into_iter().enumerate() {
            right.insert(i, x);
        }
    }
    false
}

impl<T, const B: usize> Node<T, B> {
    fn len(&self) -> usize {
        match self {
            Node::Leaf(data) => data.len(),
            Node::Internal(inner) => inner.sizes.iter().sum(),
        }
    }

    // The number of direct entries (elements or children).
    fn width(&self) -> usize {
        match self {
            Node::Leaf(data) => data.len(),
            Node::Internal(inner) => inner.children.len(),
        }
    }

    fn first(&self) -> Option<&T> {
        match self {
            Node::Leaf(data) => data.first(),
            Node::Internal(inner) => inner.children.first()?.first(),
        }
    }

    fn get(&self, pos: usize) -> Option<&T> {
        match self {
            Node::Leaf(data) => data.get(pos),
            Node::Internal(inner) => {
                let (i, pos) = locate(&inner.sizes, pos, false)?;
                inner.children[i].get(pos)
            }
        }
    }

    // Inserts, and returns the new right sibling if this node had to split.
    fn insert(&mut self, pos: usize, elt: T) -> Option<Node<T, B>> {
        match self {
            Node::Leaf(data) => {
                if !data.is_full() {
                    data.insert(pos, elt);
                    return None;
                }
                let mut right: ArrayVec<T, B> = data.drain(B / 2..).collect();
                if pos <= data.len() {
                    data.insert(pos, elt);
                } else {
                    right.insert(pos - B / 2, elt);
                }
                Some(Node::Leaf(right))
            }
            Node::Internal(inner) => {
                let (i, child_pos) = locate(&inner.sizes, pos, true)
                    .unwrap_or_else(|| panic!("insertion index {pos} out of bounds"));
                let split = inner.children[i].insert(child_pos, elt);
                inner.sizes[i] = inner.children[i].len();
                let new_child = split?;

                let new_size = new_child.len();
                if !inner.children.is_full() {
                    inner.children.insert(i + 1, Box::new(new_child));
                    inner.sizes.insert(i + 1, new_size);
                    return None;
                }

                let mut right = Inner {
                    sizes: inner.sizes.drain(B / 2..).collect(),
                    children: inner.children.drain(B / 2..).collect(),
                };
                if i < B / 2 {
                    inner.children.insert(i + 1, Box::new(new_child));
                    inner.sizes.insert(i + 1, new_size);
                } else {
                    right.children.insert(i + 1 - B / 2, Box::new(new_child));
                    right.sizes.insert(i + 1 - B / 2, new_size);
                }
                Some(Node::Internal(right))
            }
        }
    }

    fn remove(&mut self, pos: usize) -> Option<T> {
        match self {
            Node::Leaf(data) => (pos < data.len()).then(|| data.remove(pos)),
            Node::Internal(inner) => {
                let (i, child_pos) = locate(&inner.sizes, pos, false)?;
                let ret = inner.children[i].remove(child_pos)?;
                inner.sizes[i] -= 1;
                if inner.children[i].width() < B / 2 && inner.children.len() > 1 {
                    let left = if i + 1 < inner.children.len() { i } else { i - 1 };
                    inner.fix_pair(left);
                }
                Some(ret)
            }
        }
    }
}

impl<T, const B: usize> Inner<T, B> {
    // Rebalances children `i` and `i + 1`, which are always at the same depth.
    fn fix_pair(&mut self, i: usize) {
        let (head, tail) = self.children.split_at_mut(i + 1);
        let emptied = match (&mut *head[i], &mut *tail[0]) {
            (Node::Leaf(l), Node::Leaf(r)) => rebalance(l, r),
            (Node::Internal(l), Node::Internal(r)) => {
                let emptied = rebalance(&mut l.children, &mut r.children);
                l.sizes = l.children.iter().map(|c| c.len()).collect();
                r.sizes = r.children.iter().map(|c| c.len()).collect();
                emptied
            }
            _ => unreachable!("siblings at different depths"),
        };
        if emptied {
            self.children.remove(i + 1);
            self.sizes.remove(i + 1);
        } else {
            self.sizes[i + 1] = self.children[i + 1].len();
        }
        self.sizes[i] = self.children[i].len();
    }
}

impl<T, const B: usize> TreeVec<T, B> {
    /// The number of elements.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Are there no elements?
    pub fn is_empty(&self) -> bool {
        self.root.width() == 0
    }

    /// Returns the element at position `pos`, if there is one.
    pub fn get(&self, pos: usize) -> Option<&T> {
        self.root.get(pos)
    }

    /// Inserts an element at position `pos`, shifting everything after it.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len`.
    pub fn insert(&mut self, pos: usize, elt: T) {
        assert!(pos <= self.len(), "insertion index {pos} out of bounds");
        if let Some(right) = self.root.insert(pos, elt) {
            let left = std::mem::replace(&mut self.root, Node::Leaf(ArrayVec::new()));
            let mut inner = Inner {
                sizes: ArrayVec::new(),
                children: ArrayVec::new(),
            };
            inner.sizes.push(left.len());
            inner.sizes.push(right.len());
            inner.children.push(Box::new(left));
            inner.children.push(Box::new(right));
            self.root = Node::Internal(inner);
        }
    }

    /// Removes and returns the element at position `pos`, or `None` if it's out of bounds.
    pub fn remove(&mut self, pos: usize) -> Option<T> {
        let ret = self.root.remove(pos)?;
        // Shrink the tree when the root is left with a single child.
        loop {
            match &mut self.root {
                Node::Internal(inner) if inner.children.len() == 1 => {
                    let child = inner.children.pop().map(|c| *c);
                    if let Some(child) = child {
                        self.root = child;
                    }
                }
                _ => break,
            }
        }
        Some(ret)
    }

    /// Returns the index of the first element that doesn't satisfy `pred`.
    ///
    /// Like [`slice::partition_point`], this assumes that all the elements
    /// satisfying `pred` come before all the elements that don't.
    pub fn partition_point(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let mut node = &self.root;
        let mut base = 0;
        loop {
            match node {
                Node::Leaf(data) => return base + data.partition_point(pred),
                Node::Internal(inner) => {
                    // The last child whose first element satisfies the predicate
                    // is the one containing the boundary.
                    let mut i = 0;
                    while i + 1 < inner.children.len()
                        && inner.children[i + 1].first().is_some_and(&mut pred)
                    {
                        i += 1;
                    }
                    base += inner.sizes[..i].iter().sum::<usize>();
                    node = &inner.children[i];
                }
            }
        }
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> Iter<'_, T, B> {
        Iter {
            stack: vec![(&self.root, 0)],
        }
    }

    /// Panics if the tree is malformed.
    #[cfg(any(test, feature = "slow-asserts"))]
    pub fn check_invariants(&self) {
        fn check<T, const B: usize>(node: &Node<T, B>, is_root: bool) -> usize {
            if !is_root {
                assert!(node.width() >= 1);
            }
            match node {
                Node::Leaf(data) => {
                    assert!(data.len() <= B);
                    0
                }
                Node::Internal(inner) => {
                    assert_eq!(inner.sizes.len(), inner.children.len());
                    let depths: Vec<_> = inner
                        .children
                        .iter()
                        .zip(&inner.sizes)
                        .map(|(c, &size)| {
                            assert_eq!(c.len(), size);
                            check(c, false)
                        })
                        .collect();
                    assert!(depths.windows(2).all(|w| w[0] == w[1]));
                    depths[0] + 1
                }
            }
        }
        check(&self.root, true);
    }
}

impl<T, const B: usize> std::ops::Index<usize> for TreeVec<T, B> {
    type Output = T;

    fn index(&self, pos: usize) -> &T {
        self.get(pos)
            .unwrap_or_else(|| panic!("index {pos} out of bounds"))
    }
}

/// An in-order iterator over a [`TreeVec`].
pub struct Iter<'a, T, const B: usize> {
    stack: Vec<(&'a Node<T, B>, usize)>,
}

impl<'a, T, const B: usize> Iterator for Iter<'a, T, B> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let (node, next) = self.stack.last_mut()?;
            let node: &'a Node<T, B> = *node;
            match node {
                Node::Leaf(data) => {
                    if let Some(x) = data.get(*next) {
                        *next += 1;
                        return Some(x);
                    }
                }
                Node::Internal(inner) => {
                    if let Some(child) = inner.children.get(*next) {
                        *next += 1;
                        self.stack.push((child, 0));
                        continue;
                    }
                }
            }
            self.stack.pop();
        }
    }
}
