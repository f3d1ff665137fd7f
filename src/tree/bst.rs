use rand::seq::SliceRandom;
use rand::Rng;

/// Number of values in a tree built by [`Tree::random`]
pub const RANDOM_TREE_SIZE: i64 = 10;

/// Unbalanced binary search tree
///
/// Values smaller than a node go left; everything else, duplicates included,
/// goes right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    root: Option<Box<Node>>,
    len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    value: i64,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree by inserting `values` in order
    pub fn from_values<I: IntoIterator<Item = i64>>(values: I) -> Self {
        let mut tree = Self::new();
        for value in values {
            tree.insert(value);
        }
        tree
    }

    /// Builds a tree holding `k, 2k, ..., 10k`, inserted in an order drawn
    /// from `rng`
    ///
    /// Two calls with the same `k` give trees with the same values but
    /// (usually) different shapes.
    pub fn random<R: Rng + ?Sized>(k: i64, rng: &mut R) -> Self {
        let mut values: Vec<i64> = (1..=RANDOM_TREE_SIZE).map(|v| v * k).collect();
        values.shuffle(rng);
        Self::from_values(values)
    }

    pub fn insert(&mut self, value: i64) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if value < node.value {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Box::new(Node {
            value,
            left: None,
            right: None,
        }));
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Values in ascending order
    pub fn in_order(&self) -> Vec<i64> {
        self.iter().collect()
    }

    /// In-order iterator over the values
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }
}

/// In-order iterator over a [`Tree`]
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn push_left(&mut self, mut current: Option<&'a Node>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(node.value)
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = i64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
