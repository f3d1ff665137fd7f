//! Binary search trees and content comparison via concurrent traversal
//!
//! - `Tree`: an unbalanced binary search tree of integers
//! - `walk`: an async producer streaming a tree's values in order
//! - `same_content`: compares two trees by walking both concurrently

mod bst;
mod walk;

pub use bst::{Iter, Tree, RANDOM_TREE_SIZE};
pub use walk::{same_content, walk};
