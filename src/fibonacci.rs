//! Fibonacci sequence generation

/// Iterator over the Fibonacci numbers 0, 1, 1, 2, 3, 5, ...
///
/// Ends after the largest term that fits in a `u64` instead of overflowing.
#[derive(Debug, Clone)]
pub struct Fibonacci {
    current: Option<u64>,
    next: Option<u64>,
}

impl Default for Fibonacci {
    fn default() -> Self {
        Self::new()
    }
}

impl Fibonacci {
    pub fn new() -> Self {
        Self {
            current: Some(0),
            next: Some(1),
        }
    }
}

impl Iterator for Fibonacci {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let value = self.current?;
        let following = self.next.and_then(|next| value.checked_add(next));
        self.current = self.next;
        self.next = following;
        Some(value)
    }
}

/// Returns a closure yielding successive Fibonacci numbers
///
/// Once the sequence leaves the `u64` range the closure keeps returning the
/// last term that fit.
pub fn fibonacci() -> impl FnMut() -> u64 {
    let mut terms = Fibonacci::new();
    let mut last = 0;
    move || {
        if let Some(value) = terms.next() {
            last = value;
        }
        last
    }
}
