//! Status-transition policy applied at the HTTP boundary.
//!
//! The cells themselves accept any status change; handlers consult a
//! [`TransitionTable`] so front ends only get the moves the desk workflow
//! allows.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct TransitionTable<S> {
    allowed: HashMap<S, Vec<S>>,
}

impl<S> TransitionTable<S>
where
    S: Copy + Eq + Hash + Debug,
{
    pub fn new(rules: impl IntoIterator<Item = (S, Vec<S>)>) -> Self {
        Self {
            allowed: rules.into_iter().collect(),
        }
    }

    /// Statuses reachable from `from`. Terminal statuses yield an empty slice.
    pub fn next(&self, from: S) -> &[S] {
        self.allowed.get(&from).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Re-writing the current status is always accepted.
    pub fn allows(&self, from: S, to: S) -> bool {
        from == to || self.next(from).contains(&to)
    }
}
