//! Outcome of a read that must not fail outward.

use crate::error::ForecastError;

/// Result of a lookup that distinguishes "nothing there" from "could not look".
///
/// Callers at the HTTP boundary render [Lookup::Empty] and [Lookup::Failed] the same way, but
/// the failure is kept so it can be logged, counted and signalled.
#[derive(Debug)]
pub enum Lookup<T> {
    /// Data was found
    Found(T),
    /// The store answered, with nothing matching
    Empty,
    /// The store could not be queried
    Failed(ForecastError),
}

impl<T> Lookup<T> {
    /// Returns true if the lookup failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Lookup::Failed(_))
    }

    /// Map the found value.
    pub fn map<U, F>(self, f: F) -> Lookup<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Empty => Lookup::Empty,
            Lookup::Failed(error) => Lookup::Failed(error),
        }
    }

    /// Return the found value, or the default for empty and failed lookups.
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Lookup::Found(value) => value,
            Lookup::Empty | Lookup::Failed(_) => T::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found() {
        let lookup = Lookup::Found(vec![1, 2]);
        assert!(!lookup.is_failed());
        let doubled = lookup.map(|v| v.iter().map(|x| x * 2).collect::<Vec<_>>());
        assert_eq!(vec![2, 4], doubled.unwrap_or_default());
    }

    #[test]
    fn empty() {
        let lookup: Lookup<Vec<i64>> = Lookup::Empty;
        assert!(!lookup.is_failed());
        assert!(lookup.unwrap_or_default().is_empty());
    }

    #[test]
    fn failed() {
        let lookup: Lookup<Vec<i64>> = Lookup::Failed(ForecastError::InvalidTimestamp {
            value: "x".to_string(),
        });
        assert!(lookup.is_failed());
        let mapped = lookup.map(|v| v.len());
        assert!(mapped.is_failed());
        assert_eq!(0, mapped.unwrap_or_default());
    }
}
