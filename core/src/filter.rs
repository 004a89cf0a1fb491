//! Run-time scanner exclusion.
//!
//! A filter is consulted once per scanner per scan, after the scanner's own
//! `should_run` check has already admitted it to the registry.

use std::collections::HashSet;
use std::sync::Arc;

pub trait Filter: Send + Sync {
    /// True when the scanner must be skipped for this scan
    fn is_scanner_ignored(&self, identifier: &str) -> bool;
}

impl<F: Filter + ?Sized> Filter for Arc<F> {
    fn is_scanner_ignored(&self, identifier: &str) -> bool {
        (**self).is_scanner_ignored(identifier)
    }
}

impl<F: Filter + ?Sized> Filter for &F {
    fn is_scanner_ignored(&self, identifier: &str) -> bool {
        (**self).is_scanner_ignored(identifier)
    }
}

/// Lets every scanner through.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilter;

impl Filter for NoFilter {
    fn is_scanner_ignored(&self, _identifier: &str) -> bool {
        false
    }
}

/// Deny list of scanner identifiers.
#[derive(Debug, Clone, Default)]
pub struct StaticFilter {
    ignored: HashSet<String>,
}

impl StaticFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule<I, T>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.ignored
            .extend(identifiers.into_iter().map(Into::into).filter(|id: &String| !id.is_empty()));
    }

    pub fn with_rule<I, T>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.add_rule(identifiers);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ignored.is_empty()
    }
}

impl Filter for StaticFilter {
    fn is_scanner_ignored(&self, identifier: &str) -> bool {
        self.ignored.contains(identifier)
    }
}

/// Ignores every scanner that is not listed.
#[derive(Debug, Clone, Default)]
pub struct AllowListFilter {
    allowed: HashSet<String>,
}

impl AllowListFilter {
    pub fn new<I, T>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            allowed: identifiers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Filter for AllowListFilter {
    fn is_scanner_ignored(&self, identifier: &str) -> bool {
        !self.allowed.contains(identifier)
    }
}

/// Skips a scanner when either filter skips it.
#[derive(Clone)]
pub struct Either<A, B>(pub A, pub B);

impl<A: Filter, B: Filter> Filter for Either<A, B> {
    fn is_scanner_ignored(&self, identifier: &str) -> bool {
        self.0.is_scanner_ignored(identifier) || self.1.is_scanner_ignored(identifier)
    }
}
