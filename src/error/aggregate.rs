// src/error/aggregate.rs
//
// LookupError - every failure seen during one resolution attempt
//
// The collapsed kind is a fold over the merged failures:
// - all failures share one comparable kind -> that kind
// - mixed kinds, or any Other              -> Other
// The result does not depend on merge order.

use std::fmt;

use super::types::{ErrorKind, FetchError};

#[derive(Debug, Clone, Default)]
pub struct LookupError {
    kind: Option<ErrorKind>,
    failures: Vec<FetchError>,
}

impl LookupError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, failure: FetchError) {
        let incoming = failure.kind();
        self.kind = Some(match self.kind {
            None => incoming,
            Some(current) if current.matches(incoming) => current,
            Some(_) => ErrorKind::Other,
        });
        self.failures.push(failure);
    }

    /// The collapsed kind. An empty aggregate reports `Other`.
    pub fn kind(&self) -> ErrorKind {
        self.kind.unwrap_or(ErrorKind::Other)
    }

    /// Kind comparison with the `Other` rule applied.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind().matches(kind)
    }

    pub fn failures(&self) -> &[FetchError] {
        &self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }
}

impl Extend<FetchError> for LookupError {
    fn extend<I: IntoIterator<Item = FetchError>>(&mut self, iter: I) {
        for failure in iter {
            self.merge(failure);
        }
    }
}

impl FromIterator<FetchError> for LookupError {
    fn from_iter<I: IntoIterator<Item = FetchError>>(iter: I) -> Self {
        let mut lookup = LookupError::new();
        lookup.extend(iter);
        lookup
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        for failure in &self.failures {
            write!(f, "\n\t{}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for LookupError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(kind: ErrorKind) -> FetchError {
        FetchError::new(kind, format!("{kind}"))
    }

    #[test]
    fn test_empty_aggregate_is_other() {
        let lookup = LookupError::new();
        assert!(lookup.is_empty());
        assert_eq!(lookup.kind(), ErrorKind::Other);
    }

    #[test]
    fn test_same_kind_collapses() {
        let lookup: LookupError = (0..3).map(|_| failure(ErrorKind::CodeNotFound)).collect();
        assert_eq!(lookup.kind(), ErrorKind::CodeNotFound);
        assert!(lookup.is(ErrorKind::CodeNotFound));
        assert_eq!(lookup.len(), 3);
    }

    #[test]
    fn test_mixed_kinds_are_other() {
        let lookup: LookupError = [ErrorKind::CodeNotFound, ErrorKind::Timeout]
            .into_iter()
            .map(failure)
            .collect();
        assert_eq!(lookup.kind(), ErrorKind::Other);
        assert!(!lookup.is(ErrorKind::Other));
    }

    #[test]
    fn test_other_never_collapses() {
        let lookup: LookupError = [ErrorKind::Other, ErrorKind::Other]
            .into_iter()
            .map(failure)
            .collect();
        assert_eq!(lookup.kind(), ErrorKind::Other);
        assert_eq!(lookup.failures().len(), 2);
    }

    #[test]
    fn test_kind_is_order_independent() {
        let kinds = [
            ErrorKind::Timeout,
            ErrorKind::Timeout,
            ErrorKind::Other,
            ErrorKind::DecodeError,
        ];
        // Every rotation and its reverse.
        for start in 0..kinds.len() {
            let rotated: Vec<_> = kinds[start..].iter().chain(&kinds[..start]).copied().collect();
            let forward: LookupError = rotated.iter().copied().map(failure).collect();
            let backward: LookupError = rotated.iter().rev().copied().map(failure).collect();
            assert_eq!(forward.kind(), ErrorKind::Other);
            assert_eq!(backward.kind(), ErrorKind::Other);
        }

        let same = [ErrorKind::DecodeError; 4];
        let lookup: LookupError = same.into_iter().map(failure).collect();
        assert_eq!(lookup.kind(), ErrorKind::DecodeError);
    }

    #[test]
    fn test_display_lists_every_failure() {
        let lookup: LookupError = [
            FetchError::not_found().with_fetcher("viacep"),
            FetchError::other("502 Bad Gateway").with_fetcher("brasilapi"),
        ]
        .into_iter()
        .collect();
        let text = lookup.to_string();
        assert!(text.starts_with("other"));
        assert!(text.contains("viacep: CEP not found"));
        assert!(text.contains("brasilapi: other: 502 Bad Gateway"));
    }
}
