//! Tests for termination conditions.

use std::time::Duration;

use super::*;

#[derive(Debug)]
struct Never;

impl Termination for Never {
    fn is_terminated(&self, _scope: &SearchScope) -> bool {
        false
    }
}

#[test]
fn test_time_termination() {
    let scope = SearchScope::start(0);

    assert!(!TimeTermination::seconds(3600).is_terminated(&scope));
    assert!(TimeTermination::new(Duration::ZERO).is_terminated(&scope));
}

#[test]
fn test_external_termination_follows_token() {
    let scope = SearchScope::default();
    let token = CancellationToken::new();
    let term = ExternalTermination::new(token.clone());

    assert!(!term.is_terminated(&scope));
    token.clone().cancel();
    assert!(term.is_terminated(&scope));
    assert!(token.is_cancelled());
}

#[test]
fn test_or_termination_any_child() {
    let scope = SearchScope::default();
    let token = CancellationToken::new();
    let term = OrTermination((Never, ExternalTermination::new(token.clone())));

    assert!(!term.is_terminated(&scope));
    token.cancel();
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_or_termination_single() {
    let scope = SearchScope::default();
    assert!(!OrTermination((Never,)).is_terminated(&scope));
}

#[test]
fn test_optional_termination() {
    let scope = SearchScope::default();
    let none: Option<TimeTermination> = None;
    let some = Some(TimeTermination::new(Duration::ZERO));

    assert!(!none.is_terminated(&scope));
    assert!(some.is_terminated(&scope));
}

#[test]
fn test_scope_counts_processed() {
    let mut scope = SearchScope::start(10);
    scope.record_processed();
    scope.record_processed();

    assert_eq!(scope.processed(), 12);
}
