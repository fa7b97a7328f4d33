//! Composite OR termination over tuples.

use super::Termination;
use crate::scope::SearchScope;

/// Combines terminations with OR logic.
///
/// Wraps a tuple of terminations and terminates when any child does.
///
/// # Examples
///
/// ```
/// use buildforge_solver::termination::{
///     CancellationToken, ExternalTermination, OrTermination, TimeTermination,
/// };
///
/// // Stop after 30 seconds or when cancelled
/// let token = CancellationToken::new();
/// let termination = OrTermination((
///     TimeTermination::seconds(30),
///     ExternalTermination::new(token.clone()),
/// ));
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

macro_rules! impl_or_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> Termination for OrTermination<($($T,)+)>
        where
            $($T: Termination,)+
        {
            fn is_terminated(&self, scope: &SearchScope) -> bool {
                $((self.0).$idx.is_terminated(scope))||+
            }
        }
    };
}

impl_or_termination!(0: T0);
impl_or_termination!(0: T0, 1: T1);
impl_or_termination!(0: T0, 1: T1, 2: T2);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3);
