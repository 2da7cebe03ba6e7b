//! Display and lookup helpers over decoded lists.

use crate::CoreError;
use crate::error::Result;
use crate::slack::models::{User, UserGroup};

/// Types with a display name used for ordering.
pub trait SortName {
    /// Key compared by [`sort_by_name`].
    fn sort_name(&self) -> &str;
}

impl SortName for User {
    fn sort_name(&self) -> &str {
        self.first_name()
    }
}

impl SortName for UserGroup {
    fn sort_name(&self) -> &str {
        &self.name
    }
}

/// Stable ascending sort by [`SortName::sort_name`], compared bytewise.
pub fn sort_by_name<T: SortName>(items: &mut [T]) {
    items.sort_by(|a, b| a.sort_name().cmp(b.sort_name()));
}

/// First element matching `predicate`, in the order given.
///
/// `what` describes the search for the error message.
///
/// # Errors
///
/// Returns [`CoreError::NotFound`] if nothing matches.
pub fn find_first<'a, T, P>(items: &'a [T], what: &str, mut predicate: P) -> Result<&'a T>
where
    P: FnMut(&T) -> bool,
{
    items
        .iter()
        .find(|item| predicate(*item))
        .ok_or_else(|| CoreError::NotFound(what.to_string()))
}

/// Owned variant of [`find_first`] that consumes the list.
///
/// # Errors
///
/// Returns [`CoreError::NotFound`] if nothing matches.
pub fn take_first<T, P>(items: Vec<T>, what: &str, mut predicate: P) -> Result<T>
where
    P: FnMut(&T) -> bool,
{
    items
        .into_iter()
        .find(|item| predicate(item))
        .ok_or_else(|| CoreError::NotFound(what.to_string()))
}
