//! Comparators that define the order of elements in a set.
//!
//! A set is generic over its element type only through the comparator it is built with. The
//! comparator must be a total order and must stay consistent for the lifetime of the set; binary
//! set operations additionally assume that both inputs order their elements the same way.

use std::cmp::Ordering;

/// A total order over values of type `T`.
///
/// `Ordering::Equal` means the two values are the same element of a set. Every `Fn(&T, &T) ->
/// Ordering` is a comparator, so closures and plain functions can be used directly.
///
/// # Examples
///
/// ```
/// use rbtree_set::compare::Comparator;
/// use std::cmp::Ordering;
///
/// let by_len = |left: &&str, right: &&str| left.len().cmp(&right.len());
/// assert_eq!(by_len.compare(&"ab", &"c"), Ordering::Greater);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Compares `left` against `right`.
    fn compare(&self, left: &T, right: &T) -> Ordering;
}

impl<T, F> Comparator<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, left: &T, right: &T) -> Ordering {
        self(left, right)
    }
}

/// A zero-sized comparator that delegates to the `Ord` implementation of the element type.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Natural;

impl<T: ?Sized + Ord> Comparator<T> for Natural {
    fn compare(&self, left: &T, right: &T) -> Ordering {
        left.cmp(right)
    }
}

/// A comparator that inverts the order of another comparator.
///
/// # Examples
///
/// ```
/// use rbtree_set::compare::{Comparator, Natural, Reverse};
/// use std::cmp::Ordering;
///
/// assert_eq!(Reverse(Natural).compare(&1, &2), Ordering::Greater);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
    fn compare(&self, left: &T, right: &T) -> Ordering {
        self.0.compare(right, left)
    }
}

/// A comparator for strings that ignores ASCII case.
///
/// Bytes are lowercased before they are compared, so `"Apple"` and `"apple"` are the same
/// element while non-ASCII characters are compared as-is.
///
/// # Examples
///
/// ```
/// use rbtree_set::compare::{CaseInsensitive, Comparator};
/// use std::cmp::Ordering;
///
/// assert_eq!(CaseInsensitive.compare("Apple", "apple"), Ordering::Equal);
/// assert_eq!(CaseInsensitive.compare("apple", "Banana"), Ordering::Less);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CaseInsensitive;

impl<T: ?Sized + AsRef<str>> Comparator<T> for CaseInsensitive {
    fn compare(&self, left: &T, right: &T) -> Ordering {
        let left = left.as_ref().bytes().map(|byte| byte.to_ascii_lowercase());
        let right = right.as_ref().bytes().map(|byte| byte.to_ascii_lowercase());
        left.cmp(right)
    }
}

#[cfg(test)]
mod tests {
    use super::{CaseInsensitive, Comparator, Natural, Reverse};
    use std::cmp::Ordering;

    fn by_last_digit(left: &u32, right: &u32) -> Ordering {
        (left % 10).cmp(&(right % 10))
    }

    #[test]
    fn test_natural() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
        assert_eq!(Natural.compare(&3, &3), Ordering::Equal);
    }

    #[test]
    fn test_fn_item() {
        assert_eq!(by_last_digit.compare(&19, &21), Ordering::Greater);
        assert_eq!(by_last_digit.compare(&13, &3), Ordering::Equal);
    }

    #[test]
    fn test_reverse() {
        assert_eq!(Reverse(Natural).compare(&1, &2), Ordering::Greater);
        assert_eq!(Reverse(by_last_digit).compare(&19, &21), Ordering::Less);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(CaseInsensitive.compare("HeLLo", "hello"), Ordering::Equal);
        assert_eq!(CaseInsensitive.compare("abc", "ABD"), Ordering::Less);
        assert_eq!(CaseInsensitive.compare("abc", "ab"), Ordering::Greater);
        assert_eq!(
            CaseInsensitive.compare(&String::from("Zed"), &String::from("alpha")),
            Ordering::Greater,
        );
    }
}
