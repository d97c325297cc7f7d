//! Defines the [`GroupKey`] and [`Order`] types and the comparator used to
//! order the keys of a grouping result.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::group::Error;

/// The scalar value a page is grouped by. A single grouping result only ever
/// holds keys of one kind, since every key comes from the same field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// A key taken from an integer field (e.g., `Weight`).
    Int(i64),

    /// A key taken from a string field (e.g., `Section`) or produced by
    /// formatting a date.
    Str(String),
}

impl GroupKey {
    /// Returns the key as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            GroupKey::Int(i) => Some(*i),
            GroupKey::Str(_) => None,
        }
    }

    /// Returns the key as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            GroupKey::Int(_) => None,
            GroupKey::Str(s) => Some(s),
        }
    }
}

impl Ord for GroupKey {
    /// Compares integers numerically and strings byte-wise. Mixed kinds never
    /// meet inside one result; they are ordered integers-first so that the
    /// order stays total.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Int(a), GroupKey::Int(b)) => a.cmp(b),
            (GroupKey::Str(a), GroupKey::Str(b)) => a.as_bytes().cmp(b.as_bytes()),
            (GroupKey::Int(_), GroupKey::Str(_)) => Ordering::Less,
            (GroupKey::Str(_), GroupKey::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GroupKey {
    /// Displays the bare value, without any kind annotation.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GroupKey::Int(i) => i.fmt(f),
            GroupKey::Str(s) => s.fmt(f),
        }
    }
}

impl From<i64> for GroupKey {
    fn from(i: i64) -> GroupKey {
        GroupKey::Int(i)
    }
}

impl From<String> for GroupKey {
    fn from(s: String) -> GroupKey {
        GroupKey::Str(s)
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> GroupKey {
        GroupKey::Str(s.to_owned())
    }
}

/// The direction in which groups are emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    /// Applies the direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Order::Asc => ordering,
            Order::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for Order {
    type Err = Error;

    /// Parses `"asc"` or `"desc"`. Anything else, including differently-cased
    /// spellings, is an [`Error::InvalidOrder`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            _ => Err(Error::InvalidOrder(s.to_owned())),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Order::Asc => write!(f, "asc"),
            Order::Desc => write!(f, "desc"),
        }
    }
}

/// Sorts a set of distinct keys in place. Since no two keys compare equal,
/// stability is irrelevant.
pub fn sort_keys(keys: &mut [GroupKey], order: Order) {
    keys.sort_unstable_by(|a, b| order.apply(a.cmp(b)));
}

#[cfg(test)]
mod test {
    use super::*;

    fn ints(values: &[i64]) -> Vec<GroupKey> {
        values.iter().map(|i| GroupKey::Int(*i)).collect()
    }

    fn strs(values: &[&str]) -> Vec<GroupKey> {
        values.iter().map(|s| GroupKey::from(*s)).collect()
    }

    #[test]
    fn test_parse_order() -> Result<(), Error> {
        assert_eq!(Order::Asc, "asc".parse::<Order>()?);
        assert_eq!(Order::Desc, "desc".parse::<Order>()?);
        Ok(())
    }

    #[test]
    fn test_parse_order_rejects_unknown() {
        for input in &["foo", "", "ASC", "Desc", " asc"] {
            match input.parse::<Order>() {
                Err(Error::InvalidOrder(s)) => assert_eq!(*input, s),
                other => panic!("wanted InvalidOrder for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_sort_int_keys() {
        let mut keys = ints(&[3, -1, 10, 2]);
        sort_keys(&mut keys, Order::Asc);
        assert_eq!(ints(&[-1, 2, 3, 10]), keys);

        sort_keys(&mut keys, Order::Desc);
        assert_eq!(ints(&[10, 3, 2, -1]), keys);
    }

    #[test]
    fn test_sort_int_keys_numerically_not_lexically() {
        let mut keys = ints(&[10, 9, 100]);
        sort_keys(&mut keys, Order::Asc);
        assert_eq!(ints(&[9, 10, 100]), keys);
    }

    #[test]
    fn test_sort_string_keys_bytewise() {
        let mut keys = strs(&["b", "B", "a", "ab"]);
        sort_keys(&mut keys, Order::Asc);
        assert_eq!(strs(&["B", "a", "ab", "b"]), keys);
    }

    #[test]
    fn test_key_accessors() {
        assert_eq!(Some(42), GroupKey::Int(42).as_int());
        assert_eq!(None, GroupKey::from("42").as_int());
        assert_eq!(Some("posts"), GroupKey::from("posts").as_str());
        assert_eq!(None, GroupKey::Int(42).as_str());
    }

    #[test]
    fn test_display_key() {
        assert_eq!("42", GroupKey::Int(42).to_string());
        assert_eq!("posts", GroupKey::from("posts").to_string());
    }
}
