//! Keys of an [`ArrayContainer`](crate::ArrayContainer).
//!
//! A key is either an integer ([`Key::Index`]) or a name ([`Key::Name`]).
//! Strings that spell a canonical decimal integer are stored as integers, so
//! `"5"` and `5` address the same entry, while `"05"` and `"-0"` stay names.
//!
//! Lookups go through [`AsKey`], which produces a borrowed [`KeyRef`]. `KeyRef`
//! hashes exactly like `Key` and implements [`Equivalent<Key>`], so looking up
//! a `&str` never allocates a `String`.

use std::fmt;
use std::hash::{Hash, Hasher};

use ordermap::Equivalent;

/// An owned container key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    /// Integer key. Auto-assigned keys are always of this kind.
    Index(i64),
    /// Named key. Never renumbered by `shift`, `unshift` or `reverse`.
    Name(String),
}

/// A borrowed view of a [`Key`], used for allocation-free lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRef<'a> {
    Index(i64),
    Name(&'a str),
}

impl Key {
    /// Builds a key from a string, canonicalising integer spellings.
    pub fn parse(s: &str) -> Key {
        match parse_index(s) {
            Some(index) => Key::Index(index),
            None => Key::Name(s.to_owned()),
        }
    }

    #[inline]
    pub fn as_key_ref(&self) -> KeyRef<'_> {
        match self {
            Key::Index(index) => KeyRef::Index(*index),
            Key::Name(name) => KeyRef::Name(name),
        }
    }

    /// Returns `true` for [`Key::Index`].
    #[inline]
    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_))
    }

    #[inline]
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(index) => Some(*index),
            Key::Name(_) => None,
        }
    }

    #[inline]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Index(_) => None,
            Key::Name(name) => Some(name),
        }
    }
}

impl<'a> KeyRef<'a> {
    /// Builds a borrowed key from a string, canonicalising integer spellings.
    pub fn parse(s: &'a str) -> KeyRef<'a> {
        match parse_index(s) {
            Some(index) => KeyRef::Index(index),
            None => KeyRef::Name(s),
        }
    }

    pub fn to_key(self) -> Key {
        match self {
            KeyRef::Index(index) => Key::Index(index),
            KeyRef::Name(name) => Key::Name(name.to_owned()),
        }
    }
}

/// Returns the integer a string denotes if it is written in canonical form:
/// no sign other than a leading `-`, no leading zeros, no whitespace, and in
/// `i64` range.
fn parse_index(s: &str) -> Option<i64> {
    let negative = s.starts_with('-');
    let digits = if negative { &s[1..] } else { s };
    let canonical = match digits.as_bytes() {
        [b'0'] => !negative,
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    };
    if canonical {
        s.parse().ok()
    } else {
        None
    }
}

// `Key` delegates to `KeyRef` so both hash identically; `Equivalent` relies on it.
impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_key_ref().hash(state);
    }
}

impl Hash for KeyRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match *self {
            KeyRef::Index(index) => {
                state.write_u8(0);
                index.hash(state);
            }
            KeyRef::Name(name) => {
                state.write_u8(1);
                name.hash(state);
            }
        }
    }
}

impl Equivalent<Key> for KeyRef<'_> {
    #[inline]
    fn equivalent(&self, key: &Key) -> bool {
        *self == key.as_key_ref()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_key_ref(), f)
    }
}

impl fmt::Display for KeyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRef::Index(index) => write!(f, "{index}"),
            KeyRef::Name(name) => f.write_str(name),
        }
    }
}

// --- Conversions ---

/// Anything that can address an entry of a container.
///
/// Implemented for [`Key`], [`KeyRef`], `str`, `String` and the common integer
/// types. `usize` values beyond `i64::MAX` saturate.
pub trait AsKey {
    fn as_key(&self) -> KeyRef<'_>;
}

impl AsKey for Key {
    #[inline]
    fn as_key(&self) -> KeyRef<'_> {
        self.as_key_ref()
    }
}

impl AsKey for KeyRef<'_> {
    #[inline]
    fn as_key(&self) -> KeyRef<'_> {
        *self
    }
}

impl AsKey for str {
    #[inline]
    fn as_key(&self) -> KeyRef<'_> {
        KeyRef::parse(self)
    }
}

impl AsKey for String {
    #[inline]
    fn as_key(&self) -> KeyRef<'_> {
        KeyRef::parse(self)
    }
}

impl<T: AsKey + ?Sized> AsKey for &T {
    #[inline]
    fn as_key(&self) -> KeyRef<'_> {
        (**self).as_key()
    }
}

macro_rules! impl_integer_key {
    ($($t:ty),*) => {
        $(
            impl AsKey for $t {
                #[inline]
                fn as_key(&self) -> KeyRef<'_> {
                    KeyRef::Index(i64::from(*self))
                }
            }

            impl From<$t> for Key {
                #[inline]
                fn from(index: $t) -> Self {
                    Key::Index(i64::from(index))
                }
            }
        )*
    };
}

impl_integer_key!(i8, i16, i32, i64, u8, u16, u32);

impl AsKey for usize {
    #[inline]
    fn as_key(&self) -> KeyRef<'_> {
        KeyRef::Index(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

impl From<usize> for Key {
    #[inline]
    fn from(index: usize) -> Self {
        Key::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Key {
    #[inline]
    fn from(name: &str) -> Self {
        Key::parse(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        match parse_index(&name) {
            Some(index) => Key::Index(index),
            None => Key::Name(name),
        }
    }
}

impl From<KeyRef<'_>> for Key {
    #[inline]
    fn from(key: KeyRef<'_>) -> Self {
        key.to_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnv::FnvBuildHasher;
    use std::hash::BuildHasher;

    #[test]
    fn test_key_canonical_integer_strings() {
        assert_eq!(Key::from("0"), Key::Index(0));
        assert_eq!(Key::from("17"), Key::Index(17));
        assert_eq!(Key::from("-3"), Key::Index(-3));
        assert_eq!(Key::from(String::from("42")), Key::Index(42));
    }

    #[test]
    fn test_key_non_canonical_strings_stay_names() {
        for s in ["08", "-0", "+1", " 1", "1 ", "", "-", "1.5", "abc", "9223372036854775808"] {
            assert_eq!(Key::from(s), Key::Name(s.to_string()), "{s:?}");
        }
    }

    #[test]
    fn test_key_ref_hash_matches_owned() {
        let hasher = FnvBuildHasher::default();
        let owned = [Key::Index(7), Key::Name("seven".into())];
        for key in &owned {
            assert_eq!(hasher.hash_one(key), hasher.hash_one(key.as_key_ref()));
            assert!(key.as_key_ref().equivalent(key));
        }
        assert!(!KeyRef::Index(7).equivalent(&Key::Name("7x".into())));
    }

    #[test]
    fn test_key_as_key_conversions() {
        assert_eq!(3i32.as_key(), KeyRef::Index(3));
        assert_eq!(3usize.as_key(), KeyRef::Index(3));
        assert_eq!("3".as_key(), KeyRef::Index(3));
        assert_eq!("x".as_key(), KeyRef::Name("x"));
        assert_eq!(String::from("x").as_key(), KeyRef::Name("x"));
        assert_eq!(usize::MAX.as_key(), KeyRef::Index(i64::MAX));
    }

    #[test]
    fn test_key_accessors_and_display() {
        let index = Key::from(4u8);
        let name = Key::from("four");
        assert!(index.is_index());
        assert_eq!(index.as_index(), Some(4));
        assert_eq!(index.as_name(), None);
        assert!(!name.is_index());
        assert_eq!(name.as_name(), Some("four"));
        assert_eq!(index.to_string(), "4");
        assert_eq!(name.to_string(), "four");
        assert_eq!(Key::from(KeyRef::Name("n")), Key::Name("n".into()));
    }
}
