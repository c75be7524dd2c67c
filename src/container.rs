//! The chainable ordered container.
//!
//! [`ArrayContainer`] wraps a single insertion-ordered map from [`Key`] to `V`
//! and exposes transformation chains over it. Transformations take `&mut self`
//! and return `&mut Self`, so a chain mutates one container in place:
//!
//! ```
//! use array_container::ArrayContainer;
//!
//! let mut numbers = ArrayContainer::from_values(1..=10);
//! numbers
//!     .map(|v| 2i64.pow(*v as u32))
//!     .filter(|v| *v > 70, false)
//!     .reverse(false)
//!     .unshift([5, 9]);
//!
//! let mut lines = Vec::new();
//! numbers.for_each(|value, key| lines.push(format!("{key}|{value}")));
//! assert_eq!(lines, ["0|5", "1|9", "2|1024", "3|512", "4|256", "5|128"]);
//! ```
//!
//! # Atomicity
//! Callback-driven operations (`map`, `filter` and their `try_` forms) run
//! every callback before touching the entries. A callback that fails or panics
//! leaves the container exactly as it was.
//!
//! `order` is the exception: it hands the map itself to the caller's
//! function, so if that function panics the container is left empty.
//!
//! # Key renumbering
//! | Operation | Integer keys | Named keys |
//! |-----------|--------------|------------|
//! | `shift`, `unshift`, `reverse(false)` | renumbered from 0 | kept |
//! | `filter(_, true)`, `chunk(_, false)` | renumbered from 0 | renumbered |
//! | everything else | kept | kept |

use std::fmt;
use std::iter::FromIterator;
use std::mem;
use std::ops::{Index, IndexMut};

use fnv::FnvBuildHasher;
use ordermap::OrderMap;

use crate::error::{Error, Result};
use crate::generator::{Generator, IntoSignal, Signal};
use crate::key::{AsKey, Key};
use crate::number::{Number, ToNumber};
use crate::value::Nullable;
use crate::verify_arg;

/// The backing map of an [`ArrayContainer`]: insertion ordered, FNV hashed.
pub type Entries<V> = OrderMap<Key, V, FnvBuildHasher>;

/// A chainable, insertion-ordered, keyed container.
///
/// Keys are unique; order is the order of insertion except where an operation
/// explicitly re-keys (see the module docs). `Clone` copies the map structure
/// and clones each value, so for `Rc`-like values the clone shares value
/// identities with the original while its entries stay independent.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct ArrayContainer<V> {
    entries: Entries<V>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Renumber {
    /// Renumber integer keys, keep named keys.
    Indices,
    /// Renumber every key.
    All,
}

/// Rebuilds `entries` with integer keys assigned from 0 in iteration order.
fn renumbered<V, I>(entries: I, mode: Renumber) -> Entries<V>
where
    I: IntoIterator<Item = (Key, V)>,
{
    let entries = entries.into_iter();
    let mut out = Entries::with_capacity_and_hasher(entries.size_hint().0, Default::default());
    let mut next = 0i64;
    for (key, value) in entries {
        let key = match (key, mode) {
            (Key::Name(name), Renumber::Indices) => Key::Name(name),
            _ => {
                next += 1;
                Key::Index(next - 1)
            }
        };
        out.insert(key, value);
    }
    log::trace!("renumbered {} entries ({mode:?})", out.len());
    out
}

impl<V> ArrayContainer<V> {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self {
            entries: Entries::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Entries::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Wraps an existing map. Keys are kept as given.
    pub fn with_entries(entries: Entries<V>) -> Self {
        Self { entries }
    }

    /// Creates a container keyed `0..n` from a sequence of values.
    pub fn from_values<I: IntoIterator<Item = V>>(values: I) -> Self {
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Key::from(i), v))
            .collect();
        Self { entries }
    }

    /// Creates a container from `(key, value)` pairs, in order. A repeated key
    /// keeps its first position and takes the last value.
    pub fn from_entries<K, I>(pairs: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = pairs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self { entries }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The backing map.
    #[inline]
    pub fn entries(&self) -> &Entries<V> {
        &self.entries
    }

    pub fn into_entries(self) -> Entries<V> {
        self.entries
    }

    /// Removes every entry.
    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    // --- Transformations ---

    /// Replaces every value with `f(value)`. Keys and order are unchanged.
    pub fn map<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&V) -> V,
    {
        let mapped: Vec<V> = self.entries.values().map(f).collect();
        self.replace_values(mapped);
        self
    }

    /// Like [`map`](Self::map), but stops at the first error and leaves the
    /// container untouched.
    pub fn try_map<F, E>(&mut self, f: F) -> std::result::Result<&mut Self, E>
    where
        F: FnMut(&V) -> std::result::Result<V, E>,
    {
        let mapped = self
            .entries
            .values()
            .map(f)
            .collect::<std::result::Result<Vec<V>, E>>()?;
        self.replace_values(mapped);
        Ok(self)
    }

    fn replace_values(&mut self, mapped: Vec<V>) {
        debug_assert_eq!(mapped.len(), self.entries.len());
        for (slot, value) in self.entries.values_mut().zip(mapped) {
            *slot = value;
        }
    }

    /// Keeps the entries for which `f` returns `true`.
    ///
    /// Surviving entries keep their keys unless `reindex` is set, in which case
    /// every key is renumbered `0..n` in surviving order.
    pub fn filter<F>(&mut self, f: F, reindex: bool) -> &mut Self
    where
        F: FnMut(&V) -> bool,
    {
        let keep: Vec<bool> = self.entries.values().map(f).collect();
        self.retain_mask(keep, reindex);
        self
    }

    /// Like [`filter`](Self::filter), but stops at the first error and leaves
    /// the container untouched.
    pub fn try_filter<F, E>(&mut self, f: F, reindex: bool) -> std::result::Result<&mut Self, E>
    where
        F: FnMut(&V) -> std::result::Result<bool, E>,
    {
        let keep = self
            .entries
            .values()
            .map(f)
            .collect::<std::result::Result<Vec<bool>, E>>()?;
        self.retain_mask(keep, reindex);
        Ok(self)
    }

    fn retain_mask(&mut self, keep: Vec<bool>, reindex: bool) {
        let before = self.entries.len();
        let mut keep = keep.into_iter();
        self.entries.retain(|_, _| keep.next().unwrap_or(false));
        log::trace!("filter kept {} of {before} entries", self.entries.len());
        if reindex {
            self.renumber(Renumber::All);
        }
    }

    /// Replaces the entries with `f(entries)`.
    ///
    /// The container has no ordering policy of its own: `f` receives the whole
    /// map and returns it sorted, shuffled or rebuilt as it sees fit. If `f`
    /// panics the container is left empty.
    pub fn order<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(Entries<V>) -> Entries<V>,
    {
        let entries = mem::take(&mut self.entries);
        self.entries = f(entries);
        log::trace!("reordered {} entries", self.entries.len());
        self
    }

    /// Reverses the order of the entries.
    ///
    /// Without `preserve_keys`, integer keys are renumbered from 0 in the new
    /// order and named keys are kept.
    pub fn reverse(&mut self, preserve_keys: bool) -> &mut Self {
        let reversed = mem::take(&mut self.entries).into_iter().rev();
        self.entries = if preserve_keys {
            reversed.collect()
        } else {
            renumbered(reversed, Renumber::Indices)
        };
        self
    }

    fn renumber(&mut self, mode: Renumber) {
        self.entries = renumbered(mem::take(&mut self.entries), mode);
    }

    // --- Stack / queue ---

    /// The key the next appended value receives: one past the largest integer
    /// key, or 0 when there is none. `None` once `i64::MAX` is taken.
    pub fn next_index(&self) -> Option<i64> {
        match self.entries.keys().filter_map(Key::as_index).max() {
            Some(max) => max.checked_add(1),
            None => Some(0),
        }
    }

    /// Removes and returns the last value.
    pub fn pop(&mut self) -> Option<V> {
        self.entries.pop().map(|(_, value)| value)
    }

    /// Appends values under fresh integer keys, in order.
    ///
    /// # Panics
    /// Panics if the values would need a key past `i64::MAX`. See
    /// [`try_push`](Self::try_push).
    pub fn push<I: IntoIterator<Item = V>>(&mut self, values: I) -> &mut Self {
        match self.try_push(values) {
            Ok(this) => this,
            Err(err) => panic!("push: {err}"),
        }
    }

    /// Appends values under fresh integer keys, or fails with
    /// [`ErrorKind::KeyOverflow`](crate::ErrorKind::KeyOverflow) without
    /// appending any of them when the keys would run past `i64::MAX`.
    pub fn try_push<I: IntoIterator<Item = V>>(&mut self, values: I) -> Result<&mut Self> {
        let values: Vec<V> = values.into_iter().collect();
        let Some(last_offset) = values.len().checked_sub(1) else {
            return Ok(self);
        };
        let largest = || self.entries.keys().filter_map(Key::as_index).max().unwrap_or(-1);
        let first = self.next_index().ok_or_else(|| Error::key_overflow(largest()))?;
        i64::try_from(last_offset)
            .ok()
            .and_then(|offset| first.checked_add(offset))
            .ok_or_else(|| Error::key_overflow(largest()))?;

        self.entries.reserve(values.len());
        for (offset, value) in values.into_iter().enumerate() {
            // Checked above: every offset up to `last_offset` fits.
            self.entries.insert(Key::Index(first + offset as i64), value);
        }
        Ok(self)
    }

    /// Appends a single value under the next integer key.
    ///
    /// # Panics
    /// Panics if `i64::MAX` is already a key.
    pub fn append(&mut self, value: V) -> &mut Self {
        self.push(std::iter::once(value))
    }

    /// Removes and returns the first value, then renumbers the remaining
    /// integer keys from 0. Named keys are kept.
    pub fn shift(&mut self) -> Option<V> {
        let (_, value) = self.entries.remove_index(0)?;
        self.renumber(Renumber::Indices);
        Some(value)
    }

    /// Prepends values in call order, then renumbers every integer key from 0.
    /// Named keys are kept.
    pub fn unshift<I: IntoIterator<Item = V>>(&mut self, values: I) -> &mut Self {
        let existing = mem::take(&mut self.entries);
        // Placeholder keys; `renumbered` assigns the real ones.
        let prepended = values.into_iter().map(|value| (Key::Index(0), value));
        self.entries = renumbered(prepended.chain(existing), Renumber::Indices);
        self
    }

    /// The first entry, without removing it.
    pub fn first(&self) -> Option<(&Key, &V)> {
        self.entries.iter().next()
    }

    /// The last entry, without removing it.
    pub fn last(&self) -> Option<(&Key, &V)> {
        self.entries.iter().next_back()
    }

    // --- Queries ---

    pub fn keys(&self) -> ordermap::map::Keys<'_, Key, V> {
        self.entries.keys()
    }

    pub fn values(&self) -> ordermap::map::Values<'_, Key, V> {
        self.entries.values()
    }

    pub fn iter(&self) -> ordermap::map::Iter<'_, Key, V> {
        self.entries.iter()
    }

    /// Left fold over the values, seeded with `initial`.
    ///
    /// An empty container returns `initial` unchanged.
    pub fn reduce<A, F>(&self, f: F, initial: A) -> A
    where
        F: FnMut(A, &V) -> A,
    {
        self.entries.values().fold(initial, f)
    }

    /// Left fold seeded with the first value. Returns `None` when empty.
    pub fn reduce_first<F>(&self, f: F) -> Option<V>
    where
        V: Clone,
        F: FnMut(V, &V) -> V,
    {
        let mut values = self.entries.values();
        let first = values.next()?.clone();
        Some(values.fold(first, f))
    }

    /// Like [`reduce`](Self::reduce), stopping at the first error.
    pub fn try_reduce<A, E, F>(&self, f: F, initial: A) -> std::result::Result<A, E>
    where
        F: FnMut(A, &V) -> std::result::Result<A, E>,
    {
        self.entries.values().try_fold(initial, f)
    }

    /// Arithmetic sum of the values. An empty container sums to `Int(0)`.
    ///
    /// Values are coerced with [`ToNumber`]; a value that cannot be coerced
    /// fails with [`ErrorKind::TypeMismatch`](crate::ErrorKind::TypeMismatch).
    pub fn sum(&self) -> Result<Number>
    where
        V: ToNumber,
    {
        self.entries
            .iter()
            .try_fold(Number::ZERO, |acc, (key, value)| Ok(acc.add(value.to_number(key)?)))
    }

    /// Arithmetic product of the values. An empty container yields `Int(1)`.
    ///
    /// Same coercion rules as [`sum`](Self::sum).
    pub fn product(&self) -> Result<Number>
    where
        V: ToNumber,
    {
        self.entries
            .iter()
            .try_fold(Number::ONE, |acc, (key, value)| Ok(acc.mul(value.to_number(key)?)))
    }

    /// Splits the entries into consecutive groups of at most `length`.
    ///
    /// Each chunk is keyed `0..k` unless `preserve_keys` is set. Fails with
    /// [`ErrorKind::InvalidArgument`](crate::ErrorKind::InvalidArgument) when
    /// `length` is zero.
    pub fn chunk(&self, length: usize, preserve_keys: bool) -> Result<Vec<Entries<V>>>
    where
        V: Clone,
    {
        verify_arg!(length, length > 0);

        let new_chunk = || Entries::with_capacity_and_hasher(length, Default::default());
        let mut chunks = Vec::with_capacity(self.entries.len().div_ceil(length));
        let mut current = new_chunk();
        for (key, value) in &self.entries {
            let key = if preserve_keys {
                key.clone()
            } else {
                Key::from(current.len())
            };
            current.insert(key, value.clone());
            if current.len() == length {
                chunks.push(mem::replace(&mut current, new_chunk()));
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        log::trace!("split {} entries into {} chunks", self.entries.len(), chunks.len());
        Ok(chunks)
    }

    // --- Indexed access ---

    /// Returns `true` if `key` is present and its value is not null.
    ///
    /// A key mapped to a null value (`Value::Null`, `None`) reports `false`;
    /// use [`contains_key`](Self::contains_key) for plain presence.
    pub fn has<Q: AsKey + ?Sized>(&self, key: &Q) -> bool
    where
        V: Nullable,
    {
        self.get(key).is_some_and(|value| !value.is_null())
    }

    pub fn contains_key<Q: AsKey + ?Sized>(&self, key: &Q) -> bool {
        self.entries.contains_key(&key.as_key())
    }

    pub fn get<Q: AsKey + ?Sized>(&self, key: &Q) -> Option<&V> {
        self.entries.get(&key.as_key())
    }

    pub fn get_mut<Q: AsKey + ?Sized>(&mut self, key: &Q) -> Option<&mut V> {
        self.entries.get_mut(&key.as_key())
    }

    /// Inserts or overwrites the value at `key`.
    ///
    /// An existing key keeps its position; a new key is appended. Returns the
    /// previous value. To append under the next integer key use
    /// [`append`](Self::append).
    pub fn set<K: Into<Key>>(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    /// Removes the entry at `key`, keeping the order of the others. Keys are
    /// not renumbered.
    pub fn remove<Q: AsKey + ?Sized>(&mut self, key: &Q) -> Option<V> {
        self.entries.remove(&key.as_key())
    }

    // --- Iteration ---

    /// Starts a fresh [`Generator`] over the entries.
    pub fn generator(&self) -> Generator<'_, V> {
        Generator::new(self.entries.iter())
    }

    /// Calls `f(value, key)` for each entry in order.
    ///
    /// When `f` returns a stopping signal (an explicit `false`,
    /// [`Signal::Stop`] or `ControlFlow::Break`) the entry is still counted as
    /// visited and no later entry is. Returns the number of visited entries.
    pub fn for_each<F, R>(&self, mut f: F) -> usize
    where
        F: FnMut(&V, &Key) -> R,
        R: IntoSignal,
    {
        let mut generator = self.generator();
        let mut visited = 0;
        while let Some((key, value)) = generator.next() {
            visited += 1;
            if f(value, key).into_signal() == Signal::Stop {
                generator.send(Signal::Stop);
            }
        }
        visited
    }

    /// Like [`for_each`](Self::for_each), but an error from `f` ends the
    /// iteration and is returned.
    pub fn try_for_each<F, R, E>(&self, mut f: F) -> std::result::Result<usize, E>
    where
        F: FnMut(&V, &Key) -> std::result::Result<R, E>,
        R: IntoSignal,
    {
        let mut generator = self.generator();
        let mut visited = 0;
        while let Some((key, value)) = generator.next() {
            visited += 1;
            if f(value, key)?.into_signal() == Signal::Stop {
                generator.send(Signal::Stop);
            }
        }
        Ok(visited)
    }
}

// --- Index Traits ---

impl<V, Q: AsKey + ?Sized> Index<&Q> for ArrayContainer<V> {
    type Output = V;

    fn index(&self, key: &Q) -> &Self::Output {
        self.get(key).expect("no entry found for key")
    }
}

impl<V, Q: AsKey + ?Sized> IndexMut<&Q> for ArrayContainer<V> {
    fn index_mut(&mut self, key: &Q) -> &mut Self::Output {
        self.get_mut(key).expect("no entry found for key")
    }
}

// --- Traits ---

impl<V> Default for ArrayContainer<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A `print_r`-style dump:
///
/// ```text
/// Array
/// (
///     [0] => 1
///     [name] => x
/// )
/// ```
impl<V: fmt::Display> fmt::Display for ArrayContainer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Array")?;
        writeln!(f, "(")?;
        for (key, value) in &self.entries {
            writeln!(f, "    [{key}] => {value}")?;
        }
        writeln!(f, ")")
    }
}

impl<V: fmt::Debug> fmt::Debug for ArrayContainer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<V> From<Entries<V>> for ArrayContainer<V> {
    fn from(entries: Entries<V>) -> Self {
        Self::with_entries(entries)
    }
}

impl<V> From<Vec<V>> for ArrayContainer<V> {
    fn from(values: Vec<V>) -> Self {
        Self::from_values(values)
    }
}

impl<V, const N: usize> From<[V; N]> for ArrayContainer<V> {
    fn from(values: [V; N]) -> Self {
        Self::from_values(values)
    }
}

impl<V> FromIterator<V> for ArrayContainer<V> {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Self::from_values(iter)
    }
}

/// Appends, like [`push`](ArrayContainer::push).
impl<V> Extend<V> for ArrayContainer<V> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.push(iter);
    }
}

impl<V> IntoIterator for ArrayContainer<V> {
    type Item = (Key, V);
    type IntoIter = ordermap::map::IntoIter<Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a ArrayContainer<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = ordermap::map::Iter<'a, Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
