//! # Array Container
//!
//! A chainable, insertion-ordered, keyed container for expressive data
//! transformations.
//!
//! [`ArrayContainer`] wraps one ordered map from [`Key`] (integer or name) to a
//! value and offers mapping, filtering, reduction, stack and queue operations,
//! reordering, chunking, indexed access and a stoppable iteration protocol.
//!
//! ## Key Features
//!
//! * **Fluent chains:** transformations take `&mut self` and return `&mut Self`.
//! * **Key preservation:** `filter`, `reverse` and `chunk` keep or renumber keys
//!   on request; `shift` and `unshift` renumber integer keys and keep names.
//! * **Two-way iteration:** a [`Generator`] yields entries lazily and accepts a
//!   [`Signal`] from its consumer, which is how `for_each` stops early.
//! * **Loose values:** [`Value`] mixes integers, floats, strings, booleans and
//!   nulls; `sum` and `product` coerce them and report [`ErrorKind::TypeMismatch`]
//!   for values that are not numeric.
//!
//! ## Examples
//!
//! ### Stack and queue
//!
//! ```rust
//! use array_container::{ArrayContainer, Number};
//!
//! let mut numbers = ArrayContainer::from_values([10, 2, 3, 6]);
//! assert_eq!(numbers.sum().unwrap(), Number::Int(21));
//!
//! assert_eq!(numbers.shift(), Some(10));
//! numbers.unshift([12, 21, 5]);
//! assert_eq!(numbers[&0], 12);
//! assert_eq!(numbers.sum().unwrap(), Number::Int(49));
//! ```
//!
//! ### Early exit
//!
//! ```rust
//! use array_container::ArrayContainer;
//!
//! let letters = ArrayContainer::from_values(['a', 'b', 'c', 'd']);
//! let mut seen = String::new();
//! let visited = letters.for_each(|letter, _| {
//!     seen.push(*letter);
//!     *letter != 'b'
//! });
//! assert_eq!((visited, seen.as_str()), (2, "ab"));
//! ```
//!
//! ### Mixed keys
//!
//! ```rust
//! use array_container::{ArrayContainer, Value};
//!
//! let mut row: ArrayContainer<Value> = ArrayContainer::new();
//! row.set("id", Value::Int(7));
//! row.set("note", Value::Null);
//! row.append(Value::from("first"));
//!
//! assert!(row.has("id"));
//! assert!(!row.has("note")); // present, but null
//! assert_eq!(row.get("0"), Some(&Value::from("first")));
//! ```

// --- Module Declarations ---

pub mod container;
pub mod error;
pub mod generator;
pub mod key;
pub mod number;
mod serde_support;
pub mod value;

#[cfg(test)]
mod test_util {
    /// Routes `log` output to the test harness; set `RUST_LOG` to see it.
    pub(crate) fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }
}

// --- Re-exports ---

pub use container::{ArrayContainer, Entries};
pub use error::{Error, ErrorKind, Result};
pub use generator::{Generator, IntoSignal, Signal};
pub use key::{AsKey, Key, KeyRef};
pub use number::{Number, ToNumber};
pub use value::{Nullable, Value};
