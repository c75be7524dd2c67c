use thiserror::Error as ThisError;

use crate::key::Key;

/// Error returned by fallible container operations.
///
/// Boxed so that `Result<T>` stays one word wider than `T`.
#[derive(Debug, ThisError)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        let kind = ErrorKind::InvalidArgument {
            name: name.into(),
            message: message.into(),
        };
        log::debug!("{kind}");
        Error(kind.into())
    }

    pub fn type_mismatch(key: Key, found: impl Into<String>) -> Error {
        let kind = ErrorKind::TypeMismatch {
            key,
            found: found.into(),
        };
        log::debug!("{kind}");
        Error(kind.into())
    }

    pub fn key_overflow(last: i64) -> Error {
        let kind = ErrorKind::KeyOverflow { last };
        log::debug!("{kind}");
        Error(kind.into())
    }
}

#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("value at [{key}] is not numeric: {found}")]
    TypeMismatch { key: Key, found: String },

    /// Appending after the largest integer key `last` would need a key past
    /// `i64::MAX`.
    #[error("appending after integer key {last} would run past i64::MAX")]
    KeyOverflow { last: i64 },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

/// Returns `Err(InvalidArgument)` from the enclosing function unless the
/// condition holds.
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::error::verify_arg(result, stringify!($name), stringify!($expr))?;
    }};
}

#[inline]
pub fn verify_arg(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        Err(Error::invalid_arg(name, format!("{condition} does not hold")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_len(len: usize) -> Result<usize> {
        verify_arg!(len, len > 0);
        Ok(len)
    }

    #[test]
    fn test_error_verify_arg_macro() {
        crate::test_util::init_logging();
        assert_eq!(checked_len(3).unwrap(), 3);
        let err = checked_len(0).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::InvalidArgument {
                name: "len".into(),
                message: "len > 0 does not hold".into(),
            }
        );
        assert_eq!(err.to_string(), "invalid argument len: len > 0 does not hold");
    }

    #[test]
    fn test_error_type_mismatch_message() {
        let err = Error::type_mismatch(Key::from("a"), "non-numeric string");
        assert_eq!(err.to_string(), "value at [a] is not numeric: non-numeric string");
        assert!(matches!(err.into_kind(), ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn test_error_key_overflow_message() {
        crate::test_util::init_logging();
        let err = Error::key_overflow(i64::MAX);
        assert_eq!(err.kind(), &ErrorKind::KeyOverflow { last: i64::MAX });
        assert_eq!(err.to_string(), "appending after integer key 9223372036854775807 would run past i64::MAX");
    }
}
