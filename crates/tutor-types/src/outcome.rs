//! `Outcome` -- the success/failure wrapper returned by every tutor operation.
//!
//! Every fallible step of the pipeline produces an `Outcome` instead of
//! bubbling an error through the caller. Callers branch on the tag
//! explicitly; reaching for the wrong side is a programming error and panics.

use serde::Serialize;

use crate::error::TutorError;

/// Exactly one of a success value or a failure detail.
///
/// Serializes externally tagged: `{"ok": ...}` or `{"fail": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome<T, E = TutorError> {
    Ok(T),
    Fail(E),
}

impl<T, E> Outcome<T, E> {
    /// Build a success outcome.
    pub fn ok(value: T) -> Self {
        Outcome::Ok(value)
    }

    /// Build a failure outcome.
    pub fn fail(error: E) -> Self {
        Outcome::Fail(error)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Fail(_))
    }

    /// Borrow the success value.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is a failure.
    #[track_caller]
    pub fn value(&self) -> &T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Fail(_) => panic!("Outcome::value called on a failure"),
        }
    }

    /// Borrow the failure detail.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is a success.
    #[track_caller]
    pub fn error(&self) -> &E {
        match self {
            Outcome::Fail(error) => error,
            Outcome::Ok(_) => panic!("Outcome::error called on a success"),
        }
    }

    /// Consume the outcome and return the success value.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is a failure.
    #[track_caller]
    pub fn into_value(self) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Fail(_) => panic!("Outcome::into_value called on a failure"),
        }
    }

    /// Consume the outcome and return the failure detail.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is a success.
    #[track_caller]
    pub fn into_error(self) -> E {
        match self {
            Outcome::Fail(error) => error,
            Outcome::Ok(_) => panic!("Outcome::into_error called on a success"),
        }
    }

    /// Map the success value, leaving a failure untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Fail(error) => Outcome::Fail(error),
        }
    }

    /// Convert into a std `Result` for `?`-style plumbing at the edges.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Fail(error) => Err(error),
        }
    }

    pub fn as_result(&self) -> Result<&T, &E> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Fail(error) => Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(error) => Outcome::Fail(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_predicates_and_value() {
        let outcome: Outcome<&str, String> = Outcome::ok("مرحبا");
        assert!(outcome.is_success());
        assert!(!outcome.is_failure());
        assert_eq!(*outcome.value(), "مرحبا");
    }

    #[test]
    fn test_fail_predicates_and_error() {
        let outcome: Outcome<String, &str> = Outcome::fail("boom");
        assert!(outcome.is_failure());
        assert!(!outcome.is_success());
        assert_eq!(*outcome.error(), "boom");
    }

    #[test]
    #[should_panic(expected = "called on a failure")]
    fn test_value_on_failure_panics() {
        let outcome: Outcome<String, &str> = Outcome::fail("boom");
        let _ = outcome.value();
    }

    #[test]
    #[should_panic(expected = "called on a success")]
    fn test_error_on_success_panics() {
        let outcome: Outcome<u32, String> = Outcome::ok(7);
        let _ = outcome.into_error();
    }

    #[test]
    fn test_from_result_and_back() {
        let outcome: Outcome<u32, String> = Err::<u32, String>("nope".into()).into();
        assert!(outcome.is_failure());
        assert_eq!(outcome.into_result(), Err("nope".to_string()));
    }

    #[test]
    fn test_map_keeps_failure() {
        let outcome: Outcome<u32, &str> = Outcome::fail("bad");
        assert_eq!(outcome.map(|v| v * 2), Outcome::Fail("bad"));

        let outcome: Outcome<u32, &str> = Outcome::ok(2);
        assert_eq!(outcome.map(|v| v * 2), Outcome::Ok(4));
    }

    #[test]
    fn test_serialize_tagged() {
        let ok: Outcome<&str, &str> = Outcome::ok("hi");
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"ok":"hi"}"#);

        let fail: Outcome<&str, &str> = Outcome::fail("no");
        assert_eq!(serde_json::to_string(&fail).unwrap(), r#"{"fail":"no"}"#);
    }
}
