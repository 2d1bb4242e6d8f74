//! Utility macros shared across the crate.

/// A macro for early returns with an error if a condition is not met.
///
/// Similar to `assert!`, but returns an error instead of panicking.
///
/// # Example
///
/// ```ignore
/// ensure!(header_count <= MAX_HEADER_NUM, ParseError::too_many_headers(MAX_HEADER_NUM));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
