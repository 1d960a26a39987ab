//! Result type aliases for Box Office.

use crate::BoxOfficeError;

/// A specialized `Result` type for Box Office operations.
pub type BoxOfficeResult<T> = Result<T, BoxOfficeError>;

/// A boxed future returning a `BoxOfficeResult`.
pub type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = BoxOfficeResult<T>> + Send + 'a>>;
