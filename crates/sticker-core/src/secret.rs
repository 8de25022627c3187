//! Zeroizing holder for pack keys and session passwords

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A wrapper that wipes its contents when dropped
///
/// Pack keys, the keys derived from them and the session password only live
/// for the duration of one upload call; wrapping them keeps the bytes from
/// lingering in freed memory and out of `Debug` output.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct Secret<T: Zeroize>(#[zeroize(drop)] T);

impl<T> Secret<T>
where
    T: Zeroize,
{
    /// Wrap a value
    pub fn new(value: T) -> Self {
        Self(value)
    }
}

impl<T> AsRef<T> for Secret<T>
where
    T: Zeroize,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T> Deref for Secret<T>
where
    T: Zeroize,
{
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for Secret<T>
where
    T: Zeroize,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(***)")
    }
}
