use core::fmt;

/// A stack-allocated, fixed-width Crockford base32 rendering of a field or an
/// identifier.
///
/// The buffer only ever holds ASCII from the Crockford alphabet, so it can be
/// viewed as a `&str` without allocation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Base32Buf<const N: usize> {
    buf: [u8; N],
}

impl<const N: usize> Base32Buf<N> {
    /// Wraps an already-encoded buffer. Callers must only pass alphabet bytes.
    pub(crate) const fn from_ascii(buf: [u8; N]) -> Self {
        Self { buf }
    }

    /// Returns a `&str` view of the base32 encoding.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // SAFETY: `self.buf` holds only valid Crockford Base32 ASCII characters
        unsafe { core::str::from_utf8_unchecked(&self.buf) }
    }

    /// Returns the raw ASCII bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.buf
    }

    /// Consumes the buffer and returns the raw ASCII bytes.
    #[must_use]
    pub const fn into_inner(self) -> [u8; N] {
        self.buf
    }
}

impl<const N: usize> fmt::Display for Base32Buf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> fmt::Debug for Base32Buf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> AsRef<str> for Base32Buf<N> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> PartialEq<str> for Base32Buf<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> PartialEq<&str> for Base32Buf<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<const N: usize> PartialEq<String> for Base32Buf<N> {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<const N: usize> From<Base32Buf<N>> for String {
    fn from(buf: Base32Buf<N>) -> Self {
        buf.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_and_comparisons() {
        let buf = Base32Buf::from_ascii(*b"01ARZ3NDEK");
        assert_eq!(buf.as_str(), "01ARZ3NDEK");
        assert_eq!(buf, "01ARZ3NDEK");
        assert_eq!(buf, String::from("01ARZ3NDEK"));
        assert_eq!(format!("{buf}"), "01ARZ3NDEK");
        assert_eq!(format!("{buf:?}"), "\"01ARZ3NDEK\"");
        assert_eq!(String::from(buf), "01ARZ3NDEK");
        assert_eq!(buf.into_inner(), *b"01ARZ3NDEK");
    }
}
