//! Plaintext identifier wrapper.

use std::fmt;
use zeroize::Zeroizing;

/// A recovered plaintext identifier.
///
/// The backing buffer is wiped on drop and `Debug` never prints the value,
/// so an identifier that ends up in a log line or panic message stays
/// redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Identifier(Zeroizing<String>);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Returns the plaintext. Callers must not log or persist it.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Identifier(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let id = Identifier::new("123456789");
        let rendered = format!("{id:?}");
        assert!(!rendered.contains("123456789"));
        assert_eq!(rendered, "Identifier(<redacted>)");
    }

    #[test]
    fn expose_returns_plaintext() {
        let id = Identifier::from("ID-12345-6789");
        assert_eq!(id.expose(), "ID-12345-6789");
        assert_eq!(id.len(), 13);
        assert!(!id.is_empty());
    }
}
