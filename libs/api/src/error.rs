/// Category of a plugin error. Lets the host decide whether a failure
/// belongs to setup, to a single record, or to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid configuration, permanent, raised at resource setup.
    Config,
    /// Malformed record bytes: fatal to a drained stream, scoped to one item
    /// for a transformer.
    Decode,
    /// Any backend failure during write or query, carried verbatim.
    Storage,
    /// A result the storage contract says cannot happen (existence count
    /// outside {0, 1}, aggregate query without a row).
    Invariant,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Config => f.write_str("config"),
            ErrorKind::Decode => f.write_str("decode"),
            ErrorKind::Storage => f.write_str("storage"),
            ErrorKind::Invariant => f.write_str("invariant"),
        }
    }
}

/// Unified error type for decoders, stores and the resources built on them.
///
/// Carries an `ErrorKind` for categorization and a human-readable message.
/// `From` impls assign the appropriate kind automatically and allow
/// ergonomic `?` in plugin implementations.
#[derive(Clone, PartialEq, Eq)]
pub struct PluginError {
    kind: ErrorKind,
    message: String,
}

impl PluginError {
    /// Configuration error, permanent, fail at startup.
    pub fn config(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Config, message: msg.into() }
    }

    /// Decode error: the record bytes could not be turned into fields.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Decode, message: msg.into() }
    }

    /// Storage error: backend message is passed through untouched.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Storage, message: msg.into() }
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Invariant, message: msg.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Debug for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::fmt::Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PluginError {}

impl From<serde_json::Error> for PluginError {
    fn from(e: serde_json::Error) -> Self { Self { kind: ErrorKind::Decode, message: e.to_string() } }
}

impl From<std::str::Utf8Error> for PluginError {
    fn from(e: std::str::Utf8Error) -> Self { Self { kind: ErrorKind::Decode, message: e.to_string() } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_are_decode_errors() {
        let err: PluginError = serde_json::from_slice::<serde_json::Value>(b"{nope")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn debug_carries_kind_display_does_not() {
        let err = PluginError::invariant("unexpected existence count: 2");
        assert_eq!(format!("{err:?}"), "[invariant] unexpected existence count: 2");
        assert_eq!(err.to_string(), "unexpected existence count: 2");
    }
}
