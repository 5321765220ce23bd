//! Resolution options.

use crate::document::DEFAULT_ID_KEY;

/// Knobs for a resolution pass. `Options::default()` matches the plain
/// [`unmarshal`](crate::unmarshal) behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Identifier field compared on sideloaded objects.
    pub id_key: String,
    /// Reject unrecognized directive modes instead of skipping the field.
    pub strict_modes: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            id_key: DEFAULT_ID_KEY.to_owned(),
            strict_modes: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_key(mut self, id_key: impl Into<String>) -> Self {
        self.id_key = id_key.into();
        self
    }

    pub fn with_strict_modes(mut self, strict: bool) -> Self {
        self.strict_modes = strict;
        self
    }
}
