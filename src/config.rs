use serde::{Deserialize, Serialize};

/// Mapper configuration, held by each [`Mapper`](crate::Mapper) instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Log every generated statement and its bindings at `info` level.
    pub debug: bool,
    /// Fail a fetch when a field cannot be decoded instead of leaving the
    /// field at its default.
    pub strict_fields: bool,
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_strict_fields(mut self, strict_fields: bool) -> Self {
        self.strict_fields = strict_fields;
        self
    }
}
