//! Structured error types for rulegrid.
//!
//! The engine itself never fails across its public surface: missing data is
//! always modeled as a no-op. These types exist for the collaborator boundary:
//! `DataSource` implementations report fetch/apply failures through them, and
//! the engine downgrades every failure to a logged skip.

/// All errors that can cross the collaborator boundary.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A page fetch failed (network, serialization, host-side rejection).
    #[error("page fetch: {0}")]
    Fetch(String),

    /// A cell-edit apply call failed outright (as opposed to declining the
    /// edit, which is modeled as `Ok(None)`).
    #[error("edit apply: {0}")]
    EditApply(String),

    /// A value could not be converted at the host boundary.
    #[error("host value conversion: {0}")]
    Conversion(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<serde_json::Error> for GridError {
    fn from(e: serde_json::Error) -> Self {
        Self::Conversion(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
