/// A data row the engine can cache and page over.
///
/// Identity is the only field the engine depends on; everything else is
/// opaque payload resolved by the host's cell-content callbacks. Identity
/// feeds the selection id map and the anchor for cursor pagination, so it
/// must be stable across fetches.
pub trait GridRow: Clone {
    /// The row's stable identifier, if one can be extracted.
    fn identity(&self) -> Option<&str>;
}

/// JSON rows (the wasm host path) resolve `_id`, then `id`.
impl GridRow for serde_json::Value {
    fn identity(&self) -> Option<&str> {
        self.get("_id")
            .or_else(|| self.get("id"))
            .and_then(serde_json::Value::as_str)
    }
}
