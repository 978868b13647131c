use serde::{Deserialize, Serialize};

/// Host-supplied description of a grid column.
///
/// The engine treats columns as opaque beyond identity and title; widths and
/// formatting belong to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Stable column identifier.
    pub id: String,
    /// Title shown in the column header and in edit-confirmation messages.
    pub title: String,
    /// Preferred width in pixels, if the host pins one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub width: Option<f32>,
}

impl ColumnDescriptor {
    /// Create a column with just an id and a title.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            width: None,
        }
    }
}
