use std::collections::HashMap;
use std::fmt;

use gantt_scene_protocol::HAlign;
use serde::{Deserialize, Serialize};

/// Stable identifier of a table column. Rows refer to their cells by key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnKey(String);

impl ColumnKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub key: ColumnKey,
    pub name: String,
    /// Fixed pixel width. Computed from the content when absent.
    #[serde(default)]
    pub width: Option<f64>,
    /// Whether row indentation applies to this column's cells.
    #[serde(default)]
    pub is_tree_column: bool,
    #[serde(default)]
    pub alignment: HAlign,
}

impl Column {
    pub fn new(key: impl Into<ColumnKey>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            width: None,
            is_tree_column: false,
            alignment: HAlign::Left,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn tree(mut self) -> Self {
        self.is_tree_column = true;
        self
    }

    pub fn aligned(mut self, alignment: HAlign) -> Self {
        self.alignment = alignment;
        self
    }
}

/// One table row: nesting depth plus the display string of each cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub depth: u32,
    pub values: HashMap<ColumnKey, String>,
}

impl Row {
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            values: HashMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<ColumnKey>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn value(&self, key: &ColumnKey) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// A node of the task (or resource) hierarchy shown in a tree table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeItem {
    #[serde(default)]
    pub values: HashMap<ColumnKey, String>,
    #[serde(default)]
    pub children: Vec<TreeItem>,
    /// Collapsed items are listed without their descendants.
    #[serde(default = "expanded_by_default")]
    pub expanded: bool,
}

fn expanded_by_default() -> bool {
    true
}

impl TreeItem {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            children: Vec::new(),
            expanded: true,
        }
    }

    pub fn with_value(mut self, key: impl Into<ColumnKey>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TreeItem>) -> Self {
        self.children = children;
        self
    }

    pub fn collapsed(mut self) -> Self {
        self.expanded = false;
        self
    }
}

impl Default for TreeItem {
    fn default() -> Self {
        Self::new()
    }
}
