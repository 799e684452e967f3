//! # Screen Tree Domain Types
//!
//! An immutable snapshot of the foreground window's accessibility tree, as
//! handed over by the host's window inspector. The screen reader walks it; it
//! never mutates it.
//!
//! JSON fixtures use camelCase field names (`contentDescription` is accepted
//! as an alias for `description`).

use serde::{Deserialize, Serialize};

// ============================================================================
// ScreenNode
// ============================================================================

/// A node in the foreground UI tree.
///
/// Children are owned by the node and ordered left-to-right as displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenNode {
    /// Visible text, if any
    #[serde(default)]
    pub text: Option<String>,

    /// Content description (label read by assistive tech)
    #[serde(default, alias = "contentDescription")]
    pub description: Option<String>,

    /// View class name, informational only
    #[serde(default)]
    pub class_name: Option<String>,

    #[serde(default)]
    pub children: Vec<ScreenNode>,
}

impl ScreenNode {
    /// A leaf node carrying text
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Builder: set the content description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: append a child
    pub fn child(mut self, child: ScreenNode) -> Self {
        self.children.push(child);
        self
    }

    /// Text if present and not blank
    pub fn readable_text(&self) -> Option<&str> {
        non_blank(self.text.as_deref())
    }

    /// Description if present and not blank
    pub fn readable_description(&self) -> Option<&str> {
        non_blank(self.description.as_deref())
    }

    /// Count nodes in this subtree (including self).
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Depth of the deepest leaf (a lone node has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_node_deserialize_minimal() {
        let json = r#"{"text": "Hello"}"#;
        let node: ScreenNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.text.as_deref(), Some("Hello"));
        assert!(node.description.is_none());
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_screen_node_deserialize_nested_with_alias() {
        let json = r#"{
            "className": "android.widget.FrameLayout",
            "children": [
                {"text": "Inbox"},
                {"contentDescription": "Compose", "children": [{"text": " "}]}
            ]
        }"#;
        let node: ScreenNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.class_name.as_deref(), Some("android.widget.FrameLayout"));
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[1].description.as_deref(), Some("Compose"));
        assert_eq!(node.node_count(), 4);
        assert_eq!(node.depth(), 3);
    }

    #[test]
    fn test_screen_node_unknown_fields_ignored() {
        let json = r#"{"text": "OK", "viewIdResourceName": "android:id/button1"}"#;
        let node: ScreenNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.readable_text(), Some("OK"));
    }

    #[test]
    fn test_readable_fields_skip_blank() {
        let node = ScreenNode::with_text("   ").description("\t");
        assert!(node.readable_text().is_none());
        assert!(node.readable_description().is_none());

        let node = ScreenNode::with_text("Play").description("Play button");
        assert_eq!(node.readable_text(), Some("Play"));
        assert_eq!(node.readable_description(), Some("Play button"));
    }

    #[test]
    fn test_builder_keeps_child_order() {
        let node = ScreenNode::default()
            .child(ScreenNode::with_text("first"))
            .child(ScreenNode::with_text("second"));
        assert_eq!(node.children[0].text.as_deref(), Some("first"));
        assert_eq!(node.children[1].text.as_deref(), Some("second"));
    }
}
