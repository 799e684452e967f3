//! Test utilities for host types
//!
//! Provides screen-tree builders and preconfigured simulated devices.

use std::sync::Arc;

use devbridge_core::ScreenNode;

use crate::simulated::{DeviceProfile, SimulatedDevice};

/// Creates a node with optional text and description and no children.
pub fn test_node(text: Option<&str>, description: Option<&str>) -> ScreenNode {
    ScreenNode {
        text: text.map(str::to_string),
        description: description.map(str::to_string),
        class_name: None,
        children: Vec::new(),
    }
}

/// A small mail-inbox-like tree:
///
/// ```text
/// root
/// ├── "Inbox"
/// ├── (desc "Search mail")
/// └── list
///     ├── "Alice" / "Unread"
///     └── "Bob"
/// ```
pub fn inbox_tree() -> ScreenNode {
    test_node(None, None)
        .child(ScreenNode::with_text("Inbox"))
        .child(test_node(None, Some("Search mail")))
        .child(
            test_node(None, None)
                .child(ScreenNode::with_text("Alice").description("Unread"))
                .child(ScreenNode::with_text("Bob")),
        )
}

/// A single chain of `depth` nodes, each labelled with its depth.
pub fn chain_tree(depth: usize) -> ScreenNode {
    let mut node = ScreenNode::with_text(format!("n{}", depth));
    for level in (1..depth).rev() {
        node = ScreenNode::with_text(format!("n{}", level)).child(node);
    }
    node
}

/// A device holding the write-settings grant but not the secure privilege.
pub fn granted_device() -> Arc<SimulatedDevice> {
    Arc::new(SimulatedDevice::new(DeviceProfile::default()))
}

/// A device without any write grants.
pub fn denied_device() -> Arc<SimulatedDevice> {
    Arc::new(SimulatedDevice::new(DeviceProfile {
        write_settings_granted: false,
        ..Default::default()
    }))
}

/// A device holding both the write-settings grant and the secure privilege.
pub fn privileged_device() -> Arc<SimulatedDevice> {
    Arc::new(SimulatedDevice::new(DeviceProfile {
        secure_settings_granted: true,
        ..Default::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbox_tree_shape() {
        let tree = inbox_tree();
        assert_eq!(tree.children.len(), 3);
        assert_eq!(tree.node_count(), 6);
    }

    #[test]
    fn test_chain_tree_depth() {
        let tree = chain_tree(5);
        assert_eq!(tree.depth(), 5);
        assert_eq!(tree.text.as_deref(), Some("n1"));
    }
}
