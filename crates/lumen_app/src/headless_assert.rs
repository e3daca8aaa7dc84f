//! Assertion helpers for headless scenarios.

use lumen_layout::node::channel;
use lumen_layout::ViewNode;
use std::collections::HashMap;

/// Named nodes of a presented tree, as seen by assertions.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsSnapshot {
    pub elements: HashMap<String, DiagnosticsElement>,
}

/// Observable state of one named node.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsElement {
    pub kind: &'static str,
    /// Text of the node and its descendants
    pub text: Option<String>,
    /// Animatable attributes keyed by channel name
    pub attrs: HashMap<&'static str, f32>,
}

impl DiagnosticsSnapshot {
    /// Capture every named node of `tree`; the first node with a name wins.
    pub fn capture(tree: &ViewNode) -> Self {
        let mut snapshot = Self::default();
        tree.walk(&mut |_, node| {
            let Some(name) = &node.name else {
                return;
            };
            if node.is_empty() || snapshot.elements.contains_key(name) {
                return;
            }
            let values = node.channels();
            let attrs = channel::NAMES
                .iter()
                .zip(values)
                .map(|(name, value)| (*name, value))
                .collect();
            snapshot.elements.insert(
                name.clone(),
                DiagnosticsElement {
                    kind: node.kind.label(),
                    text: subtree_text(node),
                    attrs,
                },
            );
        });
        snapshot
    }
}

/// Text of every text leaf under `node`, space separated
fn subtree_text(node: &ViewNode) -> Option<String> {
    let mut parts = Vec::new();
    node.walk(&mut |_, n| parts.extend(n.text_content().map(str::to_string)));
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

fn missing(id: &str) -> AssertionResult {
    AssertionResult::Failed {
        code: "missing_element".to_string(),
        message: format!("{id}: element not found"),
    }
}

pub fn evaluate_assert_exists(id: &str, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    if snapshot.elements.contains_key(id) {
        AssertionResult::Passed
    } else {
        missing(id)
    }
}

pub fn evaluate_assert_missing(id: &str, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    if snapshot.elements.contains_key(id) {
        AssertionResult::Failed {
            code: "unexpected_element".to_string(),
            message: format!("{id}: element still present"),
        }
    } else {
        AssertionResult::Passed
    }
}

pub fn evaluate_assert_text_contains(
    id: &str,
    expected: &str,
    snapshot: &DiagnosticsSnapshot,
) -> AssertionResult {
    let Some(element) = snapshot.elements.get(id) else {
        return missing(id);
    };
    let Some(text) = element.text.as_deref() else {
        return AssertionResult::Failed {
            code: "missing_text".to_string(),
            message: format!("{id}: text not available"),
        };
    };
    if text.contains(expected) {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "text_mismatch".to_string(),
            message: format!("{id}: expected substring '{expected}', got '{text}'"),
        }
    }
}

pub fn evaluate_assert_attr(
    id: &str,
    attr: &str,
    expected: f32,
    tolerance: f32,
    snapshot: &DiagnosticsSnapshot,
) -> AssertionResult {
    let Some(element) = snapshot.elements.get(id) else {
        return missing(id);
    };
    let Some(&actual) = element.attrs.get(attr) else {
        return AssertionResult::Failed {
            code: "unknown_attr".to_string(),
            message: format!("{id}: no attribute '{attr}'"),
        };
    };
    if (actual - expected).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "attr_mismatch".to_string(),
            message: format!("{id}: expected {attr} = {expected} (±{tolerance}), got {actual}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_layout::builder::{rect, text, vstack, when};

    fn snapshot() -> DiagnosticsSnapshot {
        DiagnosticsSnapshot::capture(&vstack([
            text("Hello there").named("greeting"),
            rect().opacity(0.5).named("box"),
            when(false, || rect().named("hidden")),
        ]))
    }

    #[test]
    fn test_capture_named_nodes() {
        let snapshot = snapshot();
        assert_eq!(snapshot.elements.len(), 2);
        assert_eq!(snapshot.elements["greeting"].kind, "text");
        assert_eq!(snapshot.elements["box"].attrs["opacity"], 0.5);
    }

    #[test]
    fn test_text_includes_descendants() {
        let snapshot = DiagnosticsSnapshot::capture(&vstack([text("Click"), text("Me")]).named("button"));
        assert_eq!(snapshot.elements["button"].text.as_deref(), Some("Click Me"));
    }

    #[test]
    fn test_exists_and_missing() {
        let snapshot = snapshot();
        assert_eq!(evaluate_assert_exists("box", &snapshot), AssertionResult::Passed);
        assert_eq!(evaluate_assert_missing("hidden", &snapshot), AssertionResult::Passed);
        assert!(matches!(
            evaluate_assert_missing("box", &snapshot),
            AssertionResult::Failed { code, .. } if code == "unexpected_element"
        ));
    }

    #[test]
    fn test_text_and_attr() {
        let snapshot = snapshot();
        assert_eq!(
            evaluate_assert_text_contains("greeting", "there", &snapshot),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_text_contains("box", "x", &snapshot),
            AssertionResult::Failed { code, .. } if code == "missing_text"
        ));
        assert_eq!(
            evaluate_assert_attr("box", "opacity", 0.49, 0.02, &snapshot),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_attr("box", "opacity", 1.0, 0.01, &snapshot),
            AssertionResult::Failed { code, .. } if code == "attr_mismatch"
        ));
        assert!(matches!(
            evaluate_assert_attr("box", "glow", 1.0, 0.01, &snapshot),
            AssertionResult::Failed { code, .. } if code == "unknown_attr"
        ));
    }
}
