//! Node matching between two view trees
//!
//! Matching runs in two passes:
//!
//! 1. Geometry tags. Each tree's tagged nodes are collected into a
//!    [`GeometryNamespace`] built fresh for this diff. Nodes carrying the same
//!    tag in both trees match wherever they sit; differing paths are reported
//!    as a move.
//! 2. Structure. Below every matched pair, children at the same index match
//!    when both are untagged, neither is a placeholder, and their kinds agree.
//!
//! A tag declared twice in one tree resolves to the last node in pre-order;
//! earlier duplicates take part in neither pass and surface as insertions or
//! removals. All conditions are symmetric, so swapping the trees swaps the
//! result.

use crate::node::{channel, GeometryTag, ViewNode};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::fmt;

/// Child indices from the root to a node
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(SmallVec<[usize; 8]>);

impl NodePath {
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.0.push(index);
        path
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.0.is_empty() {
            return None;
        }
        let mut path = self.clone();
        path.0.pop();
        Some(path)
    }

    /// Index within the parent; `None` for the root
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for i in &self.0 {
            write!(f, "/{}", i)?;
        }
        Ok(())
    }
}

impl ViewNode {
    pub fn at(&self, path: &NodePath) -> Option<&ViewNode> {
        path.indices()
            .try_fold(self, |node, i| node.children.get(i))
    }

    pub fn at_mut(&mut self, path: &NodePath) -> Option<&mut ViewNode> {
        path.indices()
            .try_fold(self, |node, i| node.children.get_mut(i))
    }

    /// Pre-order walk over every node with its path
    pub fn walk(&self, f: &mut impl FnMut(&NodePath, &ViewNode)) {
        fn go(node: &ViewNode, path: NodePath, f: &mut impl FnMut(&NodePath, &ViewNode)) {
            f(&path, node);
            for (i, child) in node.children.iter().enumerate() {
                go(child, path.child(i), f);
            }
        }
        go(self, NodePath::root(), f);
    }
}

/// Tag-to-node map for one tree, scoped to a single diff
#[derive(Debug, Default)]
pub struct GeometryNamespace {
    entries: FxHashMap<GeometryTag, NodePath>,
    shadowed: FxHashSet<NodePath>,
}

impl GeometryNamespace {
    pub fn collect(root: &ViewNode) -> Self {
        let mut ns = Self::default();
        root.walk(&mut |path, node| {
            if node.is_empty() {
                return;
            }
            let Some(tag) = &node.tag else {
                return;
            };
            if let Some(previous) = ns.entries.insert(tag.clone(), path.clone()) {
                tracing::warn!(
                    namespace = tag.namespace.0,
                    id = %tag.id,
                    ignored = %previous,
                    winner = %path,
                    "duplicate geometry tag, last declaration wins"
                );
                ns.shadowed.insert(previous);
            }
        });
        ns
    }

    pub fn get(&self, tag: &GeometryTag) -> Option<&NodePath> {
        self.entries.get(tag)
    }

    /// Whether the node at `path` lost its tag to a later duplicate
    pub fn is_shadowed(&self, path: &NodePath) -> bool {
        self.shadowed.contains(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GeometryTag, &NodePath)> {
        self.entries.iter()
    }
}

/// How a pair was matched
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    Positional,
    Tagged { moved: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodePair {
    pub old: NodePath,
    pub new: NodePath,
    pub kind: MatchKind,
}

impl NodePair {
    pub fn is_move(&self) -> bool {
        matches!(self.kind, MatchKind::Tagged { moved: true })
    }
}

/// Changed animatable channels of one matched pair
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeChange {
    pub old: NodePath,
    pub new: NodePath,
    pub channels: SmallVec<[usize; 8]>,
}

impl AttributeChange {
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.channels.iter().map(|&c| channel::NAMES[c])
    }
}

/// Result of matching an old tree against a new one
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeMatch {
    /// Matched pairs in new-tree pre-order
    pub pairs: Vec<NodePair>,
    /// Roots of subtrees only present in the new tree
    pub insertions: Vec<NodePath>,
    /// Roots of subtrees only present in the old tree
    pub removals: Vec<NodePath>,
}

impl TreeMatch {
    pub fn moves(&self) -> impl Iterator<Item = &NodePair> {
        self.pairs.iter().filter(|p| p.is_move())
    }

    pub fn pair_for_old(&self, old: &NodePath) -> Option<&NodePair> {
        self.pairs.iter().find(|p| &p.old == old)
    }

    pub fn pair_for_new(&self, new: &NodePath) -> Option<&NodePair> {
        self.pairs.iter().find(|p| &p.new == new)
    }

    /// The same match seen from the other side
    pub fn swapped(&self) -> TreeMatch {
        let mut pairs: Vec<NodePair> = self
            .pairs
            .iter()
            .map(|p| NodePair {
                old: p.new.clone(),
                new: p.old.clone(),
                kind: p.kind,
            })
            .collect();
        pairs.sort_by(|a, b| a.new.cmp(&b.new));
        TreeMatch {
            pairs,
            insertions: self.removals.clone(),
            removals: self.insertions.clone(),
        }
    }

    /// Channels that differ per matched pair
    pub fn changes(&self, old: &ViewNode, new: &ViewNode) -> Vec<AttributeChange> {
        self.pairs
            .iter()
            .filter_map(|pair| {
                let channels = changed_channels(old.at(&pair.old)?, new.at(&pair.new)?);
                (!channels.is_empty()).then(|| AttributeChange {
                    old: pair.old.clone(),
                    new: pair.new.clone(),
                    channels,
                })
            })
            .collect()
    }
}

/// Indices of channels whose values differ
pub fn changed_channels(old: &ViewNode, new: &ViewNode) -> SmallVec<[usize; 8]> {
    let (a, b) = (old.channels(), new.channels());
    (0..channel::COUNT).filter(|&c| a[c] != b[c]).collect()
}

fn positional_candidate(node: &ViewNode) -> bool {
    !node.is_empty() && node.tag.is_none()
}

/// Match `old` against `new`
pub fn match_trees(old: &ViewNode, new: &ViewNode) -> TreeMatch {
    let old_ns = GeometryNamespace::collect(old);
    let new_ns = GeometryNamespace::collect(new);

    let mut pairs = Vec::new();
    for (tag, old_path) in old_ns.iter() {
        if let Some(new_path) = new_ns.get(tag) {
            pairs.push(NodePair {
                old: old_path.clone(),
                new: new_path.clone(),
                kind: MatchKind::Tagged {
                    moved: old_path != new_path,
                },
            });
        }
    }

    let root = NodePath::root();
    if positional_candidate(old) && positional_candidate(new) && old.kind.same_kind(&new.kind) {
        pairs.push(NodePair {
            old: root.clone(),
            new: root,
            kind: MatchKind::Positional,
        });
    }

    // Structural pass below every matched pair
    let mut next = 0;
    while next < pairs.len() {
        let (old_path, new_path) = (pairs[next].old.clone(), pairs[next].new.clone());
        next += 1;
        let (Some(o), Some(n)) = (old.at(&old_path), new.at(&new_path)) else {
            continue;
        };
        for (i, (oc, nc)) in o.children.iter().zip(&n.children).enumerate() {
            if positional_candidate(oc) && positional_candidate(nc) && oc.kind.same_kind(&nc.kind) {
                pairs.push(NodePair {
                    old: old_path.child(i),
                    new: new_path.child(i),
                    kind: MatchKind::Positional,
                });
            }
        }
    }
    pairs.sort_by(|a, b| a.new.cmp(&b.new));

    let matched_old: FxHashSet<&NodePath> = pairs.iter().map(|p| &p.old).collect();
    let matched_new: FxHashSet<&NodePath> = pairs.iter().map(|p| &p.new).collect();
    let removals = unmatched_roots(old, &matched_old);
    let insertions = unmatched_roots(new, &matched_new);

    tracing::trace!(
        pairs = pairs.len(),
        insertions = insertions.len(),
        removals = removals.len(),
        "trees matched"
    );

    TreeMatch {
        pairs,
        insertions,
        removals,
    }
}

/// Unmatched visible nodes whose parent is matched, or an unmatched root
fn unmatched_roots(tree: &ViewNode, matched: &FxHashSet<&NodePath>) -> Vec<NodePath> {
    let mut roots = Vec::new();
    tree.walk(&mut |path, node| {
        if node.is_empty() || matched.contains(path) {
            return;
        }
        let parent_matched = match path.parent() {
            Some(parent) => matched.contains(&parent),
            None => true,
        };
        if parent_matched {
            roots.push(path.clone());
        }
    });
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{hstack, rect, text, vstack, when, zstack};
    use crate::node::Namespace;

    const NS: Namespace = Namespace("test");

    fn path(indices: &[usize]) -> NodePath {
        NodePath(indices.iter().copied().collect())
    }

    fn toggled(at_top: bool) -> ViewNode {
        vstack([
            when(at_top, || rect().matched_geometry("rectangle", NS)),
            text("spacer"),
            when(!at_top, || rect().matched_geometry("rectangle", NS)),
        ])
    }

    #[test]
    fn test_tagged_move_is_single_pair() {
        let old = toggled(true);
        let new = toggled(false);
        let m = match_trees(&old, &new);

        let moves: Vec<_> = m.moves().collect();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].old, path(&[0]));
        assert_eq!(moves[0].new, path(&[2]));
        assert!(m.insertions.is_empty());
        assert!(m.removals.is_empty());
    }

    #[test]
    fn test_matching_is_symmetric() {
        let old = toggled(true);
        let new = toggled(false);
        assert_eq!(match_trees(&new, &old), match_trees(&old, &new).swapped());
    }

    #[test]
    fn test_conditional_insert_and_remove() {
        let old = vstack([text("a"), when(false, rect), text("b")]);
        let new = vstack([text("a"), when(true, rect), text("b")]);

        let m = match_trees(&old, &new);
        assert_eq!(m.insertions, vec![path(&[1])]);
        assert!(m.removals.is_empty());
        assert_eq!(m.pairs.len(), 3);

        let back = match_trees(&new, &old);
        assert_eq!(back.removals, vec![path(&[1])]);
    }

    #[test]
    fn test_kind_change_replaces_subtree() {
        let old = vstack([hstack([text("x")])]);
        let new = vstack([zstack([text("x")])]);
        let m = match_trees(&old, &new);
        assert_eq!(m.insertions, vec![path(&[0])]);
        assert_eq!(m.removals, vec![path(&[0])]);
    }

    #[test]
    fn test_tagged_never_matches_positionally() {
        let old = vstack([rect().matched_geometry("a", NS)]);
        let new = vstack([rect().matched_geometry("b", NS)]);
        let m = match_trees(&old, &new);
        assert_eq!(m.insertions, vec![path(&[0])]);
        assert_eq!(m.removals, vec![path(&[0])]);
    }

    #[test]
    fn test_duplicate_tag_last_wins() {
        let old = vstack([rect().matched_geometry("square", NS)]);
        let new = vstack([
            rect().matched_geometry("square", NS).named("first"),
            rect().matched_geometry("square", NS).named("second"),
        ]);

        let ns = GeometryNamespace::collect(&new);
        assert_eq!(ns.len(), 1);
        assert!(ns.is_shadowed(&path(&[0])));

        let m = match_trees(&old, &new);
        assert_eq!(m.moves().count(), 1);
        assert_eq!(m.pair_for_old(&path(&[0])).unwrap().new, path(&[1]));
        assert_eq!(m.insertions, vec![path(&[0])]);
    }

    #[test]
    fn test_namespaces_are_distinct() {
        let old = vstack([rect().matched_geometry("x", Namespace("a"))]);
        let new = vstack([text("gap"), rect().matched_geometry("x", Namespace("b"))]);
        let m = match_trees(&old, &new);
        assert_eq!(m.moves().count(), 0);
    }

    #[test]
    fn test_changes_report_channels() {
        let old = vstack([rect().opacity(0.5)]);
        let new = vstack([rect().rotation(90.0)]);
        let m = match_trees(&old, &new);
        let changes = m.changes(&old, &new);
        assert_eq!(changes.len(), 1);
        let names: Vec<_> = changes[0].names().collect();
        assert_eq!(names, vec!["opacity", "rotation"]);
    }

    #[test]
    fn test_path_display_and_lookup() {
        let tree = vstack([hstack([text("a"), text("b")])]);
        let p = path(&[0, 1]);
        assert_eq!(p.to_string(), "/0/1");
        assert_eq!(tree.at(&p).unwrap().text_content(), Some("b"));
        assert!(tree.at(&path(&[3])).is_none());
        assert_eq!(p.parent(), Some(path(&[0])));
        assert_eq!(NodePath::root().to_string(), "/");
    }

    #[test]
    fn test_wide_stack_keeps_distinct_paths() {
        let width = usize::from(u16::MAX) + 2;
        let old = vstack((0..width).map(|_| rect()));
        let new = vstack((0..width).map(|i| if i == width - 1 { rect().opacity(0.5) } else { rect() }));
        let m = match_trees(&old, &new);

        assert_eq!(m.pairs.len(), width + 1);
        assert_eq!(m.pairs.iter().filter(|p| p.new == path(&[0])).count(), 1);
        let last = path(&[width - 1]);
        assert!(m.pair_for_new(&last).is_some());

        let changes = m.changes(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].new, last);
        assert_eq!(changes[0].names().collect::<Vec<_>>(), ["opacity"]);
    }
}
