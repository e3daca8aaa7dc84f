//! Renderer seam
//!
//! The runtime never paints. It hands every presented [`Frame`] to a
//! [`Renderer`], which may rasterize it, record it, or print it.

use lumen_layout::{Frame, NodeKind, ViewNode};
use std::fmt::Write as _;
use std::io::Write;

pub trait Renderer {
    fn render(&mut self, frame: &Frame);
}

/// Keeps every frame in memory
#[derive(Debug, Default)]
pub struct SnapshotRenderer {
    frames: Vec<Frame>,
}

impl SnapshotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Hand over the recorded frames and start again
    pub fn take(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }
}

impl Renderer for SnapshotRenderer {
    fn render(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

/// Prints each frame as an indented outline
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, frame: &Frame) {
        let text = format!("t={:.1}ms\n{}", frame.time_ms, describe(&frame.tree));
        if let Err(err) = self.out.write_all(text.as_bytes()) {
            tracing::warn!(%err, "failed to write frame");
        }
    }
}

/// Outline of a tree, one node per line; placeholders are skipped
pub fn describe(tree: &ViewNode) -> String {
    let mut out = String::new();
    describe_node(tree, 0, &mut out);
    out
}

fn describe_node(node: &ViewNode, depth: usize, out: &mut String) {
    if node.is_empty() {
        return;
    }

    let _ = write!(out, "{:indent$}", "", indent = depth * 2);
    match &node.kind {
        NodeKind::Shape { shape } => {
            let _ = write!(out, "{:?}", shape);
        }
        NodeKind::Text { content, .. } => {
            let _ = write!(out, "Text {:?}", content);
        }
        NodeKind::Stack { axis } => {
            let _ = write!(out, "{:?}Stack", axis);
        }
        NodeKind::Spacer => out.push_str("Spacer"),
        NodeKind::Empty => {}
    }
    if let Some(name) = &node.name {
        let _ = write!(out, " #{}", name);
    }
    if let Some(tag) = &node.tag {
        let _ = write!(out, " @{}/{}", tag.namespace.0, tag.id);
    }

    let f = node.frame;
    let _ = write!(
        out,
        " [{:.1}, {:.1}, {:.1}x{:.1}]",
        f.x(),
        f.y(),
        f.width(),
        f.height()
    );

    let s = &node.style;
    if s.opacity != 1.0 {
        let _ = write!(out, " opacity={:.3}", s.opacity);
    }
    if s.scale != 1.0 {
        let _ = write!(out, " scale={:.3}", s.scale);
    }
    if s.rotation != 0.0 {
        let _ = write!(out, " rotation={:.1}", s.rotation);
    }
    if s.offset.x != 0.0 || s.offset.y != 0.0 {
        let _ = write!(out, " offset=({:.1}, {:.1})", s.offset.x, s.offset.y);
    }
    out.push('\n');

    for child in &node.children {
        describe_node(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_layout::builder::{rect, text, vstack, when};

    #[test]
    fn test_describe_outline() {
        let tree = vstack([
            text("Hello").named("greeting"),
            when(false, rect),
            rect().opacity(0.5).rotation(90.0),
        ]);
        let text = describe(&tree);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("VerticalStack"));
        assert!(lines[1].starts_with("  Text \"Hello\" #greeting"));
        assert!(lines[2].contains("opacity=0.500"));
        assert!(lines[2].contains("rotation=90.0"));
    }

    #[test]
    fn test_text_renderer_writes_frames() {
        let mut renderer = TextRenderer::new(Vec::new());
        renderer.render(&Frame {
            time_ms: 16.0,
            tree: rect().named("box"),
        });
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.starts_with("t=16.0ms\nRectangle #box"));
    }

    #[test]
    fn test_snapshot_renderer_records() {
        let mut renderer = SnapshotRenderer::new();
        for i in 0..3 {
            renderer.render(&Frame {
                time_ms: i as f32,
                tree: rect(),
            });
        }
        assert_eq!(renderer.len(), 3);
        assert_eq!(renderer.last().unwrap().time_ms, 2.0);
        assert_eq!(renderer.take().len(), 3);
        assert!(renderer.is_empty());
    }
}
