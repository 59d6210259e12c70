//! Horizontal tidy-tree layout.
//!
//! The root sits on the left and each depth forms a column to its right.
//! Siblings stack vertically and every parent is centred on its children.
//! Text width is estimated from character classes since no font is loaded.

use super::tree::MindNode;

pub const SPACING_HORIZONTAL: f64 = 80.0;
pub const SPACING_VERTICAL: f64 = 5.0;
pub const PADDING_X: f64 = 8.0;
pub const LINE_HEIGHT: f64 = 20.0;
pub const FONT_SIZE: f64 = 16.0;
/// Longest node text, in pixels, before it wraps onto another line.
pub const MAX_TEXT_WIDTH: f64 = 320.0;

/// d3 `schemeCategory10`, assigned per top-level branch.
pub const BRANCH_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Axis-aligned rectangle in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn padded(self, padding: f64) -> Self {
        Self {
            x: self.x - padding,
            y: self.y - padding,
            width: 2.0f64.mul_add(padding, self.width),
            height: 2.0f64.mul_add(padding, self.height),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    /// HTML fragment from the tree
    pub content: String,
    /// Plain text used for measuring and raster output
    pub text: String,
    /// `text` broken into rendered lines
    pub lines: Vec<String>,
    pub depth: usize,
    pub parent: Option<usize>,
    pub has_children: bool,
    pub color: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PositionedNode {
    /// Left end of the underline links attach to.
    pub fn anchor_in(&self) -> (f64, f64) {
        (self.x, self.y + self.height)
    }

    /// Right end of the underline.
    pub fn anchor_out(&self) -> (f64, f64) {
        (self.x + self.width, self.y + self.height)
    }
}

/// Positioned nodes in depth-first order; index 0 is the root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
}

impl Layout {
    /// Bounding box of every node, or `None` for an empty layout.
    pub fn bbox(&self) -> Option<Rect> {
        let first = self.nodes.first()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x + first.width, first.y + first.height);
        for node in &self.nodes[1..] {
            min_x = min_x.min(node.x);
            min_y = min_y.min(node.y);
            max_x = max_x.max(node.x + node.width);
            max_y = max_y.max(node.y + node.height);
        }
        Some(Rect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }

    /// `(parent, child)` index pairs for every branch link.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.parent.map(|parent| (parent, index)))
    }
}

/// Estimated rendered width of `text` in pixels.
pub fn text_width(text: &str) -> f64 {
    text.chars().map(char_width).sum()
}

fn char_width(ch: char) -> f64 {
    if is_wide(ch) {
        FONT_SIZE
    } else if ch.is_ascii_uppercase() || ch == 'm' || ch == 'w' {
        FONT_SIZE * 0.7
    } else {
        FONT_SIZE * 0.55
    }
}

/// CJK ideographs, kana, hangul and full-width forms render one em wide.
fn is_wide(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA000..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x1F300..=0x1F64F
            | 0x20000..=0x2FFFD
    )
}

/// Breaks `text` into lines no wider than [`MAX_TEXT_WIDTH`].
///
/// Lines break at the last space that fits; a run without spaces breaks
/// between characters. Empty text is one empty line.
pub fn wrap_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0.0;
    for ch in text.chars() {
        let advance = char_width(ch);
        if width + advance > MAX_TEXT_WIDTH && !line.is_empty() {
            let carry = match line.rfind(' ') {
                Some(space) if space > 0 => {
                    let tail = line[space + 1..].to_string();
                    line.truncate(space);
                    tail
                }
                _ => String::new(),
            };
            lines.push(line.trim_end().to_string());
            line = carry;
            width = text_width(&line);
            if width + advance > MAX_TEXT_WIDTH {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }
            if ch == ' ' && line.is_empty() {
                continue;
            }
        }
        line.push(ch);
        width += advance;
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Box size for the wrapped lines, padding included.
fn node_size(lines: &[String]) -> (f64, f64) {
    let widest = lines
        .iter()
        .map(|line| text_width(line))
        .fold(0.0, f64::max);
    (
        2.0f64.mul_add(PADDING_X, widest),
        lines.len().max(1) as f64 * LINE_HEIGHT,
    )
}

struct Builder {
    nodes: Vec<PositionedNode>,
}

impl Builder {
    fn add(
        &mut self,
        node: &MindNode,
        depth: usize,
        parent: Option<usize>,
        color: &'static str,
        x: f64,
    ) -> usize {
        let text = node.plain_text();
        let lines = wrap_lines(&text);
        let (width, height) = node_size(&lines);
        let index = self.nodes.len();
        self.nodes.push(PositionedNode {
            content: node.content.clone(),
            text,
            lines,
            depth,
            parent,
            has_children: !node.children.is_empty(),
            color,
            x,
            y: 0.0,
            width,
            height,
        });
        let child_x = x + width + SPACING_HORIZONTAL;
        for (branch, child) in node.children.iter().enumerate() {
            let child_color = if depth == 0 {
                BRANCH_COLORS[(branch + 1) % BRANCH_COLORS.len()]
            } else {
                color
            };
            self.add(child, depth + 1, Some(index), child_color, child_x);
        }
        index
    }

    fn children_of(&self, index: usize) -> Vec<usize> {
        (index + 1..self.nodes.len())
            .filter(|&candidate| self.nodes[candidate].parent == Some(index))
            .collect()
    }

    /// Height of the subtree rooted at `index`.
    fn extent(&self, index: usize) -> f64 {
        let children = self.children_of(index);
        if children.is_empty() {
            return self.nodes[index].height;
        }
        let stacked: f64 = children.iter().map(|&child| self.extent(child)).sum::<f64>()
            + SPACING_VERTICAL * (children.len() - 1) as f64;
        stacked.max(self.nodes[index].height)
    }

    /// Places the subtree at `index` inside the band starting at `top`.
    fn place(&mut self, index: usize, top: f64) {
        let extent = self.extent(index);
        let height = self.nodes[index].height;
        self.nodes[index].y = top + (extent - height) / 2.0;

        let children = self.children_of(index);
        let stacked: f64 = children.iter().map(|&child| self.extent(child)).sum::<f64>()
            + SPACING_VERTICAL * children.len().saturating_sub(1) as f64;
        let mut cursor = top + (extent - stacked) / 2.0;
        for child in children {
            let child_extent = self.extent(child);
            self.place(child, cursor);
            cursor += child_extent + SPACING_VERTICAL;
        }
    }
}

/// Lays out `root` with the top of the tree at `y = 0` and the root at `x = 0`.
pub fn layout(root: &MindNode) -> Layout {
    let mut builder = Builder { nodes: Vec::new() };
    builder.add(root, 0, None, BRANCH_COLORS[0], 0.0);
    builder.place(0, 0.0);
    Layout {
        nodes: builder.nodes,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mindmap::tree::transform;

    #[test]
    fn cjk_text_measures_wider_than_latin() {
        assert!(text_width("视频") > text_width("ab"));
        assert!((text_width("视") - FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn children_sit_in_the_next_column_and_parent_is_centred() {
        let layout = layout(&transform("# Root\n\n## A\n\n## B\n\n## C\n"));
        let root = &layout.nodes[0];
        let children: Vec<&PositionedNode> =
            layout.nodes.iter().filter(|node| node.depth == 1).collect();
        assert_eq!(children.len(), 3);

        let column = root.x + root.width + SPACING_HORIZONTAL;
        assert!(children.iter().all(|child| (child.x - column).abs() < 1e-9));
        assert!(children[0].y < children[1].y && children[1].y < children[2].y);
        assert!((children[1].y - root.y).abs() < 1e-9);
        assert!(
            (children[1].y - children[0].y - (LINE_HEIGHT + SPACING_VERTICAL)).abs() < 1e-9
        );
    }

    #[test]
    fn siblings_never_overlap() {
        let layout = layout(&transform(
            "# R\n\n## A\n\n- a1\n- a2\n- a3\n\n## B\n\n- b1\n  - b11\n  - b12\n",
        ));
        let mut by_column: Vec<&PositionedNode> =
            layout.nodes.iter().filter(|node| node.depth == 2).collect();
        by_column.sort_by(|a, b| a.y.total_cmp(&b.y));
        for pair in by_column.windows(2) {
            assert!(pair[0].y + pair[0].height <= pair[1].y + 1e-9);
        }
    }

    #[test]
    fn bbox_covers_every_node() {
        let layout = layout(&transform("# R\n\n- one\n- two\n"));
        let bbox = layout.bbox().unwrap();
        for node in &layout.nodes {
            assert!(node.x >= bbox.x && node.y >= bbox.y);
            assert!(node.x + node.width <= bbox.x + bbox.width + 1e-9);
            assert!(node.y + node.height <= bbox.y + bbox.height + 1e-9);
        }
        assert_eq!(layout.links().count(), 2);
        assert_eq!(Layout::default().bbox(), None);
    }

    #[test]
    fn long_text_wraps_within_the_node_box() {
        let label = "a".repeat(100);
        let layout = layout(&transform(&format!("# Root\n\n- {label}\n")));
        let leaf = &layout.nodes[1];

        assert!(leaf.lines.len() > 1);
        assert_eq!(leaf.lines.concat(), label);
        assert!((leaf.height - leaf.lines.len() as f64 * LINE_HEIGHT).abs() < 1e-9);
        for line in &leaf.lines {
            assert!(text_width(line) <= MAX_TEXT_WIDTH + 1e-9);
            assert!(2.0f64.mul_add(PADDING_X, text_width(line)) <= leaf.width + 1e-9);
        }
    }

    #[test]
    fn wrapping_prefers_spaces() {
        let words = "word ".repeat(20);
        let lines = wrap_lines(words.trim_end());
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| !line.starts_with(' ') && !line.ends_with(' ')));
        assert!(lines.iter().all(|line| line.split(' ').all(|word| word == "word")));
        assert_eq!(wrap_lines(""), vec![String::new()]);
        assert_eq!(wrap_lines("short"), vec!["short".to_string()]);
    }

    #[test]
    fn branches_take_distinct_colors() {
        let layout = layout(&transform("# R\n\n## A\n\n### A1\n\n## B\n"));
        let colors: Vec<&str> = layout.nodes.iter().map(|node| node.color).collect();
        assert_eq!(colors[1], colors[2]);
        assert_ne!(colors[1], colors[3]);
    }
}
