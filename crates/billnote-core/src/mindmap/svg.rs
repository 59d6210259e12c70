//! SVG rendering of a laid-out mind map.

use std::fmt::Write as _;

use super::layout::{
    Layout, PositionedNode, Rect, FONT_SIZE, LINE_HEIGHT, PADDING_X, SPACING_HORIZONTAL,
};
use super::{FitTransform, Viewport};
use crate::util::escape_html;

/// Margin added around the diagram's bounding box in exported SVG.
pub const EXPORT_PADDING: f64 = 50.0;
const BACKGROUND_STYLE: &str = "svg { background-color: white; }";
const TEXT_STYLE: &str = "text { font-family: sans-serif; font-size: 16px; fill: #333; }";

/// Rounds to two decimals and drops trailing zeros.
pub(crate) fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Cubic link from the parent's underline end to the child's underline start.
pub(crate) fn link_path(parent: &PositionedNode, child: &PositionedNode) -> String {
    let (sx, sy) = parent.anchor_out();
    let (tx, ty) = child.anchor_in();
    let bend = SPACING_HORIZONTAL / 2.0;
    format!(
        "M{},{}C{},{} {},{} {},{}",
        num(sx),
        num(sy),
        num(sx + bend),
        num(sy),
        num(tx - bend),
        num(ty),
        num(tx),
        num(ty)
    )
}

/// The diagram's `<g>` element, untransformed.
pub fn render_group(layout: &Layout) -> String {
    let mut out = String::from("<g class=\"markmap-content\">");
    for (parent, child) in layout.links() {
        let _ = write!(
            out,
            "<path class=\"markmap-link\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>",
            link_path(&layout.nodes[parent], &layout.nodes[child]),
            layout.nodes[child].color
        );
    }
    for node in &layout.nodes {
        let (x1, y) = node.anchor_in();
        let (x2, _) = node.anchor_out();
        let _ = write!(out, "<g class=\"markmap-node\" data-depth=\"{}\">", node.depth);
        let _ = write!(
            out,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1.5\"/>",
            num(x1),
            num(y),
            num(x2),
            num(y),
            node.color
        );
        if node.has_children {
            let _ = write!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"4\" fill=\"white\" stroke=\"{}\" stroke-width=\"1.5\"/>",
                num(x2),
                num(y),
                node.color
            );
        }
        let x = num(node.x + PADDING_X);
        let _ = write!(out, "<text x=\"{x}\" y=\"{}\">", num(node.y + FONT_SIZE));
        for (index, line) in node.lines.iter().enumerate() {
            if index == 0 {
                let _ = write!(out, "<tspan x=\"{x}\">{}</tspan>", escape_html(line));
            } else {
                let _ = write!(
                    out,
                    "<tspan x=\"{x}\" dy=\"{}\">{}</tspan>",
                    num(LINE_HEIGHT),
                    escape_html(line)
                );
            }
        }
        out.push_str("</text></g>");
    }
    out.push_str("</g>");
    out
}

/// Live surface: the viewport-sized SVG with the fit transform applied.
pub fn render_surface(layout: &Layout, viewport: Viewport, transform: FitTransform) -> String {
    let group = render_group(layout);
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"markmap\" width=\"{}\" height=\"{}\">\
<style>{TEXT_STYLE}</style>\
<g transform=\"translate({},{}) scale({})\">{group}</g></svg>",
        num(viewport.width),
        num(viewport.height),
        num(transform.translate_x),
        num(transform.translate_y),
        num(transform.scale)
    )
}

/// Standalone vector export sized to the content.
///
/// The view box is the bounding box grown by [`EXPORT_PADDING`] on every
/// side, the document scales to its container, and a white background is
/// set both by style and by a background rectangle.
pub fn export_svg(layout: &Layout) -> String {
    let view = layout
        .bbox()
        .unwrap_or(Rect {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        })
        .padded(EXPORT_PADDING);
    let view_box = format!(
        "{} {} {} {}",
        num(view.x),
        num(view.y),
        num(view.width),
        num(view.height)
    );
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
class=\"markmap\" viewBox=\"{view_box}\" width=\"100%\" height=\"100%\" \
preserveAspectRatio=\"xMidYMid meet\">\
<style>{BACKGROUND_STYLE} {TEXT_STYLE}</style>\
<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"white\"/>{}</svg>",
        num(view.x),
        num(view.y),
        num(view.width),
        num(view.height),
        render_group(layout)
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mindmap::layout::{layout, text_width};
    use crate::mindmap::tree::transform;

    #[test]
    fn num_trims_trailing_zeros() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(12.345), "12.35");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn export_view_box_pads_bbox_by_fifty() {
        let layout = layout(&transform("# Root\n\n- child\n"));
        let bbox = layout.bbox().unwrap();
        let svg = export_svg(&layout);

        let expected = format!(
            "viewBox=\"{} {} {} {}\"",
            num(bbox.x - 50.0),
            num(bbox.y - 50.0),
            num(bbox.width + 100.0),
            num(bbox.height + 100.0)
        );
        assert!(svg.contains(&expected), "{svg}");
        assert!(svg.contains("width=\"100%\" height=\"100%\""));
        assert!(svg.contains("preserveAspectRatio=\"xMidYMid meet\""));
        assert!(svg.contains("svg { background-color: white; }"));
        assert!(svg.contains("fill=\"white\"/><g class=\"markmap-content\">"));
    }

    #[test]
    fn node_text_is_escaped_plain_text() {
        let layout = layout(&transform("# A &amp; **B**\n"));
        let svg = render_group(&layout);
        assert!(svg.contains(">A &amp; B</tspan></text>"), "{svg}");
    }

    #[test]
    fn long_labels_stay_inside_the_view_box() {
        let label = "a".repeat(100);
        let layout = layout(&transform(&format!("# Root\n\n- {label}\n")));
        let svg = export_svg(&layout);
        let view = layout.bbox().unwrap().padded(EXPORT_PADDING);
        let leaf = &layout.nodes[1];

        let tspans = svg.matches("<tspan").count();
        assert_eq!(tspans, 1 + leaf.lines.len());
        assert!(leaf.lines.len() > 1);
        assert!(svg.contains(&format!("dy=\"{}\"", num(LINE_HEIGHT))));
        for line in &leaf.lines {
            assert!(svg.contains(&format!(">{line}</tspan>")));
            let right = leaf.x + PADDING_X + text_width(line);
            assert!(right <= view.x + view.width, "{right} past {view:?}");
        }
    }

    #[test]
    fn one_link_per_child() {
        let layout = layout(&transform("# R\n\n- a\n- b\n  - c\n"));
        assert_eq!(render_group(&layout).matches("markmap-link").count(), 3);
    }
}
