//! Mind-map rendering of generated notes.
//!
//! Markdown is parsed into a [`MindNode`] tree, laid out horizontally and
//! rendered as a live SVG surface or exported as HTML, SVG, PNG or XMind.

pub mod entities;
mod exporter;
pub mod html;
pub mod layout;
pub mod raster;
pub mod svg;
pub mod tree;
pub mod xmind;

pub use exporter::{MindmapExporter, MindmapFormat};
pub use layout::{Layout, Rect};
pub use tree::{transform, MindNode};

use crate::error::Result;

/// Share of the viewport the fitted diagram may occupy.
const FIT_RATIO: f64 = 0.95;
/// Small diagrams are not magnified past this.
const MAX_FIT_SCALE: f64 = 2.0;

/// Size of the rendering surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel dimensions of a canvas `scale` times the viewport.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn raster_size(self, scale: f64) -> (u32, u32) {
        let pixels = |value: f64| (value * scale).round().clamp(0.0, f64::from(u32::MAX)) as u32;
        (pixels(self.width), pixels(self.height))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Uniform scale followed by a translation, as applied to the diagram group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl FitTransform {
    pub const fn identity() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    /// Centres `bbox` in `viewport`, scaled to fit.
    pub fn fit(bbox: Rect, viewport: Viewport) -> Self {
        if bbox.width <= 0.0 || bbox.height <= 0.0 {
            return Self::identity();
        }
        let scale = ((viewport.width / bbox.width).min(viewport.height / bbox.height) * FIT_RATIO)
            .min(MAX_FIT_SCALE);
        Self {
            scale,
            translate_x: bbox.width.mul_add(-scale, viewport.width) / 2.0 - bbox.x * scale,
            translate_y: bbox.height.mul_add(-scale, viewport.height) / 2.0 - bbox.y * scale,
        }
    }
}

/// One mind-map surface bound to a piece of markdown.
#[derive(Debug, Clone)]
pub struct Mindmap {
    viewport: Viewport,
    root: MindNode,
    layout: Layout,
    transform: FitTransform,
    fitted: bool,
}

impl Mindmap {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            root: MindNode::default(),
            layout: Layout::default(),
            transform: FitTransform::identity(),
            fitted: false,
        }
    }

    /// Replaces the content and fits the new diagram into the viewport.
    pub fn set_text(&mut self, markdown: &str) {
        self.root = transform(markdown);
        self.layout = layout::layout(&self.root);
        self.fit();
    }

    pub fn fit(&mut self) {
        self.transform = self.fitted_transform();
        self.fitted = true;
    }

    pub const fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Resizing leaves the current transform in place until the next fit.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.fitted = false;
    }

    /// Moves the diagram by a screen-space offset.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.transform.translate_x += dx;
        self.transform.translate_y += dy;
        self.fitted = false;
    }

    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub const fn root(&self) -> &MindNode {
        &self.root
    }

    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    pub const fn transform(&self) -> FitTransform {
        self.transform
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// The transform `fit` would apply, without applying it.
    pub fn fitted_transform(&self) -> FitTransform {
        self.layout
            .bbox()
            .map_or_else(FitTransform::identity, |bbox| {
                FitTransform::fit(bbox, self.viewport)
            })
    }

    /// Current SVG surface with the live transform.
    pub fn render_surface(&self) -> String {
        svg::render_surface(&self.layout, self.viewport, self.transform)
    }

    pub fn export_html(&self, title: Option<&str>) -> Result<String> {
        html::export_html(&self.root, title)
    }

    pub fn export_svg(&self) -> String {
        svg::export_svg(&self.layout)
    }

    /// PNG of the fitted diagram at three times the viewport size.
    pub fn export_png(&self) -> Result<Vec<u8>> {
        raster::export_png(&self.layout, self.viewport, self.fitted_transform())
    }

    pub fn export_xmind(&self, title: Option<&str>) -> Result<Vec<u8>> {
        xmind::export_xmind(&self.root, title)
    }
}

impl Default for Mindmap {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_text_fits_and_panning_unfits() {
        let mut mindmap = Mindmap::default();
        assert!(!mindmap.is_fitted());
        mindmap.set_text("# Root\n\n- a\n- b\n");
        assert!(mindmap.is_fitted());
        assert_eq!(mindmap.transform(), mindmap.fitted_transform());

        mindmap.pan(10.0, 0.0);
        assert!(!mindmap.is_fitted());
        mindmap.fit();
        assert!(mindmap.is_fitted());
    }

    #[test]
    fn fit_centres_content_and_caps_magnification() {
        let bbox = Rect {
            x: 0.0,
            y: -10.0,
            width: 100.0,
            height: 20.0,
        };
        let fit = FitTransform::fit(bbox, Viewport::new(800.0, 600.0));
        assert!((fit.scale - MAX_FIT_SCALE).abs() < 1e-9);
        let centre_x = fit.scale.mul_add(bbox.x + bbox.width / 2.0, fit.translate_x);
        let centre_y = fit.scale.mul_add(bbox.y + bbox.height / 2.0, fit.translate_y);
        assert!((centre_x - 400.0).abs() < 1e-9);
        assert!((centre_y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn surface_carries_viewport_size_and_transform() {
        let mut mindmap = Mindmap::new(Viewport::new(640.0, 480.0));
        mindmap.set_text("# Root\n");
        let surface = mindmap.render_surface();
        assert!(surface.contains("width=\"640\" height=\"480\""));
        assert!(surface.contains("<g transform=\"translate("));
        assert!(surface.contains(">Root</tspan></text>"));
    }

    #[test]
    fn raster_size_rounds_and_scales() {
        assert_eq!(Viewport::new(800.0, 600.0).raster_size(3.0), (2400, 1800));
        assert_eq!(Viewport::new(-5.0, 10.4).raster_size(1.0), (0, 10));
    }
}
