//! PNG rendering of a laid-out mind map.
//!
//! The live SVG surface, fit transform included, is rasterized at three
//! times the viewport size on a white background. Labels are shaped with
//! the fonts installed on the system.

use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use image::{ImageFormat, RgbaImage};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use tracing::debug;

use super::layout::Layout;
use super::svg::render_surface;
use super::{FitTransform, Viewport};
use crate::error::{Error, Result};

/// Canvas pixels per viewport unit.
pub const RASTER_SCALE: f64 = 3.0;
/// Families `sans-serif` resolves to, first installed wins.
const SANS_SERIF_FAMILIES: [&str; 5] = [
    "Arial",
    "Helvetica",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
];

static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

/// System fonts, loaded once per process.
fn fonts() -> Arc<fontdb::Database> {
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            if let Some(family) = sans_serif_family(&db) {
                db.set_sans_serif_family(family);
            }
            debug!(faces = db.len(), "Loaded system fonts for PNG export");
            Arc::new(db)
        })
        .clone()
}

/// Preferred sans-serif family if installed, else the first installed one.
fn sans_serif_family(db: &fontdb::Database) -> Option<String> {
    let installed = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };
    SANS_SERIF_FAMILIES
        .iter()
        .find(|name| installed(name))
        .map(|name| (*name).to_string())
        .or_else(|| {
            db.faces()
                .find_map(|face| face.families.first().map(|(family, _)| family.clone()))
        })
}

/// Renders the diagram and encodes it as PNG.
pub fn export_png(layout: &Layout, viewport: Viewport, transform: FitTransform) -> Result<Vec<u8>> {
    let (width, height) = viewport.raster_size(RASTER_SCALE);
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return Err(Error::InvalidInput(
            "Mind map viewport must be larger than zero".to_string(),
        ));
    };
    pixmap.fill(Color::WHITE);

    let options = usvg::Options {
        fontdb: fonts(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&render_surface(layout, viewport, transform), &options)?;
    #[allow(clippy::cast_possible_truncation)]
    let scale = RASTER_SCALE as f32;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    // Every pixel is opaque after the white fill, so premultiplied RGBA is plain RGBA.
    let image = RgbaImage::from_raw(width, height, pixmap.take()).ok_or_else(|| {
        Error::InvalidInput("Rendered canvas does not match the viewport".to_string())
    })?;
    let mut cursor = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image).write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, Rgba};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mindmap::layout::layout;
    use crate::mindmap::tree::transform;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn render(markdown: &str, viewport: Viewport) -> Vec<u8> {
        let layout = layout(&transform(markdown));
        let fit = FitTransform::fit(layout.bbox().unwrap(), viewport);
        export_png(&layout, viewport, fit).unwrap()
    }

    #[test]
    fn png_is_three_times_the_viewport_on_white() {
        let bytes = render("# Root\n\n- a\n- b\n", Viewport::new(200.0, 100.0));

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (600, 300));
        assert_eq!(decoded.get_pixel(0, 0), WHITE);
        let painted = decoded
            .pixels()
            .filter(|(_, _, pixel)| *pixel != WHITE)
            .count();
        assert!(painted > 0);
    }

    #[test]
    fn labels_are_drawn_into_the_png() {
        if fonts().is_empty() {
            eprintln!("no system fonts installed; label glyphs cannot be compared");
            return;
        }
        let viewport = Viewport::new(200.0, 100.0);
        let with_x = render("# Root\n\n- x\n", viewport);
        let with_y = render("# Root\n\n- y\n", viewport);

        let with_x = image::load_from_memory(&with_x).unwrap().to_rgba8();
        let with_y = image::load_from_memory(&with_y).unwrap().to_rgba8();
        assert_eq!(with_x.dimensions(), with_y.dimensions());
        assert!(with_x.as_raw() != with_y.as_raw());
    }

    #[test]
    fn sans_serif_falls_back_to_an_installed_family() {
        let db = fonts();
        if let Some(family) = sans_serif_family(&db) {
            assert!(db
                .faces()
                .any(|face| face.families.iter().any(|(name, _)| *name == family)));
        } else {
            assert!(db.is_empty());
        }
    }

    #[test]
    fn zero_viewport_is_rejected() {
        let layout = layout(&transform("# Root\n"));
        let viewport = Viewport::new(0.0, 0.0);
        let fit = FitTransform::identity();
        assert!(matches!(
            export_png(&layout, viewport, fit),
            Err(Error::InvalidInput(_))
        ));
    }
}
