//! Rendering of normalized results onto images.
//!
//! Draws detection boxes and OCR region polygons as colored outlines.
//! Labels are not rasterized; callers that need them have the structured
//! result alongside the image.

use image::{DynamicImage, Rgba, RgbaImage};
use servlm_core::{BoundingBox, Polygon};

const BOX_COLOR: Rgba<u8> = Rgba([220, 38, 38, 255]);
const POLY_COLOR: Rgba<u8> = Rgba([37, 99, 235, 255]);

const BOX_STROKE: u32 = 2;
const POLY_STROKE: u32 = 3;

/// Draws bounding boxes as rectangle outlines onto a copy of the image.
pub fn draw_boxes(image: &DynamicImage, boxes: &[BoundingBox]) -> DynamicImage {
    let mut canvas = image.to_rgba8();

    for bbox in boxes {
        let [x1, y1, x2, y2] = bbox.xyxy;
        let corners = [
            (x1, y1, x2, y1),
            (x2, y1, x2, y2),
            (x2, y2, x1, y2),
            (x1, y2, x1, y1),
        ];
        for (ax, ay, bx, by) in corners {
            draw_segment(&mut canvas, (ax, ay), (bx, by), BOX_COLOR, BOX_STROKE);
        }
    }

    DynamicImage::ImageRgba8(canvas)
}

/// Draws polygons as closed outlines onto a copy of the image.
pub fn draw_polys(image: &DynamicImage, polys: &[Polygon]) -> DynamicImage {
    let mut canvas = image.to_rgba8();

    for poly in polys {
        let vertices: Vec<(f64, f64)> = poly.vertices().collect();
        if vertices.len() < 2 {
            continue;
        }
        for index in 0..vertices.len() {
            let from = vertices[index];
            let to = vertices[(index + 1) % vertices.len()];
            draw_segment(&mut canvas, from, to, POLY_COLOR, POLY_STROKE);
        }
    }

    DynamicImage::ImageRgba8(canvas)
}

/// Plots a line segment with the given stroke width, clipped to the canvas.
fn draw_segment(
    canvas: &mut RgbaImage,
    from: (f64, f64),
    to: (f64, f64),
    color: Rgba<u8>,
    stroke: u32,
) {
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(canvas, x0, y0, color, stroke);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x0 += sx;
        }
        if doubled <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Fills a stroke-sized square around the point, skipping pixels outside
/// the canvas.
fn plot(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, stroke: u32) {
    let radius = (stroke / 2) as i64;
    for px in (x - radius)..=(x + radius) {
        for py in (y - radius)..=(y + radius) {
            if px >= 0 && py >= 0 && (px as u32) < canvas.width() && (py as u32) < canvas.height() {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_leave_marks_on_the_outline() {
        let image = DynamicImage::new_rgb8(32, 32);
        let boxes = [BoundingBox::new([4.0, 4.0, 20.0, 20.0]).with_label("cat")];

        let annotated = draw_boxes(&image, &boxes).to_rgba8();
        assert_eq!(*annotated.get_pixel(12, 4), BOX_COLOR);
        assert_eq!(*annotated.get_pixel(4, 12), BOX_COLOR);
        // Interior stays untouched.
        assert_ne!(*annotated.get_pixel(12, 12), BOX_COLOR);
    }

    #[test]
    fn polys_draw_closed_outlines() {
        let image = DynamicImage::new_rgb8(32, 32);
        let polys = [Polygon::new(vec![2.0, 2.0, 28.0, 2.0, 28.0, 28.0, 2.0, 28.0])];

        let annotated = draw_polys(&image, &polys).to_rgba8();
        assert_eq!(*annotated.get_pixel(14, 2), POLY_COLOR);
        // The closing edge back to the first vertex is drawn too.
        assert_eq!(*annotated.get_pixel(2, 14), POLY_COLOR);
    }

    #[test]
    fn out_of_bounds_boxes_do_not_panic() {
        let image = DynamicImage::new_rgb8(8, 8);
        let boxes = [BoundingBox::new([-10.0, -10.0, 100.0, 100.0])];
        draw_boxes(&image, &boxes);
    }
}
