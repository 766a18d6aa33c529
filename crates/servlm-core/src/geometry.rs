//! Geometric primitives attached to normalized results.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in pixel coordinates.
///
/// Serialized as `{"xyxy": [x1, y1, x2, y2], "label": ...}` to stay
/// compatible with the existing response schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Corner coordinates as `[x1, y1, x2, y2]`.
    pub xyxy: [f64; 4],
    /// Class or description attached to the box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl BoundingBox {
    /// Creates a new bounding box from corner coordinates.
    pub fn new(xyxy: [f64; 4]) -> Self {
        Self { xyxy, label: None }
    }

    /// Attaches a label to this box.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the box width.
    pub fn width(&self) -> f64 {
        (self.xyxy[2] - self.xyxy[0]).abs()
    }

    /// Returns the box height.
    pub fn height(&self) -> f64 {
        (self.xyxy[3] - self.xyxy[1]).abs()
    }

    /// Returns the box area.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the center point of the box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.xyxy[0] + self.xyxy[2]) / 2.0,
            (self.xyxy[1] + self.xyxy[3]) / 2.0,
        )
    }
}

/// A region outlined by an ordered list of vertices.
///
/// Coordinates are stored flat as `[x1, y1, x2, y2, ...]`, matching the quad
/// boxes the model emits for OCR regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Flat coordinate list.
    pub points: Vec<f64>,
    /// Text recognized inside this region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Polygon {
    /// Creates a new polygon from a flat coordinate list.
    pub fn new(points: Vec<f64>) -> Self {
        Self {
            points,
            label: None,
        }
    }

    /// Attaches a label to this polygon.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Iterates over the polygon's `(x, y)` vertices.
    ///
    /// A trailing odd coordinate is ignored.
    pub fn vertices(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_measurements() {
        let bbox = BoundingBox::new([10.0, 20.0, 30.0, 60.0]).with_label("cat");
        assert_eq!(bbox.width(), 20.0);
        assert_eq!(bbox.height(), 40.0);
        assert_eq!(bbox.area(), 800.0);
        assert_eq!(bbox.center(), (20.0, 40.0));
    }

    #[test]
    fn polygon_vertices() {
        let poly = Polygon::new(vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0]);
        assert_eq!(poly.vertices().count(), 4);
        assert_eq!(poly.vertices().next(), Some((0.0, 0.0)));
    }

    #[test]
    fn wire_shape_round_trips() {
        let bbox = BoundingBox::new([0.0, 0.0, 1.0, 1.0]).with_label("cat");
        let json = serde_json::to_value(&bbox).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"xyxy": [0.0, 0.0, 1.0, 1.0], "label": "cat"})
        );
        let back: BoundingBox = serde_json::from_value(json).unwrap();
        assert_eq!(back, bbox);
    }
}
