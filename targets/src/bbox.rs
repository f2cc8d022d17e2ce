use std::fmt;

/// Axis-aligned box in pixel coordinates, `min` inclusive, `max` on the far
/// edge of the last covered pixel row/column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TightBBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl TightBBox {
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    /// Intersect with the canvas `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: u32, height: u32) -> TightBBox {
        TightBBox {
            x_min: self.x_min.clamp(0, width as i32),
            y_min: self.y_min.clamp(0, height as i32),
            x_max: self.x_max.clamp(0, width as i32),
            y_max: self.y_max.clamp(0, height as i32),
        }
    }
}

/// One detection label: class id plus a box in normalized center/size form,
/// every coordinate a fraction of the canvas dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Annotation {
    pub class_id: u32,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl Annotation {
    /// True when the box lies in the unit square with positive extent.
    pub fn is_valid(&self) -> bool {
        let coords = [self.x_center, self.y_center, self.width, self.height];
        coords.iter().all(|&c| (0.0..=1.0).contains(&c)) && self.width > 0.0 && self.height > 0.0
    }

    /// Map back to pixel corners `(x_min, y_min, x_max, y_max)`.
    pub fn to_pixel_box(&self, width: u32, height: u32) -> (f64, f64, f64, f64) {
        let w = width as f64;
        let h = height as f64;
        (
            (self.x_center - self.width / 2.0) * w,
            (self.y_center - self.height / 2.0) * h,
            (self.x_center + self.width / 2.0) * w,
            (self.y_center + self.height / 2.0) * h,
        )
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// Turn a tight pixel box into a normalized annotation.
///
/// Each side is enlarged by `pad_fraction` of the box extent on that axis,
/// then clamped to the canvas. A side that collapses to zero or inverts
/// (possible for degenerate shapes pressed against an edge) is repaired to
/// one pixel before normalizing, so the result always passes
/// [`Annotation::is_valid`].
pub fn annotate(
    tight: TightBBox,
    class_id: u32,
    width: u32,
    height: u32,
    pad_fraction: f64,
) -> Annotation {
    debug_assert!(width > 0 && height > 0);
    let w = width as f64;
    let h = height as f64;

    let pad_x = pad_fraction * tight.width() as f64;
    let pad_y = pad_fraction * tight.height() as f64;

    let mut x_min = (tight.x_min as f64 - pad_x).max(0.0);
    let mut x_max = (tight.x_max as f64 + pad_x).min(w);
    let mut y_min = (tight.y_min as f64 - pad_y).max(0.0);
    let mut y_max = (tight.y_max as f64 + pad_y).min(h);

    repair_axis(&mut x_min, &mut x_max, w);
    repair_axis(&mut y_min, &mut y_max, h);

    Annotation {
        class_id,
        x_center: (x_min + x_max) / 2.0 / w,
        y_center: (y_min + y_max) / 2.0 / h,
        width: (x_max - x_min) / w,
        height: (y_max - y_min) / h,
    }
}

/// Force `lo < hi` within `[0, extent]`, preferring to grow `hi` and only
/// moving `lo` when pinned against the far edge.
fn repair_axis(lo: &mut f64, hi: &mut f64, extent: f64) {
    if *hi <= *lo {
        *hi = if *lo < extent { *lo + 1.0 } else { extent };
        if *hi > extent {
            *hi = extent;
        }
        if *lo >= *hi {
            *lo = if *hi > 0.0 { *hi - 1.0 } else { 0.0 };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn centered_ring_box_without_padding() {
        let ann = annotate(TightBBox::new(120, 120, 520, 520), 0, 640, 640, 0.0);
        // All coordinates are dyadic, so equality is exact.
        assert_eq!(ann.x_center, 0.5);
        assert_eq!(ann.y_center, 0.5);
        assert_eq!(ann.width, 0.625);
        assert_eq!(ann.height, 0.625);
        assert!(ann.is_valid());
    }

    #[test]
    fn padded_rectangle_clamps_at_top_edge() {
        // 100x150 box near the top: 7% vertical padding pushes y_min to
        // -0.5, which clamps to 0 and shifts the center accordingly.
        let ann = annotate(TightBBox::new(10, 10, 110, 160), 0, 640, 640, 0.07);
        assert_close(ann.x_center, 0.09375);
        assert_close(ann.y_center, 0.133203125);
        assert_close(ann.width, 0.178125);
        assert_close(ann.height, 0.26640625);
        assert_eq!(ann.to_string(), "0 0.093750 0.133203 0.178125 0.266406");
    }

    #[test]
    fn zero_width_box_at_far_edge_is_repaired_inward() {
        let ann = annotate(TightBBox::new(640, 100, 640, 101), 2, 640, 640, 0.0);
        let (x_min, y_min, x_max, y_max) = ann.to_pixel_box(640, 640);
        assert_close(x_min, 639.0);
        assert_close(x_max, 640.0);
        assert_close(y_min, 100.0);
        assert_close(y_max, 101.0);
        assert!(ann.is_valid());
    }

    #[test]
    fn zero_area_box_at_origin_is_repaired_outward() {
        let ann = annotate(TightBBox::new(0, 0, 0, 0), 3, 640, 640, 0.0);
        let (x_min, y_min, x_max, y_max) = ann.to_pixel_box(640, 640);
        assert_close(x_min, 0.0);
        assert_close(x_max, 1.0);
        assert_close(y_min, 0.0);
        assert_close(y_max, 1.0);
        assert!(ann.is_valid());
    }

    #[test]
    fn pixel_round_trip() {
        let ann = annotate(TightBBox::new(120, 120, 520, 520), 1, 640, 640, 0.0);
        let (x_min, y_min, x_max, y_max) = ann.to_pixel_box(640, 640);
        assert_close(x_min, 120.0);
        assert_close(y_min, 120.0);
        assert_close(x_max, 520.0);
        assert_close(y_max, 520.0);
    }

    #[test]
    fn label_line_format() {
        let ann = Annotation {
            class_id: 1,
            x_center: 0.5,
            y_center: 0.5,
            width: 0.625,
            height: 0.625,
        };
        assert_eq!(ann.to_string(), "1 0.500000 0.500000 0.625000 0.625000");
    }

    #[test]
    fn clamp_to_canvas() {
        let clamped = TightBBox::new(-5, 10, 700, 600).clamp_to(640, 640);
        assert_eq!(clamped, TightBBox::new(0, 10, 640, 600));
    }

    #[test]
    fn validity_rejects_out_of_range() {
        let mut ann = Annotation {
            class_id: 0,
            x_center: 0.5,
            y_center: 0.5,
            width: 0.2,
            height: 0.2,
        };
        assert!(ann.is_valid());
        ann.width = 0.0;
        assert!(!ann.is_valid());
        ann.width = 1.5;
        assert!(!ann.is_valid());
    }
}
