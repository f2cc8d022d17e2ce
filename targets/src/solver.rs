use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::shape::ShapeSpec;

/// Default descending radius factors for concentric ring targets.
pub const RADIUS_FACTORS: [f32; 5] = [1.0, 0.8, 0.6, 0.4, 0.2];

/// Attempt budget for non-degenerate triangle sampling before the
/// deterministic fallback kicks in.
const TRIANGLE_ATTEMPTS: usize = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaceError {
    /// Too many scaled radii rounded down to zero for the requested ring
    /// count. Recovered upstream by resampling.
    #[error("only {usable} usable ring radii at outer radius {outer}, need {required}")]
    RingDeficit {
        outer: i32,
        usable: usize,
        required: usize,
    },
    /// The size policy cannot produce a shape that fits the canvas.
    #[error("size range {min}..={max} cannot fit a {width}x{height} canvas")]
    PolicyUnsatisfiable {
        min: i32,
        max: i32,
        width: u32,
        height: u32,
    },
}

/// Valid outer-radius range for a ring target fully inside a `width` x
/// `height` canvas.
///
/// The maximum is half the short canvas side; the nominal minimum is 10% of
/// it (at least one pixel). On canvases so small that the minimum would
/// exceed the maximum, the range collapses to the single maximal radius.
pub fn ring_radius_bounds(width: u32, height: u32) -> (i32, i32) {
    let short = width.min(height) as i32;
    let r_max = short / 2;
    let mut r_min = (0.1 * short as f32) as i32;
    if r_min < 1 {
        r_min = 1;
    }
    if r_min > r_max {
        r_min = r_max;
    }
    (r_min, r_max)
}

/// Sample a fully contained concentric-ring target.
///
/// The outer radius is drawn from [`ring_radius_bounds`], the center from the
/// range that keeps the outer circle inside the canvas. `factors` must be
/// descending; each scaled radius that truncates to zero is dropped, and a
/// result with fewer than `ring_count` usable radii is a
/// [`PlaceError::RingDeficit`].
pub fn sample_rings<R: Rng>(
    rng: &mut R,
    width: u32,
    height: u32,
    factors: &[f32],
    ring_count: usize,
) -> Result<ShapeSpec, PlaceError> {
    let (r_min, r_max) = ring_radius_bounds(width, height);
    let r = rng.random_range(r_min..=r_max);

    let cx = rng.random_range(r..=(width as i32 - r));
    let cy = rng.random_range(r..=(height as i32 - r));

    let mut radii: Vec<i32> = factors
        .iter()
        .map(|f| (f * r as f32) as i32)
        .filter(|&radius| radius > 0)
        .collect();
    if radii.len() < ring_count {
        return Err(PlaceError::RingDeficit {
            outer: r,
            usable: radii.len(),
            required: ring_count,
        });
    }
    radii.truncate(ring_count);

    Ok(ShapeSpec::ConcentricRings {
        center: (cx, cy),
        radii,
    })
}

/// Shared size policy for the polygon samplers, bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SizeRange {
    pub min: i32,
    pub max: i32,
}

impl SizeRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// A policy is compatible with a canvas when `1 <= min <= max` and the
    /// maximum does not exceed the short canvas side. `max` equal to the
    /// canvas side is legal: it leaves exactly one valid placement.
    pub fn validate(self, width: u32, height: u32) -> Result<(), PlaceError> {
        let short = width.min(height) as i32;
        if self.min < 1 || self.min > self.max || self.max > short {
            return Err(PlaceError::PolicyUnsatisfiable {
                min: self.min,
                max: self.max,
                width,
                height,
            });
        }
        Ok(())
    }

    fn sample<R: Rng>(self, rng: &mut R) -> i32 {
        rng.random_range(self.min..=self.max)
    }
}

/// Sample a fully contained axis-aligned rectangle.
pub fn sample_rectangle<R: Rng>(
    rng: &mut R,
    width: u32,
    height: u32,
    sizes: SizeRange,
) -> ShapeSpec {
    debug_assert!(sizes.validate(width, height).is_ok());
    let w = sizes.sample(rng);
    let h = sizes.sample(rng);
    let x = rng.random_range(0..=(width as i32 - w));
    let y = rng.random_range(0..=(height as i32 - h));
    ShapeSpec::Rectangle {
        top_left: (x, y),
        width: w,
        height: h,
    }
}

/// Sample a fully contained square.
pub fn sample_square<R: Rng>(rng: &mut R, width: u32, height: u32, sizes: SizeRange) -> ShapeSpec {
    debug_assert!(sizes.validate(width, height).is_ok());
    let side = sizes.sample(rng);
    let x = rng.random_range(0..=(width as i32 - side));
    let y = rng.random_range(0..=(height as i32 - side));
    ShapeSpec::Square {
        top_left: (x, y),
        side,
    }
}

/// Sample a fully contained circle. The radius range is the size policy
/// halved, the center range keeps the disk off every edge.
pub fn sample_circle<R: Rng>(rng: &mut R, width: u32, height: u32, sizes: SizeRange) -> ShapeSpec {
    debug_assert!(sizes.validate(width, height).is_ok());
    let radius = rng.random_range((sizes.min / 2)..=(sizes.max / 2));
    let cx = rng.random_range(radius..=(width as i32 - radius));
    let cy = rng.random_range(radius..=(height as i32 - radius));
    ShapeSpec::Circle {
        center: (cx, cy),
        radius,
    }
}

/// Sample a non-degenerate triangle.
///
/// Vertices are drawn inside a randomly sized and placed window; a sample is
/// accepted once its area exceeds `min_size^2 / 10`. When the attempt budget
/// runs out the sampler falls back to a deterministic isosceles triangle
/// inscribed in a freshly sampled window, so it always terminates.
pub fn sample_triangle<R: Rng>(
    rng: &mut R,
    width: u32,
    height: u32,
    sizes: SizeRange,
) -> ShapeSpec {
    debug_assert!(sizes.validate(width, height).is_ok());
    let min_area = (sizes.min as f64 * sizes.min as f64) / 10.0;

    for _ in 0..TRIANGLE_ATTEMPTS {
        let win_w = sizes.sample(rng);
        let win_h = sizes.sample(rng);
        let ox = rng.random_range(0..=(width as i32 - win_w));
        let oy = rng.random_range(0..=(height as i32 - win_h));

        let mut vertices = [(0i32, 0i32); 3];
        for vertex in &mut vertices {
            let px = rng.random_range(ox..=(ox + win_w));
            let py = rng.random_range(oy..=(oy + win_h));
            *vertex = (px, py);
        }

        if triangle_area(vertices[0], vertices[1], vertices[2]) > min_area {
            return ShapeSpec::Triangle { vertices };
        }
    }

    // Fallback: isosceles triangle spanning a fresh window.
    let base = sizes.sample(rng);
    let tall = sizes.sample(rng);
    let x = rng.random_range(0..=(width as i32 - base));
    let y = rng.random_range(0..=(height as i32 - tall));
    ShapeSpec::Triangle {
        vertices: [(x + base / 2, y), (x, y + tall), (x + base, y + tall)],
    }
}

/// Area of the triangle `a`, `b`, `c` via the shoelace formula.
pub fn triangle_area(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> f64 {
    let (x1, y1) = (a.0 as f64, a.1 as f64);
    let (x2, y2) = (b.0 as f64, b.1 as f64);
    let (x3, y3) = (c.0 as f64, c.1 as f64);
    0.5 * (x1 * (y2 - y3) + x2 * (y3 - y1) + x3 * (y1 - y2)).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng, rngs::SmallRng};

    /// Yields zero forever, pinning every uniform draw to its lower bound.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn radius_bounds_for_square_canvas() {
        assert_eq!(ring_radius_bounds(640, 640), (64, 320));
    }

    #[test]
    fn radius_bounds_use_short_side() {
        assert_eq!(ring_radius_bounds(640, 100), (10, 50));
    }

    #[test]
    fn radius_bounds_collapse_on_tiny_canvas() {
        // The nominal minimum (1) exceeds the maximum (0), so the range
        // collapses to the single maximal radius.
        assert_eq!(ring_radius_bounds(1, 1), (0, 0));
    }

    #[test]
    fn ring_sample_is_fully_contained() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let spec = sample_rings(&mut rng, 640, 640, &RADIUS_FACTORS, 5).unwrap();
            let ShapeSpec::ConcentricRings { center, radii } = &spec else {
                panic!("expected rings");
            };
            assert_eq!(radii.len(), 5);
            assert!(radii.windows(2).all(|w| w[0] >= w[1]));
            assert!(radii.iter().all(|&r| r > 0));

            let outer = radii[0];
            assert!(center.0 - outer >= 0 && center.0 + outer <= 640);
            assert!(center.1 - outer >= 0 && center.1 + outer <= 640);
        }
    }

    #[test]
    fn ring_deficit_on_degenerate_canvas() {
        let mut rng = SmallRng::seed_from_u64(7);
        let err = sample_rings(&mut rng, 1, 1, &RADIUS_FACTORS, 5).unwrap_err();
        assert_eq!(
            err,
            PlaceError::RingDeficit {
                outer: 0,
                usable: 0,
                required: 5
            }
        );
    }

    #[test]
    fn size_range_validation() {
        assert!(SizeRange::new(50, 250).validate(640, 640).is_ok());
        assert!(SizeRange::new(640, 640).validate(640, 640).is_ok());
        assert!(SizeRange::new(50, 641).validate(640, 640).is_err());
        assert!(SizeRange::new(0, 250).validate(640, 640).is_err());
        assert!(SizeRange::new(100, 50).validate(640, 640).is_err());
    }

    #[test]
    fn canvas_sized_shapes_have_exactly_one_placement() {
        let sizes = SizeRange::new(640, 640);
        let mut rng = SmallRng::seed_from_u64(3);

        let ShapeSpec::Rectangle {
            top_left,
            width,
            height,
        } = sample_rectangle(&mut rng, 640, 640, sizes)
        else {
            panic!("expected rectangle");
        };
        assert_eq!(top_left, (0, 0));
        assert_eq!((width, height), (640, 640));

        let ShapeSpec::Circle { center, radius } = sample_circle(&mut rng, 640, 640, sizes) else {
            panic!("expected circle");
        };
        assert_eq!(center, (320, 320));
        assert_eq!(radius, 320);
    }

    #[test]
    fn polygon_samples_stay_inside_canvas() {
        let sizes = SizeRange::new(50, 250);
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            for spec in [
                sample_rectangle(&mut rng, 640, 640, sizes),
                sample_square(&mut rng, 640, 640, sizes),
                sample_circle(&mut rng, 640, 640, sizes),
                sample_triangle(&mut rng, 640, 640, sizes),
            ] {
                let bbox = spec.tight_bbox();
                assert!(bbox.x_min >= 0 && bbox.y_min >= 0);
                assert!(bbox.x_max <= 640 && bbox.y_max <= 640);
                assert!(bbox.x_min <= bbox.x_max && bbox.y_min <= bbox.y_max);
            }
        }
    }

    #[test]
    fn triangle_meets_area_threshold() {
        let sizes = SizeRange::new(50, 250);
        let min_area = 250.0;
        let mut rng = SmallRng::seed_from_u64(13);
        for _ in 0..200 {
            let ShapeSpec::Triangle { vertices } = sample_triangle(&mut rng, 640, 640, sizes)
            else {
                panic!("expected triangle");
            };
            let area = triangle_area(vertices[0], vertices[1], vertices[2]);
            assert!(area > min_area, "area {area} below threshold");
        }
    }

    #[test]
    fn triangle_falls_back_to_isosceles_on_exhaustion() {
        // A constant generator collapses every sampled vertex onto the window
        // origin, so all attempts are rejected as zero-area and the
        // deterministic fallback fires.
        let mut rng = ZeroRng;
        let sizes = SizeRange::new(50, 50);
        let ShapeSpec::Triangle { vertices } = sample_triangle(&mut rng, 640, 640, sizes) else {
            panic!("expected triangle");
        };
        assert_eq!(vertices, [(25, 0), (0, 50), (50, 50)]);
        assert!(triangle_area(vertices[0], vertices[1], vertices[2]) > 250.0);
    }
}
