use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::bbox::TightBBox;

/// A fully placed target, in pixel coordinates of the canvas it was solved
/// for. Construction goes through the samplers in [`crate::solver`], which
/// guarantee full containment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeSpec {
    /// Concentric filled circles, radii strictly descending so later draws
    /// occlude the centers of earlier ones.
    ConcentricRings {
        center: (i32, i32),
        radii: Vec<i32>,
    },
    Rectangle {
        top_left: (i32, i32),
        width: i32,
        height: i32,
    },
    Square {
        top_left: (i32, i32),
        side: i32,
    },
    Circle {
        center: (i32, i32),
        radius: i32,
    },
    Triangle {
        vertices: [(i32, i32); 3],
    },
}

impl ShapeSpec {
    /// Minimal axis-aligned box enclosing the shape, from geometry alone.
    pub fn tight_bbox(&self) -> TightBBox {
        match self {
            ShapeSpec::ConcentricRings { center, radii } => {
                let outer = radii.first().copied().unwrap_or(0);
                TightBBox {
                    x_min: center.0 - outer,
                    y_min: center.1 - outer,
                    x_max: center.0 + outer,
                    y_max: center.1 + outer,
                }
            }
            ShapeSpec::Rectangle {
                top_left,
                width,
                height,
            } => TightBBox {
                x_min: top_left.0,
                y_min: top_left.1,
                x_max: top_left.0 + width,
                y_max: top_left.1 + height,
            },
            ShapeSpec::Square { top_left, side } => TightBBox {
                x_min: top_left.0,
                y_min: top_left.1,
                x_max: top_left.0 + side,
                y_max: top_left.1 + side,
            },
            ShapeSpec::Circle { center, radius } => TightBBox {
                x_min: center.0 - radius,
                y_min: center.1 - radius,
                x_max: center.0 + radius,
                y_max: center.1 + radius,
            },
            ShapeSpec::Triangle { vertices } => {
                let xs = vertices.map(|v| v.0);
                let ys = vertices.map(|v| v.1);
                TightBBox {
                    x_min: xs.into_iter().min().unwrap_or(0),
                    y_min: ys.into_iter().min().unwrap_or(0),
                    x_max: xs.into_iter().max().unwrap_or(0),
                    y_max: ys.into_iter().max().unwrap_or(0),
                }
            }
        }
    }

    /// Draw the shape onto `canvas` and return its tight box.
    ///
    /// Ring targets cycle through `colors` outermost-first; the other
    /// variants use `colors[0]`. Fills are corner-inclusive, so a rectangle
    /// covers `width + 1` columns, matching its reported box. Drawing clips
    /// at canvas edges.
    pub fn rasterize(&self, canvas: &mut RgbImage, colors: &[Rgb<u8>]) -> TightBBox {
        debug_assert!(!colors.is_empty());
        match self {
            ShapeSpec::ConcentricRings { center, radii } => {
                debug_assert!(radii.windows(2).all(|w| w[0] >= w[1]));
                for (k, &radius) in radii.iter().enumerate() {
                    draw_filled_circle_mut(canvas, *center, radius, colors[k % colors.len()]);
                }
            }
            ShapeSpec::Rectangle {
                top_left,
                width,
                height,
            } => {
                let rect = Rect::at(top_left.0, top_left.1)
                    .of_size((width + 1) as u32, (height + 1) as u32);
                draw_filled_rect_mut(canvas, rect, colors[0]);
            }
            ShapeSpec::Square { top_left, side } => {
                let rect =
                    Rect::at(top_left.0, top_left.1).of_size((side + 1) as u32, (side + 1) as u32);
                draw_filled_rect_mut(canvas, rect, colors[0]);
            }
            ShapeSpec::Circle { center, radius } => {
                draw_filled_circle_mut(canvas, *center, *radius, colors[0]);
            }
            ShapeSpec::Triangle { vertices } => {
                let points: Vec<Point<i32>> =
                    vertices.iter().map(|&(x, y)| Point::new(x, y)).collect();
                draw_polygon_mut(canvas, &points, colors[0]);
            }
        }
        self.tight_bbox()
    }
}
