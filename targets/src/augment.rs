use image::{Rgb, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::Projection;
use rand::Rng;
use serde::Serialize;

use crate::bbox::TightBBox;

/// Probabilities and strengths for the post-draw augmentation pass.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct AugmentCfg {
    /// Chance of applying a random perspective warp.
    pub warp_probability: f64,
    /// Corner displacement bound as a fraction of the canvas dimension.
    pub max_shift_ratio: f32,
    /// Chance of applying a Gaussian blur.
    pub blur_probability: f64,
    /// Largest odd blur kernel; the drawn kernel is uniform over the odd
    /// values up to this, and a draw of 1 is a no-op.
    pub max_blur_kernel: i32,
}

impl Default for AugmentCfg {
    fn default() -> Self {
        Self {
            warp_probability: 0.3,
            max_shift_ratio: 0.08,
            blur_probability: 0.4,
            max_blur_kernel: 5,
        }
    }
}

/// What [`apply`] actually did to a canvas.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppliedAugment {
    /// Forward projection of the applied warp, if one fired.
    pub warp: Option<Projection>,
    /// Kernel of the applied blur, if one fired with a kernel above 1.
    pub blur_kernel: Option<i32>,
}

/// Run the augmentation chain in place: warp first, then blur, each gated by
/// its own probability draw.
pub fn apply<R: Rng>(rng: &mut R, canvas: &mut RgbImage, cfg: &AugmentCfg) -> AppliedAugment {
    let mut applied = AppliedAugment::default();

    if rng.random::<f64>() < cfg.warp_probability {
        if let Some(projection) =
            sample_projection(rng, canvas.width(), canvas.height(), cfg.max_shift_ratio)
        {
            *canvas = warp_replicate(canvas, &projection);
            applied.warp = Some(projection);
        }
    }

    if rng.random::<f64>() < cfg.blur_probability {
        let kernel = sample_blur_kernel(rng, cfg.max_blur_kernel);
        if kernel > 1 {
            *canvas = gaussian_blur_f32(canvas, blur_sigma(kernel));
            applied.blur_kernel = Some(kernel);
        }
    }

    applied
}

/// Draw a random perspective by jittering the four canvas corners.
///
/// Each corner moves by up to `max_shift_ratio` of the canvas dimension per
/// axis, and the moved corners are kept within 20% of the canvas outside its
/// bounds. Returns `None` when the jittered quad is degenerate and no
/// homography exists.
pub fn sample_projection<R: Rng>(
    rng: &mut R,
    width: u32,
    height: u32,
    max_shift_ratio: f32,
) -> Option<Projection> {
    let w = width as f32;
    let h = height as f32;
    let src = [(0.0, 0.0), (w - 1.0, 0.0), (0.0, h - 1.0), (w - 1.0, h - 1.0)];

    let shift_x = max_shift_ratio * w;
    let shift_y = max_shift_ratio * h;
    let mut dst = [(0.0f32, 0.0f32); 4];
    for (out, &(x, y)) in dst.iter_mut().zip(src.iter()) {
        let dx = if shift_x > 0.0 {
            rng.random_range(-shift_x..shift_x)
        } else {
            0.0
        };
        let dy = if shift_y > 0.0 {
            rng.random_range(-shift_y..shift_y)
        } else {
            0.0
        };
        *out = (
            (x + dx).clamp(-0.2 * w, 1.2 * w),
            (y + dy).clamp(-0.2 * h, 1.2 * h),
        );
    }

    Projection::from_control_points(src, dst)
}

/// Warp with replicated edges: every output pixel is bilinearly sampled at
/// the inverse-mapped position, clamped into the source so pixels pulled
/// from outside the canvas repeat the nearest edge instead of going black.
pub fn warp_replicate(image: &RgbImage, projection: &Projection) -> RgbImage {
    let (width, height) = image.dimensions();
    let inverse = projection.invert();
    let max_x = (width - 1) as f32;
    let max_y = (height - 1) as f32;

    RgbImage::from_fn(width, height, |x, y| {
        let (sx, sy) = inverse * (x as f32, y as f32);
        let sx = sx.clamp(0.0, max_x);
        let sy = sy.clamp(0.0, max_y);

        let x0 = sx.floor() as u32;
        let y0 = sy.floor() as u32;
        let x1 = (x0 + 1).min(width - 1);
        let y1 = (y0 + 1).min(height - 1);
        let fx = sx - x0 as f32;
        let fy = sy - y0 as f32;

        let p00 = image.get_pixel(x0, y0).0;
        let p10 = image.get_pixel(x1, y0).0;
        let p01 = image.get_pixel(x0, y1).0;
        let p11 = image.get_pixel(x1, y1).0;

        let mut out = [0u8; 3];
        for c in 0..3 {
            let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
            let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
            out[c] = (top * (1.0 - fy) + bottom * fy).round() as u8;
        }
        Rgb(out)
    })
}

/// Uniform draw over the odd kernels `1, 3, ..., max_kernel`.
pub fn sample_blur_kernel<R: Rng>(rng: &mut R, max_kernel: i32) -> i32 {
    if max_kernel <= 1 {
        return 1;
    }
    1 + 2 * rng.random_range(0..(max_kernel + 1) / 2)
}

/// Sigma for a given odd kernel, matching the usual kernel-to-sigma rule of
/// separable Gaussian filters.
pub fn blur_sigma(kernel: i32) -> f32 {
    0.3 * ((kernel - 1) as f32 * 0.5 - 1.0) + 0.8
}

/// Push a tight box through a forward projection: map its four corners, take
/// the integer envelope, and clamp to the canvas.
pub fn warp_bbox(tight: &TightBBox, projection: &Projection, width: u32, height: u32) -> TightBBox {
    let corners = [
        (tight.x_min as f32, tight.y_min as f32),
        (tight.x_max as f32, tight.y_min as f32),
        (tight.x_min as f32, tight.y_max as f32),
        (tight.x_max as f32, tight.y_max as f32),
    ];

    let mut x_min = f32::INFINITY;
    let mut y_min = f32::INFINITY;
    let mut x_max = f32::NEG_INFINITY;
    let mut y_max = f32::NEG_INFINITY;
    for corner in corners {
        let (x, y) = *projection * corner;
        x_min = x_min.min(x);
        y_min = y_min.min(y);
        x_max = x_max.max(x);
        y_max = y_max.max(y);
    }

    TightBBox {
        x_min: x_min.floor() as i32,
        y_min: y_min.floor() as i32,
        x_max: x_max.ceil() as i32,
        y_max: y_max.ceil() as i32,
    }
    .clamp_to(width, height)
}
