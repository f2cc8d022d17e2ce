use image::RgbImage;
use log::{info, warn};
use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng};
use rand_xoshiro::SplitMix64;
use serde::Serialize;

use targets::{
    augment, bbox,
    shape::ShapeSpec,
    solver::{self, SizeRange},
};

use crate::{
    config::{RingDatasetCfg, ShapeDatasetCfg},
    io::{self, DatasetDirs},
    palette::{RingColors, ShapeColors},
};

/// Outcome counters for one generation run.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunStats {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Serialize)]
struct RunSummary<'a, C: Serialize> {
    schema: &'static str,
    config: &'a C,
    requested: usize,
    generated: usize,
    skipped: usize,
    failed: usize,
}

/// Independent generator per sample index: a splitmix stream folds the run
/// seed with the index, and its first output seeds the working generator.
/// Identical runs replay identically, and indices could be sharded across
/// workers without coordination.
fn substream(seed: u64, index: u64) -> SmallRng {
    let mut sm = SplitMix64::seed_from_u64(seed.wrapping_add(index));
    SmallRng::seed_from_u64(sm.next_u64())
}

/// Generates the single-class concentric-ring dataset under
/// `<out_dir>/{images,labels}/train`.
pub struct RingDatasetGenerator {
    pub cfg: RingDatasetCfg,
}

impl RingDatasetGenerator {
    pub fn new(cfg: RingDatasetCfg) -> Self {
        Self { cfg }
    }

    pub fn run(&self) -> anyhow::Result<RunStats> {
        let cfg = &self.cfg;
        let dirs = DatasetDirs::create(&cfg.out_dir, "train")?;

        // Twice the target bounds the whole run even when placements keep
        // getting rejected.
        let budget = cfg.count * 2;
        let mut stats = RunStats::default();

        for attempt in 0..budget {
            if stats.generated >= cfg.count {
                break;
            }
            let mut rng = substream(cfg.seed, attempt as u64);

            let colors = RingColors::new(&mut rng);
            let mut canvas = RgbImage::from_pixel(cfg.img_w, cfg.img_h, colors.background);

            let spec = match solver::sample_rings(
                &mut rng,
                cfg.img_w,
                cfg.img_h,
                &cfg.radius_factors,
                cfg.ring_count,
            ) {
                Ok(spec) => spec,
                Err(_) => {
                    stats.skipped += 1;
                    continue;
                }
            };

            let tight = spec
                .rasterize(&mut canvas, &colors.rings)
                .clamp_to(cfg.img_w, cfg.img_h);
            let mut annotation = bbox::annotate(tight, cfg.class_id, cfg.img_w, cfg.img_h, 0.0);

            // The box is fixed before augmentation; a warp may relocate
            // pixels it no longer covers. Strict mode rebuilds it instead.
            let applied = augment::apply(&mut rng, &mut canvas, &cfg.augment);
            if cfg.recompute_bbox_after_warp {
                if let Some(projection) = applied.warp {
                    let warped = augment::warp_bbox(&tight, &projection, cfg.img_w, cfg.img_h);
                    annotation = bbox::annotate(warped, cfg.class_id, cfg.img_w, cfg.img_h, 0.0);
                }
            }

            if !annotation.is_valid() {
                stats.skipped += 1;
                continue;
            }

            let stem = format!("hotspot_{:05}", stats.generated);
            if let Err(err) = dirs.write_pair(&stem, &canvas, &annotation) {
                warn!("failed to write {stem}: {err:#}");
                stats.failed += 1;
                continue;
            }

            stats.generated += 1;
            if stats.generated % 100 == 0 {
                info!("generated {}/{} ring images", stats.generated, cfg.count);
            }
        }

        if stats.generated < cfg.count {
            warn!(
                "ring run fell short: {}/{} images after {budget} attempts",
                stats.generated, cfg.count
            );
        }

        io::write_summary(
            &cfg.out_dir,
            &RunSummary {
                schema: "v1",
                config: cfg,
                requested: cfg.count,
                generated: stats.generated,
                skipped: stats.skipped,
                failed: stats.failed,
            },
        )?;
        Ok(stats)
    }
}

/// The four polygon classes, in class-id order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeClass {
    Rectangle,
    Square,
    Circle,
    Triangle,
}

impl ShapeClass {
    pub const ALL: [ShapeClass; 4] = [
        ShapeClass::Rectangle,
        ShapeClass::Square,
        ShapeClass::Circle,
        ShapeClass::Triangle,
    ];

    pub fn class_id(self) -> u32 {
        self as u32
    }

    /// Capitalized subdirectory name under `images/` and `labels/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            ShapeClass::Rectangle => "Rectangle",
            ShapeClass::Square => "Square",
            ShapeClass::Circle => "Circle",
            ShapeClass::Triangle => "Triangle",
        }
    }

    /// Lowercase file-stem prefix.
    pub fn stem(self) -> &'static str {
        match self {
            ShapeClass::Rectangle => "rectangle",
            ShapeClass::Square => "square",
            ShapeClass::Circle => "circle",
            ShapeClass::Triangle => "triangle",
        }
    }

    fn sample<R: Rng>(self, rng: &mut R, width: u32, height: u32, sizes: SizeRange) -> ShapeSpec {
        match self {
            ShapeClass::Rectangle => solver::sample_rectangle(rng, width, height, sizes),
            ShapeClass::Square => solver::sample_square(rng, width, height, sizes),
            ShapeClass::Circle => solver::sample_circle(rng, width, height, sizes),
            ShapeClass::Triangle => solver::sample_triangle(rng, width, height, sizes),
        }
    }
}

/// Generates one sub-dataset per polygon class under
/// `<out_dir>/{images,labels}/<Class>`.
pub struct ShapeDatasetGenerator {
    pub cfg: ShapeDatasetCfg,
}

impl ShapeDatasetGenerator {
    pub fn new(cfg: ShapeDatasetCfg) -> Self {
        Self { cfg }
    }

    pub fn run(&self) -> anyhow::Result<RunStats> {
        let cfg = &self.cfg;
        cfg.sizes.validate(cfg.img_w, cfg.img_h)?;

        let budget = cfg.per_class_count * 2;
        let mut stats = RunStats::default();

        for (class_idx, class) in ShapeClass::ALL.into_iter().enumerate() {
            info!(
                "generating {} images for class {} (id {})",
                cfg.per_class_count,
                class.dir_name(),
                class.class_id()
            );
            let dirs = DatasetDirs::create(&cfg.out_dir, class.dir_name())?;

            let mut generated = 0usize;
            for attempt in 0..budget {
                if generated >= cfg.per_class_count {
                    break;
                }
                // Per-class index offset keeps the substreams disjoint.
                let index = (class_idx * budget + attempt) as u64;
                let mut rng = substream(cfg.seed, index);

                let colors = ShapeColors::new(&mut rng);
                let mut canvas = RgbImage::from_pixel(cfg.img_w, cfg.img_h, colors.background);

                let spec = class.sample(&mut rng, cfg.img_w, cfg.img_h, cfg.sizes);
                let tight = spec.rasterize(&mut canvas, &[colors.foreground]);
                let annotation = bbox::annotate(
                    tight,
                    class.class_id(),
                    cfg.img_w,
                    cfg.img_h,
                    cfg.pad_fraction,
                );

                if !annotation.is_valid() {
                    stats.skipped += 1;
                    continue;
                }

                let stem = format!("{}_{:04}", class.stem(), generated + 1);
                if let Err(err) = dirs.write_pair(&stem, &canvas, &annotation) {
                    warn!("failed to write {stem}: {err:#}");
                    stats.failed += 1;
                    continue;
                }

                generated += 1;
                stats.generated += 1;
                if generated % 100 == 0 {
                    info!(
                        "  {}/{} {} images",
                        generated,
                        cfg.per_class_count,
                        class.stem()
                    );
                }
            }

            if generated < cfg.per_class_count {
                warn!(
                    "{} class fell short: {}/{} images",
                    class.dir_name(),
                    generated,
                    cfg.per_class_count
                );
            }
        }

        io::write_summary(
            &cfg.out_dir,
            &RunSummary {
                schema: "v1",
                config: cfg,
                requested: cfg.per_class_count * ShapeClass::ALL.len(),
                generated: stats.generated,
                skipped: stats.skipped,
                failed: stats.failed,
            },
        )?;
        Ok(stats)
    }
}
