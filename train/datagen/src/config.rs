use serde::Serialize;
use targets::augment::AugmentCfg;
use targets::solver::{RADIUS_FACTORS, SizeRange};

/// Ring ("hotspot") dataset run settings.
#[derive(Clone, Debug, Serialize)]
pub struct RingDatasetCfg {
    pub out_dir: String, // "hotspot_dataset"
    pub img_w: u32,
    pub img_h: u32,
    pub count: usize,
    pub ring_count: usize,
    pub radius_factors: Vec<f32>, // descending
    pub class_id: u32,
    pub seed: u64,
    pub augment: AugmentCfg,
    /// Rebuild the annotation from the warped box instead of keeping the
    /// pre-warp one. Off by default: the shipped datasets carry the pre-warp
    /// boxes, and retraining against them needs the same labels.
    pub recompute_bbox_after_warp: bool,
}

impl Default for RingDatasetCfg {
    fn default() -> Self {
        Self {
            out_dir: "hotspot_dataset".to_string(),
            img_w: 640,
            img_h: 640,
            count: 5000,
            ring_count: 5,
            radius_factors: RADIUS_FACTORS.to_vec(),
            class_id: 0,
            seed: 42,
            augment: AugmentCfg::default(),
            recompute_bbox_after_warp: false,
        }
    }
}

/// Polygon dataset run settings, one sub-dataset per shape class.
#[derive(Clone, Debug, Serialize)]
pub struct ShapeDatasetCfg {
    pub out_dir: String, // "dataset_2d_shapes"
    pub img_w: u32,
    pub img_h: u32,
    pub per_class_count: usize,
    pub sizes: SizeRange,
    pub pad_fraction: f64, // box padding per side, fraction of the tight extent
    pub seed: u64,
}

impl Default for ShapeDatasetCfg {
    fn default() -> Self {
        Self {
            out_dir: "dataset_2d_shapes".to_string(),
            img_w: 640,
            img_h: 640,
            per_class_count: 5000,
            sizes: SizeRange::new(50, 250),
            pad_fraction: 0.07,
            seed: 42,
        }
    }
}

/// Train/val partitioner settings.
#[derive(Clone, Debug, Serialize)]
pub struct SplitCfg {
    pub images_dir: String,
    pub labels_dir: String,
    pub out_dir: String,
    pub train_ratio: f64,
    pub seed: u64,
}

impl Default for SplitCfg {
    fn default() -> Self {
        Self {
            images_dir: "hotspot_dataset/images/train".to_string(),
            labels_dir: "hotspot_dataset/labels/train".to_string(),
            out_dir: "yolo_hotspot_data".to_string(),
            train_ratio: 0.8,
            seed: 42,
        }
    }
}
