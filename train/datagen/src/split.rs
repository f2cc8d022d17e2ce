use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};
use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};
use serde::Serialize;

use crate::{
    config::SplitCfg,
    io::{self, DatasetDirs},
};

/// Outcome counters for one partition run.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct SplitStats {
    pub discovered: usize,
    pub train_assigned: usize,
    pub val_assigned: usize,
    pub train_copied: usize,
    pub val_copied: usize,
    pub missing_labels: usize,
    pub copy_failures: usize,
}

#[derive(Serialize)]
struct SplitSummary<'a> {
    schema: &'static str,
    config: &'a SplitCfg,
    #[serde(flatten)]
    stats: SplitStats,
}

/// Split a flat image/label dataset into `train` and `val` subsets.
///
/// Images are discovered non-recursively, shuffled with a generator seeded
/// from the config, and cut at `floor(train_ratio * n)`. The shuffle is
/// reproducible for a fixed directory enumeration; rerunning over the same
/// tree yields the same membership and overwrites in place. Pairs with a
/// missing label are skipped with a warning, and a failed copy is counted
/// without aborting the run.
pub fn partition(cfg: &SplitCfg) -> anyhow::Result<SplitStats> {
    let images_dir = Path::new(&cfg.images_dir);
    let labels_dir = Path::new(&cfg.labels_dir);
    anyhow::ensure!(
        images_dir.is_dir(),
        "source images directory not found: {}",
        images_dir.display()
    );
    anyhow::ensure!(
        labels_dir.is_dir(),
        "source labels directory not found: {}",
        labels_dir.display()
    );

    let train = DatasetDirs::create(&cfg.out_dir, "train")?;
    let val = DatasetDirs::create(&cfg.out_dir, "val")?;

    let mut files = io::list_images(images_dir)?;
    anyhow::ensure!(
        !files.is_empty(),
        "no images found in {}",
        images_dir.display()
    );
    info!("found {} images to split", files.len());

    let mut rng = SmallRng::seed_from_u64(cfg.seed);
    files.shuffle(&mut rng);

    let split_index = ((files.len() as f64 * cfg.train_ratio) as usize).min(files.len());
    let (train_files, val_files) = files.split_at(split_index);
    info!(
        "splitting into {} train and {} val images",
        train_files.len(),
        val_files.len()
    );

    let mut stats = SplitStats {
        discovered: files.len(),
        train_assigned: train_files.len(),
        val_assigned: val_files.len(),
        ..SplitStats::default()
    };
    stats.train_copied = copy_pairs(train_files, labels_dir, &train, &mut stats);
    stats.val_copied = copy_pairs(val_files, labels_dir, &val, &mut stats);

    io::write_summary(
        &cfg.out_dir,
        &SplitSummary {
            schema: "v1",
            config: cfg,
            stats,
        },
    )?;
    Ok(stats)
}

fn copy_pairs(
    files: &[PathBuf],
    labels_dir: &Path,
    dest: &DatasetDirs,
    stats: &mut SplitStats,
) -> usize {
    let mut copied = 0;
    for img_path in files {
        let Some(stem) = img_path.file_stem().and_then(|s| s.to_str()) else {
            warn!("unusable image name {}, skipping", img_path.display());
            stats.copy_failures += 1;
            continue;
        };

        let label_path = labels_dir.join(format!("{stem}.txt"));
        if !label_path.exists() {
            warn!("label not found for {}, skipping", img_path.display());
            stats.missing_labels += 1;
            continue;
        }

        let outcome = fs::copy(img_path, dest.images.join(format!("{stem}.png")))
            .and_then(|_| fs::copy(&label_path, dest.labels.join(format!("{stem}.txt"))));
        match outcome {
            Ok(_) => copied += 1,
            Err(err) => {
                warn!("failed to copy pair {stem}: {err}");
                stats.copy_failures += 1;
            }
        }
    }
    copied
}
