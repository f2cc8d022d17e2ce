use log::info;

use crate::config::{RingDatasetCfg, ShapeDatasetCfg, SplitCfg};
use crate::generator::{RingDatasetGenerator, ShapeDatasetGenerator};

mod config;
mod generator;
mod io;
mod palette;
mod split;

fn main() -> anyhow::Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let stats = RingDatasetGenerator::new(RingDatasetCfg::default()).run()?;
    info!(
        "ring dataset done: {} generated, {} skipped, {} failed",
        stats.generated, stats.skipped, stats.failed
    );

    let stats = ShapeDatasetGenerator::new(ShapeDatasetCfg::default()).run()?;
    info!(
        "shape dataset done: {} generated, {} skipped, {} failed",
        stats.generated, stats.skipped, stats.failed
    );

    let stats = split::partition(&SplitCfg::default())?;
    info!(
        "split done: {} train / {} val pairs copied",
        stats.train_copied, stats.val_copied
    );

    Ok(())
}
