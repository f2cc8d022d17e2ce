use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use image::RgbImage;
use serde::Serialize;
use targets::bbox::Annotation;

/// Paired image/label directories for one dataset subset.
pub struct DatasetDirs {
    pub images: PathBuf,
    pub labels: PathBuf,
}

impl DatasetDirs {
    /// Create `images/<subset>` and `labels/<subset>` under `root`.
    pub fn create(root: &str, subset: &str) -> std::io::Result<Self> {
        let images = Path::new(root).join("images").join(subset);
        let labels = Path::new(root).join("labels").join(subset);
        fs::create_dir_all(&images)?;
        fs::create_dir_all(&labels)?;
        Ok(Self { images, labels })
    }

    /// Write `<stem>.png` plus its one-line `<stem>.txt` label.
    pub fn write_pair(&self, stem: &str, img: &RgbImage, ann: &Annotation) -> anyhow::Result<()> {
        img.save(self.images.join(format!("{stem}.png")))?;
        let mut file = File::create(self.labels.join(format!("{stem}.txt")))?;
        writeln!(file, "{ann}")?;
        Ok(())
    }
}

/// Non-recursive listing of `*.png` files in `dir`, in directory order.
pub fn list_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "png") && path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Persist a run record as pretty-printed JSON at `<root>/summary.json`.
pub fn write_summary<T: Serialize>(root: &str, summary: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(Path::new(root).join("summary.json"), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_pair_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let dirs = DatasetDirs::create(root, "train").unwrap();

        let img = RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let ann = Annotation {
            class_id: 0,
            x_center: 0.5,
            y_center: 0.5,
            width: 0.25,
            height: 0.25,
        };
        dirs.write_pair("hotspot_00000", &img, &ann).unwrap();

        assert!(dirs.images.join("hotspot_00000.png").is_file());
        let label = fs::read_to_string(dirs.labels.join("hotspot_00000.txt")).unwrap();
        assert_eq!(label, "0 0.500000 0.500000 0.250000 0.250000\n");
    }

    #[test]
    fn list_images_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join("b.png"), b"x").unwrap();
        fs::write(dir.path().join("c.txt"), b"x").unwrap();
        fs::write(dir.path().join("notes.md"), b"x").unwrap();

        let files = list_images(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(
            files
                .iter()
                .all(|p| p.extension().is_some_and(|e| e == "png"))
        );
    }

    #[test]
    fn summary_lands_at_root() {
        #[derive(Serialize)]
        struct Probe {
            schema: &'static str,
            generated: usize,
        }

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        write_summary(
            root,
            &Probe {
                schema: "v1",
                generated: 3,
            },
        )
        .unwrap();

        let raw = fs::read_to_string(dir.path().join("summary.json")).unwrap();
        assert!(raw.contains("\"schema\": \"v1\""));
        assert!(raw.contains("\"generated\": 3"));
    }
}
