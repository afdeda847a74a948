use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Which destinations were written and which were skipped.
#[derive(Debug, Default)]
pub struct DeployReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Copy the downloaded image into every existing target directory as
/// `<provider_id>`, overwriting the previous image (the "current
/// wallpaper" slot). Missing directories are skipped, never created; a
/// failed write to one target does not stop the others.
pub fn deploy(tmp: &Path, provider_id: &str, targets: &[PathBuf]) -> DeployReport {
    let mut report = DeployReport::default();

    for target in targets {
        if !target.is_dir() {
            log::warn!("skipping missing destination {}", target.display());
            report.skipped.push(target.clone());
            continue;
        }

        let dest = target.join(provider_id);
        match install(tmp, &dest) {
            Ok(()) => {
                log::info!("installed {}", dest.display());
                report.written.push(dest);
            }
            Err(err) => {
                log::error!("failed to install {}: {err:#}", dest.display());
                report.skipped.push(target.clone());
            }
        }
    }

    report
}

/// Copy via a sibling temp file plus rename so readers never observe a
/// partially-written image under the final name.
fn install(src: &Path, dest: &Path) -> Result<()> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let bytes = fs::read(src).with_context(|| format!("reading {}", src.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(&bytes)?;
    tmp.persist(dest)
        .with_context(|| format!("renaming into {}", dest.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_to_all_existing_targets() {
        let scratch = TempDir::new().unwrap();
        let tmp = scratch.path().join("download");
        fs::write(&tmp, b"img").unwrap();

        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let targets = vec![a.path().to_path_buf(), b.path().to_path_buf()];

        let report = deploy(&tmp, "apod", &targets);

        assert_eq!(report.written.len(), 2);
        assert!(report.skipped.is_empty());
        assert_eq!(fs::read(a.path().join("apod")).unwrap(), b"img");
        assert_eq!(fs::read(b.path().join("apod")).unwrap(), b"img");
    }

    #[test]
    fn test_missing_target_skipped_others_written() {
        let scratch = TempDir::new().unwrap();
        let tmp = scratch.path().join("download");
        fs::write(&tmp, b"img").unwrap();

        let missing = scratch.path().join("does-not-exist");
        let existing = TempDir::new().unwrap();
        let targets = vec![missing.clone(), existing.path().to_path_buf()];

        let report = deploy(&tmp, "bing", &targets);

        assert_eq!(report.skipped, vec![missing.clone()]);
        assert_eq!(report.written.len(), 1);
        assert!(existing.path().join("bing").exists());
        // the missing directory was not created
        assert!(!missing.exists());
    }

    #[test]
    fn test_overwrites_previous_image() {
        let scratch = TempDir::new().unwrap();
        let tmp = scratch.path().join("download");
        fs::write(&tmp, b"new image").unwrap();

        let target = TempDir::new().unwrap();
        fs::write(target.path().join("noaa"), b"old image").unwrap();

        let report = deploy(&tmp, "noaa", &[target.path().to_path_buf()]);

        assert_eq!(report.written.len(), 1);
        assert_eq!(fs::read(target.path().join("noaa")).unwrap(), b"new image");
    }

    #[test]
    fn test_no_targets_yields_empty_report() {
        let scratch = TempDir::new().unwrap();
        let tmp = scratch.path().join("download");
        fs::write(&tmp, b"img").unwrap();

        let report = deploy(&tmp, "epod", &[]);

        assert!(report.written.is_empty());
        assert!(report.skipped.is_empty());
    }
}
