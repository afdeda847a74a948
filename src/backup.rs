use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::{distr::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

const VARIANT_TOKEN_LEN: usize = 8;

/// What the backup pass did for this run.
#[derive(Debug, PartialEq, Eq)]
pub enum BackupOutcome {
    /// First backup for this provider/suffix key.
    Created(PathBuf),
    /// Content identical to the canonical copy; nothing written.
    Unchanged,
    /// Content changed; a new variant was appended next to the canonical
    /// copy.
    Variant(PathBuf),
}

/// Back up the downloaded image under `dir`, keyed by provider id and an
/// optional suffix. The canonical file is written once and never
/// overwritten; runs whose content differs append a token-suffixed
/// variant, so distinct images accumulate and identical ones do not.
pub fn backup_image(
    tmp: &Path,
    provider_id: &str,
    dir: &Path,
    suffix: Option<&str>,
) -> Result<BackupOutcome> {
    let base_name = match suffix {
        Some(suffix) => format!("{provider_id}_{suffix}"),
        None => provider_id.to_string(),
    };
    let canonical = dir.join(&base_name);

    if !canonical.exists() {
        fs::copy(tmp, &canonical)
            .with_context(|| format!("copying backup to {}", canonical.display()))?;
        log::info!("backup created: {}", canonical.display());
        return Ok(BackupOutcome::Created(canonical));
    }

    if hash_file(&canonical)? == hash_file(tmp)? {
        log::debug!("backup unchanged: {}", canonical.display());
        return Ok(BackupOutcome::Unchanged);
    }

    let variant = dir.join(format!("{base_name}_{}", variant_token()));
    fs::copy(tmp, &variant)
        .with_context(|| format!("copying backup to {}", variant.display()))?;
    log::info!("backup variant created: {}", variant.display());
    Ok(BackupOutcome::Variant(variant))
}

fn hash_file(path: &Path) -> Result<[u8; 32]> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hasher.finalize().into())
}

fn variant_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(VARIANT_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_tmp(dir: &Path, bytes: &[u8]) -> PathBuf {
        let path = dir.join("download");
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_first_run_creates_canonical() {
        let scratch = TempDir::new().unwrap();
        let backups = TempDir::new().unwrap();
        let tmp = write_tmp(scratch.path(), b"day one");

        let outcome = backup_image(&tmp, "apod", backups.path(), None).unwrap();

        assert_eq!(
            outcome,
            BackupOutcome::Created(backups.path().join("apod"))
        );
        assert_eq!(fs::read(backups.path().join("apod")).unwrap(), b"day one");
    }

    #[test]
    fn test_identical_content_is_idempotent() {
        let scratch = TempDir::new().unwrap();
        let backups = TempDir::new().unwrap();
        let tmp = write_tmp(scratch.path(), b"same bytes");

        backup_image(&tmp, "apod", backups.path(), None).unwrap();
        let outcome = backup_image(&tmp, "apod", backups.path(), None).unwrap();

        assert_eq!(outcome, BackupOutcome::Unchanged);
        // exactly one file on disk after two runs
        assert_eq!(fs::read_dir(backups.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_changed_content_appends_variant() {
        let scratch = TempDir::new().unwrap();
        let backups = TempDir::new().unwrap();

        let first = write_tmp(scratch.path(), b"day one");
        backup_image(&first, "apod", backups.path(), None).unwrap();

        let second = write_tmp(scratch.path(), b"day two");
        let outcome = backup_image(&second, "apod", backups.path(), None).unwrap();

        let variant = match outcome {
            BackupOutcome::Variant(path) => path,
            other => panic!("expected variant, got {other:?}"),
        };
        assert!(variant
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("apod_"));
        assert_eq!(fs::read(&variant).unwrap(), b"day two");
        // the canonical file keeps its original bytes
        assert_eq!(fs::read(backups.path().join("apod")).unwrap(), b"day one");
        assert_eq!(fs::read_dir(backups.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_suffix_keys_are_independent() {
        let scratch = TempDir::new().unwrap();
        let backups = TempDir::new().unwrap();
        let tmp = write_tmp(scratch.path(), b"bytes");

        backup_image(&tmp, "bing", backups.path(), Some("4k")).unwrap();

        assert!(backups.path().join("bing_4k").exists());
        assert!(!backups.path().join("bing").exists());

        // same content under the suffixed key: still idempotent
        let outcome = backup_image(&tmp, "bing", backups.path(), Some("4k")).unwrap();
        assert_eq!(outcome, BackupOutcome::Unchanged);
    }
}
