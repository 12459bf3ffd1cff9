//! Timestamped copies of the persisted state.

use chrono::{Local, NaiveDateTime};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::error::{LedgerError, Result};

#[derive(Debug, Clone)]
pub struct BackupService {
    backup_dir: PathBuf,
}

impl BackupService {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copies `source` (a file or a directory tree) into the backup directory
    /// as `backup_<YYYYMMDD_HHMMSS>[.ext]`.
    pub fn snapshot(&self, source: &Path) -> Result<PathBuf> {
        self.snapshot_at(source, Local::now().naive_local())
    }

    pub fn snapshot_at(&self, source: &Path, taken_at: NaiveDateTime) -> Result<PathBuf> {
        let result = self.copy_snapshot(source, taken_at);
        match &result {
            Ok(path) => info!(source = %source.display(), backup = %path.display(), "backup created"),
            Err(e) => error!(source = %source.display(), error = %e, "backup failed"),
        }
        result
    }

    fn copy_snapshot(&self, source: &Path, taken_at: NaiveDateTime) -> Result<PathBuf> {
        let meta = fs::metadata(source)
            .map_err(|e| LedgerError::io(format!("cannot back up {}", source.display()), e))?;

        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            LedgerError::io(format!("failed to create {}", self.backup_dir.display()), e)
        })?;

        let stem = format!("backup_{}", taken_at.format("%Y%m%d_%H%M%S"));

        if meta.is_dir() {
            let target = self.unique_path(&stem, None);
            // the backup directory may live inside the tree being copied
            let skip = fs::canonicalize(&self.backup_dir).ok();
            copy_tree(source, &target, skip.as_deref())?;
            Ok(target)
        } else {
            let ext = source.extension().and_then(|e| e.to_str());
            let target = self.unique_path(&stem, ext);
            fs::copy(source, &target).map_err(|e| {
                LedgerError::io(format!("failed to write {}", target.display()), e)
            })?;
            Ok(target)
        }
    }

    fn unique_path(&self, stem: &str, ext: Option<&str>) -> PathBuf {
        let name = |suffix: String| match ext {
            Some(ext) => format!("{}{}.{}", stem, suffix, ext),
            None => format!("{}{}", stem, suffix),
        };

        let mut candidate = self.backup_dir.join(name(String::new()));
        let mut n = 1;
        while candidate.exists() {
            candidate = self.backup_dir.join(name(format!("_{}", n)));
            n += 1;
        }
        candidate
    }

    /// Existing backups, newest first.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LedgerError::io(
                    format!("failed to read {}", self.backup_dir.display()),
                    e,
                ));
            }
        };

        let mut backups: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("backup_"))
            })
            .collect();
        backups.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        Ok(backups)
    }
}

fn copy_tree(from: &Path, to: &Path, skip: Option<&Path>) -> Result<()> {
    fs::create_dir_all(to)
        .map_err(|e| LedgerError::io(format!("failed to create {}", to.display()), e))?;

    let entries = fs::read_dir(from)
        .map_err(|e| LedgerError::io(format!("failed to read {}", from.display()), e))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| LedgerError::io(format!("failed to read {}", from.display()), e))?;
        let path = entry.path();
        let target = to.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| LedgerError::io(format!("failed to stat {}", path.display()), e))?;

        if file_type.is_symlink() {
            warn!(path = %path.display(), "symlink skipped in backup");
            continue;
        }
        if file_type.is_dir() {
            if skip.is_some() && fs::canonicalize(&path).ok().as_deref() == skip {
                continue;
            }
            copy_tree(&path, &target, skip)?;
        } else {
            fs::copy(&path, &target).map_err(|e| {
                LedgerError::io(format!("failed to write {}", target.display()), e)
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn file_snapshot_is_timestamped_copy() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("payroll.json");
        fs::write(&source, "{\"admins\": []}").unwrap();
        let backups = BackupService::new(dir.path().join("backups"));

        let path = backups.snapshot_at(&source, at(9, 5, 7)).unwrap();

        assert_eq!(path, dir.path().join("backups").join("backup_20240315_090507.json"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"admins\": []}");
        assert_eq!(fs::read_to_string(&source).unwrap(), "{\"admins\": []}");
    }

    #[test]
    fn same_second_snapshots_get_distinct_names() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("payroll.json");
        fs::write(&source, "{}").unwrap();
        let backups = BackupService::new(dir.path().join("backups"));

        let first = backups.snapshot_at(&source, at(9, 0, 0)).unwrap();
        let second = backups.snapshot_at(&source, at(9, 0, 0)).unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("backup_20240315_090000_1.json"));
        assert_eq!(backups.list().unwrap().len(), 2);
    }

    #[test]
    fn directory_snapshot_skips_nested_backup_dir() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(data.join("sub")).unwrap();
        fs::write(data.join("payroll.json"), "{}").unwrap();
        fs::write(data.join("sub").join("payroll_history.csv"), "EmpID\n").unwrap();

        let backups = BackupService::new(data.join("backups"));
        let first = backups.snapshot_at(&data, at(10, 0, 0)).unwrap();
        let second = backups.snapshot_at(&data, at(11, 0, 0)).unwrap();

        assert!(first.join("payroll.json").exists());
        assert!(first.join("sub").join("payroll_history.csv").exists());
        assert!(!second.join("backups").exists());
        assert_eq!(backups.list().unwrap(), vec![second, first]);
    }

    #[cfg(unix)]
    #[test]
    fn directory_snapshot_skips_symlinks() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(data.join("sub")).unwrap();
        fs::write(data.join("payroll.json"), "{}").unwrap();
        // a link back to the tree would otherwise recurse forever
        std::os::unix::fs::symlink(&data, data.join("sub").join("loop")).unwrap();

        let backups = BackupService::new(dir.path().join("backups"));
        let copy = backups.snapshot_at(&data, at(12, 0, 0)).unwrap();

        assert!(copy.join("payroll.json").exists());
        assert!(copy.join("sub").is_dir());
        assert!(!copy.join("sub").join("loop").exists());
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempdir().unwrap();
        let backups = BackupService::new(dir.path().join("backups"));
        let err = backups
            .snapshot_at(&dir.path().join("absent.json"), at(0, 0, 0))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Io { .. }));
    }

    #[test]
    fn list_without_backup_dir_is_empty() {
        let dir = tempdir().unwrap();
        let backups = BackupService::new(dir.path().join("never-created"));
        assert!(backups.list().unwrap().is_empty());
    }
}
