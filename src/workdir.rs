//! Scoped working directory with interrupt-safe cleanup
//!
//! One install attempt gets one temporary directory that must not survive
//! the attempt under any exit path. Normal paths are covered by Drop; for
//! Ctrl-C every live directory is tracked in a process-global registry that
//! the signal handler drains before exiting with status 130.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tempfile::TempDir;

use crate::error::Result;

/// 128 + SIGINT
pub const INTERRUPT_EXIT_CODE: i32 = 130;

static CLEANUP_PATHS: OnceLock<Mutex<Vec<PathBuf>>> = OnceLock::new();

fn registry() -> &'static Mutex<Vec<PathBuf>> {
    CLEANUP_PATHS.get_or_init(|| Mutex::new(Vec::new()))
}

fn register(path: &Path) {
    if let Ok(mut paths) = registry().lock() {
        paths.push(path.to_path_buf());
    }
}

fn unregister(path: &Path) {
    if let Ok(mut paths) = registry().lock() {
        paths.retain(|p| p != path);
    }
}

/// Remove every registered directory and drain the registry. Called by the
/// interrupt handler while the workflow thread may still hold the guards.
fn remove_registered() {
    if let Ok(mut paths) = registry().lock() {
        for path in paths.drain(..) {
            let _ = std::fs::remove_dir_all(&path);
        }
    }
}

/// Install the Ctrl-C handler. Call once at startup, before any workdir
/// exists; a failure to install it is reported but does not abort the run.
pub fn install_interrupt_handler() {
    let result = ctrlc::set_handler(|| {
        remove_registered();
        eprintln!();
        eprintln!("Interrupted, temporary files removed");
        std::process::exit(INTERRUPT_EXIT_CODE);
    });
    if let Err(e) = result {
        eprintln!("warning: could not install interrupt handler: {e}");
    }
}

/// Absolute base for temporary directories, so they are never created under
/// the current working directory (e.g. when TMPDIR=tmp).
fn temp_dir_base() -> PathBuf {
    let t = std::env::temp_dir();
    if t.is_absolute() { t } else { PathBuf::from("/tmp") }
}

/// One install attempt's working directory
///
/// Removed when dropped and, through the registry, when the process is
/// interrupted while it is still alive.
pub struct ScopedWorkdir {
    dir: TempDir,
}

impl ScopedWorkdir {
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("dlsetup-")
            .tempdir_in(temp_dir_base())?;
        register(dir.path());
        Ok(ScopedWorkdir { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for ScopedWorkdir {
    fn drop(&mut self) {
        // Unregister first; the TempDir field removes the directory after this
        unregister(self.dir.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_workdir_removed_on_drop() {
        let workdir = ScopedWorkdir::create().unwrap();
        let path = workdir.path().to_path_buf();
        assert!(path.is_dir());
        drop(workdir);
        assert!(!path.exists());
    }

    #[test]
    #[serial]
    fn test_workdir_registered_while_alive() {
        let workdir = ScopedWorkdir::create().unwrap();
        let path = workdir.path().to_path_buf();
        assert!(registry().lock().unwrap().contains(&path));
        drop(workdir);
        assert!(!registry().lock().unwrap().contains(&path));
    }

    #[test]
    fn test_workdir_base_is_absolute() {
        assert!(temp_dir_base().is_absolute());
    }

    #[test]
    #[serial]
    fn test_workdir_survives_until_scope_end() {
        let outer;
        {
            let workdir = ScopedWorkdir::create().unwrap();
            std::fs::write(workdir.path().join("archive.zip"), b"payload").unwrap();
            outer = workdir.path().to_path_buf();
            assert!(outer.join("archive.zip").exists());
        }
        assert!(!outer.exists());
    }

    #[test]
    #[serial]
    fn test_remove_registered_releases_live_workdirs() {
        // What the interrupt handler runs while a guard is still alive
        let workdir = ScopedWorkdir::create().unwrap();
        let path = workdir.path().to_path_buf();
        std::fs::write(path.join("displaylink.zip"), b"partial").unwrap();

        remove_registered();

        assert!(!path.exists());
        assert!(registry().lock().unwrap().is_empty());
        // Dropping the guard afterwards must stay harmless
        drop(workdir);
        assert!(!path.exists());
    }
}
