//! Writing the dashboard and its assets to disk
//!
//! The page links to `Whitepapers/` and `visuals/` relatively, so every
//! directory that gets a copy of the page also gets a fresh mirror of those
//! asset directories.

use crate::config::{DashboardConfig, DASHBOARD_FILE, VISUALS_DIR, WHITEPAPERS_DIR};
use crate::error::{DashboardError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const ASSET_DIRS: &[&str] = &[WHITEPAPERS_DIR, VISUALS_DIR];

/// Write `html` to every configured location. Returns the files written, in
/// order: root copy, `reports/` copy, then the extra output copy if any.
pub fn publish(html: &str, config: &DashboardConfig) -> Result<Vec<PathBuf>> {
    let root = &config.data_dir;
    let mut written = Vec::new();

    let root_output = root.join(DASHBOARD_FILE);
    write_file(&root_output, html)?;
    written.push(root_output);

    let reports_dir = config.reports_dir();
    create_dir(&reports_dir)?;
    mirror_assets(root, &reports_dir)?;
    let reports_output = reports_dir.join(DASHBOARD_FILE);
    write_file(&reports_output, html)?;
    written.push(reports_output);

    if let Some(out_dir) = config.output_path() {
        create_dir(&out_dir)?;
        if same_dir(&out_dir, root) || same_dir(&out_dir, &reports_dir) {
            debug!("Output dir {} already has a copy; skipping", out_dir.display());
        } else {
            mirror_assets(root, &out_dir)?;
            let target = out_dir.join(DASHBOARD_FILE);
            write_file(&target, html)?;
            written.push(target);
        }
    }

    info!("Published {} dashboard copies", written.len());
    Ok(written)
}

/// Mirror each asset directory under `root` into `dest`.
pub fn mirror_assets(root: &Path, dest: &Path) -> Result<()> {
    for name in ASSET_DIRS {
        mirror_dir(&root.join(name), &dest.join(name))?;
    }
    Ok(())
}

/// Replace `dst` with a full copy of `src`.
///
/// Returns `false` without touching anything when `src` does not exist or
/// is `dst` itself. The old copy is removed first so no stale files survive.
pub fn mirror_dir(src: &Path, dst: &Path) -> Result<bool> {
    if !src.is_dir() || same_dir(src, dst) {
        return Ok(false);
    }

    if dst.exists() {
        fs::remove_dir_all(dst).map_err(|e| DashboardError::io(dst, e))?;
    }
    create_dir(dst)?;

    let mut files = 0usize;
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            DashboardError::io(path, e.into())
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| DashboardError::Config(e.to_string()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            create_dir(&target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| DashboardError::io(&target, e))?;
            files += 1;
        }
    }

    debug!("Mirrored {} files {} -> {}", files, src.display(), dst.display());
    Ok(true)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| DashboardError::io(path, e))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| DashboardError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(root: &Path, output_dir: Option<&str>) -> DashboardConfig {
        DashboardConfig {
            data_dir: root.to_path_buf(),
            output_dir: output_dir.map(PathBuf::from),
            ..DashboardConfig::default()
        }
    }

    fn seed_assets(root: &Path) {
        let wp = root.join(WHITEPAPERS_DIR);
        fs::create_dir_all(wp.join("archive")).unwrap();
        fs::write(wp.join("A.pdf"), b"%PDF-a").unwrap();
        fs::write(wp.join("archive").join("old.pdf"), b"%PDF-old").unwrap();
        let vis = root.join(VISUALS_DIR);
        fs::create_dir_all(&vis).unwrap();
        fs::write(vis.join("logo.png"), b"png").unwrap();
    }

    // ==========================================================================
    // OUTPUT LOCATIONS
    // ==========================================================================

    #[test]
    fn test_writes_root_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let written = publish("<html></html>", &config_in(dir.path(), None)).unwrap();

        assert_eq!(
            written,
            vec![
                dir.path().join(DASHBOARD_FILE),
                dir.path().join("reports").join(DASHBOARD_FILE)
            ]
        );
        for path in &written {
            assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
        }
    }

    #[test]
    fn test_output_dir_gets_copy_and_assets() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());
        let written = publish("x", &config_in(dir.path(), Some("site"))).unwrap();

        assert_eq!(written.len(), 3);
        let site = dir.path().join("site");
        assert!(site.join(DASHBOARD_FILE).is_file());
        assert!(site.join(WHITEPAPERS_DIR).join("A.pdf").is_file());
        assert!(site.join(WHITEPAPERS_DIR).join("archive").join("old.pdf").is_file());
        assert!(site.join(VISUALS_DIR).join("logo.png").is_file());
        assert!(dir.path().join("reports").join(VISUALS_DIR).join("logo.png").is_file());
    }

    #[test]
    fn test_output_dir_equal_to_reports_not_duplicated() {
        let dir = tempfile::tempdir().unwrap();
        let written = publish("x", &config_in(dir.path(), Some("reports"))).unwrap();
        assert_eq!(written.len(), 2);

        let written = publish("x", &config_in(dir.path(), Some("./reports/"))).unwrap();
        assert_eq!(written.len(), 2);
    }

    #[test]
    fn test_output_dir_equal_to_root_not_duplicated() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());
        let written = publish("x", &config_in(dir.path(), Some("."))).unwrap();

        assert_eq!(
            written,
            vec![
                dir.path().join(DASHBOARD_FILE),
                dir.path().join("reports").join(DASHBOARD_FILE)
            ]
        );
        assert!(dir.path().join(WHITEPAPERS_DIR).join("A.pdf").is_file());
    }

    #[test]
    fn test_output_dir_equal_to_reports_mirrors_once() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());
        let reports_wp = dir.path().join("reports").join(WHITEPAPERS_DIR);
        fs::create_dir_all(&reports_wp).unwrap();
        fs::write(reports_wp.join("Retired.pdf"), b"stale").unwrap();

        publish("x", &config_in(dir.path(), Some("reports"))).unwrap();
        assert!(reports_wp.join("A.pdf").is_file());
        assert!(!reports_wp.join("Retired.pdf").exists());
    }

    #[test]
    fn test_republish_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());
        let config = config_in(dir.path(), None);
        publish("same", &config).unwrap();
        let first = fs::read(dir.path().join("reports").join(DASHBOARD_FILE)).unwrap();
        publish("same", &config).unwrap();
        let second = fs::read(dir.path().join("reports").join(DASHBOARD_FILE)).unwrap();
        assert_eq!(first, second);
    }

    // ==========================================================================
    // ASSET MIRRORING
    // ==========================================================================

    #[test]
    fn test_mirror_replaces_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());
        let dst = dir.path().join("out").join(WHITEPAPERS_DIR);
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("Retired.pdf"), b"stale").unwrap();

        assert!(mirror_dir(&dir.path().join(WHITEPAPERS_DIR), &dst).unwrap());
        assert!(dst.join("A.pdf").is_file());
        assert!(!dst.join("Retired.pdf").exists());
    }

    #[test]
    fn test_mirror_missing_source_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("out");
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("keep.txt"), b"k").unwrap();

        assert!(!mirror_dir(&dir.path().join("nothing"), &dst).unwrap());
        assert!(dst.join("keep.txt").is_file());
    }

    #[test]
    fn test_mirror_onto_itself_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());
        let wp = dir.path().join(WHITEPAPERS_DIR);
        assert!(!mirror_dir(&wp, &wp).unwrap());
        assert!(wp.join("A.pdf").is_file());
    }
}
