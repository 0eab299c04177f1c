//! Template Project Deployer
//!
//! Copies the static Xcode project template shipped with the iOS platform
//! tools into the build output folder, overwriting whatever is there.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::PackagingError;

/// Copy `source_template_dir` recursively into `dest_dir`
pub fn deploy(source_template_dir: &Path, dest_dir: &Path) -> Result<(), PackagingError> {
    copy_tree(source_template_dir, dest_dir).map_err(|source| PackagingError::Deployment {
        from: source_template_dir.to_path_buf(),
        to: dest_dir.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        "Deployed project template {} -> {}",
        source_template_dir.display(),
        dest_dir.display()
    );
    Ok(())
}

fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    if !src.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("template directory not found: {}", src.display()),
        ));
    }

    fs::create_dir_all(dest)?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let rel_path = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let new_path = dest.join(rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&new_path)?;
        } else {
            if let Some(parent) = new_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &new_path)?;
        }
    }

    Ok(())
}
