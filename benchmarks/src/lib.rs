//! Shared fixtures for xcpack benchmarks

use std::fs;
use std::path::Path;

use xcpack_core::OutputArtifact;

/// Placeholder-heavy stand-in for a real `project.pbxproj`
pub const PBXPROJ_TEMPLATE: &str = include_str!("project.pbxproj.in");

/// Relative path of the `i`th synthetic output file; every `library_every`th is a dylib
fn synthetic_path(i: usize, library_every: usize) -> String {
    if library_every > 0 && i % library_every == 0 {
        format!("Dotnet/lib{}.dylib", i)
    } else {
        format!("Content/Chunk_{}/asset_{}.flax", i / 64, i)
    }
}

/// In-memory artifact list shaped like a cooked build
pub fn synthetic_artifacts(count: usize, library_every: usize) -> Vec<OutputArtifact> {
    let data_dir = Path::new("/builds/iOS/FlaxGame/Data");
    (0..count)
        .filter_map(|i| {
            OutputArtifact::from_path(data_dir, &data_dir.join(synthetic_path(i, library_every)))
        })
        .collect()
}

/// Write a synthetic data folder with `count` small files
pub fn write_synthetic_data(data_dir: &Path, count: usize, library_every: usize) -> std::io::Result<()> {
    for i in 0..count {
        let path = data_dir.join(synthetic_path(i, library_every));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, b"cooked")?;
    }
    Ok(())
}
