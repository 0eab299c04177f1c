//! iOS platform description
//!
//! Facts the cooker needs about the iOS target: where cooked data lands
//! inside the Xcode project, which files are native code, and which texture
//! formats the GPU can sample.

use std::path::{Path, PathBuf};

use crate::texture::{self, PixelFormat};

/// Name of the app target folder inside the Xcode project
pub const GAME_FOLDER: &str = "FlaxGame";
/// Cooked data folder inside [`GAME_FOLDER`]
pub const DATA_FOLDER: &str = "Data";
/// Template folder inside the platform tools directory
pub const TEMPLATE_FOLDER: &str = "Project";

/// Static description of the iOS platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub name: &'static str,
    pub display_name: &'static str,
    pub architecture: &'static str,
    /// .NET ahead-of-time compilation mode
    pub aot_mode: &'static str,
}

pub const IOS: Platform = Platform {
    name: "iOS",
    display_name: "iOS",
    architecture: "ARM64",
    aot_mode: "MonoAOTDynamic",
};

impl Platform {
    /// Whether the cooker should treat a file as native code.
    ///
    /// On iOS both extension-less executables and `.dylib`s qualify.
    pub fn is_native_code_file(&self, path: &Path) -> bool {
        match path.extension() {
            None => true,
            Some(ext) => ext.is_empty() || ext == "dylib",
        }
    }

    /// The pixel format a texture is cooked to on this platform
    pub fn texture_format(&self, format: PixelFormat) -> PixelFormat {
        // ETC and ASTC are not supported yet, so BC falls back to raw formats.
        texture::downgrade(format)
    }
}

/// Where things live in the build output folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Build output root, also the Xcode project root
    pub root: PathBuf,
    /// Cooked data, native and managed code: `<root>/FlaxGame/Data`
    pub data_dir: PathBuf,
    /// `<root>/FlaxGame.xcodeproj/project.pbxproj`
    pub project_file: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            data_dir: root.join(GAME_FOLDER).join(DATA_FOLDER),
            project_file: root
                .join(format!("{}.xcodeproj", GAME_FOLDER))
                .join("project.pbxproj"),
            root,
        }
    }
}

/// Template location inside a platform tools directory
pub fn template_dir(platform_tools_dir: &Path) -> PathBuf {
    platform_tools_dir.join(TEMPLATE_FOLDER)
}
