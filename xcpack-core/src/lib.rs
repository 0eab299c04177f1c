//! xcpack Core Library
//!
//! This crate turns a cooked iOS game build into an Xcode project:
//! - Bundle identifier resolution and validation
//! - Xcode project template deployment
//! - Build output classification and project object graph generation
//! - `project.pbxproj` placeholder substitution
//! - Dynamic library install name fix-ups
//! - Texture format selection for iOS GPUs

pub mod bundle_id;
pub mod deploy;
pub mod error;
pub mod fixup;
pub mod object_id;
pub mod path_utils;
pub mod pipeline;
pub mod platform;
pub mod project_graph;
pub mod settings;
pub mod substitution;
pub mod texture;
pub mod tokens;

// Re-export commonly used types
pub use bundle_id::{app_name, resolve as resolve_bundle_identifier, BundleIdentifier};
pub use deploy::deploy;
pub use error::{FixupWarning, IdentifierProblem, PackagingError};
pub use fixup::{FixupCommand, FixupRunner, ProcessFixupRunner};
pub use object_id::{IdGenerator, ObjectId, RandomIds, SequentialIds};
pub use pipeline::{
    FilePackager, NoopPackager, PackagingPipeline, PackagingReport, PackagingResult,
};
pub use platform::{OutputLayout, Platform, IOS};
pub use project_graph::{
    discover_artifacts, ArtifactKind, OutputArtifact, ProjectGraph, ProjectGraphBuilder,
};
pub use settings::{PackagingSettings, SettingsError};
pub use substitution::{CoverageIssue, CoverageReport, SubstitutionEngine};
pub use texture::{downgrade as downgrade_texture_format, PixelFormat};
pub use tokens::TokenMap;
