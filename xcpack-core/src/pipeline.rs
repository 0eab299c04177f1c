//! iOS Packaging Pipeline
//!
//! Turns a cooked build output folder into a ready-to-build Xcode project.
//! Steps run strictly in order and the first terminal error abandons the run:
//!
//! 1. resolve the bundle identifier
//! 2. deploy the Xcode project template into the output folder
//! 3. seed the token map with settings values
//! 4. rename the bundled .NET license files
//! 5. scan the data folder and build the project graph
//! 6. run `install_name_tool` on every dylib (failures are only logged)
//! 7. substitute the tokens into `project.pbxproj`
//! 8. hand over to the cooker's file packaging step unless skipped

use std::fmt;
use std::fs;
use std::path::Path;

use crate::bundle_id::{self, BundleIdentifier};
use crate::deploy::deploy;
use crate::error::{FixupWarning, PackagingError};
use crate::fixup::{self, FixupRunner};
use crate::object_id::RandomIds;
use crate::platform::OutputLayout;
use crate::project_graph::{discover_artifacts, ProjectGraphBuilder};
use crate::settings::PackagingSettings;
use crate::substitution::{CoverageReport, SubstitutionEngine};
use crate::tokens::{self, TokenMap};

/// `CURRENT_PROJECT_VERSION` written into the project
pub const APP_VERSION: &str = "1";

/// License files renamed so they are not mistaken for the game's own license
pub const LICENSE_RENAMES: [(&str, &str); 2] = [
    ("Dotnet/DOTNET-LICENSE.TXT", "Dotnet/LICENSE.TXT"),
    (
        "Dotnet/DOTNET-THIRD-PARTY-NOTICES.TXT",
        "Dotnet/THIRD-PARTY-NOTICES.TXT",
    ),
];

/// The cooker's generic file packaging step.
///
/// Called once the Xcode project is complete. Archiving and exporting the app
/// with Xcode is not done here; implementations may add it.
pub trait FilePackager {
    fn package_files(&mut self, layout: &OutputLayout);
}

/// Packager that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPackager;

impl FilePackager for NoopPackager {
    fn package_files(&mut self, layout: &OutputLayout) {
        tracing::debug!("No file packaging step for {}", layout.root.display());
    }
}

/// Pipeline steps, used in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    ResolveIdentifier,
    DeployTemplate,
    SeedTokens,
    RelocateLicenses,
    BuildGraph,
    RunFixups,
    Substitute,
    Package,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::ResolveIdentifier => "resolve identifier",
            PipelineStage::DeployTemplate => "deploy template",
            PipelineStage::SeedTokens => "seed tokens",
            PipelineStage::RelocateLicenses => "relocate licenses",
            PipelineStage::BuildGraph => "build project graph",
            PipelineStage::RunFixups => "run fix-ups",
            PipelineStage::Substitute => "format project",
            PipelineStage::Package => "package",
        };
        f.write_str(name)
    }
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct PackagingReport {
    pub bundle_identifier: BundleIdentifier,
    /// Artifacts added to the project
    pub artifacts: usize,
    pub libraries: usize,
    pub fixup_warnings: Vec<FixupWarning>,
    pub coverage: CoverageReport,
    /// False when packaging was skipped by settings
    pub packaged: bool,
}

/// Final state of a run
#[derive(Debug)]
pub enum PackagingResult {
    Success(PackagingReport),
    Failed { reason: String },
}

impl PackagingResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PackagingResult::Success(_))
    }

    /// Human-readable failure reason
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            PackagingResult::Success(_) => None,
            PackagingResult::Failed { reason } => Some(reason.as_str()),
        }
    }
}

/// Token map values that come from settings, with empty generated sections
pub fn seed_tokens(settings: &PackagingSettings, identifier: &BundleIdentifier) -> TokenMap {
    let mut map = TokenMap::new();
    map.insert(tokens::APP_NAME, bundle_id::app_name(&settings.product_name));
    map.insert(tokens::APP_IDENTIFIER, identifier.as_str());
    map.insert(tokens::APP_TEAM_ID, settings.app_team_id.as_str());
    map.insert(tokens::APP_VERSION, APP_VERSION);
    map.insert(tokens::PROJECT_NAME, settings.product_name.as_str());
    map.insert(tokens::PROJECT_VERSION, settings.project_version.as_str());
    map.insert(tokens::HEADER_SEARCH_PATHS, settings.header_search_paths.as_str());
    map.merge(TokenMap::with_empty_sections());
    map
}

/// Apply [`LICENSE_RENAMES`] under `data_dir`, returning how many were moved.
///
/// Missing files are skipped; other failures are logged and ignored.
pub fn relocate_licenses(data_dir: &Path) -> usize {
    let mut moved = 0;
    for (from, to) in LICENSE_RENAMES {
        let src = data_dir.join(from);
        let dest = data_dir.join(to);
        if !src.is_file() {
            continue;
        }
        if dest.exists() {
            if let Err(e) = fs::remove_file(&dest) {
                tracing::warn!("Failed to replace {}: {}", dest.display(), e);
                continue;
            }
        }
        match fs::rename(&src, &dest) {
            Ok(()) => moved += 1,
            Err(e) => tracing::warn!("Failed to move {} to {}: {}", src.display(), dest.display(), e),
        }
    }
    moved
}

/// One packaging run over a build output folder
pub struct PackagingPipeline<'a> {
    settings: &'a PackagingSettings,
    template_dir: &'a Path,
    layout: OutputLayout,
    fixup_runner: &'a mut dyn FixupRunner,
    packager: &'a mut dyn FilePackager,
}

impl<'a> PackagingPipeline<'a> {
    pub fn new(
        settings: &'a PackagingSettings,
        template_dir: &'a Path,
        output_dir: &Path,
        fixup_runner: &'a mut dyn FixupRunner,
        packager: &'a mut dyn FilePackager,
    ) -> Self {
        Self {
            settings,
            template_dir,
            layout: OutputLayout::new(output_dir),
            fixup_runner,
            packager,
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Run every step, stopping at the first terminal error
    pub fn run(&mut self) -> Result<PackagingReport, PackagingError> {
        let settings = self.settings;

        log_stage(PipelineStage::ResolveIdentifier);
        let identifier = bundle_id::resolve(
            &settings.app_identifier,
            &settings.product_name,
            &settings.company_name,
        )?;
        tracing::info!("App identifier: {}", identifier);

        log_stage(PipelineStage::DeployTemplate);
        deploy(self.template_dir, &self.layout.root)?;

        log_stage(PipelineStage::SeedTokens);
        let mut token_map = seed_tokens(settings, &identifier);

        log_stage(PipelineStage::RelocateLicenses);
        relocate_licenses(&self.layout.data_dir);

        log_stage(PipelineStage::BuildGraph);
        let artifacts = discover_artifacts(&self.layout.data_dir)?;
        let graph = ProjectGraphBuilder::new(RandomIds).build(&artifacts);
        token_map.merge(graph.render());
        let fixups = graph.fixup_commands(&settings.fixup_tool);
        tracing::info!(
            "Added {} files to the Xcode project ({} libraries)",
            graph.resource_count + graph.libraries.len(),
            graph.libraries.len()
        );

        log_stage(PipelineStage::RunFixups);
        let fixup_warnings = fixup::run_all(&mut *self.fixup_runner, &fixups);

        log_stage(PipelineStage::Substitute);
        let coverage = SubstitutionEngine::new(settings.strict_placeholders)
            .substitute(&self.layout.project_file, &token_map)?;

        let mut report = PackagingReport {
            bundle_identifier: identifier,
            artifacts: graph.resource_count + graph.libraries.len(),
            libraries: graph.libraries.len(),
            fixup_warnings,
            coverage,
            packaged: false,
        };

        if settings.skip_packaging {
            tracing::info!("Skipping packaging");
            return Ok(report);
        }

        log_stage(PipelineStage::Package);
        self.packager.package_files(&self.layout);
        tracing::info!("Building app package...");
        report.packaged = true;

        Ok(report)
    }

    /// Run and fold the outcome into a [`PackagingResult`]
    pub fn execute(&mut self) -> PackagingResult {
        match self.run() {
            Ok(report) => PackagingResult::Success(report),
            Err(e) => {
                tracing::error!("{}", e);
                PackagingResult::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn log_stage(stage: PipelineStage) {
    tracing::info!("iOS packaging: {}", stage);
}
