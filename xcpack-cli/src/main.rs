//! xcpack CLI
//!
//! Command-line interface for packaging cooked game builds as iOS Xcode projects.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use xcpack_core::bundle_id::DEFAULT_IDENTIFIER_TEMPLATE;
use xcpack_core::settings::SETTINGS_FILE_NAME;
use xcpack_core::{
    resolve_bundle_identifier, NoopPackager, PackagingPipeline, PackagingResult,
    PackagingSettings, PixelFormat, ProcessFixupRunner, IOS,
};

#[derive(Parser)]
#[command(name = "xcpack")]
#[command(about = "Package cooked game builds as iOS Xcode projects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the Xcode project for a cooked build
    Package {
        /// Build output directory (contains FlaxGame/Data)
        #[arg(short, long)]
        output: PathBuf,

        /// Xcode project template directory
        #[arg(short, long)]
        template: PathBuf,

        /// Settings file (.json or .toml, default: ./xcpack.json if present)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Product name
        #[arg(long)]
        product_name: Option<String>,

        /// Company name
        #[arg(long)]
        company_name: Option<String>,

        /// Bundle identifier template
        #[arg(long)]
        app_identifier: Option<String>,

        /// Apple development team ID
        #[arg(long)]
        team_id: Option<String>,

        /// Stop after generating the Xcode project
        #[arg(long)]
        skip_packaging: bool,

        /// Fail on template placeholders without a value and unused values
        #[arg(long)]
        strict: bool,
    },

    /// Print the bundle identifier for a product
    BundleId {
        /// Product name
        #[arg(long)]
        product_name: String,

        /// Company name
        #[arg(long)]
        company_name: String,

        /// Identifier template
        #[arg(long, default_value = DEFAULT_IDENTIFIER_TEMPLATE)]
        template: String,
    },

    /// Print the texture format used on iOS for a source format
    TextureFormat {
        /// Pixel format name (e.g. BC7_UNorm_sRGB)
        format: String,
    },

    /// Write a default settings file
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Show iOS platform information
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xcpack=info".parse()?)
                .add_directive("xcpack_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Package {
            output,
            template,
            settings,
            product_name,
            company_name,
            app_identifier,
            team_id,
            skip_packaging,
            strict,
        } => {
            let mut settings = load_settings(settings)?;
            if let Some(name) = product_name {
                settings.product_name = name;
            }
            if let Some(name) = company_name {
                settings.company_name = name;
            }
            if let Some(identifier) = app_identifier {
                settings.app_identifier = identifier;
            }
            if let Some(team_id) = team_id {
                settings.app_team_id = team_id;
            }
            settings.skip_packaging |= skip_packaging;
            settings.strict_placeholders |= strict;
            cmd_package(&settings, output, template)?;
        }
        Commands::BundleId {
            product_name,
            company_name,
            template,
        } => {
            cmd_bundle_id(&template, &product_name, &company_name)?;
        }
        Commands::TextureFormat { format } => {
            cmd_texture_format(&format)?;
        }
        Commands::Init { path } => {
            cmd_init(path)?;
        }
        Commands::Info { json } => {
            cmd_info(json);
        }
    }

    Ok(())
}

/// Load settings from an explicit file, ./xcpack.json, or defaults
fn load_settings(path: Option<PathBuf>) -> Result<PackagingSettings> {
    let path = match path {
        Some(path) => path,
        None => {
            let default_path = PathBuf::from(SETTINGS_FILE_NAME);
            if !default_path.exists() {
                return Ok(PackagingSettings::default());
            }
            default_path
        }
    };

    tracing::info!("Using settings from {}", path.display());
    PackagingSettings::load(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

/// Run the packaging pipeline
fn cmd_package(settings: &PackagingSettings, output: PathBuf, template: PathBuf) -> Result<()> {
    println!("Packaging {} for {}...", output.display(), IOS.display_name);

    let mut fixup_runner = ProcessFixupRunner;
    let mut packager = NoopPackager;
    let result = PackagingPipeline::new(settings, &template, &output, &mut fixup_runner, &mut packager)
        .execute();

    match result {
        PackagingResult::Success(report) => {
            println!("Xcode project generated: {}", output.display());
            println!("  Bundle identifier: {}", report.bundle_identifier);
            println!(
                "  Files: {} ({} dynamic libraries)",
                report.artifacts, report.libraries
            );
            if !report.fixup_warnings.is_empty() {
                println!(
                    "  {} install name fix-ups failed (see log)",
                    report.fixup_warnings.len()
                );
            }
            if !report.packaged {
                println!("  Packaging skipped.");
            }
            Ok(())
        }
        PackagingResult::Failed { reason } => anyhow::bail!("Packaging failed: {}", reason),
    }
}

/// Print the resolved bundle identifier
fn cmd_bundle_id(template: &str, product_name: &str, company_name: &str) -> Result<()> {
    let identifier = resolve_bundle_identifier(template, product_name, company_name)?;
    println!("{}", identifier);
    Ok(())
}

/// Print the iOS texture format for a source format
fn cmd_texture_format(format: &str) -> Result<()> {
    let format: PixelFormat = format.parse()?;
    let selected = IOS.texture_format(format);
    if selected == format {
        println!("{} (unchanged)", selected);
    } else {
        println!("{} -> {}", format, selected);
    }
    Ok(())
}

/// Write a default settings file
fn cmd_init(path: Option<PathBuf>) -> Result<()> {
    let dir = match path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    std::fs::create_dir_all(&dir).context("Failed to create directory")?;

    let settings_path = dir.join(SETTINGS_FILE_NAME);
    if settings_path.exists() {
        anyhow::bail!("{} already exists", settings_path.display());
    }

    PackagingSettings::default()
        .save_json(&settings_path)
        .with_context(|| format!("Failed to write {}", settings_path.display()))?;

    println!("Wrote default settings to {}", settings_path.display());
    println!("\nNext steps:");
    println!("  1. Set productName, companyName and appTeamId");
    println!("  2. Run: xcpack package --output <build dir> --template <iOS Project template>");
    Ok(())
}

/// Print the platform descriptor
fn cmd_info(json: bool) {
    if json {
        let info = serde_json::json!({
            "name": IOS.name,
            "displayName": IOS.display_name,
            "architecture": IOS.architecture,
            "aotMode": IOS.aot_mode,
        });
        println!("{}", info);
        return;
    }

    println!("Platform:     {}", IOS.display_name);
    println!("Architecture: {}", IOS.architecture);
    println!("AOT mode:     {}", IOS.aot_mode);
    println!("Native code:  executables without extension, .dylib");
}
