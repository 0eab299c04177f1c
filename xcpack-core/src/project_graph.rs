//! Xcode Project Graph Builder
//!
//! Classifies the cooked build output and turns it into the objects a
//! `project.pbxproj` needs: build files, file references, build phase and
//! group membership. The graph is kept typed so its referential integrity can
//! be checked before it is flattened into the text sections that replace the
//! `${PBX...}` placeholders of the project template.
//!
//! For a dynamic library `libfoo.dylib` the builder emits:
//! - two `PBXBuildFile`s (`in Frameworks`, `in Embed Frameworks` with
//!   `CodeSignOnCopy`)
//! - a `compiled.mach-o.dylib` file reference under `FlaxGame/Data/`
//! - membership in the embed copy phase, the frameworks phase and the
//!   frameworks group
//! - an `install_name_tool` fix-up command
//!
//! Any other file becomes a resource: one `in Resources` build file, a generic
//! file reference under `Data/`, and membership in the files group and the
//! resources phase.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::PackagingError;
use crate::fixup::FixupCommand;
use crate::object_id::{IdGenerator, ObjectId};
use crate::path_utils::{file_name, relative_project_path};
use crate::platform::{DATA_FOLDER, GAME_FOLDER};
use crate::tokens::{self, TokenMap};

/// OS metadata files that never go into the project
pub const EXCLUDED_NAMES: [&str; 2] = [".DS_Store", GAME_FOLDER];

/// Extension of embedded native libraries
pub const DYLIB_EXTENSION: &str = "dylib";

/// Whether a file with this name is left out of the project
pub fn is_excluded_name(name: &str) -> bool {
    EXCLUDED_NAMES.contains(&name)
}

/// How a build output file is added to the project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Resource,
    DynamicLibrary,
}

/// One file found in the data output folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    /// File name, used for comments and the `name` attribute
    pub name: String,
    /// Path relative to the data folder, forward slashes
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub kind: ArtifactKind,
}

impl OutputArtifact {
    /// Classify `path` found under `data_dir`.
    ///
    /// Returns `None` for excluded names and paths outside `data_dir`.
    pub fn from_path(data_dir: &Path, path: &Path) -> Option<Self> {
        let name = file_name(path)?;
        if is_excluded_name(&name) {
            return None;
        }
        let relative_path = relative_project_path(data_dir, path)?;
        let kind = if name.ends_with(&format!(".{}", DYLIB_EXTENSION)) {
            ArtifactKind::DynamicLibrary
        } else {
            ArtifactKind::Resource
        };

        Some(Self {
            name,
            relative_path,
            absolute_path: path.to_path_buf(),
            kind,
        })
    }
}

/// Recursively list the data folder, sorted by file name within each directory
pub fn discover_artifacts(data_dir: &Path) -> Result<Vec<OutputArtifact>, PackagingError> {
    let mut artifacts = Vec::new();

    for entry in WalkDir::new(data_dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| PackagingError::Discovery {
            path: data_dir.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(artifact) = OutputArtifact::from_path(data_dir, entry.path()) {
            artifacts.push(artifact);
        }
    }

    Ok(artifacts)
}

/// The build phase a `PBXBuildFile` belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Frameworks,
    EmbedFrameworks,
    Resources,
}

impl BuildPhase {
    pub fn label(self) -> &'static str {
        match self {
            BuildPhase::Frameworks => "Frameworks",
            BuildPhase::EmbedFrameworks => "Embed Frameworks",
            BuildPhase::Resources => "Resources",
        }
    }
}

/// `PBXBuildFile` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFile {
    pub id: ObjectId,
    pub file_ref: ObjectId,
    pub name: String,
    pub phase: BuildPhase,
}

impl BuildFile {
    fn render(&self) -> String {
        let settings = match self.phase {
            BuildPhase::EmbedFrameworks => "settings = {ATTRIBUTES = (CodeSignOnCopy, ); }; ",
            _ => "",
        };
        format!(
            "\t\t{} /* {} in {} */ = {{isa = PBXBuildFile; fileRef = {} /* {} */; {}}};\n",
            self.id,
            self.name,
            self.phase.label(),
            self.file_ref,
            self.name,
            settings
        )
    }
}

/// `lastKnownFileType` of a file reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    DynamicLibrary,
    Generic,
}

impl FileType {
    fn attribute(self) -> &'static str {
        match self {
            FileType::DynamicLibrary => "\"compiled.mach-o.dylib\"",
            FileType::Generic => "file",
        }
    }
}

/// `PBXFileReference` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    pub id: ObjectId,
    pub name: String,
    /// Path relative to the project's group, forward slashes
    pub path: String,
    pub file_type: FileType,
}

impl FileReference {
    fn render(&self) -> String {
        format!(
            "\t\t{} /* {} */ = {{isa = PBXFileReference; lastKnownFileType = {}; name = \"{}\"; path = \"{}\"; sourceTree = \"<group>\"; }};\n",
            self.id,
            self.name,
            self.file_type.attribute(),
            self.name,
            self.path
        )
    }
}

/// A reference to an object from a phase or group child list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: ObjectId,
    pub comment: String,
}

impl Member {
    fn new(id: &ObjectId, comment: String) -> Self {
        Self {
            id: id.clone(),
            comment,
        }
    }

    fn render(&self) -> String {
        format!("\t\t\t\t{} /* {} */,\n", self.id, self.comment)
    }
}

/// Objects generated for the build output, in scan order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectGraph {
    pub build_files: Vec<BuildFile>,
    pub file_references: Vec<FileReference>,
    /// Files of the "Embed Frameworks" copy phase
    pub embed_frameworks_phase: Vec<Member>,
    pub frameworks_phase: Vec<Member>,
    pub frameworks_group: Vec<Member>,
    pub files_group: Vec<Member>,
    pub resources_phase: Vec<Member>,
    /// Libraries that need an install name fix-up
    pub libraries: Vec<OutputArtifact>,
    pub resource_count: usize,
}

impl ProjectGraph {
    /// Flatten the graph into the generated template sections
    pub fn render(&self) -> TokenMap {
        let mut map = TokenMap::with_empty_sections();
        for build_file in &self.build_files {
            map.append(tokens::PBX_BUILD_FILE, &build_file.render());
        }
        for file_ref in &self.file_references {
            map.append(tokens::PBX_FILE_REFERENCE, &file_ref.render());
        }
        let memberships = [
            (tokens::PBX_COPY_FILES_BUILD_PHASE_FILES, &self.embed_frameworks_phase),
            (tokens::PBX_FRAMEWORKS_BUILD_PHASE, &self.frameworks_phase),
            (tokens::PBX_FRAMEWORKS_GROUP, &self.frameworks_group),
            (tokens::PBX_FILES_GROUP, &self.files_group),
            (tokens::PBX_RESOURCES_GROUP, &self.resources_phase),
        ];
        for (section, members) in memberships {
            for member in members {
                map.append(section, &member.render());
            }
        }
        map
    }

    /// One `-id @rpath/<name>` fix-up per library, in scan order
    pub fn fixup_commands(&self, tool: &str) -> Vec<FixupCommand> {
        self.libraries
            .iter()
            .map(|lib| FixupCommand::new(tool, &lib.name, &lib.absolute_path))
            .collect()
    }

    fn members(&self) -> impl Iterator<Item = &Member> {
        self.embed_frameworks_phase
            .iter()
            .chain(&self.frameworks_phase)
            .chain(&self.frameworks_group)
            .chain(&self.files_group)
            .chain(&self.resources_phase)
    }

    fn subjects(&self) -> impl Iterator<Item = &ObjectId> {
        self.build_files
            .iter()
            .map(|b| &b.id)
            .chain(self.file_references.iter().map(|f| &f.id))
    }

    /// Every distinct ID used anywhere in the graph
    pub fn object_ids(&self) -> HashSet<&ObjectId> {
        self.subjects()
            .chain(self.members().map(|m| &m.id))
            .chain(self.build_files.iter().map(|b| &b.file_ref))
            .collect()
    }

    /// IDs referenced by a membership or `fileRef` with no defining entry
    pub fn dangling_references(&self) -> Vec<&ObjectId> {
        let subjects: HashSet<&ObjectId> = self.subjects().collect();
        let file_refs: HashSet<&ObjectId> = self.file_references.iter().map(|f| &f.id).collect();

        let mut dangling: Vec<&ObjectId> = self
            .members()
            .map(|m| &m.id)
            .filter(|id| !subjects.contains(id))
            .collect();
        dangling.extend(
            self.build_files
                .iter()
                .map(|b| &b.file_ref)
                .filter(|id| !file_refs.contains(id)),
        );
        dangling
    }

    /// IDs defined by more than one entry
    pub fn duplicate_subjects(&self) -> Vec<&ObjectId> {
        let mut counts: HashMap<&ObjectId, usize> = HashMap::new();
        for id in self.subjects() {
            *counts.entry(id).or_default() += 1;
        }
        let mut duplicates: Vec<_> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect();
        duplicates.sort();
        duplicates
    }
}

/// Builds a [`ProjectGraph`] from scanned artifacts
pub struct ProjectGraphBuilder<G: IdGenerator> {
    ids: G,
    library_root: String,
    resource_root: String,
}

impl<G: IdGenerator> ProjectGraphBuilder<G> {
    pub fn new(ids: G) -> Self {
        Self {
            ids,
            library_root: format!("{}/{}", GAME_FOLDER, DATA_FOLDER),
            resource_root: DATA_FOLDER.to_string(),
        }
    }

    pub fn build(&mut self, artifacts: &[OutputArtifact]) -> ProjectGraph {
        let mut graph = ProjectGraph::default();

        for artifact in artifacts {
            if is_excluded_name(&artifact.name) {
                continue;
            }
            tracing::debug!("Adding {} ({:?})", artifact.relative_path, artifact.kind);

            let file_id = self.ids.next_id();
            match artifact.kind {
                ArtifactKind::DynamicLibrary => self.add_library(&mut graph, artifact, file_id),
                ArtifactKind::Resource => self.add_resource(&mut graph, artifact, file_id),
            }
        }

        graph
    }

    fn add_library(&mut self, graph: &mut ProjectGraph, artifact: &OutputArtifact, file_id: ObjectId) {
        let name = &artifact.name;
        let framework_id = self.ids.next_id();
        let embed_id = self.ids.next_id();

        graph.build_files.push(BuildFile {
            id: framework_id.clone(),
            file_ref: file_id.clone(),
            name: name.clone(),
            phase: BuildPhase::Frameworks,
        });
        graph.build_files.push(BuildFile {
            id: embed_id.clone(),
            file_ref: file_id.clone(),
            name: name.clone(),
            phase: BuildPhase::EmbedFrameworks,
        });
        graph
            .embed_frameworks_phase
            .push(Member::new(&embed_id, format!("{} in Embed Frameworks", name)));
        graph.file_references.push(FileReference {
            id: file_id.clone(),
            name: name.clone(),
            path: format!("{}/{}", self.library_root, artifact.relative_path),
            file_type: FileType::DynamicLibrary,
        });
        graph
            .frameworks_phase
            .push(Member::new(&framework_id, format!("{} in Frameworks", name)));
        graph.frameworks_group.push(Member::new(&file_id, name.clone()));
        graph.libraries.push(artifact.clone());
    }

    fn add_resource(&mut self, graph: &mut ProjectGraph, artifact: &OutputArtifact, file_id: ObjectId) {
        let name = &artifact.name;
        let build_file_id = self.ids.next_id();

        graph.build_files.push(BuildFile {
            id: build_file_id.clone(),
            file_ref: file_id.clone(),
            name: name.clone(),
            phase: BuildPhase::Resources,
        });
        graph.file_references.push(FileReference {
            id: file_id.clone(),
            name: name.clone(),
            path: format!("{}/{}", self.resource_root, artifact.relative_path),
            file_type: FileType::Generic,
        });
        graph.files_group.push(Member::new(&file_id, name.clone()));
        graph
            .resources_phase
            .push(Member::new(&build_file_id, format!("{} in Resources", name)));
        graph.resource_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_id::{RandomIds, SequentialIds};
    use std::fs;
    use tempfile::TempDir;

    fn artifact(relative_path: &str) -> OutputArtifact {
        let root = Path::new("/out/FlaxGame/Data");
        OutputArtifact::from_path(root, &root.join(relative_path)).unwrap()
    }

    #[test]
    fn test_classification() {
        assert_eq!(artifact("lib.dylib").kind, ArtifactKind::DynamicLibrary);
        assert_eq!(artifact("data.bin").kind, ArtifactKind::Resource);
        assert_eq!(artifact("Dotnet/System.dll").kind, ArtifactKind::Resource);
        assert_eq!(artifact("dylib").kind, ArtifactKind::Resource);
        assert_eq!(artifact("Dotnet/System.dll").relative_path, "Dotnet/System.dll");
    }

    #[test]
    fn test_excluded_names() {
        let root = Path::new("/out/FlaxGame/Data");
        assert!(OutputArtifact::from_path(root, &root.join(".DS_Store")).is_none());
        assert!(OutputArtifact::from_path(root, &root.join("Content/.DS_Store")).is_none());
        assert!(OutputArtifact::from_path(root, &root.join("FlaxGame")).is_none());
    }

    #[test]
    fn test_library_and_resource_scenario() {
        let artifacts = vec![artifact("lib.dylib"), artifact("data.bin")];
        let graph = ProjectGraphBuilder::new(RandomIds).build(&artifacts);

        let fixups = graph.fixup_commands("install_name_tool");
        assert_eq!(fixups.len(), 1);
        assert_eq!(fixups[0].library_name, "lib.dylib");
        assert_eq!(
            fixups[0].library_path,
            PathBuf::from("/out/FlaxGame/Data/lib.dylib")
        );

        let map = graph.render();
        let files_group = map.get(tokens::PBX_FILES_GROUP).unwrap();
        let resources = map.get(tokens::PBX_RESOURCES_GROUP).unwrap();
        assert!(files_group.contains("data.bin"));
        assert!(resources.contains("data.bin in Resources"));
        for section in [
            tokens::PBX_COPY_FILES_BUILD_PHASE_FILES,
            tokens::PBX_FRAMEWORKS_BUILD_PHASE,
            tokens::PBX_FRAMEWORKS_GROUP,
        ] {
            let text = map.get(section).unwrap();
            assert!(text.contains("lib.dylib"), "{section}");
            assert!(!text.contains("data.bin"), "{section}");
        }
        assert!(!files_group.contains("lib.dylib"));
        assert!(!resources.contains("lib.dylib"));
    }

    #[test]
    fn test_rendered_lines() {
        let artifacts = vec![artifact("Dotnet/libmono.dylib"), artifact("Content/Game.flax")];
        let map = ProjectGraphBuilder::new(SequentialIds::new()).build(&artifacts).render();

        // libmono: file 1, framework 2, embed 3; Game.flax: file 4, build file 5
        let id = |n: u32| format!("{:024x}", n);
        let expected_build_files = format!(
            "\t\t{fw} /* libmono.dylib in Frameworks */ = {{isa = PBXBuildFile; fileRef = {file} /* libmono.dylib */; }};\n\
             \t\t{embed} /* libmono.dylib in Embed Frameworks */ = {{isa = PBXBuildFile; fileRef = {file} /* libmono.dylib */; settings = {{ATTRIBUTES = (CodeSignOnCopy, ); }}; }};\n\
             \t\t{res} /* Game.flax in Resources */ = {{isa = PBXBuildFile; fileRef = {res_file} /* Game.flax */; }};\n",
            fw = id(2),
            file = id(1),
            embed = id(3),
            res = id(5),
            res_file = id(4),
        );
        assert_eq!(map.get(tokens::PBX_BUILD_FILE).unwrap(), expected_build_files);

        let expected_file_refs = format!(
            "\t\t{lib} /* libmono.dylib */ = {{isa = PBXFileReference; lastKnownFileType = \"compiled.mach-o.dylib\"; name = \"libmono.dylib\"; path = \"FlaxGame/Data/Dotnet/libmono.dylib\"; sourceTree = \"<group>\"; }};\n\
             \t\t{res} /* Game.flax */ = {{isa = PBXFileReference; lastKnownFileType = file; name = \"Game.flax\"; path = \"Data/Content/Game.flax\"; sourceTree = \"<group>\"; }};\n",
            lib = id(1),
            res = id(4),
        );
        assert_eq!(map.get(tokens::PBX_FILE_REFERENCE).unwrap(), expected_file_refs);

        assert_eq!(
            map.get(tokens::PBX_COPY_FILES_BUILD_PHASE_FILES).unwrap(),
            format!("\t\t\t\t{} /* libmono.dylib in Embed Frameworks */,\n", id(3))
        );
        assert_eq!(
            map.get(tokens::PBX_FRAMEWORKS_BUILD_PHASE).unwrap(),
            format!("\t\t\t\t{} /* libmono.dylib in Frameworks */,\n", id(2))
        );
        assert_eq!(
            map.get(tokens::PBX_FRAMEWORKS_GROUP).unwrap(),
            format!("\t\t\t\t{} /* libmono.dylib */,\n", id(1))
        );
        assert_eq!(
            map.get(tokens::PBX_FILES_GROUP).unwrap(),
            format!("\t\t\t\t{} /* Game.flax */,\n", id(4))
        );
        assert_eq!(
            map.get(tokens::PBX_RESOURCES_GROUP).unwrap(),
            format!("\t\t\t\t{} /* Game.flax in Resources */,\n", id(5))
        );
    }

    #[test]
    fn test_id_count_and_integrity() {
        let artifacts: Vec<_> = (0..20)
            .map(|i| {
                if i % 3 == 0 {
                    artifact(&format!("Native/lib{}.dylib", i))
                } else {
                    artifact(&format!("Content/asset{}.flax", i))
                }
            })
            .collect();
        let libraries = artifacts
            .iter()
            .filter(|a| a.kind == ArtifactKind::DynamicLibrary)
            .count();
        let resources = artifacts.len() - libraries;

        let graph = ProjectGraphBuilder::new(RandomIds).build(&artifacts);

        assert_eq!(graph.object_ids().len(), 2 * resources + 3 * libraries);
        assert!(graph.dangling_references().is_empty());
        assert!(graph.duplicate_subjects().is_empty());
        assert_eq!(graph.libraries.len(), libraries);
        assert_eq!(graph.resource_count, resources);
    }

    #[test]
    fn test_sections_follow_scan_order() {
        let artifacts = vec![artifact("b.bin"), artifact("a.bin"), artifact("c.bin")];
        let map = ProjectGraphBuilder::new(SequentialIds::new()).build(&artifacts).render();
        let group = map.get(tokens::PBX_FILES_GROUP).unwrap();

        let b = group.find("b.bin").unwrap();
        let a = group.find("a.bin").unwrap();
        let c = group.find("c.bin").unwrap();
        assert!(b < a && a < c);
    }

    #[test]
    fn test_builder_skips_excluded_artifacts() {
        let excluded = OutputArtifact {
            name: ".DS_Store".to_string(),
            relative_path: ".DS_Store".to_string(),
            absolute_path: PathBuf::from("/out/FlaxGame/Data/.DS_Store"),
            kind: ArtifactKind::Resource,
        };
        let graph = ProjectGraphBuilder::new(SequentialIds::new()).build(&[excluded]);
        assert!(graph.build_files.is_empty());
        assert!(graph.file_references.is_empty());
    }

    #[test]
    fn test_empty_build_renders_empty_sections() {
        let map = ProjectGraphBuilder::new(RandomIds).build(&[]).render();
        for section in tokens::GENERATED_SECTIONS {
            assert_eq!(map.get(section), Some(""));
        }
    }

    #[test]
    fn test_detects_dangling_reference() {
        let mut graph = ProjectGraphBuilder::new(SequentialIds::new()).build(&[artifact("a.bin")]);
        // Same ID as the file reference of a.bin
        graph.files_group.push(Member {
            id: SequentialIds::new().next_id(),
            comment: "a.bin".to_string(),
        });
        assert!(graph.dangling_references().is_empty());

        graph.files_group.push(Member {
            id: RandomIds.next_id(),
            comment: "ghost".to_string(),
        });
        assert_eq!(graph.dangling_references().len(), 1);
    }

    #[test]
    fn test_discover_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let data = temp_dir.path().join("Data");
        fs::create_dir_all(data.join("Dotnet")).unwrap();
        fs::create_dir_all(data.join("Content")).unwrap();
        fs::write(data.join("Content").join("Game.flax"), "x").unwrap();
        fs::write(data.join("Content").join(".DS_Store"), "x").unwrap();
        fs::write(data.join("Dotnet").join("libmonosgen-2.0.dylib"), "x").unwrap();
        fs::write(data.join("FlaxGame"), "x").unwrap();

        let artifacts = discover_artifacts(&data).unwrap();
        let paths: Vec<_> = artifacts.iter().map(|a| a.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["Content/Game.flax", "Dotnet/libmonosgen-2.0.dylib"]);
        assert_eq!(artifacts[1].kind, ArtifactKind::DynamicLibrary);
        assert_eq!(artifacts[1].absolute_path, data.join("Dotnet").join("libmonosgen-2.0.dylib"));
    }

    #[test]
    fn test_discover_missing_folder_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = discover_artifacts(&temp_dir.path().join("Missing")).unwrap_err();
        assert!(matches!(err, PackagingError::Discovery { .. }));
    }
}
