//! Placeholder names and the ordered token map

/// Sanitized product name
pub const APP_NAME: &str = "${AppName}";
/// Bundle identifier
pub const APP_IDENTIFIER: &str = "${AppIdentifier}";
/// Development team used for signing
pub const APP_TEAM_ID: &str = "${AppTeamId}";
/// `CURRENT_PROJECT_VERSION`
pub const APP_VERSION: &str = "${AppVersion}";
/// Raw product name
pub const PROJECT_NAME: &str = "${ProjectName}";
/// `MARKETING_VERSION`
pub const PROJECT_VERSION: &str = "${ProjectVersion}";
pub const HEADER_SEARCH_PATHS: &str = "${HeaderSearchPaths}";

pub const PBX_BUILD_FILE: &str = "${PBXBuildFile}";
pub const PBX_COPY_FILES_BUILD_PHASE_FILES: &str = "${PBXCopyFilesBuildPhaseFiles}";
pub const PBX_FILE_REFERENCE: &str = "${PBXFileReference}";
pub const PBX_FRAMEWORKS_BUILD_PHASE: &str = "${PBXFrameworksBuildPhase}";
pub const PBX_FRAMEWORKS_GROUP: &str = "${PBXFrameworksGroup}";
pub const PBX_FILES_GROUP: &str = "${PBXFilesGroup}";
pub const PBX_RESOURCES_GROUP: &str = "${PBXResourcesGroup}";

/// Placeholders filled from the generated object graph
pub const GENERATED_SECTIONS: [&str; 7] = [
    PBX_BUILD_FILE,
    PBX_COPY_FILES_BUILD_PHASE_FILES,
    PBX_FILE_REFERENCE,
    PBX_FRAMEWORKS_BUILD_PHASE,
    PBX_FRAMEWORKS_GROUP,
    PBX_FILES_GROUP,
    PBX_RESOURCES_GROUP,
];

/// Placeholder to replacement text, kept in insertion order.
///
/// Generated sections are appended to line by line while the build output is
/// walked, so the order of both keys and accumulated text is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    entries: Vec<(String, String)>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map with every generated section present and empty
    pub fn with_empty_sections() -> Self {
        let mut map = Self::new();
        for section in GENERATED_SECTIONS {
            map.insert(section, "");
        }
        map
    }

    /// Set a value, replacing any previous one but keeping its position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append text to a value, creating it if missing
    pub fn append(&mut self, key: &str, text: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1.push_str(text),
            None => self.entries.push((key.to_string(), text.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Merge another map into this one; its values win
    pub fn merge(&mut self, other: TokenMap) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
