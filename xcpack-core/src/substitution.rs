//! Template placeholder substitution
//!
//! Replaces `${Name}` placeholders in a deployed template file with values
//! from a [`TokenMap`]. Replacement is literal and applies to every
//! occurrence of each key.
//!
//! Placeholders missing from the map and map entries the template never uses
//! are reported by a coverage check. It runs in debug builds and in strict
//! mode; only strict mode turns the findings into an error.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::PackagingError;
use crate::tokens::TokenMap;

/// Template/map mismatch found by the coverage check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageIssue {
    /// Placeholder in the template that the map does not provide
    MissingPlaceholder(String),
    /// Map entry that does not occur in the template
    UnusedToken(String),
}

impl fmt::Display for CoverageIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageIssue::MissingPlaceholder(name) => write!(f, "missing placeholder {}", name),
            CoverageIssue::UnusedToken(name) => write!(f, "unused token {}", name),
        }
    }
}

/// Outcome of a substitution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Whether the coverage check ran at all
    pub checked: bool,
    pub issues: Vec<CoverageIssue>,
}

impl CoverageReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// All `${Name}` placeholders in `text`, in order of first appearance
pub fn find_placeholders(text: &str) -> Vec<String> {
    let re = match Regex::new(r"\$\{[A-Za-z_][A-Za-z0-9_]*\}") {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    let mut seen = HashSet::new();
    re.find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Compare the placeholders in `template` with the keys of `tokens`
pub fn check_coverage(template: &str, tokens: &TokenMap) -> Vec<CoverageIssue> {
    let placeholders = find_placeholders(template);

    let mut issues: Vec<CoverageIssue> = placeholders
        .iter()
        .filter(|name| !tokens.contains_key(name))
        .map(|name| CoverageIssue::MissingPlaceholder(name.clone()))
        .collect();
    issues.extend(
        tokens
            .keys()
            .filter(|key| !template.contains(key))
            .map(|key| CoverageIssue::UnusedToken(key.to_string())),
    );
    issues
}

/// Replace every key of `tokens` in `text`
pub fn apply(text: &str, tokens: &TokenMap) -> String {
    let mut result = text.to_string();
    for (key, value) in tokens.iter() {
        if result.contains(key) {
            result = result.replace(key, value);
        }
    }
    result
}

/// Rewrites template files in place
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstitutionEngine {
    /// Fail on coverage issues instead of logging them
    pub strict: bool,
}

impl SubstitutionEngine {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    fn should_check(&self) -> bool {
        self.strict || cfg!(debug_assertions)
    }

    /// Substitute `tokens` into the file at `path`
    pub fn substitute(&self, path: &Path, tokens: &TokenMap) -> Result<CoverageReport, PackagingError> {
        let template = fs::read_to_string(path).map_err(|source| PackagingError::Substitution {
            path: path.to_path_buf(),
            source,
        })?;

        let mut report = CoverageReport::default();
        if self.should_check() {
            report.checked = true;
            report.issues = check_coverage(&template, tokens);
            for issue in &report.issues {
                tracing::warn!("{}: {}", path.display(), issue);
            }
            if self.strict && !report.is_clean() {
                return Err(PackagingError::Coverage {
                    path: path.to_path_buf(),
                    issues: report.issues,
                });
            }
        }

        fs::write(path, apply(&template, tokens)).map_err(|source| PackagingError::Substitution {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens;
    use tempfile::TempDir;

    const TEMPLATE: &str = "PRODUCT_NAME = ${AppName};\n\
        PRODUCT_BUNDLE_IDENTIFIER = ${AppIdentifier};\n\
        INFOPLIST_KEY_CFBundleDisplayName = ${AppName};\n\
        /* Begin PBXBuildFile section */\n${PBXBuildFile}/* End PBXBuildFile section */\n";

    fn token_map() -> TokenMap {
        let mut map = TokenMap::new();
        map.insert(tokens::APP_NAME, "MyGame");
        map.insert(tokens::APP_IDENTIFIER, "com.acme.mygame");
        map.insert(tokens::PBX_BUILD_FILE, "\t\tAAA /* a */ = {isa = PBXBuildFile; };\n");
        map
    }

    #[test]
    fn test_find_placeholders() {
        assert_eq!(
            find_placeholders(TEMPLATE),
            vec!["${AppName}", "${AppIdentifier}", "${PBXBuildFile}"]
        );
        assert!(find_placeholders("$(inherited) $HOME ${} ${1x}").is_empty());
    }

    #[test]
    fn test_apply_replaces_every_occurrence() {
        let output = apply(TEMPLATE, &token_map());
        assert_eq!(output.matches("MyGame").count(), 2);
        assert!(output.contains("PRODUCT_BUNDLE_IDENTIFIER = com.acme.mygame;"));
        assert!(find_placeholders(&output).is_empty());
    }

    #[test]
    fn test_coverage_two_way() {
        let mut map = token_map();
        map.insert(tokens::APP_TEAM_ID, "ABCDE12345");
        let template = format!("{}${{Orientation}}\n", TEMPLATE);

        let issues = check_coverage(&template, &map);
        assert_eq!(
            issues,
            vec![
                CoverageIssue::MissingPlaceholder("${Orientation}".to_string()),
                CoverageIssue::UnusedToken("${AppTeamId}".to_string()),
            ]
        );
        assert!(check_coverage(TEMPLATE, &token_map()).is_empty());
    }

    #[test]
    fn test_substitute_rewrites_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("project.pbxproj");
        fs::write(&path, TEMPLATE).unwrap();

        let report = SubstitutionEngine::default().substitute(&path, &token_map()).unwrap();
        assert!(report.is_clean());

        let output = fs::read_to_string(&path).unwrap();
        assert!(output.contains("PRODUCT_NAME = MyGame;"));
        assert!(output.contains("AAA /* a */"));
    }

    #[test]
    fn test_lenient_mode_passes_through_unknown_placeholders() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("project.pbxproj");
        fs::write(&path, "A = ${AppName}; B = ${Orientation};").unwrap();

        let report = SubstitutionEngine::new(false).substitute(&path, &token_map()).unwrap();
        if report.checked {
            assert!(report
                .issues
                .contains(&CoverageIssue::MissingPlaceholder("${Orientation}".to_string())));
        }
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "A = MyGame; B = ${Orientation};"
        );
    }

    #[test]
    fn test_strict_mode_fails_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("project.pbxproj");
        fs::write(&path, "A = ${AppName}; B = ${Orientation};").unwrap();

        let err = SubstitutionEngine::new(true).substitute(&path, &token_map()).unwrap_err();
        match err {
            PackagingError::Coverage { issues, .. } => {
                assert!(issues.contains(&CoverageIssue::MissingPlaceholder("${Orientation}".to_string())));
                assert!(issues.contains(&CoverageIssue::UnusedToken("${PBXBuildFile}".to_string())));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "A = ${AppName}; B = ${Orientation};"
        );
    }

    #[test]
    fn test_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.pbxproj");
        let err = SubstitutionEngine::default().substitute(&path, &token_map()).unwrap_err();
        assert!(matches!(err, PackagingError::Substitution { .. }));
    }
}
