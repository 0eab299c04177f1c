//! App bundle identifier resolution
//!
//! Turns a settings template such as `com.${COMPANY_NAME}.${PROJECT_NAME}`
//! into a validated reverse-domain identifier (`com.acmeinc.mygame1`).

use std::fmt;

use regex::{NoExpand, Regex};

use crate::error::{IdentifierProblem, PackagingError};

/// Template token replaced with the cleaned product name
pub const PROJECT_NAME_TOKEN: &str = "${PROJECT_NAME}";
/// Template token replaced with the cleaned company name
pub const COMPANY_NAME_TOKEN: &str = "${COMPANY_NAME}";

/// Default identifier template
pub const DEFAULT_IDENTIFIER_TEMPLATE: &str = "com.${COMPANY_NAME}.${PROJECT_NAME}";

/// A validated app identifier: non-empty, only `[a-z0-9._]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleIdentifier(String);

impl BundleIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BundleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remove the characters Apple rejects in bundle names (spaces, dots, hyphens)
pub fn clean_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .collect()
}

/// The app name used inside the Xcode project
pub fn app_name(product_name: &str) -> String {
    clean_name(product_name)
}

/// Resolve and validate the app identifier
pub fn resolve(
    template: &str,
    product_name: &str,
    company_name: &str,
) -> Result<BundleIdentifier, PackagingError> {
    let identifier = replace_ignore_case(template, PROJECT_NAME_TOKEN, &clean_name(product_name));
    let identifier = replace_ignore_case(&identifier, COMPANY_NAME_TOKEN, &clean_name(company_name));
    let identifier = identifier.to_lowercase();

    if let Some(c) = identifier
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '_'))
    {
        return Err(PackagingError::InvalidIdentifier {
            identifier,
            problem: IdentifierProblem::InvalidCharacter(c),
        });
    }

    if identifier.is_empty() {
        return Err(PackagingError::InvalidIdentifier {
            identifier,
            problem: IdentifierProblem::Empty,
        });
    }

    Ok(BundleIdentifier(identifier))
}

fn replace_ignore_case(haystack: &str, token: &str, value: &str) -> String {
    // The escaped token is always a valid pattern.
    match Regex::new(&format!("(?i){}", regex::escape(token))) {
        Ok(re) => re.replace_all(haystack, NoExpand(value)).into_owned(),
        Err(_) => haystack.replace(token, value),
    }
}
