use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ChurnError, Result};

/// Package spec grammar: `lodash`, `@scope/pkg`, `lodash@1.2.3`,
/// `@scope/pkg@^1.0.0`, `lodash@latest`
static PACKAGE_SPEC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:@[\w.-]+/)?[\w.-]+(?:@\S+)?$").unwrap());

/// Shell metacharacters and whitespace are rejected outright, even when the
/// spec would otherwise match the grammar
static SHELL_META_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;&|`$<>\\\s]").unwrap());

/// Leading `npm i` / `npm install` on pasted commands
static NPM_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^npm\s+(?:i|install)\s+").unwrap());

/// Trailing install flags: -D/--save-dev, -S/--save, -g/--global
static TRAILING_FLAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:-D|--save-dev|-S|--save|-g|--global)$").unwrap());

/// Clean a user-supplied package input into a bare package spec
///
/// Accepts pasted commands like `npm i lodash --save` and returns `lodash`.
/// Idempotent: applying it to its own output yields the same output.
pub fn parse_package_name(input: &str) -> String {
    let cleaned = input.trim();
    let cleaned = NPM_PREFIX_RE.replace(cleaned, "");
    let cleaned = TRAILING_FLAG_RE.replace(&cleaned, "");
    cleaned.trim().to_string()
}

/// Validate a cleaned package spec against the grammar and the shell
/// metacharacter denylist
pub fn is_valid_package_spec(spec: &str) -> bool {
    if spec.is_empty() {
        return false;
    }
    if SHELL_META_RE.is_match(spec) {
        return false;
    }
    PACKAGE_SPEC_RE.is_match(spec)
}

/// A validated npm package specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec(String);

impl PackageSpec {
    /// Clean and validate raw user input into a package spec
    pub fn parse(input: &str) -> Result<Self> {
        let cleaned = parse_package_name(input);
        if cleaned.is_empty() {
            return Err(ChurnError::MissingPackageSpec);
        }
        if !is_valid_package_spec(&cleaned) {
            return Err(ChurnError::InvalidPackageSpec(cleaned));
        }
        Ok(PackageSpec(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
