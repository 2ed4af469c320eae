//! Package metadata panel: the crate's own manifest and dependency upgrade hints.

use crate::error::AppError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

const MANIFEST: &str = include_str!("../../Cargo.toml");

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub authors: Vec<String>,
    pub license: Option<String>,
    pub repository: Option<String>,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RawManifest {
    package: RawPackage,
    #[serde(default)]
    dependencies: BTreeMap<String, RawDependency>,
    #[serde(default, rename = "dev-dependencies")]
    dev_dependencies: BTreeMap<String, RawDependency>,
}

#[derive(Deserialize)]
struct RawPackage {
    name: String,
    version: String,
    description: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    license: Option<String>,
    repository: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDependency {
    Version(String),
    Detailed {
        version: Option<String>,
        path: Option<String>,
        git: Option<String>,
    },
}

impl RawDependency {
    fn describe(self) -> String {
        match self {
            RawDependency::Version(v) => v,
            RawDependency::Detailed { version: Some(v), .. } => v,
            RawDependency::Detailed { path: Some(p), .. } => format!("path:{}", p),
            RawDependency::Detailed { git: Some(g), .. } => format!("git:{}", g),
            RawDependency::Detailed { .. } => "*".into(),
        }
    }
}

impl PackageManifest {
    pub fn parse(manifest: &str) -> Result<Self, AppError> {
        let raw: RawManifest = toml::from_str(manifest)
            .map_err(|e| AppError::Internal(format!("unreadable manifest: {}", e)))?;
        let describe_all = |deps: BTreeMap<String, RawDependency>| {
            deps.into_iter()
                .map(|(name, dep)| (name, dep.describe()))
                .collect::<BTreeMap<_, _>>()
        };
        Ok(PackageManifest {
            name: raw.package.name,
            version: raw.package.version,
            description: raw.package.description,
            authors: raw.package.authors,
            license: raw.package.license,
            repository: raw.package.repository,
            dependencies: describe_all(raw.dependencies),
            dev_dependencies: describe_all(raw.dev_dependencies),
        })
    }

    /// This crate's manifest, embedded at build time.
    pub fn current() -> Result<Self, AppError> {
        Self::parse(MANIFEST)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Semver {
    major: u64,
    minor: u64,
    patch: u64,
}

fn semver_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)").ok()).as_ref()
}

/// Drop range operators and a leading `v` (`^1.2.3`, `>= v1.2`, `~0.4`).
pub fn strip_range(v: &str) -> &str {
    v.trim_start_matches(|c: char| matches!(c, '~' | '^' | '>' | '<' | '=' | 'v') || c.is_whitespace())
}

fn parse_semver(v: &str) -> Option<Semver> {
    let caps = semver_re()?.captures(strip_range(v))?;
    Some(Semver {
        major: caps[1].parse().ok()?,
        minor: caps[2].parse().ok()?,
        patch: caps[3].parse().ok()?,
    })
}

/// The most significant component in which `latest` is ahead of `current`, if any.
pub fn diff_type(current: &str, latest: &str) -> Option<VersionBump> {
    let c = parse_semver(current)?;
    let l = parse_semver(latest)?;
    if l.major > c.major {
        Some(VersionBump::Major)
    } else if l.major == c.major && l.minor > c.minor {
        Some(VersionBump::Minor)
    } else if l.major == c.major && l.minor == c.minor && l.patch > c.patch {
        Some(VersionBump::Patch)
    } else {
        None
    }
}

/// Installed/wanted/latest versions of one dependency, as reported by a package tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutdatedInfo {
    pub current: String,
    pub wanted: String,
    pub latest: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutdatedEntry {
    pub name: String,
    pub current: String,
    pub wanted: String,
    pub latest: String,
    pub outdated: bool,
    pub bump: Option<VersionBump>,
}

/// Classify every reported dependency, in name order.
pub fn classify_outdated(report: BTreeMap<String, OutdatedInfo>) -> Vec<OutdatedEntry> {
    report
        .into_iter()
        .map(|(name, info)| OutdatedEntry {
            outdated: info.current != info.latest,
            bump: diff_type(&info.current, &info.latest),
            name,
            current: info.current,
            wanted: info.wanted,
            latest: info.latest,
        })
        .collect()
}
