//! Devtools: package metadata and application store panels.

mod package;
mod store;

pub use package::{
    classify_outdated, diff_type, strip_range, OutdatedEntry, OutdatedInfo, PackageManifest, VersionBump,
};
pub use store::{DevStore, StorePatch, StoreSnapshot};

use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct PanelConfig {
    pub position: &'static str,
    pub theme: &'static str,
    pub plugins: Vec<Plugin>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Plugin {
    pub name: &'static str,
    pub path: &'static str,
}

/// Panel placement and the plugins served under `/devtools`.
pub fn panel_config() -> PanelConfig {
    PanelConfig {
        position: "bottom-right",
        theme: "light",
        plugins: vec![
            Plugin {
                name: "Store",
                path: "/devtools/store",
            },
            Plugin {
                name: "Dependencies",
                path: "/devtools/package",
            },
        ],
    }
}
