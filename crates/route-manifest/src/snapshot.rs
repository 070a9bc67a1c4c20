/// Serialized manifest snapshot
///
/// The wire shape written by the site build. Field names follow the JSON
/// (camelCase); map-like collections that the build serializes as lists of
/// `[key, value]` pairs are kept as pair lists here and turned into maps
/// when the [`RouteTable`](crate::RouteTable) is built.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::i18n::I18nConfig;
use crate::route::{RawRouteDescriptor, TrailingSlash};

/// Root of the snapshot document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSnapshot {
    #[serde(default)]
    pub adapter_name: String,
    #[serde(default)]
    pub routes: Vec<RawRouteInfo>,
    #[serde(default = "default_base")]
    pub base: String,
    #[serde(default)]
    pub trailing_slash: TrailingSlash,
    #[serde(default, rename = "compressHTML")]
    pub compress_html: bool,
    #[serde(default)]
    pub component_metadata: Vec<(String, ComponentMetadata)>,
    /// Renderer descriptors, opaque here
    #[serde(default)]
    pub renderers: Vec<serde_json::Value>,
    /// Hydration directive name → bootstrap snippet
    #[serde(default)]
    pub client_directives: Vec<(String, String)>,
    #[serde(default)]
    pub entry_modules: BTreeMap<String, String>,
    #[serde(default)]
    pub inlined_scripts: Vec<(String, String)>,
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default)]
    pub i18n: Option<I18nConfig>,
    #[serde(default)]
    pub build_format: BuildFormat,
}

fn default_base() -> String {
    "/".to_string()
}

impl Default for ManifestSnapshot {
    fn default() -> Self {
        Self {
            adapter_name: String::new(),
            routes: Vec::new(),
            base: default_base(),
            trailing_slash: TrailingSlash::default(),
            compress_html: false,
            component_metadata: Vec::new(),
            renderers: Vec::new(),
            client_directives: Vec::new(),
            entry_modules: BTreeMap::new(),
            inlined_scripts: Vec::new(),
            assets: Vec::new(),
            i18n: None,
            build_format: BuildFormat::default(),
        }
    }
}

impl ManifestSnapshot {
    /// Parses a snapshot from JSON text
    ///
    /// # Examples
    ///
    /// ```
    /// use route_manifest::snapshot::ManifestSnapshot;
    ///
    /// let snapshot = ManifestSnapshot::from_json(r#"{"routes": [], "assets": ["/favicon.svg"]}"#).unwrap();
    /// assert_eq!(snapshot.base, "/");
    /// assert_eq!(snapshot.assets, vec!["/favicon.svg"]);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuildError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Route descriptors in table order
    pub fn route_descriptors(&self) -> impl Iterator<Item = &RawRouteDescriptor> {
        self.routes.iter().map(|info| &info.route_data)
    }
}

/// One built route and the assets its page pulls in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRouteInfo {
    /// Output file, empty for on-demand routes
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub scripts: Vec<RouteScript>,
    #[serde(default)]
    pub styles: Vec<RouteStyle>,
    pub route_data: RawRouteDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum RouteScript {
    External(String),
    Inline(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RouteStyle {
    Inline { content: String },
    External { src: String },
}

/// How a component's head content propagates to its parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Propagation {
    #[default]
    None,
    #[serde(rename = "self")]
    SelfOnly,
    InTree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    #[serde(default)]
    pub propagation: Propagation,
    #[serde(default)]
    pub contains_head: bool,
}

/// Layout of the generated HTML files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildFormat {
    #[default]
    Directory,
    File,
    Preserve,
}
