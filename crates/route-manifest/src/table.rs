/// Route table
///
/// The immutable, ordered collection of resolved routes plus the auxiliary
/// sets of a manifest snapshot. It is built once at startup; a failure
/// anywhere in the snapshot fails the whole build, so a table that exists is
/// always complete.
///
/// Lookups take `&self` only, so one table can be shared across threads
/// without locking.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use once_cell::sync::OnceCell;

use crate::error::BuildError;
use crate::i18n::I18nConfig;
use crate::path::{decode_uri, encode_reserved, ensure_leading_slash, strip_base};
use crate::route::{Params, ResolvedRoute, Resolver, TrailingSlash};
use crate::snapshot::{
    BuildFormat, ComponentMetadata, ManifestSnapshot, RawRouteInfo, RouteScript, RouteStyle,
};

static INSTALLED: OnceCell<RouteTable> = OnceCell::new();

// ============================================================================
// Core Types
// ============================================================================

/// A resolved route together with the build output that serves it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Output file, empty for on-demand routes
    pub file: String,
    pub links: Vec<String>,
    pub scripts: Vec<RouteScript>,
    pub styles: Vec<RouteStyle>,
    pub route: ResolvedRoute,
}

/// Result of looking up a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'t> {
    /// The table entry that won
    pub entry: &'t RouteEntry,
    /// The route whose matcher accepted the path: the entry's own route or
    /// one of its direct fallbacks
    pub matched: &'t ResolvedRoute,
    /// Parameters captured by `matched`
    pub params: Params,
}

impl<'t> RouteMatch<'t> {
    /// The table route, regardless of which matcher hit
    pub fn route(&self) -> &'t ResolvedRoute {
        &self.entry.route
    }

    /// Whether the path was accepted by a fallback matcher
    pub fn is_fallback(&self) -> bool {
        !std::ptr::eq(self.matched, &self.entry.route)
    }
}

/// Read-only route table built from a [`ManifestSnapshot`]
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    assets: HashSet<String>,
    component_metadata: HashMap<String, ComponentMetadata>,
    client_directives: HashMap<String, String>,
    inlined_scripts: HashMap<String, String>,
    entry_modules: BTreeMap<String, String>,
    i18n: Option<I18nConfig>,
    base: String,
    trailing_slash: TrailingSlash,
    build_format: BuildFormat,
    adapter_name: String,
    compress_html: bool,
}

// ============================================================================
// Construction
// ============================================================================

impl RouteTable {
    /// Builds a table with the default [`Resolver`]
    pub fn build(snapshot: ManifestSnapshot) -> Result<Self, BuildError> {
        Self::build_with(snapshot, &Resolver::default())
    }

    /// Builds a table, resolving every route with `resolver`
    pub fn build_with(snapshot: ManifestSnapshot, resolver: &Resolver) -> Result<Self, BuildError> {
        if let Some(i18n) = &snapshot.i18n {
            i18n.validate()?;
        }

        let entries = snapshot
            .routes
            .into_iter()
            .map(|info| resolve_entry(info, resolver))
            .collect::<Result<Vec<_>, _>>()?;

        let table = Self {
            entries,
            assets: snapshot.assets.into_iter().collect(),
            component_metadata: snapshot.component_metadata.into_iter().collect(),
            client_directives: snapshot.client_directives.into_iter().collect(),
            inlined_scripts: snapshot.inlined_scripts.into_iter().collect(),
            entry_modules: snapshot.entry_modules,
            i18n: snapshot.i18n,
            base: snapshot.base,
            trailing_slash: snapshot.trailing_slash,
            build_format: snapshot.build_format,
            adapter_name: snapshot.adapter_name,
            compress_html: snapshot.compress_html,
        };

        tracing::info!(
            routes = table.entries.len(),
            fallbacks = table.fallback_count(),
            assets = table.assets.len(),
            directives = table.client_directives.len(),
            "route table built"
        );

        Ok(table)
    }

    /// Parses and builds from snapshot JSON
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Self::build(ManifestSnapshot::from_json(json)?)
    }

    /// Reads, parses, and builds from a snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuildError> {
        Self::build(ManifestSnapshot::load(path)?)
    }

    fn fallback_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.route.fallback_chain().count())
            .sum()
    }

    /// Makes this table the process-wide one
    ///
    /// Succeeds once. Later calls hand the rejected table back.
    pub fn install(self) -> Result<&'static RouteTable, RouteTable> {
        INSTALLED.try_insert(self).map_err(|(_, rejected)| rejected)
    }

    /// The process-wide table, if one was installed
    pub fn installed() -> Option<&'static RouteTable> {
        INSTALLED.get()
    }
}

fn resolve_entry(info: RawRouteInfo, resolver: &Resolver) -> Result<RouteEntry, BuildError> {
    Ok(RouteEntry {
        route: resolver.resolve(&info.route_data)?,
        file: info.file,
        links: info.links,
        scripts: info.scripts,
        styles: info.styles,
    })
}

// ============================================================================
// Matching
// ============================================================================

impl RouteTable {
    /// Finds the first route matching a request path
    ///
    /// The base is stripped, a leading `/` ensured, and the path decoded like
    /// `decodeURI`. The decoded path is tried first, then the same path with
    /// `?` and `#` percent-encoded so literal segments built from those
    /// characters still match. A route matches when its own matcher or one of
    /// its direct fallbacks' matchers accepts the path.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_manifest::RouteTable;
    ///
    /// let table = RouteTable::from_json(r#"{"routes": [{
    ///     "file": "en/about-us/index.html",
    ///     "routeData": {
    ///         "route": "/en/about-us",
    ///         "type": "page",
    ///         "pattern": "^\\/en\\/about-us\\/?$",
    ///         "segments": [[{"content": "en"}], [{"content": "about-us"}]],
    ///         "component": "src/pages/en/about-us.astro"
    ///     }
    /// }]}"#).unwrap();
    ///
    /// let found = table.match_route("/en/about-us/").unwrap();
    /// assert_eq!(found.route().component, "src/pages/en/about-us.astro");
    /// assert!(table.match_route("/es/nosotros").is_none());
    /// ```
    pub fn match_route(&self, path: &str) -> Option<RouteMatch<'_>> {
        let candidates = self.candidates(path);
        self.entries
            .iter()
            .find_map(|entry| match_entry(entry, &candidates))
    }

    /// Every route matching a request path, in table order
    pub fn match_all(&self, path: &str) -> Vec<RouteMatch<'_>> {
        let candidates = self.candidates(path);
        self.entries
            .iter()
            .filter_map(|entry| match_entry(entry, &candidates))
            .collect()
    }

    fn candidates(&self, path: &str) -> Vec<String> {
        let rooted = ensure_leading_slash(strip_base(path, &self.base));
        let decoded = decode_uri(&rooted).into_owned();
        let encoded = encode_reserved(&decoded).into_owned();

        if encoded == decoded {
            vec![decoded]
        } else {
            vec![decoded, encoded]
        }
    }
}

fn match_entry<'t>(entry: &'t RouteEntry, candidates: &[String]) -> Option<RouteMatch<'t>> {
    candidates.iter().find_map(|candidate| {
        std::iter::once(&entry.route)
            .chain(entry.route.fallback_routes.iter())
            .find(|route| route.matches(candidate))
            .map(|matched| RouteMatch {
                entry,
                matched,
                params: matched.extract_params(candidate).unwrap_or_default(),
            })
    })
}

// ============================================================================
// Lookups
// ============================================================================

impl RouteTable {
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Resolved routes in table order
    pub fn routes(&self) -> impl Iterator<Item = &ResolvedRoute> {
        self.entries.iter().map(|entry| &entry.route)
    }

    /// First route with the given route id
    pub fn find_route(&self, route: &str) -> Option<&ResolvedRoute> {
        self.routes().find(|r| r.route == route)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a request path names a static asset
    pub fn is_asset(&self, path: &str) -> bool {
        self.assets.contains(path)
            || self
                .assets
                .contains(ensure_leading_slash(strip_base(path, &self.base)).as_ref())
    }

    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(String::as_str)
    }

    pub fn component_metadata(&self, component: &str) -> Option<&ComponentMetadata> {
        self.component_metadata.get(component)
    }

    /// Bootstrap snippet of a client hydration directive
    pub fn client_directive(&self, name: &str) -> Option<&str> {
        self.client_directives.get(name).map(String::as_str)
    }

    pub fn inlined_script(&self, id: &str) -> Option<&str> {
        self.inlined_scripts.get(id).map(String::as_str)
    }

    pub fn entry_module(&self, id: &str) -> Option<&str> {
        self.entry_modules.get(id).map(String::as_str)
    }

    pub fn i18n(&self) -> Option<&I18nConfig> {
        self.i18n.as_ref()
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn trailing_slash(&self) -> TrailingSlash {
        self.trailing_slash
    }

    pub fn build_format(&self) -> BuildFormat {
        self.build_format
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    pub fn compress_html(&self) -> bool {
        self.compress_html
    }
}
