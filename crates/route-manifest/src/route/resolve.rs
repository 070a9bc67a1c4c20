/// Route resolution
///
/// Turns the serialized route descriptors of a manifest snapshot into
/// executable routes: the pre-computed `pattern` becomes a compiled matcher,
/// the segments become a [`RouteGenerator`], and nested redirect and fallback
/// descriptors are resolved recursively into a tree with the same shape.
///
/// Resolution is pure. The input is only borrowed, and resolving the same
/// descriptor twice yields equal routes.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::generator::{RouteGenerator, TrailingSlash};
use super::params::{ParamValue, Params};
use super::segment::{RouteSegment, SPREAD_MARKER};
use crate::error::{BuildError, TemplateFillError};

/// Nesting limit for redirect and fallback routes
pub const DEFAULT_MAX_FALLBACK_DEPTH: usize = 8;

/// Status used for redirects configured with a bare destination
pub const DEFAULT_REDIRECT_STATUS: u16 = 301;

// ============================================================================
// Wire Types
// ============================================================================

/// What a route produces when matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    Page,
    Endpoint,
    Redirect,
    Fallback,
}

/// Per-route build metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    #[serde(default)]
    pub trailing_slash: TrailingSlash,
}

/// Redirect configuration of a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RedirectTarget {
    /// Destination path, answered with a 301
    Destination(String),
    Config { status: u16, destination: String },
}

impl RedirectTarget {
    pub fn status(&self) -> u16 {
        match self {
            RedirectTarget::Destination(_) => DEFAULT_REDIRECT_STATUS,
            RedirectTarget::Config { status, .. } => *status,
        }
    }

    pub fn destination(&self) -> &str {
        match self {
            RedirectTarget::Destination(destination) => destination,
            RedirectTarget::Config { destination, .. } => destination,
        }
    }
}

/// A route as it appears in the serialized snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRouteDescriptor {
    /// Canonical route id, e.g. `/en/about-us` or `/[lang]/blog/[...slug]`
    pub route: String,
    #[serde(rename = "type")]
    pub route_type: RouteType,
    /// Regular expression source matched against request paths
    pub pattern: String,
    #[serde(default)]
    pub segments: Vec<RouteSegment>,
    /// Parameter names in capture-group order; spread names keep `...`
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub component: String,
    #[serde(default)]
    pub pathname: Option<String>,
    #[serde(default)]
    pub prerender: bool,
    #[serde(default)]
    pub redirect: Option<RedirectTarget>,
    #[serde(default)]
    pub redirect_route: Option<Box<RawRouteDescriptor>>,
    /// Locale fallbacks, in priority order
    #[serde(default)]
    pub fallback_routes: Vec<RawRouteDescriptor>,
    #[serde(default)]
    pub is_index: bool,
    #[serde(rename = "_meta", default)]
    pub meta: RouteMeta,
}

impl RawRouteDescriptor {
    pub fn trailing_slash(&self) -> TrailingSlash {
        self.meta.trailing_slash
    }
}

// ============================================================================
// Resolved Routes
// ============================================================================

/// An executable route
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub route: String,
    pub route_type: RouteType,
    pub matcher: Regex,
    pub generator: RouteGenerator,
    pub segments: Vec<RouteSegment>,
    pub params: Vec<String>,
    pub component: String,
    pub pathname: Option<String>,
    pub prerender: bool,
    pub redirect: Option<RedirectTarget>,
    pub redirect_route: Option<Box<ResolvedRoute>>,
    pub fallback_routes: Vec<ResolvedRoute>,
    pub is_index: bool,
    pub trailing_slash: TrailingSlash,
}

impl PartialEq for ResolvedRoute {
    fn eq(&self, other: &Self) -> bool {
        self.route == other.route
            && self.route_type == other.route_type
            && self.matcher.as_str() == other.matcher.as_str()
            && self.generator == other.generator
            && self.segments == other.segments
            && self.params == other.params
            && self.component == other.component
            && self.pathname == other.pathname
            && self.prerender == other.prerender
            && self.redirect == other.redirect
            && self.redirect_route == other.redirect_route
            && self.fallback_routes == other.fallback_routes
            && self.is_index == other.is_index
            && self.trailing_slash == other.trailing_slash
    }
}

impl Eq for ResolvedRoute {}

impl ResolvedRoute {
    /// Source text of the compiled matcher
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    /// Tests this route's own matcher, ignoring fallbacks
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Builds a concrete path for this route
    pub fn generate(&self, params: &Params) -> Result<String, TemplateFillError> {
        self.generator.generate(params)
    }

    /// Extracts parameter values from a path matched by this route
    ///
    /// Capture group `i + 1` is bound to the `i`-th parameter name, with the
    /// spread marker removed. Groups that did not participate or captured
    /// nothing are omitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_manifest::route::resolve::{resolve, RawRouteDescriptor};
    ///
    /// let raw: RawRouteDescriptor = serde_json::from_str(r#"{
    ///     "route": "/[lang]/blog/[...slug]",
    ///     "type": "page",
    ///     "pattern": "^\\/([^/]+?)\\/blog(?:\\/(.*?))?\\/?$",
    ///     "params": ["lang", "...slug"]
    /// }"#).unwrap();
    /// let route = resolve(&raw).unwrap();
    ///
    /// let params = route.extract_params("/en/blog/2024/hello").unwrap();
    /// assert_eq!(params["lang"].as_str(), Some("en"));
    /// assert_eq!(params["slug"].as_str(), Some("2024/hello"));
    /// ```
    pub fn extract_params(&self, path: &str) -> Option<Params> {
        let captures = self.matcher.captures(path)?;
        Some(
            self.params
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    let value = captures.get(i + 1).filter(|m| !m.as_str().is_empty())?;
                    let name = name.strip_prefix(SPREAD_MARKER).unwrap_or(name);
                    Some((name.to_string(), ParamValue::from(value.as_str())))
                })
                .collect(),
        )
    }

    pub fn is_redirect(&self) -> bool {
        self.route_type == RouteType::Redirect
    }

    pub fn is_fallback(&self) -> bool {
        self.route_type == RouteType::Fallback
    }

    /// Walks all nested fallback routes, depth-first, in priority order
    pub fn fallback_chain(&self) -> FallbackChain<'_> {
        FallbackChain {
            stack: self.fallback_routes.iter().rev().collect(),
        }
    }

    /// HTTP status for a redirect route, `None` for other routes
    pub fn redirect_status(&self) -> Option<u16> {
        match &self.redirect {
            Some(target) => Some(target.status()),
            None if self.is_redirect() => Some(DEFAULT_REDIRECT_STATUS),
            None => None,
        }
    }

    /// Location a redirect route points to, `None` for other routes
    ///
    /// A resolved redirect route generates the location from `params`.
    /// Otherwise `[name]` and `[...name]` placeholders in the destination are
    /// replaced with the matching parameter values.
    pub fn redirect_location(&self, params: &Params) -> Result<Option<String>, TemplateFillError> {
        if let Some(target_route) = &self.redirect_route {
            return target_route.generate(params).map(Some);
        }

        let Some(target) = &self.redirect else {
            return Ok(self.is_redirect().then(|| "/".to_string()));
        };

        let location = match target {
            RedirectTarget::Destination(destination) => {
                params.iter().fold(destination.clone(), |location, (name, value)| {
                    match value.to_path_value() {
                        Some(value) => location
                            .replacen(&format!("[{name}]"), &value, 1)
                            .replacen(&format!("[{SPREAD_MARKER}{name}]"), &value, 1),
                        None => location,
                    }
                })
            }
            RedirectTarget::Config { destination, .. } => destination.clone(),
        };

        Ok(Some(location))
    }
}

/// Depth-first iterator over nested fallback routes
///
/// For `R` with fallbacks `[A, B]` where `A` has fallback `C`, yields
/// `A`, `C`, `B`.
#[derive(Debug, Clone)]
pub struct FallbackChain<'a> {
    stack: Vec<&'a ResolvedRoute>,
}

impl<'a> Iterator for FallbackChain<'a> {
    type Item = &'a ResolvedRoute;

    fn next(&mut self) -> Option<Self::Item> {
        let route = self.stack.pop()?;
        self.stack.extend(route.fallback_routes.iter().rev());
        Some(route)
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Compiles raw descriptors into [`ResolvedRoute`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    max_depth: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_FALLBACK_DEPTH,
        }
    }

    /// Sets how many levels of nested redirect/fallback routes are accepted
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolves a descriptor and everything nested under it
    pub fn resolve(&self, raw: &RawRouteDescriptor) -> Result<ResolvedRoute, BuildError> {
        self.resolve_at(raw, 0)
    }

    fn resolve_at(&self, raw: &RawRouteDescriptor, depth: usize) -> Result<ResolvedRoute, BuildError> {
        if depth > self.max_depth {
            return Err(BuildError::DepthExceeded {
                route: raw.route.clone(),
                limit: self.max_depth,
            });
        }

        let matcher = Regex::new(&raw.pattern).map_err(|source| BuildError::InvalidPattern {
            route: raw.route.clone(),
            pattern: raw.pattern.clone(),
            source,
        })?;

        let trailing_slash = raw.trailing_slash();
        let generator = RouteGenerator::compile(&raw.segments, trailing_slash).map_err(|source| {
            BuildError::InvalidSegments {
                route: raw.route.clone(),
                source,
            }
        })?;

        let redirect_route = raw
            .redirect_route
            .as_deref()
            .map(|target| self.resolve_at(target, depth + 1).map(Box::new))
            .transpose()?;

        let fallback_routes = raw
            .fallback_routes
            .iter()
            .map(|fallback| self.resolve_at(fallback, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::trace!(
            route = %raw.route,
            template = generator.template(),
            depth,
            fallbacks = fallback_routes.len(),
            "resolved route"
        );

        Ok(ResolvedRoute {
            route: raw.route.clone(),
            route_type: raw.route_type,
            matcher,
            generator,
            segments: raw.segments.clone(),
            params: raw.params.clone(),
            component: raw.component.clone(),
            pathname: raw.pathname.clone().filter(|pathname| !pathname.is_empty()),
            prerender: raw.prerender,
            redirect: raw.redirect.clone(),
            redirect_route,
            fallback_routes,
            is_index: raw.is_index,
            trailing_slash,
        })
    }
}

/// Resolves a descriptor with the default [`Resolver`]
pub fn resolve(raw: &RawRouteDescriptor) -> Result<ResolvedRoute, BuildError> {
    Resolver::new().resolve(raw)
}
