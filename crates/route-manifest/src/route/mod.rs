/// Route compilation
///
/// Leaf-first:
/// - `segment`: typed segment descriptors
/// - `template`: named-parameter path templates, only ever filled
/// - `generator`: segments → template → reverse path builder
/// - `resolve`: raw descriptors → executable routes with fallback trees

pub mod generator;
pub mod params;
pub mod resolve;
pub mod segment;
pub mod template;

pub use generator::{RouteGenerator, TrailingSlash};
pub use params::{params_from, ParamValue, Params};
pub use resolve::{
    resolve, FallbackChain, RawRouteDescriptor, RedirectTarget, ResolvedRoute, Resolver,
    RouteMeta, RouteType, DEFAULT_MAX_FALLBACK_DEPTH, DEFAULT_REDIRECT_STATUS,
};
pub use segment::{PathSegmentPart, RouteSegment};
