//! # Route Manifest
//!
//! Runtime side of a pre-rendered site's route manifest:
//! - Compiles route segments into reverse path generators (`/en/:slug`)
//! - Compiles the build's pre-computed match patterns into matchers
//! - Resolves redirect and locale-fallback routes recursively
//! - Builds an immutable, ordered route table with first-match lookup
//! - Carries the manifest's assets, component metadata, hydration
//!   directives, and i18n configuration
//!
//! ## Building a table
//!
//! A table is built once from the JSON snapshot the site build writes. Any
//! bad pattern or segment fails the whole build; there are no partial
//! tables.
//!
//! ## Example
//!
//! ```
//! use route_manifest::{params_from, RouteTable};
//!
//! let table = RouteTable::from_json(r#"{"routes": [{
//!     "file": "",
//!     "routeData": {
//!         "route": "/[lang]/blog/[...slug]",
//!         "type": "page",
//!         "pattern": "^\\/([^/]+?)\\/blog(?:\\/(.*?))?\\/?$",
//!         "params": ["lang", "...slug"],
//!         "segments": [
//!             [{"content": "lang", "dynamic": true}],
//!             [{"content": "blog"}],
//!             [{"content": "...slug", "dynamic": true, "spread": true}]
//!         ],
//!         "component": "src/pages/[lang]/blog/[...slug].astro"
//!     }
//! }]}"#).unwrap();
//!
//! let found = table.match_route("/en/blog/2024/hello").unwrap();
//! assert_eq!(found.params, params_from([("lang", "en"), ("slug", "2024/hello")]));
//!
//! let url = found.route().generate(&params_from([("lang", "es")])).unwrap();
//! assert_eq!(url, "/es/blog");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod dispatch;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod path;
pub mod route;
pub mod snapshot;
pub mod table;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::Config;
pub use dispatch::{Dispatch, Dispatcher};
pub use error::{BuildError, SegmentError, TemplateFillError, TemplateSyntaxError};
pub use i18n::{I18nConfig, LocaleEntry, RoutingStrategy};
pub use logging::{LabeledLogger, LogLevel, Logger, TracingLogger};
pub use route::{
    params_from, resolve, ParamValue, Params, PathSegmentPart, RawRouteDescriptor,
    RedirectTarget, ResolvedRoute, Resolver, RouteGenerator, RouteSegment, RouteType,
    TrailingSlash,
};
pub use snapshot::{BuildFormat, ComponentMetadata, ManifestSnapshot, Propagation};
pub use table::{RouteEntry, RouteMatch, RouteTable};
