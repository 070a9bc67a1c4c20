//! Request dispatch decisions
//!
//! A thin consumer of the route table: given a request path it decides what
//! kind of response the server should produce. Rendering, redirect responses,
//! and not-found pages belong to the caller.

use crate::error::TemplateFillError;
use crate::logging::Logger;
use crate::route::{Params, ResolvedRoute, DEFAULT_REDIRECT_STATUS};
use crate::table::{RouteMatch, RouteTable};

/// What to do with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<'t> {
    /// Serve the static asset at the request path
    Asset,
    Render {
        route: &'t ResolvedRoute,
        params: Params,
    },
    /// Serve `fallback`, which stands in for `route` in another locale
    Fallback {
        route: &'t ResolvedRoute,
        fallback: &'t ResolvedRoute,
        params: Params,
    },
    Redirect {
        location: String,
        status: u16,
    },
    NotFound,
}

/// Turns request paths into [`Dispatch`] decisions
pub struct Dispatcher<'t, L: Logger> {
    table: &'t RouteTable,
    logger: L,
}

impl<'t, L: Logger> Dispatcher<'t, L> {
    pub fn new(table: &'t RouteTable, logger: L) -> Self {
        Self { table, logger }
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// Decides how to answer `path`
    ///
    /// Fails only when a redirect location cannot be generated from the
    /// captured parameters.
    pub fn dispatch(&self, path: &str) -> Result<Dispatch<'t>, TemplateFillError> {
        if self.table.is_asset(path) {
            self.logger.debug(&format!("{path} -> asset"));
            return Ok(Dispatch::Asset);
        }

        let Some(found) = self.table.match_route(path) else {
            self.logger.debug(&format!("{path} -> no matching route"));
            return Ok(Dispatch::NotFound);
        };

        let decision = self.decide(found)?;
        self.logger.debug(&format!("{path} -> {}", describe(&decision)));
        Ok(decision)
    }

    fn decide(&self, found: RouteMatch<'t>) -> Result<Dispatch<'t>, TemplateFillError> {
        let route = found.route();

        if found.matched.is_redirect() {
            let location = found
                .matched
                .redirect_location(&found.params)
                .map_err(|e| {
                    self.logger
                        .error(&format!("redirect from `{}` failed: {e}", found.matched.route));
                    e
                })?
                .unwrap_or_else(|| "/".to_string());
            let status = found
                .matched
                .redirect_status()
                .unwrap_or(DEFAULT_REDIRECT_STATUS);
            return Ok(Dispatch::Redirect { location, status });
        }

        if found.is_fallback() || found.matched.is_fallback() {
            return Ok(Dispatch::Fallback {
                route,
                fallback: found.matched,
                params: found.params,
            });
        }

        Ok(Dispatch::Render {
            route,
            params: found.params,
        })
    }
}

fn describe(decision: &Dispatch<'_>) -> String {
    match decision {
        Dispatch::Asset => "asset".to_string(),
        Dispatch::Render { route, .. } => format!("render {}", route.component),
        Dispatch::Fallback { route, fallback, .. } => {
            format!("fallback {} for {}", fallback.component, route.route)
        }
        Dispatch::Redirect { location, status } => format!("redirect {status} {location}"),
        Dispatch::NotFound => "not found".to_string(),
    }
}
