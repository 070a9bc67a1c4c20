//! Integration tests for route-manifest
//!
//! Built against a snapshot fixture trimmed from a real bilingual site build,
//! plus a dynamic blog route and a literal `?` route.
//!
//! Tests are organized by feature area and cover:
//! - Table build (all-or-nothing)
//! - Matching (static, dynamic, spread, fallback, encoded)
//! - Generation and the match/generate round trip
//! - Redirects
//! - Auxiliary lookups (assets, directives, metadata, i18n)

use pretty_assertions::assert_eq;
use route_manifest::*;

const FIXTURE: &str = include_str!("fixtures/manifest.json");

fn table() -> RouteTable {
    RouteTable::from_json(FIXTURE).unwrap()
}

/// Sample values for every parameter a route declares
fn sample_params(route: &ResolvedRoute) -> Params {
    route
        .params
        .iter()
        .map(|name| match name.strip_prefix("...") {
            Some(spread) => (spread.to_string(), ParamValue::from("2024/hello-world")),
            None => (name.clone(), ParamValue::from("en")),
        })
        .collect()
}

fn all_routes(table: &RouteTable) -> Vec<&ResolvedRoute> {
    table
        .routes()
        .flat_map(|route| {
            std::iter::once(route)
                .chain(route.fallback_chain())
                .chain(route.redirect_route.as_deref())
        })
        .collect()
}

// ============================================================================
// Build
// ============================================================================

#[test]
fn test_fixture_builds() {
    let table = table();
    assert_eq!(table.len(), 11);
    assert_eq!(table.adapter_name(), "@astrojs/vercel/serverless");
    assert_eq!(table.trailing_slash(), TrailingSlash::Ignore);
    assert_eq!(table.build_format(), BuildFormat::Directory);
    assert!(table.compress_html());
}

#[test]
fn test_load_from_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/manifest.json");
    let table = RouteTable::load(path).unwrap();
    assert_eq!(table.len(), 11);
}

#[test]
fn test_invalid_pattern_fails_whole_build() {
    let mut snapshot = ManifestSnapshot::from_json(FIXTURE).unwrap();
    snapshot.routes[3].route_data.fallback_routes[0].pattern = r"^\/en\/contacto(\/?$".into();

    let err = RouteTable::build(snapshot).unwrap_err();
    match err {
        BuildError::InvalidPattern { route, pattern, .. } => {
            assert_eq!(route, "/en/contacto");
            assert_eq!(pattern, r"^\/en\/contacto(\/?$");
        }
        other => panic!("expected InvalidPattern, got {other}"),
    }
}

#[test]
fn test_inconsistent_segments_fail_build() {
    let mut snapshot = ManifestSnapshot::from_json(FIXTURE).unwrap();
    snapshot.routes[5].route_data.segments[2][0].dynamic = false;

    let err = RouteTable::build(snapshot).unwrap_err();
    assert!(matches!(
        err,
        BuildError::InvalidSegments {
            source: SegmentError::SpreadNotDynamic(_),
            ..
        }
    ));
}

#[test]
fn test_fallback_resolves_like_its_descriptor() {
    let snapshot = ManifestSnapshot::from_json(FIXTURE).unwrap();
    let raw = &snapshot.routes[3].route_data;

    let table = RouteTable::build(snapshot.clone()).unwrap();
    let contacto = table.find_route("/es/contacto").unwrap();

    assert_eq!(contacto.fallback_routes[0], resolve(&raw.fallback_routes[0]).unwrap());
    assert_eq!(contacto, &resolve(raw).unwrap());
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_match_static_pages() {
    let table = table();

    let found = table.match_route("/en/about-us").unwrap();
    assert_eq!(found.route().component, "src/pages/en/about-us.astro");
    assert!(table.match_route("/en/about-us/").is_some());
    assert!(table.match_route("/en/about").is_none());

    let found = table.match_route("/en").unwrap();
    assert!(found.route().is_index);
}

#[test]
fn test_match_root() {
    let table = table();
    let found = table.match_route("/").unwrap();
    assert_eq!(found.route().route, "/");
    assert_eq!(found.route().route_type, RouteType::Page);
    assert!(!found.is_fallback());

    // Both root entries match, page first
    let all = table.match_all("/");
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].route().route_type, RouteType::Fallback);
}

#[test]
fn test_match_through_locale_fallback() {
    let table = table();
    let found = table.match_route("/en/nosotros").unwrap();
    assert_eq!(found.route().route, "/es/nosotros");
    assert_eq!(found.matched.route, "/en/nosotros");
    assert_eq!(found.matched.component, "src/pages/es/nosotros.astro");
    assert!(found.is_fallback());
}

#[test]
fn test_match_dynamic_spread() {
    let table = table();

    let found = table.match_route("/es/blog/2024/hola-mundo").unwrap();
    assert_eq!(found.route().route, "/[lang]/blog/[...slug]");
    assert_eq!(
        found.params,
        params_from([("lang", "es"), ("slug", "2024/hola-mundo")])
    );

    let found = table.match_route("/en/blog").unwrap();
    assert_eq!(found.params, params_from([("lang", "en")]));
}

#[test]
fn test_match_empty_spread_is_absent() {
    let table = table();
    let found = table.match_route("/en/blog/").unwrap();
    assert_eq!(found.params, params_from([("lang", "en")]));
    assert_eq!(found.route().generate(&found.params).unwrap(), "/en/blog");
}

#[test]
fn test_match_decodes_path() {
    let table = table();
    let found = table.match_route("/es/blog/caf%C3%A9").unwrap();
    assert_eq!(found.params.get("slug"), Some(&ParamValue::from("café")));
}

#[test]
fn test_match_literal_question_mark() {
    let table = table();
    assert_eq!(table.match_route("/faq?").unwrap().route().route, "/faq?");
    assert_eq!(table.match_route("/faq%3F").unwrap().route().route, "/faq?");
}

#[test]
fn test_endpoint_route() {
    let table = table();
    let found = table.match_route("/_image").unwrap();
    assert_eq!(found.route().route_type, RouteType::Endpoint);
    assert!(!found.route().prerender);
    assert!(table.match_route("/_image/").is_none());
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_generated_paths_match_their_route() {
    let table = table();
    for route in all_routes(&table) {
        let path = route.generate(&sample_params(route)).unwrap();
        assert!(
            route.matches(&path),
            "{} generated {path} which its pattern {} rejects",
            route.route,
            route.pattern()
        );
    }
}

#[test]
fn test_generate_known_paths() {
    let table = table();
    let generate = |id: &str, params: Params| table.find_route(id).unwrap().generate(&params).unwrap();

    assert_eq!(generate("/", Params::new()), "/");
    assert_eq!(generate("/en/about-us", Params::new()), "/en/about-us");
    assert_eq!(generate("/faq?", Params::new()), "/faq%3F");
    assert_eq!(
        generate("/[lang]/blog/[...slug]", params_from([("lang", "es"), ("slug", "a/b")])),
        "/es/blog/a/b"
    );
    assert_eq!(
        generate("/[lang]/blog/[...slug]", params_from([("lang", "es")])),
        "/es/blog"
    );
}

#[test]
fn test_generate_missing_required_param() {
    let table = table();
    let blog = table.find_route("/[lang]/blog/[...slug]").unwrap();
    assert_eq!(
        blog.generate(&params_from([("slug", "a")])),
        Err(TemplateFillError::MissingParam {
            name: "lang".into()
        })
    );
}

#[test]
fn test_match_params_round_trip() {
    let table = table();
    let found = table.match_route("/en/blog/2024/hello").unwrap();
    let regenerated = found.route().generate(&found.params).unwrap();
    assert_eq!(regenerated, "/en/blog/2024/hello");
}

// ============================================================================
// Redirects
// ============================================================================

#[test]
fn test_redirect_route_location() {
    let table = table();
    let found = table.match_route("/contacto").unwrap();
    let route = found.route();
    assert!(route.is_redirect());
    assert_eq!(route.redirect_status(), Some(301));
    assert_eq!(
        route.redirect_location(&found.params).unwrap().as_deref(),
        Some("/es/contacto")
    );
}

#[test]
fn test_dispatch_fixture() {
    let table = table();
    let dispatcher = Dispatcher::new(&table, TracingLogger::new(LogLevel::Silent));

    assert_eq!(dispatcher.dispatch("/favicon.svg").unwrap(), Dispatch::Asset);
    assert_eq!(
        dispatcher.dispatch("/contacto").unwrap(),
        Dispatch::Redirect {
            location: "/es/contacto".into(),
            status: 301
        }
    );
    assert!(matches!(
        dispatcher.dispatch("/en/contacto").unwrap(),
        Dispatch::Fallback { .. }
    ));
    assert!(matches!(
        dispatcher.dispatch("/en/contact").unwrap(),
        Dispatch::Render { .. }
    ));
    assert_eq!(dispatcher.dispatch("/nope").unwrap(), Dispatch::NotFound);
}

// ============================================================================
// Auxiliary lookups
// ============================================================================

#[test]
fn test_assets_are_queryable() {
    let table = table();
    assert!(table.is_asset("/favicon.svg"));
    assert!(table.is_asset("/_astro/page.BIe0mclZ.js"));
    assert!(!table.is_asset("/en/about-us"));
    // duplicates collapse
    assert_eq!(table.assets().count(), 5);
}

#[test]
fn test_client_directives_are_queryable() {
    let table = table();
    assert!(table.client_directive("idle").unwrap().contains("requestIdleCallback"));
    assert!(table.client_directive("load").unwrap().contains("astro:load"));
    assert_eq!(table.client_directive("only"), None);
}

#[test]
fn test_component_metadata() {
    let table = table();
    let meta = table
        .component_metadata("src/pages/[lang]/blog/[...slug].astro")
        .unwrap();
    assert_eq!(meta.propagation, Propagation::InTree);
    assert!(meta.contains_head);
    assert!(table.component_metadata("src/pages/missing.astro").is_none());
}

#[test]
fn test_entry_modules_and_scripts() {
    let table = table();
    assert_eq!(
        table.entry_module("\u{0}@astrojs-ssr-virtual-entry"),
        Some("entry.mjs")
    );
    let image = table.entries().iter().find(|e| e.route.route == "/_image").unwrap();
    assert_eq!(
        image.scripts,
        vec![snapshot::RouteScript::External("/_astro/page.BIe0mclZ.js".into())]
    );
    assert_eq!(table.inlined_script("anything"), None);
}

#[test]
fn test_i18n_config() {
    let table = table();
    let i18n = table.i18n().unwrap();
    assert_eq!(i18n.default_locale, "es");
    assert_eq!(i18n.strategy, RoutingStrategy::PathnamePrefixAlways);
    assert_eq!(i18n.fallback_chain("en").unwrap(), vec!["es"]);
    assert_eq!(i18n.locale_from_path("/en/contacto"), Some("en"));
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_reads() {
    let table = std::sync::Arc::new(table());
    let handles: Vec<_> = ["/en/about-us", "/en/contacto", "/es/blog/x", "/faq?"]
        .into_iter()
        .map(|path| {
            let table = std::sync::Arc::clone(&table);
            std::thread::spawn(move || table.match_route(path).map(|m| m.route().route.clone()))
        })
        .collect();

    let found: Vec<Option<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        found,
        vec![
            Some("/en/about-us".to_string()),
            Some("/es/contacto".to_string()),
            Some("/[lang]/blog/[...slug]".to_string()),
            Some("/faq?".to_string()),
        ]
    );
}
