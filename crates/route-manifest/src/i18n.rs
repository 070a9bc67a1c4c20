// File: src/i18n.rs
// Purpose: Locale configuration carried by the manifest snapshot

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// How locales appear in URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingStrategy {
    #[default]
    PathnamePrefixOtherLocales,
    PathnamePrefixAlways,
    PathnamePrefixAlwaysNoRedirect,
    DomainsPrefixOtherLocales,
    DomainsPrefixAlways,
    DomainsPrefixAlwaysNoRedirect,
}

impl RoutingStrategy {
    /// Whether paths of the default locale carry a locale prefix too
    pub fn prefixes_default_locale(&self) -> bool {
        !matches!(
            self,
            RoutingStrategy::PathnamePrefixOtherLocales | RoutingStrategy::DomainsPrefixOtherLocales
        )
    }

    pub fn uses_domains(&self) -> bool {
        matches!(
            self,
            RoutingStrategy::DomainsPrefixOtherLocales
                | RoutingStrategy::DomainsPrefixAlways
                | RoutingStrategy::DomainsPrefixAlwaysNoRedirect
        )
    }
}

/// A configured locale: a bare code, or a URL path shared by several codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleEntry {
    Code(String),
    Path { path: String, codes: Vec<String> },
}

impl LocaleEntry {
    /// The path segment used for this locale
    pub fn path(&self) -> &str {
        match self {
            LocaleEntry::Code(code) => code,
            LocaleEntry::Path { path, .. } => path,
        }
    }

    pub fn codes(&self) -> Vec<&str> {
        match self {
            LocaleEntry::Code(code) => vec![code.as_str()],
            LocaleEntry::Path { codes, .. } => codes.iter().map(String::as_str).collect(),
        }
    }
}

/// Locale routing configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nConfig {
    /// Locale → locale whose content is served when a page is missing
    #[serde(default)]
    pub fallback: BTreeMap<String, String>,
    #[serde(default)]
    pub strategy: RoutingStrategy,
    #[serde(default)]
    pub locales: Vec<LocaleEntry>,
    pub default_locale: String,
    #[serde(default)]
    pub domain_lookup_table: BTreeMap<String, String>,
}

impl I18nConfig {
    /// Path segments of all configured locales, in configuration order
    pub fn locale_paths(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(LocaleEntry::path)
    }

    fn is_locale(&self, locale: &str) -> bool {
        self.locale_paths().any(|path| path == locale)
    }

    /// Checks the default locale, fallback entries, and fallback chains
    pub fn validate(&self) -> Result<(), BuildError> {
        if !self.is_locale(&self.default_locale) {
            return Err(BuildError::I18n(format!(
                "default locale `{}` is not a configured locale",
                self.default_locale
            )));
        }

        for (from, to) in &self.fallback {
            if let Some(unknown) = [from, to].into_iter().find(|l| !self.is_locale(l)) {
                return Err(BuildError::I18n(format!(
                    "fallback `{from}` -> `{to}` names unknown locale `{unknown}`"
                )));
            }
        }

        self.fallback
            .keys()
            .try_for_each(|locale| self.fallback_chain(locale).map(drop))
    }

    /// Locales to try after `locale`, in order
    ///
    /// The chain follows the fallback map until a locale has no fallback.
    /// It can be no longer than the number of configured locales; revisiting
    /// a locale is a cycle and is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_manifest::i18n::I18nConfig;
    ///
    /// let config: I18nConfig = serde_json::from_str(r#"{
    ///     "fallback": {"fr": "en", "en": "es"},
    ///     "strategy": "pathname-prefix-always",
    ///     "locales": ["es", "en", "fr"],
    ///     "defaultLocale": "es"
    /// }"#).unwrap();
    ///
    /// assert_eq!(config.fallback_chain("fr").unwrap(), vec!["en", "es"]);
    /// assert!(config.fallback_chain("es").unwrap().is_empty());
    /// ```
    pub fn fallback_chain(&self, locale: &str) -> Result<Vec<&str>, BuildError> {
        let mut seen = HashSet::from([locale]);
        let mut chain = Vec::new();
        let mut current = locale;

        while let Some(next) = self.fallback.get(current) {
            if !seen.insert(next.as_str()) || chain.len() >= self.locales.len() {
                return Err(BuildError::I18n(format!(
                    "fallback chain starting at `{locale}` loops back to `{next}`"
                )));
            }
            chain.push(next.as_str());
            current = next;
        }

        Ok(chain)
    }

    /// Locale of a request path, from its first segment
    ///
    /// Unprefixed paths belong to the default locale when the strategy does
    /// not prefix it.
    pub fn locale_from_path(&self, pathname: &str) -> Option<&str> {
        let first = pathname.trim_start_matches('/').split('/').next()?;

        if let Some(path) = self.locale_paths().find(|path| path.eq_ignore_ascii_case(first)) {
            return Some(path);
        }

        if self.strategy.prefixes_default_locale() {
            None
        } else {
            Some(self.default_locale.as_str())
        }
    }
}
