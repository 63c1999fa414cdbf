//! Message translation
//!
//! The console interpolates human-readable labels into notification text
//! through the [`Translate`] trait. [`Catalog`] is a map-backed
//! implementation with `%{name}` placeholder interpolation; the built-in
//! English catalog covers every key the settings engine emits.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Opaque string-formatting capability consumed by message producers
pub trait Translate: Send + Sync {
    /// Resolve `key` to a message and interpolate `args` into it.
    ///
    /// Unknown keys fall back to the key itself so a missing catalog entry
    /// degrades to something greppable rather than an empty toast.
    fn translate(&self, key: &str, args: &[(&str, &str)]) -> String;
}

static ENGLISH: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("settings.save.success.title", "Settings saved"),
        ("settings.save.success.detail", "%{label} was saved to %{scope}."),
        ("settings.save.error.title", "Saving failed"),
        (
            "settings.save.error.detail",
            "%{label} could not be saved to %{scope}: %{error}",
        ),
        ("settings.inherit.error.title", "Could not load inherited value"),
        (
            "settings.inherit.error.detail",
            "%{label} keeps its current override: %{error}",
        ),
        ("settings.scope.global", "the global configuration"),
        ("settings.scope.overlay", "figurine box %{overlay}"),
    ])
});

/// Map-backed message catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    /// An empty catalog; every lookup falls back to the key.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in English messages.
    pub fn english() -> Self {
        let messages = ENGLISH
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { messages }
    }

    /// Add or replace a message template.
    pub fn insert(&mut self, key: &str, template: &str) {
        self.messages.insert(key.to_string(), template.to_string());
    }
}

impl Translate for Catalog {
    fn translate(&self, key: &str, args: &[(&str, &str)]) -> String {
        let template = self.messages.get(key).map(String::as_str).unwrap_or(key);
        interpolate(template, args)
    }
}

/// Replace `%{name}` placeholders with the matching argument values.
///
/// Placeholders with no matching argument are left verbatim.
fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(&format!("%{{{}}}", name), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_named_placeholders() {
        let catalog = Catalog::english();
        let message = catalog.translate(
            "settings.save.success.detail",
            &[("label", "Cloud access"), ("scope", "figurine box boxA")],
        );
        assert_eq!(message, "Cloud access was saved to figurine box boxA.");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let catalog = Catalog::new();
        assert_eq!(catalog.translate("no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn unmatched_placeholder_is_left_verbatim() {
        let mut catalog = Catalog::new();
        catalog.insert("greet", "Hello %{who}");
        assert_eq!(catalog.translate("greet", &[]), "Hello %{who}");
    }

    #[test]
    fn english_catalog_covers_engine_keys() {
        let catalog = Catalog::english();
        for key in [
            "settings.save.success.title",
            "settings.save.error.detail",
            "settings.inherit.error.title",
            "settings.scope.global",
            "settings.scope.overlay",
        ] {
            assert_ne!(catalog.translate(key, &[]), key, "missing catalog key {}", key);
        }
    }
}
