//! Rewriting of inline image references between storage and display form.
//!
//! Stored markdown keeps image sources relative to the note directory so a
//! notebook can be moved or synced as a plain folder. The editor, however, needs
//! sources it can load, so on open every relative source is resolved through an
//! [`AssetResolver`] and on save the resolved prefix is stripped again.
//!
//! Only `![alt](src)` is inspected. Links, code spans and everything else pass
//! through untouched.

use std::{
    fmt::Debug,
    sync::{Arc, LazyLock},
};

use regex::{Captures, Regex};

use crate::paths::{normalize, with_trailing_slash};

/// Scheme used by [`AssetProtocol`] and recognised as "already resolved".
pub const ASSET_SCHEME: &str = "asset://";

/// Default host part of [`AssetProtocol`] URIs.
pub const DEFAULT_ASSET_PREFIX: &str = "asset://localhost";

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("image pattern is valid"));

/// Maps absolute asset paths to URIs the display layer can load.
pub trait AssetResolver: Send + Sync + Debug {
    /// Resolve an absolute, normalized path into a display URI
    fn resolve(&self, absolute_path: &str) -> String;

    /// Whether `src` is already a display URI and must not be resolved again
    fn is_display_uri(&self, src: &str) -> bool {
        src.starts_with(ASSET_SCHEME)
    }
}

/// Resolver that prefixes paths with a fixed URI origin.
///
/// The mapping is prefix-preserving: `resolve(dir + rel)` always equals
/// `resolve(dir) + rel`, which is what lets [`MarkdownAssets::to_storage`]
/// recover the original relative source by stripping a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetProtocol {
    prefix: String,
}

impl AssetProtocol {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        while prefix.ends_with('/') && !prefix.ends_with("://") {
            prefix.pop();
        }
        Self { prefix }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for AssetProtocol {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_PREFIX)
    }
}

impl AssetResolver for AssetProtocol {
    fn resolve(&self, absolute_path: &str) -> String {
        let path = normalize(absolute_path);
        if path.starts_with('/') {
            format!("{}{path}", self.prefix)
        } else {
            format!("{}/{path}", self.prefix)
        }
    }

    fn is_display_uri(&self, src: &str) -> bool {
        src.starts_with(ASSET_SCHEME) || (!self.prefix.is_empty() && src.starts_with(&self.prefix))
    }
}

/// Stateless rewriter for image sources in markdown.
#[derive(Debug, Clone)]
pub struct MarkdownAssets {
    resolver: Arc<dyn AssetResolver>,
}

impl MarkdownAssets {
    pub fn new(resolver: Arc<dyn AssetResolver>) -> Self {
        Self { resolver }
    }

    /// Rewrite relative image sources into display URIs.
    ///
    /// External (`http...`) and already-resolved sources are left as they are.
    #[must_use]
    pub fn to_display(&self, markdown: &str, note_path: &str) -> String {
        let base = with_trailing_slash(note_path);
        IMAGE_RE
            .replace_all(markdown, |caps: &Captures<'_>| {
                let (Some(alt), Some(src)) = (caps.get(1), caps.get(2)) else {
                    return caps[0].to_string();
                };
                let src = src.as_str();
                if src.starts_with("http") || self.resolver.is_display_uri(src) {
                    return caps[0].to_string();
                }
                let absolute = normalize(&format!("{base}{src}"));
                format!("![{}]({})", alt.as_str(), self.resolver.resolve(&absolute))
            })
            .into_owned()
    }

    /// Strip display URIs and absolute directory prefixes back to sources
    /// relative to the note directory.
    #[must_use]
    pub fn to_storage(&self, markdown: &str, note_path: &str) -> String {
        let dir_base = with_trailing_slash(note_path);
        let display_base = self.resolver.resolve(&dir_base);
        IMAGE_RE
            .replace_all(markdown, |caps: &Captures<'_>| {
                let (Some(alt), Some(src)) = (caps.get(1), caps.get(2)) else {
                    return caps[0].to_string();
                };
                let src = src.as_str();
                let relative = src
                    .strip_prefix(display_base.as_str())
                    .or_else(|| src.strip_prefix(dir_base.as_str()))
                    .unwrap_or(src);
                format!("![{}]({relative})", alt.as_str())
            })
            .into_owned()
    }
}

impl Default for MarkdownAssets {
    fn default() -> Self {
        Self::new(Arc::new(AssetProtocol::default()))
    }
}
