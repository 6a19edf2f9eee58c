//! Text handlers: a search pattern plus a replacement constructor
//!
//! Composition > Inheritance. Every handler is an immutable value behind the
//! [`Handler`] trait; the transformer only asks it for its pattern, whether a
//! match counts, and what to put in its place.

use crate::error::{LinkifyError, Result};
use crate::patterns;
use regex::{Captures, Regex};
use smallvec::{smallvec, SmallVec};

/// Replacement nodes for one match. Almost always a single link.
pub type Replacements = SmallVec<[Replacement; 1]>;

/// A node a handler wants in place of matched text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Link element: `href` is the destination, `caption` the visible text
    Link { href: String, caption: String },
    /// Generated text. Unlike literal text it is never scanned again.
    Text(String),
}

impl Replacement {
    /// Link whose caption is its destination
    pub fn link(href: impl Into<String>) -> Self {
        let href = href.into();
        Self::Link {
            caption: href.clone(),
            href,
        }
    }

    pub fn link_with_caption(href: impl Into<String>, caption: impl Into<String>) -> Self {
        Self::Link {
            href: href.into(),
            caption: caption.into(),
        }
    }
}

/// Matcher + replacer
pub trait Handler: Send + Sync + std::fmt::Debug {
    /// Human-readable name for logging
    fn name(&self) -> &str;

    fn pattern(&self) -> &Regex;

    /// Veto a regex match after the fact. `haystack` is the whole text the
    /// match was found in.
    fn accepts(&self, haystack: &str, captures: &Captures<'_>) -> bool {
        let _ = (haystack, captures);
        true
    }

    /// Build the replacement for an accepted match. Group 0 is the matched text.
    fn replace(&self, captures: &Captures<'_>) -> Replacements;
}

/// URLs: absolute, `www`-prefixed, bare `domain.tld/` and IPv4 hosts
#[derive(Debug, Clone)]
pub struct UrlHandler {
    /// Give scheme-less matches an `http://` destination
    pub force_absolute_urls: bool,
}

impl UrlHandler {
    pub fn new(force_absolute_urls: bool) -> Self {
        Self { force_absolute_urls }
    }
}

impl Default for UrlHandler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Handler for UrlHandler {
    fn name(&self) -> &str {
        "url"
    }

    fn pattern(&self) -> &Regex {
        &patterns::URL
    }

    fn accepts(&self, haystack: &str, captures: &Captures<'_>) -> bool {
        match captures.name("opaque") {
            Some(opaque) => !patterns::ATTRIBUTE_TAIL.is_match(&haystack[opaque.end()..]),
            None => true,
        }
    }

    fn replace(&self, captures: &Captures<'_>) -> Replacements {
        let caption = &captures[0];

        if self.force_absolute_urls && captures.name("scheme").is_none() {
            smallvec![Replacement::link_with_caption(
                format!("http://{caption}"),
                caption
            )]
        } else {
            smallvec![Replacement::link(caption)]
        }
    }
}

/// E-mail addresses, linked as `mailto:`
#[derive(Debug, Clone, Default)]
pub struct EmailAddressHandler;

impl EmailAddressHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Handler for EmailAddressHandler {
    fn name(&self) -> &str {
        "email"
    }

    fn pattern(&self) -> &Regex {
        &patterns::EMAIL
    }

    fn replace(&self, captures: &Captures<'_>) -> Replacements {
        let address = &captures[0];
        smallvec![Replacement::link_with_caption(
            format!("mailto:{address}"),
            address
        )]
    }
}

/// Caller-defined pattern. The destination is `href` with `$1` / `${name}`
/// references expanded from the match; the caption is the matched text.
#[derive(Debug, Clone)]
pub struct PatternHandler {
    name: String,
    pattern: Regex,
    href: String,
}

impl PatternHandler {
    pub fn new(name: impl Into<String>, pattern: &str, href: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|source| LinkifyError::InvalidPattern {
            name: name.clone(),
            source,
        })?;

        Ok(Self {
            name,
            pattern,
            href: href.into(),
        })
    }
}

impl Handler for PatternHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn replace(&self, captures: &Captures<'_>) -> Replacements {
        let mut href = String::new();
        captures.expand(&self.href, &mut href);
        smallvec![Replacement::link_with_caption(href, &captures[0])]
    }
}
