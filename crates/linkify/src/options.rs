//! Transform options and their serde configuration
//!
//! `TransformOptions` is what the transformer runs with. `LinkifyConfig` is
//! the plain-data form callers load from JSON and compile once.

use crate::error::Result;
use crate::handler::{EmailAddressHandler, Handler, PatternHandler, UrlHandler};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Elements whose contents are never linkified: links themselves, form
/// controls, embedded content, and document metadata
pub const DEFAULT_EXCLUDED_TAGS: &[&str] = &[
    "a",
    "applet",
    "area",
    "button",
    "embed",
    "frame",
    "frameset",
    "head",
    "iframe",
    "img",
    "input",
    "link",
    "map",
    "meta",
    "object",
    "option",
    "param",
    "script",
    "select",
    "statusbar",
    "style",
    "textarea",
    "title",
];

/// Case-insensitive set of tag names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    tags: AHashSet<String>,
}

impl ExclusionSet {
    /// Nothing excluded
    pub fn empty() -> Self {
        Self {
            tags: AHashSet::new(),
        }
    }

    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|tag| tag.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn insert(&mut self, tag: &str) {
        self.tags.insert(tag.to_ascii_lowercase());
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.tags.remove(&tag.to_ascii_lowercase())
    }

    /// Exact tag match, ignoring ASCII case
    pub fn contains(&self, tag: &str) -> bool {
        if tag.bytes().any(|b| b.is_ascii_uppercase()) {
            self.tags.contains(&tag.to_ascii_lowercase())
        } else {
            self.tags.contains(tag)
        }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in sorted order
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.tags.iter().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_TAGS)
    }
}

/// Exclusion set plus the ordered handler list
///
/// Handler order matters: each handler only sees literal text the earlier
/// ones left alone.
#[derive(Debug)]
pub struct TransformOptions {
    pub exclusion_set: ExclusionSet,
    pub handlers: Vec<Box<dyn Handler>>,
}

impl TransformOptions {
    pub fn new(exclusion_set: ExclusionSet, handlers: Vec<Box<dyn Handler>>) -> Self {
        Self {
            exclusion_set,
            handlers,
        }
    }

    /// Append a handler after the existing ones
    pub fn with_handler(mut self, handler: impl Handler + 'static) -> Self {
        tracing::debug!("Registered handler: {}", handler.name());
        self.handlers.push(Box::new(handler));
        self
    }

    /// Compile a configuration
    pub fn from_config(config: &LinkifyConfig) -> Result<Self> {
        let exclusion_set = match &config.excluded_tags {
            Some(tags) => ExclusionSet::new(tags),
            None => ExclusionSet::default(),
        };

        let handler_configs = match &config.handlers {
            Some(handlers) => handlers.clone(),
            None => default_handler_configs(),
        };

        let mut options = Self::new(exclusion_set, Vec::with_capacity(handler_configs.len()));
        for handler_config in &handler_configs {
            options.handlers.push(handler_config.build()?);
            tracing::debug!("Registered handler: {}", handler_config.name());
        }

        Ok(options)
    }

    pub fn is_excluded(&self, tag: &str) -> bool {
        self.exclusion_set.contains(tag)
    }
}

impl Default for TransformOptions {
    /// Default exclusions with URL then e-mail handlers
    fn default() -> Self {
        Self::new(
            ExclusionSet::default(),
            vec![
                Box::new(UrlHandler::default()),
                Box::new(EmailAddressHandler::new()),
            ],
        )
    }
}

/// Serializable form of [`TransformOptions`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkifyConfig {
    /// `None` → [`DEFAULT_EXCLUDED_TAGS`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_tags: Option<Vec<String>>,

    /// `None` → URL, then e-mail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handlers: Option<Vec<HandlerConfig>>,
}

impl LinkifyConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum HandlerConfig {
    Url {
        #[serde(default = "default_force_absolute_urls")]
        force_absolute_urls: bool,
    },
    Email,
    Pattern {
        name: String,
        pattern: String,
        href: String,
    },
}

impl HandlerConfig {
    pub fn name(&self) -> &str {
        match self {
            HandlerConfig::Url { .. } => "url",
            HandlerConfig::Email => "email",
            HandlerConfig::Pattern { name, .. } => name,
        }
    }

    pub fn build(&self) -> Result<Box<dyn Handler>> {
        Ok(match self {
            HandlerConfig::Url {
                force_absolute_urls,
            } => Box::new(UrlHandler::new(*force_absolute_urls)),
            HandlerConfig::Email => Box::new(EmailAddressHandler::new()),
            HandlerConfig::Pattern {
                name,
                pattern,
                href,
            } => Box::new(PatternHandler::new(name.clone(), pattern, href.clone())?),
        })
    }
}

fn default_force_absolute_urls() -> bool {
    true
}

fn default_handler_configs() -> Vec<HandlerConfig> {
    vec![
        HandlerConfig::Url {
            force_absolute_urls: default_force_absolute_urls(),
        },
        HandlerConfig::Email,
    ]
}
