//! Tag-name dispatch to element factories.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::{ElementFactory, DEFAULT_ELEMENT_FACTORY, SUPPORTED_TAGS, UNKNOWN_ELEMENT_FACTORY};
use crate::constants::XHTML_NAMESPACE;
use crate::node::namespace::split_qname;
use crate::node::{NodeRef, RawAttribute};
use crate::page::PageRef;

type SharedFactory = Arc<dyn ElementFactory + Send + Sync>;

/// Maps tag names to element factories.
///
/// Lookups happen on HTML pages (case-insensitively) and for elements in the
/// XHTML namespace. Everything else, and every tag without an entry, goes to
/// [`UNKNOWN_ELEMENT_FACTORY`].
#[derive(Clone)]
pub struct ElementRegistry {
    factories: HashMap<String, SharedFactory>,
}

impl ElementRegistry {
    /// Creates a registry with no entries: every tag uses the fallback.
    pub fn new() -> Self {
        ElementRegistry {
            factories: HashMap::new(),
        }
    }

    /// Creates a registry mapping every supported HTML tag to the default
    /// HTML factory.
    pub fn html() -> Self {
        let mut registry = Self::new();
        let factory: SharedFactory = Arc::new(DEFAULT_ELEMENT_FACTORY);
        for tag in SUPPORTED_TAGS {
            registry.register(tag, Arc::clone(&factory));
        }
        registry
    }

    /// Registers `factory` for `tag_name`, replacing any earlier entry.
    pub fn register(&mut self, tag_name: &str, factory: SharedFactory) {
        self.factories.insert(tag_name.to_ascii_lowercase(), factory);
    }

    /// Removes the entry for `tag_name`.
    pub fn unregister(&mut self, tag_name: &str) -> bool {
        self.factories
            .remove(&tag_name.to_ascii_lowercase())
            .is_some()
    }

    /// Returns true if `tag_name` has an entry.
    pub fn contains(&self, tag_name: &str) -> bool {
        self.factories.contains_key(&tag_name.to_ascii_lowercase())
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns the factory registered for `tag_name`, or the fallback.
    pub fn factory_for(&self, tag_name: &str) -> &dyn ElementFactory {
        match self.factories.get(&tag_name.to_ascii_lowercase()) {
            Some(factory) => factory.as_ref(),
            None => &UNKNOWN_ELEMENT_FACTORY,
        }
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::html()
    }
}

impl fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("ElementRegistry").field("tags", &tags).finish()
    }
}

impl ElementFactory for ElementRegistry {
    fn create_element(
        &self,
        page: &PageRef,
        tag_name: &str,
        attributes: Option<&[RawAttribute]>,
    ) -> NodeRef {
        if !page.is_html() {
            return UNKNOWN_ELEMENT_FACTORY.create_element(page, tag_name, attributes);
        }
        trace!(tag_name, registered = self.contains(tag_name), "dispatch element");
        self.factory_for(tag_name)
            .create_element(page, tag_name, attributes)
    }

    fn create_element_ns(
        &self,
        page: &PageRef,
        namespace_uri: Option<&str>,
        qualified_name: &str,
        attributes: Option<&[RawAttribute]>,
    ) -> NodeRef {
        let dispatch = match namespace_uri {
            Some(uri) => uri == XHTML_NAMESPACE,
            None => page.is_html(),
        };
        if !dispatch {
            return UNKNOWN_ELEMENT_FACTORY.create_element_ns(
                page,
                namespace_uri,
                qualified_name,
                attributes,
            );
        }
        let (_, local_name) = split_qname(qualified_name);
        self.factory_for(local_name)
            .create_element_ns(page, namespace_uri, qualified_name, attributes)
    }
}
