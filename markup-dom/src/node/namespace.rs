//! Namespace handling for elements.
//!
//! [`NamespaceTable`] is the flat prefix → URI table a page owns.
//! [`NamespaceContext`] tracks scoped `xmlns` bindings while parsing XML.

use std::collections::HashMap;
use std::rc::Rc;

use crate::constants::XML_NAMESPACE;

/// Prefix → namespace URI table owned by a page.
#[derive(Debug, Clone, Default)]
pub struct NamespaceTable {
    bindings: HashMap<String, Rc<str>>,
}

impl NamespaceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `prefix` to `uri`, replacing any earlier binding.
    pub fn declare(&mut self, prefix: &str, uri: &str) {
        self.bindings.insert(prefix.to_string(), uri.into());
    }

    /// Looks up the URI bound to `prefix`.
    pub fn lookup(&self, prefix: &str) -> Option<Rc<str>> {
        self.bindings.get(prefix).cloned()
    }

    /// Iterates over all bindings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_ref()))
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<P: AsRef<str>, U: AsRef<str>> FromIterator<(P, U)> for NamespaceTable {
    fn from_iter<I: IntoIterator<Item = (P, U)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (prefix, uri) in iter {
            table.declare(prefix.as_ref(), uri.as_ref());
        }
        table
    }
}

/// Tracks namespace bindings during parsing.
pub struct NamespaceContext {
    /// URI interning cache for memory efficiency.
    uri_cache: HashMap<String, Rc<str>>,
    /// Stack of scopes, each containing prefix -> URI bindings.
    scopes: Vec<HashMap<String, Rc<str>>>,
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceContext {
    /// Creates a new namespace context with the `xml` prefix pre-bound.
    pub fn new() -> Self {
        let mut ctx = NamespaceContext {
            uri_cache: HashMap::new(),
            scopes: vec![HashMap::new()],
        };
        ctx.bind("xml", XML_NAMESPACE);
        ctx
    }

    /// Pushes a new scope for entering an element.
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the current scope when leaving an element.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a prefix to a URI in the current scope. The empty prefix is
    /// the default namespace.
    pub fn bind(&mut self, prefix: &str, uri: &str) {
        let uri_rc = self.intern_uri(uri);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(prefix.to_string(), uri_rc);
        }
    }

    /// Resolves a prefix to its URI, searching from innermost scope.
    ///
    /// A default namespace declared as `xmlns=""` resolves to `None`.
    pub fn resolve(&self, prefix: &str) -> Option<Rc<str>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(prefix))
            .filter(|uri| !uri.is_empty())
            .cloned()
    }

    /// Resolves the namespace of an element from its qualified name.
    pub fn resolve_element(&self, qname: &str) -> Option<Rc<str>> {
        let (prefix, _) = split_qname(qname);
        self.resolve(prefix.unwrap_or(""))
    }

    fn intern_uri(&mut self, uri: &str) -> Rc<str> {
        if let Some(cached) = self.uri_cache.get(uri) {
            cached.clone()
        } else {
            let rc: Rc<str> = uri.into();
            self.uri_cache.insert(uri.to_string(), rc.clone());
            rc
        }
    }
}

/// Splits a qualified name into prefix and local name at the first colon.
///
/// Returns (Some(prefix), local) for "prefix:local"
/// Returns (None, name) for "name" without prefix
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Returns the prefix declared by an `xmlns` attribute: `""` for `xmlns`,
/// `"p"` for `xmlns:p`, `None` for any other attribute.
pub fn xmlns_prefix(attr_name: &str) -> Option<&str> {
    if attr_name == "xmlns" {
        Some("")
    } else {
        attr_name.strip_prefix("xmlns:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("svg:rect"), (Some("svg"), "rect"));
        assert_eq!(split_qname("rect"), (None, "rect"));
        assert_eq!(split_qname("ns:foo:bar"), (Some("ns"), "foo:bar"));
    }

    #[test]
    fn test_xmlns_prefix() {
        assert_eq!(xmlns_prefix("xmlns"), Some(""));
        assert_eq!(xmlns_prefix("xmlns:svg"), Some("svg"));
        assert_eq!(xmlns_prefix("xml:space"), None);
        assert_eq!(xmlns_prefix("href"), None);
    }

    #[test]
    fn test_namespace_table() {
        let mut table = NamespaceTable::new();
        assert!(table.is_empty());
        table.declare("x", "urn:example");
        assert_eq!(table.lookup("x").as_deref(), Some("urn:example"));
        assert!(table.lookup("y").is_none());

        table.declare("x", "urn:other");
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("x").as_deref(), Some("urn:other"));
    }

    #[test]
    fn test_namespace_context() {
        let mut ctx = NamespaceContext::new();
        ctx.push_scope();
        ctx.bind("svg", "http://www.w3.org/2000/svg");

        assert_eq!(
            ctx.resolve("svg").as_deref(),
            Some("http://www.w3.org/2000/svg")
        );
        assert_eq!(
            ctx.resolve_element("svg:rect").as_deref(),
            Some("http://www.w3.org/2000/svg")
        );

        ctx.pop_scope();
        assert!(ctx.resolve("svg").is_none());
    }

    #[test]
    fn test_default_namespace() {
        let mut ctx = NamespaceContext::new();
        assert!(ctx.resolve_element("root").is_none());

        ctx.push_scope();
        ctx.bind("", "http://www.w3.org/1999/xhtml");
        assert_eq!(
            ctx.resolve_element("p").as_deref(),
            Some("http://www.w3.org/1999/xhtml")
        );

        ctx.push_scope();
        ctx.bind("", "");
        assert!(ctx.resolve_element("p").is_none());

        ctx.pop_scope();
        ctx.pop_scope();
        assert!(ctx.resolve_element("p").is_none());
    }

    #[test]
    fn test_xml_prefix_always_bound() {
        let ctx = NamespaceContext::new();
        assert_eq!(ctx.resolve("xml").as_deref(), Some(XML_NAMESPACE));
    }
}
