//! The fallback factory for tags without a dedicated implementation.

use std::rc::Rc;

use tracing::{debug, trace};

use super::ElementFactory;
use crate::node::namespace::split_qname;
use crate::node::{Attributes, Element, ElementClass, NodeContent, NodeRef, RawAttribute};
use crate::page::PageRef;

/// The shared fallback instance.
pub static UNKNOWN_ELEMENT_FACTORY: UnknownElementFactory = UnknownElementFactory;

/// Factory producing generic elements for any tag name. It never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownElementFactory;

impl ElementFactory for UnknownElementFactory {
    /// On an HTML page a prefixed tag name (`x:foo`) is resolved against the
    /// page's namespace table; an unregistered prefix gives no namespace.
    /// The qualified name is kept whole either way. Other pages never split
    /// on `:`.
    fn create_element(
        &self,
        page: &PageRef,
        tag_name: &str,
        attributes: Option<&[RawAttribute]>,
    ) -> NodeRef {
        if page.is_html() {
            if let (Some(prefix), _) = split_qname(tag_name) {
                let namespace_uri = page.namespace_uri_for_prefix(prefix);
                if namespace_uri.is_none() {
                    debug!(prefix, tag_name, "unregistered namespace prefix");
                }
                return self.create_element_ns(
                    page,
                    namespace_uri.as_deref(),
                    tag_name,
                    attributes,
                );
            }
        }
        self.create_element_ns(page, None, tag_name, attributes)
    }

    fn create_element_ns(
        &self,
        page: &PageRef,
        namespace_uri: Option<&str>,
        qualified_name: &str,
        attributes: Option<&[RawAttribute]>,
    ) -> NodeRef {
        trace!(qualified_name, ?namespace_uri, "create unknown element");
        page.new_node(NodeContent::Element(Element::new(
            qualified_name,
            namespace_uri.map(Rc::from),
            ElementClass::Unknown,
            Attributes::from_raw(attributes),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::namespace::NamespaceTable;
    use crate::page::{Page, PageKind};

    fn html_page_with_x() -> PageRef {
        let table: NamespaceTable = [("x", "urn:example")].into_iter().collect();
        Page::with_namespaces(PageKind::Html, table)
    }

    #[test]
    fn test_registered_prefix_resolves() {
        let page = html_page_with_x();
        let node = UNKNOWN_ELEMENT_FACTORY.create_element(&page, "x:foo", None);
        let inner = node.borrow();
        let element = inner.element().unwrap();
        assert_eq!(element.namespace_uri(), Some("urn:example"));
        assert_eq!(element.qualified_name(), "x:foo");
        assert_eq!(inner.node_name(), "x:foo");
        assert_eq!(element.class(), &ElementClass::Unknown);
    }

    #[test]
    fn test_unregistered_prefix_has_no_namespace() {
        let page = html_page_with_x();
        let node = UNKNOWN_ELEMENT_FACTORY.create_element(&page, "y:foo", None);
        let inner = node.borrow();
        let element = inner.element().unwrap();
        assert_eq!(element.namespace_uri(), None);
        assert_eq!(element.qualified_name(), "y:foo");
    }

    #[test]
    fn test_xml_page_never_splits() {
        let table: NamespaceTable = [("x", "urn:example")].into_iter().collect();
        let page = Page::with_namespaces(PageKind::Xml, table);
        let node = UNKNOWN_ELEMENT_FACTORY.create_element(&page, "x:foo", None);
        let inner = node.borrow();
        assert_eq!(inner.element().unwrap().namespace_uri(), None);
        assert_eq!(inner.node_name(), "x:foo");
    }

    #[test]
    fn test_result_is_detached_with_attributes() {
        let page = Page::html();
        let attrs = vec![
            ("id".to_string(), "a".to_string()),
            ("id".to_string(), "b".to_string()),
        ];
        let node = UNKNOWN_ELEMENT_FACTORY.create_element(&page, "my-widget", Some(&attrs));
        let inner = node.borrow();
        assert!(inner.is_detached());
        assert_eq!(page.document().borrow().child_count(), 0);
        assert_eq!(inner.element().unwrap().attribute("id"), Some("b"));
    }

    #[test]
    fn test_create_element_ns_keeps_given_namespace() {
        let page = Page::xml();
        let node = UNKNOWN_ELEMENT_FACTORY.create_element_ns(
            &page,
            Some("http://www.w3.org/2000/svg"),
            "svg:rect",
            None,
        );
        let inner = node.borrow();
        let element = inner.element().unwrap();
        assert_eq!(element.namespace_uri(), Some("http://www.w3.org/2000/svg"));
        assert_eq!(element.prefix(), Some("svg"));
        assert_eq!(element.local_name(), "rect");
        assert!(element.attributes().is_empty());
    }
}
