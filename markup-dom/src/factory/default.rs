//! The factory for supported HTML tags.

use std::rc::Rc;

use tracing::debug;

use super::{ElementFactory, UNKNOWN_ELEMENT_FACTORY};
use crate::constants::XHTML_NAMESPACE;
use crate::node::namespace::split_qname;
use crate::node::{Attributes, Element, ElementClass, NodeContent, NodeRef, RawAttribute};
use crate::page::PageRef;

/// The shared HTML factory instance.
pub static DEFAULT_ELEMENT_FACTORY: DefaultElementFactory = DefaultElementFactory;

/// HTML tag names with a dedicated implementation, sorted.
pub const SUPPORTED_TAGS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col",
    "colgroup", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em", "embed", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "head", "header", "hr", "html", "i", "iframe", "img", "input", "ins", "kbd",
    "label", "legend", "li", "link", "main", "map", "mark", "meta", "meter", "nav", "noscript",
    "object", "ol", "optgroup", "option", "output", "p", "param", "picture", "pre", "progress",
    "q", "rp", "rt", "ruby", "s", "samp", "script", "section", "select", "slot", "small",
    "source", "span", "strong", "style", "sub", "summary", "sup", "table", "tbody", "td",
    "template", "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "u", "ul",
    "var", "video", "wbr",
];

/// Returns true if `tag_name` (lower case) is in [`SUPPORTED_TAGS`].
pub fn is_supported_tag(tag_name: &str) -> bool {
    SUPPORTED_TAGS.binary_search(&tag_name).is_ok()
}

/// Factory for the supported HTML tags. Elements are placed in the XHTML
/// namespace unless another one is given; any other tag is handed to the
/// unknown-element factory through the same entry point.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultElementFactory;

impl ElementFactory for DefaultElementFactory {
    fn create_element(
        &self,
        page: &PageRef,
        tag_name: &str,
        attributes: Option<&[RawAttribute]>,
    ) -> NodeRef {
        if !has_supported_local_name(tag_name) {
            debug!(tag_name, "no dedicated element, using unknown element");
            return UNKNOWN_ELEMENT_FACTORY.create_element(page, tag_name, attributes);
        }
        self.create_element_ns(page, Some(XHTML_NAMESPACE), tag_name, attributes)
    }

    fn create_element_ns(
        &self,
        page: &PageRef,
        namespace_uri: Option<&str>,
        qualified_name: &str,
        attributes: Option<&[RawAttribute]>,
    ) -> NodeRef {
        if !has_supported_local_name(qualified_name) {
            debug!(qualified_name, "no dedicated element, using unknown element");
            return UNKNOWN_ELEMENT_FACTORY.create_element_ns(
                page,
                namespace_uri,
                qualified_name,
                attributes,
            );
        }
        let namespace_uri = namespace_uri.unwrap_or(XHTML_NAMESPACE);
        page.new_node(NodeContent::Element(Element::new(
            qualified_name,
            Some(Rc::from(namespace_uri)),
            ElementClass::Html,
            Attributes::from_raw(attributes),
        )))
    }
}

fn has_supported_local_name(qualified_name: &str) -> bool {
    let (_, local_name) = split_qname(qualified_name);
    is_supported_tag(&local_name.to_ascii_lowercase())
}
