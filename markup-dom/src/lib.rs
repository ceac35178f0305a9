//! markup-dom - typed node trees for HTML and XML pages
//!
//! This library models the node layer of a markup document: elements, text,
//! CDATA sections, comments and processing instructions, owned by a
//! [`Page`] that carries the namespace table and the HTML/XML flavor.
//!
//! # Overview
//!
//! - Character-data nodes support kind-preserving [`split`](NodeInner::split):
//!   splitting a CDATA section yields a CDATA section.
//! - Elements are built by an [`ElementFactory`]. The
//!   [`UNKNOWN_ELEMENT_FACTORY`] accepts any tag and resolves `prefix:name`
//!   tags against the page's namespace table on HTML pages.
//! - Every node prints itself as markup through [`print_xml`].
//! - [`MarkupParser`] drives quick-xml events through a factory to fill a
//!   page.
//!
//! # Example
//!
//! ```
//! use markup_dom::{parse_xml, NodeInner, PrintOptions};
//!
//! let page = parse_xml("<doc><![CDATA[hello world]]></doc>").unwrap();
//! let doc = page.document_element().unwrap();
//! let cdata = doc.borrow().children()[0].clone();
//!
//! let tail = NodeInner::split(&cdata, 5).unwrap();
//! NodeInner::insert_after(&cdata, &tail).unwrap();
//!
//! assert_eq!(
//!     page.as_xml(PrintOptions::default()).unwrap(),
//!     "<doc><![CDATA[hello]]><![CDATA[ world]]>\n</doc>\n"
//! );
//! ```

pub mod constants;
pub mod error;
pub mod factory;
pub mod node;
pub mod page;
pub mod xml;

// Re-export commonly used types
pub use constants::*;
pub use error::{Error, Result};
pub use factory::{
    DefaultElementFactory, ElementFactory, ElementRegistry, UnknownElementFactory,
    DEFAULT_ELEMENT_FACTORY, UNKNOWN_ELEMENT_FACTORY,
};
pub use node::{
    new_node_ref, Attributes, CharacterData, Element, ElementClass, NodeContent, NodeInner,
    NodeKind, NodeRef, ProcessingInstruction, RawAttribute, WeakNodeRef,
};
pub use page::{Page, PageKind, PageRef};
pub use xml::{
    parse_file, parse_html, parse_with, parse_xml, print_to_string, print_xml, MarkupParser,
    ParseOptions, PrintOptions, XmlPrinter,
};
