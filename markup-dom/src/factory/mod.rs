//! Element construction.
//!
//! An [`ElementFactory`] turns a tag name and raw attributes into a typed,
//! detached element node owned by a page. Factories never insert what they
//! build; attaching the element is up to the caller.
//!
//! - [`UnknownElementFactory`] is the universal fallback: it accepts any tag
//!   name and always produces a generic element.
//! - [`DefaultElementFactory`] builds the supported HTML tags.
//! - [`ElementRegistry`] dispatches on the tag name and falls back to the
//!   unknown-element factory.

mod default;
mod registry;
mod unknown;

pub use default::{is_supported_tag, DefaultElementFactory, DEFAULT_ELEMENT_FACTORY, SUPPORTED_TAGS};
pub use registry::ElementRegistry;
pub use unknown::{UnknownElementFactory, UNKNOWN_ELEMENT_FACTORY};

use crate::node::{NodeRef, RawAttribute};
use crate::page::PageRef;

/// Builds detached element nodes.
pub trait ElementFactory {
    /// Creates an element for `tag_name`. An absent attribute list is
    /// treated as empty.
    fn create_element(
        &self,
        page: &PageRef,
        tag_name: &str,
        attributes: Option<&[RawAttribute]>,
    ) -> NodeRef;

    /// Creates an element for `qualified_name` in `namespace_uri` (`None`
    /// for no namespace).
    fn create_element_ns(
        &self,
        page: &PageRef,
        namespace_uri: Option<&str>,
        qualified_name: &str,
        attributes: Option<&[RawAttribute]>,
    ) -> NodeRef;
}

impl<F: ElementFactory + ?Sized> ElementFactory for &F {
    fn create_element(
        &self,
        page: &PageRef,
        tag_name: &str,
        attributes: Option<&[RawAttribute]>,
    ) -> NodeRef {
        (**self).create_element(page, tag_name, attributes)
    }

    fn create_element_ns(
        &self,
        page: &PageRef,
        namespace_uri: Option<&str>,
        qualified_name: &str,
        attributes: Option<&[RawAttribute]>,
    ) -> NodeRef {
        (**self).create_element_ns(page, namespace_uri, qualified_name, attributes)
    }
}
