//! The page that owns a node tree.
//!
//! A [`Page`] holds the document node, the prefix → URI namespace table and
//! the HTML/XML flavor flag. Nodes refer back to their page weakly; the page
//! owns the document node, which owns the rest of the tree.

use std::cell::{Ref, RefCell};
use std::io::{self, Write};
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::node::namespace::NamespaceTable;
use crate::node::{new_node_ref, NodeContent, NodeInner, NodeRef};
use crate::xml::{PrintOptions, XmlPrinter};

/// A reference-counted pointer to a page.
pub type PageRef = Rc<Page>;

/// Markup flavor of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageKind {
    /// An HTML page: tag names containing `:` are resolved against the
    /// page's namespace table.
    #[default]
    Html,
    /// A generic XML page.
    Xml,
}

/// The owning document of a node tree.
#[derive(Debug)]
pub struct Page {
    kind: PageKind,
    namespaces: RefCell<NamespaceTable>,
    document: NodeRef,
}

impl Page {
    /// Creates an empty page of the given kind.
    pub fn new(kind: PageKind) -> PageRef {
        Self::with_namespaces(kind, NamespaceTable::new())
    }

    /// Creates an empty HTML page.
    pub fn html() -> PageRef {
        Self::new(PageKind::Html)
    }

    /// Creates an empty XML page.
    pub fn xml() -> PageRef {
        Self::new(PageKind::Xml)
    }

    /// Creates an empty page with a pre-filled namespace table.
    pub fn with_namespaces(kind: PageKind, namespaces: NamespaceTable) -> PageRef {
        Rc::new_cyclic(|weak: &Weak<Page>| Page {
            kind,
            namespaces: RefCell::new(namespaces),
            document: new_node_ref(NodeInner::new(weak.clone(), NodeContent::Document)),
        })
    }

    /// Returns the markup flavor.
    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// Returns true for HTML pages.
    pub fn is_html(&self) -> bool {
        self.kind == PageKind::Html
    }

    /// Returns the document node.
    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    /// Returns the first element child of the document node.
    pub fn document_element(&self) -> Option<NodeRef> {
        self.document
            .borrow()
            .children()
            .iter()
            .find(|child| child.borrow().content().is_element())
            .cloned()
    }

    /// Looks up the namespace URI bound to `prefix`.
    pub fn namespace_uri_for_prefix(&self, prefix: &str) -> Option<Rc<str>> {
        self.namespaces.borrow().lookup(prefix)
    }

    /// Binds `prefix` to `uri` in the page's namespace table.
    pub fn declare_namespace(&self, prefix: &str, uri: &str) {
        trace!(prefix, uri, "declare namespace");
        self.namespaces.borrow_mut().declare(prefix, uri);
    }

    /// Returns the namespace table.
    pub fn namespaces(&self) -> Ref<'_, NamespaceTable> {
        self.namespaces.borrow()
    }

    /// Creates a detached node owned by this page.
    pub fn new_node(self: &Rc<Self>, content: NodeContent) -> NodeRef {
        new_node_ref(NodeInner::new(Rc::downgrade(self), content))
    }

    /// Creates a detached text node.
    pub fn create_text_node(self: &Rc<Self>, data: &str) -> NodeRef {
        self.new_node(NodeContent::text(data))
    }

    /// Creates a detached CDATA section.
    pub fn create_cdata_section(self: &Rc<Self>, data: &str) -> NodeRef {
        self.new_node(NodeContent::cdata_section(data))
    }

    /// Creates a detached comment.
    pub fn create_comment(self: &Rc<Self>, data: &str) -> NodeRef {
        self.new_node(NodeContent::comment(data))
    }

    /// Creates a detached processing instruction.
    pub fn create_processing_instruction(self: &Rc<Self>, target: &str, data: &str) -> NodeRef {
        self.new_node(NodeContent::processing_instruction(target, data))
    }

    /// Writes the whole page as markup.
    pub fn write_xml<W: Write>(&self, writer: W, options: PrintOptions) -> io::Result<()> {
        XmlPrinter::with_options(writer, options).print_page(self)
    }

    /// Returns the whole page as markup.
    pub fn as_xml(&self, options: PrintOptions) -> io::Result<String> {
        let mut output = Vec::new();
        self.write_xml(&mut output, options)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}
