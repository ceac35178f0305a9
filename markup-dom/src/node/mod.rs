//! Tree nodes.
//!
//! Every node is shared as a [`NodeRef`] (`Rc<RefCell<NodeInner>>`). A parent
//! owns its ordered children strongly; a child points back at its parent and
//! at its owning [`Page`] through weak handles only, so a detached subtree
//! never keeps its former parent or its page alive.

mod attributes;
mod content;
pub mod namespace;

pub use attributes::{Attributes, RawAttribute};
pub use content::{
    CharacterData, Element, ElementClass, NodeContent, NodeKind, ProcessingInstruction,
};

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::error::{Error, Result};
use crate::page::{Page, PageRef};

/// Global counter for generating unique node IDs.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generates a unique node ID.
fn next_node_id() -> u64 {
    NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A reference-counted pointer to a node.
pub type NodeRef = Rc<RefCell<NodeInner>>;

/// A non-owning pointer to a node.
pub type WeakNodeRef = Weak<RefCell<NodeInner>>;

/// Creates a new node reference.
pub fn new_node_ref(inner: NodeInner) -> NodeRef {
    Rc::new(RefCell::new(inner))
}

/// The inner data of a node.
///
/// Each node has:
/// - fixed content kind (element, text, ...)
/// - 0 or more children, in insertion order
/// - a weak parent (none while detached)
/// - a weak owning page
#[derive(Debug)]
pub struct NodeInner {
    /// Unique identifier for this node.
    id: u64,
    /// Child nodes.
    children: Vec<NodeRef>,
    /// Kind-specific payload.
    content: NodeContent,
    /// Weak reference to parent node.
    parent: WeakNodeRef,
    /// Weak reference to the owning page.
    page: Weak<Page>,
}

impl NodeInner {
    /// Creates a detached node owned by `page`.
    pub fn new(page: Weak<Page>, content: NodeContent) -> Self {
        NodeInner {
            id: next_node_id(),
            children: Vec::new(),
            content,
            parent: Weak::new(),
            page,
        }
    }

    /// Returns the unique ID of this node.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the node kind.
    pub fn kind(&self) -> NodeKind {
        self.content.kind()
    }

    /// Returns the DOM `nodeType` number.
    pub fn node_type(&self) -> u16 {
        self.content.kind().node_type()
    }

    /// Returns the DOM node name.
    pub fn node_name(&self) -> &str {
        self.content.node_name()
    }

    /// Returns the content of this node.
    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    /// Returns the element, if this is an element node.
    pub fn element(&self) -> Option<&Element> {
        self.content.as_element()
    }

    /// Returns the element mutably, if this is an element node.
    pub fn element_mut(&mut self) -> Option<&mut Element> {
        self.content.as_element_mut()
    }

    /// Returns the character data of a text, CDATA or comment node.
    pub fn character_data(&self) -> Option<&CharacterData> {
        self.content.as_character_data()
    }

    /// Returns the character data of a text, CDATA or comment node mutably.
    pub fn character_data_mut(&mut self) -> Option<&mut CharacterData> {
        self.content.as_character_data_mut()
    }

    /// Returns the data of a character-data node or processing instruction.
    pub fn data(&self) -> Option<&str> {
        self.content.node_value()
    }

    /// Sets the data of a character-data node or processing instruction.
    /// Does nothing for elements and the document.
    pub fn set_data(&mut self, data: &str) {
        self.content.set_node_value(data);
    }

    /// Returns the node value (see [`NodeContent::node_value`]).
    pub fn node_value(&self) -> Option<&str> {
        self.content.node_value()
    }

    /// Sets the node value. A processing instruction's data and node value
    /// are the same slot.
    pub fn set_node_value(&mut self, value: &str) {
        self.content.set_node_value(value);
    }

    /// Returns the target of a processing instruction.
    pub fn target(&self) -> Option<&str> {
        self.content.as_processing_instruction().map(|pi| pi.target())
    }

    /// Sets the namespace prefix. A no-op for everything but elements.
    pub fn set_prefix(&mut self, prefix: Option<&str>) {
        self.content.set_prefix(prefix);
    }

    /// Returns the owning page, if it is still alive.
    pub fn page(&self) -> Option<PageRef> {
        self.page.upgrade()
    }

    /// Returns the parent, if attached.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.upgrade()
    }

    /// Returns true if this node has no parent.
    pub fn is_detached(&self) -> bool {
        self.parent.upgrade().is_none()
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns a reference to the child at the given index.
    pub fn child(&self, index: usize) -> Option<&NodeRef> {
        self.children.get(index)
    }

    /// Returns the children as a slice.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Returns the first child.
    pub fn first_child(&self) -> Option<&NodeRef> {
        self.children.first()
    }

    /// Returns the last child.
    pub fn last_child(&self) -> Option<&NodeRef> {
        self.children.last()
    }
}

/// Tree operations that work with NodeRef.
impl NodeInner {
    /// Appends `child` as the last child of `parent`, detaching it from its
    /// previous parent first.
    pub fn append_child(parent: &NodeRef, child: &NodeRef) -> Result<()> {
        let index = parent.borrow().children.len();
        Self::insert_child_at(parent, index, child)
    }

    /// Inserts `child` at `index` among the children of `parent`, detaching
    /// it from its previous parent first. An index past the end appends.
    pub fn insert_child_at(parent: &NodeRef, index: usize, child: &NodeRef) -> Result<()> {
        Self::check_insertion(parent, child)?;
        let mut index = index;
        if let Some(old_parent) = child.borrow().parent() {
            if Rc::ptr_eq(&old_parent, parent) {
                if let Some(pos) = Self::index_of(parent, child) {
                    if pos < index {
                        index -= 1;
                    }
                }
            }
        }
        Self::detach(child);
        child.borrow_mut().parent = Rc::downgrade(parent);
        let mut parent_inner = parent.borrow_mut();
        let index = index.min(parent_inner.children.len());
        parent_inner.children.insert(index, Rc::clone(child));
        Ok(())
    }

    /// Inserts `new_sibling` right after `node`. Fails if `node` is detached.
    pub fn insert_after(node: &NodeRef, new_sibling: &NodeRef) -> Result<()> {
        let parent = node.borrow().parent().ok_or_else(|| {
            Error::HierarchyRequest("cannot insert a sibling next to a detached node".to_string())
        })?;
        let index = Self::index_of(&parent, node).map_or(0, |i| i + 1);
        Self::insert_child_at(&parent, index, new_sibling)
    }

    /// Removes the child at the given index and returns it detached.
    pub fn remove_child(parent: &NodeRef, index: usize) -> Option<NodeRef> {
        let mut parent_inner = parent.borrow_mut();
        if index >= parent_inner.children.len() {
            return None;
        }
        let child = parent_inner.children.remove(index);
        child.borrow_mut().parent = Weak::new();
        Some(child)
    }

    /// Removes all children of `parent`.
    pub fn remove_children(parent: &NodeRef) {
        let children = std::mem::take(&mut parent.borrow_mut().children);
        for child in children {
            child.borrow_mut().parent = Weak::new();
        }
    }

    /// Detaches `node` from its parent. Does nothing if already detached.
    pub fn detach(node: &NodeRef) {
        let parent = node.borrow().parent();
        if let Some(parent) = parent {
            if let Some(index) = Self::index_of(&parent, node) {
                Self::remove_child(&parent, index);
            }
        }
    }

    /// Returns the position of `child` among the children of `parent`.
    pub fn index_of(parent: &NodeRef, child: &NodeRef) -> Option<usize> {
        parent
            .borrow()
            .children
            .iter()
            .position(|c| Rc::ptr_eq(c, child))
    }

    /// Gets the previous sibling of a node.
    pub fn previous_sibling(node: &NodeRef) -> Option<NodeRef> {
        let parent = node.borrow().parent()?;
        let index = Self::index_of(&parent, node)?;
        let sibling = parent.borrow().children.get(index.checked_sub(1)?).cloned();
        sibling
    }

    /// Gets the next sibling of a node.
    pub fn next_sibling(node: &NodeRef) -> Option<NodeRef> {
        let parent = node.borrow().parent()?;
        let index = Self::index_of(&parent, node)?;
        let sibling = parent.borrow().children.get(index + 1).cloned();
        sibling
    }

    /// Returns the text content of a node.
    ///
    /// Character data and processing instructions answer their data; an
    /// element answers the concatenated data of its descendant text and
    /// CDATA nodes; the document answers nothing.
    pub fn text_content(node: &NodeRef) -> Option<String> {
        let inner = node.borrow();
        match inner.content() {
            NodeContent::Document => None,
            NodeContent::Element(_) => {
                let mut text = String::new();
                Self::collect_text(&inner, &mut text);
                Some(text)
            }
            content => content.node_value().map(str::to_string),
        }
    }

    fn collect_text(inner: &NodeInner, out: &mut String) {
        for child in &inner.children {
            let child = child.borrow();
            match child.content() {
                NodeContent::Text(d) | NodeContent::CDataSection(d) => out.push_str(d.data()),
                NodeContent::Element(_) => Self::collect_text(&child, out),
                _ => {}
            }
        }
    }

    /// Sets the text content of a node.
    ///
    /// For an element, all children are replaced by a single text node (or
    /// by nothing when `value` is empty). For character data and processing
    /// instructions this is the same as setting the node value. Does nothing
    /// for the document.
    pub fn set_text_content(node: &NodeRef, value: &str) -> Result<()> {
        let kind = node.borrow().kind();
        match kind {
            NodeKind::Document => Ok(()),
            NodeKind::Element => {
                Self::remove_children(node);
                if value.is_empty() {
                    return Ok(());
                }
                let page = node.borrow().page.clone();
                let text = new_node_ref(NodeInner::new(page, NodeContent::text(value)));
                Self::append_child(node, &text)
            }
            _ => {
                node.borrow_mut().set_node_value(value);
                Ok(())
            }
        }
    }

    /// Splits a character-data node at character `offset`.
    ///
    /// The node keeps the data before `offset`; the returned node has the same
    /// kind and page and holds the rest. The new node is detached: inserting
    /// it (usually with [`NodeInner::insert_after`]) is up to the caller.
    /// On error the node is left untouched.
    pub fn split(node: &NodeRef, offset: usize) -> Result<NodeRef> {
        let mut inner = node.borrow_mut();
        let tail = inner.content.split_off(offset)?;
        trace!(node = inner.id, offset, kind = %tail.kind(), "split character data");
        Ok(new_node_ref(NodeInner::new(inner.page.clone(), tail)))
    }

    fn check_insertion(parent: &NodeRef, child: &NodeRef) -> Result<()> {
        if child.borrow().kind() == NodeKind::Document {
            return Err(Error::HierarchyRequest(
                "a document node cannot be inserted".to_string(),
            ));
        }
        let mut ancestor = Some(Rc::clone(parent));
        while let Some(node) = ancestor {
            if Rc::ptr_eq(&node, child) {
                return Err(Error::HierarchyRequest(
                    "a node cannot be inserted below itself".to_string(),
                ));
            }
            ancestor = node.borrow().parent();
        }
        Ok(())
    }
}
