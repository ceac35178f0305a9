//! Node content types.
//!
//! `NodeContent` is the kind-specific payload of a tree node: an element,
//! one of the three character-data kinds (text, CDATA section, comment), a
//! processing instruction, or the document itself. The variant is chosen
//! when a node is created and never changes afterwards.

use std::fmt;
use std::iter;
use std::rc::Rc;

use super::attributes::Attributes;
use super::namespace::split_qname;
use crate::constants::{
    CDATA_SECTION_NODE_NAME, COMMENT_NODE_NAME, DOCUMENT_NODE_NAME, TEXT_NODE_NAME,
};
use crate::error::{Error, Result};

/// The immutable category of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document node at the top of a page.
    Document,
    /// An element.
    Element,
    /// Plain text.
    Text,
    /// A CDATA section.
    CDataSection,
    /// A comment.
    Comment,
    /// A processing instruction.
    ProcessingInstruction,
}

impl NodeKind {
    /// Returns the DOM `nodeType` number of this kind.
    pub fn node_type(self) -> u16 {
        match self {
            NodeKind::Element => 1,
            NodeKind::Text => 3,
            NodeKind::CDataSection => 4,
            NodeKind::ProcessingInstruction => 7,
            NodeKind::Comment => 8,
            NodeKind::Document => 9,
        }
    }

    /// Returns true for text, CDATA sections and comments.
    pub fn is_character_data(self) -> bool {
        matches!(
            self,
            NodeKind::Text | NodeKind::CDataSection | NodeKind::Comment
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Document => "document",
            NodeKind::Element => "element",
            NodeKind::Text => "text",
            NodeKind::CDataSection => "cdata-section",
            NodeKind::Comment => "comment",
            NodeKind::ProcessingInstruction => "processing-instruction",
        };
        f.write_str(name)
    }
}

/// The payload of a node.
#[derive(Debug, Clone)]
pub enum NodeContent {
    /// The document node.
    Document,
    /// An element with a qualified name and attributes.
    Element(Element),
    /// A text node.
    Text(CharacterData),
    /// A CDATA section.
    CDataSection(CharacterData),
    /// A comment.
    Comment(CharacterData),
    /// A processing instruction.
    ProcessingInstruction(ProcessingInstruction),
}

impl NodeContent {
    /// Creates text content.
    pub fn text(data: impl Into<String>) -> Self {
        NodeContent::Text(CharacterData::new(data))
    }

    /// Creates CDATA section content.
    pub fn cdata_section(data: impl Into<String>) -> Self {
        NodeContent::CDataSection(CharacterData::new(data))
    }

    /// Creates comment content.
    pub fn comment(data: impl Into<String>) -> Self {
        NodeContent::Comment(CharacterData::new(data))
    }

    /// Creates processing instruction content.
    pub fn processing_instruction(target: impl Into<String>, data: impl Into<String>) -> Self {
        NodeContent::ProcessingInstruction(ProcessingInstruction::new(target, data))
    }

    /// Returns the kind of this content.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeContent::Document => NodeKind::Document,
            NodeContent::Element(_) => NodeKind::Element,
            NodeContent::Text(_) => NodeKind::Text,
            NodeContent::CDataSection(_) => NodeKind::CDataSection,
            NodeContent::Comment(_) => NodeKind::Comment,
            NodeContent::ProcessingInstruction(_) => NodeKind::ProcessingInstruction,
        }
    }

    /// Returns the DOM node name.
    ///
    /// Character-data kinds and the document have fixed symbolic names, an
    /// element answers its qualified name and a processing instruction its
    /// target.
    pub fn node_name(&self) -> &str {
        match self {
            NodeContent::Document => DOCUMENT_NODE_NAME,
            NodeContent::Element(e) => e.qualified_name(),
            NodeContent::Text(_) => TEXT_NODE_NAME,
            NodeContent::CDataSection(_) => CDATA_SECTION_NODE_NAME,
            NodeContent::Comment(_) => COMMENT_NODE_NAME,
            NodeContent::ProcessingInstruction(pi) => pi.target(),
        }
    }

    /// Returns the node value: the data of character data and processing
    /// instructions, nothing for elements and the document.
    pub fn node_value(&self) -> Option<&str> {
        match self {
            NodeContent::Text(d) | NodeContent::CDataSection(d) | NodeContent::Comment(d) => {
                Some(d.data())
            }
            NodeContent::ProcessingInstruction(pi) => Some(pi.data()),
            NodeContent::Document | NodeContent::Element(_) => None,
        }
    }

    /// Sets the node value. Does nothing for elements and the document.
    pub fn set_node_value(&mut self, value: &str) {
        match self {
            NodeContent::Text(d) | NodeContent::CDataSection(d) | NodeContent::Comment(d) => {
                d.set_data(value)
            }
            NodeContent::ProcessingInstruction(pi) => pi.set_data(value),
            NodeContent::Document | NodeContent::Element(_) => {}
        }
    }

    /// Sets the namespace prefix.
    ///
    /// Only elements carry a prefix; for every other kind this is a no-op.
    pub fn set_prefix(&mut self, prefix: Option<&str>) {
        if let NodeContent::Element(e) = self {
            e.set_prefix(prefix);
        }
    }

    /// Cuts character data at `offset` and returns the tail as new content
    /// of the same kind. `self` keeps the head.
    ///
    /// Fails without modifying anything if `offset` is past the end of the
    /// data, or if this content is not character data.
    pub fn split_off(&mut self, offset: usize) -> Result<NodeContent> {
        match self {
            NodeContent::Text(d) => d.split_off(offset).map(NodeContent::Text),
            NodeContent::CDataSection(d) => d.split_off(offset).map(NodeContent::CDataSection),
            NodeContent::Comment(d) => d.split_off(offset).map(NodeContent::Comment),
            other => Err(Error::NotCharacterData(other.kind())),
        }
    }

    /// Returns true if this is an element.
    pub fn is_element(&self) -> bool {
        matches!(self, NodeContent::Element(_))
    }

    /// Returns true if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, NodeContent::Text(_))
    }

    /// Returns true if this is a CDATA section.
    pub fn is_cdata_section(&self) -> bool {
        matches!(self, NodeContent::CDataSection(_))
    }

    /// Returns true if this is a comment.
    pub fn is_comment(&self) -> bool {
        matches!(self, NodeContent::Comment(_))
    }

    /// Returns true if this is a processing instruction.
    pub fn is_processing_instruction(&self) -> bool {
        matches!(self, NodeContent::ProcessingInstruction(_))
    }

    /// Returns a reference to the element, if this is an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            NodeContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a mutable reference to the element, if this is an element.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            NodeContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the character data of a text, CDATA or comment node.
    pub fn as_character_data(&self) -> Option<&CharacterData> {
        match self {
            NodeContent::Text(d) | NodeContent::CDataSection(d) | NodeContent::Comment(d) => {
                Some(d)
            }
            _ => None,
        }
    }

    /// Returns the character data of a text, CDATA or comment node mutably.
    pub fn as_character_data_mut(&mut self) -> Option<&mut CharacterData> {
        match self {
            NodeContent::Text(d) | NodeContent::CDataSection(d) | NodeContent::Comment(d) => {
                Some(d)
            }
            _ => None,
        }
    }

    /// Returns a reference to the PI, if this is a processing instruction.
    pub fn as_processing_instruction(&self) -> Option<&ProcessingInstruction> {
        match self {
            NodeContent::ProcessingInstruction(pi) => Some(pi),
            _ => None,
        }
    }

    /// Returns a mutable reference to the PI, if this is a processing
    /// instruction.
    pub fn as_processing_instruction_mut(&mut self) -> Option<&mut ProcessingInstruction> {
        match self {
            NodeContent::ProcessingInstruction(pi) => Some(pi),
            _ => None,
        }
    }
}

/// The string payload shared by text, CDATA sections and comments.
///
/// Offsets and counts are measured in characters (Unicode scalar values).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterData {
    data: String,
}

impl CharacterData {
    /// Creates character data holding `data`.
    pub fn new(data: impl Into<String>) -> Self {
        CharacterData { data: data.into() }
    }

    /// Returns the data. No escaping is applied.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Replaces the data.
    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }

    /// Returns the length of the data in characters.
    pub fn length(&self) -> usize {
        self.data.chars().count()
    }

    /// Returns true if the data is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.data.trim().is_empty()
    }

    /// Appends `data` to the end.
    pub fn append_data(&mut self, data: &str) {
        self.data.push_str(data);
    }

    /// Inserts `data` at character `offset`.
    pub fn insert_data(&mut self, offset: usize, data: &str) -> Result<()> {
        let at = self.byte_index(offset)?;
        self.data.insert_str(at, data);
        Ok(())
    }

    /// Removes up to `count` characters starting at `offset`.
    pub fn delete_data(&mut self, offset: usize, count: usize) -> Result<()> {
        let (start, end) = self.byte_range(offset, count)?;
        self.data.replace_range(start..end, "");
        Ok(())
    }

    /// Replaces up to `count` characters starting at `offset` with `data`.
    pub fn replace_data(&mut self, offset: usize, count: usize, data: &str) -> Result<()> {
        let (start, end) = self.byte_range(offset, count)?;
        self.data.replace_range(start..end, data);
        Ok(())
    }

    /// Returns up to `count` characters starting at `offset`.
    pub fn substring_data(&self, offset: usize, count: usize) -> Result<&str> {
        let (start, end) = self.byte_range(offset, count)?;
        Ok(&self.data[start..end])
    }

    /// Cuts the data at character `offset`, keeping the head and returning
    /// the tail. Nothing is modified when `offset` is out of range.
    pub fn split_off(&mut self, offset: usize) -> Result<CharacterData> {
        let at = self.byte_index(offset)?;
        Ok(CharacterData {
            data: self.data.split_off(at),
        })
    }

    fn byte_index(&self, offset: usize) -> Result<usize> {
        self.data
            .char_indices()
            .map(|(i, _)| i)
            .chain(iter::once(self.data.len()))
            .nth(offset)
            .ok_or_else(|| Error::IndexOutOfRange {
                offset,
                length: self.length(),
            })
    }

    /// Byte range for `count` characters from `offset`, clamped to the end.
    fn byte_range(&self, offset: usize, count: usize) -> Result<(usize, usize)> {
        let start = self.byte_index(offset)?;
        let end = self.data[start..]
            .char_indices()
            .nth(count)
            .map_or(self.data.len(), |(i, _)| start + i);
        Ok((start, end))
    }
}

/// Processing instruction content: a fixed target and mutable data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    /// The target of the PI (e.g., "xml-stylesheet").
    target: String,
    /// Everything after the target.
    data: String,
}

impl ProcessingInstruction {
    /// Creates a PI from target and data strings.
    pub fn new(target: impl Into<String>, data: impl Into<String>) -> Self {
        ProcessingInstruction {
            target: target.into(),
            data: data.into(),
        }
    }

    /// Returns the PI target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the PI data.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Replaces the PI data. The target is never changed.
    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }
}

/// Which factory an element came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementClass {
    /// A supported HTML tag built by the default HTML factory.
    Html,
    /// A generic element built by the fallback factory.
    Unknown,
    /// An element built by a caller-registered factory.
    Custom(Rc<str>),
}

/// An element with a qualified name, optional namespace and attributes.
#[derive(Debug, Clone)]
pub struct Element {
    /// The qualified name (e.g., "div", "svg:rect").
    qualified_name: String,
    /// The namespace URI, if any.
    namespace_uri: Option<Rc<str>>,
    class: ElementClass,
    attributes: Attributes,
}

impl Element {
    /// Creates an element.
    pub fn new(
        qualified_name: impl Into<String>,
        namespace_uri: Option<Rc<str>>,
        class: ElementClass,
        attributes: Attributes,
    ) -> Self {
        Element {
            qualified_name: qualified_name.into(),
            namespace_uri,
            class,
            attributes,
        }
    }

    /// Returns the qualified name.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Alias of [`Element::qualified_name`].
    pub fn tag_name(&self) -> &str {
        &self.qualified_name
    }

    /// Returns the prefix part of the qualified name.
    pub fn prefix(&self) -> Option<&str> {
        split_qname(&self.qualified_name).0
    }

    /// Returns the local part of the qualified name.
    pub fn local_name(&self) -> &str {
        split_qname(&self.qualified_name).1
    }

    /// Replaces the prefix, rebuilding the qualified name. `None` or an
    /// empty prefix leaves just the local name.
    pub fn set_prefix(&mut self, prefix: Option<&str>) {
        let local = self.local_name().to_string();
        self.qualified_name = match prefix {
            Some(p) if !p.is_empty() => format!("{p}:{local}"),
            _ => local,
        };
    }

    /// Returns the namespace URI.
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    /// Returns the factory class of this element.
    pub fn class(&self) -> &ElementClass {
        &self.class
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns a mutable reference to the attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Returns an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Sets an attribute, returning the previous value.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.attributes.set(name, value)
    }

    /// Removes an attribute, returning its value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_preserves_kind() {
        let mut text = NodeContent::text("hello world");
        let tail = text.split_off(5).unwrap();
        assert!(tail.is_text());
        assert_eq!(text.node_value(), Some("hello"));
        assert_eq!(tail.node_value(), Some(" world"));

        let mut cdata = NodeContent::cdata_section("a<b");
        let tail = cdata.split_off(1).unwrap();
        assert!(tail.is_cdata_section());
        assert_eq!(cdata.node_value(), Some("a"));
        assert_eq!(tail.node_value(), Some("<b"));

        let mut comment = NodeContent::comment("note");
        let tail = comment.split_off(4).unwrap();
        assert!(tail.is_comment());
        assert_eq!(comment.node_value(), Some("note"));
        assert_eq!(tail.node_value(), Some(""));
    }

    #[test]
    fn test_split_out_of_range_leaves_data() {
        let mut text = NodeContent::text("abc");
        match text.split_off(4) {
            Err(Error::IndexOutOfRange { offset, length }) => {
                assert_eq!(offset, 4);
                assert_eq!(length, 3);
            }
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }
        assert_eq!(text.node_value(), Some("abc"));
    }

    #[test]
    fn test_split_counts_characters() {
        let mut data = CharacterData::new("héllo");
        let tail = data.split_off(2).unwrap();
        assert_eq!(data.data(), "hé");
        assert_eq!(tail.data(), "llo");
    }

    #[test]
    fn test_split_rejects_non_character_data() {
        let mut pi = NodeContent::processing_instruction("target", "data");
        assert!(matches!(
            pi.split_off(0),
            Err(Error::NotCharacterData(NodeKind::ProcessingInstruction))
        ));
        assert_eq!(pi.node_value(), Some("data"));
    }

    #[test]
    fn test_fixed_node_names() {
        let mut comment = NodeContent::comment("x");
        let mut cdata = NodeContent::cdata_section("y");
        assert_eq!(comment.node_name(), "#comment");
        assert_eq!(cdata.node_name(), "#cdata-section");
        assert_eq!(NodeContent::text("z").node_name(), "#text");
        assert_eq!(NodeContent::Document.node_name(), "#document");

        comment.set_node_value("changed");
        cdata.set_node_value("changed");
        assert_eq!(comment.node_name(), "#comment");
        assert_eq!(cdata.node_name(), "#cdata-section");
    }

    #[test]
    fn test_character_data_edits() {
        let mut data = CharacterData::new("hello");
        data.append_data(" world");
        assert_eq!(data.data(), "hello world");

        data.insert_data(5, ",").unwrap();
        assert_eq!(data.data(), "hello, world");

        data.delete_data(5, 1).unwrap();
        assert_eq!(data.data(), "hello world");

        data.replace_data(6, 100, "there").unwrap();
        assert_eq!(data.data(), "hello there");

        assert_eq!(data.substring_data(0, 5).unwrap(), "hello");
        assert!(data.insert_data(99, "x").is_err());
        assert!(data.substring_data(12, 1).is_err());
    }

    #[test]
    fn test_node_types() {
        assert_eq!(NodeKind::Element.node_type(), 1);
        assert_eq!(NodeKind::Text.node_type(), 3);
        assert_eq!(NodeKind::CDataSection.node_type(), 4);
        assert_eq!(NodeKind::ProcessingInstruction.node_type(), 7);
        assert_eq!(NodeKind::Comment.node_type(), 8);
        assert_eq!(NodeKind::Document.node_type(), 9);
        assert!(NodeKind::CDataSection.is_character_data());
        assert!(!NodeKind::ProcessingInstruction.is_character_data());
    }

    #[test]
    fn test_element_prefix() {
        let mut e = Element::new("x:foo", None, ElementClass::Unknown, Attributes::new());
        assert_eq!(e.prefix(), Some("x"));
        assert_eq!(e.local_name(), "foo");

        e.set_prefix(Some("y"));
        assert_eq!(e.qualified_name(), "y:foo");

        e.set_prefix(None);
        assert_eq!(e.qualified_name(), "foo");
        assert_eq!(e.prefix(), None);
    }

    #[test]
    fn test_set_prefix_ignored_outside_elements() {
        let mut comment = NodeContent::comment("c");
        comment.set_prefix(Some("x"));
        assert_eq!(comment.node_name(), "#comment");
        assert_eq!(comment.node_value(), Some("c"));

        let mut pi = NodeContent::processing_instruction("t", "d");
        pi.set_prefix(Some("x"));
        assert_eq!(pi.node_name(), "t");
        assert_eq!(pi.node_value(), Some("d"));
    }
}
