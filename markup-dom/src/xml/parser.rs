//! Markup parser that builds node trees into a page.
//!
//! The parser uses quick-xml's streaming API. Every start tag goes through
//! an [`ElementFactory`]: HTML pages call `create_element` with lower-cased
//! names and record `xmlns:*` declarations into the page's namespace table,
//! XML pages resolve namespaces with scoped bindings and call
//! `create_element_ns`.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::attributes::Attributes as XmlAttributes;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::factory::{ElementFactory, ElementRegistry};
use crate::node::namespace::{xmlns_prefix, NamespaceContext};
use crate::node::{NodeContent, NodeInner, NodeRef, RawAttribute};
use crate::page::{Page, PageKind, PageRef};

/// HTML elements that never have content and have no end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Options for parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Drop text nodes made only of whitespace.
    pub skip_whitespace_text: bool,
}

/// Parser that turns markup into nodes of a page.
pub struct MarkupParser<F: ElementFactory> {
    factory: F,
    options: ParseOptions,
}

impl<F: ElementFactory> MarkupParser<F> {
    /// Creates a parser with the given element factory.
    pub fn new(factory: F) -> Self {
        Self::with_options(factory, ParseOptions::default())
    }

    /// Creates a parser with the given element factory and options.
    pub fn with_options(factory: F, options: ParseOptions) -> Self {
        MarkupParser { factory, options }
    }

    /// Parses `source` and appends the result to the page's document node.
    pub fn parse_str(&self, page: &PageRef, source: &str) -> Result<()> {
        let mut reader = Reader::from_str(source);
        self.parse_reader(page, &mut reader)
    }

    /// Parses a file and appends the result to the page's document node.
    pub fn parse_file<P: AsRef<Path>>(&self, page: &PageRef, path: P) -> Result<()> {
        let file = File::open(path)?;
        let mut reader = Reader::from_reader(BufReader::new(file));
        self.parse_reader(page, &mut reader)
    }

    fn parse_reader<R: BufRead>(&self, page: &PageRef, reader: &mut Reader<R>) -> Result<()> {
        let html = page.is_html();
        let config = reader.config_mut();
        config.trim_text_start = false;
        config.trim_text_end = false;
        if html {
            config.check_end_names = false;
            config.allow_unmatched_ends = true;
        }

        let mut builder = TreeBuilder::new(page, &self.factory, self.options);
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let (name, attributes) = read_tag(reader, e, html)?;
                    builder.start_element(&name, attributes, false)?;
                }
                Event::Empty(ref e) => {
                    let (name, attributes) = read_tag(reader, e, html)?;
                    builder.start_element(&name, attributes, true)?;
                }
                Event::End(ref e) => {
                    let name = decode(reader, e.name().as_ref())?;
                    builder.end_element(&name)?;
                }
                Event::Text(ref e) => {
                    let raw = decode(reader, e.as_ref())?;
                    let text = unescape(&raw).map_err(|e| Error::Parse(e.to_string()))?;
                    builder.text(&text);
                }
                Event::GeneralRef(ref e) => {
                    let text = resolve_reference(reader, e, html)?;
                    builder.text(&text);
                }
                Event::CData(ref e) => {
                    let data = decode(reader, e.as_ref())?;
                    builder.leaf(NodeContent::cdata_section(data))?;
                }
                Event::Comment(ref e) => {
                    let data = decode(reader, e.as_ref())?;
                    builder.leaf(NodeContent::comment(data))?;
                }
                Event::PI(ref e) => {
                    let raw = decode(reader, e.as_ref())?;
                    let (target, data) = split_instruction(&raw);
                    builder.leaf(NodeContent::processing_instruction(target, data))?;
                }
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
            buf.clear();
        }
        builder.finish()
    }
}

/// Builds the tree while events arrive.
struct TreeBuilder<'a, F: ElementFactory> {
    page: &'a PageRef,
    factory: &'a F,
    options: ParseOptions,
    open: Vec<NodeRef>,
    namespaces: NamespaceContext,
    pending_text: String,
}

impl<'a, F: ElementFactory> TreeBuilder<'a, F> {
    fn new(page: &'a PageRef, factory: &'a F, options: ParseOptions) -> Self {
        TreeBuilder {
            page,
            factory,
            options,
            open: Vec::new(),
            namespaces: NamespaceContext::new(),
            pending_text: String::new(),
        }
    }

    fn current(&self) -> &NodeRef {
        self.open.last().unwrap_or_else(|| self.page.document())
    }

    fn start_element(
        &mut self,
        name: &str,
        attributes: Vec<RawAttribute>,
        empty: bool,
    ) -> Result<()> {
        self.flush_text()?;
        trace!(name, attributes = attributes.len(), empty, "start element");
        let node = if self.page.is_html() {
            for (attr_name, value) in &attributes {
                if let Some(prefix) = xmlns_prefix(attr_name).filter(|p| !p.is_empty()) {
                    self.page.declare_namespace(prefix, value);
                }
            }
            self.factory
                .create_element(self.page, name, Some(&attributes))
        } else {
            self.namespaces.push_scope();
            for (attr_name, value) in &attributes {
                if let Some(prefix) = xmlns_prefix(attr_name) {
                    self.namespaces.bind(prefix, value);
                }
            }
            let namespace_uri = self.namespaces.resolve_element(name);
            let node = self.factory.create_element_ns(
                self.page,
                namespace_uri.as_deref(),
                name,
                Some(&attributes),
            );
            if empty {
                self.namespaces.pop_scope();
            }
            node
        };
        NodeInner::append_child(self.current(), &node)?;

        let void = self.page.is_html() && VOID_ELEMENTS.contains(&name);
        if !empty && !void {
            self.open.push(node);
        }
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        self.flush_text()?;
        let html = self.page.is_html();
        let position = self.open.iter().rposition(|node| {
            node.borrow()
                .element()
                .is_some_and(|e| same_name(e.qualified_name(), name, html))
        });
        let Some(position) = position else {
            debug!(name, "end tag without matching start tag");
            return Ok(());
        };
        while self.open.len() > position {
            self.open.pop();
            if !html {
                self.namespaces.pop_scope();
            }
        }
        trace!(name, depth = self.open.len(), "end element");
        Ok(())
    }

    fn text(&mut self, text: &str) {
        self.pending_text.push_str(text);
    }

    fn leaf(&mut self, content: NodeContent) -> Result<()> {
        self.flush_text()?;
        trace!(kind = %content.kind(), "leaf node");
        let node = self.page.new_node(content);
        NodeInner::append_child(self.current(), &node)
    }

    fn flush_text(&mut self) -> Result<()> {
        if self.pending_text.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.pending_text);
        let blank = text.trim().is_empty();
        if blank && (self.open.is_empty() || self.options.skip_whitespace_text) {
            return Ok(());
        }
        let node = self.page.create_text_node(&text);
        NodeInner::append_child(self.current(), &node)
    }

    fn finish(mut self) -> Result<()> {
        self.flush_text()?;
        if !self.page.is_html() {
            if let Some(node) = self.open.last() {
                return Err(Error::Parse(format!(
                    "unclosed element <{}>",
                    node.borrow().node_name()
                )));
            }
        }
        Ok(())
    }
}

fn same_name(open: &str, close: &str, html: bool) -> bool {
    if html {
        open.eq_ignore_ascii_case(close)
    } else {
        open == close
    }
}

fn decode<R>(reader: &Reader<R>, bytes: &[u8]) -> Result<String> {
    reader
        .decoder()
        .decode(bytes)
        .map(Cow::into_owned)
        .map_err(|e| Error::Parse(e.to_string()))
}

/// Reads the tag name and the attributes, in document order. HTML names
/// are lower-cased.
fn read_tag<R>(
    reader: &Reader<R>,
    start: &BytesStart,
    html: bool,
) -> Result<(String, Vec<RawAttribute>)> {
    let mut name = decode(reader, start.name().as_ref())?;
    let attributes = if html {
        name.make_ascii_lowercase();
        start.html_attributes()
    } else {
        start.attributes()
    };
    Ok((name, read_attributes(reader, attributes, html)?))
}

fn read_attributes<R>(
    reader: &Reader<R>,
    mut attributes: XmlAttributes,
    html: bool,
) -> Result<Vec<RawAttribute>> {
    let mut raw = Vec::new();
    for attr in attributes.with_checks(false) {
        let attr = attr.map_err(|e| Error::Parse(format!("attribute error: {e}")))?;
        let mut key = decode(reader, attr.key.as_ref())?;
        if html {
            key.make_ascii_lowercase();
        }
        let value = if html {
            unescape_lenient(&decode(reader, &attr.value)?)
        } else {
            attr.unescape_value()
                .map_err(|e| Error::Parse(e.to_string()))?
                .into_owned()
        };
        raw.push((key, value));
    }
    Ok(raw)
}

/// Resolves a `&name;` or `&#n;` reference from the text stream. HTML pages
/// keep references they cannot resolve as literal text.
fn resolve_reference<R>(reader: &Reader<R>, reference: &BytesRef, html: bool) -> Result<String> {
    let name = decode(reader, reference.as_ref())?;
    match resolve_entity(&name) {
        Some(value) => Ok(value),
        None if html => Ok(format!("&{name};")),
        None => Err(Error::Parse(format!("unknown entity &{name};"))),
    }
}

/// Resolves a character reference (`#65`, `#x41`) or one of the predefined
/// XML entities.
fn resolve_entity(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).filter(|&c| c != '\0').map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}

/// Replaces the references [`resolve_entity`] knows. Unknown references and
/// a bare `&` are kept as written.
fn unescape_lenient(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let resolved = after.find(';').and_then(|semi| {
            let name = &after[..semi];
            let well_formed =
                !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '#');
            if well_formed {
                resolve_entity(name).map(|value| (value, semi))
            } else {
                None
            }
        });
        match resolved {
            Some((value, semi)) => {
                out.push_str(&value);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Splits processing instruction content into target and data at the first
/// whitespace.
fn split_instruction(raw: &str) -> (&str, &str) {
    match raw.find(char::is_whitespace) {
        Some(index) => (&raw[..index], raw[index..].trim_start()),
        None => (raw, ""),
    }
}

/// Parses an HTML string into a new page using the HTML element registry.
pub fn parse_html(source: &str) -> Result<PageRef> {
    parse_with(PageKind::Html, source, ParseOptions::default())
}

/// Parses an XML string into a new page using the HTML element registry.
pub fn parse_xml(source: &str) -> Result<PageRef> {
    parse_with(PageKind::Xml, source, ParseOptions::default())
}

/// Parses a string into a new page of the given kind.
pub fn parse_with(kind: PageKind, source: &str, options: ParseOptions) -> Result<PageRef> {
    let page = Page::new(kind);
    MarkupParser::with_options(ElementRegistry::html(), options).parse_str(&page, source)?;
    Ok(page)
}

/// Parses a file into a new page of the given kind.
pub fn parse_file<P: AsRef<Path>>(path: P, kind: PageKind, options: ParseOptions) -> Result<PageRef> {
    let page = Page::new(kind);
    MarkupParser::with_options(ElementRegistry::html(), options).parse_file(&page, path)?;
    Ok(page)
}
