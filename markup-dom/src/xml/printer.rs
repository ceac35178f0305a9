//! Markup output for node trees.
//!
//! Every node kind prints through [`print_xml`], which returns whether the
//! node ended on a tag. A parent uses that flag to decide whether its next
//! child or its own closing tag starts on a new, indented line.

use std::io::{self, Write};

use crate::constants::{INDENT_STEP, LINE_SEPARATOR, XML_DECLARATION};
use crate::node::{Element, NodeContent, NodeRef};
use crate::page::Page;

/// Options for printing a whole page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintOptions {
    /// Whether to start the output with an XML declaration.
    pub xml_declaration: bool,
}

/// Prints `node` and its subtree as markup.
///
/// `indent` is the current indentation and `tag_before` tells whether the
/// previous output ended on a tag. Returns the flag to pass to the next
/// sibling.
///
/// When `tag_before` is set, elements and comments start on a new line.
/// A comment writes its indent even when `tag_before` is unset; CDATA
/// sections and processing instructions never write a line break or an
/// indent.
pub fn print_xml<W: Write>(
    node: &NodeRef,
    indent: &str,
    tag_before: bool,
    sink: &mut W,
) -> io::Result<bool> {
    let inner = node.borrow();
    match inner.content() {
        NodeContent::Document => print_children(inner.children(), indent, tag_before, sink),
        NodeContent::Element(element) => {
            if tag_before {
                sink.write_all(LINE_SEPARATOR.as_bytes())?;
                sink.write_all(indent.as_bytes())?;
            }
            write_start_tag(element, sink)?;
            if inner.child_count() == 0 {
                sink.write_all(b"/>")?;
                return Ok(true);
            }
            sink.write_all(b">")?;
            let child_indent = format!("{indent}{INDENT_STEP}");
            if print_children(inner.children(), &child_indent, true, sink)? {
                sink.write_all(LINE_SEPARATOR.as_bytes())?;
                sink.write_all(indent.as_bytes())?;
            }
            write!(sink, "</{}>", element.qualified_name())?;
            Ok(true)
        }
        NodeContent::Text(text) => {
            if text.is_blank() {
                return Ok(tag_before);
            }
            sink.write_all(escape_text(text.data()).as_bytes())?;
            Ok(false)
        }
        NodeContent::CDataSection(cdata) => {
            write!(sink, "<![CDATA[{}]]>", cdata.data())?;
            Ok(true)
        }
        NodeContent::Comment(comment) => {
            if tag_before {
                sink.write_all(LINE_SEPARATOR.as_bytes())?;
            }
            write!(sink, "{indent}<!--{}-->", comment.data())?;
            let child_indent = format!("{indent}{INDENT_STEP}");
            print_children(inner.children(), &child_indent, true, sink)?;
            Ok(true)
        }
        NodeContent::ProcessingInstruction(pi) => {
            write!(sink, "<?{} {}?>", pi.target(), pi.data())?;
            Ok(true)
        }
    }
}

fn print_children<W: Write>(
    children: &[NodeRef],
    indent: &str,
    tag_before: bool,
    sink: &mut W,
) -> io::Result<bool> {
    let mut tag = tag_before;
    for child in children {
        tag = print_xml(child, indent, tag, sink)?;
    }
    Ok(tag)
}

fn write_start_tag<W: Write>(element: &Element, sink: &mut W) -> io::Result<()> {
    write!(sink, "<{}", element.qualified_name())?;
    for (name, value) in element.attributes().iter() {
        write!(sink, " {}=\"{}\"", name, escape_attribute(value))?;
    }
    Ok(())
}

/// Writes node trees or whole pages to an output sink.
pub struct XmlPrinter<W: Write> {
    writer: W,
    options: PrintOptions,
}

impl<W: Write> XmlPrinter<W> {
    /// Creates a printer with default options.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, PrintOptions::default())
    }

    /// Creates a printer with the given options.
    pub fn with_options(writer: W, options: PrintOptions) -> Self {
        XmlPrinter { writer, options }
    }

    /// Prints one subtree at the top indentation level.
    pub fn print_node(&mut self, node: &NodeRef) -> io::Result<()> {
        print_xml(node, "", false, &mut self.writer)?;
        self.writer.flush()
    }

    /// Prints a whole page, optionally preceded by the XML declaration.
    /// Non-empty output ends with a line separator.
    pub fn print_page(&mut self, page: &Page) -> io::Result<()> {
        let declaration = self.options.xml_declaration;
        if declaration {
            self.writer.write_all(XML_DECLARATION.as_bytes())?;
        }
        print_xml(page.document(), "", declaration, &mut self.writer)?;
        if declaration || page.document().borrow().child_count() > 0 {
            self.writer.write_all(LINE_SEPARATOR.as_bytes())?;
        }
        self.writer.flush()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Prints a subtree to a string.
pub fn print_to_string(node: &NodeRef) -> io::Result<String> {
    let mut output = Vec::new();
    XmlPrinter::new(&mut output).print_node(node)?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}

fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

fn escape_attribute(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
