//! Constants used throughout markup-dom.

/// Node name of the document node.
pub const DOCUMENT_NODE_NAME: &str = "#document";

/// Node name of every text node.
pub const TEXT_NODE_NAME: &str = "#text";

/// Node name of every CDATA section.
pub const CDATA_SECTION_NODE_NAME: &str = "#cdata-section";

/// Node name of every comment.
pub const COMMENT_NODE_NAME: &str = "#comment";

/// The XHTML namespace, assigned to elements built by the HTML factory.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// The namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Indentation added for each nesting level when printing markup.
pub const INDENT_STEP: &str = "  ";

/// Line separator written between tags when printing markup.
pub const LINE_SEPARATOR: &str = "\n";

/// Declaration written ahead of a page when requested.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";
