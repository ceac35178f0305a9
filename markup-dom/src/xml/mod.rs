//! Markup parsing and output.

mod parser;
mod printer;

pub use parser::{parse_file, parse_html, parse_with, parse_xml, MarkupParser, ParseOptions};
pub use printer::{print_to_string, print_xml, PrintOptions, XmlPrinter};
