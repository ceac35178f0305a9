//! Build a small page by hand, split a CDATA section and print the result.
//!
//! Usage: cargo run --example print

use markup_dom::{
    ElementFactory, ElementRegistry, NodeInner, Page, PrintOptions, UNKNOWN_ELEMENT_FACTORY,
};

fn main() -> markup_dom::Result<()> {
    let page = Page::html();
    page.declare_namespace("svg", "http://www.w3.org/2000/svg");
    let registry = ElementRegistry::html();

    let attrs = vec![("lang".to_string(), "en".to_string())];
    let html = registry.create_element(&page, "html", Some(&attrs));
    NodeInner::append_child(page.document(), &html)?;

    let body = registry.create_element(&page, "body", None);
    NodeInner::append_child(&html, &body)?;

    let icon = UNKNOWN_ELEMENT_FACTORY.create_element(&page, "svg:circle", None);
    NodeInner::append_child(&body, &icon)?;

    let script = page.create_cdata_section("if (a < b) { go(); }");
    NodeInner::append_child(&body, &script)?;
    let tail = NodeInner::split(&script, 11)?;
    NodeInner::insert_after(&script, &tail)?;

    NodeInner::append_child(&body, &page.create_comment(" generated "))?;

    print!("{}", page.as_xml(PrintOptions { xml_declaration: true })?);
    Ok(())
}
