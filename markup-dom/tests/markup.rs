//! End-to-end tests for the node model, the factories and the printer.
//!
//! Round-trip cases are loaded from `tests/cases/`: every `.xml` or `.html`
//! input is parsed without whitespace-only text and compared against the
//! `.out` file next to it.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use markup_dom::node::namespace::NamespaceTable;
use markup_dom::{
    parse_file, print_xml, ElementFactory, ElementRegistry, Error, NodeContent, NodeInner,
    NodeKind, NodeRef, Page, PageKind, PageRef, ParseOptions, PrintOptions,
    UNKNOWN_ELEMENT_FACTORY,
};

fn cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("cases")
}

fn print(node: &NodeRef) -> (String, bool) {
    let mut output = Vec::new();
    let tag = print_xml(node, "", false, &mut output).unwrap();
    (String::from_utf8(output).unwrap(), tag)
}

fn character_nodes(page: &PageRef) -> Vec<NodeRef> {
    vec![
        page.create_text_node("hello world"),
        page.create_cdata_section("hello world"),
        page.create_comment("hello world"),
    ]
}

#[test]
fn round_trip_cases() {
    let mut inputs: Vec<PathBuf> = fs::read_dir(cases_dir())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("xml") | Some("html")
            )
        })
        .collect();
    inputs.sort();
    assert!(!inputs.is_empty());

    let options = ParseOptions {
        skip_whitespace_text: true,
    };
    for input in inputs {
        let kind = if input.extension().is_some_and(|e| e == "html") {
            PageKind::Html
        } else {
            PageKind::Xml
        };
        let page = parse_file(&input, kind, options).unwrap();
        let actual = page.as_xml(PrintOptions::default()).unwrap();
        let expected = fs::read_to_string(input.with_extension("out")).unwrap();
        assert_eq!(actual, expected, "output mismatch for {}", input.display());
    }
}

#[test]
fn split_keeps_kind_and_prefix() {
    let page = Page::xml();
    for node in character_nodes(&page) {
        let kind = node.borrow().kind();
        for offset in [0, 5, 11] {
            node.borrow_mut().set_data("hello world");
            let tail = NodeInner::split(&node, offset).unwrap();
            let tail = tail.borrow();
            assert_eq!(tail.kind(), kind);
            assert_eq!(node.borrow().data(), Some(&"hello world"[..offset]));
            assert_eq!(tail.data(), Some(&"hello world"[offset..]));
            assert!(tail.is_detached());
            assert!(Rc::ptr_eq(&tail.page().unwrap(), &page));
        }
    }
}

#[test]
fn split_out_of_range_leaves_data() {
    let page = Page::html();
    for node in character_nodes(&page) {
        let err = NodeInner::split(&node, 12).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                offset: 12,
                length: 11
            }
        ));
        assert_eq!(node.borrow().data(), Some("hello world"));
    }
}

#[test]
fn split_counts_characters() {
    let page = Page::xml();
    let text = page.create_text_node("héllo");
    let tail = NodeInner::split(&text, 2).unwrap();
    assert_eq!(text.borrow().data(), Some("hé"));
    assert_eq!(tail.borrow().data(), Some("llo"));
}

#[test]
fn split_node_inserted_as_next_sibling() {
    let page = Page::xml();
    let parent = UNKNOWN_ELEMENT_FACTORY.create_element(&page, "p", None);
    let cdata = page.create_cdata_section("abcdef");
    let after = page.create_comment("end");
    NodeInner::append_child(&parent, &cdata).unwrap();
    NodeInner::append_child(&parent, &after).unwrap();

    let tail = NodeInner::split(&cdata, 3).unwrap();
    NodeInner::insert_after(&cdata, &tail).unwrap();

    assert_eq!(parent.borrow().child_count(), 3);
    let next = NodeInner::next_sibling(&cdata).unwrap();
    assert!(Rc::ptr_eq(&next, &tail));
    assert_eq!(next.borrow().kind(), NodeKind::CDataSection);
    assert_eq!(
        print(&parent).0,
        "<p><![CDATA[abc]]><![CDATA[def]]>\n  <!--end-->\n</p>"
    );
}

#[test]
fn split_rejects_non_character_data() {
    let page = Page::xml();
    let pi = page.create_processing_instruction("t", "data");
    assert!(matches!(
        NodeInner::split(&pi, 1),
        Err(Error::NotCharacterData(NodeKind::ProcessingInstruction))
    ));
    assert_eq!(pi.borrow().data(), Some("data"));
}

#[test]
fn fixed_node_names() {
    let page = Page::xml();
    let comment = page.create_comment("a");
    let cdata = page.create_cdata_section("b");
    let text = page.create_text_node("c");
    for node in [&comment, &cdata, &text] {
        node.borrow_mut().set_data("changed");
    }
    assert_eq!(comment.borrow().node_name(), "#comment");
    assert_eq!(cdata.borrow().node_name(), "#cdata-section");
    assert_eq!(text.borrow().node_name(), "#text");
}

#[test]
fn serializer_literals() {
    let page = Page::xml();
    assert_eq!(
        print(&page.create_comment("hi")),
        ("<!--hi-->".to_string(), true)
    );
    assert_eq!(
        print(&page.create_cdata_section("a<b")),
        ("<![CDATA[a<b]]>".to_string(), true)
    );
    assert_eq!(
        print(&page.create_processing_instruction("xml-stylesheet", "href=1.xsl")),
        ("<?xml-stylesheet href=1.xsl?>".to_string(), true)
    );
}

#[test]
fn processing_instruction_slots() {
    let page = Page::xml();
    let pi = page.create_processing_instruction("target", "one");
    assert_eq!(pi.borrow().node_name(), "target");
    assert_eq!(pi.borrow().target(), Some("target"));

    pi.borrow_mut().set_node_value("two");
    assert_eq!(pi.borrow().data(), Some("two"));

    pi.borrow_mut().set_data("three");
    assert_eq!(pi.borrow().node_value(), Some("three"));

    NodeInner::set_text_content(&pi, "four").unwrap();
    assert_eq!(pi.borrow().data(), Some("four"));
    assert_eq!(NodeInner::text_content(&pi).as_deref(), Some("four"));
}

#[test]
fn set_prefix_is_noop_on_leaves() {
    let page = Page::xml();
    let comment = page.create_comment("c");
    let pi = page.create_processing_instruction("t", "d");
    for node in [&comment, &pi] {
        let name = node.borrow().node_name().to_string();
        node.borrow_mut().set_prefix(Some("x"));
        assert_eq!(node.borrow().node_name(), name);
    }
    assert_eq!(comment.borrow().data(), Some("c"));
    assert_eq!(pi.borrow().data(), Some("d"));
}

#[test]
fn element_text_content_aggregates() {
    let page = markup_dom::parse_xml("<a>x<b>y<![CDATA[z]]></b><!--no--></a>").unwrap();
    let a = page.document_element().unwrap();
    assert_eq!(NodeInner::text_content(&a).as_deref(), Some("xyz"));

    NodeInner::set_text_content(&a, "plain").unwrap();
    assert_eq!(a.borrow().child_count(), 1);
    assert_eq!(print(&a).0, "<a>plain</a>");
}

#[test]
fn factories_return_detached_elements() {
    let page = Page::html();
    let registry = ElementRegistry::html();
    let factories: [&dyn ElementFactory; 2] = [&UNKNOWN_ELEMENT_FACTORY, &registry];
    for factory in factories {
        let a = factory.create_element(&page, "div", None);
        let b = factory.create_element_ns(&page, None, "custom", None);
        for node in [a, b] {
            let inner = node.borrow();
            assert!(inner.parent().is_none());
            assert!(inner.element().unwrap().attributes().is_empty());
        }
    }
    assert_eq!(page.document().borrow().child_count(), 0);
}

#[test]
fn fallback_prefix_resolution() {
    let table: NamespaceTable = [("x", "urn:example")].into_iter().collect();
    let html = Page::with_namespaces(PageKind::Html, table.clone());
    let xml = Page::with_namespaces(PageKind::Xml, table);

    let namespace_of = |page: &PageRef, tag: &str| {
        let node = UNKNOWN_ELEMENT_FACTORY.create_element(page, tag, None);
        let inner = node.borrow();
        let element = inner.element().unwrap();
        assert_eq!(element.qualified_name(), tag);
        element.namespace_uri().map(str::to_string)
    };

    assert_eq!(namespace_of(&html, "x:foo").as_deref(), Some("urn:example"));
    assert_eq!(namespace_of(&html, "y:foo"), None);
    assert_eq!(namespace_of(&xml, "x:foo"), None);
}

#[test]
fn duplicate_attributes_last_wins() {
    let page = Page::xml();
    let attrs = vec![
        ("a".to_string(), "1".to_string()),
        ("b".to_string(), "2".to_string()),
        ("a".to_string(), "3".to_string()),
    ];
    let node = UNKNOWN_ELEMENT_FACTORY.create_element(&page, "e", Some(&attrs));
    assert_eq!(print(&node).0, "<e a=\"3\" b=\"2\"/>");
}

#[test]
fn detached_subtree_releases_parent() {
    let page = Page::xml();
    let parent = UNKNOWN_ELEMENT_FACTORY.create_element(&page, "parent", None);
    let child = page.create_text_node("kept");
    NodeInner::append_child(&parent, &child).unwrap();

    let weak = Rc::downgrade(&parent);
    drop(parent);
    assert!(weak.upgrade().is_none());
    assert!(child.borrow().parent().is_none());
}

#[test]
fn document_printing_with_declaration() {
    let page = Page::xml();
    let root = UNKNOWN_ELEMENT_FACTORY.create_element(&page, "r", None);
    NodeInner::append_child(page.document(), &root).unwrap();
    let pi = page.new_node(NodeContent::processing_instruction("pi", "x"));
    NodeInner::append_child(&root, &pi).unwrap();

    let output = page
        .as_xml(PrintOptions {
            xml_declaration: true,
        })
        .unwrap();
    assert_eq!(
        output,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<r><?pi x?>\n</r>\n"
    );
}
