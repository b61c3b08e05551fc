//! Canonical serializer.
//!
//! Two-space indentation, one element per line, attributes in insertion
//! order. Elements whose only child is text are written on a single line;
//! CDATA sections keep their own line. The decision is taken per element from the tree, never by rewriting
//! rendered text.

use super::tree::{Document, Element, Node};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
const INDENT: &str = "  ";

/// Render a document to UTF-8 bytes terminated by a newline.
pub fn render(doc: &Document) -> Vec<u8> {
    render_string(doc).into_bytes()
}

pub fn render_string(doc: &Document) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    if let Some(decl) = doc.doctype() {
        out.push_str("<!DOCTYPE ");
        out.push_str(decl);
        out.push_str(">\n");
    }
    write_element(&mut out, doc.root(), 0);
    out
}

fn write_element(out: &mut String, el: &Element, depth: usize) {
    push_indent(out, depth);
    write_open_tag(out, el);

    if el.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push('>');

    if el.is_leaf() {
        for node in el.nodes() {
            write_char_data(out, node);
        }
    } else {
        out.push('\n');
        for node in el.nodes() {
            match node {
                Node::Element(child) => write_element(out, child, depth + 1),
                other => {
                    push_indent(out, depth + 1);
                    write_char_data(out, other);
                    out.push('\n');
                }
            }
        }
        push_indent(out, depth);
    }

    out.push_str("</");
    out.push_str(el.name());
    out.push_str(">\n");
}

fn write_open_tag(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(el.name());
    for (key, value) in el.attrs() {
        out.push(' ');
        out.push_str(key);
        // Empty values are written as valueless attributes.
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }
}

fn write_char_data(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::Element(_) => {}
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

/// HTML escaping for markup embedded in CDATA sections.
pub fn escape_html(s: &str) -> String {
    escape_attr(s).replace('\'', "&#x27;")
}
