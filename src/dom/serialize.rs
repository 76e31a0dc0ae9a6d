//! Document serialization
//!
//! Elements go through html5ever's serializer (via `ElementRef::html`), which
//! handles namespaced attributes, void and raw-text elements. Nodes that sit
//! directly under the document root are written here, since html5ever only
//! emits a doctype's name.

use scraper::node::Doctype;
use scraper::{ElementRef, Html, Node};

pub(super) fn serialize_document(html: &Html) -> String {
    let mut out = String::new();
    for child in html.tree.root().children() {
        match child.value() {
            Node::Doctype(doctype) => write_doctype(doctype, &mut out),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::ProcessingInstruction(pi) => {
                out.push_str("<?");
                out.push_str(&pi.target);
                out.push(' ');
                out.push_str(&pi.data);
                out.push('>');
            }
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    out.push_str(&el.html());
                }
            }
            _ => {}
        }
    }
    out
}

fn write_doctype(doctype: &Doctype, out: &mut String) {
    out.push_str("<!DOCTYPE ");
    out.push_str(doctype.name());
    let public_id = doctype.public_id();
    let system_id = doctype.system_id();
    if !public_id.is_empty() {
        out.push_str(" PUBLIC \"");
        out.push_str(public_id);
        out.push('"');
        if !system_id.is_empty() {
            out.push_str(" \"");
            out.push_str(system_id);
            out.push('"');
        }
    } else if !system_id.is_empty() {
        out.push_str(" SYSTEM \"");
        out.push_str(system_id);
        out.push('"');
    }
    out.push('>');
}
