//! In-memory document used by the enhancer
//!
//! Mutations are written straight into the parsed `scraper` tree, so reads,
//! selector matching and serialization all see the current state. Queries
//! only visit nodes connected to the document and skip `<template>` content.

mod serialize;
pub mod style;

use crate::{Error, Result};
use html5ever::tendril::StrTendril;
use html5ever::{LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;

/// Identifier of a node in a [`Document`]
pub type NodeId = ego_tree::NodeId;

/// Parse a CSS selector, mapping parse failures to [`Error::SelectorError`].
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::SelectorError {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Convert a dataset key (`fooBar`) into its attribute name (`data-foo-bar`).
pub fn dataset_attr_name(key: &str) -> String {
    let mut out = String::from("data-");
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn html_attr_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name.to_ascii_lowercase()))
}

// `Element` caches its id and classes; keep them in step with `attrs`.
fn sync_id_and_classes(el: &mut Element) {
    let id = el.attr("id").map(LocalName::from);
    let classes: HashSet<LocalName> = el
        .attr("class")
        .map(|c| c.split_whitespace().map(LocalName::from).collect())
        .unwrap_or_default();
    el.id = id;
    el.classes = classes;
}

fn in_template(el: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == "template")
}

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("parse_errors", &self.html.errors.len())
            .finish()
    }
}

impl Document {
    /// Parse a full HTML document (fragments are wrapped in `html`/`body`).
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    fn with_element_mut<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        let mut node = self.html.tree.get_mut(id)?;
        match node.value() {
            Node::Element(el) => Some(f(el)),
            _ => None,
        }
    }

    /// Elements connected to the document, in document order, outside
    /// `<template>` content.
    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| !in_template(el))
    }

    /// All elements matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>> {
        let sel = parse_selector(selector)?;
        Ok(self
            .elements()
            .filter(|el| sel.matches(el))
            .map(|el| el.id())
            .collect())
    }

    /// First element matching `selector`.
    pub fn select_first(&self, selector: &str) -> Result<Option<NodeId>> {
        let sel = parse_selector(selector)?;
        Ok(self.elements().find(|el| sel.matches(el)).map(|el| el.id()))
    }

    /// First element whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .find(|el| el.value().id() == Some(id))
            .map(|el| el.id())
    }

    /// `id` followed by its element ancestors, innermost first.
    pub fn event_path(&self, id: NodeId) -> Vec<NodeId> {
        let Some(el) = self.element(id) else {
            return Vec::new();
        };
        std::iter::once(el.id())
            .chain(el.ancestors().filter_map(ElementRef::wrap).map(|a| a.id()))
            .collect()
    }

    /// Lowercase tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.value().name())
    }

    /// Current value of an attribute.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|el| el.value().attr(&name.to_ascii_lowercase()))
    }

    /// `element.dataset[key]`
    pub fn dataset(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attr(id, &dataset_attr_name(key))
    }

    /// Set an attribute on an element. Non-element ids are ignored.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let key = html_attr_name(name);
        self.with_element_mut(id, |el| {
            el.attrs.insert(key, StrTendril::from(value));
            sync_id_and_classes(el);
        });
    }

    /// Remove an attribute from an element.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        let key = html_attr_name(name);
        self.with_element_mut(id, |el| {
            el.attrs.retain(|k, _| *k != key);
            sync_id_and_classes(el);
        });
    }

    /// `element.style[name]`, empty when unset.
    pub fn style_property(&self, id: NodeId, name: &str) -> String {
        style::parse_declarations(self.attr(id, "style"))
            .into_iter()
            .find(|(prop, _)| prop == name)
            .map(|(_, value)| value)
            .unwrap_or_default()
    }

    /// `element.style[name] = value`; an empty value removes the declaration.
    ///
    /// A value that is not a single declaration value (a top-level `;`,
    /// braces, unbalanced quotes or parentheses) is rejected and the style is
    /// left unchanged. Returns whether the write was applied.
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        if !style::is_declaration_value(value) {
            return false;
        }
        let mut decls = style::parse_declarations(self.attr(id, "style"));
        style::set_declaration(&mut decls, name, value);
        if decls.is_empty() {
            self.remove_attr(id, "style");
        } else {
            let serialized = style::serialize_declarations(&decls);
            self.set_attr(id, "style", &serialized);
        }
        true
    }

    /// Replace the element's children with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if self.element(id).is_none() {
            return;
        }
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return;
        };
        while let Some(mut child) = node.first_child() {
            child.detach();
        }
        node.append(Node::Text(Text {
            text: StrTendril::from(text.into()),
        }));
    }

    /// Text content of an element.
    pub fn text(&self, id: NodeId) -> String {
        self.element(id)
            .map(|el| el.text().collect())
            .unwrap_or_default()
    }

    /// Text of the first `<title>`.
    pub fn title(&self) -> String {
        self.select_first("title")
            .ok()
            .flatten()
            .map(|id| self.text(id))
            .unwrap_or_default()
    }

    /// Text of `<body>`.
    pub fn body_text(&self) -> String {
        self.select_first("body")
            .ok()
            .flatten()
            .map(|id| self.text(id))
            .unwrap_or_default()
    }

    /// Serialize the document.
    pub fn to_html(&self) -> String {
        serialize::serialize_document(&self.html)
    }

    /// Borrow an element for a renderer or listener.
    pub fn element_handle(&mut self, id: NodeId) -> Option<ElementHandle<'_>> {
        self.element(id)?;
        Some(ElementHandle { doc: self, id })
    }
}

/// Mutable view of one element, handed to chart renderers.
pub struct ElementHandle<'a> {
    doc: &'a mut Document,
    id: NodeId,
}

impl<'a> ElementHandle<'a> {
    /// The element's `id` attribute, if any
    pub fn element_id(&self) -> Option<&str> {
        self.doc.attr(self.id, "id")
    }

    pub fn tag_name(&self) -> &str {
        self.doc.tag_name(self.id).unwrap_or_default()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.doc.attr(self.id, name)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.doc.set_attr(self.id, name, value);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.doc.set_text(self.id, text);
    }
}
