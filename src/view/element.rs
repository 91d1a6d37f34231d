//! Minimal element tree the console views are built from.
//!
//! Views are assembled as [`Element`] values and serialized with
//! [`Element::to_html`] for the web console, or handed to the plain-text
//! renderer for the CLI.

use std::fmt::Write;

/// Elements written without a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub class: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: None,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the class attribute. Empty strings leave the element unclassed.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.class = if class.trim().is_empty() { None } else { Some(class) };
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Direct child elements, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    let _ = write!(out, "<{}", el.tag);
    if let Some(class) = &el.class {
        let _ = write!(out, " class=\"{}\"", escape_html(class));
    }
    for (name, value) in &el.attrs {
        let _ = write!(out, " {}=\"{}\"", name, escape_html(value));
    }
    out.push('>');

    if VOID_TAGS.contains(&el.tag.as_str()) {
        return;
    }

    for child in &el.children {
        match child {
            Node::Text(t) => out.push_str(&escape_html(t)),
            Node::Element(e) => write_element(e, out),
        }
    }
    let _ = write!(out, "</{}>", el.tag);
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ── Builders ─────────────────────────────────────────────────

pub fn make_table(rows: Vec<Element>, class: &str) -> Element {
    Element::new("table").with_class(class).children(rows)
}

pub fn make_row(cells: Vec<Element>, class: &str) -> Element {
    Element::new("tr").with_class(class).children(cells)
}

pub fn make_header(contents: impl Into<Node>, class: &str) -> Element {
    Element::new("th").with_class(class).child(contents)
}

pub fn make_data(contents: impl Into<Node>, class: &str) -> Element {
    Element::new("td").with_class(class).child(contents)
}

pub fn make_div(contents: Vec<Node>, class: &str) -> Element {
    Element::new("div").with_class(class).children(contents)
}

pub fn make_text(contents: impl Into<String>) -> Node {
    Node::Text(contents.into())
}
