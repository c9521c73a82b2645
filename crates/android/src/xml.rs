//! Minimal XML element tree for Android resource files
//!
//! Rendering is deterministic: attributes keep insertion order, nesting is
//! indented by four spaces, and elements with several attributes put each
//! attribute on its own line the way Android Studio formats resources.

use std::fmt;

/// Android resource XML namespace
pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

const INDENT: &str = "    ";
const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// A child of an [`Element`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Character data, escaped on render
    Text(String),
}

/// An XML element with ordered attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element
    pub fn child(mut self, element: Element) -> Self {
        self.push(element);
        self
    }

    /// Add text content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append a child element in place
    pub fn push(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements, skipping text
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    fn write(&self, out: &mut String, depth: usize) {
        let indent = INDENT.repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.name);

        if self.attributes.len() > 1 {
            let attr_indent = INDENT.repeat(depth + 1);
            for (key, value) in &self.attributes {
                out.push('\n');
                out.push_str(&attr_indent);
                push_attribute(out, key, value);
            }
        } else if let Some((key, value)) = self.attributes.first() {
            out.push(' ');
            push_attribute(out, key, value);
        }

        if self.children.is_empty() {
            out.push_str(" />\n");
            return;
        }

        out.push('>');

        if self.children.iter().all(|c| matches!(c, Node::Text(_))) {
            for child in &self.children {
                if let Node::Text(text) = child {
                    out.push_str(&escape_text(text));
                }
            }
        } else {
            out.push('\n');
            for child in &self.children {
                match child {
                    Node::Element(e) => e.write(out, depth + 1),
                    Node::Text(text) => {
                        out.push_str(&INDENT.repeat(depth + 1));
                        out.push_str(&escape_text(text));
                        out.push('\n');
                    }
                }
            }
            out.push_str(&indent);
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push_str(">\n");
    }
}

fn push_attribute(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&escape_attribute(value));
    out.push('"');
}

/// Whether `c` may appear in an XML 1.0 document at all
///
/// Escaping cannot represent the other C0 controls or U+FFFE/U+FFFF, so
/// values containing them must be rejected before rendering.
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Escape character data
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a double-quoted attribute value
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\t' => escaped.push_str("&#9;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A rendered XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument(String);

impl XmlDocument {
    /// Render a document with an XML declaration and the given root
    pub fn from_root(root: &Element) -> Self {
        let mut out = String::from(DECLARATION);
        root.write(&mut out, 0);
        Self(out)
    }

    /// Document text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the document text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for XmlDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<[u8]> for XmlDocument {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
