use crate::xliff::writer;
use crate::xliff::XliffError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

/// An XML element with its attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element with the given (possibly prefixed) name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Qualified name as written in the document (e.g. `trans-unit`, `x:file`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Look up an attribute by its qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First direct child element with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&Element> {
        self.elements().find(|e| e.local_name() == local_name)
    }

    /// Concatenated text of this element and all its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Replace all content with a single text node. Empty text leaves the element childless.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Text(text.to_string()));
        }
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Text(text) | Node::CData(text) => out.push_str(text),
            Node::Element(child) => collect_text(child, out),
            Node::Comment(_) => {}
        }
    }
}

pub(crate) fn local_part(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// A parsed catalog: comments preceding the root, and the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    prolog: Vec<Node>,
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            prolog: Vec::new(),
            root,
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub(crate) fn prolog(&self) -> &[Node] {
        &self.prolog
    }

    /// Parse a catalog from a string.
    ///
    /// The XML declaration, processing instructions and doctype are dropped;
    /// they are regenerated by the writer.
    pub fn parse(xml: &str) -> Result<Self, XliffError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);
        reader.check_end_names(true);

        let mut prolog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .map_err(|source| XliffError::Xml { position, source })?;

            match event {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(XliffError::malformed(position, "multiple root elements"));
                    }
                    stack.push(element_from_start(&start, position)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start, position)?;
                    attach(&mut stack, &mut root, element, position)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| XliffError::malformed(position, "unexpected end tag"))?;
                    attach(&mut stack, &mut root, element, position)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|source| XliffError::Xml { position, source })?;
                    match stack.last_mut() {
                        Some(parent) => push_text(parent, &text),
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(XliffError::malformed(
                                position,
                                "text outside of the root element",
                            ))
                        }
                    }
                }
                Event::CData(cdata) => {
                    let text = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.push(Node::CData(text)),
                        None => {
                            return Err(XliffError::malformed(
                                position,
                                "CDATA outside of the root element",
                            ))
                        }
                    }
                }
                Event::Comment(comment) => {
                    let text = String::from_utf8_lossy(&comment).into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.push(Node::Comment(text)),
                        None if root.is_none() => prolog.push(Node::Comment(text)),
                        None => {}
                    }
                }
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if !stack.is_empty() {
            return Err(XliffError::malformed(
                reader.buffer_position(),
                "unexpected end of document",
            ));
        }

        let root = root.ok_or_else(|| XliffError::malformed(0, "document has no root element"))?;
        Ok(Self { prolog, root })
    }

    /// Read and parse a catalog file.
    pub fn open(path: &Path) -> Result<Self, XliffError> {
        let content = std::fs::read_to_string(path).map_err(|source| XliffError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Serialize with normalized indentation and the canonical declaration.
    pub fn to_xml(&self) -> String {
        writer::write_document(self)
    }

    /// Overwrite `path` with the serialized document.
    pub fn save(&self, path: &Path) -> Result<(), XliffError> {
        std::fs::write(path, self.to_xml()).map_err(|source| XliffError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn element_from_start(start: &BytesStart<'_>, position: usize) -> Result<Element, XliffError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XliffError::Xml {
            position,
            source: e.into(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|source| XliffError::Xml { position, source })?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: usize,
) -> Result<(), XliffError> {
    match stack.last_mut() {
        Some(parent) => parent.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(XliffError::malformed(position, "multiple root elements")),
    }
    Ok(())
}

/// Entity references are reported as separate text events; merge adjacent runs.
fn push_text(parent: &mut Element, text: &str) {
    if let Some(Node::Text(last)) = parent.children.last_mut() {
        last.push_str(text);
    } else {
        parent.children.push(Node::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">
  <!-- exported -->
  <file original="Client/en-US.lproj/Localizable.strings" source-language="en-US" datatype="plaintext">
    <body>
      <trans-unit id="Close" xml:space="preserve">
        <source>Close &amp; exit</source>
        <target>Fermer</target>
        <note>Button label</note>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;

    // ==================== Parsing Tests ====================

    #[test]
    fn test_parse_root_and_attributes() {
        let doc = Document::parse(SAMPLE).expect("Should parse");
        assert_eq!(doc.root().name(), "xliff");
        assert_eq!(doc.root().attr("version"), Some("1.2"));
        assert_eq!(
            doc.root().attr("xmlns"),
            Some("urn:oasis:names:tc:xliff:document:1.2")
        );
    }

    #[test]
    fn test_parse_unescapes_text() {
        let doc = Document::parse(SAMPLE).expect("Should parse");
        let unit = doc
            .root()
            .child("file")
            .and_then(|f| f.child("body"))
            .and_then(|b| b.child("trans-unit"))
            .expect("unit");
        assert_eq!(unit.child("source").unwrap().text(), "Close & exit");
        assert_eq!(unit.attr("xml:space"), Some("preserve"));
    }

    #[test]
    fn test_parse_keeps_leading_comments() {
        let doc = Document::parse("<!-- header --><root/>").expect("Should parse");
        assert_eq!(doc.prolog(), &[Node::Comment(" header ".to_string())]);
    }

    #[test]
    fn test_parse_prefixed_names() {
        let doc = Document::parse(r#"<x:xliff xmlns:x="urn:x"><x:file original="a"/></x:xliff>"#)
            .expect("Should parse");
        assert_eq!(doc.root().local_name(), "xliff");
        assert_eq!(doc.root().child("file").unwrap().name(), "x:file");
    }

    #[test]
    fn test_parse_cdata() {
        let doc = Document::parse("<root><source><![CDATA[a < b]]></source></root>").unwrap();
        assert_eq!(doc.root().child("source").unwrap().text(), "a < b");
    }

    #[test]
    fn test_parse_mismatched_end_tag_fails() {
        let result = Document::parse("<root><source></target></root>");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_unclosed_document_fails() {
        let result = Document::parse("<root><source>text</source>");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_empty_document_fails() {
        let err = Document::parse("   ").unwrap_err();
        assert!(err.to_string().contains("no root element"));
    }

    #[test]
    fn test_parse_multiple_roots_fails() {
        let err = Document::parse("<a/><b/>").unwrap_err();
        assert!(err.to_string().contains("multiple root elements"));
    }

    #[test]
    fn test_parse_text_outside_root_fails() {
        assert!(Document::parse("stray<root/>").is_err());
    }

    // ==================== Element Tests ====================

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut element = Element::new("file");
        element.set_attr("original", "a");
        element.set_attr("target-language", "fr");
        element.set_attr("original", "b");
        assert_eq!(
            element.attributes(),
            &[
                ("original".to_string(), "b".to_string()),
                ("target-language".to_string(), "fr".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_text_empty_leaves_no_children() {
        let mut element = Element::new("target");
        element.set_text("Bonjour");
        assert_eq!(element.text(), "Bonjour");
        element.set_text("");
        assert!(element.children().is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let doc = Document::parse(SAMPLE).unwrap();
        let mut copy = doc.clone();
        copy.root_mut().set_attr("version", "2.0");
        assert_eq!(doc.root().attr("version"), Some("1.2"));
        assert_eq!(copy.root().attr("version"), Some("2.0"));
    }
}
