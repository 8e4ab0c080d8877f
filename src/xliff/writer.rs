use crate::xliff::{Document, Element, Node, XML_DECLARATION};
use quick_xml::escape::partial_escape;

const INDENT: &str = "  ";

/// Elements whose whitespace-only content is a value, not indentation.
const TEXT_ELEMENTS: [&str; 3] = ["source", "target", "note"];

/// Serialize a document.
///
/// Structural elements (child elements and comments separated by ignorable
/// whitespace) are re-indented one level per depth. Elements that carry text
/// are written verbatim so translations keep their exact whitespace.
pub(crate) fn write_document(doc: &Document) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    for node in doc.prolog() {
        write_inline(node, &mut out);
        out.push('\n');
    }
    write_element(doc.root(), 0, &mut out);
    out.push('\n');
    out
}

fn write_element(element: &Element, depth: usize, out: &mut String) {
    write_start(element, out);
    if element.children().is_empty() || is_blank(element) {
        out.push_str("/>");
        return;
    }
    out.push('>');

    if is_structural(element) {
        for node in element.children() {
            if matches!(node, Node::Text(_)) {
                continue;
            }
            out.push('\n');
            push_indent(depth + 1, out);
            match node {
                Node::Element(child) => write_element(child, depth + 1, out),
                other => write_inline(other, out),
            }
        }
        out.push('\n');
        push_indent(depth, out);
    } else {
        for node in element.children() {
            write_inline(node, out);
        }
    }

    write_end(element, out);
}

fn write_inline(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&partial_escape(text)),
        Node::CData(text) => {
            out.push_str("<![CDATA[");
            out.push_str(text);
            out.push_str("]]>");
        }
        Node::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Node::Element(element) => {
            write_start(element, out);
            if element.children().is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in element.children() {
                    write_inline(child, out);
                }
                write_end(element, out);
            }
        }
    }
}

fn write_start(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(element.name());
    for (key, value) in element.attributes() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
}

fn write_end(element: &Element, out: &mut String) {
    out.push_str("</");
    out.push_str(element.name());
    out.push('>');
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Only child elements/comments, separated by whitespace.
fn is_structural(element: &Element) -> bool {
    let mut has_markup = false;
    for node in element.children() {
        match node {
            Node::Element(_) | Node::Comment(_) => has_markup = true,
            Node::Text(text) if text.trim().is_empty() => {}
            Node::Text(_) | Node::CData(_) => return false,
        }
    }
    has_markup
}

/// Only leftover indentation, in an element that doesn't carry text.
fn is_blank(element: &Element) -> bool {
    if TEXT_ELEMENTS.contains(&element.local_name())
        || element.attr("xml:space") == Some("preserve")
    {
        return false;
    }
    element
        .children()
        .iter()
        .all(|node| matches!(node, Node::Text(text) if text.trim().is_empty()))
}

fn escape_attribute(value: &str) -> String {
    partial_escape(value)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\t', "&#9;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_uses_double_quotes() {
        let doc = Document::parse("<?xml version='1.0' encoding='UTF-8'?><xliff/>").unwrap();
        let xml = doc.to_xml();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xliff/>"));
    }

    #[test]
    fn test_reindents_structural_elements() {
        let doc = Document::parse(
            r#"<xliff><file original="a"><body><trans-unit id="x"><source>Hi</source></trans-unit></body></file></xliff>"#,
        )
        .unwrap();
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff>
  <file original="a">
    <body>
      <trans-unit id="x">
        <source>Hi</source>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;
        assert_eq!(doc.to_xml(), expected);
    }

    #[test]
    fn test_normalizes_odd_indentation() {
        let doc = Document::parse("<a>\n\t\t<b>x</b>\n      <c/>\n</a>").unwrap();
        assert_eq!(
            doc.to_xml(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a>\n  <b>x</b>\n  <c/>\n</a>\n"
        );
    }

    #[test]
    fn test_collapses_whitespace_only_elements() {
        let doc = Document::parse(
            "<xliff>\n  <file original=\"a\">\n    <body>\n\t\t</body>\n  </file>\n</xliff>",
        )
        .unwrap();
        let first = doc.to_xml();
        assert_eq!(
            first,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xliff>\n  <file original=\"a\">\n    <body/>\n  </file>\n</xliff>\n"
        );
        assert_eq!(Document::parse(&first).unwrap().to_xml(), first);
    }

    #[test]
    fn test_whitespace_only_text_kept() {
        let doc = Document::parse("<a><target> </target><note>\n</note></a>").unwrap();
        let xml = doc.to_xml();
        assert!(xml.contains("<target> </target>"));
        assert!(xml.contains("<note>\n</note>"));
    }

    #[test]
    fn test_text_content_kept_verbatim() {
        let doc = Document::parse("<a><source>  two  spaces\n</source></a>").unwrap();
        assert!(doc.to_xml().contains("<source>  two  spaces\n</source>"));
    }

    #[test]
    fn test_mixed_content_written_inline() {
        let doc = Document::parse("<a><source>Hello <g id=\"1\">world</g>!</source></a>").unwrap();
        assert!(doc
            .to_xml()
            .contains("<source>Hello <g id=\"1\">world</g>!</source>"));
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let mut root = Element::new("note");
        root.set_attr("from", "a \"b\" & <c>");
        root.set_text("1 < 2 & 3 > 2");
        let xml = Document::new(root).to_xml();
        assert!(xml.contains(r#"from="a &quot;b&quot; &amp; &lt;c&gt;""#));
        assert!(xml.contains("1 &lt; 2 &amp; 3 &gt; 2"));
    }

    #[test]
    fn test_keeps_comments_on_their_own_line() {
        let doc = Document::parse("<a><!-- c --><b/></a>").unwrap();
        assert!(doc.to_xml().contains("<a>\n  <!-- c -->\n  <b/>\n</a>"));
    }

    #[test]
    fn test_serialization_is_a_fixed_point() {
        let doc = Document::parse(
            "<a x=\"1\">\n<b>  text </b><c><d>&amp;</d></c>\n<!--n--><e/></a>",
        )
        .unwrap();
        let first = doc.to_xml();
        let second = Document::parse(&first).unwrap().to_xml();
        assert_eq!(first, second);
    }
}
