use crate::xliff::document::local_part;
use crate::xliff::{Document, Element, Node};

const FILE: &str = "file";
const TRANS_UNIT: &str = "trans-unit";
const SOURCE: &str = "source";
const TARGET: &str = "target";
const NOTE: &str = "note";
const XML_SPACE: &str = "xml:space";

/// Read-only view of a `<trans-unit>` and the file group containing it.
#[derive(Debug, Clone, Copy)]
pub struct TransUnit<'a> {
    original: Option<&'a str>,
    element: &'a Element,
}

impl<'a> TransUnit<'a> {
    /// `original` attribute of the enclosing `<file>`.
    pub fn original(&self) -> Option<&'a str> {
        self.original
    }

    pub fn id(&self) -> Option<&'a str> {
        self.element.attr("id")
    }

    /// Source text; `None` when the unit has no `<source>` element.
    pub fn source(&self) -> Option<String> {
        self.element.child(SOURCE).map(Element::text)
    }

    /// Target text; `None` means untranslated.
    pub fn target(&self) -> Option<String> {
        self.element.child(TARGET).map(Element::text)
    }

    pub fn note(&self) -> Option<String> {
        self.element.child(NOTE).map(Element::text)
    }

    pub fn preserves_space(&self) -> bool {
        self.element.attr(XML_SPACE) == Some("preserve")
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }
}

/// Mutable handle on a `<trans-unit>`.
#[derive(Debug)]
pub struct UnitMut<'a> {
    original: Option<&'a str>,
    element: &'a mut Element,
}

impl UnitMut<'_> {
    pub fn view(&self) -> TransUnit<'_> {
        TransUnit {
            original: self.original,
            element: &*self.element,
        }
    }

    /// Mark the unit as whitespace-sensitive (`xml:space="preserve"`).
    pub fn preserve_space(&mut self) {
        self.element.set_attr(XML_SPACE, "preserve");
    }

    /// Set the text of every `<target>`, creating one right after `<source>` if needed.
    pub fn set_target(&mut self, text: &str) {
        let mut found = false;
        for target in self
            .element
            .elements_mut()
            .filter(|e| e.local_name() == TARGET)
        {
            target.set_text(text);
            found = true;
        }
        if found {
            return;
        }

        let mut target = Element::new(sibling_name(self.element.name(), TARGET));
        target.set_text(text);
        let position = self
            .element
            .children()
            .iter()
            .position(|node| matches!(node, Node::Element(e) if e.local_name() == SOURCE))
            .map(|index| index + 1)
            .unwrap_or(self.element.children().len());
        self.element
            .children_mut()
            .insert(position, Node::Element(target));
    }

    /// Use the source text as translation. Returns `false` when there is no `<source>`.
    pub fn copy_source_to_target(&mut self) -> bool {
        let Some(source) = self.view().source() else {
            return false;
        };
        self.set_target(&source);
        true
    }

    /// Remove every `<target>`; returns how many were removed.
    pub fn remove_targets(&mut self) -> usize {
        let children = self.element.children_mut();
        let before = children.len();
        children.retain(|node| !matches!(node, Node::Element(e) if e.local_name() == TARGET));
        before - children.len()
    }
}

/// Name for a new child, reusing the parent's namespace prefix.
fn sibling_name(parent: &str, local: &str) -> String {
    match parent.len() - local_part(parent).len() {
        0 => local.to_string(),
        prefix_len => format!("{}{}", &parent[..prefix_len], local),
    }
}

impl Document {
    /// All translation units in document order.
    pub fn units(&self) -> Vec<TransUnit<'_>> {
        let mut units = Vec::new();
        collect_units(self.root(), None, &mut units);
        units
    }

    /// Visit every translation unit mutably, in document order.
    pub fn for_each_unit_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(UnitMut<'_>),
    {
        visit_units_mut(self.root_mut(), None, &mut visit);
    }

    /// Visit every `<file>` group mutably.
    pub fn for_each_file_group_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Element),
    {
        visit_files_mut(self.root_mut(), &mut visit);
    }
}

fn collect_units<'a>(element: &'a Element, original: Option<&'a str>, out: &mut Vec<TransUnit<'a>>) {
    let original = if element.local_name() == FILE {
        element.attr("original")
    } else {
        original
    };
    if element.local_name() == TRANS_UNIT {
        out.push(TransUnit { original, element });
        return;
    }
    for child in element.elements() {
        collect_units(child, original, out);
    }
}

fn visit_units_mut<F>(element: &mut Element, original: Option<&str>, visit: &mut F)
where
    F: FnMut(UnitMut<'_>),
{
    if element.local_name() == TRANS_UNIT {
        visit(UnitMut { original, element });
        return;
    }
    let own_original = if element.local_name() == FILE {
        element.attr("original").map(str::to_owned)
    } else {
        None
    };
    let original = own_original.as_deref().or(original);
    for child in element.elements_mut() {
        visit_units_mut(child, original, visit);
    }
}

fn visit_files_mut<F>(element: &mut Element, visit: &mut F)
where
    F: FnMut(&mut Element),
{
    if element.local_name() == FILE {
        visit(element);
    }
    for child in element.elements_mut() {
        visit_files_mut(child, visit);
    }
}
