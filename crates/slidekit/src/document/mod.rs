pub mod selector;

use std::collections::{BTreeMap, HashMap};

pub use selector::Selector;

/// Handle to an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub text: String,
    pub title: String,
    pub disabled: bool,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.set_style(property, value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Add `class` when `on` is true, remove it otherwise.
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// The space separated class list, like `className`.
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    /// Replace the whole class list from a space separated string.
    pub fn set_class_name(&mut self, value: &str) {
        self.classes.clear();
        for class in value.split_whitespace() {
            self.add_class(class);
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.remove(name);
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, property: &str, value: &str) {
        self.style.insert(property.to_string(), value.to_string());
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Built once by [`crate::markup::render`]; never structurally changed after.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    ids: HashMap<String, NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only `<html>` and `<body>`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Element::new("html")],
            ids: HashMap::new(),
        };
        doc.append(doc.root(), Element::new("body"));
        doc
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn body(&self) -> NodeId {
        NodeId(1)
    }

    /// Append `element` as the last child of `parent`.
    ///
    /// Only the markup builder adds nodes; once the document is handed to the
    /// controllers its shape is fixed.
    pub fn append(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        element.parent = Some(parent);
        element.children.clear();
        if let Some(key) = &element.id {
            self.ids.insert(key.clone(), id);
        }
        self.nodes.push(element);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    pub fn get_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.nodes[node.0]
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Mutable access to the element with the given id, if present.
    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        let node = self.by_id(id)?;
        Some(self.get_mut(node))
    }

    /// All nodes below `scope` (excluding `scope` itself) in document order.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.get(scope).children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.get(node).children.iter().rev().copied());
        }
        out
    }

    pub fn select_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.select_within(self.root(), selector)
    }

    pub fn select_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| selector.matches(self.get(n)))
            .collect()
    }

    pub fn select_first(&self, selector: &Selector) -> Option<NodeId> {
        self.select_all(selector).into_iter().next()
    }

    /// `node` itself or its nearest ancestor matching `selector`.
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(n) = cursor {
            if selector.matches(self.get(n)) {
                return Some(n);
            }
            cursor = self.get(n).parent;
        }
        None
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = self.get(node).text.clone();
        for child in self.descendants(node) {
            text.push_str(&self.get(child).text);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        let slide = doc.append(
            body,
            Element::new("section").with_id("slide-1").with_class("slide"),
        );
        doc.append(slide, Element::new("h1").with_text("Hello"));
        doc.append(
            slide,
            Element::new("li")
                .with_attr("data-animate", "")
                .with_text("one"),
        );
        doc.append(body, Element::new("button").with_class("next-btn"));
        doc
    }

    #[test]
    fn test_lookup_by_id() {
        let doc = sample();
        let slide = doc.by_id("slide-1").unwrap();
        assert!(doc.get(slide).has_class("slide"));
        assert!(doc.by_id("slide-2").is_none());
    }

    #[test]
    fn test_class_list_is_a_set() {
        let mut el = Element::new("div");
        el.add_class("active");
        el.add_class("active");
        assert_eq!(el.class_name(), "active");
        el.toggle_class("active", false);
        assert!(!el.has_class("active"));
    }

    #[test]
    fn test_set_class_name_replaces_everything() {
        let mut el = Element::new("i").with_class("old");
        el.set_class_name("fas fa-moon");
        assert_eq!(el.class_name(), "fas fa-moon");
        assert!(!el.has_class("old"));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let doc = sample();
        let tags: Vec<&str> = doc
            .descendants(doc.root())
            .into_iter()
            .map(|n| doc.get(n).tag.as_str())
            .collect();
        assert_eq!(tags, vec!["body", "section", "h1", "li", "button"]);
    }

    #[test]
    fn test_closest_walks_up() {
        let doc = sample();
        let li = doc.select_first(&Selector::attr("data-animate")).unwrap();
        let slide = doc.closest(li, &Selector::class("slide")).unwrap();
        assert_eq!(doc.by_id("slide-1"), Some(slide));
    }

    #[test]
    fn test_text_content() {
        let doc = sample();
        let slide = doc.by_id("slide-1").unwrap();
        assert_eq!(doc.text_content(slide), "Helloone");
    }
}
