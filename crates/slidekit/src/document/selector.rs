use super::Element;

/// A compound selector: an optional tag, class and attribute test that must
/// all match the same element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    class: Option<String>,
    attr: Option<(String, Option<String>)>,
}

impl Selector {
    pub fn class(class: &str) -> Self {
        Self {
            class: Some(class.to_string()),
            ..Default::default()
        }
    }

    pub fn tag(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            ..Default::default()
        }
    }

    pub fn attr(name: &str) -> Self {
        Self {
            attr: Some((name.to_string(), None)),
            ..Default::default()
        }
    }

    pub fn attr_eq(name: &str, value: &str) -> Self {
        Self {
            attr: Some((name.to_string(), Some(value.to_string()))),
            ..Default::default()
        }
    }

    pub fn and_attr(mut self, name: &str) -> Self {
        self.attr = Some((name.to_string(), None));
        self
    }

    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(class) = &self.class {
            if !element.has_class(class) {
                return false;
            }
        }
        match &self.attr {
            Some((name, Some(value))) => element.attr(name) == Some(value.as_str()),
            Some((name, None)) => element.has_attr(name),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_and_attr() {
        let sel = Selector::tag("img").and_attr("data-src");
        assert!(sel.matches(&Element::new("img").with_attr("data-src", "a.png")));
        assert!(sel.matches(&Element::new("IMG").with_attr("data-src", "a.png")));
        assert!(!sel.matches(&Element::new("img")));
        assert!(!sel.matches(&Element::new("div").with_attr("data-src", "a.png")));
    }

    #[test]
    fn test_attr_value() {
        let sel = Selector::attr_eq("data-anim", "fade");
        assert!(sel.matches(&Element::new("p").with_attr("data-anim", "fade")));
        assert!(!sel.matches(&Element::new("p").with_attr("data-anim", "scale")));
        assert!(!sel.matches(&Element::new("p")));
    }

    #[test]
    fn test_class() {
        let sel = Selector::class("toc-item");
        assert!(sel.matches(&Element::new("a").with_class("toc-item")));
        assert!(!sel.matches(&Element::new("a").with_class("toc")));
    }
}
