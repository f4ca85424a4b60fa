use crate::document::{Document, NodeId};

/// Minimum horizontal travel for a swipe, in pixels.
pub const SWIPE_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Home,
    End,
    Escape,
    F11,
    Tab,
    Enter,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    First,
    Last,
    GoTo(usize),
    ToggleFullscreen,
    ToggleTheme,
    OpenWebsite,
    Quit,
}

/// Map a key press to a command. Returns `None` for keys the widget leaves
/// alone.
pub fn command_for_key(key: Key) -> Option<Command> {
    match key {
        Key::ArrowRight | Key::Space => Some(Command::Next),
        Key::ArrowLeft => Some(Command::Prev),
        Key::Home => Some(Command::First),
        Key::End => Some(Command::Last),
        Key::Escape | Key::F11 => Some(Command::ToggleFullscreen),
        Key::Char('d') | Key::Char('D') => Some(Command::ToggleTheme),
        Key::Char('w') | Key::Char('W') => Some(Command::OpenWebsite),
        Key::Char('q') | Key::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

/// Tracks one touch gesture from start to end.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn start(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    /// Finish the gesture. A dominant horizontal travel beyond the threshold
    /// navigates against the finger: moving left shows the next slide.
    pub fn end(&mut self, x: f32, y: f32) -> Option<Command> {
        let (start_x, start_y) = self.start.take()?;
        // A gesture starting on the exact origin counts as "no start".
        if start_x == 0.0 || start_y == 0.0 {
            return None;
        }
        let dx = start_x - x;
        let dy = start_y - y;
        if dx.abs() > dy.abs() && dx.abs() > SWIPE_THRESHOLD {
            Some(if dx > 0.0 { Command::Next } else { Command::Prev })
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

/// Read the target slide of a table-of-contents entry. Missing, malformed
/// or zero targets are ignored.
pub fn toc_target(doc: &Document, node: NodeId) -> Option<usize> {
    let value = doc.get(node).attr("data-slide")?;
    match value.trim().parse::<usize>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

fn is_focusable(doc: &Document, node: NodeId) -> bool {
    let el = doc.get(node);
    if let Some(tabindex) = el.attr("tabindex") {
        return tabindex.trim() != "-1";
    }
    match el.tag.as_str() {
        "button" | "input" | "select" | "textarea" => true,
        "a" => el.has_attr("href"),
        _ => false,
    }
}

/// Focusable elements of `scope` in document order.
pub fn focusable_within(doc: &Document, scope: NodeId) -> Vec<NodeId> {
    doc.descendants(scope)
        .into_iter()
        .filter(|&n| is_focusable(doc, n))
        .collect()
}

/// Where Tab (or Shift+Tab) moves focus, cycling inside `scope`.
pub fn trap_focus(
    doc: &Document,
    scope: NodeId,
    focused: Option<NodeId>,
    backwards: bool,
) -> Option<NodeId> {
    let focusable = focusable_within(doc, scope);
    let first = *focusable.first()?;
    let last = *focusable.last()?;
    let position = focused.and_then(|f| focusable.iter().position(|&n| n == f));
    Some(match (position, backwards) {
        (None, false) => first,
        (None, true) => last,
        (Some(i), false) => focusable.get(i + 1).copied().unwrap_or(first),
        (Some(0), true) => last,
        (Some(i), true) => focusable[i - 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for_key(Key::ArrowRight), Some(Command::Next));
        assert_eq!(command_for_key(Key::Space), Some(Command::Next));
        assert_eq!(command_for_key(Key::ArrowLeft), Some(Command::Prev));
        assert_eq!(command_for_key(Key::Home), Some(Command::First));
        assert_eq!(command_for_key(Key::End), Some(Command::Last));
        assert_eq!(command_for_key(Key::Escape), Some(Command::ToggleFullscreen));
        assert_eq!(command_for_key(Key::F11), Some(Command::ToggleFullscreen));
        assert_eq!(command_for_key(Key::Tab), None);
    }

    #[test]
    fn test_swipe_over_threshold_navigates_once() {
        let mut swipe = SwipeTracker::default();
        swipe.start(300.0, 200.0);
        assert_eq!(swipe.end(249.0, 190.0), Some(Command::Next));
        assert_eq!(swipe.end(249.0, 190.0), None);

        swipe.start(300.0, 200.0);
        assert_eq!(swipe.end(351.0, 210.0), Some(Command::Prev));
    }

    #[test]
    fn test_swipe_under_threshold_ignored() {
        let mut swipe = SwipeTracker::default();
        swipe.start(300.0, 200.0);
        assert_eq!(swipe.end(251.0, 200.0), None);
    }

    #[test]
    fn test_vertical_swipe_ignored() {
        let mut swipe = SwipeTracker::default();
        swipe.start(300.0, 400.0);
        assert_eq!(swipe.end(200.0, 200.0), None);
    }

    #[test]
    fn test_toc_target_parsing() {
        let mut doc = Document::new();
        let body = doc.body();
        let good = doc.append(body, Element::new("div").with_attr("data-slide", "4"));
        let zero = doc.append(body, Element::new("div").with_attr("data-slide", "0"));
        let junk = doc.append(body, Element::new("div").with_attr("data-slide", "x"));
        let none = doc.append(body, Element::new("div"));
        assert_eq!(toc_target(&doc, good), Some(4));
        assert_eq!(toc_target(&doc, zero), None);
        assert_eq!(toc_target(&doc, junk), None);
        assert_eq!(toc_target(&doc, none), None);
    }

    #[test]
    fn test_focus_trap_wraps() {
        let mut doc = Document::new();
        let slide = doc.append(doc.body(), Element::new("section"));
        let a = doc.append(slide, Element::new("button"));
        doc.append(slide, Element::new("a"));
        doc.append(slide, Element::new("div").with_attr("tabindex", "-1"));
        let b = doc.append(slide, Element::new("a").with_attr("href", "#"));
        let c = doc.append(slide, Element::new("div").with_attr("tabindex", "0"));

        assert_eq!(focusable_within(&doc, slide), vec![a, b, c]);
        assert_eq!(trap_focus(&doc, slide, Some(c), false), Some(a));
        assert_eq!(trap_focus(&doc, slide, Some(a), true), Some(c));
        assert_eq!(trap_focus(&doc, slide, Some(a), false), Some(b));
        assert_eq!(trap_focus(&doc, slide, None, false), Some(a));
    }

    #[test]
    fn test_focus_trap_without_focusables() {
        let mut doc = Document::new();
        let slide = doc.append(doc.body(), Element::new("section"));
        assert_eq!(trap_focus(&doc, slide, None, false), None);
    }
}
