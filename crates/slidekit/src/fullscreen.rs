use crate::document::Document;
use crate::platform::Capabilities;

pub const ICON_ID: &str = "fullscreenIcon";
pub const CONTROL_ID: &str = "copyrightBox";

const ICON_ENTER: &str = "fas fa-expand fullscreen-icon";
const ICON_EXIT: &str = "fas fa-compress fullscreen-icon";
const TITLE_ENTER: &str = "Enter fullscreen";
const TITLE_EXIT: &str = "Exit fullscreen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FullscreenApi {
    Standard,
    Webkit,
    Moz,
    Ms,
}

impl FullscreenApi {
    /// Probe order; the first available entry wins.
    pub const ALL: [FullscreenApi; 4] = [
        FullscreenApi::Standard,
        FullscreenApi::Webkit,
        FullscreenApi::Moz,
        FullscreenApi::Ms,
    ];

    pub fn resolve(available: &[FullscreenApi]) -> Option<FullscreenApi> {
        Self::ALL.into_iter().find(|api| available.contains(api))
    }

    pub fn request_method(self) -> &'static str {
        match self {
            FullscreenApi::Standard => "requestFullscreen",
            FullscreenApi::Webkit => "webkitRequestFullscreen",
            FullscreenApi::Moz => "mozRequestFullScreen",
            FullscreenApi::Ms => "msRequestFullscreen",
        }
    }

    pub fn exit_method(self) -> &'static str {
        match self {
            FullscreenApi::Standard => "exitFullscreen",
            FullscreenApi::Webkit => "webkitExitFullscreen",
            FullscreenApi::Moz => "mozCancelFullScreen",
            FullscreenApi::Ms => "msExitFullscreen",
        }
    }
}

pub trait FullscreenBackend {
    /// Ask the host to make the root element fullscreen.
    fn request(&mut self) -> anyhow::Result<()>;

    fn exit(&mut self);

    /// Whether the host currently reports a fullscreen element.
    fn is_active(&self) -> bool;
}

pub struct FullscreenManager {
    backend: Option<(FullscreenApi, Box<dyn FullscreenBackend>)>,
    is_fullscreen: bool,
}

impl FullscreenManager {
    /// Resolve the fullscreen API from `caps` and build its backend with
    /// `connect`. Without any API the manager stays inert.
    pub fn new<F>(caps: &Capabilities, connect: F, doc: &mut Document) -> Self
    where
        F: FnOnce(FullscreenApi) -> Box<dyn FullscreenBackend>,
    {
        let backend = match FullscreenApi::resolve(&caps.fullscreen_apis) {
            Some(api) => {
                tracing::debug!(api = api.request_method(), "fullscreen api resolved");
                Some((api, connect(api)))
            }
            None => {
                tracing::warn!("no fullscreen api available, toggle disabled");
                None
            }
        };
        let mut manager = Self {
            backend,
            is_fullscreen: false,
        };
        manager.on_fullscreen_change(doc);
        manager
    }

    pub fn api(&self) -> Option<FullscreenApi> {
        self.backend.as_ref().map(|(api, _)| *api)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn toggle_fullscreen(&mut self) {
        let entering = !self.is_fullscreen;
        let Some((api, backend)) = self.backend.as_mut() else {
            return;
        };
        if entering {
            if let Err(e) = backend.request() {
                tracing::warn!("{} failed: {e}", api.request_method());
            }
        } else {
            backend.exit();
        }
    }

    /// Host reported a fullscreen change; recompute state and reflect it in
    /// the icon and the control's title.
    pub fn on_fullscreen_change(&mut self, doc: &mut Document) {
        self.is_fullscreen = self
            .backend
            .as_ref()
            .is_some_and(|(_, backend)| backend.is_active());

        if let Some(icon) = doc.by_id_mut(ICON_ID) {
            icon.set_class_name(if self.is_fullscreen { ICON_EXIT } else { ICON_ENTER });
        }
        if let Some(control) = doc.by_id_mut(CONTROL_ID) {
            control.title = if self.is_fullscreen { TITLE_EXIT } else { TITLE_ENTER }.to_string();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::document::Element;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Backend that flips a shared flag, optionally refusing requests.
    pub struct FakeBackend {
        pub active: Rc<Cell<bool>>,
        pub refuse: bool,
    }

    impl FullscreenBackend for FakeBackend {
        fn request(&mut self) -> anyhow::Result<()> {
            if self.refuse {
                anyhow::bail!("permission denied");
            }
            self.active.set(true);
            Ok(())
        }

        fn exit(&mut self) {
            self.active.set(false);
        }

        fn is_active(&self) -> bool {
            self.active.get()
        }
    }

    fn doc() -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        let control = doc.append(body, Element::new("div").with_id(CONTROL_ID));
        doc.append(control, Element::new("i").with_id(ICON_ID));
        doc
    }

    #[test]
    fn test_resolve_first_match_wins() {
        use FullscreenApi::*;
        assert_eq!(FullscreenApi::resolve(&[Ms, Moz]), Some(Moz));
        assert_eq!(FullscreenApi::resolve(&[Ms, Webkit, Standard]), Some(Standard));
        assert_eq!(FullscreenApi::resolve(&[]), None);
    }

    #[test]
    fn test_toggle_and_change_updates_icon_and_title() {
        let mut doc = doc();
        let active = Rc::new(Cell::new(false));
        let shared = active.clone();
        let mut fs = FullscreenManager::new(
            &Capabilities::default(),
            move |_| {
                Box::new(FakeBackend {
                    active: shared,
                    refuse: false,
                })
            },
            &mut doc,
        );
        let icon = doc.by_id(ICON_ID).unwrap();
        assert_eq!(doc.get(icon).class_name(), ICON_ENTER);

        fs.toggle_fullscreen();
        assert!(active.get());
        fs.on_fullscreen_change(&mut doc);
        assert!(fs.is_fullscreen());
        assert_eq!(doc.get(icon).class_name(), ICON_EXIT);
        let control = doc.by_id(CONTROL_ID).unwrap();
        assert_eq!(doc.get(control).title, TITLE_EXIT);

        fs.toggle_fullscreen();
        fs.on_fullscreen_change(&mut doc);
        assert!(!fs.is_fullscreen());
        assert_eq!(doc.get(control).title, TITLE_ENTER);
    }

    #[test]
    fn test_refused_request_is_swallowed() {
        let mut doc = doc();
        let active = Rc::new(Cell::new(false));
        let shared = active.clone();
        let mut fs = FullscreenManager::new(
            &Capabilities::default(),
            move |_| {
                Box::new(FakeBackend {
                    active: shared,
                    refuse: true,
                })
            },
            &mut doc,
        );
        fs.toggle_fullscreen();
        fs.on_fullscreen_change(&mut doc);
        assert!(!fs.is_fullscreen());
    }

    #[test]
    fn test_without_api_is_inert() {
        let mut doc = doc();
        let mut fs = FullscreenManager::new(
            &Capabilities::minimal(),
            |_| -> Box<dyn FullscreenBackend> { unreachable!("no api to connect") },
            &mut doc,
        );
        assert_eq!(fs.api(), None);
        fs.toggle_fullscreen();
        assert!(!fs.is_fullscreen());
    }
}
