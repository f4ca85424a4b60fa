use std::path::Path;
use std::time::Duration;

use crate::animation;
use crate::autoplay::Autoplay;
use crate::config::StartMode;
use crate::document::{Document, NodeId, Selector};
use crate::fullscreen::{self, FullscreenApi, FullscreenBackend, FullscreenManager};
use crate::input::{self, Command, Key, SwipeTracker};
use crate::markup::{self, WEBSITE_LINK_ID};
use crate::navigator::{ACTIVE, SlideNavigator, TransitionTimings, slide_id};
use crate::observer::{ANIM_ATTR, IntersectionEntry, ObserverController, RevealStyle};
use crate::parser::Deck;
use crate::performance::PerformanceController;
use crate::platform::Capabilities;
use crate::scheduler::{Task, TaskQueue};
use crate::store::{MemoryStore, Store};
use crate::theme::{self, Theme, ThemeManager, ThemePreference};

pub const PROGRESS_KEY: &str = "presentation-progress";

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub start: StartMode,
    /// Used when the store holds no theme yet.
    pub theme: Option<ThemePreference>,
    pub autoplay: Option<Duration>,
    pub timings: TransitionTimings,
}

/// Something only the frontend can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    OpenUrl(String),
    Quit,
}

pub struct Presentation {
    doc: Document,
    tasks: TaskQueue,
    store: Box<dyn Store>,
    nav: SlideNavigator,
    theme: ThemeManager,
    fullscreen: FullscreenManager,
    observer: ObserverController,
    performance: PerformanceController,
    autoplay: Option<Autoplay>,
    swipe: SwipeTracker,
    focused: Option<NodeId>,
    website: Option<String>,
    saved_progress: Option<usize>,
    hidden: bool,
    /// Without observers, reveal elements animate in when their slide opens.
    reveal_fallback: bool,
    revealed_slide: Option<usize>,
}

impl Presentation {
    pub fn new<F>(
        deck: &Deck,
        base: &Path,
        caps: &Capabilities,
        store: Box<dyn Store>,
        settings: Settings,
        connect: F,
    ) -> Self
    where
        F: FnOnce(FullscreenApi) -> Box<dyn FullscreenBackend>,
    {
        let (mut doc, hooks) = markup::render(deck, base);
        let mut store: Box<dyn Store> = if caps.storage {
            store
        } else {
            tracing::warn!("storage unavailable, preferences will not persist");
            Box::new(MemoryStore::new())
        };

        let total = doc.select_all(&Selector::class("slide")).len();
        let nav = SlideNavigator::new(total, settings.timings, hooks);
        nav.refresh_ui(&mut doc);

        let fallback = settings
            .theme
            .or_else(|| deck.meta.theme.as_deref().and_then(|t| t.parse().ok()));
        let theme = ThemeManager::new(&mut doc, store.as_mut(), fallback);
        let fullscreen = FullscreenManager::new(caps, connect, &mut doc);
        let observer = ObserverController::new(&doc, caps);
        let performance = PerformanceController::new(&mut doc, caps);

        let mut presentation = Self {
            doc,
            tasks: TaskQueue::new(),
            store,
            nav,
            theme,
            fullscreen,
            observer,
            performance,
            autoplay: None,
            swipe: SwipeTracker::default(),
            focused: None,
            website: deck.meta.website.clone(),
            saved_progress: None,
            hidden: false,
            reveal_fallback: !caps.intersection_observer,
            revealed_slide: None,
        };

        presentation
            .nav
            .replay_hooks(&mut presentation.doc, &mut presentation.tasks);
        presentation.start(settings.start);
        if let Some(interval) = settings.autoplay {
            let mut autoplay = Autoplay::new(interval);
            autoplay.start(&mut presentation.tasks);
            presentation.autoplay = Some(autoplay);
        }
        presentation.update_intersections();
        presentation.fallback_reveal();
        presentation
    }

    fn start(&mut self, mode: StartMode) {
        let total = self.nav.total();
        let target = match mode {
            StartMode::First => None,
            StartMode::Resume => self
                .store
                .get(PROGRESS_KEY)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&n| n > 1 && n <= total),
            StartMode::Slide(n) if n > total => {
                tracing::warn!("slide {n} out of range, deck has {total}");
                None
            }
            StartMode::Slide(n) => Some(n),
        };
        if let Some(target) = target {
            tracing::debug!(slide = target, "starting away from the first slide");
            self.nav.go(target, &mut self.doc, &mut self.tasks);
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn navigator(&self) -> &SlideNavigator {
        &self.nav
    }

    pub fn current(&self) -> usize {
        self.nav.current()
    }

    pub fn total(&self) -> usize {
        self.nav.total()
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme.current()
    }

    pub fn palette(&self) -> Theme {
        self.theme.palette()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_fullscreen()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether anything is still scheduled; the frontend keeps repainting
    /// until this turns false.
    pub fn is_busy(&self) -> bool {
        !self.tasks.is_idle()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.tasks.next_due()
    }

    pub fn now(&self) -> Duration {
        self.tasks.now()
    }

    pub fn active_slide(&self) -> Option<NodeId> {
        self.doc.by_id(&slide_id(self.nav.current()))
    }

    /// Run every task due by `elapsed`, then refresh visibility-driven state
    /// and persist progress.
    pub fn advance_to(&mut self, elapsed: Duration) {
        let before = self.nav.current();
        while let Some(task) = self.tasks.pop_due(elapsed) {
            match task {
                Task::Transition => self.nav.advance(&mut self.doc, &mut self.tasks),
                Task::Mutate(mutation) => mutation.apply(&mut self.doc, &mut self.tasks),
                Task::Autoplay => {
                    if let Some(autoplay) = self.autoplay.as_mut() {
                        autoplay.on_tick(&mut self.nav, &mut self.doc, &mut self.tasks);
                    }
                }
            }
        }
        self.tasks.settle(elapsed);
        if self.nav.current() != before {
            self.focused = None;
        }
        self.update_intersections();
        self.fallback_reveal();
        self.track_progress();
    }

    pub fn handle(&mut self, command: Command) -> Option<Request> {
        let doc = &mut self.doc;
        let tasks = &mut self.tasks;
        match command {
            Command::Next => {
                self.nav.next(doc, tasks);
            }
            Command::Prev => {
                self.nav.prev(doc, tasks);
            }
            Command::First => {
                self.nav.first(doc, tasks);
            }
            Command::Last => {
                self.nav.last(doc, tasks);
            }
            Command::GoTo(n) => {
                self.nav.go(n, doc, tasks);
            }
            Command::ToggleFullscreen => self.fullscreen.toggle_fullscreen(),
            Command::ToggleTheme => self.theme.toggle_theme(doc, self.store.as_mut()),
            Command::OpenWebsite => return self.website.clone().map(Request::OpenUrl),
            Command::Quit => return Some(Request::Quit),
        }
        None
    }

    pub fn key(&mut self, key: Key, shift: bool) -> Option<Request> {
        match key {
            Key::Tab => {
                self.move_focus(shift);
                None
            }
            Key::Enter => self
                .focused
                .filter(|&node| self.is_on_screen(node))
                .and_then(|node| self.click(node)),
            _ => input::command_for_key(key).and_then(|cmd| self.handle(cmd)),
        }
    }

    fn move_focus(&mut self, backwards: bool) {
        let Some(scope) = self.active_slide() else {
            return;
        };
        self.focused = input::trap_focus(&self.doc, scope, self.focused, backwards);
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.swipe.start(x, y);
    }

    pub fn touch_end(&mut self, x: f32, y: f32) -> Option<Request> {
        self.swipe.end(x, y).and_then(|cmd| self.handle(cmd))
    }

    pub fn touch_cancel(&mut self) {
        self.swipe.cancel();
    }

    /// Activate whatever control `node` belongs to.
    pub fn click(&mut self, node: NodeId) -> Option<Request> {
        let command = self.command_for_click(node)?;
        self.handle(command)
    }

    fn command_for_click(&self, node: NodeId) -> Option<Command> {
        let doc = &self.doc;
        if let Some(item) = doc.closest(node, &Selector::class("toc-item")) {
            return input::toc_target(doc, item).map(Command::GoTo);
        }
        if let Some(dot) = doc.closest(node, &Selector::class("dot")) {
            return input::toc_target(doc, dot).map(Command::GoTo);
        }
        for (class, command) in [("prev-btn", Command::Prev), ("next-btn", Command::Next)] {
            if let Some(button) = doc.closest(node, &Selector::class(class)) {
                return (!doc.get(button).disabled).then_some(command);
            }
        }
        let mut cursor = Some(node);
        while let Some(n) = cursor {
            match doc.get(n).id.as_deref() {
                Some(theme::TOGGLE_ID) => return Some(Command::ToggleTheme),
                Some(fullscreen::CONTROL_ID) => return Some(Command::ToggleFullscreen),
                Some(WEBSITE_LINK_ID) => return Some(Command::OpenWebsite),
                _ => {}
            }
            cursor = doc.get(n).parent();
        }
        None
    }

    /// The host entered or left fullscreen.
    pub fn fullscreen_changed(&mut self) {
        self.fullscreen.on_fullscreen_change(&mut self.doc);
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        if self.hidden == hidden {
            return;
        }
        self.hidden = hidden;
        self.observer.on_visibility_change(hidden, &mut self.doc);
        if let Some(autoplay) = self.autoplay.as_mut() {
            if hidden {
                autoplay.stop(&mut self.tasks);
            } else {
                autoplay.start(&mut self.tasks);
            }
        }
    }

    /// Report how long a frame took.
    pub fn record_frame(&self, duration: Duration) {
        self.performance.record_measure("frame", duration);
    }

    /// Everything outside the slides is always on screen; inside them only
    /// the active slide is.
    fn is_on_screen(&self, node: NodeId) -> bool {
        match self.doc.closest(node, &Selector::class("slide")) {
            Some(slide) => self.doc.get(slide).has_class(ACTIVE),
            None => true,
        }
    }

    fn update_intersections(&mut self) {
        if self.hidden {
            return;
        }
        let watched: Vec<NodeId> = self
            .observer
            .targets()
            .into_iter()
            .chain(self.performance.pending_images())
            .collect();
        if watched.is_empty() {
            return;
        }
        let entries: Vec<IntersectionEntry> = watched
            .into_iter()
            .map(|target| IntersectionEntry {
                target,
                ratio: if self.is_on_screen(target) { 1.0 } else { 0.0 },
            })
            .collect();
        self.observer.on_intersection(&entries, &mut self.doc);
        self.performance.on_intersection(&entries, &mut self.doc);
    }

    fn fallback_reveal(&mut self) {
        let current = self.nav.current();
        if !self.reveal_fallback || self.revealed_slide == Some(current) {
            return;
        }
        self.revealed_slide = Some(current);
        let Some(scope) = self.active_slide() else {
            return;
        };
        for node in self.doc.select_within(scope, &Selector::attr(ANIM_ATTR)) {
            let el = self.doc.get(node);
            let Some(style) = el.attr(ANIM_ATTR).and_then(RevealStyle::parse) else {
                continue;
            };
            if el.style("opacity") == Some("0") {
                animation::animate(
                    style.effect(),
                    node,
                    animation::DEFAULT_DURATION,
                    &mut self.doc,
                    &mut self.tasks,
                );
            }
        }
    }

    fn track_progress(&mut self) {
        let current = self.nav.current();
        if self.saved_progress == Some(current) {
            return;
        }
        self.saved_progress = Some(current);
        if let Err(e) = self.store.set(PROGRESS_KEY, &current.to_string()) {
            tracing::warn!("could not save progress: {e}");
        }
    }
}
