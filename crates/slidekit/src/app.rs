use eframe::egui;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::{Config, StartMode};
use crate::document::{Document, Element, NodeId, Selector};
use crate::fullscreen::{self, FullscreenBackend};
use crate::hooks::{ANIMATE_ATTR, ANIMATED_CLASS};
use crate::input::Key;
use crate::markup::WEBSITE_LINK_ID;
use crate::navigator::{ACTIVE, TransitionTimings};
use crate::parser;
use crate::platform::Capabilities;
use crate::presentation::{Presentation, Request, Settings};
use crate::store;
use crate::theme::{self, Theme};

const DRAG_THRESHOLD: f32 = 5.0;
const SLIDE_FADE: f32 = 0.5;
const ELEMENT_FADE: f32 = 0.6;
const SLIDE_TRAVEL: f32 = 120.0;

/// Fullscreen through the native viewport.
struct ViewportFullscreen {
    ctx: egui::Context,
}

impl FullscreenBackend for ViewportFullscreen {
    fn request(&mut self) -> anyhow::Result<()> {
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Fullscreen(true));
        Ok(())
    }

    fn exit(&mut self) {
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Fullscreen(false));
    }

    fn is_active(&self) -> bool {
        self.ctx
            .input(|i| i.viewport().fullscreen.unwrap_or(false))
    }
}

/// Decoded images keyed by path; failures are remembered so they are only
/// reported once.
#[derive(Default)]
struct TextureCache {
    textures: HashMap<String, Option<egui::TextureHandle>>,
}

impl TextureCache {
    fn get(&mut self, ctx: &egui::Context, path: &str) -> Option<&egui::TextureHandle> {
        self.textures
            .entry(path.to_string())
            .or_insert_with(|| match load_texture(ctx, path) {
                Ok(texture) => Some(texture),
                Err(e) => {
                    tracing::warn!("could not load image {path}: {e}");
                    None
                }
            })
            .as_ref()
    }
}

fn load_texture(ctx: &egui::Context, path: &str) -> anyhow::Result<egui::TextureHandle> {
    let image = image::open(path)?.into_rgba8();
    let (w, h) = image.dimensions();
    let color = egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &image.into_raw());
    Ok(ctx.load_texture(path, color, egui::TextureOptions::LINEAR))
}

struct PresentationApp {
    presentation: Presentation,
    start: Instant,
    textures: TextureCache,
    /// Clickable areas from the last painted frame, topmost last.
    hits: Vec<(egui::Rect, NodeId)>,
    press: Option<egui::Pos2>,
}

impl PresentationApp {
    fn new(presentation: Presentation) -> Self {
        Self {
            presentation,
            start: Instant::now(),
            textures: TextureCache::default(),
            hits: Vec::new(),
            press: None,
        }
    }

    fn hit_test(&self, pos: egui::Pos2) -> Option<NodeId> {
        self.hits
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, node)| *node)
    }

    fn apply(&self, ctx: &egui::Context, request: Option<Request>) {
        match request {
            Some(Request::OpenUrl(url)) => ctx.open_url(egui::OpenUrl::new_tab(url)),
            Some(Request::Quit) => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            None => {}
        }
    }

    fn handle_pointer(&mut self, ctx: &egui::Context) -> Option<Request> {
        let (pressed, released, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        let pos = pos?;
        if pressed {
            self.press = Some(pos);
            self.presentation.touch_start(pos.x, pos.y);
        }
        if !released {
            return None;
        }
        let origin = self.press.take()?;
        if origin.distance(pos) < DRAG_THRESHOLD {
            self.presentation.touch_cancel();
            let node = self.hit_test(pos)?;
            self.presentation.click(node)
        } else {
            self.presentation.touch_end(pos.x, pos.y)
        }
    }
}

fn map_key(key: egui::Key) -> Option<Key> {
    Some(match key {
        egui::Key::ArrowLeft => Key::ArrowLeft,
        egui::Key::ArrowRight => Key::ArrowRight,
        egui::Key::Space => Key::Space,
        egui::Key::Home => Key::Home,
        egui::Key::End => Key::End,
        egui::Key::Escape => Key::Escape,
        egui::Key::F11 => Key::F11,
        egui::Key::Tab => Key::Tab,
        egui::Key::Enter => Key::Enter,
        egui::Key::D => Key::Char('d'),
        egui::Key::W => Key::Char('w'),
        egui::Key::Q => Key::Char('q'),
        _ => return None,
    })
}

/// Held arrows and space keep navigating; the transition guard rate-limits them.
fn repeats(key: Key) -> bool {
    matches!(key, Key::ArrowLeft | Key::ArrowRight | Key::Space)
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let frame_start = Instant::now();

        // Collect first, act after: sending viewport commands inside
        // ctx.input() deadlocks.
        let mut keys: Vec<(Key, bool)> = Vec::new();
        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    repeat,
                    modifiers,
                    ..
                } = event
                {
                    if let Some(key) = map_key(*key) {
                        if !*repeat || repeats(key) {
                            keys.push((key, modifiers.shift));
                        }
                    }
                }
            }
        });
        for (key, shift) in keys {
            let request = self.presentation.key(key, shift);
            self.apply(ctx, request);
        }
        let request = self.handle_pointer(ctx);
        self.apply(ctx, request);

        let (fullscreen, minimized) = ctx.input(|i| {
            (
                i.viewport().fullscreen.unwrap_or(false),
                i.viewport().minimized.unwrap_or(false),
            )
        });
        if fullscreen != self.presentation.is_fullscreen() {
            self.presentation.fullscreen_changed();
        }
        self.presentation.set_hidden(minimized);

        self.presentation.advance_to(self.start.elapsed());

        let palette = self.presentation.palette();
        let doc = self.presentation.document();
        let motion = if doc.get(doc.body()).has_class("reduced-motion") {
            0.0
        } else {
            1.0
        };
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(palette.background).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let mut canvas = Canvas {
                    ui,
                    doc,
                    theme: &palette,
                    textures: &mut self.textures,
                    hits: Vec::new(),
                    scale: compute_scale(rect),
                    motion,
                };
                canvas.draw(rect);
                if let Some(focused) = self.presentation.focused() {
                    canvas.draw_focus(focused);
                }
                self.hits = canvas.hits;
            });

        if let Some(due) = self.presentation.next_due() {
            let wait = due.saturating_sub(self.presentation.now());
            ctx.request_repaint_after(wait);
        }

        self.presentation.record_frame(frame_start.elapsed());
    }
}

fn compute_scale(rect: egui::Rect) -> f32 {
    let ref_w = 1920.0;
    let ref_h = 1080.0;
    (rect.width() / ref_w).min(rect.height() / ref_h)
}

/// Paints the document for one frame and records where the controls went.
struct Canvas<'a> {
    ui: &'a egui::Ui,
    doc: &'a Document,
    theme: &'a Theme,
    textures: &'a mut TextureCache,
    hits: Vec<(egui::Rect, NodeId)>,
    scale: f32,
    /// 0 when the user asked for reduced motion.
    motion: f32,
}

impl Canvas<'_> {
    fn draw(&mut self, rect: egui::Rect) {
        for slide in self.doc.select_all(&Selector::class("slide")) {
            self.draw_slide(slide, rect);
        }
        self.draw_chrome(rect);
    }

    fn animate(&self, key: (&str, usize), target: f32, seconds: f32) -> f32 {
        self.ui.ctx().animate_value_with_time(
            egui::Id::new(key),
            target,
            seconds * self.motion,
        )
    }

    fn draw_slide(&mut self, slide: NodeId, rect: egui::Rect) {
        let el = self.doc.get(slide);
        let exiting = el.has_class("exit-right") || el.has_class("exit-left");
        let target = if el.has_class(ACTIVE) && !exiting { 1.0 } else { 0.0 };
        let opacity = self.animate(("slide", slide.index()), target, SLIDE_FADE);
        if opacity <= 0.001 {
            return;
        }

        let direction = if el.has_class("exit-right") || el.has_class("from-left") {
            -1.0
        } else if el.has_class("exit-left") || el.has_class("from-right") {
            1.0
        } else {
            0.0
        };
        let offset = direction * (1.0 - opacity) * SLIDE_TRAVEL * self.scale;
        let content = rect
            .shrink2(egui::vec2(160.0, 120.0) * self.scale)
            .translate(egui::vec2(offset, 0.0));

        let mut y = content.top();
        for &child in el.children() {
            y = self.draw_block(child, content, y, opacity);
        }
    }

    /// Paint one slide-level element at `y`; returns the next free `y`.
    fn draw_block(&mut self, node: NodeId, area: egui::Rect, y: f32, parent_alpha: f32) -> f32 {
        let el = self.doc.get(node);
        let (alpha, shift, zoom) = self.element_visual(node, el);
        let alpha = alpha * parent_alpha;
        let left = area.left() + shift.x;
        let top = y + shift.y;
        let gap = 24.0 * self.scale;

        let width = area.width();
        let body = self.theme.body_size * zoom;
        match el.tag.as_str() {
            "h1" => {
                let size = self.theme.h1_size * 0.8 * zoom;
                self.text(&el.text, left, top, width, size, self.theme.heading_color, alpha) + gap * 1.5
            }
            "h2" => self.text(&el.text, left, top, width, body * 1.1, self.theme.accent, alpha) + gap,
            "p" => self.text(&el.text, left, top, width, body, self.theme.foreground, alpha) + gap,
            "li" => {
                let bullet = format!("\u{2022}  {}", el.text);
                self.text(&bullet, left, top, width, body, self.theme.foreground, alpha) + gap * 0.5
            }
            "img" => self.image(el, egui::pos2(left, top), area, alpha) + gap,
            "nav" => self.toc(node, area, top, alpha),
            _ => y,
        }
    }

    /// Opacity, offset and zoom an element currently eases towards.
    fn element_visual(&self, node: NodeId, el: &Element) -> (f32, egui::Vec2, f32) {
        let mut target = el.style("opacity").and_then(parse_opacity).unwrap_or(1.0);
        if el.has_attr(ANIMATE_ATTR) && !el.has_class(ANIMATED_CLASS) {
            target = 0.0;
        }
        let (shift, zoom) = el
            .style("transform")
            .map(parse_transform)
            .unwrap_or((egui::Vec2::ZERO, 1.0));
        let i = node.index();
        let alpha = self.animate(("alpha", i), target, ELEMENT_FADE);
        let x = self.animate(("dx", i), shift.x, ELEMENT_FADE);
        let y = self.animate(("dy", i), shift.y, ELEMENT_FADE);
        let zoom = self.animate(("zoom", i), zoom, ELEMENT_FADE);
        (alpha, egui::vec2(x, y) * self.scale, zoom)
    }

    #[allow(clippy::too_many_arguments)]
    fn text(&self, text: &str, x: f32, y: f32, width: f32, size: f32, color: egui::Color32, alpha: f32) -> f32 {
        let color = Theme::with_opacity(color, alpha);
        let galley = self.ui.painter().layout(
            text.to_string(),
            egui::FontId::proportional(size * self.scale),
            color,
            width,
        );
        let height = galley.rect.height();
        self.ui.painter().galley(egui::pos2(x, y), galley, color);
        y + height
    }

    fn image(&mut self, el: &Element, pos: egui::Pos2, area: egui::Rect, alpha: f32) -> f32 {
        let max = egui::vec2(area.width(), area.height() * 0.5);
        let src = el.attr("src").unwrap_or_default();
        let tint = Theme::with_opacity(egui::Color32::WHITE, alpha);
        if !src.is_empty() {
            if let Some(texture) = self.textures.get(self.ui.ctx(), src) {
                let size = texture.size_vec2();
                let fit = (max.x / size.x).min(max.y / size.y).min(1.0);
                let rect = egui::Rect::from_min_size(pos, size * fit);
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                self.ui.painter().image(texture.id(), rect, uv, tint);
                return rect.bottom();
            }
        }
        // Placeholder until the real source is swapped in or when it fails.
        let rect = egui::Rect::from_min_size(pos, egui::vec2(max.x * 0.5, max.y * 0.6));
        self.ui.painter().rect_filled(
            rect,
            8.0 * self.scale,
            Theme::with_opacity(self.theme.surface, alpha),
        );
        let alt = el.attr("alt").unwrap_or_default();
        self.text(alt, rect.left() + 16.0 * self.scale, rect.center().y, rect.width(), 18.0, self.theme.foreground, alpha * 0.6);
        rect.bottom()
    }

    fn toc(&mut self, nav: NodeId, area: egui::Rect, y: f32, alpha: f32) -> f32 {
        let mut y = y;
        for item in self.doc.select_within(nav, &Selector::class("toc-item")) {
            let label = &self.doc.get(item).text;
            let color = Theme::with_opacity(self.theme.accent, alpha);
            let galley = self.ui.painter().layout(
                label.clone(),
                egui::FontId::proportional(self.theme.body_size * 0.9 * self.scale),
                color,
                area.width(),
            );
            let pad = egui::vec2(20.0, 10.0) * self.scale;
            let rect = egui::Rect::from_min_size(
                egui::pos2(area.left(), y),
                galley.rect.size() + pad * 2.0,
            );
            self.ui.painter().rect_filled(
                rect,
                8.0 * self.scale,
                Theme::with_opacity(self.theme.surface, alpha),
            );
            self.ui.painter().galley(rect.min + pad, galley, color);
            if alpha > 0.5 {
                self.hits.push((rect, item));
            }
            y = rect.bottom() + 12.0 * self.scale;
        }
        y + 12.0 * self.scale
    }

    fn draw_chrome(&mut self, rect: egui::Rect) {
        let s = self.scale;
        let muted = Theme::with_opacity(self.theme.foreground, 0.4);

        // Progress bar
        if let Some(fill) = self.doc.by_id("progressBarFill") {
            let target = self
                .doc
                .get(fill)
                .style("width")
                .and_then(parse_percent)
                .unwrap_or(0.0);
            let width = self.animate(("progress", 0), target, SLIDE_FADE);
            let track = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), 6.0 * s));
            self.ui
                .painter()
                .rect_filled(track, 0.0, Theme::with_opacity(self.theme.surface, 0.8));
            let filled = egui::Rect::from_min_size(
                rect.min,
                egui::vec2(rect.width() * width / 100.0, 6.0 * s),
            );
            self.ui.painter().rect_filled(filled, 0.0, self.theme.accent);
        }
        if let Some(pct) = self.doc.by_id("progressPercentage") {
            let text = &self.doc.get(pct).text;
            self.label(text, egui::pos2(rect.left() + 16.0 * s, rect.top() + 16.0 * s), 14.0, muted);
        }

        // Slide counter
        let current = self.text_of("current-slide");
        let total = self.text_of("total-slides");
        let counter = format!("{current} / {total}");
        let galley = self.ui.painter().layout_no_wrap(
            counter,
            egui::FontId::monospace(14.0 * s),
            muted,
        );
        let pos = egui::pos2(
            rect.right() - galley.rect.width() - 16.0 * s,
            rect.bottom() - 30.0 * s,
        );
        self.ui.painter().galley(pos, galley, muted);

        self.draw_navigation(rect);
        self.draw_controls(rect);
    }

    fn draw_navigation(&mut self, rect: egui::Rect) {
        let s = self.scale;
        let dots = self.doc.select_all(&Selector::class("dot"));
        let spacing = 22.0 * s;
        let radius = 6.0 * s;
        let button = egui::vec2(44.0, 44.0) * s;
        let width = dots.len() as f32 * spacing + 2.0 * (button.x + 16.0 * s);
        let y = rect.bottom() - 50.0 * s;
        let mut x = rect.center().x - width / 2.0;

        let draw_button = |canvas: &mut Self, class: &str, x: f32| {
            let Some(node) = canvas.doc.select_first(&Selector::class(class)) else {
                return;
            };
            let el = canvas.doc.get(node);
            let area = egui::Rect::from_center_size(egui::pos2(x + button.x / 2.0, y), button);
            let alpha = if el.disabled { 0.25 } else { 0.9 };
            canvas.ui.painter().circle_filled(
                area.center(),
                button.x / 2.0,
                Theme::with_opacity(canvas.theme.surface, alpha),
            );
            let galley = canvas.ui.painter().layout_no_wrap(
                el.text.clone(),
                egui::FontId::proportional(22.0 * s),
                Theme::with_opacity(canvas.theme.foreground, alpha),
            );
            let pos = area.center() - galley.rect.size() / 2.0;
            canvas.ui.painter().galley(pos, galley, canvas.theme.foreground);
            if let Some(label) = el.attr("aria-label") {
                let id = egui::Id::new(("nav-button", node.index()));
                canvas.ui.interact(area, id, egui::Sense::hover()).on_hover_text(label);
            }
            canvas.hits.push((area, node));
        };

        draw_button(self, "prev-btn", x);
        x += button.x + 16.0 * s;
        for dot in dots {
            let center = egui::pos2(x + spacing / 2.0, y);
            let active = self.doc.get(dot).has_class(ACTIVE);
            let color = if active {
                self.theme.accent
            } else {
                Theme::with_opacity(self.theme.foreground, 0.3)
            };
            self.ui.painter().circle_filled(center, radius, color);
            self.hits.push((
                egui::Rect::from_center_size(center, egui::vec2(spacing, spacing)),
                dot,
            ));
            x += spacing;
        }
        x += 16.0 * s;
        draw_button(self, "next-btn", x);
    }

    fn draw_controls(&mut self, rect: egui::Rect) {
        let s = self.scale;

        if let Some(toggle) = self.doc.by_id(theme::TOGGLE_ID) {
            let icon = self
                .doc
                .by_id(theme::ICON_ID)
                .map(|i| self.doc.get(i).has_class("fa-sun"))
                .unwrap_or(false);
            let glyph = if icon { "\u{2600}" } else { "\u{263E}" };
            let area = egui::Rect::from_min_size(
                egui::pos2(rect.right() - 64.0 * s, rect.top() + 20.0 * s),
                egui::vec2(44.0, 44.0) * s,
            );
            self.control(toggle, area, glyph);
        }

        if let Some(control) = self.doc.by_id(fullscreen::CONTROL_ID) {
            let compress = self
                .doc
                .by_id(fullscreen::ICON_ID)
                .map(|i| self.doc.get(i).has_class("fa-compress"))
                .unwrap_or(false);
            let footer = self.doc.text_content(control);
            let glyph = if compress { "\u{2199}" } else { "\u{2197}" };
            let text = if footer.is_empty() {
                glyph.to_string()
            } else {
                format!("{glyph}  {footer}")
            };
            let galley = self.ui.painter().layout_no_wrap(
                text.clone(),
                egui::FontId::proportional(14.0 * s),
                self.theme.foreground,
            );
            let area = egui::Rect::from_min_size(
                egui::pos2(rect.left() + 16.0 * s, rect.bottom() - 40.0 * s),
                galley.rect.size() + egui::vec2(16.0, 12.0) * s,
            );
            self.control(control, area, &text);
        }

        if let Some(link) = self.doc.by_id(WEBSITE_LINK_ID) {
            let color = Theme::with_opacity(self.theme.accent, 0.7);
            let galley = self.ui.painter().layout_no_wrap(
                self.doc.get(link).text.clone(),
                egui::FontId::proportional(13.0 * s),
                color,
            );
            let pos = egui::pos2(
                rect.center().x - galley.rect.width() / 2.0,
                rect.bottom() - 22.0 * s,
            );
            let area = egui::Rect::from_min_size(pos, galley.rect.size());
            self.ui.painter().galley(pos, galley, color);
            self.hits.push((area, link));
        }
    }

    /// A button-like control with its element title as tooltip.
    fn control(&mut self, node: NodeId, area: egui::Rect, text: &str) {
        let painter = self.ui.painter();
        painter.rect_filled(area, 8.0 * self.scale, Theme::with_opacity(self.theme.surface, 0.8));
        let galley = painter.layout_no_wrap(
            text.to_string(),
            egui::FontId::proportional(18.0 * self.scale),
            self.theme.foreground,
        );
        painter.galley(area.center() - galley.rect.size() / 2.0, galley, self.theme.foreground);
        let title = &self.doc.get(node).title;
        if !title.is_empty() {
            let id = egui::Id::new(("control", node.index()));
            self.ui.interact(area, id, egui::Sense::hover()).on_hover_text(title.as_str());
        }
        self.hits.push((area, node));
    }

    fn draw_focus(&self, node: NodeId) {
        if let Some((rect, _)) = self.hits.iter().find(|(_, n)| *n == node) {
            self.ui.painter().rect_stroke(
                rect.expand(3.0 * self.scale),
                8.0 * self.scale,
                egui::Stroke::new(2.0 * self.scale, self.theme.accent),
                egui::StrokeKind::Outside,
            );
        }
    }

    fn label(&self, text: &str, pos: egui::Pos2, size: f32, color: egui::Color32) {
        let galley = self.ui.painter().layout_no_wrap(
            text.to_string(),
            egui::FontId::monospace(size * self.scale),
            color,
        );
        self.ui.painter().galley(pos, galley, color);
    }

    fn text_of(&self, id: &str) -> String {
        self.doc
            .by_id(id)
            .map(|n| self.doc.get(n).text.clone())
            .unwrap_or_default()
    }
}

fn parse_opacity(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().map(|v| v.clamp(0.0, 1.0))
}

fn parse_percent(value: &str) -> Option<f32> {
    value.trim().strip_suffix('%')?.trim().parse().ok()
}

/// Offset and zoom of a `translateX(..)`, `translateY(..)` or `scale(..)`
/// declaration. Anything else is the identity.
fn parse_transform(value: &str) -> (egui::Vec2, f32) {
    let value = value.trim();
    let arg = |prefix: &str| -> Option<f32> {
        let inner = value.strip_prefix(prefix)?.strip_suffix(')')?;
        inner.trim().trim_end_matches("px").parse().ok()
    };
    if let Some(x) = arg("translateX(") {
        (egui::vec2(x, 0.0), 1.0)
    } else if let Some(y) = arg("translateY(") {
        (egui::vec2(0.0, y), 1.0)
    } else if let Some(z) = arg("scale(") {
        (egui::Vec2::ZERO, z)
    } else {
        (egui::Vec2::ZERO, 1.0)
    }
}

pub fn run(
    file: PathBuf,
    windowed: bool,
    start_slide: Option<usize>,
    autoplay_secs: Option<u64>,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", file.display()))?;
    let base_path = file.parent().unwrap_or(Path::new(".")).to_path_buf();
    let deck = parser::parse(&content);

    if deck.slides.is_empty() {
        anyhow::bail!("No slides found in {}", file.display());
    }

    let title = deck.meta.title.clone().unwrap_or_else(|| {
        format!(
            "slidekit - {}",
            file.file_name().unwrap_or_default().to_string_lossy()
        )
    });

    // CLI flags override config
    let config = Config::load_or_default();
    let settings = Settings {
        start: start_slide
            .map(StartMode::Slide)
            .unwrap_or_else(|| config.start_mode()),
        theme: config.theme(),
        autoplay: match autoplay_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => config.autoplay(),
        },
        timings: TransitionTimings::default(),
    };
    let reduced_motion = config.reduced_motion();
    tracing::debug!(slides = deck.slides.len(), start = %settings.start, "opening deck");

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let caps = Capabilities {
                prefers_reduced_motion: reduced_motion,
                device_pixel_ratio: cc.egui_ctx.pixels_per_point(),
                ..Default::default()
            };
            let ctx = cc.egui_ctx.clone();
            let presentation = Presentation::new(
                &deck,
                &base_path,
                &caps,
                store::open_or_memory(),
                settings,
                move |_| Box::new(ViewportFullscreen { ctx }),
            );
            Ok(Box::new(PresentationApp::new(presentation)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
