use std::path::Path;

use crate::document::{Document, Element, NodeId, Selector};
use crate::fullscreen;
use crate::hooks::{ANIMATE_ATTR, HookTable, Stagger};
use crate::navigator::{ACTIVE, slide_id};
use crate::observer::{ANIM_ATTR, RevealStyle};
use crate::parser::{Block, Deck, SlideSource};
use crate::theme;

pub const WEBSITE_LINK_ID: &str = "websiteLink";

/// Build the document for `deck`, resolving image paths against `base`.
/// Returns the document and the stagger hooks the deck declares.
pub fn render(deck: &Deck, base: &Path) -> (Document, HookTable) {
    let mut doc = Document::new();
    let mut hooks = HookTable::new();
    let body = doc.body();

    let container = doc.append(body, Element::new("main").with_class("presentation"));
    for (i, slide) in deck.slides.iter().enumerate() {
        let n = i + 1;
        render_slide(&mut doc, container, n, slide, base);
        for stagger in &slide.staggers {
            hooks.register(
                n,
                Stagger {
                    selector: Selector::class(&stagger.class),
                    step: stagger.step,
                    effect: stagger.effect,
                },
            );
        }
    }

    render_chrome(&mut doc, deck);
    (doc, hooks)
}

fn render_slide(doc: &mut Document, container: NodeId, n: usize, slide: &SlideSource, base: &Path) {
    let mut section = Element::new("section")
        .with_id(&slide_id(n))
        .with_class("slide")
        .with_attr("role", "region")
        .with_attr("aria-label", &format!("Slide {n}"));
    if n == 1 {
        section.add_class(ACTIVE);
    }
    let section = doc.append(container, section);

    if let Some(heading) = &slide.heading {
        doc.append(
            section,
            Element::new("h1").with_class("slide-title").with_text(heading),
        );
    }

    let mut toc: Option<NodeId> = None;
    for block in &slide.blocks {
        let el = match block {
            Block::Subheading(text) => Element::new("h2").with_text(text),
            Block::Paragraph(text) => revealable(Element::new("p").with_text(text), slide.reveal),
            Block::Bullet { text, class } => {
                let mut li = Element::new("li").with_attr(ANIMATE_ATTR, "").with_text(text);
                if let Some(class) = class {
                    li.add_class(class);
                    for stagger in slide.staggers.iter().filter(|s| &s.class == class) {
                        for (property, value) in stagger.effect.initial_style() {
                            li.set_style(property, value);
                        }
                    }
                }
                revealable(li, slide.reveal)
            }
            Block::Image { alt, path } => {
                let resolved = base.join(path);
                Element::new("img")
                    .with_attr("alt", alt)
                    .with_attr("src", "")
                    .with_attr("data-src", &resolved.to_string_lossy())
            }
            Block::TocEntry { label, target } => {
                let list = *toc.get_or_insert_with(|| {
                    doc.append(section, Element::new("nav").with_class("toc"))
                });
                doc.append(
                    list,
                    Element::new("a")
                        .with_class("toc-item")
                        .with_attr("href", &format!("#{}", slide_id(*target)))
                        .with_attr("data-slide", &target.to_string())
                        .with_text(label),
                );
                continue;
            }
        };
        doc.append(section, el);
    }
}

fn revealable(mut el: Element, reveal: Option<RevealStyle>) -> Element {
    if let Some(style) = reveal {
        el.set_attr(ANIM_ATTR, style.as_str());
        el.set_style("opacity", "0");
        el.set_style("transform", style.effect().initial_transform());
    }
    el
}

fn render_chrome(doc: &mut Document, deck: &Deck) {
    let body = doc.body();
    let total = deck.slides.len();

    let nav = doc.append(body, Element::new("nav").with_class("navigation"));
    doc.append(
        nav,
        Element::new("button")
            .with_class("nav-btn")
            .with_class("prev-btn")
            .with_attr("aria-label", "Previous slide")
            .with_text("\u{2190}"),
    );
    let dots = doc.append(nav, Element::new("div").with_class("dots"));
    for n in 1..=total {
        doc.append(
            dots,
            Element::new("span")
                .with_class("dot")
                .with_attr("data-slide", &n.to_string()),
        );
    }
    doc.append(
        nav,
        Element::new("button")
            .with_class("nav-btn")
            .with_class("next-btn")
            .with_attr("aria-label", "Next slide")
            .with_text("\u{2192}"),
    );

    let counter = doc.append(body, Element::new("div").with_class("slide-counter"));
    doc.append(counter, Element::new("span").with_id("current-slide"));
    doc.append(counter, Element::new("span").with_text(" / "));
    doc.append(counter, Element::new("span").with_id("total-slides"));

    let progress = doc.append(body, Element::new("div").with_class("progress"));
    let bar = doc.append(progress, Element::new("div").with_id("progressBar"));
    doc.append(bar, Element::new("div").with_id("progressBarFill"));
    doc.append(progress, Element::new("span").with_id("progress-current"));
    doc.append(progress, Element::new("span").with_id("progressPercentage"));

    let toggle = doc.append(
        body,
        Element::new("button")
            .with_id(theme::TOGGLE_ID)
            .with_class("theme-toggle"),
    );
    doc.append(toggle, Element::new("i").with_id(theme::ICON_ID));

    let fs = doc.append(
        body,
        Element::new("div")
            .with_id(fullscreen::CONTROL_ID)
            .with_attr("tabindex", "0"),
    );
    doc.append(fs, Element::new("i").with_id(fullscreen::ICON_ID));
    if let Some(footer) = &deck.meta.footer {
        doc.append(fs, Element::new("span").with_text(footer));
    }

    if let Some(url) = &deck.meta.website {
        doc.append(
            body,
            Element::new("a")
                .with_id(WEBSITE_LINK_ID)
                .with_attr("href", url)
                .with_attr("target", "_blank")
                .with_text(url),
        );
    }
}
