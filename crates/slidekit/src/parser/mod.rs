pub mod frontmatter;
pub mod splitter;

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::hooks::StaggerEffect;
use crate::observer::RevealStyle;

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\[([^\]]*)\]\(([^)\s]+)\)$").expect("image pattern is valid"));
static TOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\(#(\d+)\)$").expect("toc pattern is valid"));
static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\.([\w-]+)\}\s*(.*)$").expect("class pattern is valid"));

#[derive(Debug, Clone)]
pub struct Deck {
    pub meta: DeckMeta,
    pub slides: Vec<SlideSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SlideSource {
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
    /// `@reveal:` style applied to the slide's body elements.
    pub reveal: Option<RevealStyle>,
    pub staggers: Vec<StaggerDirective>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Subheading(String),
    Paragraph(String),
    Bullet { text: String, class: Option<String> },
    Image { alt: String, path: String },
    TocEntry { label: String, target: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaggerDirective {
    pub class: String,
    pub step: Duration,
    pub effect: StaggerEffect,
}

pub fn parse(content: &str) -> Deck {
    let (meta, body) = frontmatter::extract(content);
    let slides = splitter::split(&body)
        .into_iter()
        .map(|raw| parse_slide(&raw))
        .collect();
    Deck { meta, slides }
}

fn parse_slide(raw: &str) -> SlideSource {
    let mut slide = SlideSource::default();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut slide.blocks);
            continue;
        }
        if splitter::is_directive(trimmed) {
            flush_paragraph(&mut paragraph, &mut slide.blocks);
            apply_directive(trimmed, &mut slide);
            continue;
        }
        if let Some(text) = trimmed.strip_prefix("# ") {
            flush_paragraph(&mut paragraph, &mut slide.blocks);
            if slide.heading.is_none() {
                slide.heading = Some(text.trim().to_string());
            } else {
                slide.blocks.push(Block::Subheading(text.trim().to_string()));
            }
            continue;
        }
        if let Some(text) = trimmed
            .strip_prefix("## ")
            .or_else(|| trimmed.strip_prefix("### "))
        {
            flush_paragraph(&mut paragraph, &mut slide.blocks);
            slide.blocks.push(Block::Subheading(text.trim().to_string()));
            continue;
        }
        if let Some(caps) = IMAGE_RE.captures(trimmed) {
            flush_paragraph(&mut paragraph, &mut slide.blocks);
            slide.blocks.push(Block::Image {
                alt: caps[1].to_string(),
                path: caps[2].to_string(),
            });
            continue;
        }
        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            flush_paragraph(&mut paragraph, &mut slide.blocks);
            slide.blocks.push(parse_item(item.trim()));
            continue;
        }
        paragraph.push(trimmed);
    }
    flush_paragraph(&mut paragraph, &mut slide.blocks);
    slide
}

fn parse_item(item: &str) -> Block {
    if let Some(caps) = TOC_RE.captures(item) {
        if let Ok(target) = caps[2].parse() {
            return Block::TocEntry {
                label: caps[1].to_string(),
                target,
            };
        }
    }
    if let Some(caps) = CLASS_RE.captures(item) {
        return Block::Bullet {
            text: caps[2].to_string(),
            class: Some(caps[1].to_string()),
        };
    }
    Block::Bullet {
        text: item.to_string(),
        class: None,
    }
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if !lines.is_empty() {
        blocks.push(Block::Paragraph(lines.join(" ")));
        lines.clear();
    }
}

fn apply_directive(line: &str, slide: &mut SlideSource) {
    let Some((name, value)) = line[1..].split_once(':') else {
        return;
    };
    let value = value.trim();
    match name.trim() {
        "reveal" => match RevealStyle::parse(value) {
            Some(style) => slide.reveal = Some(style),
            None => tracing::warn!("unknown reveal style: {value}"),
        },
        "stagger" => match parse_stagger(value) {
            Some(stagger) => slide.staggers.push(stagger),
            None => tracing::warn!("malformed stagger directive: {value}"),
        },
        other => tracing::debug!("ignoring unknown directive @{other}"),
    }
}

/// `<class> <step-ms> <effect>`
fn parse_stagger(value: &str) -> Option<StaggerDirective> {
    let mut parts = value.split_whitespace();
    let class = parts.next()?.trim_start_matches('.').to_string();
    let step = parts.next()?.parse::<u64>().ok()?;
    let effect = StaggerEffect::parse(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(StaggerDirective {
        class,
        step: Duration::from_millis(step),
        effect,
    })
}
