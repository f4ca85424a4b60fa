/// Split a deck body (frontmatter already removed) into raw slide strings.
///
/// A slide ends at:
/// 1. a `---` line with blank lines (or the text edge) on both sides,
/// 2. three or more consecutive blank lines,
/// 3. a `# ` heading once the current slide already has content.
///
/// Lines inside fenced code blocks never break a slide.
pub fn split(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = body.split('\n').collect();

    let mut slides = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut blank_run = 0;
    let mut fence: Option<(char, usize)> = None;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if let Some((ch, len)) = fence {
            current.push(line);
            if closes_fence(trimmed, ch, len) {
                fence = None;
            }
            i += 1;
            continue;
        }

        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == 3 {
                flush(&mut current, &mut slides);
            } else if blank_run < 3 {
                current.push(line);
            }
            i += 1;
            continue;
        }

        let prev_blank = i == 0 || blank_run > 0;
        let next_blank = lines.get(i + 1).is_none_or(|l| l.trim().is_empty());
        blank_run = 0;

        if is_dash_separator(trimmed) && prev_blank && next_blank {
            flush(&mut current, &mut slides);
            i += 1;
            continue;
        }

        if line.starts_with("# ") && has_content(&current) {
            let carried = take_trailing_directives(&mut current);
            flush(&mut current, &mut slides);
            current.extend(carried);
        }

        if let Some(open) = opens_fence(trimmed) {
            fence = Some(open);
        }
        current.push(line);
        i += 1;
    }
    flush(&mut current, &mut slides);
    slides
}

fn flush(current: &mut Vec<&str>, slides: &mut Vec<String>) {
    let text = current.join("\n").trim().to_string();
    current.clear();
    if !text.is_empty() {
        slides.push(text);
    }
}

fn has_content(lines: &[&str]) -> bool {
    lines.iter().any(|l| {
        let t = l.trim();
        !t.is_empty() && !is_directive(t)
    })
}

/// Directives placed right before an inferred `# ` heading belong to the
/// heading's slide.
fn take_trailing_directives<'a>(current: &mut Vec<&'a str>) -> Vec<&'a str> {
    let mut split_at = current.len();
    while split_at > 0 {
        let t = current[split_at - 1].trim();
        if t.is_empty() || is_directive(t) {
            split_at -= 1;
        } else {
            break;
        }
    }
    current
        .split_off(split_at)
        .into_iter()
        .filter(|l| !l.trim().is_empty())
        .collect()
}

fn opens_fence(trimmed: &str) -> Option<(char, usize)> {
    let ch = trimmed.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|&c| c == ch).count();
    (len >= 3).then_some((ch, len))
}

fn closes_fence(trimmed: &str, ch: char, len: usize) -> bool {
    let run = trimmed.chars().take_while(|&c| c == ch).count();
    run >= len && trimmed.chars().skip(run).all(char::is_whitespace)
}

fn is_dash_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

pub(crate) fn is_directive(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('@') else {
        return false;
    };
    let Some((name, _)) = rest.split_once(':') else {
        return false;
    };
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}
