//! Buffer Normalization — the two-phase cleanup applied before matching.
//!
//! Phase 1 trims the edges of the buffer without touching its structure.
//! Phase 2 additionally auto-closes dangling opening tags; it runs only when
//! phase 1 produced nothing usable, trading structural fidelity for always
//! returning something plausible.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<(/?)([A-Za-z0-9_]+)>").expect("tag pattern is valid"))
}

/// Phase 1 ("strict"): drop everything before the first `<`, and drop an
/// in-flight partial tag — a `<` after the last `>` — from the tail.
///
/// Plain text after the last complete tag is kept: it is the growing value
/// of an in-progress primitive field, and callers want to see it stream in.
pub(crate) fn strict_clean(buffer: &str) -> &str {
    let Some(start) = buffer.find('<') else {
        return "";
    };
    let trimmed = &buffer[start..];
    let Some(gt) = trimmed.rfind('>') else {
        // No tag has finished yet ("<na...").
        return "";
    };
    let tail = &trimmed[gt + 1..];
    match tail.rfind('<') {
        Some(lt) => &trimmed[..gt + 1 + lt],
        None => trimmed,
    }
}

/// Phase 2 ("lenient"): append a synthetic closing tag, in reverse order of
/// opening, for every opening tag with no matching close anywhere in the
/// buffer.
pub(crate) fn close_dangling(buffer: &str) -> String {
    let mut close_budget: HashMap<&str, usize> = HashMap::new();
    for caps in tag_regex().captures_iter(buffer) {
        if caps.get(1).map_or(false, |m| m.as_str() == "/") {
            let name = caps.get(2).map_or("", |m| m.as_str());
            *close_budget.entry(name).or_insert(0) += 1;
        }
    }

    let mut dangling: Vec<&str> = Vec::new();
    for caps in tag_regex().captures_iter(buffer) {
        if caps.get(1).map_or(false, |m| m.as_str() == "/") {
            continue;
        }
        let name = caps.get(2).map_or("", |m| m.as_str());
        match close_budget.get_mut(name) {
            Some(budget) if *budget > 0 => *budget -= 1,
            _ => dangling.push(name),
        }
    }

    if dangling.is_empty() {
        return buffer.to_string();
    }

    let mut repaired = String::with_capacity(buffer.len() + dangling.len() * 8);
    repaired.push_str(buffer);
    for name in dangling.iter().rev() {
        repaired.push_str("</");
        repaired.push_str(name);
        repaired.push('>');
    }
    repaired
}
