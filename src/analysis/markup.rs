use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#x?[0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity regex"));

/// Strip markup from a review cell: tags become separators, common HTML
/// entities are decoded, and runs of whitespace collapse to single spaces.
pub fn strip_markup(raw: &str) -> String {
    if !raw.contains('<') && !raw.contains('&') {
        return raw.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    let without_tags = TAG_RE.replace_all(raw, " ");
    let decoded = ENTITY_RE.replace_all(&without_tags, |caps: &regex::Captures<'_>| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entity(body: &str) -> Option<String> {
    let named = match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    };
    if let Some(ch) = named {
        return Some(ch.to_string());
    }

    let code = body.strip_prefix('#')?;
    let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => code.parse::<u32>().ok()?,
    };
    char::from_u32(value).map(|ch| ch.to_string())
}
