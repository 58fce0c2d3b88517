use std::borrow::Cow;

use pinyin::ToPinyin;
use sha2::{Digest, Sha256};

/// Slug used when a text yields no transliterable word at all.
pub const FALLBACK_SLUG: &str = "text";

/// Collapse whitespace that only comes from markup layout.
///
/// Follows JSX text semantics: each line is trimmed where it wraps (leading
/// whitespace on every line but the first, trailing whitespace on every line
/// but the last), whitespace-only lines disappear, and the remaining lines
/// are joined with a single space.
///
/// ```
/// use zhwrap::core::keys::normalize_markup_text;
///
/// assert_eq!(normalize_markup_text("你好\n      世界"), "你好 世界");
/// assert_eq!(normalize_markup_text("单行 文本"), "单行 文本");
/// ```
pub fn normalize_markup_text(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    let last = lines.len().saturating_sub(1);

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let mut line = line.trim_end_matches('\r');
            if i > 0 {
                line = line.trim_start();
            }
            if i < last {
                line = line.trim_end();
            }
            line
        })
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Longest entity body considered, `&` and `;` excluded.
const MAX_ENTITY_LEN: usize = 10;

/// Named character references common in markup text.
const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("ensp", '\u{2002}'),
    ("emsp", '\u{2003}'),
    ("thinsp", '\u{2009}'),
    ("zwnj", '\u{200c}'),
    ("zwj", '\u{200d}'),
    ("ndash", '–'),
    ("mdash", '—'),
    ("lsquo", '‘'),
    ("rsquo", '’'),
    ("ldquo", '“'),
    ("rdquo", '”'),
    ("laquo", '«'),
    ("raquo", '»'),
    ("hellip", '…'),
    ("middot", '·'),
    ("bull", '•'),
    ("times", '×'),
    ("divide", '÷'),
    ("plusmn", '±'),
    ("deg", '°'),
    ("copy", '©'),
    ("reg", '®'),
    ("trade", '™'),
    ("sect", '§'),
    ("para", '¶'),
    ("cent", '¢'),
    ("pound", '£'),
    ("yen", '¥'),
    ("euro", '€'),
    ("larr", '←'),
    ("uarr", '↑'),
    ("rarr", '→'),
    ("darr", '↓'),
];

/// Decode character references in markup text, the way the markup is
/// rendered: `&nbsp;`, `&amp;`, `&#20320;`, `&#x4f60;`. Unknown or malformed
/// references are kept as written.
///
/// ```
/// use zhwrap::core::keys::decode_markup_entities;
///
/// assert_eq!(decode_markup_entities("价格&nbsp;&amp;优惠"), "价格\u{a0}&优惠");
/// assert_eq!(decode_markup_entities("&#x4f60;&#22909;"), "你好");
/// ```
pub fn decode_markup_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest[1..]
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| Some((decode_entity(&rest[1..1 + end])?, end + 2)));
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity(body: &str) -> Option<char> {
    let Some(number) = body.strip_prefix('#') else {
        return NAMED_ENTITIES
            .iter()
            .find(|(name, _)| *name == body)
            .map(|(_, c)| *c);
    };
    let code = match number.strip_prefix(['x', 'X']) {
        Some(hex) if !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            u32::from_str_radix(hex, 16).ok()?
        }
        None if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) => {
            number.parse().ok()?
        }
        _ => return None,
    };
    char::from_u32(code).filter(|&c| c != '\0')
}

/// Pinyin slug for a text.
///
/// Every ideograph becomes its own unaccented syllable, ASCII alphanumerics
/// runs are lower-cased and kept, anything else separates words. Symbols with
/// no reading are dropped.
pub fn slugify(text: &str, max_length: usize) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            current.push(c.to_ascii_lowercase());
            continue;
        }
        if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        if let Some(reading) = c.to_pinyin() {
            words.push(reading.plain().to_string());
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut slug = words.join("_");
    if slug.len() > max_length {
        // Slugs are pure ASCII, any byte index is a char boundary.
        slug.truncate(max_length);
    }
    let slug = slug.trim_matches('_');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// First `len` hex digits of the SHA-256 of `text`.
pub fn hash_suffix(text: &str, len: usize) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hex: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
    hex.truncate(len);
    hex
}

/// `{namespace}_{slug}`, or the bare slug when the namespace is empty.
pub fn make_key(namespace: &str, slug: &str) -> String {
    if namespace.is_empty() {
        slug.to_string()
    } else {
        format!("{namespace}_{slug}")
    }
}
