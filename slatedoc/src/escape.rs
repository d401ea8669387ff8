//! HTML and URL escaping used by the Slate renderer
//!
//! Entity decoding and percent-encoding come from `html-escape` and
//! `percent-encoding`. What lives here is the tokenization of character
//! references (only `;`-terminated references are decoded) and the
//! apostrophe exception for text output.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Character references recognized by [`unescape_html`]
///
/// Named references must be terminated with `;`; legacy forms such as `&amp`
/// without the semicolon stay literal.
static CHARREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+;|#[xX][0-9a-fA-F]+;|[^\t\n\f <&#;]{1,32};)")
        .expect("character reference pattern is valid")
});

/// Characters left untouched by [`escape_url`], in addition to `A-Z a-z 0-9 _ . - ~`
const URL_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/')
    .remove(b'#')
    .remove(b':')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'?')
    .remove(b'=')
    .remove(b'%')
    .remove(b'@')
    .remove(b'+')
    .remove(b',')
    .remove(b'&');

/// Replacements for numeric references into the C1 control range
///
/// Indexed by `code - 0x80`. `None` entries decode to the code point itself.
const WINDOWS_1252_C1: [Option<char>; 32] = [
    Some('\u{20ac}'),
    None,
    Some('\u{201a}'),
    Some('\u{0192}'),
    Some('\u{201e}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02c6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017d}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201c}'),
    Some('\u{201d}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02dc}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203a}'),
    Some('\u{0153}'),
    None,
    Some('\u{017e}'),
    Some('\u{0178}'),
];

/// Decode terminated character references in `raw`
///
/// Numeric references to NUL, surrogates or values past U+10FFFF decode to
/// U+FFFD.
pub fn unescape_html(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    CHARREF.replace_all(raw, |caps: &Captures<'_>| {
        let reference = &caps[1];
        match reference.strip_prefix('#') {
            Some(number) => decode_numeric(number.trim_end_matches(';')).to_string(),
            None => html_escape::decode_html_entities(&caps[0]).into_owned(),
        }
    })
}

/// Decode the digits of `&#...;` or `&#x...;`
fn decode_numeric(number: &str) -> char {
    let parsed = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => number.parse::<u32>(),
    };

    match parsed {
        Ok(0) | Err(_) => char::REPLACEMENT_CHARACTER,
        Ok(code @ 0x80..=0x9f) => WINDOWS_1252_C1[(code - 0x80) as usize]
            .or_else(|| char::from_u32(code))
            .unwrap_or(char::REPLACEMENT_CHARACTER),
        Ok(code) => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
    }
}

/// Re-encode `&` in text the parser has already decoded
///
/// [`escape_html`] and [`escape_url`] decode references before escaping, so
/// parser output is stored in this form to come back out unchanged.
pub fn encode_ampersands(decoded: &str) -> Cow<'_, str> {
    if decoded.contains('&') {
        Cow::Owned(decoded.replace('&', "&amp;"))
    } else {
        Cow::Borrowed(decoded)
    }
}

/// Escape text for HTML output
///
/// Existing entities are decoded first so already-escaped input is not
/// escaped twice. `'` is emitted as a literal apostrophe.
pub fn escape_html(raw: &str) -> String {
    let unescaped = unescape_html(raw);
    html_escape::encode_double_quoted_attribute(&unescaped).into_owned()
}

/// Escape code content verbatim, without decoding entities first
pub fn escape_code(raw: &str) -> String {
    html_escape::encode_double_quoted_attribute(raw).replace('\'', "&#x27;")
}

/// Escape a link target: percent-encode unsafe characters, then HTML-escape
pub fn escape_url(raw: &str) -> String {
    let unescaped = unescape_html(raw);
    let encoded = utf8_percent_encode(&unescaped, URL_ESCAPE_SET).to_string();
    html_escape::encode_double_quoted_attribute(&encoded).into_owned()
}
