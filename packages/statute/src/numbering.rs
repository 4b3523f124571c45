//! Article, paragraph and supplementary-provision label normalization.
//!
//! Source documents encode numbers as Arabic digits (ASCII or full-width),
//! kanji numerals, underscore branch notation (`3_2` for 第3条の2) or an
//! already formatted display string. Everything here is total: input that
//! is not recognized passes through verbatim.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{LabelStyle, SUPPL_LABEL};

/// Already formatted article numbers such as 第9条 or 第三条の二.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FORMATTED_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第.+条").expect("valid regex"));

/// Article number embedded in free text, e.g. a caption.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static EMBEDDED_ARTICLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"第\s*([〇一二三四五六七八九十百千0-9０-９]+)\s*条").expect("valid regex")
});

const KANJI_DIGITS: [(char, u32); 11] = [
    ('〇', 0),
    ('零', 0),
    ('一', 1),
    ('二', 2),
    ('三', 3),
    ('四', 4),
    ('五', 5),
    ('六', 6),
    ('七', 7),
    ('八', 8),
    ('九', 9),
];

fn kanji_digit(c: char) -> Option<u32> {
    KANJI_DIGITS
        .iter()
        .find(|(k, _)| *k == c)
        .map(|(_, v)| *v)
}

fn kanji_unit(c: char) -> Option<u32> {
    match c {
        '十' => Some(10),
        '百' => Some(100),
        '千' => Some(1000),
        _ => None,
    }
}

/// Replace full-width digits with their ASCII forms.
///
/// # Examples
/// ```
/// use roppo_statute::numbering::to_ascii_digits;
///
/// assert_eq!(to_ascii_digits("第２項"), "第2項");
/// ```
#[must_use]
pub fn to_ascii_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Check whether text consists solely of kanji numeral characters.
#[must_use]
pub fn is_kanji_numeral(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| kanji_digit(c).is_some() || kanji_unit(c).is_some() || c == '万')
}

fn is_ascii_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Parse a kanji numeral (二十二, 百三, 二〇二〇).
///
/// # Examples
/// ```
/// use roppo_statute::numbering::parse_kanji_number;
///
/// assert_eq!(parse_kanji_number("二十二"), Some(22));
/// assert_eq!(parse_kanji_number("千九百四十七"), Some(1947));
/// assert_eq!(parse_kanji_number("abc"), None);
/// ```
#[must_use]
pub fn parse_kanji_number(text: &str) -> Option<u32> {
    if !is_kanji_numeral(text) {
        return None;
    }

    let mut total: u32 = 0;
    let mut section: u32 = 0;
    let mut digits: Option<u32> = None;

    for c in text.chars() {
        if let Some(d) = kanji_digit(c) {
            digits = Some(digits.unwrap_or(0).checked_mul(10)?.checked_add(d)?);
        } else if let Some(unit) = kanji_unit(c) {
            section = section.checked_add(digits.unwrap_or(1).checked_mul(unit)?)?;
            digits = None;
        } else {
            // 万
            let block = section.checked_add(digits.unwrap_or(0))?;
            total = total.checked_add(block.max(1).checked_mul(10_000)?)?;
            section = 0;
            digits = None;
        }
    }

    total.checked_add(section)?.checked_add(digits.unwrap_or(0))
}

/// Parse an Arabic (ASCII or full-width) or kanji number.
#[must_use]
pub fn parse_number(text: &str) -> Option<u32> {
    let ascii = to_ascii_digits(text.trim());
    if is_ascii_number(&ascii) {
        return ascii.parse().ok();
    }
    parse_kanji_number(&ascii)
}

fn is_number_part(text: &str) -> bool {
    let ascii = to_ascii_digits(text);
    is_ascii_number(&ascii) || is_kanji_numeral(&ascii)
}

/// Normalize a raw article number into its display form.
///
/// # Examples
/// ```
/// use roppo_statute::numbering::normalize_article_number;
///
/// assert_eq!(normalize_article_number("3"), "第3条");
/// assert_eq!(normalize_article_number("3_2"), "第3条の2");
/// assert_eq!(normalize_article_number("第9条"), "第9条");
/// assert_eq!(normalize_article_number("十二"), "第十二条");
/// ```
#[must_use]
pub fn normalize_article_number(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }

    if FORMATTED_ARTICLE.is_match(s) {
        return s.to_string();
    }

    // Deleted ranges: "3:5" covers 第3条 through 第5条.
    if let Some((from, to)) = s.split_once(':') {
        let (from, to) = (normalize_article_number(from), normalize_article_number(to));
        if is_article_number_shaped(&from) && is_article_number_shaped(&to) {
            return format!("{from}から{to}まで");
        }
        return s.to_string();
    }

    if s.contains('_') {
        let parts: Vec<String> = s.split('_').map(to_ascii_digits).collect();
        if parts.len() >= 2 && parts.iter().all(|p| is_number_part(p)) {
            let mut out = format!("第{}条", parts[0]);
            for branch in &parts[1..] {
                out.push('の');
                out.push_str(branch);
            }
            return out;
        }
        return s.to_string();
    }

    let ascii = to_ascii_digits(s);
    if is_ascii_number(&ascii) || is_kanji_numeral(&ascii) {
        return format!("第{ascii}条");
    }

    s.to_string()
}

/// Check whether text is a formatted article number.
#[must_use]
pub fn is_article_number_shaped(text: &str) -> bool {
    FORMATTED_ARTICLE.is_match(text)
}

/// Pull a `第N条` number out of free text such as a caption.
#[must_use]
pub fn extract_article_number(text: &str) -> Option<String> {
    EMBEDDED_ARTICLE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("第{}条", to_ascii_digits(m.as_str())))
}

/// Display label for a paragraph or item number.
///
/// Paragraph 1, blank and absent numbers produce no label. Arabic ordinals
/// of 2 and up use the paragraph template; kanji-only numbers are item
/// markers and use the item template. Anything else is returned verbatim.
///
/// # Examples
/// ```
/// use roppo_statute::config::LabelStyle;
/// use roppo_statute::numbering::paragraph_label;
///
/// let style = LabelStyle::default();
/// assert_eq!(paragraph_label(Some("1"), &style), "");
/// assert_eq!(paragraph_label(Some("2"), &style), "【第2項】");
/// assert_eq!(paragraph_label(Some("一"), &style), "（一）");
/// assert_eq!(paragraph_label(None, &style), "");
/// ```
#[must_use]
pub fn paragraph_label(number: Option<&str>, style: &LabelStyle) -> String {
    let Some(raw) = number else {
        return String::new();
    };
    let s = to_ascii_digits(raw.trim());
    if s.is_empty() {
        return String::new();
    }

    if is_ascii_number(&s) {
        return match s.parse::<u64>() {
            Ok(n) if n >= 2 => style.paragraph.replace("{n}", &n.to_string()),
            Ok(_) => String::new(),
            Err(_) => s,
        };
    }

    if is_kanji_numeral(&s) {
        return style.item.replace("{n}", &s);
    }

    s
}

/// Build the group label for a supplementary-provision block.
///
/// # Examples
/// ```
/// use roppo_statute::numbering::supplementary_label;
///
/// assert_eq!(
///     supplementary_label(Some("平成十一年法律第八十七号"), Some("1999-07-16")),
///     "附則（平成十一年法律第八十七号 1999-07-16 改正）"
/// );
/// assert_eq!(supplementary_label(None, None), "附則");
/// ```
#[must_use]
pub fn supplementary_label(law_number: Option<&str>, date: Option<&str>) -> String {
    let parts: Vec<&str> = [law_number, date]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        SUPPL_LABEL.to_string()
    } else {
        format!("{SUPPL_LABEL}（{} 改正）", parts.join(" "))
    }
}
