/// XML `S` production: space, tab, carriage return, line feed.
///
/// Other Unicode spaces (NBSP, ideographic space, ...) are content.
pub fn is_xml_whitespace(c: char) -> bool {
    matches!(c, '\u{0020}' | '\u{0009}' | '\u{000D}' | '\u{000A}')
}

/// XPath `normalize-space()`: trim XML whitespace and collapse inner runs
/// to a single space.
pub fn normalize_space(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for word in s.split(is_xml_whitespace).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }

    result
}

/// Same as `normalize_space(s).is_empty()` without allocating.
pub fn is_blank(s: &str) -> bool {
    s.chars().all(is_xml_whitespace)
}
