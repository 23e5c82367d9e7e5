use super::*;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag_name))
}

pub(crate) fn parse_document(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let root = dom.root;
    parse_fragment_into(&mut dom, root, html)?;
    Ok(dom)
}

/// Parses `html` and appends the resulting nodes under `fragment_root`.
/// Raw-text elements (`script`, `style`) are consumed and discarded: the
/// fixture format carries structure, not executable content.
pub(crate) fn parse_fragment_into(dom: &mut Dom, fragment_root: NodeId, html: &str) -> Result<()> {
    let bytes = html.as_bytes();
    let mut stack = vec![fragment_root];
    let mut i = 0usize;

    while i < bytes.len() {
        if starts_with_at(bytes, i, b"<!--") {
            let Some(end) = find_subslice(bytes, i + 4, b"-->") else {
                return Err(Error::HtmlParse("unclosed HTML comment".into()));
            };
            i = end + 3;
            continue;
        }

        if starts_with_at(bytes, i, b"<!") {
            // Doctype or other markup declaration.
            let Some(end) = find_byte(bytes, i, b'>') else {
                return Err(Error::HtmlParse("unclosed markup declaration".into()));
            };
            i = end + 1;
            continue;
        }

        if starts_with_at(bytes, i, b"</") {
            let (tag, next) = parse_end_tag(html, i)?;
            i = next;
            // Close the nearest matching open element, implicitly closing
            // anything nested inside it. Unmatched end tags are dropped.
            if let Some(rel) = stack[1..]
                .iter()
                .rposition(|node| dom.tag_name(*node).is_some_and(|t| t.eq_ignore_ascii_case(&tag)))
            {
                stack.truncate(rel + 1);
            }
            continue;
        }

        if bytes[i] == b'<' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_alphabetic() {
            let (tag_name, attrs, self_closing, next) = parse_start_tag(html, i)?;
            i = next;

            if tag_name == "script" || tag_name == "style" {
                let close = format!("</{tag_name}");
                let Some(pos) = find_ci(html, i, &close) else {
                    return Err(Error::HtmlParse(format!("unclosed <{tag_name}> element")));
                };
                let Some(end) = find_byte(bytes, pos, b'>') else {
                    return Err(Error::HtmlParse(format!("unclosed <{tag_name}> end tag")));
                };
                i = end + 1;
                continue;
            }

            let parent = *stack
                .last()
                .ok_or_else(|| Error::HtmlParse("invalid parser stack state".into()))?;
            let node = dom.create_element(parent, tag_name.clone(), attrs);
            if !self_closing && !is_void_element(&tag_name) {
                stack.push(node);
            }
            continue;
        }

        // Text run; a stray '<' that opened no markup is consumed as text.
        let start = i;
        i += 1;
        while i < bytes.len() && bytes[i] != b'<' {
            i += 1;
        }
        let raw = &html[start..i];
        if !raw.trim().is_empty() {
            let parent = *stack
                .last()
                .ok_or_else(|| Error::HtmlParse("invalid parser stack state".into()))?;
            let decoded = decode_character_references(raw);
            dom.create_node(Some(parent), NodeType::Text(decoded));
        }
    }

    Ok(())
}

fn parse_end_tag(html: &str, at: usize) -> Result<(String, usize)> {
    let bytes = html.as_bytes();
    let mut i = at + 2;
    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    if i == name_start {
        return Err(Error::HtmlParse("end tag without a name".into()));
    }
    let name = html[name_start..i].to_ascii_lowercase();
    let Some(end) = find_byte(bytes, i, b'>') else {
        return Err(Error::HtmlParse(format!("unclosed end tag </{name}")));
    };
    Ok((name, end + 1))
}

#[allow(clippy::type_complexity)]
fn parse_start_tag(html: &str, at: usize) -> Result<(String, HashMap<String, String>, bool, usize)> {
    let bytes = html.as_bytes();
    let mut i = at + 1;
    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    let tag_name = html[name_start..i].to_ascii_lowercase();
    let mut attrs = HashMap::new();

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let Some(&ch) = bytes.get(i) else {
            return Err(Error::HtmlParse(format!("unclosed start tag <{tag_name}")));
        };
        if ch == b'>' {
            return Ok((tag_name, attrs, false, i + 1));
        }
        if ch == b'/' {
            if bytes.get(i + 1) == Some(&b'>') {
                return Ok((tag_name, attrs, true, i + 2));
            }
            i += 1;
            continue;
        }

        let attr_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        if i == attr_start {
            return Err(Error::HtmlParse(format!(
                "malformed attribute in <{tag_name}>"
            )));
        }
        let attr_name = html[attr_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut attr_value = String::new();
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                Some(&(quote @ (b'"' | b'\''))) => {
                    i += 1;
                    let value_start = i;
                    let Some(end) = find_byte(bytes, i, quote) else {
                        return Err(Error::HtmlParse(format!(
                            "unclosed attribute value in <{tag_name}>"
                        )));
                    };
                    attr_value = decode_character_references(&html[value_start..end]);
                    i = end + 1;
                }
                Some(_) => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    attr_value = decode_character_references(&html[value_start..i]);
                }
                None => {
                    return Err(Error::HtmlParse(format!("unclosed start tag <{tag_name}>")));
                }
            }
        }

        // First declaration of an attribute wins, as in browsers.
        attrs.entry(attr_name).or_insert(attr_value);
    }
}

pub(crate) fn decode_character_references(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }

    fn decode_numeric(value: &str) -> Option<char> {
        let codepoint = if let Some(hex) = value.strip_prefix('x').or_else(|| value.strip_prefix('X'))
        {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            value.parse::<u32>().ok()?
        };
        char::from_u32(codepoint)
    }

    fn decode_named(value: &str) -> Option<char> {
        match value {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{00A0}'),
            _ => None,
        }
    }

    let mut out = String::with_capacity(src.len());
    let mut i = 0usize;
    while i < src.len() {
        let ch = src[i..].chars().next().unwrap_or_default();
        if ch != '&' {
            out.push(ch);
            i += ch.len_utf8();
            continue;
        }

        let tail = &src[i + 1..];
        let entity_end = tail.find(';');
        let decoded = entity_end.and_then(|end| {
            let raw = &tail[..end];
            if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '#') {
                return None;
            }
            if let Some(rest) = raw.strip_prefix('#') {
                decode_numeric(rest)
            } else {
                decode_named(raw)
            }
        });

        if let (Some(end), Some(value)) = (entity_end, decoded) {
            out.push(value);
            i += end + 2;
        } else {
            out.push('&');
            i += 1;
        }
    }
    out
}

fn starts_with_at(bytes: &[u8], at: usize, pattern: &[u8]) -> bool {
    bytes.len() >= at + pattern.len() && &bytes[at..at + pattern.len()] == pattern
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|b| *b == needle)
        .map(|pos| from + pos)
}

fn find_subslice(bytes: &[u8], from: usize, pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() || bytes.len() < pattern.len() {
        return None;
    }
    (from..=bytes.len() - pattern.len()).find(|&i| &bytes[i..i + pattern.len()] == pattern)
}

/// Case-insensitive search for an ASCII needle, returning the byte offset.
fn find_ci(html: &str, from: usize, needle: &str) -> Option<usize> {
    let haystack = html.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| {
        haystack[i..i + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    })
}
