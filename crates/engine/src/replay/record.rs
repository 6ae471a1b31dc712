//! Lenient reader for the one-object-per-line log format.
//!
//! Lines may be truncated (a crash mid-write) or carry fields this version
//! does not know. Nothing here fails: a member that cannot be read is simply
//! absent, and callers pick their own default.

/// Top-level members of one JSON-shaped object, values kept as raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord<'a> {
    members: Vec<(&'a str, &'a str)>,
}

impl<'a> LineRecord<'a> {
    /// Reads the object starting at the first `{`. An unterminated object is
    /// read up to the end of the text.
    pub fn parse(text: &'a str) -> Option<Self> {
        let start = text.find('{')?;
        let body = match extract_balanced(text, start) {
            Some(object) => &object[1..object.len() - 1],
            None => &text[start + 1..],
        };
        let members = split_top_level(body)
            .into_iter()
            .filter_map(split_member)
            .collect();
        Some(Self { members })
    }

    pub fn raw(&self, key: &str) -> Option<&'a str> {
        self.members
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
    }

    pub fn str_field(&self, key: &str) -> Option<String> {
        let raw = self.raw(key)?;
        if raw == "null" {
            return None;
        }
        Some(strip_quotes(raw))
    }

    pub fn f64_field(&self, key: &str) -> Option<f64> {
        self.raw(key)?
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

    pub fn f32_field(&self, key: &str) -> Option<f32> {
        self.f64_field(key).map(|value| value as f32)
    }

    pub fn i64_field(&self, key: &str) -> Option<i64> {
        let raw = self.raw(key)?;
        raw.parse::<i64>().ok().or_else(|| {
            // Integral floats such as `3.0` are accepted as ids.
            raw.parse::<f64>()
                .ok()
                .filter(|value| value.fract() == 0.0 && value.abs() < i64::MAX as f64)
                .map(|value| value as i64)
        })
    }

    /// Raw elements of an array member; an unterminated array yields what it has.
    pub fn array_items(&self, key: &str) -> Option<Vec<&'a str>> {
        let raw = self.raw(key)?;
        if !raw.starts_with('[') {
            return None;
        }
        let body = match extract_balanced(raw, 0) {
            Some(array) => &array[1..array.len() - 1],
            None => &raw[1..],
        };
        Some(split_top_level(body))
    }

    /// A numeric array, only when every element parses.
    pub fn f32_array(&self, key: &str) -> Option<Vec<f32>> {
        self.array_items(key)?
            .into_iter()
            .map(|item| {
                item.parse::<f32>()
                    .ok()
                    .filter(|value| value.is_finite())
            })
            .collect()
    }
}

fn split_member(member: &str) -> Option<(&str, &str)> {
    let colon = find_outside_strings(member, ':')?;
    let key = member[..colon].trim();
    let value = member[colon + 1..].trim();
    let key = key.strip_prefix('"')?.strip_suffix('"')?;
    Some((key, value))
}

fn find_outside_strings(text: &str, target: char) -> Option<usize> {
    let mut in_string = false;
    let mut escaped = false;
    for (index, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else if ch == '"' {
            in_string = true;
        } else if ch == target {
            return Some(index);
        }
    }
    None
}

/// The bracketed span opening at byte `start` (`{` or `[`), brackets included.
/// Returns `None` when `start` is not an opening bracket or the span never closes.
pub fn extract_balanced(text: &str, start: usize) -> Option<&str> {
    let opening = text[start..].chars().next()?;
    if opening != '{' && opening != '[' {
        return None;
    }
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on commas that sit outside strings and nested brackets.
/// Pieces are trimmed and empty pieces dropped.
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    let mut part_start = 0;
    for (index, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[part_start..index]);
                part_start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[part_start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Removes surrounding quotes and undoes `\"` and `\\` escapes.
pub fn strip_quotes(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('"')
        .map(|rest| rest.strip_suffix('"').unwrap_or(rest))
        .unwrap_or(trimmed);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_top_level_members_only() {
        let line = r#"{"type":"keyframe","t":1.5,"entities":[{"t":9,"id":"a,b"}]}"#;
        let record = LineRecord::parse(line).expect("record");
        assert_eq!(record.str_field("type").as_deref(), Some("keyframe"));
        assert_eq!(record.f64_field("t"), Some(1.5));
        let items = record.array_items("entities").expect("entities");
        assert_eq!(items, vec![r#"{"t":9,"id":"a,b"}"#]);
    }

    #[test]
    fn key_must_be_a_whole_member_name() {
        let record = LineRecord::parse(r#"{"rt":"CIRCLE","name":"t"}"#).expect("record");
        assert_eq!(record.raw("t"), None);
        assert_eq!(record.str_field("rt").as_deref(), Some("CIRCLE"));
    }

    #[test]
    fn tolerates_whitespace_and_unknown_fields() {
        let record =
            LineRecord::parse(r#"  { "uid" : 7 , "extra": {"nested": [1, 2]}, "x": -3.25 } "#)
                .expect("record");
        assert_eq!(record.i64_field("uid"), Some(7));
        assert_eq!(record.f32_field("x"), Some(-3.25));
    }

    #[test]
    fn truncated_line_keeps_complete_members() {
        let record =
            LineRecord::parse(r#"{"type":"keyframe","t":2.0,"entities":[{"uid":1},{"ui"#)
                .expect("record");
        assert_eq!(record.f64_field("t"), Some(2.0));
        let items = record.array_items("entities").expect("entities");
        assert_eq!(items[0], r#"{"uid":1}"#);
    }

    #[test]
    fn malformed_values_read_as_absent() {
        let record = LineRecord::parse(r#"{"uid":"abc","x":"1.0","color":[1,"g",0]}"#)
            .expect("record");
        assert_eq!(record.i64_field("uid"), None);
        assert_eq!(record.f64_field("x"), None);
        assert_eq!(record.f32_array("color"), None);
        assert_eq!(record.f64_field("missing"), None);
    }

    #[test]
    fn extract_balanced_skips_brackets_inside_strings() {
        let text = r#"[{"id":"]"},2] tail"#;
        assert_eq!(extract_balanced(text, 0), Some(r#"[{"id":"]"},2]"#));
        assert_eq!(extract_balanced("[1,2", 0), None);
        assert_eq!(extract_balanced("x[1]", 0), None);
    }

    #[test]
    fn strip_quotes_unescapes() {
        assert_eq!(strip_quotes(r#""say \"hi\"""#), r#"say "hi""#);
        assert_eq!(strip_quotes("bare"), "bare");
    }

    #[test]
    fn non_object_text_is_not_a_record() {
        assert!(LineRecord::parse("not json").is_none());
    }
}
