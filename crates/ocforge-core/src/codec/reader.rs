//! XML property-list decoder.
//!
//! A small pull parser that understands exactly the markup property lists use:
//! - an optional `<?xml ...?>` declaration, `<!DOCTYPE ...>` and comments
//! - an optional `<plist>` wrapper around a single value
//! - the value tags `dict`/`key`, `array`, `string`, `integer`, `real`,
//!   `true`, `false`, `data`, `date`
//! - the five predefined entities, numeric character references and CDATA
//!
//! Anything else is a format error. String content is never trimmed; the
//! content of numeric, date and data elements is.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use crate::errors::{OcError, OcResult};
use crate::value::{parse_date, Dict, DocumentValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
    Empty,
}

#[derive(Debug, Clone, Copy)]
struct Tag<'a> {
    name: &'a str,
    kind: TagKind,
    offset: usize,
}

pub(crate) struct Reader<'a> {
    src: &'a str,
    pos: usize,
    max_depth: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(src: &'a str, max_depth: usize) -> Self {
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Self {
            src,
            pos: 0,
            max_depth,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn err<T>(&self, msg: impl AsRef<str>) -> OcResult<T> {
        Err(OcError::format(format!("{} at byte {}", msg.as_ref(), self.pos)))
    }

    /// Parse the whole input into one value.
    pub(crate) fn read_document(&mut self) -> OcResult<DocumentValue> {
        let first = self.next_tag()?;
        let value = if first.name == "plist" {
            match first.kind {
                TagKind::Open => {
                    let inner = self.next_tag()?;
                    let v = self.read_value(inner, 0)?;
                    let close = self.next_tag()?;
                    if close.kind != TagKind::Close || close.name != "plist" {
                        return self.err(format!("expected </plist>, found <{}>", close.name));
                    }
                    v
                }
                TagKind::Empty => return self.err("empty <plist/> element"),
                TagKind::Close => return self.err("unexpected </plist>"),
            }
        } else {
            self.read_value(first, 0)?
        };

        self.skip_misc()?;
        if !self.rest().is_empty() {
            return self.err("trailing content after document");
        }
        Ok(value)
    }

    /// Skip whitespace, comments, processing instructions and doctype.
    fn skip_misc(&mut self) -> OcResult<()> {
        loop {
            let trimmed = self.rest().trim_start();
            self.pos = self.src.len() - trimmed.len();

            if trimmed.starts_with("<?") {
                self.skip_past("?>")?;
            } else if trimmed.starts_with("<!--") {
                self.skip_past("-->")?;
            } else if trimmed.starts_with("<!DOCTYPE") {
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_past(&mut self, end: &str) -> OcResult<()> {
        match self.rest().find(end) {
            Some(i) => {
                self.pos += i + end.len();
                Ok(())
            }
            None => self.err(format!("unterminated markup, expected '{end}'")),
        }
    }

    fn skip_doctype(&mut self) -> OcResult<()> {
        let mut bracket = 0usize;
        for (i, c) in self.rest().char_indices() {
            match c {
                '[' => bracket += 1,
                ']' => bracket = bracket.saturating_sub(1),
                '>' if bracket == 0 => {
                    self.pos += i + 1;
                    return Ok(());
                }
                _ => {}
            }
        }
        self.err("unterminated <!DOCTYPE>")
    }

    /// Read the next element tag, skipping insignificant content before it.
    fn next_tag(&mut self) -> OcResult<Tag<'a>> {
        self.skip_misc()?;
        let rest = self.rest();
        if rest.is_empty() {
            return self.err("unexpected end of document");
        }
        if !rest.starts_with('<') {
            return self.err("unexpected text outside of an element");
        }

        let offset = self.pos;
        let close = rest.starts_with("</");
        let body_start = if close { 2 } else { 1 };

        // Find the closing '>' while honoring quoted attribute values.
        let mut quote: Option<char> = None;
        let mut end = None;
        for (i, c) in rest[body_start..].char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"') | (None, '\'') => quote = Some(c),
                (None, '>') => {
                    end = Some(body_start + i);
                    break;
                }
                _ => {}
            }
        }
        let end = match end {
            Some(e) => e,
            None => return self.err("unterminated tag"),
        };

        let body = &rest[body_start..end];
        let (body, empty) = match body.strip_suffix('/') {
            Some(b) if !close => (b, true),
            _ => (body, false),
        };
        let name = body
            .split(|c: char| c.is_whitespace())
            .next()
            .unwrap_or("")
            .trim();
        if name.is_empty() {
            return self.err("tag without a name");
        }

        self.pos += end + 1;
        let kind = if close {
            TagKind::Close
        } else if empty {
            TagKind::Empty
        } else {
            TagKind::Open
        };
        Ok(Tag { name, kind, offset })
    }

    /// Read character data up to the closing tag `</name>`.
    fn read_text(&mut self, name: &str) -> OcResult<String> {
        let mut out = String::new();
        loop {
            let rest = self.rest();
            let lt = match rest.find('<') {
                Some(i) => i,
                None => return self.err(format!("unterminated <{name}>")),
            };
            out.push_str(&self.unescape(&rest[..lt])?);
            self.pos += lt;

            let rest = self.rest();
            if let Some(cdata) = rest.strip_prefix("<![CDATA[") {
                match cdata.find("]]>") {
                    Some(i) => {
                        out.push_str(&cdata[..i]);
                        self.pos += "<![CDATA[".len() + i + 3;
                    }
                    None => return self.err("unterminated CDATA section"),
                }
                continue;
            }
            if rest.starts_with("<!--") {
                self.skip_past("-->")?;
                continue;
            }
            break;
        }

        let close = self.next_tag()?;
        if close.kind != TagKind::Close || close.name != name {
            return Err(OcError::format(format!(
                "expected </{name}>, found <{}> at byte {}",
                close.name, close.offset
            )));
        }
        Ok(out)
    }

    fn unescape(&self, raw: &str) -> OcResult<String> {
        if !raw.contains('&') {
            return Ok(raw.to_string());
        }
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let after = &rest[amp + 1..];
            let semi = match after.find(';') {
                Some(s) => s,
                None => return self.err("unterminated entity reference"),
            };
            let entity = &after[..semi];
            let ch = match entity {
                "amp" => '&',
                "lt" => '<',
                "gt" => '>',
                "quot" => '"',
                "apos" => '\'',
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x") {
                        u32::from_str_radix(hex, 16).ok()
                    } else if let Some(dec) = entity.strip_prefix('#') {
                        dec.parse::<u32>().ok()
                    } else {
                        None
                    };
                    match code.and_then(char::from_u32) {
                        Some(c) => c,
                        None => return self.err(format!("unknown entity &{entity};")),
                    }
                }
            };
            out.push(ch);
            rest = &after[semi + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn read_value(&mut self, tag: Tag<'a>, depth: usize) -> OcResult<DocumentValue> {
        if tag.kind == TagKind::Close {
            return Err(OcError::format(format!(
                "unexpected </{}> at byte {}",
                tag.name, tag.offset
            )));
        }
        if depth >= self.max_depth {
            return Err(OcError::format(format!(
                "nesting deeper than {} at byte {}",
                self.max_depth, tag.offset
            )));
        }
        let empty = tag.kind == TagKind::Empty;

        match tag.name {
            "dict" => {
                let mut d = Dict::new();
                if empty {
                    return Ok(DocumentValue::Mapping(d));
                }
                loop {
                    let t = self.next_tag()?;
                    match (t.name, t.kind) {
                        ("dict", TagKind::Close) => break,
                        ("key", TagKind::Open) => {
                            let key = self.read_text("key")?;
                            let vt = self.next_tag()?;
                            let v = self.read_value(vt, depth + 1)?;
                            d.insert(key, v);
                        }
                        ("key", TagKind::Empty) => {
                            let vt = self.next_tag()?;
                            let v = self.read_value(vt, depth + 1)?;
                            d.insert(String::new(), v);
                        }
                        _ => {
                            return Err(OcError::format(format!(
                                "expected <key> inside <dict>, found <{}> at byte {}",
                                t.name, t.offset
                            )))
                        }
                    }
                }
                Ok(DocumentValue::Mapping(d))
            }
            "array" => {
                let mut items = Vec::new();
                if empty {
                    return Ok(DocumentValue::Sequence(items));
                }
                loop {
                    let t = self.next_tag()?;
                    if t.kind == TagKind::Close && t.name == "array" {
                        break;
                    }
                    items.push(self.read_value(t, depth + 1)?);
                }
                Ok(DocumentValue::Sequence(items))
            }
            "string" => {
                if empty {
                    return Ok(DocumentValue::String(String::new()));
                }
                Ok(DocumentValue::String(self.read_text("string")?))
            }
            "integer" => {
                let text = self.scalar_text(tag)?;
                parse_integer(text.trim())
                    .map(DocumentValue::Integer)
                    .ok_or_else(|| {
                        OcError::format(format!(
                            "invalid integer '{}' at byte {}",
                            text.trim(),
                            tag.offset
                        ))
                    })
            }
            "real" => {
                let text = self.scalar_text(tag)?;
                text.trim()
                    .parse::<f64>()
                    .map(DocumentValue::Real)
                    .map_err(|_| {
                        OcError::format(format!(
                            "invalid real '{}' at byte {}",
                            text.trim(),
                            tag.offset
                        ))
                    })
            }
            "true" | "false" => {
                if !empty {
                    let text = self.read_text(tag.name)?;
                    if !text.trim().is_empty() {
                        return Err(OcError::format(format!(
                            "<{}> must be empty at byte {}",
                            tag.name, tag.offset
                        )));
                    }
                }
                Ok(DocumentValue::Boolean(tag.name == "true"))
            }
            "data" => {
                let text = if empty {
                    String::new()
                } else {
                    self.read_text("data")?
                };
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                BASE64_STANDARD
                    .decode(compact.as_bytes())
                    .map(DocumentValue::Binary)
                    .map_err(|e| {
                        OcError::format(format!("invalid base64 in <data> at byte {}: {e}", tag.offset))
                    })
            }
            "date" => {
                let text = self.scalar_text(tag)?;
                parse_date(&text).map(DocumentValue::Date).ok_or_else(|| {
                    OcError::format(format!(
                        "invalid date '{}' at byte {}",
                        text.trim(),
                        tag.offset
                    ))
                })
            }
            other => Err(OcError::format(format!(
                "unknown tag <{other}> at byte {}",
                tag.offset
            ))),
        }
    }

    /// Text of a scalar element that must not be empty.
    fn scalar_text(&mut self, tag: Tag<'a>) -> OcResult<String> {
        if tag.kind == TagKind::Empty {
            return Err(OcError::format(format!(
                "empty <{}/> at byte {}",
                tag.name, tag.offset
            )));
        }
        self.read_text(tag.name)
    }
}

/// Decimal, or hexadecimal with a `0x` prefix, optionally signed.
pub fn parse_integer(s: &str) -> Option<i64> {
    let (neg, body) = match s.strip_prefix('-') {
        Some(b) => (true, b),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        let magnitude = i128::from_str_radix(hex, 16).ok()?;
        let signed = if neg { -magnitude } else { magnitude };
        return i64::try_from(signed).ok();
    }
    s.parse::<i64>().ok()
}
