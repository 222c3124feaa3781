//! Loading of the optional local property file.
//!
//! The file uses the conventional `.properties` text format:
//!
//! ```text
//! # comment            ! also a comment
//! key=value            key: value           key value
//! long.value = first \
//!              second
//! escaped\ key = tab\there \u00e9
//! ```
//!
//! Bytes are decoded as ISO-8859-1; characters outside that range are
//! written with `\uXXXX` escapes. The only parse failure is a malformed
//! `\u` escape, which is fatal.

use std::collections::HashMap;
use std::io::ErrorKind;

use crate::config::PropagationConfig;

/// Ordered key/value pairs read from a property file.
///
/// Keys keep the position of their first appearance; a repeated key
/// replaces the earlier value (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFile {
    entries: Vec<(String, String)>,
    /// Key -> position in `entries`
    index: HashMap<String, usize>,
}

impl PropertyFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let &pos = self.index.get(key)?;
        Some(self.entries[pos].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyFile {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut file = Self::new();
        for (k, v) in iter {
            file.insert(k, v);
        }
        file
    }
}

/// A malformed escape in a property file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line on which the offending logical line starts
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unterminated \\uXXXX escape")]
    TruncatedUnicodeEscape,

    #[error("invalid character {0:?} in \\uXXXX escape")]
    InvalidUnicodeEscape(char),

    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u32),
}

/// Locates and reads the property file named by a [`PropagationConfig`].
pub struct PropertySource;

impl PropertySource {
    /// Read the property file under the config's root directory.
    ///
    /// A missing file yields an empty [`PropertyFile`]: most checkouts have
    /// no local secrets.
    ///
    /// # Errors
    ///
    /// - [`Error::PropertyFileRead`](crate::Error::PropertyFileRead) if the file exists but cannot be read
    /// - [`Error::MalformedSource`](crate::Error::MalformedSource) if it contains a malformed escape
    pub fn load(config: &PropagationConfig) -> crate::Result<PropertyFile> {
        let path = config.property_file_path();

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no property file; nothing to propagate");
                return Ok(PropertyFile::new());
            }
            Err(e) => return Err(crate::Error::PropertyFileRead { path, source: e }),
        };

        let text = decode_latin1(&bytes);
        let properties = parse(&text).map_err(|e| crate::Error::MalformedSource {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(
            path = %path.display(),
            keys = properties.len(),
            "property file loaded"
        );
        Ok(properties)
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Parse property-file text into ordered key/value pairs.
pub fn parse(input: &str) -> Result<PropertyFile, ParseError> {
    let mut properties = PropertyFile::new();
    let mut lines = natural_lines(input).enumerate();

    while let Some((index, line)) = lines.next() {
        let line = skip_whitespace(line);
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = String::new();
        let mut current = line;
        loop {
            if !ends_with_continuation(current) {
                logical.push_str(current);
                break;
            }
            logical.push_str(&current[..current.len() - 1]);
            match lines.next() {
                Some((_, next)) => current = skip_whitespace(next),
                None => break,
            }
        }

        let chars: Vec<char> = logical.chars().collect();
        let (key, value) = split_key_value(&chars);
        let to_error = |kind| ParseError {
            line: index + 1,
            kind,
        };
        let key = unescape(key).map_err(to_error)?;
        let value = unescape(value).map_err(to_error)?;

        if let Some(previous) = properties.get(&key)
            && previous != value
        {
            tracing::debug!(key = %key, line = index + 1, "duplicate key; later value wins");
        }
        properties.insert(key, value);
    }

    Ok(properties)
}

/// Split on `\n`, `\r` and `\r\n`.
fn natural_lines(input: &str) -> impl Iterator<Item = &str> {
    let mut rest = input;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\n', '\r']) {
            Some(end) => {
                let line = &rest[..end];
                let skip = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000C}')
}

fn skip_whitespace(line: &str) -> &str {
    line.trim_start_matches(is_whitespace)
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Find the raw key and value of a logical line. Escapes are still in place.
fn split_key_value(line: &[char]) -> (&[char], &[char]) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (i, &c) in line.iter().enumerate() {
        if !escaped && (c == '=' || c == ':') {
            key_end = i;
            value_start = i + 1;
            has_separator = true;
            break;
        }
        if !escaped && is_whitespace(c) {
            key_end = i;
            value_start = i + 1;
            break;
        }
        escaped = c == '\\' && !escaped;
    }

    while let Some(&c) = line.get(value_start) {
        if is_whitespace(c) {
            value_start += 1;
        } else if !has_separator && (c == '=' || c == ':') {
            has_separator = true;
            value_start += 1;
        } else {
            break;
        }
    }

    (&line[..key_end], &line[value_start..])
}

fn unescape(raw: &[char]) -> Result<String, ParseErrorKind> {
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let c = raw[i];
        i += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&escaped) = raw.get(i) else {
            break;
        };
        i += 1;
        match escaped {
            'u' => {
                let unit = read_hex4(raw, i)?;
                i += 4;
                out.push(decode_unit(unit, raw, &mut i)?);
            }
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'n' => out.push('\n'),
            'f' => out.push('\u{000C}'),
            other => out.push(other),
        }
    }

    Ok(out)
}

fn read_hex4(raw: &[char], start: usize) -> Result<u32, ParseErrorKind> {
    let digits = raw
        .get(start..start + 4)
        .ok_or(ParseErrorKind::TruncatedUnicodeEscape)?;
    digits.iter().try_fold(0u32, |acc, &d| {
        d.to_digit(16)
            .map(|v| (acc << 4) | v)
            .ok_or(ParseErrorKind::InvalidUnicodeEscape(d))
    })
}

/// Turn one UTF-16 unit into a char, consuming a following `\uXXXX` low
/// surrogate when `unit` is a high surrogate.
fn decode_unit(unit: u32, raw: &[char], i: &mut usize) -> Result<char, ParseErrorKind> {
    match unit {
        0xD800..=0xDBFF => {
            let follows_escape = raw.get(*i) == Some(&'\\') && raw.get(*i + 1) == Some(&'u');
            if !follows_escape {
                return Err(ParseErrorKind::UnpairedSurrogate(unit));
            }
            let low = read_hex4(raw, *i + 2)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(ParseErrorKind::UnpairedSurrogate(unit));
            }
            *i += 6;
            let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
            char::from_u32(code).ok_or(ParseErrorKind::UnpairedSurrogate(unit))
        }
        0xDC00..=0xDFFF => Err(ParseErrorKind::UnpairedSurrogate(unit)),
        _ => char::from_u32(unit).ok_or(ParseErrorKind::UnpairedSurrogate(unit)),
    }
}
