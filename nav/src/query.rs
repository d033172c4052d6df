//! Query codec: parse a path+query into a case-insensitive snapshot and
//! serialize a snapshot back into a rooted URL string.

use crate::error::NavError;
use percent_encoding::percent_decode_str;
use url::Url;
use url::form_urlencoded;

const PARSE_BASE: &str = "https://portal.invalid/";

/// Ordered mapping from case-insensitive key to value. A key with a blank
/// or whitespace value is equivalent to the key being absent; writes go
/// through [`Snapshot::merged`] and never mutate a snapshot shared with a
/// reader.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pairs: Vec<(String, String)>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in pairs {
            snapshot.insert(key, value);
        }
        snapshot
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or replaces a value, keeping the key's original position.
    /// A blank value removes the key.
    pub fn insert(&mut self, key: &str, value: &str) {
        if value.trim().is_empty() {
            self.remove(key);
            return;
        }
        match self
            .pairs
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
        {
            Some((_, existing_value)) => *existing_value = value.to_string(),
            None => self.pairs.push((key.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(key));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns a new snapshot with `overrides` applied on top of `self`.
    /// A `None` override value removes the key.
    pub fn merged(&self, overrides: &[(&str, Option<&str>)]) -> Snapshot {
        let mut next = self.clone();
        for (key, value) in overrides {
            match value {
                Some(value) => next.insert(key, value),
                None => next.remove(key),
            }
        }
        next
    }
}

/// Equal when both snapshots hold the same pairs, modulo key case and
/// ordering.
impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.pairs.len() == other.pairs.len()
            && self
                .pairs
                .iter()
                .all(|(key, value)| other.get(key) == Some(value.as_str()))
    }
}

impl Eq for Snapshot {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLocation {
    pub path: String,
    pub query: Snapshot,
}

/// Splits path from query/fragment and parses the query into a snapshot.
/// Duplicate keys: last occurrence wins. Percent-decoding failures degrade
/// to the literal string; only an input that cannot be parsed as a URI at
/// all is an error.
pub fn parse_uri(uri: &str) -> Result<ParsedLocation, NavError> {
    if uri.chars().any(char::is_control) {
        return Err(NavError::MalformedUri(uri.to_string()));
    }
    let base =
        Url::parse(PARSE_BASE).map_err(|err| NavError::MalformedUri(format!("{uri}: {err}")))?;
    base.join(uri)
        .map_err(|err| NavError::MalformedUri(format!("{uri}: {err}")))?;

    let local = strip_origin(uri);
    let without_fragment = match local.split_once('#') {
        Some((head, _)) => head,
        None => local,
    };
    let (raw_path, raw_query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (without_fragment, ""),
    };
    let mut query = Snapshot::new();
    for pair in raw_query.split('&').filter(|pair| !pair.is_empty()) {
        let (raw_key, raw_value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        let key = decode_component(raw_key);
        if key.trim().is_empty() {
            continue;
        }
        let value = decode_component(raw_value);
        if value.trim().is_empty() {
            query.remove(&key);
        } else {
            query.insert(&key, &value);
        }
    }
    Ok(ParsedLocation {
        path: root_path(raw_path),
        query,
    })
}

/// Percent-encodes keys and values (space as `+`), omits nothing the
/// snapshot still holds (blank values are already normalized away), joins
/// with `&` and prefixes `?` only when at least one pair remains. The
/// result is always rooted.
pub fn serialize(path: &str, snapshot: &Snapshot) -> String {
    let rooted = root_path(path);
    let mut pairs = Vec::with_capacity(snapshot.len());
    for (key, value) in snapshot.iter() {
        let key: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
        let value: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
        pairs.push(format!("{key}={value}"));
    }
    if pairs.is_empty() {
        rooted
    } else {
        format!("{rooted}?{}", pairs.join("&"))
    }
}

/// Case-insensitive path comparison, trailing slash ignored.
pub fn paths_equal(left: &str, right: &str) -> bool {
    let left = root_path(left);
    let right = root_path(right);
    trim_trailing_slash(&left).eq_ignore_ascii_case(trim_trailing_slash(&right))
}

fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

pub(crate) fn root_path(path: &str) -> String {
    let path = strip_origin(path);
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Drops a `scheme://authority` prefix so absolute hrefs compare and parse
/// like local ones.
fn strip_origin(uri: &str) -> &str {
    let Some(scheme_end) = uri.find("://") else {
        return uri;
    };
    if uri[..scheme_end].contains(['/', '?', '#']) {
        return uri;
    }
    let rest = &uri[scheme_end + 3..];
    match rest.find(['/', '?', '#']) {
        Some(index) => &rest[index..],
        None => "",
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match percent_decode_str(&spaced).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
