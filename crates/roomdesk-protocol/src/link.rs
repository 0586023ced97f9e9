//! Deep-link parsing and formatting.
//!
//! The part after `<scheme>:` is read as `//<action>?<query>`. Keys and
//! values are percent-decoded (`+` reads as a space). [`build_url`] is the
//! exact inverse: `parse(build_url(a, p)) == (a, p)` for any strings.

use std::collections::BTreeMap;

use roomdesk_common::errors::ParseError;

/// A parsed deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    pub action: String,
    pub params: BTreeMap<String, String>,
}

impl DeepLink {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// A query parameter, or `default` when absent.
    pub fn param_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.params.get(key).map(String::as_str).unwrap_or(default)
    }
}

/// Whether `url` starts with `<scheme>:` (scheme compared case-insensitively).
pub fn has_scheme(scheme: &str, url: &str) -> bool {
    strip_scheme(scheme, url).is_some()
}

fn strip_scheme<'a>(scheme: &str, url: &'a str) -> Option<&'a str> {
    let head = url.get(..scheme.len())?;
    if !head.eq_ignore_ascii_case(scheme) {
        return None;
    }
    url[scheme.len()..].strip_prefix(':')
}

/// Parse `url` as a deep link for `scheme`.
pub fn parse(scheme: &str, url: &str) -> Result<DeepLink, ParseError> {
    let url = url.trim();
    let rest = strip_scheme(scheme, url).ok_or_else(|| ParseError::WrongScheme {
        expected: scheme.to_string(),
    })?;
    let rest = rest.strip_prefix("//").ok_or(ParseError::MissingAuthority)?;

    let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

    let action = decode(path.trim_end_matches('/'))?;
    if action.is_empty() {
        return Err(ParseError::MissingAction);
    }

    let mut params = BTreeMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(key)?;
        let value = decode(value)?;
        // First occurrence wins.
        params.entry(key).or_insert(value);
    }

    Ok(DeepLink { action, params })
}

/// Format a deep link. Inverse of [`parse`].
pub fn build_url(scheme: &str, action: &str, params: &BTreeMap<String, String>) -> String {
    let mut url = format!("{scheme}://{}", urlencoding::encode(action));
    if !params.is_empty() {
        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        url.push('?');
        url.push_str(&query.join("&"));
    }
    url
}

fn decode(raw: &str) -> Result<String, ParseError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .map_err(|_| ParseError::InvalidEncoding(raw.to_string()))
}
