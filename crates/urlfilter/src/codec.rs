//! `application/x-www-form-urlencoded` query strings.
//!
//! Thin wrappers over `form_urlencoded` that tolerate a leading `?` and
//! never fail: invalid percent escapes decode to their literal text and
//! invalid UTF-8 is replaced, the same way browsers read `location.search`.

/// Decodes a query string into `(key, value)` pairs in input order.
///
/// Duplicate keys are kept; resolving them is the caller's concern.
/// A pair without `=` decodes to an empty value.
pub fn decode(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Encodes pairs into a query string without a leading `?`.
pub fn encode<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    serializer.finish()
}
