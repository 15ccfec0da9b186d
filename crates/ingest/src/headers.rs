use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read access to response headers with case-insensitive names.
pub trait HeaderSource {
    fn header(&self, name: &str) -> Option<&str>;
}

impl HeaderSource for http::HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|value| value.to_str().ok())
    }
}

impl<S: BuildHasher> HeaderSource for HashMap<String, String, S> {
    fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.get(name) {
            return Some(value.as_str());
        }
        find_ignore_case(
            self.iter().map(|(key, value)| (key.as_str(), value.as_str())),
            name,
        )
    }
}

impl HeaderSource for BTreeMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.get(name) {
            return Some(value.as_str());
        }
        find_ignore_case(
            self.iter().map(|(key, value)| (key.as_str(), value.as_str())),
            name,
        )
    }
}

impl<K: AsRef<str>, V: AsRef<str>> HeaderSource for [(K, V)] {
    fn header(&self, name: &str) -> Option<&str> {
        find_ignore_case(
            self.iter().map(|(key, value)| (key.as_ref(), value.as_ref())),
            name,
        )
    }
}

fn find_ignore_case<'a>(
    mut pairs: impl Iterator<Item = (&'a str, &'a str)>,
    name: &str,
) -> Option<&'a str> {
    pairs
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}
