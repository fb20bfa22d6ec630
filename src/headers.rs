/// Headers exactly as the backend sent them. The same logical header may
/// appear under two casings as two distinct entries.
pub type RawHeaders = Vec<(String, String)>;

/// Look up a header regardless of the casing the backend used. An exact-case
/// entry always wins; otherwise the first case-insensitive hit in scan order
/// is returned. Absence is a normal outcome.
pub fn lookup<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    if let Some((_, value)) = headers.iter().find(|(key, _)| key == name) {
        return Some(value.as_str());
    }

    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

pub fn contains(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(name))
}

/// The header map attached to an adapted message. Entries are kept sorted by
/// case-insensitive name; a case-insensitive duplicate replaces the value but
/// keeps the first-seen key casing. Built once per adaptation, immutable
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedHeaders {
    entries: Vec<(String, String)>,
}

impl NormalizedHeaders {
    pub fn from_raw(raw: &[(String, String)]) -> Self {
        let mut entries: Vec<(String, String)> = Vec::with_capacity(raw.len());

        for (key, value) in raw {
            match entries.binary_search_by(|(k, _)| cmp_ignore_case(k, key)) {
                Ok(idx) => entries[idx].1 = value.clone(),
                Err(idx) => entries.insert(idx, (key.clone(), value.clone())),
            }
        }

        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .binary_search_by(|(k, _)| cmp_ignore_case(k, name))
            .ok()
            .map(|idx| self.entries[idx].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> std::cmp::Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}
