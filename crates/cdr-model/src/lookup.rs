use std::collections::HashMap;

/// Case-insensitive name lookup preserving the first-seen spelling.
///
/// Used wherever raw headers are matched against canonical column names.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveLookup {
    map: HashMap<String, String>,
}

impl CaseInsensitiveLookup {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let key = name.to_ascii_lowercase();
            map.entry(key).or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    /// The stored spelling for `name`, matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
