use std::collections::HashMap;
use url::form_urlencoded;

/// Decoded `application/x-www-form-urlencoded` fields. Values from the
/// request body override values from the query string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    pub fn parse(query: Option<&str>, body: &str) -> Self {
        let mut fields = HashMap::new();
        for source in [query.unwrap_or(""), body] {
            for (key, value) in form_urlencoded::parse(source.as_bytes()) {
                fields.insert(key.into_owned(), value.into_owned());
            }
        }
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Field value, or the empty string when absent.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }
}
