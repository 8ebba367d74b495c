use std::collections::HashMap;

use url::form_urlencoded;

/// Request parameters merged from the query string and a form-encoded body.
///
/// Browsers post forms while scripts often put everything in the query, so
/// both are accepted. The first occurrence of a key wins, query first.
#[derive(Debug, Default)]
pub(crate) struct Params(HashMap<String, String>);

impl Params {
    pub fn parse(query: Option<&str>, body: &[u8]) -> Self {
        let mut params = HashMap::new();
        let query = form_urlencoded::parse(query.unwrap_or_default().as_bytes());
        for (key, value) in query.chain(form_urlencoded::parse(body)) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self(params)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn take(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }
}
