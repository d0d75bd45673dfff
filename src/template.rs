//! `$name` / `${name}` placeholder expansion from stored variables.

use std::collections::HashMap;

use regex::{Captures, Regex};

use crate::error::StoreError;
use crate::http::Request;
use crate::variables::VariableStore;

/// `${name}` or bare `$name`; names are identifier-shaped.
static PLACEHOLDER: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)").unwrap()
});

/// Replace known placeholders in `input`. Unknown ones are left as written.
pub fn expand(input: &str, vars: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(input, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match vars.get(name) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Expand placeholders in the URL, header values and body of `request`.
///
/// Header names are left alone.
pub async fn expand_request(
    request: &mut Request,
    store: &dyn VariableStore,
) -> Result<(), StoreError> {
    let vars: HashMap<String, String> = store.list().await?.into_iter().collect();
    if vars.is_empty() {
        return Ok(());
    }

    request.url = expand(&request.url, &vars);
    for header in &mut request.headers {
        header.value = expand(&header.value, &vars);
    }
    if let Some(body) = request.body.as_mut() {
        *body = expand(body, &vars);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::MemoryStore;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn braced_and_bare_forms_expand() {
        let vars = vars(&[("host", "localhost:3000"), ("id", "7")]);
        assert_eq!(
            expand("http://${host}/api/levels/$id", &vars),
            "http://localhost:3000/api/levels/7"
        );
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        let vars = vars(&[("known", "x")]);
        assert_eq!(expand("$known ${unknown} $missing", &vars), "x ${unknown} $missing");
    }

    #[test]
    fn lone_dollar_is_untouched() {
        assert_eq!(expand("costs $5 or $", &vars(&[])), "costs $5 or $");
    }

    #[tokio::test]
    async fn request_fields_expand_but_header_names_do_not() {
        let store = MemoryStore::with_vars([("base", "http://api.test"), ("user", "ada")]);
        let mut request = crate::http::Request::post("$base/api/users/login")
            .header("X-$user", "$user")
            .body(r#"{"username": "${user}"}"#);

        expand_request(&mut request, &store).await.unwrap();

        assert_eq!(request.url, "http://api.test/api/users/login");
        assert_eq!(request.headers[0].name, "X-$user");
        assert_eq!(request.headers[0].value, "ada");
        assert_eq!(request.body.as_deref(), Some(r#"{"username": "ada"}"#));
    }
}
