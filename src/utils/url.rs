//! URL and query-string helpers.

use crate::constants::{QS_CLIENT_ID, QS_REDIRECT_URI};
use crate::models::ClientConfig;
use std::collections::HashMap;
use url::Url;

/// Strip one trailing slash, if present
#[must_use]
pub fn remove_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

fn query_of(url: &str) -> Option<&str> {
    let query = url.split_once('?')?.1;
    Some(query.split_once('#').map_or(query, |(q, _)| q))
}

/// Value of a single query-string parameter of `url`, decoded
#[must_use]
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let query = query_of(url)?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// All query-string parameters of `url`, decoded
#[must_use]
pub fn query_params(url: &str) -> HashMap<String, String> {
    query_of(url)
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}

/// Remove one parameter from a URL's query string. A query left empty drops
/// the `?` entirely; a URL without a query string passes through unchanged.
#[must_use]
pub fn remove_query_param(url: &str, parameter: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_owned();
    };
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key != parameter {
            serializer.append_pair(&key, &value);
        }
    }
    let query = serializer.finish();
    if query.is_empty() {
        base.to_owned()
    } else {
        format!("{base}?{query}")
    }
}

/// Build a broker URL from the configuration: base URL, an optional extra
/// path segment, then `clientId`, `redirectUri` and any extra parameters in
/// that order
#[must_use]
pub fn build_broker_url(
    config: &ClientConfig,
    additional_path: Option<&str>,
    additional_params: &[(&str, &str)],
) -> String {
    let sso_url = remove_trailing_slash(&config.sso_url);
    let path = match additional_path {
        None | Some("") => String::new(),
        Some(path) if path.starts_with('/') => path.to_owned(),
        Some(path) => format!("/{path}"),
    };
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    serializer.append_pair(QS_CLIENT_ID, &config.client_id);
    serializer.append_pair(QS_REDIRECT_URI, &config.redirect_uri);
    for (key, value) in additional_params {
        serializer.append_pair(key, value);
    }
    format!("{sso_url}{path}?{}", serializer.finish())
}

/// Origin (`scheme://host[:port]`) of a URL, when it parses
#[must_use]
pub fn page_origin(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .map(|parsed| parsed.origin().ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        let mut config = ClientConfig::new();
        config.client_id = "client-1".into();
        config.redirect_uri = "https://app.example.com/".into();
        config.sso_url = "https://sso.example.com".into();
        config
    }

    #[test]
    fn trailing_slash_is_trimmed_once() {
        assert_eq!(remove_trailing_slash("https://a.example/"), "https://a.example");
        assert_eq!(remove_trailing_slash("https://a.example"), "https://a.example");
        assert_eq!(remove_trailing_slash(""), "");
    }

    #[test]
    fn query_lookup_decodes_values() {
        let url = "https://app.example.com/page?code=1234&state=a%20b#frag";
        assert_eq!(query_param(url, "code"), Some("1234".into()));
        assert_eq!(query_param(url, "state"), Some("a b".into()));
        assert_eq!(query_param(url, "missing"), None);
        assert_eq!(query_param("https://app.example.com/page", "code"), None);

        let params = query_params(url);
        assert_eq!(params.len(), 2);
        assert_eq!(params["code"], "1234");
    }

    #[test]
    fn removing_a_parameter_keeps_the_rest() {
        let url = "https://app.example.com/page?code=1234&state=xyz";
        assert_eq!(
            remove_query_param(url, "code"),
            "https://app.example.com/page?state=xyz"
        );
    }

    #[test]
    fn removing_the_only_parameter_drops_the_query() {
        let url = "https://app.example.com/page?code=1234";
        assert_eq!(remove_query_param(url, "code"), "https://app.example.com/page");
    }

    #[test]
    fn removing_an_absent_parameter_changes_nothing_without_a_query() {
        let url = "https://app.example.com/page";
        assert_eq!(remove_query_param(url, "code"), url);
    }

    #[test]
    fn broker_url_carries_ordered_parameters() {
        let url = build_broker_url(&config(), None, &[("codeChallenge", "abc")]);
        assert_eq!(
            url,
            "https://sso.example.com?clientId=client-1&redirectUri=https%3A%2F%2Fapp.example.com%2F&codeChallenge=abc"
        );
    }

    #[test]
    fn broker_url_normalizes_the_extra_path_segment() {
        let url = build_broker_url(&config(), Some("logout"), &[]);
        assert!(url.starts_with("https://sso.example.com/logout?clientId="));
        let url = build_broker_url(&config(), Some("/logout"), &[]);
        assert!(url.starts_with("https://sso.example.com/logout?clientId="));
    }

    #[test]
    fn origin_extraction() {
        assert_eq!(
            page_origin("https://app.example.com:8443/page?x=1"),
            Some("https://app.example.com:8443".into())
        );
        assert_eq!(page_origin("not a url"), None);
    }
}
