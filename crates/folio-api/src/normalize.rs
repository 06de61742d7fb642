//! Website URL normalisation.

use url::Url;

/// Normalise a user-supplied website into a canonical absolute URL.
///
/// - a missing scheme defaults to `http` (`//host` and bare `host` alike);
/// - with `force_https`, `http` is upgraded to `https`;
/// - the host is lowercased and a leading `www.` is dropped;
/// - `utm_*` query parameters are removed and the rest sorted by key;
/// - a trailing slash on the path is removed.
pub fn normalize_url(input: &str, force_https: bool) -> Result<String, url::ParseError> {
  let trimmed = input.trim();
  let absolute = if let Some(rest) = trimmed.strip_prefix("//") {
    format!("http://{rest}")
  } else if trimmed.contains("://") {
    trimmed.to_string()
  } else {
    format!("http://{trimmed}")
  };

  let mut url = Url::parse(&absolute)?;

  if force_https && url.scheme() == "http" {
    // Switching between two special schemes cannot fail.
    let _ = url.set_scheme("https");
  }

  if let Some(bare) = url
    .host_str()
    .and_then(|h| h.strip_prefix("www."))
    .filter(|rest| rest.contains('.'))
    .map(str::to_string)
  {
    url.set_host(Some(&bare))?;
  }

  if url.query().is_some() {
    let mut pairs: Vec<(String, String)> = url
      .query_pairs()
      .filter(|(k, _)| !k.to_ascii_lowercase().starts_with("utm_"))
      .map(|(k, v)| (k.into_owned(), v.into_owned()))
      .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    if pairs.is_empty() {
      url.set_query(None);
    } else {
      url.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
  }

  let path = url.path().to_string();
  if path.len() > 1 && path.ends_with('/') {
    url.set_path(path.trim_end_matches('/'));
  }

  let mut out = String::from(url);
  let bare_root = out.ends_with('/') && !out.contains('?') && !out.contains('#');
  if bare_root {
    out.pop();
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn https(s: &str) -> String { normalize_url(s, true).unwrap() }

  #[test]
  fn bare_host_gains_secure_scheme() {
    assert_eq!(https("example.com"), "https://example.com");
    assert_eq!(https("//example.com"), "https://example.com");
  }

  #[test]
  fn http_is_upgraded_only_when_forced() {
    assert_eq!(https("http://example.com/about"), "https://example.com/about");
    assert_eq!(
      normalize_url("http://example.com/about", false).unwrap(),
      "http://example.com/about"
    );
  }

  #[test]
  fn host_is_canonicalised() {
    assert_eq!(https("WWW.Example.COM"), "https://example.com");
    assert_eq!(https("https://example.com:443/"), "https://example.com");
    assert_eq!(https("www.com"), "https://www.com");
  }

  #[test]
  fn tracking_params_dropped_and_rest_sorted() {
    assert_eq!(
      https("example.com/?utm_source=x&b=2&a=1"),
      "https://example.com/?a=1&b=2"
    );
    assert_eq!(https("example.com/blog/?utm_medium=y"), "https://example.com/blog");
  }

  #[test]
  fn trailing_path_slash_removed() {
    assert_eq!(https("example.com/blog/"), "https://example.com/blog");
  }

  #[test]
  fn unparseable_input_is_an_error() {
    assert!(normalize_url("http://", true).is_err());
    assert!(normalize_url("exa mple.com", true).is_err());
  }
}
