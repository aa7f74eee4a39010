//! `?artwork=<id>` deep links into the feed

use gv_core::ArtworkId;
use url::form_urlencoded;
use url::Url;

/// Query parameter carrying the target artwork
pub const ARTWORK_PARAM: &str = "artwork";

/// Target artwork of a link.
///
/// Accepts a full URL, a query string with or without the leading `?`, or a
/// path followed by a query. Missing, non-numeric and zero ids yield `None`.
pub fn parse_artwork_param(link: &str) -> Option<ArtworkId> {
    let link = link.trim();

    let value = match Url::parse(link) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == ARTWORK_PARAM)
            .map(|(_, value)| value.into_owned()),
        Err(_) => {
            let query = match link.split_once('?') {
                Some((_, query)) => query,
                None => link,
            };
            let query = query.split('#').next().unwrap_or_default();
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == ARTWORK_PARAM)
                .map(|(_, value)| value.into_owned())
        }
    }?;

    value.trim().parse::<ArtworkId>().ok().filter(|id| *id > 0)
}

/// Link to `base` that opens the feed at `id`. Existing query parameters
/// are kept; a previous `artwork` parameter is replaced.
pub fn artwork_link(base: &str, id: ArtworkId) -> String {
    if let Ok(mut url) = Url::parse(base) {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != ARTWORK_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(ARTWORK_PARAM, &id.to_string());
        return url.into();
    }

    let (path, query) = base.split_once('?').unwrap_or((base, ""));
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key != ARTWORK_PARAM {
            serializer.append_pair(&key, &value);
        }
    }
    serializer.append_pair(ARTWORK_PARAM, &id.to_string());
    format!("{}?{}", path, serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_artwork_param("?artwork=12"), Some(12));
        assert_eq!(parse_artwork_param("artwork=12"), Some(12));
        assert_eq!(parse_artwork_param("/feed?view=list&artwork=7#top"), Some(7));
        assert_eq!(
            parse_artwork_param("https://gallery.example/feed?artwork=25&lang=ko"),
            Some(25)
        );
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert_eq!(parse_artwork_param(""), None);
        assert_eq!(parse_artwork_param("?view=grid"), None);
        assert_eq!(parse_artwork_param("?artwork="), None);
        assert_eq!(parse_artwork_param("?artwork=abc"), None);
        assert_eq!(parse_artwork_param("?artwork=0"), None);
        assert_eq!(parse_artwork_param("?artwork=-3"), None);
        assert_eq!(parse_artwork_param("https://gallery.example/feed"), None);
    }

    #[test]
    fn test_build_links() {
        assert_eq!(artwork_link("/feed", 4), "/feed?artwork=4");
        assert_eq!(artwork_link("/feed?view=list&artwork=1", 4), "/feed?view=list&artwork=4");
        assert_eq!(
            artwork_link("https://gallery.example/feed", 9),
            "https://gallery.example/feed?artwork=9"
        );
        assert_eq!(parse_artwork_param(&artwork_link("/feed", 31)), Some(31));
    }
}
