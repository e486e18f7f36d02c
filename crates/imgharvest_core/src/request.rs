use url::form_urlencoded::byte_serialize;

use crate::SearchSession;

pub const DEFAULT_SEARCH_BASE: &str = "https://www.bing.com";

/// Builds the async results URL for one page.
///
/// The output depends only on the session parameters and `page_index`. The
/// query is form-encoded (spaces become `+`); the filter code is appended
/// verbatim because the engine expects its leading `+` unescaped.
pub fn build_page_url(search_base: &str, session: &SearchSession, page_index: u32) -> String {
    let base = search_base.trim_end_matches('/');
    let query: String = byte_serialize(session.query().as_bytes()).collect();
    let filter = session.type_filter().map(|f| f.code()).unwrap_or("");
    format!(
        "{base}/images/async?q={query}&first={page_index}&count={count}&adlt={adult}&qft={filter}",
        count = session.limit(),
        adult = session.adult().as_param(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AdultFilter, TypeFilter};

    #[test]
    fn encodes_query_and_appends_filter_code() {
        let session = SearchSession::new("red cats & dogs", 25)
            .unwrap()
            .with_adult(AdultFilter::On)
            .with_type_filter(Some(TypeFilter::Photo));
        let url = build_page_url("https://www.bing.com/", &session, 3);
        assert_eq!(
            url,
            "https://www.bing.com/images/async?q=red+cats+%26+dogs&first=3&count=25&adlt=on&qft=+filterui:photo-photo"
        );
    }

    #[test]
    fn empty_filter_leaves_qft_blank() {
        let session = SearchSession::new("cats", 5).unwrap();
        let url = build_page_url(DEFAULT_SEARCH_BASE, &session, 0);
        assert!(url.ends_with("&adlt=off&qft="));
        assert_eq!(url, build_page_url(DEFAULT_SEARCH_BASE, &session, 0));
    }
}
