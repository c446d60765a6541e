#![forbid(unsafe_code)]

//! Fragment fetcher.
//!
//! Issues an AJAX-marked GET, parses the body as HTML, and extracts the
//! content container. No retry, no cache, no dedupe of concurrent requests;
//! sequencing is the router's job.

use gloo_net::http::Request;
use softnav_core::FetchOutcome;
use softnav_core::router::{AJAX_HEADER_NAME, AJAX_HEADER_VALUE, CONTENT_CONTAINER};
use web_sys::{DomParser, SupportedType};

pub(crate) async fn fetch_fragment(url: &str) -> FetchOutcome {
    match request_fragment(url).await {
        Ok(outcome) => outcome,
        Err(err) => FetchOutcome::Failed(err),
    }
}

async fn request_fragment(url: &str) -> Result<FetchOutcome, String> {
    let response = Request::get(url)
        .header(AJAX_HEADER_NAME, AJAX_HEADER_VALUE)
        .send()
        .await
        .map_err(|err| err.to_string())?;
    let text = response.text().await.map_err(|err| err.to_string())?;

    let parser = DomParser::new().map_err(|err| format!("{err:?}"))?;
    let document = parser
        .parse_from_string(&text, SupportedType::TextHtml)
        .map_err(|err| format!("{err:?}"))?;

    Ok(
        match document.query_selector(CONTENT_CONTAINER).ok().flatten() {
            Some(container) => FetchOutcome::Fragment(container.inner_html()),
            None => FetchOutcome::MissingContainer,
        },
    )
}
