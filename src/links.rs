use scraper::{Html, Selector};
use url::Url;

/// Extracts anchor targets from a rendered document, in document order.
///
/// Each `href` is resolved against the document's `<base href>` (or the page
/// URL) and returned as an absolute URL string, matching what the DOM
/// reports for `anchor.href`. Anchors without an `href` are skipped and
/// hrefs that cannot be resolved are returned verbatim.
pub fn extract_links(html: &str, page_url: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let base = document_base(&doc, page_url);

    let link_selector = Selector::parse("a").unwrap();
    let links = doc
        .select(&link_selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|href| resolve(base.as_ref(), href))
        .collect::<Vec<String>>();

    ::log::debug!("Extracted {} links from {}", links.len(), page_url);
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    links
}

fn document_base(doc: &Html, page_url: &str) -> Option<Url> {
    let page = Url::parse(page_url).ok();

    let base_selector = Selector::parse("base[href]").unwrap();
    let declared = doc
        .select(&base_selector)
        .next()
        .and_then(|e| e.value().attr("href"));

    match (page, declared) {
        (Some(page), Some(href)) => page.join(href.trim()).ok().or(Some(page)),
        (None, Some(href)) => Url::parse(href.trim()).ok(),
        (page, None) => page,
    }
}

fn resolve(base: Option<&Url>, href: &str) -> String {
    let href = href.trim();
    let resolved = match base {
        Some(base) => base.join(href),
        None => Url::parse(href),
    };
    match resolved {
        Ok(url) => url.to_string(),
        Err(e) => {
            ::log::trace!("Keeping unresolvable href {:?}: {}", href, e);
            href.to_string()
        }
    }
}
