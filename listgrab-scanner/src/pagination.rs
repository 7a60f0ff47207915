use crate::config::PaginationSpec;
use crate::document::Document;
use tracing::debug;
use url::Url;

/// Where the run goes after the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    Url(Url),
    Stop,
}

/// The page that was just processed.
pub struct PageState<'a> {
    /// 1-based index of the page.
    pub index: usize,
    pub url: &'a Url,
    /// Parsed page, absent when the page could not be fetched.
    pub document: Option<&'a Document>,
}

/// Computes successive page URLs for one run.
pub struct PaginationAdvancer<'c> {
    spec: Option<&'c PaginationSpec>,
    start_url: Url,
    max_pages: usize,
}

impl<'c> PaginationAdvancer<'c> {
    pub fn new(spec: Option<&'c PaginationSpec>, start_url: &Url, max_pages: usize) -> Self {
        Self {
            spec,
            start_url: start_url.clone(),
            max_pages,
        }
    }

    /// URL of page 1. The parameter strategy already carries `param=1`.
    pub fn first_url(&self) -> Url {
        match self.spec {
            Some(PaginationSpec::Parameter { name, .. }) => with_page(&self.start_url, name, 1),
            _ => self.start_url.clone(),
        }
    }

    pub fn next(&self, state: &PageState<'_>) -> NextPage {
        if state.index >= self.max_pages {
            return NextPage::Stop;
        }

        match self.spec {
            None => NextPage::Stop,
            Some(PaginationSpec::Parameter { name, base_url }) => {
                let base = base_url.as_ref().unwrap_or(&self.start_url);
                NextPage::Url(with_page(base, name, state.index + 1))
            }
            Some(PaginationSpec::NextLink { selector, .. }) => {
                let Some(document) = state.document else {
                    debug!("No document for page {}, cannot follow next link", state.index);
                    return NextPage::Stop;
                };
                let href = document
                    .select_first(selector)
                    .and_then(|el| el.value().attr("href"));
                match href.and_then(|h| resolve_link(state.url, h)) {
                    Some(next) if &next != state.url => NextPage::Url(next),
                    Some(_) => {
                        debug!("Next link on page {} points back to itself", state.index);
                        NextPage::Stop
                    }
                    None => NextPage::Stop,
                }
            }
        }
    }
}

/// Set `param` to `page`, replacing any existing value and keeping the rest of
/// the query.
pub fn with_page(base: &Url, param: &str, page: usize) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(param, &page.to_string());
    url
}

fn resolve_link(page_url: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    let mut resolved = page_url.join(href).ok()?;
    resolved.set_fragment(None);
    Some(resolved)
}
