//! Length-aware pagination
//!
//! A [`PagedResult`] is one page of an ordered result set plus the
//! navigation metadata a client needs to render page controls. Every
//! generated URL keeps the query parameters of the originating request.

use crate::error::DbResult;
use serde::Serialize;

/// Pages shown on each side of the current page before eliding
pub const ON_EACH_SIDE: u64 = 3;

/// Label of the "previous page" link
pub const PREVIOUS_LABEL: &str = "« Previous";

/// Label of the "next page" link
pub const NEXT_LABEL: &str = "Next »";

/// Label of an elided run of pages
pub const GAP_LABEL: &str = "...";

/// Base path plus the query parameters to carry into every page URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageUrl {
    path: String,
    params: Vec<(String, String)>,
}

impl PageUrl {
    /// Create a URL builder for the given base path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Carry a query parameter into every generated URL
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Base path without query string
    pub fn path(&self) -> &str {
        &self.path
    }

    /// URL of the given page
    pub fn url(&self, page: u64) -> DbResult<String> {
        let mut params: Vec<(&str, String)> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        params.push(("page", page.to_string()));

        let query = serde_urlencoded::to_string(&params)?;
        let separator = if self.path.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}", self.path, separator, query))
    }
}

/// One entry of the page navigation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// Target URL, None for gaps and unavailable previous/next links
    pub url: Option<String>,
    /// Display label
    pub label: String,
    /// Whether this entry is the current page
    pub active: bool,
}

/// A page of results with navigation metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagedResult<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// 1-based page number
    pub current_page: u64,
    /// Maximum items per page
    pub per_page: u64,
    /// Items across all pages
    pub total: u64,
    /// Number of the last page, at least 1
    pub last_page: u64,
    /// 1-based index of the first item on this page
    pub from: Option<u64>,
    /// 1-based index of the last item on this page
    pub to: Option<u64>,
    /// Base path used for the URLs
    pub path: String,
    pub first_page_url: String,
    pub last_page_url: String,
    pub prev_page_url: Option<String>,
    pub next_page_url: Option<String>,
    /// Previous link, page links with gaps, next link
    pub links: Vec<PageLink>,
}

/// Element of the page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Page(u64),
    Gap,
}

/// Pages to show for `current` out of `last`, eliding distant runs.
///
/// Small page counts are listed in full. Otherwise the first and last two
/// pages stay visible along with the pages around `current`.
fn page_window(current: u64, last: u64) -> Vec<Slot> {
    let window = ON_EACH_SIDE + 4;

    if last < ON_EACH_SIDE * 2 + 8 {
        return (1..=last).map(Slot::Page).collect();
    }

    let mut slots = Vec::new();
    if current <= window {
        slots.extend((1..=window + ON_EACH_SIDE).map(Slot::Page));
        slots.push(Slot::Gap);
        slots.extend((last - 1..=last).map(Slot::Page));
    } else if current > last - window {
        slots.extend((1..=2).map(Slot::Page));
        slots.push(Slot::Gap);
        slots.extend((last - (window + ON_EACH_SIDE - 1)..=last).map(Slot::Page));
    } else {
        slots.extend((1..=2).map(Slot::Page));
        slots.push(Slot::Gap);
        slots.extend((current - ON_EACH_SIDE..=current + ON_EACH_SIDE).map(Slot::Page));
        slots.push(Slot::Gap);
        slots.extend((last - 1..=last).map(Slot::Page));
    }
    slots
}

impl<T> PagedResult<T> {
    /// Build a page from its items and the total item count.
    ///
    /// `current_page` and `per_page` are taken as given (both at least 1);
    /// a page past the end keeps its number and has no items.
    pub fn new(
        data: Vec<T>,
        total: u64,
        current_page: u64,
        per_page: u64,
        urls: &PageUrl,
    ) -> DbResult<Self> {
        let current_page = current_page.max(1);
        let per_page = per_page.max(1);
        let last_page = total.div_ceil(per_page).max(1);

        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let from = (current_page - 1).saturating_mul(per_page).saturating_add(1);
            (Some(from), Some(from.saturating_add(data.len() as u64 - 1)))
        };

        let prev_page_url = if current_page > 1 {
            Some(urls.url(current_page - 1)?)
        } else {
            None
        };
        let next_page_url = if current_page < last_page {
            Some(urls.url(current_page + 1)?)
        } else {
            None
        };

        let mut links = Vec::new();
        links.push(PageLink {
            url: prev_page_url.clone(),
            label: PREVIOUS_LABEL.to_string(),
            active: false,
        });
        for slot in page_window(current_page, last_page) {
            links.push(match slot {
                Slot::Page(page) => PageLink {
                    url: Some(urls.url(page)?),
                    label: page.to_string(),
                    active: page == current_page,
                },
                Slot::Gap => PageLink {
                    url: None,
                    label: GAP_LABEL.to_string(),
                    active: false,
                },
            });
        }
        links.push(PageLink {
            url: next_page_url.clone(),
            label: NEXT_LABEL.to_string(),
            active: false,
        });

        Ok(Self {
            data,
            current_page,
            per_page,
            total,
            last_page,
            from,
            to,
            path: urls.path().to_string(),
            first_page_url: urls.url(1)?,
            last_page_url: urls.url(last_page)?,
            prev_page_url,
            next_page_url,
            links,
        })
    }

    /// Convert the items, keeping the metadata
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
            from: self.from,
            to: self.to,
            path: self.path,
            first_page_url: self.first_page_url,
            last_page_url: self.last_page_url,
            prev_page_url: self.prev_page_url,
            next_page_url: self.next_page_url,
            links: self.links,
        }
    }
}
