//! Caller-driven pagination over the tender data table

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::category::Category;
use super::listing_row::ListingRow;
use super::package::Package;
use crate::infrastructure::error::{LpseError, LpseResult};

/// Optional listing filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFilter {
    /// Agency name (`rkn_nama`)
    pub agency: Option<String>,
    /// Free-text search (`search[value]`)
    pub search: Option<String>,
    /// Category (`kategori`)
    pub category: Option<Category>,
}

/// One data-table request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub draw: u32,
    pub start: u64,
    pub length: u32,
    pub filter: ListingFilter,
}

impl ListingQuery {
    /// Query for 1-based `page` of `page_size` rows
    pub fn for_page(page: u32, page_size: u32, filter: ListingFilter) -> Self {
        Self {
            draw: page,
            start: u64::from(page.saturating_sub(1)) * u64::from(page_size),
            length: page_size,
            filter,
        }
    }
}

/// JSON envelope returned by the data-table endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEnvelope {
    #[serde(default)]
    pub draw: Option<serde_json::Value>,
    pub records_total: u64,
    pub records_filtered: u64,
    pub data: Vec<ListingRow>,
}

/// Anything that can serve listing pages
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Base URL used to build per-package links
    fn host(&self) -> &str;

    async fn fetch_listing(&self, query: &ListingQuery) -> LpseResult<ListingEnvelope>;
}

/// Pagination state plus the packages of the most recently fetched page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Packages<S> {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub items_total: u64,
    pub items_filtered_total: u64,
    pub packages: Vec<Package>,
    /// Error that stopped iteration, if any
    #[serde(skip)]
    pub error: Option<LpseError>,
    #[serde(skip)]
    filter: ListingFilter,
    #[serde(skip)]
    fetched: bool,
    #[serde(skip)]
    source: S,
}

impl<S: ListingSource> Packages<S> {
    pub fn new(source: S, page_size: u32, filter: ListingFilter) -> LpseResult<Self> {
        if page_size == 0 {
            return Err(LpseError::InvalidPageSize);
        }

        Ok(Self {
            page: 0,
            page_size,
            page_count: 0,
            items_total: 0,
            items_filtered_total: 0,
            packages: Vec::new(),
            error: None,
            filter,
            fetched: false,
            source,
        })
    }

    /// Whether another page is expected after the current one
    pub fn has_more(&self) -> bool {
        self.error.is_none() && (!self.fetched || self.page < self.page_count)
    }

    /// Fetch the page after the current one.
    ///
    /// Returns `false` once the last page has been fetched, or when a fetch
    /// fails; in that case the failure is kept in [`Packages::error`].
    pub async fn next(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }

        let page = self.page + 1;
        match self.fetch_page(page).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Listing page {} failed, stopping: {}", page, e);
                self.error = Some(e);
                false
            }
        }
    }

    /// Fetch an explicit 1-based page and replace the current packages
    pub async fn fetch_page(&mut self, page: u32) -> LpseResult<()> {
        let query = ListingQuery::for_page(page, self.page_size, self.filter.clone());
        let envelope = self.source.fetch_listing(&query).await?;

        let host = self.source.host();
        self.packages = envelope.data.iter().map(|row| row.to_package(host)).collect();
        self.page = page;
        self.page_count = page_count(envelope.records_filtered, self.page_size);
        self.items_total = envelope.records_total;
        self.items_filtered_total = envelope.records_filtered;
        self.fetched = true;

        info!(
            "Fetched listing page {}/{} ({} packages, {} filtered of {})",
            self.page,
            self.page_count,
            self.packages.len(),
            self.items_filtered_total,
            self.items_total
        );
        Ok(())
    }

    pub fn filter(&self) -> &ListingFilter {
        &self.filter
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Take the packages of the current page, leaving it empty
    pub fn take_packages(&mut self) -> Vec<Package> {
        std::mem::take(&mut self.packages)
    }
}

/// Number of pages needed for `filtered` rows at `page_size` rows per page
pub fn page_count(filtered: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(filtered.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(25, 10, 3)]
    #[case(30, 10, 3)]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    fn test_page_count(#[case] filtered: u64, #[case] size: u32, #[case] expected: u32) {
        assert_eq!(page_count(filtered, size), expected);
    }

    #[test]
    fn test_query_offsets() {
        let query = ListingQuery::for_page(3, 10, ListingFilter::default());
        assert_eq!((query.draw, query.start, query.length), (3, 20, 10));

        let first = ListingQuery::for_page(1, 25, ListingFilter::default());
        assert_eq!(first.start, 0);
    }

    #[test]
    fn test_envelope_deserialization() {
        let json = r#"{"draw":"1","recordsTotal":120,"recordsFiltered":25,
            "data":[["1","n","a","s","h","5","6","7","c - TA 2023","2"]]}"#;
        let envelope: ListingEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.records_total, 120);
        assert_eq!(envelope.records_filtered, 25);
        assert_eq!(envelope.data[0].fiscal_year(), Some(2023));
    }

    #[test]
    fn test_malformed_envelope_is_rejected() {
        let result: Result<ListingEnvelope, _> = serde_json::from_str(r#"{"data":"nope"}"#);
        assert!(result.is_err());
    }
}
