//! Field extraction from one raw row of the tender data table
//!
//! Column layout of the `dt/lelang` payload:
//! `0` code, `1` package name (with optional status label), `2` agency,
//! `3` stage, `4` ceiling estimate, `5`..`7` procurement system parts,
//! `8` category with fiscal-year tag, `9` SPSE version.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::package::Package;
use super::value_objects::parse_rupiah;
use crate::infrastructure::config::lpse;

const STATUS_OPEN: &str = "<span class='label label-warning'>";
const STATUS_CLOSE: &str = "</span>";
const STAGE_ELLIPSIS: &str = " [...]";
const LEGACY_SPSE: &str = "spse 3";

static STATUS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<span class='label label-warning'>([a-z A-Z]*)</span>").expect("valid regex")
});
static YEAR_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" - ([A-Z]*) ([0-9]*)").expect("valid regex"));

/// One positional row of the listing payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingRow(pub Vec<String>);

impl From<Vec<String>> for ListingRow {
    fn from(cells: Vec<String>) -> Self {
        Self(cells)
    }
}

impl<const N: usize> From<[&str; N]> for ListingRow {
    fn from(cells: [&str; N]) -> Self {
        Self(cells.iter().map(ToString::to_string).collect())
    }
}

impl ListingRow {
    /// Cell at `index`, or an empty string when the row is short
    fn cell(&self, index: usize) -> &str {
        self.0.get(index).map_or("", String::as_str)
    }

    pub fn code(&self) -> &str {
        self.cell(0)
    }

    /// Package name with the status label fragment removed
    pub fn package_name(&self) -> String {
        let name = self.cell(1);
        match STATUS_LABEL.find(name) {
            Some(label) => name.replace(label.as_str(), ""),
            None => name.to_string(),
        }
    }

    /// Text inside the status label fragment, empty when absent
    pub fn status(&self) -> String {
        STATUS_LABEL
            .find(self.cell(1))
            .map(|label| {
                label
                    .as_str()
                    .replace(STATUS_OPEN, "")
                    .replace(STATUS_CLOSE, "")
            })
            .unwrap_or_default()
    }

    pub fn agency(&self) -> &str {
        self.cell(2)
    }

    pub fn stage(&self) -> String {
        self.cell(3).replace(STAGE_ELLIPSIS, "")
    }

    pub fn hps_str(&self) -> &str {
        self.cell(4)
    }

    /// Numeric reading of the listing price, when it is a plain rupiah amount
    pub fn price(&self) -> Option<f64> {
        parse_rupiah(self.hps_str())
    }

    /// Columns 6, 5 and 7, in that order
    pub fn procurement_system(&self) -> String {
        format!("{} - {} - {}", self.cell(6), self.cell(5), self.cell(7))
    }

    /// Category with the trailing fiscal-year tag removed
    pub fn category(&self) -> String {
        let category = self.cell(8);
        match YEAR_TAG.find(category) {
            Some(tag) => category.replace(tag.as_str(), ""),
            None => category.to_string(),
        }
    }

    /// Year of a trailing ` - TA <year>` tag on the category column
    pub fn fiscal_year(&self) -> Option<i32> {
        let caps = YEAR_TAG.captures(self.cell(8))?;
        if &caps[1] != "TA" {
            return None;
        }
        caps[2].parse().ok()
    }

    /// `spse 4.<n>` for a positive version, `spse 3` otherwise, empty when not numeric
    pub fn spse_version(&self) -> String {
        match self.cell(9).parse::<i64>() {
            Ok(version) if version > 0 => format!("spse 4.{version}"),
            Ok(_) => LEGACY_SPSE.to_string(),
            Err(_) => String::new(),
        }
    }

    /// Schedule page for this row's tender
    pub fn stage_url(&self, host: &str) -> String {
        format!("{}{}", host.trim_end_matches('/'), lpse::schedule_path(self.code()))
    }

    /// Build the listing-level package record
    pub fn to_package(&self, host: &str) -> Package {
        let package = Package {
            code: self.code().to_string(),
            package_name: self.package_name(),
            agency: self.agency().to_string(),
            stage: self.stage(),
            stage_url: self.stage_url(host),
            procurement_system: self.procurement_system(),
            hps_str: self.hps_str().to_string(),
            price: self.price(),
            status: self.status(),
            spse_ver: self.spse_version(),
            category: self.category(),
            fiscal_year: self.fiscal_year(),
            ..Default::default()
        };
        debug!("Extracted listing row {}", package.code);
        package
    }
}
