use serde::{Deserialize, Serialize};

use super::value_objects::Date;

/// Tender package, built from a listing row and optionally enriched from its
/// announcement page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub code: String,
    pub package_name: String,
    pub agency: String,
    pub stage: String,
    /// Schedule page of the tender
    #[serde(rename = "stageURL")]
    pub stage_url: String,
    pub procurement_system: String,
    /// Ceiling estimate exactly as shown in the listing
    pub hps_str: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub status: String,
    pub spse_ver: String,
    pub category: String,
    /// Fiscal year tag of the listing category column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<i32>,

    #[serde(flatten)]
    pub details: AnnouncementDetails,
}

/// Fields only published on the announcement page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rup_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_unit: Option<String>,
    /// Budget year text exactly as shown on the announcement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub work_locations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_qualification: Option<String>,
}

impl AnnouncementDetails {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Package {
    /// Merge announcement fields into this package. Every value the
    /// announcement yielded replaces the current one; fields it did not yield
    /// keep their current value.
    pub fn apply_details(&mut self, details: AnnouncementDetails) {
        let current = &mut self.details;
        current.rup_code = details.rup_code.or(current.rup_code.take());
        current.fund_source = details.fund_source.or(current.fund_source.take());
        current.created_at = details.created_at.or(current.created_at.take());
        current.description = details.description.or(current.description.take());
        current.work_unit = details.work_unit.or(current.work_unit.take());
        current.budget_year = details.budget_year.or(current.budget_year.take());
        current.ceiling = details.ceiling.or(current.ceiling);
        current.hps = details.hps.or(current.hps);
        current.payment_method = details.payment_method.or(current.payment_method.take());
        current.business_qualification = details
            .business_qualification
            .or(current.business_qualification.take());
        if !details.work_locations.is_empty() {
            current.work_locations = details.work_locations;
        }
    }
}
