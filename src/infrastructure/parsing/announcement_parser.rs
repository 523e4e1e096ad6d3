//! Announcement page parser
//!
//! The announcement page is a label/value table. Every `tr` is inspected; the
//! first text node of its first `th` names the field, and a label-specific
//! rule picks the value out of the row's data cells. Rows with unknown labels
//! are ignored and a missing or unparseable value leaves its field unset.

use tracing::{debug, warn};

use super::context::AnnouncementContext;
use super::{ContextualParser, ParsingResult};
use crate::domain::package::AnnouncementDetails;
use crate::domain::value_objects::{Date, parse_rupiah};
use crate::infrastructure::html_tree::{MatchSpec, Node};

/// Class of the nested general procurement plan (RUP) table
pub const RUP_TABLE_CLASS: &str = "table table-condensed";

/// Row labels understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// "Rencana Umum Pengadaan": plan code and fund source
    ProcurementPlan,
    /// "Tanggal Pembuatan": creation date
    CreatedAt,
    /// "Tahun Anggaran": budget year text
    BudgetYear,
    /// "Nilai Pagu Paket": ceiling and HPS
    PackageValue,
    /// "Jenis Kontrak": payment method
    ContractType,
    /// "Lokasi Pekerjaan": work locations
    WorkLocation,
    /// "Satuan Kerja": work unit
    WorkUnit,
    /// "Uraian Singkat Pekerjaan": description
    Description,
    /// "Kualifikasi Usaha": business qualification
    BusinessQualification,
}

impl Label {
    pub fn from_header(text: &str) -> Option<Self> {
        match text.trim() {
            "Rencana Umum Pengadaan" => Some(Self::ProcurementPlan),
            "Tanggal Pembuatan" => Some(Self::CreatedAt),
            "Tahun Anggaran" => Some(Self::BudgetYear),
            "Nilai Pagu Paket" => Some(Self::PackageValue),
            "Jenis Kontrak" => Some(Self::ContractType),
            "Lokasi Pekerjaan" => Some(Self::WorkLocation),
            "Satuan Kerja" => Some(Self::WorkUnit),
            "Uraian Singkat Pekerjaan" => Some(Self::Description),
            "Kualifikasi Usaha" => Some(Self::BusinessQualification),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnnouncementParser {
    rup_table_class: String,
}

impl Default for AnnouncementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnouncementParser {
    pub fn new() -> Self {
        Self {
            rup_table_class: RUP_TABLE_CLASS.to_string(),
        }
    }

    /// Override the class used to locate the nested RUP table
    pub fn with_rup_table_class(mut self, class: &str) -> Self {
        self.rup_table_class = class.to_string();
        self
    }

    fn apply_row(&self, label: Label, row: &Node, details: &mut AnnouncementDetails, context: &AnnouncementContext) {
        match label {
            Label::ProcurementPlan => {
                let spec = MatchSpec::element("table")
                    .attr_key("class")
                    .attr_value(&self.rup_table_class);
                let Some(table) = row.search_first(&spec) else {
                    debug!("[{}] RUP row without nested plan table", context.code);
                    return;
                };
                let cells = table.search_all(&MatchSpec::element("td"));
                details.rup_code = cells.first().map(|cell| cell_text(cell));
                details.fund_source = cells.get(2).map(|cell| cell_text(cell));
            }
            Label::CreatedAt => {
                let Some(raw) = first_cell(row) else { return };
                details.created_at = Date::parse_indonesian(raw.trim());
                if details.created_at.is_none() {
                    warn!("[{}] Unparseable creation date: {:?}", context.code, raw);
                }
            }
            Label::BudgetYear => {
                details.budget_year = first_cell(row).map(|raw| raw.trim().to_string());
            }
            Label::PackageValue => {
                let cells = row.search_all(&MatchSpec::element("td"));
                if cells.len() != 2 {
                    debug!("[{}] Expected 2 value cells, found {}", context.code, cells.len());
                    return;
                }
                details.ceiling = parse_rupiah(&cell_text(cells[0]));
                details.hps = parse_rupiah(&cell_text(cells[1]));
            }
            Label::ContractType => details.payment_method = first_cell(row),
            Label::WorkLocation => {
                details.work_locations.extend(
                    row.search_all(&MatchSpec::element("li"))
                        .into_iter()
                        .map(cell_text),
                );
            }
            Label::WorkUnit => details.work_unit = first_cell(row).map(|raw| raw.trim().to_string()),
            Label::Description => {
                details.description = first_cell(row).map(|raw| raw.trim().to_string());
            }
            Label::BusinessQualification => {
                details.business_qualification = first_cell(row).map(|raw| raw.trim().to_string());
            }
        }
        debug!("[{}] Parsed row {:?}", context.code, label);
    }
}

impl ContextualParser for AnnouncementParser {
    type Output = AnnouncementDetails;
    type Context = AnnouncementContext;

    fn parse_with_context(&self, root: &Node, context: &Self::Context) -> ParsingResult<Self::Output> {
        let rows = root.search_all(&MatchSpec::element("tr"));
        if rows.is_empty() {
            warn!(
                "[{}] Announcement page without table rows: {}",
                context.code,
                context.url.as_deref().unwrap_or("-")
            );
        }

        let mut details = AnnouncementDetails::default();
        for row in rows {
            if let Some(label) = header_label(row) {
                self.apply_row(label, row, &mut details, context);
            }
        }

        debug!("[{}] Announcement parsed: {:?}", context.code, details);
        Ok(details)
    }
}

/// Label named by the first text node of the row's first header cell
fn header_label(row: &Node) -> Option<Label> {
    let header = row.search_first(&MatchSpec::element("th"))?;
    let text = header.search_first(&MatchSpec::text())?;
    Label::from_header(&text.data)
}

/// Text of the row's first data cell
fn first_cell(row: &Node) -> Option<String> {
    row.search_first(&MatchSpec::element("td")).map(cell_text)
}

/// Leading text of a cell, falling back to all of its text when it starts with markup
fn cell_text(cell: &Node) -> String {
    cell.first_text()
        .map_or_else(|| cell.text_content(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
<table class="table table-bordered">
  <tr><th>Kode Tender</th><td>10001</td></tr>
  <tr>
    <th>Rencana Umum Pengadaan</th>
    <td>
      <table class="table table-condensed">
        <tr><th>Kode RUP</th><th>Nama Paket</th><th>Sumber Dana</th></tr>
        <tr><td>RUP-778</td><td>Jalan Tol</td><td>APBN</td></tr>
      </table>
    </td>
  </tr>
  <tr><th>Tanggal Pembuatan</th><td> 17 Januari 2022 </td></tr>
  <tr><th>Satuan Kerja</th><td>BBPJN Jawa Barat</td></tr>
  <tr><th>Tahun Anggaran</th><td> APBN 2022 </td></tr>
  <tr><th>Nilai Pagu Paket</th><td>Rp 1.234.567,89</td><th>Nilai HPS Paket</th><td>Rp 1.000.000,00</td></tr>
  <tr><th>Jenis Kontrak</th><td>Harga Satuan</td></tr>
  <tr><th>Lokasi Pekerjaan</th><td><ul><li>Bandung - Jawa Barat</li><li>Bekasi - Jawa Barat</li></ul></td></tr>
  <tr><th>Kualifikasi Usaha</th><td> Perusahaan Non Kecil </td></tr>
</table>
</body></html>"#;

    fn parse(html: &str) -> ParsingResult<AnnouncementDetails> {
        AnnouncementParser::new().parse_html(html, &AnnouncementContext::new("10001"))
    }

    #[test]
    fn test_full_announcement() {
        let details = parse(PAGE).unwrap();
        assert_eq!(details.rup_code.as_deref(), Some("RUP-778"));
        assert_eq!(details.fund_source.as_deref(), Some("APBN"));
        assert_eq!(details.created_at, Date::parse_indonesian("17 Januari 2022"));
        assert_eq!(details.work_unit.as_deref(), Some("BBPJN Jawa Barat"));
        assert_eq!(details.budget_year.as_deref(), Some("APBN 2022"));
        assert_eq!(details.payment_method.as_deref(), Some("Harga Satuan"));
        assert_eq!(details.work_locations, vec!["Bandung - Jawa Barat", "Bekasi - Jawa Barat"]);
        assert_eq!(details.business_qualification.as_deref(), Some("Perusahaan Non Kecil"));
    }

    #[test]
    fn test_ceiling_and_hps_read_distinct_cells() {
        let details = parse(PAGE).unwrap();
        assert_eq!(details.ceiling, Some(1_234_567.89));
        assert_eq!(details.hps, Some(1_000_000.0));
    }

    #[test]
    fn test_bad_date_leaves_field_unset() {
        let html = "<table><tr><th>Tanggal Pembuatan</th><td>kemarin</td></tr>\
                    <tr><th>Jenis Kontrak</th><td>Lumsum</td></tr></table>";
        let details = parse(html).unwrap();
        assert_eq!(details.created_at, None);
        assert_eq!(details.payment_method.as_deref(), Some("Lumsum"));
    }

    #[test]
    fn test_missing_nested_table_is_tolerated() {
        let html = "<table><tr><th>Rencana Umum Pengadaan</th><td>-</td></tr></table>";
        let details = parse(html).unwrap();
        assert!(details.is_empty());
    }

    #[test]
    fn test_single_value_cell_is_ignored() {
        let html = "<table><tr><th>Nilai Pagu Paket</th><td>Rp 5.000,00</td></tr></table>";
        let details = parse(html).unwrap();
        assert_eq!((details.ceiling, details.hps), (None, None));
    }

    #[test]
    fn test_page_without_rows_yields_empty_details() {
        let details = parse("<html><body><ul><li>Jakarta</li></ul></body></html>").unwrap();
        assert!(details.is_empty());
    }

    #[test]
    fn test_custom_rup_table_class() {
        let html = "<table><tr><th>Rencana Umum Pengadaan</th><td>\
                    <table class=\"rup\"><tr><td>RUP-1</td><td>x</td><td>APBD</td></tr></table>\
                    </td></tr></table>";
        let context = AnnouncementContext::new("10001");

        let default = AnnouncementParser::new().parse_html(html, &context).unwrap();
        assert_eq!(default.rup_code, None);

        let custom = AnnouncementParser::new()
            .with_rup_table_class("rup")
            .parse_html(html, &context)
            .unwrap();
        assert_eq!(custom.rup_code.as_deref(), Some("RUP-1"));
        assert_eq!(custom.fund_source.as_deref(), Some("APBD"));
    }

    #[test]
    fn test_unknown_labels_are_ignored() {
        assert_eq!(Label::from_header("Kode Tender"), None);
        assert_eq!(Label::from_header(" Jenis Kontrak "), Some(Label::ContractType));
    }
}
