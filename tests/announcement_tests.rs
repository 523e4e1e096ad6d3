//! Announcement page extraction against a captured portal page
use lpse_scraper_lib::domain::{Date, ListingRow, Package};
use lpse_scraper_lib::infrastructure::{
    AnnouncementContext, AnnouncementParser, ContextualParser, MatchSpec, Node,
};

const PAGE: &str = include_str!("fixtures/pengumumanlelang.html");

fn context() -> AnnouncementContext {
    AnnouncementContext::new("76813064")
        .with_url("https://lpse.pu.go.id/eproc4/lelang/76813064/pengumumanlelang")
}

#[test]
fn captured_page_yields_every_known_field() {
    let details = AnnouncementParser::new().parse_html(PAGE, &context()).unwrap();

    assert_eq!(details.rup_code.as_deref(), Some("29384756"));
    assert_eq!(details.fund_source.as_deref(), Some("APBN"));
    assert_eq!(details.created_at, Date::parse_indonesian("3 Maret 2023"));
    assert_eq!(
        details.work_unit.as_deref(),
        Some("SATKER PELAKSANAAN JALAN NASIONAL WILAYAH I JAWA BARAT")
    );
    assert_eq!(
        details.description.as_deref(),
        Some("Pemeliharaan rutin dan rehabilitasi ruas jalan nasional")
    );
    assert_eq!(details.budget_year.as_deref(), Some("APBN 2023"));
    assert_eq!(details.ceiling, Some(12_500_000_000.0));
    assert_eq!(details.hps, Some(12_375_450_000.0));
    assert_eq!(details.payment_method.as_deref(), Some("Harga Satuan"));
    assert_eq!(
        details.work_locations,
        vec!["Jl. Soekarno-Hatta - Bandung (Kota)", "Jl. Cileunyi - Bandung (Kab.)"]
    );
    assert_eq!(details.business_qualification.as_deref(), Some("Perusahaan Non Kecil"));
}

#[test]
fn creation_date_is_normalized_to_english() {
    let details = AnnouncementParser::new().parse_html(PAGE, &context()).unwrap();
    let date = details.created_at.unwrap();
    assert_eq!((date.year, date.month.as_str(), date.month_int, date.day), (2023, "March", 3, 3));
}

#[test]
fn details_merge_into_listing_package() {
    let row = ListingRow::from([
        "76813064",
        "Preservasi Jalan Lingkar Bandung",
        "Kementerian PUPR",
        "Pengumuman Pascakualifikasi [...]",
        "Rp 12.375.450.000,00",
        "Pascakualifikasi",
        "Tender",
        "Satu File",
        "Pekerjaan Konstruksi - TA 2023",
        "3",
    ]);
    let mut package: Package = row.to_package("https://lpse.pu.go.id");
    let details = AnnouncementParser::new().parse_html(PAGE, &context()).unwrap();
    package.apply_details(details);

    assert_eq!(package.code, "76813064");
    assert_eq!(package.fiscal_year, Some(2023));
    assert_eq!(package.details.budget_year.as_deref(), Some("APBN 2023"));
    assert_eq!(package.details.rup_code.as_deref(), Some("29384756"));

    let json = serde_json::to_value(&package).unwrap();
    assert_eq!(json["stageURL"], "https://lpse.pu.go.id/eproc4/lelang/76813064/jadwal");
    assert_eq!(json["rupCode"], "29384756");
}

#[test]
fn session_expired_page_yields_no_details() {
    let html = "<html><body><div class=\"alert\">Sesi Anda telah berakhir</div></body></html>";
    let details = AnnouncementParser::new().parse_html(html, &context()).unwrap();
    assert!(details.is_empty());

    let mut package = Package {
        code: "76813064".to_string(),
        ..Package::default()
    };
    package.apply_details(details);
    assert!(package.details.is_empty());
}

#[test]
fn tree_search_finds_nested_plan_table() {
    let root = Node::parse_document(PAGE);
    let spec = MatchSpec::element("table")
        .attr_key("class")
        .attr_value("table table-condensed");
    let table = root.search_first(&spec).unwrap();
    assert_eq!(table.search_all(&MatchSpec::element("td")).len(), 3);
    assert_eq!(root.search_all(&MatchSpec::element("li")).len(), 2);
}
