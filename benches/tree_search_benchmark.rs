//! Tree building and structural search over a large announcement-like page
//!
//! Compares a single first-match lookup against a full pre-order collection,
//! and measures the full label-driven announcement extraction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lpse_scraper_lib::infrastructure::{
    AnnouncementContext, AnnouncementParser, ContextualParser, MatchSpec, Node,
};

/// Announcement table padded with `filler` unrecognized rows
fn synthetic_page(filler: usize) -> String {
    let mut html = String::from("<html><body><table class=\"table table-bordered\">");
    for i in 0..filler {
        html.push_str(&format!("<tr><th>Catatan {i}</th><td>Baris pengisi {i}</td></tr>"));
    }
    html.push_str(
        "<tr><th>Rencana Umum Pengadaan</th><td><table class=\"table table-condensed\">\
         <tr><th>Kode RUP</th><th>Nama Paket</th><th>Sumber Dana</th></tr>\
         <tr><td>29384756</td><td>Jalan</td><td>APBN</td></tr></table></td></tr>\
         <tr><th>Tanggal Pembuatan</th><td>3 Maret 2023</td></tr>\
         <tr><th>Nilai Pagu Paket</th><td>Rp 12.500.000,00</td><th>Nilai HPS Paket</th><td>Rp 12.000.000,00</td></tr>\
         <tr><th>Lokasi Pekerjaan</th><td><ul><li>Bandung</li><li>Bekasi</li></ul></td></tr>",
    );
    html.push_str("</table></body></html>");
    html
}

fn bench_tree_search(c: &mut Criterion) {
    let html = synthetic_page(500);
    let root = Node::parse_document(&html);
    let plan_table = MatchSpec::element("table")
        .attr_key("class")
        .attr_value("table table-condensed");

    c.bench_function("parse_document_500_rows", |b| {
        b.iter(|| Node::parse_document(black_box(&html)));
    });

    c.bench_function("search_first_nested_table", |b| {
        b.iter(|| black_box(&root).search_first(black_box(&plan_table)).is_some());
    });

    c.bench_function("search_all_rows", |b| {
        b.iter(|| black_box(&root).search_all(&MatchSpec::element("tr")).len());
    });

    let parser = AnnouncementParser::new();
    let context = AnnouncementContext::new("76813064");
    c.bench_function("announcement_extraction", |b| {
        b.iter(|| parser.parse_with_context(black_box(&root), &context));
    });
}

criterion_group!(benches, bench_tree_search);
criterion_main!(benches);
