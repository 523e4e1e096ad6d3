use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::infrastructure::parsing_error::ParsingError;

/// Tender category filter accepted by the listing endpoint (`kategori`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Procurement of goods
    #[serde(rename = "PENGADAAN_BARANG")]
    Procurement,
    /// Construction work
    #[serde(rename = "PEKERJAAN_KONSTRUKSI")]
    Construction,
    /// Consultancy by a business entity
    #[serde(rename = "KONSULTANSI")]
    BusinessEntityConsultancy,
    /// Consultancy by an individual
    #[serde(rename = "KONSULTANSI_PERORANGAN")]
    IndividualConsultancy,
    /// Other services
    #[serde(rename = "JASA_LAINNYA")]
    Others,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Procurement,
        Category::Construction,
        Category::BusinessEntityConsultancy,
        Category::IndividualConsultancy,
        Category::Others,
    ];

    /// Literal sent as the `kategori` query parameter
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Procurement => "PENGADAAN_BARANG",
            Self::Construction => "PEKERJAAN_KONSTRUKSI",
            Self::BusinessEntityConsultancy => "KONSULTANSI",
            Self::IndividualConsultancy => "KONSULTANSI_PERORANGAN",
            Self::Others => "JASA_LAINNYA",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

impl FromStr for Category {
    type Err = ParsingError;

    /// Accepts the query literal, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_query_value().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParsingError::invalid_value("category", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Category::Procurement, "PENGADAAN_BARANG")]
    #[case(Category::Construction, "PEKERJAAN_KONSTRUKSI")]
    #[case(Category::BusinessEntityConsultancy, "KONSULTANSI")]
    #[case(Category::IndividualConsultancy, "KONSULTANSI_PERORANGAN")]
    #[case(Category::Others, "JASA_LAINNYA")]
    fn test_query_literal(#[case] category: Category, #[case] literal: &str) {
        assert_eq!(category.as_query_value(), literal);
        assert_eq!(serde_json::to_string(&category).unwrap(), format!("\"{literal}\""));
        assert_eq!(literal.to_lowercase().parse::<Category>().unwrap(), category);
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!("BARANG".parse::<Category>().is_err());
    }
}
