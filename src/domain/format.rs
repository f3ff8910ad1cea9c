//! Document format and document kind tags.
//!
//! Both sets are closed: adding a format means adding a variant here and
//! registering an encoder for it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Input encoding of a submitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentFormat {
    /// Generic JSON document
    Manual,
    /// XML document
    Xml,
    /// CSV document
    Csv,
}

impl DocumentFormat {
    /// Every known format, in declaration order.
    pub const ALL: [DocumentFormat; 3] = [
        DocumentFormat::Manual,
        DocumentFormat::Xml,
        DocumentFormat::Csv,
    ];

    /// Wire name of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Manual => "MANUAL",
            DocumentFormat::Xml => "XML",
            DocumentFormat::Csv => "CSV",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of document carried by an envelope (its `type` field).
///
/// Each encoder owns exactly one kind; callers never choose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    /// Goods introduction, JSON body
    LpIntroduceGoods,
    /// Goods introduction, CSV body
    LpIntroduceGoodsCsv,
    /// Goods introduction, XML body
    LpIntroduceGoodsXml,
}

impl DocumentKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::LpIntroduceGoods => "LP_INTRODUCE_GOODS",
            DocumentKind::LpIntroduceGoodsCsv => "LP_INTRODUCE_GOODS_CSV",
            DocumentKind::LpIntroduceGoodsXml => "LP_INTRODUCE_GOODS_XML",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_wire_names() {
        for format in DocumentFormat::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.as_str()));
        }
    }

    #[test]
    fn test_kind_wire_names() {
        let json = serde_json::to_string(&DocumentKind::LpIntroduceGoodsCsv).unwrap();
        assert_eq!(json, "\"LP_INTRODUCE_GOODS_CSV\"");
        assert_eq!(
            DocumentKind::LpIntroduceGoods.to_string(),
            "LP_INTRODUCE_GOODS"
        );
    }

    #[test]
    fn test_format_roundtrip_from_name() {
        let format: DocumentFormat = serde_json::from_str("\"XML\"").unwrap();
        assert_eq!(format, DocumentFormat::Xml);
    }
}
