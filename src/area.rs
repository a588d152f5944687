//! JEPX market areas
//!
//! One static table ties each area to its API code and to the column it
//! occupies in the upstream spot summary CSV. Both query validation and
//! ingestion read from here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A JEPX price area, including the system-wide price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    System,
    Hokkaido,
    Tohoku,
    Tokyo,
    Hokuriku,
    Chubu,
    Kansai,
    Chugoku,
    Shikoku,
    Kyushu,
}

/// Static description of one area
#[derive(Debug, Clone, Copy)]
pub struct AreaInfo {
    pub area: Area,
    /// Code used in the API and as the document field name
    pub code: &'static str,
    /// Price column header in the upstream CSV
    pub column: &'static str,
    /// Display label used by the exchange
    pub label: &'static str,
}

/// All areas in upstream column order
pub const AREAS: [AreaInfo; 10] = [
    AreaInfo {
        area: Area::System,
        code: "system",
        column: "システムプライス(円/kWh)",
        label: "システム・プライス",
    },
    AreaInfo {
        area: Area::Hokkaido,
        code: "hokkaido",
        column: "エリアプライス北海道(円/kWh)",
        label: "北海道",
    },
    AreaInfo {
        area: Area::Tohoku,
        code: "tohoku",
        column: "エリアプライス東北(円/kWh)",
        label: "東北",
    },
    AreaInfo {
        area: Area::Tokyo,
        code: "tokyo",
        column: "エリアプライス東京(円/kWh)",
        label: "東京",
    },
    AreaInfo {
        area: Area::Hokuriku,
        code: "hokuriku",
        column: "エリアプライス北陸(円/kWh)",
        label: "北陸",
    },
    AreaInfo {
        area: Area::Chubu,
        code: "chubu",
        column: "エリアプライス中部(円/kWh)",
        label: "中部",
    },
    AreaInfo {
        area: Area::Kansai,
        code: "kansai",
        column: "エリアプライス関西(円/kWh)",
        label: "関西",
    },
    AreaInfo {
        area: Area::Chugoku,
        code: "chugoku",
        column: "エリアプライス中国(円/kWh)",
        label: "中国",
    },
    AreaInfo {
        area: Area::Shikoku,
        code: "shikoku",
        column: "エリアプライス四国(円/kWh)",
        label: "四国",
    },
    AreaInfo {
        area: Area::Kyushu,
        code: "kyushu",
        column: "エリアプライス九州(円/kWh)",
        label: "九州",
    },
];

impl Area {
    /// Iterate over every area in table order
    pub fn all() -> impl Iterator<Item = Area> {
        AREAS.iter().map(|info| info.area)
    }

    /// Table entry for this area
    pub fn info(self) -> &'static AreaInfo {
        // AREAS is declared in discriminant order
        &AREAS[self as usize]
    }

    /// API code, e.g. `tokyo`
    pub fn code(self) -> &'static str {
        self.info().code
    }

    /// Upstream CSV price column
    pub fn column(self) -> &'static str {
        self.info().column
    }

    /// Comma-separated list of every code, for error messages
    pub fn allowed_codes() -> String {
        AREAS
            .iter()
            .map(|info| format!("'{}'", info.code))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a string is not one of the area codes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown area code: {0}")]
pub struct UnknownArea(pub String);

impl FromStr for Area {
    type Err = UnknownArea;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AREAS
            .iter()
            .find(|info| info.code == s)
            .map(|info| info.area)
            .ok_or_else(|| UnknownArea(s.to_string()))
    }
}
