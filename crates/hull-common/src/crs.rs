//! Coordinate Reference System types and utilities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Well-known CRS codes understood by the hull and masking code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic (lat/lon in degrees)
    Epsg4326,
    /// NAD83 Geographic
    Epsg4269,
    /// Web Mercator (meters)
    Epsg3857,
    /// CONUS Albers Equal Area (meters)
    Epsg5070,
}

impl CrsCode {
    /// Map a numeric EPSG code onto a supported CRS.
    pub fn from_epsg(code: u32) -> Result<Self, CrsParseError> {
        match code {
            4326 => Ok(CrsCode::Epsg4326),
            4269 => Ok(CrsCode::Epsg4269),
            3857 | 900913 => Ok(CrsCode::Epsg3857),
            5070 => Ok(CrsCode::Epsg5070),
            other => Err(CrsParseError::UnsupportedCrs(format!("EPSG:{}", other))),
        }
    }

    /// Numeric EPSG code.
    pub fn epsg(&self) -> u32 {
        match self {
            CrsCode::Epsg4326 => 4326,
            CrsCode::Epsg4269 => 4269,
            CrsCode::Epsg3857 => 3857,
            CrsCode::Epsg5070 => 5070,
        }
    }

    /// Parse an authority string.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326"
    /// - "epsg:4326"
    /// - "CRS:84" (equivalent to EPSG:4326 with lon/lat axis order)
    /// - a bare numeric code such as "5070"
    pub fn parse(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();

        if normalized == "CRS:84" || normalized == "OGC:CRS84" {
            return Ok(CrsCode::Epsg4326);
        }

        let digits = normalized.strip_prefix("EPSG:").unwrap_or(&normalized);
        match digits.parse::<u32>() {
            Ok(code) => Self::from_epsg(code),
            Err(_) => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// Find an EPSG code embedded in free text (WKT1 `AUTHORITY["EPSG","5070"]`,
    /// WKT2 `ID["EPSG",5070]`, proj-style `+init=epsg:4326`).
    ///
    /// WKT nests the base geographic CRS inside a projected one, and the
    /// outermost authority comes last, so the last code found wins.
    pub fn find_in_text(text: &str) -> Result<Self, CrsParseError> {
        if let Ok(code) = Self::parse(text) {
            return Ok(code);
        }

        let upper = text.to_uppercase();
        let mut last = None;
        for (idx, _) in upper.match_indices("EPSG") {
            let tail = &upper[idx + 4..];
            let digits: String = tail
                .trim_start_matches(|c: char| c == '"' || c == ',' || c == ':' || c == ' ')
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let Ok(code) = digits.parse::<u32>() {
                last = Some(code);
            }
        }

        match last {
            Some(code) => Self::from_epsg(code),
            None => Err(CrsParseError::NoAuthority(text.chars().take(64).collect())),
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326 | CrsCode::Epsg4269)
    }

    /// Check if planar areas in this CRS are true areas in square meters.
    pub fn is_equal_area(&self) -> bool {
        matches!(self, CrsCode::Epsg5070)
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for CrsCode {
    type Err = CrsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("No EPSG authority found in: {0}")]
    NoAuthority(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crs() {
        assert_eq!(CrsCode::parse("EPSG:4326").unwrap(), CrsCode::Epsg4326);
        assert_eq!(CrsCode::parse("epsg:3857").unwrap(), CrsCode::Epsg3857);
        assert_eq!(CrsCode::parse("CRS:84").unwrap(), CrsCode::Epsg4326);
        assert_eq!(CrsCode::parse("5070").unwrap(), CrsCode::Epsg5070);
        assert!(CrsCode::parse("EPSG:99999").is_err());
        assert!(CrsCode::parse("not a crs").is_err());
    }

    #[test]
    fn test_find_in_wkt1_uses_outermost_authority() {
        let wkt = r#"PROJCS["NAD83 / Conus Albers",GEOGCS["NAD83",AUTHORITY["EPSG","4269"]],PROJECTION["Albers_Conic_Equal_Area"],AUTHORITY["EPSG","5070"]]"#;
        assert_eq!(CrsCode::find_in_text(wkt).unwrap(), CrsCode::Epsg5070);
    }

    #[test]
    fn test_find_in_wkt2_and_proj() {
        assert_eq!(
            CrsCode::find_in_text(r#"GEOGCRS["WGS 84",ID["EPSG",4326]]"#).unwrap(),
            CrsCode::Epsg4326
        );
        assert_eq!(
            CrsCode::find_in_text("+init=epsg:3857 +no_defs").unwrap(),
            CrsCode::Epsg3857
        );
        assert!(matches!(
            CrsCode::find_in_text("+proj=longlat +datum=WGS84"),
            Err(CrsParseError::NoAuthority(_))
        ));
    }

    #[test]
    fn test_classification() {
        assert!(CrsCode::Epsg4326.is_geographic());
        assert!(!CrsCode::Epsg3857.is_geographic());
        assert!(CrsCode::Epsg5070.is_equal_area());
        assert!(!CrsCode::Epsg3857.is_equal_area());
        assert_eq!(CrsCode::Epsg5070.to_string(), "EPSG:5070");
    }
}
