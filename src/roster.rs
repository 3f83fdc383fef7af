//! The fixed country roster: 54 African countries with their ISO-3 codes.
//!
//! Each entry also carries a cell in a coarse tile-grid layout of the continent
//! (row 0 is the Mediterranean coast, column 0 the Atlantic). The map renderers
//! place one square per country at that cell.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CountryRef {
    pub display_name: &'static str,
    pub iso3: &'static str,
    /// Tile-grid row (north to south).
    pub row: u8,
    /// Tile-grid column (west to east).
    pub col: u8,
}

const fn c(display_name: &'static str, iso3: &'static str, row: u8, col: u8) -> CountryRef {
    CountryRef {
        display_name,
        iso3,
        row,
        col,
    }
}

/// Number of rows in the tile grid.
pub const GRID_ROWS: u8 = 9;
/// Number of columns in the tile grid.
pub const GRID_COLS: u8 = 11;

pub const AFRICA: [CountryRef; 54] = [
    c("Algeria", "DZA", 0, 4),
    c("Angola", "AGO", 5, 6),
    c("Benin", "BEN", 2, 4),
    c("Botswana", "BWA", 7, 5),
    c("Burkina Faso", "BFA", 2, 3),
    c("Burundi", "BDI", 5, 7),
    c("Cabo Verde", "CPV", 1, 0),
    c("Cameroon", "CMR", 3, 5),
    c("Central African Republic", "CAF", 2, 6),
    c("Chad", "TCD", 1, 5),
    c("Comoros", "COM", 5, 9),
    c("Democratic Republic of the Congo", "COD", 3, 6),
    c("Republic of the Congo", "COG", 5, 5),
    c("Djibouti", "DJI", 1, 8),
    c("Egypt", "EGY", 0, 7),
    c("Equatorial Guinea", "GNQ", 4, 5),
    c("Eritrea", "ERI", 1, 7),
    c("Eswatini", "SWZ", 7, 7),
    c("Ethiopia", "ETH", 2, 8),
    c("Gabon", "GAB", 4, 6),
    c("Gambia", "GMB", 2, 1),
    c("Ghana", "GHA", 4, 3),
    c("Guinea", "GIN", 3, 2),
    c("Guinea-Bissau", "GNB", 3, 1),
    c("Ivory Coast", "CIV", 3, 3),
    c("Kenya", "KEN", 3, 8),
    c("Lesotho", "LSO", 8, 6),
    c("Liberia", "LBR", 4, 2),
    c("Libya", "LBY", 0, 6),
    c("Madagascar", "MDG", 6, 9),
    c("Malawi", "MWI", 5, 8),
    c("Mali", "MLI", 1, 3),
    c("Mauritania", "MRT", 1, 2),
    c("Mauritius", "MUS", 6, 10),
    c("Morocco", "MAR", 0, 3),
    c("Mozambique", "MOZ", 6, 8),
    c("Namibia", "NAM", 6, 5),
    c("Niger", "NER", 1, 4),
    c("Nigeria", "NGA", 2, 5),
    c("Rwanda", "RWA", 4, 7),
    c("São Tomé and Príncipe", "STP", 4, 4),
    c("Senegal", "SEN", 2, 2),
    c("Seychelles", "SYC", 4, 9),
    c("Sierra Leone", "SLE", 4, 1),
    c("Somalia", "SOM", 2, 9),
    c("South Africa", "ZAF", 7, 6),
    c("South Sudan", "SSD", 2, 7),
    c("Sudan", "SDN", 1, 6),
    c("Tanzania", "TZA", 4, 8),
    c("Togo", "TGO", 3, 4),
    c("Tunisia", "TUN", 0, 5),
    c("Uganda", "UGA", 3, 7),
    c("Zambia", "ZMB", 6, 6),
    c("Zimbabwe", "ZWE", 6, 7),
];

/// All roster entries in display order.
pub fn all() -> &'static [CountryRef] {
    &AFRICA
}

pub fn by_iso3(iso3: &str) -> Option<&'static CountryRef> {
    AFRICA.iter().find(|c| c.iso3.eq_ignore_ascii_case(iso3.trim()))
}

pub fn by_name(name: &str) -> Option<&'static CountryRef> {
    let name = name.trim();
    AFRICA
        .iter()
        .find(|c| c.display_name.to_lowercase() == name.to_lowercase())
}

/// Resolve either an ISO-3 code or a display name (both case-insensitive).
pub fn lookup(query: &str) -> Option<&'static CountryRef> {
    by_iso3(query).or_else(|| by_name(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tiles_do_not_overlap_and_fit_grid() {
        let cells: HashSet<(u8, u8)> = AFRICA.iter().map(|c| (c.row, c.col)).collect();
        assert_eq!(cells.len(), AFRICA.len());
        assert!(AFRICA.iter().all(|c| c.row < GRID_ROWS && c.col < GRID_COLS));
    }

    #[test]
    fn lookup_accepts_code_or_name() {
        assert_eq!(lookup("ken").map(|c| c.display_name), Some("Kenya"));
        assert_eq!(lookup("south africa").map(|c| c.iso3), Some("ZAF"));
        assert!(lookup("Atlantis").is_none());
    }
}
