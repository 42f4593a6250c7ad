//! Static reference dataset: the fixed catalogue of tracked countries.
//!
//! Baseline values are intentionally frozen sample data; the live pipeline
//! overlays fresh readings on top of them. The catalogue order is the
//! canonical display and acquisition order.

use crate::types::{Country, MarketIndex, Region};

#[allow(clippy::too_many_arguments)]
fn single(
    id: &str,
    name: &str,
    flag: &str,
    region: Region,
    currency: &str,
    currency_symbol: &str,
    country_code: &str,
    gdp_trillions: f64,
    index_name: &str,
    lookup_name: &str,
    market_value: &str,
    lat: f64,
    lng: f64,
) -> Country {
    Country {
        id: id.into(),
        name: name.into(),
        flag: flag.into(),
        region,
        currency: currency.into(),
        currency_symbol: currency_symbol.into(),
        gdp_trillions,
        index_name: index_name.into(),
        market_value: market_value.into(),
        indices: None,
        tracked_indices: vec![lookup_name.into()],
        country_code: Some(country_code.into()),
        lat,
        lng,
    }
}

#[allow(clippy::too_many_arguments)]
fn multi(
    id: &str,
    name: &str,
    flag: &str,
    region: Region,
    currency: &str,
    currency_symbol: &str,
    country_code: &str,
    gdp_trillions: f64,
    index_name: &str,
    indices: Vec<(&str, &str)>,
    lat: f64,
    lng: f64,
) -> Country {
    Country {
        id: id.into(),
        name: name.into(),
        flag: flag.into(),
        region,
        currency: currency.into(),
        currency_symbol: currency_symbol.into(),
        gdp_trillions,
        index_name: index_name.into(),
        market_value: "Multiple Indices".into(),
        tracked_indices: indices.iter().map(|(n, _)| (*n).into()).collect(),
        indices: Some(
            indices
                .into_iter()
                .map(|(name, value)| MarketIndex {
                    name: name.into(),
                    value: value.into(),
                })
                .collect(),
        ),
        country_code: Some(country_code.into()),
        lat,
        lng,
    }
}

/// The full tracked-country catalogue, in canonical order.
pub fn catalog() -> Vec<Country> {
    use Region::*;

    vec![
        // ── North America ─────────────────────────────────────────────
        multi(
            "usa",
            "United States",
            "🇺🇸",
            NorthAmerica,
            "US Dollar",
            "$",
            "USA",
            27.4,
            "Dow Jones / S&P 500 / NASDAQ",
            vec![
                ("Dow Jones", "42,840.26"),
                ("S&P 500", "5,842.21"),
                ("NASDAQ", "18,342.10"),
            ],
            39.8,
            -98.5,
        ),
        single(
            "can", "Canada", "🇨🇦", NorthAmerica, "Canadian Dollar", "C$", "CAN", 2.1,
            "S&P/TSX Composite", "S&P/TSX Composite", "22,234.10", 56.1, -106.3,
        ),
        single(
            "mex", "Mexico", "🇲🇽", NorthAmerica, "Mexican Peso", "MX$", "MEX", 1.5,
            // Display label differs from the lookup name used by providers.
            "IPC (BMV IPC)", "IPC BMV", "57,210.50", 23.6, -102.5,
        ),
        // ── South America ─────────────────────────────────────────────
        single(
            "bra", "Brazil", "🇧🇷", SouthAmerica, "Brazilian Real", "R$", "BRA", 2.17,
            "IBOVESPA", "IBOVESPA", "128,450.00", -14.2, -51.9,
        ),
        single(
            "arg", "Argentina", "🇦🇷", SouthAmerica, "Argentine Peso", "ARS", "ARG", 0.64,
            "MERVAL", "MERVAL", "1,245,300", -38.4, -63.6,
        ),
        single(
            "col", "Colombia", "🇨🇴", SouthAmerica, "Colombian Peso", "COP", "COL", 0.36,
            "COLCAP", "COLCAP", "1,350.40", 4.6, -74.1,
        ),
        single(
            "chl", "Chile", "🇨🇱", SouthAmerica, "Chilean Peso", "CLP", "CHL", 0.3,
            "S&P IPSA", "S&P IPSA", "6,450.80", -35.6, -71.5,
        ),
        // ── Europe ────────────────────────────────────────────────────
        single(
            "gbr", "United Kingdom", "🇬🇧", Europe, "British Pound", "£", "GBR", 3.3,
            "FTSE 100", "FTSE 100", "8,210.45", 55.3, -3.4,
        ),
        single(
            "deu", "Germany", "🇩🇪", Europe, "Euro", "€", "DEU", 4.5,
            "DAX 40", "DAX 40", "18,456.32", 51.1, 10.4,
        ),
        single(
            "fra", "France", "🇫🇷", Europe, "Euro", "€", "FRA", 3.0,
            "CAC 40", "CAC 40", "7,980.20", 46.2, 2.2,
        ),
        single(
            "ita", "Italy", "🇮🇹", Europe, "Euro", "€", "ITA", 2.2,
            "FTSE MIB", "FTSE MIB", "34,250.50", 41.9, 12.6,
        ),
        single(
            "esp", "Spain", "🇪🇸", Europe, "Euro", "€", "ESP", 1.6,
            "IBEX 35", "IBEX 35", "11,150.20", 40.4, -3.7,
        ),
        single(
            "nld", "Netherlands", "🇳🇱", Europe, "Euro", "€", "NLD", 1.1,
            "AEX", "AEX", "910.45", 52.1, 5.3,
        ),
        single(
            "che", "Switzerland", "🇨🇭", Europe, "Swiss Franc", "CHF", "CHE", 0.9,
            "SMI", "SMI", "11,950.80", 46.8, 8.2,
        ),
        // ── Africa ────────────────────────────────────────────────────
        single(
            "nga", "Nigeria", "🇳🇬", Africa, "Nigerian Naira", "₦", "NGA", 0.39,
            "NGX All-Share", "NGX All-Share", "99,850.15", 9.0, 8.6,
        ),
        single(
            "zaf", "South Africa", "🇿🇦", Africa, "South African Rand", "R", "ZAF", 0.38,
            "JSE Top 40", "JSE Top 40", "74,320.10", -30.5, 22.9,
        ),
        single(
            "egy", "Egypt", "🇪🇬", Africa, "Egyptian Pound", "E£", "EGY", 0.39,
            "EGX 30", "EGX 30", "28,150.00", 26.8, 30.8,
        ),
        single(
            "mar", "Morocco", "🇲🇦", Africa, "Moroccan Dirham", "MAD", "MAR", 0.14,
            "MASI", "MASI", "13,250.60", 31.8, -7.1,
        ),
        // ── Asia ──────────────────────────────────────────────────────
        single(
            "jpn", "Japan", "🇯🇵", Asia, "Japanese Yen", "¥", "JPN", 4.2,
            "Nikkei 225", "Nikkei 225", "38,900.50", 36.2, 138.2,
        ),
        single(
            "chn", "China", "🇨🇳", Asia, "Chinese Yuan", "CNY", "CHN", 17.7,
            "Shanghai Composite", "Shanghai Composite", "3,150.25", 35.8, 104.1,
        ),
        multi(
            "ind",
            "India",
            "🇮🇳",
            Asia,
            "Indian Rupee",
            "₹",
            "IND",
            3.7,
            "Nifty 50 / Sensex",
            vec![("Nifty 50", "22,500.80"), ("BSE Sensex", "74,100.30")],
            20.5,
            78.9,
        ),
        single(
            "idn", "Indonesia", "🇮🇩", Asia, "Indonesian Rupiah", "Rp", "IDN", 1.3,
            "IDX Composite", "IDX Composite", "7,150.20", -0.7, 113.9,
        ),
        single(
            "kor", "South Korea", "🇰🇷", Asia, "South Korean Won", "₩", "KOR", 1.7,
            "KOSPI", "KOSPI", "2,750.30", 35.9, 127.8,
        ),
        single(
            "sgp", "Singapore", "🇸🇬", Asia, "Singapore Dollar", "S$", "SGP", 0.5,
            "Straits Times Index", "Straits Times Index", "3,250.10", 1.35, 103.8,
        ),
        single(
            "hkg", "Hong Kong", "🇭🇰", Asia, "Hong Kong Dollar", "HK$", "HKG", 0.36,
            "Hang Seng Index", "Hang Seng Index", "17,850.20", 22.3, 114.2,
        ),
        // ── Middle East ───────────────────────────────────────────────
        single(
            "sau", "Saudi Arabia", "🇸🇦", MiddleEast, "Saudi Riyal", "SAR", "SAU", 1.1,
            "Tadawul All Share", "Tadawul All Share", "12,450.60", 23.8, 45.0,
        ),
        multi(
            "are",
            "UAE",
            "🇦🇪",
            MiddleEast,
            "UAE Dirham",
            "AED",
            "ARE",
            0.5,
            "ADX / DFM General",
            vec![("ADX General", "9,250.40"), ("DFM General", "4,250.30")],
            23.4,
            53.8,
        ),
        // ── Oceania ───────────────────────────────────────────────────
        single(
            "aus", "Australia", "🇦🇺", Oceania, "Australian Dollar", "A$", "AUS", 1.7,
            "ASX 200", "ASX 200", "7,850.10", -25.2, 133.7,
        ),
        single(
            "nzl", "New Zealand", "🇳🇿", Oceania, "New Zealand Dollar", "NZ$", "NZL", 0.25,
            "NZX 50", "NZX 50", "11,850.40", -40.9, 174.8,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_shape() {
        let countries = catalog();
        assert_eq!(countries.len(), 29);

        let ids: HashSet<&str> = countries.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 29, "ids must be unique");

        for country in &countries {
            assert!(
                !country.tracked_indices.is_empty(),
                "{} has no tracked indices",
                country.id
            );
            assert!(country.country_code.is_some(), "{} has no code", country.id);
        }
    }

    #[test]
    fn test_multi_index_lookup_names_match_baselines() {
        for country in catalog() {
            let Some(indices) = &country.indices else {
                continue;
            };
            let names: Vec<&str> = indices.iter().map(|i| i.name.as_str()).collect();
            let tracked: Vec<&str> =
                country.tracked_indices.iter().map(String::as_str).collect();
            // Merge matches sub-indices by exact name.
            assert_eq!(names, tracked, "mismatch for {}", country.id);
        }
    }

    #[test]
    fn test_multi_index_countries() {
        let countries = catalog();
        let multi: Vec<&str> = countries
            .iter()
            .filter(|c| c.indices.is_some())
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(multi, vec!["usa", "ind", "are"]);
    }
}
