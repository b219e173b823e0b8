//! Country resolution from portal range labels
//!
//! Range labels look like "Russian (+7)" or "Indonesia (+62)". The portal's
//! country names frequently diverge from standard ISO names, so a manual
//! override table is consulted first (exact match over the cleaned name);
//! only then is the ISO-3166 database searched. Unresolvable labels keep
//! their cleaned name with a generic globe marker.

/// Resolved display metadata for a range label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryInfo {
    /// Regional-indicator flag glyph, or 🌍 when unresolved
    pub flag: String,
    /// Two-letter code, or "UN" when unresolved
    pub code: String,
    /// Cleaned portal name, preserved verbatim
    pub display_name: String,
}

/// Portal spellings that differ from (or shadow) ISO names.
/// Exact, case-sensitive match over the cleaned label.
const MANUAL_COUNTRIES: &[(&str, &str)] = &[
    ("Russian", "RU"),
    ("Russia", "RU"),
    ("USA", "US"),
    ("United States", "US"),
    ("America", "US"),
    ("UK", "GB"),
    ("United Kingdom", "GB"),
    ("England", "GB"),
    ("Vietnam", "VN"),
    ("Indonesia", "ID"),
    ("Malaysia", "MY"),
    ("Philippines", "PH"),
    ("Thailand", "TH"),
    ("Myanmar", "MM"),
    ("Cambodia", "KH"),
    ("Laos", "LA"),
    ("Timor Leste", "TL"),
    ("Brunei", "BN"),
    ("Singapore", "SG"),
    ("China", "CN"),
    ("Hong Kong", "HK"),
    ("Taiwan", "TW"),
    ("Japan", "JP"),
    ("Korea", "KR"),
    ("India", "IN"),
    ("Pakistan", "PK"),
    ("Bangladesh", "BD"),
    ("Nepal", "NP"),
    ("Sri Lanka", "LK"),
    ("Turkey", "TR"),
    ("Iran", "IR"),
    ("Iraq", "IQ"),
    ("Saudi Arabia", "SA"),
    ("UAE", "AE"),
    ("Egypt", "EG"),
    ("Morocco", "MA"),
    ("Algeria", "DZ"),
    ("Tunisia", "TN"),
    ("Nigeria", "NG"),
    ("Kenya", "KE"),
    ("South Africa", "ZA"),
    ("Brazil", "BR"),
    ("Argentina", "AR"),
    ("Colombia", "CO"),
    ("Mexico", "MX"),
    ("Canada", "CA"),
    ("Germany", "DE"),
    ("France", "FR"),
    ("Italy", "IT"),
    ("Spain", "ES"),
    ("Netherlands", "NL"),
    ("Belgium", "BE"),
    ("Portugal", "PT"),
    ("Poland", "PL"),
    ("Ukraine", "UA"),
    ("Sweden", "SE"),
];

/// Resolve a portal range label into display metadata
///
/// Never fails: a label no table can place still yields a usable
/// `CountryInfo` with the cleaned name preserved.
pub fn resolve_country(range_label: &str) -> CountryInfo {
    let clean_name = clean_label(range_label);

    if let Some((_, code)) = MANUAL_COUNTRIES.iter().find(|(name, _)| *name == clean_name) {
        return CountryInfo {
            flag: flag_from_code(code),
            code: (*code).to_string(),
            display_name: clean_name,
        };
    }

    if let Some(code) = iso_lookup(&clean_name) {
        return CountryInfo {
            flag: flag_from_code(&code),
            code,
            display_name: clean_name,
        };
    }

    CountryInfo {
        flag: "🌍".to_string(),
        code: "UN".to_string(),
        display_name: clean_name,
    }
}

/// Strip the parenthesized prefix suffix ("Russian (+7)" → "Russian")
fn clean_label(label: &str) -> String {
    label
        .split('(')
        .next()
        .unwrap_or(label)
        .trim()
        .to_string()
}

/// Search the ISO-3166 database: normalized equality first, then
/// containment either way (handles "Viet Nam" vs "Vietnam" spellings).
fn iso_lookup(name: &str) -> Option<String> {
    let needle = normalize(name);
    if needle.is_empty() {
        return None;
    }

    for country in rust_iso3166::ALL {
        if normalize(country.name) == needle {
            return Some(country.alpha2.to_string());
        }
    }

    // Containment needs a few characters of signal to avoid junk matches
    if needle.len() >= 4 {
        for country in rust_iso3166::ALL {
            let iso_name = normalize(country.name);
            if iso_name.contains(&needle) || needle.contains(&iso_name) {
                return Some(country.alpha2.to_string());
            }
        }
    }

    None
}

/// Lowercase and drop everything non-alphanumeric
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Synthesize the regional-indicator flag glyph pair from an alpha-2 code
fn flag_from_code(code: &str) -> String {
    code.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(2)
        .filter_map(|c| char::from_u32(0x1F1E6 + (c.to_ascii_uppercase() as u32) - ('A' as u32)))
        .collect()
}
