use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
}

pub const DEFAULT_COUNTRY: &str = "JP";
pub const DEFAULT_LANGUAGE: &str = "ja";
const FALLBACK_LOCALE: &str = "en";

static LOCALE_TO_COUNTRY: phf::Map<&'static str, Country> = phf_map! {
    "ja" => Country { code: "JP", name: "Japan" },
    "en" => Country { code: "US", name: "United States" },
    "ko" => Country { code: "KR", name: "South Korea" },
};

/// Country used for catalog availability, unknown locales fall back to English (US)
pub fn country_for_locale(locale: &str) -> Country {
    let lang = locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_lowercase();
    LOCALE_TO_COUNTRY
        .get(lang.as_str())
        .or_else(|| LOCALE_TO_COUNTRY.get(FALLBACK_LOCALE))
        .copied()
        .unwrap_or(Country {
            code: "US",
            name: "United States",
        })
}

pub fn supported_locales() -> impl Iterator<Item = &'static str> {
    LOCALE_TO_COUNTRY.keys().copied()
}
