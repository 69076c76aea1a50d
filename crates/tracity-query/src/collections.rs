//! Per-collection quirks: how years are encoded and which categorical
//! dimensions a collection carries.

/// Field holding the region (state) name in every collection.
pub const REGION_FIELD: &str = "state";

/// Collections searched by the general chat path, in priority order.
pub const PRIORITY_COLLECTIONS: &[&str] = &["crimes", "literacy", "aqi", "power_consumption"];

/// How a collection stores time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearEncoding {
    /// An integer year field.
    Field(&'static str),
    /// An ISO date string field; the year is its first four characters.
    DatePrefix(&'static str),
}

/// A categorical dimension exposed as a special filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialFilter {
    /// Name in metadata and on the wire (e.g. `crime_types`).
    pub name: &'static str,
    /// Stored field it filters on (e.g. `crime_type`).
    pub field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionProfile {
    pub years: YearEncoding,
    pub special_filters: &'static [SpecialFilter],
}

const CRIME_FILTERS: &[SpecialFilter] = &[SpecialFilter {
    name: "crime_types",
    field: "crime_type",
}];

const DIRECT_YEAR: CollectionProfile = CollectionProfile {
    years: YearEncoding::Field("year"),
    special_filters: &[],
};

impl CollectionProfile {
    /// Profile for a collection. Unknown names get a direct `year` field and
    /// no special filters.
    pub fn for_collection(name: &str) -> Self {
        match name {
            "crimes" => Self {
                years: YearEncoding::Field("year"),
                special_filters: CRIME_FILTERS,
            },
            "covid_stats" => Self {
                years: YearEncoding::DatePrefix("date"),
                special_filters: &[],
            },
            _ => DIRECT_YEAR,
        }
    }

    pub fn is_date_encoded(&self) -> bool {
        matches!(self.years, YearEncoding::DatePrefix(_))
    }

    /// The categorical dimension a request's category list applies to.
    pub fn primary_special_filter(&self) -> Option<&'static SpecialFilter> {
        self.special_filters.first()
    }
}

/// Storage-internal collections are hidden from listings.
pub fn is_system_collection(name: &str) -> bool {
    name.starts_with("system.")
}

/// Human-readable description for dataset listings.
pub fn dataset_description(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.contains("covid") {
        "COVID-19 statistics and trends data"
    } else if lower.contains("crime") {
        "Crime statistics and safety data"
    } else if lower.contains("education") || lower.contains("literacy") {
        "Education and literacy statistics"
    } else if lower.contains("aqi") {
        "Air Quality Index measurements"
    } else if lower.contains("power") {
        "Power consumption and energy usage data"
    } else {
        "Dataset containing various data points"
    }
}

/// `power_consumption` → `Power Consumption`.
pub fn display_name(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(title_word)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        assert!(CollectionProfile::for_collection("covid_stats").is_date_encoded());
        assert!(!CollectionProfile::for_collection("crimes").is_date_encoded());
        assert_eq!(
            CollectionProfile::for_collection("crimes")
                .primary_special_filter()
                .map(|f| f.field),
            Some("crime_type")
        );
        assert!(CollectionProfile::for_collection("weather")
            .special_filters
            .is_empty());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("power_consumption"), "Power Consumption");
        assert_eq!(display_name("aqi"), "Aqi");
    }

    #[test]
    fn test_dataset_description() {
        assert_eq!(dataset_description("covid_stats"), "COVID-19 statistics and trends data");
        assert_eq!(dataset_description("misc"), "Dataset containing various data points");
    }
}
