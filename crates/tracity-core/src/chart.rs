//! Visualization kinds shared by filter requests and recommendations.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
    Scatter,
    Bubble,
    Area,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
            Self::Scatter => "scatter",
            Self::Bubble => "bubble",
            Self::Area => "area",
        }
    }

    /// Parse a chart name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Some(Self::Bar),
            "line" => Some(Self::Line),
            "pie" => Some(Self::Pie),
            "doughnut" => Some(Self::Doughnut),
            "scatter" => Some(Self::Scatter),
            "bubble" => Some(Self::Bubble),
            "area" => Some(Self::Area),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown or missing names fall back to `bar`.
impl<'de> Deserialize<'de> for ChartKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Self::parse).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_deserialize() {
        let kind: ChartKind = serde_json::from_str("\"Line\"").unwrap();
        assert_eq!(kind, ChartKind::Line);
        let kind: ChartKind = serde_json::from_str("\"radar\"").unwrap();
        assert_eq!(kind, ChartKind::Bar);
    }

    #[test]
    fn test_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&ChartKind::Doughnut).unwrap(), "\"doughnut\"");
    }
}
