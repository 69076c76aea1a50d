//! Human-readable answers for targeted chat questions.

use std::collections::HashMap;

use tracity_core::record::{numeric_field, text_field};
use tracity_core::Record;

/// What the question asked for, as resolved by intent extraction.
pub struct NarrativeContext<'a> {
    pub collection: &'a str,
    pub topic: &'a str,
    pub regions: &'a [String],
    pub years: &'a [i32],
}

const TIP: &str = "\n💡 **Tip**: Ask me to compare with other states or years for deeper insights!";

/// Message used when a targeted question matched no records.
pub fn no_data_message(ctx: &NarrativeContext<'_>) -> String {
    let mut qualifier = String::new();
    if !ctx.regions.is_empty() {
        qualifier.push_str(" for ");
        qualifier.push_str(&join_regions(ctx.regions));
    }
    if !ctx.years.is_empty() {
        qualifier.push_str(" in ");
        qualifier.push_str(&join_years(ctx.years));
    }
    format!(
        "I couldn't find specific {} data{}. The data might not be available for those \
         specific parameters. Try asking about different states or years, or check our \
         available datasets.",
        ctx.topic, qualifier
    )
}

/// Render a markdown summary of the matched records.
pub fn describe(records: &[Record], ctx: &NarrativeContext<'_>) -> String {
    if records.is_empty() {
        return no_data_message(ctx);
    }

    let mut out = format!("📊 **{} Data Analysis**\n\n", title_case(ctx.topic));

    match ctx.collection {
        "crimes" => crimes(&mut out, records, ctx),
        "literacy" => {
            let rates = values(records, "literacy_rate");
            if let Some(s) = Summary::of(&rates) {
                scope(&mut out, ctx, false);
                out.push_str(&format!("• **Average Literacy Rate**: {:.1}%\n", s.avg));
                out.push_str(&format!("• **Highest Rate**: {:.1}%\n", s.max));
                out.push_str(&format!("• **Lowest Rate**: {:.1}%\n", s.min));
                out.push_str(&format!("• **Records Analyzed**: {}\n", records.len()));
            }
        }
        "aqi" => {
            let readings = values(records, "aqi");
            if let Some(s) = Summary::of(&readings) {
                scope(&mut out, ctx, false);
                out.push_str(&format!("• **Average AQI**: {:.1}\n", s.avg));
                out.push_str(&format!("• **Highest AQI**: {} (Poor)\n", plain(s.max)));
                out.push_str(&format!("• **Lowest AQI**: {} (Good)\n", plain(s.min)));
                out.push_str(&format!("• **Records Analyzed**: {}\n", records.len()));
                out.push('\n');
                out.push_str(air_quality_band(s.avg));
            }
        }
        "power_consumption" => {
            let usage = values(records, "consumption");
            if let Some(s) = Summary::of(&usage) {
                scope(&mut out, ctx, false);
                out.push_str(&format!("• **Average Consumption**: {:.1} units\n", s.avg));
                out.push_str(&format!("• **Peak Consumption**: {}\n", plain(s.max)));
                out.push_str(&format!("• **Minimum Consumption**: {}\n", plain(s.min)));
                out.push_str(&format!("• **Records Analyzed**: {}\n", records.len()));
            }
        }
        _ => {}
    }

    out.push_str(TIP);
    out
}

fn crimes(out: &mut String, records: &[Record], ctx: &NarrativeContext<'_>) {
    let cases = |r: &Record| numeric_field(r, "cases_reported").unwrap_or(0.0);
    let total: f64 = records.iter().map(cases).sum();
    let avg = total / records.len() as f64;

    scope(out, ctx, true);
    out.push_str(&format!("• **Total Cases**: {}\n", thousands(total)));
    out.push_str(&format!("• **Average per Record**: {avg:.1}\n"));
    out.push_str(&format!("• **Records Found**: {}\n", records.len()));

    let mut by_type: HashMap<&str, f64> = HashMap::new();
    for r in records {
        let kind = text_field(r, "crime_type").unwrap_or("Unknown");
        *by_type.entry(kind).or_default() += cases(r);
    }
    let mut ranked: Vec<(&str, f64)> = by_type.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    out.push_str("\n**Crime Types Breakdown**:\n");
    for (kind, n) in ranked.into_iter().take(5) {
        out.push_str(&format!("• {}: {} cases\n", kind, thousands(n)));
    }
}

/// "For **Delhi** in **2021**:" header. Crime answers only print it when
/// regions were named; the others fall back to "various states".
fn scope(out: &mut String, ctx: &NarrativeContext<'_>, regions_required: bool) {
    if ctx.regions.is_empty() && regions_required {
        return;
    }
    let regions = if ctx.regions.is_empty() {
        "various states".to_string()
    } else {
        join_regions(ctx.regions)
    };
    out.push_str(&format!("For **{regions}**"));
    if !ctx.years.is_empty() {
        out.push_str(&format!(" in **{}**", join_years(ctx.years)));
    }
    out.push_str(":\n");
}

fn join_regions(regions: &[String]) -> String {
    regions
        .iter()
        .map(|r| title_case(r))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_years(years: &[i32]) -> String {
    years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn air_quality_band(avg: f64) -> &'static str {
    if avg > 150.0 {
        "⚠️ **Air Quality**: Unhealthy - Take precautions when going outdoors"
    } else if avg > 100.0 {
        "⚠️ **Air Quality**: Moderate - Sensitive individuals should limit outdoor activities"
    } else {
        "✅ **Air Quality**: Good - Safe for outdoor activities"
    }
}

struct Summary {
    avg: f64,
    max: f64,
    min: f64,
}

impl Summary {
    fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        Some(Self {
            avg: sum / values.len() as f64,
            max: values.iter().copied().fold(f64::MIN, f64::max),
            min: values.iter().copied().fold(f64::MAX, f64::min),
        })
    }
}

/// Non-zero numeric readings of `field`.
fn values(records: &[Record], field: &str) -> Vec<f64> {
    records
        .iter()
        .filter_map(|r| numeric_field(r, field))
        .filter(|v| *v != 0.0)
        .collect()
}

/// Integral values print without decimals.
fn plain(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// `1234567` → `1,234,567`. Fractional parts are kept.
pub fn thousands(v: f64) -> String {
    let rendered = plain(v);
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (rendered, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part.as_str()),
    };

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1234.0), "1,234");
        assert_eq!(thousands(1234567.0), "1,234,567");
        assert_eq!(thousands(-4500.5), "-4,500.5");
    }

    #[test]
    fn test_crime_breakdown() {
        let data = records(vec![
            json!({"state": "Delhi", "year": 2021, "crime_type": "Theft", "cases_reported": 1500}),
            json!({"state": "Delhi", "year": 2021, "crime_type": "Assault", "cases_reported": 300}),
            json!({"state": "Delhi", "year": 2021, "crime_type": "Theft", "cases_reported": 700}),
        ]);
        let regions = vec!["delhi".to_string()];
        let ctx = NarrativeContext {
            collection: "crimes",
            topic: "crime",
            regions: &regions,
            years: &[2021],
        };
        let text = describe(&data, &ctx);

        assert!(text.starts_with("📊 **Crime Data Analysis**"));
        assert!(text.contains("For **Delhi** in **2021**:"));
        assert!(text.contains("**Total Cases**: 2,500"));
        assert!(text.contains("**Average per Record**: 833.3"));
        assert!(text.contains("**Records Found**: 3"));
        let theft = text.find("• Theft: 2,200 cases").unwrap();
        let assault = text.find("• Assault: 300 cases").unwrap();
        assert!(theft < assault);
        assert!(text.ends_with(TIP));
    }

    #[test]
    fn test_aqi_band() {
        let data = records(vec![json!({"aqi": 180}), json!({"aqi": 160})]);
        let ctx = NarrativeContext {
            collection: "aqi",
            topic: "air quality",
            regions: &[],
            years: &[2022],
        };
        let text = describe(&data, &ctx);
        assert!(text.contains("For **various states** in **2022**:"));
        assert!(text.contains("**Highest AQI**: 180 (Poor)"));
        assert!(text.contains("Unhealthy"));

        assert!(air_quality_band(120.0).contains("Moderate"));
        assert!(air_quality_band(100.0).contains("Good"));
    }

    #[test]
    fn test_literacy_stats() {
        let data = records(vec![
            json!({"literacy_rate": 90.5}),
            json!({"literacy_rate": 70.5}),
        ]);
        let ctx = NarrativeContext {
            collection: "literacy",
            topic: "literacy",
            regions: &[],
            years: &[],
        };
        let text = describe(&data, &ctx);
        assert!(text.contains("**Average Literacy Rate**: 80.5%"));
        assert!(text.contains("**Lowest Rate**: 70.5%"));
    }

    #[test]
    fn test_empty_records() {
        let regions = vec!["kerala".to_string()];
        let ctx = NarrativeContext {
            collection: "literacy",
            topic: "literacy",
            regions: &regions,
            years: &[2019, 2020],
        };
        let text = describe(&[], &ctx);
        assert_eq!(text, no_data_message(&ctx));
        assert!(text.starts_with(
            "I couldn't find specific literacy data for Kerala in 2019, 2020."
        ));
    }
}
