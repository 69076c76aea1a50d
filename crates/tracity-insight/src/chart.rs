//! Chart recommendation from a result sample.
//!
//! Only the first record's field kinds are considered. Rules, first match
//! wins:
//! 1. a temporal and a numeric field → line (area, bar)
//! 2. exactly one text and one numeric field → bar (pie, doughnut)
//! 3. two or more numeric fields → scatter (bubble, line)
//! 4. otherwise → bar (pie, line)

use tracity_core::record::IDENTITY_KEY;
use tracity_core::{ChartKind, FieldKind, Record};

use crate::types::ChartRecommendation;

pub fn recommend(sample: &[Record]) -> ChartRecommendation {
    use ChartKind::*;

    let Some(first) = sample.first() else {
        return rec(Bar, &[Line, Pie]);
    };

    let (mut numeric, mut text, mut temporal) = (0usize, 0usize, 0usize);
    for (key, value) in first {
        if key == IDENTITY_KEY {
            continue;
        }
        match FieldKind::of(value) {
            FieldKind::Numeric => numeric += 1,
            FieldKind::Text => text += 1,
            FieldKind::Temporal => temporal += 1,
            FieldKind::Unknown => {}
        }
    }

    if temporal >= 1 && numeric >= 1 {
        rec(Line, &[Area, Bar])
    } else if text == 1 && numeric == 1 {
        rec(Bar, &[Pie, Doughnut])
    } else if numeric >= 2 {
        rec(Scatter, &[Bubble, Line])
    } else {
        rec(Bar, &[Pie, Line])
    }
}

fn rec(recommended: ChartKind, alternatives: &[ChartKind]) -> ChartRecommendation {
    ChartRecommendation {
        recommended,
        alternatives: alternatives.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_empty_sample() {
        let r = recommend(&[]);
        assert_eq!(r.recommended, ChartKind::Bar);
        assert_eq!(r.alternatives, vec![ChartKind::Line, ChartKind::Pie]);
    }

    #[test]
    fn test_category_and_measure() {
        let r = recommend(&sample(vec![json!({"state": "X", "cases": 10})]));
        assert_eq!(r.recommended, ChartKind::Bar);
        assert_eq!(r.alternatives, vec![ChartKind::Pie, ChartKind::Doughnut]);
    }

    #[test]
    fn test_time_series() {
        let r = recommend(&sample(vec![json!({"date": "2020-01-01", "cases": 10})]));
        assert_eq!(r.recommended, ChartKind::Line);
        assert_eq!(r.alternatives, vec![ChartKind::Area, ChartKind::Bar]);
    }

    #[test]
    fn test_many_measures() {
        let r = recommend(&sample(vec![json!({
            "state": "X", "region": "South", "year": 2020, "aqi": 140
        })]));
        assert_eq!(r.recommended, ChartKind::Scatter);
    }

    #[test]
    fn test_only_first_record_counts() {
        let r = recommend(&sample(vec![
            json!({"state": "X", "note": "n"}),
            json!({"date": "2020-01-01", "cases": 3}),
        ]));
        assert_eq!(r.recommended, ChartKind::Bar);
        assert_eq!(r.alternatives, vec![ChartKind::Pie, ChartKind::Line]);
    }

    #[test]
    fn test_identity_key_ignored() {
        let r = recommend(&sample(vec![json!({"_id": 1, "state": "X", "cases": 10})]));
        assert_eq!(r.alternatives, vec![ChartKind::Pie, ChartKind::Doughnut]);
    }
}
