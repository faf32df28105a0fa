//! Coercion of raw input rows into [`Record`]s.
//!
//! Per-field problems never fail the load: unparseable numbers become `0`,
//! missing categories become [`UNKNOWN`]. Only a dataset that is not an array
//! of objects is rejected.

use crate::error::NormalizeError;
use crate::record::{Decision, Record, UNKNOWN};
use serde_json::{Map, Value};

/// Normalize a raw dataset into records, assigning ids by position.
///
/// # Errors
///
/// Returns an error if `raw` is not an array, or if any element is not an
/// object.
pub fn normalize(raw: &Value) -> Result<Vec<Record>, NormalizeError> {
    let rows = raw.as_array().ok_or(NormalizeError::NotASequence {
        found: json_type(raw),
    })?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            row.as_object()
                .map(|obj| normalize_row(index, obj))
                .ok_or(NormalizeError::NotARow {
                    index,
                    found: json_type(row),
                })
        })
        .collect()
}

/// Normalize a single row object.
#[must_use]
pub fn normalize_row(id: usize, row: &Map<String, Value>) -> Record {
    Record {
        id,
        client_id: category(row.get("id_cliente")),
        income: number(row.get("ingresos_mensuales")),
        risk_score: number(row.get("score_riesgo")),
        total_debt: number(row.get("deuda_total")),
        age: number(row.get("edad")),
        requested_amount: number(row.get("monto_solicitado")),
        commune: category(row.get("comuna")),
        nationality: category(row.get("nacionalidad")),
        contract_type: category(row.get("tipo_contrato")),
        decision: label(row.get("decision_legacy"))
            .map_or(Decision::Unset, |l| Decision::parse(&l)),
    }
}

/// Coerce a raw value to a finite, non-negative number, or `0`.
fn number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() && n > 0.0 => n,
        _ => 0.0,
    }
}

/// Coerce a raw value to a non-empty label, or [`UNKNOWN`].
fn category(value: Option<&Value>) -> String {
    label(value).unwrap_or_else(|| UNKNOWN.to_string())
}

/// Trimmed string, or stringified number or bool. `None` when absent or empty.
fn label(value: Option<&Value>) -> Option<String> {
    let label = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => return None,
    };
    (!label.is_empty()).then_some(label)
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loanscope_test::fixture::{arb_raw_row, RowBuilder};
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_normalize_assigns_sequential_ids() {
        let raw = json!([
            RowBuilder::new().age(30).build(),
            RowBuilder::new().age(40).build(),
            RowBuilder::new().age(50).build(),
        ]);
        let records = normalize(&raw).unwrap();
        let ids: Vec<usize> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_normalize_numeric_strings() {
        let raw = json!([{ "edad": " 42 ", "ingresos_mensuales": "950000.5" }]);
        let records = normalize(&raw).unwrap();
        assert_eq!(records[0].age, 42.0);
        assert_eq!(records[0].income, 950_000.5);
    }

    #[test]
    fn test_normalize_invalid_numbers_default_to_zero() {
        let raw = json!([{
            "edad": "treinta",
            "score_riesgo": null,
            "deuda_total": -500,
            "monto_solicitado": [1, 2]
        }]);
        let r = &normalize(&raw).unwrap()[0];
        assert_eq!(r.age, 0.0);
        assert_eq!(r.risk_score, 0.0);
        assert_eq!(r.total_debt, 0.0);
        assert_eq!(r.requested_amount, 0.0);
        assert_eq!(r.income, 0.0);
    }

    #[test]
    fn test_normalize_bool_numbers() {
        let raw = json!([{ "edad": true, "score_riesgo": false }]);
        let r = &normalize(&raw).unwrap()[0];
        assert_eq!(r.age, 1.0);
        assert_eq!(r.risk_score, 0.0);
    }

    #[test]
    fn test_normalize_missing_categories_are_unknown() {
        let raw = json!([{ "comuna": "", "nacionalidad": null, "tipo_contrato": "   " }]);
        let r = &normalize(&raw).unwrap()[0];
        assert_eq!(r.commune, UNKNOWN);
        assert_eq!(r.nationality, UNKNOWN);
        assert_eq!(r.contract_type, UNKNOWN);
        assert_eq!(r.client_id, UNKNOWN);
        assert_eq!(r.decision, Decision::Unset);
    }

    #[test]
    fn test_normalize_numeric_category_is_stringified() {
        let raw = json!([{ "id_cliente": 1042, "comuna": "Ñuñoa" }]);
        let r = &normalize(&raw).unwrap()[0];
        assert_eq!(r.client_id, "1042");
        assert_eq!(r.commune, "Ñuñoa");
    }

    #[test]
    fn test_normalize_decision() {
        let raw = json!([
            { "decision_legacy": "APROBADO" },
            { "decision_legacy": "Rechazado" },
            { "decision_legacy": 1 },
            { "decision_legacy": true },
            { "decision_legacy": "   " },
            { "decision_legacy": null },
        ]);
        let records = normalize(&raw).unwrap();
        assert_eq!(records[0].decision, Decision::Approved);
        assert_eq!(records[1].decision, Decision::Rejected);
        assert_eq!(records[2].decision, Decision::Other("1".to_string()));
        assert_eq!(records[3].decision, Decision::Other("TRUE".to_string()));
        assert_eq!(records[4].decision, Decision::Unset);
        assert_eq!(records[5].decision, Decision::Unset);
        assert_eq!(records[2].categorical(crate::record::CategoricalField::Decision), "1");
    }

    #[test]
    fn test_normalize_rejects_non_sequence() {
        let err = normalize(&json!({ "rows": [] })).unwrap_err();
        assert_eq!(err, NormalizeError::NotASequence { found: "object" });
    }

    #[test]
    fn test_normalize_rejects_non_object_row() {
        let err = normalize(&json!([{ "edad": 30 }, "oops"])).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::NotARow {
                index: 1,
                found: "string"
            }
        );
    }

    #[test]
    fn test_normalize_empty_dataset() {
        assert!(normalize(&json!([])).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn prop_normalized_fields_are_well_formed(rows in prop::collection::vec(arb_raw_row(), 0..40)) {
            let records = normalize(&Value::Array(rows)).unwrap();
            for r in &records {
                for value in [r.income, r.risk_score, r.total_debt, r.age, r.requested_amount] {
                    prop_assert!(value.is_finite());
                    prop_assert!(value >= 0.0);
                }
                for label in [&r.commune, &r.nationality, &r.contract_type, &r.client_id] {
                    prop_assert!(!label.is_empty());
                }
                prop_assert!(!r.decision.label().is_empty());
            }
        }
    }
}
