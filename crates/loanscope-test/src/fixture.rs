//! Raw-row builders, a deterministic sample dataset and proptest strategies.
//!
//! # Example
//!
//! ```
//! use loanscope_test::fixture::RowBuilder;
//!
//! let row = RowBuilder::new().age(25).decision("APROBADO").build();
//! assert_eq!(row["edad"], 25);
//! ```

use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Builder for a single raw input row.
#[derive(Debug, Clone, Default)]
pub struct RowBuilder {
    fields: Map<String, Value>,
}

impl RowBuilder {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary raw field.
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Set `id_cliente`.
    #[must_use]
    pub fn client_id(self, id: impl Into<Value>) -> Self {
        self.field("id_cliente", id)
    }

    /// Set `edad`.
    #[must_use]
    pub fn age(self, age: impl Into<Value>) -> Self {
        self.field("edad", age)
    }

    /// Set `ingresos_mensuales`.
    #[must_use]
    pub fn income(self, income: impl Into<Value>) -> Self {
        self.field("ingresos_mensuales", income)
    }

    /// Set `score_riesgo`.
    #[must_use]
    pub fn risk_score(self, score: impl Into<Value>) -> Self {
        self.field("score_riesgo", score)
    }

    /// Set `deuda_total`.
    #[must_use]
    pub fn total_debt(self, debt: impl Into<Value>) -> Self {
        self.field("deuda_total", debt)
    }

    /// Set `monto_solicitado`.
    #[must_use]
    pub fn requested_amount(self, amount: impl Into<Value>) -> Self {
        self.field("monto_solicitado", amount)
    }

    /// Set `comuna`.
    #[must_use]
    pub fn commune(self, commune: &str) -> Self {
        self.field("comuna", commune)
    }

    /// Set `nacionalidad`.
    #[must_use]
    pub fn nationality(self, nationality: &str) -> Self {
        self.field("nacionalidad", nationality)
    }

    /// Set `tipo_contrato`.
    #[must_use]
    pub fn contract_type(self, contract: &str) -> Self {
        self.field("tipo_contrato", contract)
    }

    /// Set `decision_legacy`.
    #[must_use]
    pub fn decision(self, decision: &str) -> Self {
        self.field("decision_legacy", decision)
    }

    /// Finish the row.
    #[must_use]
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

const COMMUNES: [&str; 5] = ["Santiago", "Maipú", "Puente Alto", "Ñuñoa", "La Florida"];
const NATIONALITIES: [&str; 4] = ["Chilena", "Venezolana", "Peruana", "Colombiana"];
const CONTRACTS: [&str; 3] = ["Indefinido", "Plazo Fijo", "Honorarios"];

/// Deterministic dataset of `n` complete rows.
///
/// Values cycle through small vocabularies so every group is well populated;
/// every third row is rejected.
#[must_use]
pub fn sample_rows(n: usize) -> Value {
    let rows: Vec<Value> = (0..n)
        .map(|i| {
            let decision = if i % 3 == 0 { "RECHAZADO" } else { "APROBADO" };
            json!({
                "id_cliente": format!("C-{i:05}"),
                "edad": 18 + (i * 7) % 50,
                "nacionalidad": NATIONALITIES[i % NATIONALITIES.len()],
                "comuna": COMMUNES[(i / 2) % COMMUNES.len()],
                "tipo_contrato": CONTRACTS[i % CONTRACTS.len()],
                "ingresos_mensuales": 400_000 + (i * 37_000) % 2_600_000,
                "score_riesgo": 300 + (i * 13) % 600,
                "deuda_total": (i * 91_000) % 8_000_000,
                "monto_solicitado": 500_000 + (i * 53_000) % 9_000_000,
                "decision_legacy": decision,
            })
        })
        .collect();
    Value::Array(rows)
}

fn arb_raw_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_map(|f| serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)),
        "[ a-zA-Z0-9.\\-]{0,12}".prop_map(Value::String),
    ]
}

/// Strategy producing messy rows: any field may be missing, null, a bool,
/// a number of any sign, or an arbitrary short string.
pub fn arb_raw_row() -> impl Strategy<Value = Value> {
    const FIELDS: [&str; 10] = [
        "id_cliente",
        "edad",
        "nacionalidad",
        "comuna",
        "tipo_contrato",
        "ingresos_mensuales",
        "score_riesgo",
        "deuda_total",
        "monto_solicitado",
        "decision_legacy",
    ];

    prop::collection::vec(prop::option::of(arb_raw_value()), FIELDS.len()).prop_map(|values| {
        let fields: Map<String, Value> = FIELDS
            .iter()
            .zip(values)
            .filter_map(|(name, value)| value.map(|v| ((*name).to_string(), v)))
            .collect();
        Value::Object(fields)
    })
}
