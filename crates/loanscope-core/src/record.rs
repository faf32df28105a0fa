//! Canonical loan-application record and its field vocabulary.
//!
//! Field names follow the input dataset (`edad`, `score_riesgo`, ...), so the
//! same strings flow from the data file through brush filters and chart
//! configuration without a translation table.

use crate::error::FilterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel used for categorical values that are empty or missing.
pub const UNKNOWN: &str = "Unknown";

/// Numeric record fields. These are the only fields a brush can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    /// Monthly income
    #[serde(rename = "ingresos_mensuales")]
    Income,
    /// Risk score
    #[serde(rename = "score_riesgo")]
    RiskScore,
    /// Total outstanding debt
    #[serde(rename = "deuda_total")]
    TotalDebt,
    /// Applicant age
    #[serde(rename = "edad")]
    Age,
    /// Requested loan amount
    #[serde(rename = "monto_solicitado")]
    RequestedAmount,
}

impl NumericField {
    /// All numeric fields in input order.
    pub const ALL: [Self; 5] = [
        Self::Income,
        Self::RiskScore,
        Self::TotalDebt,
        Self::Age,
        Self::RequestedAmount,
    ];

    /// Field name as it appears in the input data.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Income => "ingresos_mensuales",
            Self::RiskScore => "score_riesgo",
            Self::TotalDebt => "deuda_total",
            Self::Age => "edad",
            Self::RequestedAmount => "monto_solicitado",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| FilterError::UnknownField(s.to_string()))
    }
}

/// Categorical record fields usable as group keys and flow stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalField {
    /// Municipality of residence
    #[serde(rename = "comuna")]
    Commune,
    /// Nationality
    #[serde(rename = "nacionalidad")]
    Nationality,
    /// Employment contract type
    #[serde(rename = "tipo_contrato")]
    ContractType,
    /// Decision label
    #[serde(rename = "decision_legacy")]
    Decision,
    /// Client identifier
    #[serde(rename = "id_cliente")]
    ClientId,
}

impl CategoricalField {
    /// All categorical fields in input order.
    pub const ALL: [Self; 5] = [
        Self::ClientId,
        Self::Nationality,
        Self::Commune,
        Self::ContractType,
        Self::Decision,
    ];

    /// Field name as it appears in the input data.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Commune => "comuna",
            Self::Nationality => "nacionalidad",
            Self::ContractType => "tipo_contrato",
            Self::Decision => "decision_legacy",
            Self::ClientId => "id_cliente",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CategoricalField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| FilterError::UnknownField(s.to_string()))
    }
}

/// Outcome of a loan application.
///
/// Serialized as its raw label, so configuration can say `RECHAZADO`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Decision {
    /// `APROBADO`
    Approved,
    /// `RECHAZADO`
    Rejected,
    /// Any other non-empty label, upper-cased
    Other(String),
    /// Missing or empty
    #[default]
    Unset,
}

impl Decision {
    /// Label used for approved applications.
    pub const APPROVED: &'static str = "APROBADO";
    /// Label used for rejected applications.
    pub const REJECTED: &'static str = "RECHAZADO";

    /// Parse a decision label, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let label = label.trim().to_uppercase();
        match label.as_str() {
            "" => Self::Unset,
            Self::APPROVED => Self::Approved,
            Self::REJECTED => Self::Rejected,
            _ => Self::Other(label),
        }
    }

    /// Categorical label. `Unset` reports the [`UNKNOWN`] sentinel.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Approved => Self::APPROVED,
            Self::Rejected => Self::REJECTED,
            Self::Other(label) => label,
            Self::Unset => UNKNOWN,
        }
    }
}

impl From<String> for Decision {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<Decision> for String {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Unset => Self::new(),
            other => other.label().to_string(),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized loan-application record.
///
/// Numeric fields are finite and non-negative; categorical fields are never
/// empty. Records are never mutated after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Position in the loaded dataset
    pub id: usize,
    /// Client identifier from the source
    pub client_id: String,
    /// `ingresos_mensuales`
    pub income: f64,
    /// `score_riesgo`
    pub risk_score: f64,
    /// `deuda_total`
    pub total_debt: f64,
    /// `edad`
    pub age: f64,
    /// `monto_solicitado`
    pub requested_amount: f64,
    /// `comuna`
    pub commune: String,
    /// `nacionalidad`
    pub nationality: String,
    /// `tipo_contrato`
    pub contract_type: String,
    /// `decision_legacy`
    pub decision: Decision,
}

impl Record {
    /// Read a numeric field.
    #[must_use]
    pub const fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Income => self.income,
            NumericField::RiskScore => self.risk_score,
            NumericField::TotalDebt => self.total_debt,
            NumericField::Age => self.age,
            NumericField::RequestedAmount => self.requested_amount,
        }
    }

    /// Read a categorical field as its label.
    #[must_use]
    pub fn categorical(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Commune => &self.commune,
            CategoricalField::Nationality => &self.nationality,
            CategoricalField::ContractType => &self.contract_type,
            CategoricalField::Decision => self.decision.label(),
            CategoricalField::ClientId => &self.client_id,
        }
    }
}
