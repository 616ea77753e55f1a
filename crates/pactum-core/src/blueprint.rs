//! Contract blueprint builder.
//!
//! Maps a loosely structured form submission onto a normalized
//! [`ContractBlueprint`]. Every output field is resolved through a
//! [`FieldSpec`]: an ordered list of candidate input keys (primary name
//! first, then legacy aliases) and a literal fallback. The first candidate
//! that is present and not `null` wins.
//!
//! No validation happens here. Numeric fields keep the submitted JSON value
//! as-is, so `"5 MW"` in a capacity field passes through untouched.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

// ── Input ────────────────────────────────────────────────────────────────────

/// A raw form submission: field name to JSON value, no schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSubmission(Map<String, Value>);

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a submission from JSON text. The top level must be an object.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Self::try_from(serde_json::from_str::<Value>(json)?)
    }

    /// Builder-style insert, mostly useful in tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn resolve(&self, field: &FieldSpec) -> Option<&Value> {
        field
            .keys
            .iter()
            .find_map(|key| self.0.get(*key).filter(|v| !v.is_null()))
    }
}

impl From<Map<String, Value>> for FormSubmission {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for FormSubmission {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(CoreError::NotAnObject),
        }
    }
}

// ── Output ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractBlueprint {
    pub id: String,
    pub customer_name: String,
    pub site_name: String,
    pub site_address: String,
    pub capacity: Value,
    pub term: Value,
    pub contract_type: String,
    /// ISO-8601 timestamp; the build instant when the form has none.
    pub effective_date: String,
    pub status: String,
    pub parameters: ContractParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractParameters {
    pub financial: FinancialTerms,
    pub technical: TechnicalSpec,
    pub operating: OperatingTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTerms {
    pub rate: Value,
    pub escalation: Value,
    pub invoice_frequency: String,
    pub payment_terms: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSpec {
    pub voltage: String,
    pub server_count: Value,
    pub components: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingTerms {
    pub output_warranty: Value,
    pub efficiency: Value,
}

// ── Field table ──────────────────────────────────────────────────────────────

/// What a field falls back to when none of its candidate keys is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Text(&'static str),
    Zero,
    EmptyList,
    Now,
}

/// Candidate input keys for one output field, evaluated first-match-wins.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Dotted path of the output field, for diagnostics.
    pub field: &'static str,
    pub keys: &'static [&'static str],
    pub fallback: Fallback,
}

const fn field(name: &'static str, keys: &'static [&'static str], fallback: Fallback) -> FieldSpec {
    FieldSpec {
        field: name,
        keys,
        fallback,
    }
}

pub const ID: FieldSpec = field("id", &["id", "contractId"], Fallback::Text(""));
pub const CUSTOMER_NAME: FieldSpec =
    field("customerName", &["customerName", "customer"], Fallback::Text(""));
pub const SITE_NAME: FieldSpec = field("siteName", &["siteName", "site"], Fallback::Text(""));
pub const SITE_ADDRESS: FieldSpec =
    field("siteAddress", &["siteAddress", "address"], Fallback::Text(""));
pub const CAPACITY: FieldSpec = field("capacity", &["capacity", "ratedCapacity"], Fallback::Zero);
pub const TERM: FieldSpec = field("term", &["term", "termYears"], Fallback::Zero);
pub const CONTRACT_TYPE: FieldSpec =
    field("contractType", &["contractType", "type"], Fallback::Text(""));
pub const EFFECTIVE_DATE: FieldSpec =
    field("effectiveDate", &["effectiveDate", "startDate"], Fallback::Now);
pub const STATUS: FieldSpec = field("status", &["status", "contractStatus"], Fallback::Text("draft"));
pub const RATE: FieldSpec = field("parameters.financial.rate", &["rate", "baseRate"], Fallback::Zero);
pub const ESCALATION: FieldSpec = field(
    "parameters.financial.escalation",
    &["escalation", "escalationRate"],
    Fallback::Zero,
);
pub const INVOICE_FREQUENCY: FieldSpec = field(
    "parameters.financial.invoiceFrequency",
    &["invoiceFrequency", "billingFrequency"],
    Fallback::Text("monthly"),
);
pub const PAYMENT_TERMS: FieldSpec = field(
    "parameters.financial.paymentTerms",
    &["paymentTerms", "terms"],
    Fallback::Text("net 30"),
);
pub const VOLTAGE: FieldSpec = field(
    "parameters.technical.voltage",
    &["voltage", "outputVoltage"],
    Fallback::Text(""),
);
pub const SERVER_COUNT: FieldSpec = field(
    "parameters.technical.serverCount",
    &["serverCount", "servers"],
    Fallback::Zero,
);
pub const COMPONENTS: FieldSpec = field(
    "parameters.technical.components",
    &["components", "componentList"],
    Fallback::EmptyList,
);
pub const OUTPUT_WARRANTY: FieldSpec = field(
    "parameters.operating.outputWarranty",
    &["outputWarranty", "outputWarrantyPercent"],
    Fallback::Zero,
);
pub const EFFICIENCY: FieldSpec = field(
    "parameters.operating.efficiency",
    &["efficiency", "efficiencyPercent"],
    Fallback::Zero,
);

/// Every field the builder resolves, in output order.
pub const FIELDS: [FieldSpec; 18] = [
    ID,
    CUSTOMER_NAME,
    SITE_NAME,
    SITE_ADDRESS,
    CAPACITY,
    TERM,
    CONTRACT_TYPE,
    EFFECTIVE_DATE,
    STATUS,
    RATE,
    ESCALATION,
    INVOICE_FREQUENCY,
    PAYMENT_TERMS,
    VOLTAGE,
    SERVER_COUNT,
    COMPONENTS,
    OUTPUT_WARRANTY,
    EFFICIENCY,
];

// ── Builder ──────────────────────────────────────────────────────────────────

/// Build a blueprint, stamping a missing effective date with the current
/// instant. Returns `None` when there is no submission at all.
pub fn build_blueprint(form: Option<&FormSubmission>) -> Option<ContractBlueprint> {
    build_blueprint_at(form, Timestamp::now())
}

/// Same as [`build_blueprint`] with an explicit clock.
pub fn build_blueprint_at(
    form: Option<&FormSubmission>,
    now: Timestamp,
) -> Option<ContractBlueprint> {
    let form = form?;
    let r = Resolver { form, now };

    Some(ContractBlueprint {
        id: r.text(&ID),
        customer_name: r.text(&CUSTOMER_NAME),
        site_name: r.text(&SITE_NAME),
        site_address: r.text(&SITE_ADDRESS),
        capacity: r.value(&CAPACITY),
        term: r.value(&TERM),
        contract_type: r.text(&CONTRACT_TYPE),
        effective_date: r.text(&EFFECTIVE_DATE),
        status: r.text(&STATUS),
        parameters: ContractParameters {
            financial: FinancialTerms {
                rate: r.value(&RATE),
                escalation: r.value(&ESCALATION),
                invoice_frequency: r.text(&INVOICE_FREQUENCY),
                payment_terms: r.text(&PAYMENT_TERMS),
            },
            technical: TechnicalSpec {
                voltage: r.text(&VOLTAGE),
                server_count: r.value(&SERVER_COUNT),
                components: r.list(&COMPONENTS),
            },
            operating: OperatingTerms {
                output_warranty: r.value(&OUTPUT_WARRANTY),
                efficiency: r.value(&EFFICIENCY),
            },
        },
    })
}

struct Resolver<'a> {
    form: &'a FormSubmission,
    now: Timestamp,
}

impl Resolver<'_> {
    fn fallback(&self, field: &FieldSpec) -> Value {
        match field.fallback {
            Fallback::Text(s) => Value::String(s.to_string()),
            Fallback::Zero => Value::from(0),
            Fallback::EmptyList => Value::Array(Vec::new()),
            Fallback::Now => Value::String(self.now.to_string()),
        }
    }

    fn value(&self, field: &FieldSpec) -> Value {
        self.form
            .resolve(field)
            .cloned()
            .unwrap_or_else(|| self.fallback(field))
    }

    fn text(&self, field: &FieldSpec) -> String {
        match self.value(field) {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    fn list(&self, field: &FieldSpec) -> Vec<Value> {
        match self.value(field) {
            Value::Array(items) => items,
            other => vec![other],
        }
    }
}
