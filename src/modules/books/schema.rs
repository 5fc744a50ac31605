//! Declarative validation of book payloads.
//!
//! The rules live in `schemas/book.schema.json`; this module compiles that
//! document once and reports every violated rule for a candidate payload.
//! Nothing here touches storage.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

const BOOK_SCHEMA: &str = include_str!("../../../schemas/book.schema.json");

/// One violated schema rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// JSON Pointer to the offending value; empty for the document root.
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "path": self.path,
            "message": self.message,
        })
    }
}

/// Compiled book schema.
pub struct BookSchema {
    validator: jsonschema::Validator,
}

impl BookSchema {
    /// Compile the bundled book schema with format assertions enabled.
    pub fn new() -> anyhow::Result<Self> {
        let document: Value =
            serde_json::from_str(BOOK_SCHEMA).context("book schema is not valid JSON")?;
        Self::from_document(&document)
    }

    pub fn from_document(document: &Value) -> anyhow::Result<Self> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(document)
            .map_err(|err| anyhow::anyhow!("failed to compile book schema: {}", err))?;

        Ok(Self { validator })
    }

    /// Check `input` against the schema, returning every violation in
    /// schema evaluation order.
    pub fn validate(&self, input: &Value) -> Result<(), Vec<SchemaViolation>> {
        let violations: Vec<SchemaViolation> = self
            .validator
            .iter_errors(input)
            .map(|error| SchemaViolation {
                path: error.instance_path.to_string(),
                message: error.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Validate `input` and decode it into `T`.
    ///
    /// The schema accepts integral floats such as `264.0` for integer fields;
    /// they are folded to integers before decoding. Integers outside the `i64`
    /// range are reported against their field.
    pub fn parse<T: DeserializeOwned>(&self, input: &Value) -> Result<T, Vec<SchemaViolation>> {
        self.validate(input)?;
        let input = fold_integral_numbers(input)?;

        serde_json::from_value(input).map_err(|err| {
            vec![SchemaViolation {
                path: String::new(),
                message: err.to_string(),
            }]
        })
    }
}

fn fold_integral_numbers(input: &Value) -> Result<Value, Vec<SchemaViolation>> {
    let mut folded = input.clone();
    let Some(fields) = folded.as_object_mut() else {
        return Ok(folded);
    };

    let mut violations = Vec::new();
    for (key, value) in fields.iter_mut() {
        let Value::Number(number) = value else {
            continue;
        };
        if number.is_i64() {
            continue;
        }

        match number.as_f64() {
            Some(n) if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 => {
                *value = Value::from(n as i64);
            }
            _ => violations.push(SchemaViolation {
                path: format!("/{key}"),
                message: format!("{number} is outside the supported integer range"),
            }),
        }
    }

    if violations.is_empty() {
        Ok(folded)
    } else {
        Err(violations)
    }
}
