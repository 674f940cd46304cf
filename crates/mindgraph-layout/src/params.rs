//! Layout parameter schema: typed values, declared constraints, and the
//! ordered per-algorithm configuration.

use crate::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};

/// A parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Number(f64),
    Choice(String),
    Flag(bool),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(f) => Some(*f),
            _ => None,
        }
    }
}

/// The declared constraint of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamSpec {
    /// A numeric value in `min..=max`. `step` is the UI increment hint;
    /// values between steps are accepted.
    Range { min: f64, max: f64, step: f64 },
    /// One of a fixed set of options.
    Choice { options: Vec<String> },
    Boolean,
}

/// One named, validated layout parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutParameter {
    pub name: String,
    /// Human-readable label for parameter panels.
    pub label: String,
    pub spec: ParamSpec,
    value: ParamValue,
    default: ParamValue,
}

impl LayoutParameter {
    pub fn range(name: &str, label: &str, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            spec: ParamSpec::Range { min, max, step },
            value: ParamValue::Number(default),
            default: ParamValue::Number(default),
        }
    }

    pub fn choice(name: &str, label: &str, options: &[&str], default: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            spec: ParamSpec::Choice {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
            value: ParamValue::Choice(default.to_string()),
            default: ParamValue::Choice(default.to_string()),
        }
    }

    pub fn flag(name: &str, label: &str, default: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            spec: ParamSpec::Boolean,
            value: ParamValue::Flag(default),
            default: ParamValue::Flag(default),
        }
    }

    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    pub fn default_value(&self) -> &ParamValue {
        &self.default
    }

    /// Check a candidate value against this parameter's constraint.
    pub fn validate(&self, value: &ParamValue) -> LayoutResult<()> {
        let reject = |reason: String| {
            Err(LayoutError::InvalidParameter {
                name: self.name.clone(),
                reason,
            })
        };

        match (&self.spec, value) {
            (ParamSpec::Range { min, max, .. }, ParamValue::Number(n)) => {
                if !n.is_finite() {
                    return reject(format!("{n} is not a finite number"));
                }
                if n < min || n > max {
                    return reject(format!("{n} is outside {min}..{max}"));
                }
                Ok(())
            }
            (ParamSpec::Choice { options }, ParamValue::Choice(c)) => {
                if options.iter().any(|o| o == c) {
                    Ok(())
                } else {
                    reject(format!("{c:?} is not one of {options:?}"))
                }
            }
            (ParamSpec::Boolean, ParamValue::Flag(_)) => Ok(()),
            (spec, value) => reject(format!("{value:?} does not match {spec:?}")),
        }
    }

    /// Set the value after validation; a rejected value leaves the
    /// stored one unchanged.
    pub fn set(&mut self, value: ParamValue) -> LayoutResult<()> {
        self.validate(&value)?;
        self.value = value;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.value = self.default.clone();
    }
}

/// The ordered parameter set of one layout algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfiguration {
    pub layout_id: String,
    params: Vec<LayoutParameter>,
}

impl LayoutConfiguration {
    pub fn new(layout_id: &str, params: Vec<LayoutParameter>) -> Self {
        Self {
            layout_id: layout_id.to_string(),
            params,
        }
    }

    /// Parameters in declaration order (panels render them in order).
    pub fn params(&self) -> &[LayoutParameter] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&LayoutParameter> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Set a parameter by name, validating against its spec.
    pub fn set(&mut self, name: &str, value: ParamValue) -> LayoutResult<()> {
        let Some(param) = self.params.iter_mut().find(|p| p.name == name) else {
            return Err(LayoutError::UnknownParameter {
                layout: self.layout_id.clone(),
                name: name.to_string(),
            });
        };
        param.set(value)
    }

    pub fn reset_to_defaults(&mut self) {
        for param in &mut self.params {
            param.reset();
        }
    }
}
