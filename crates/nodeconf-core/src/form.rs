//! Form submission binding.
//!
//! Applies an HTML form submission to a `ConfigStore`:
//! - Checkboxes are presence-only: a non-empty argument means `true`.
//! - Numeric fields parse the argument; a blank argument either resets the
//!   field to its default or keeps the current value (`BlankPolicy`).
//! - Text fields are always overwritten, with `""` when absent.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use tracing::{debug, warn};

use crate::error::{FormErrors, InvalidNumber};
use crate::schema::{BlankPolicy, FieldSpec};
use crate::store::ConfigStore;
use crate::value::{FieldKind, Value};

/// Access to submitted form arguments.
///
/// A missing argument reads as the empty string; the form layer does not
/// distinguish "absent" from "empty".
pub trait FormArgs {
    fn arg(&self, name: &str) -> &str;
}

impl<S: BuildHasher> FormArgs for HashMap<String, String, S> {
    fn arg(&self, name: &str) -> &str {
        self.get(name).map(String::as_str).unwrap_or("")
    }
}

impl FormArgs for BTreeMap<String, String> {
    fn arg(&self, name: &str) -> &str {
        self.get(name).map(String::as_str).unwrap_or("")
    }
}

impl<'a> FormArgs for [(&'a str, &'a str)] {
    fn arg(&self, name: &str) -> &str {
        self.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .unwrap_or("")
    }
}

impl ConfigStore {
    /// Apply a form submission. Never fails.
    ///
    /// Malformed numbers are parsed leniently: the longest numeric prefix
    /// is used and text without one reads as zero.
    pub fn apply_form<F: FormArgs + ?Sized>(&mut self, form: &F) {
        for (index, spec) in self.schema().fields().iter().enumerate() {
            let arg = form.arg(spec.name);
            if let Some(value) = bind_lenient(spec, arg) {
                *self.slot_mut(index) = value;
            }
        }
        debug!("Applied config form submission");
    }

    /// Apply a form submission, rejecting malformed numbers.
    ///
    /// Non-empty numeric arguments must parse completely and fit the
    /// field's range. If any field is rejected nothing is applied.
    pub fn apply_form_strict<F: FormArgs + ?Sized>(&mut self, form: &F) -> Result<(), FormErrors> {
        let mut errors = Vec::new();
        let mut updates = Vec::with_capacity(self.schema().len());

        for (index, spec) in self.schema().fields().iter().enumerate() {
            let arg = form.arg(spec.name);
            match bind_strict(spec, arg) {
                Ok(Some(value)) => updates.push((index, value)),
                Ok(None) => {}
                Err(error) => errors.push(error),
            }
        }

        if !errors.is_empty() {
            warn!(rejected = errors.len(), "Config form submission rejected");
            return Err(FormErrors(errors));
        }

        for (index, value) in updates {
            *self.slot_mut(index) = value;
        }
        debug!("Applied config form submission");
        Ok(())
    }
}

/// New value for a field, or `None` to keep the current one.
fn bind_lenient(spec: &FieldSpec, arg: &str) -> Option<Value> {
    match spec.kind() {
        FieldKind::Bool => Some(Value::Bool(!arg.is_empty())),
        FieldKind::Text => Some(Value::Text(arg.to_string())),
        _ if arg.is_empty() => blank_value(spec),
        FieldKind::Int => {
            let v = parse_int_lenient(arg).clamp(i64::from(i32::MIN), i64::from(i32::MAX));
            Some(Value::Int(v as i32))
        }
        FieldKind::SmallInt => {
            let v = parse_int_lenient(arg).clamp(i64::from(i8::MIN), i64::from(i8::MAX));
            Some(Value::SmallInt(v as i8))
        }
        FieldKind::Float => Some(Value::Float(parse_float_lenient(arg))),
    }
}

fn bind_strict(spec: &FieldSpec, arg: &str) -> Result<Option<Value>, InvalidNumber> {
    let invalid = || InvalidNumber {
        field: spec.name,
        kind: spec.kind(),
        input: arg.to_string(),
    };
    let trimmed = arg.trim();

    match spec.kind() {
        FieldKind::Bool => Ok(Some(Value::Bool(!arg.is_empty()))),
        FieldKind::Text => Ok(Some(Value::Text(arg.to_string()))),
        _ if trimmed.is_empty() => Ok(blank_value(spec)),
        FieldKind::Int => trimmed
            .parse()
            .map(|v| Some(Value::Int(v)))
            .map_err(|_| invalid()),
        FieldKind::SmallInt => trimmed
            .parse()
            .map(|v| Some(Value::SmallInt(v)))
            .map_err(|_| invalid()),
        FieldKind::Float => match trimmed.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(Some(Value::Float(v))),
            _ => Err(invalid()),
        },
    }
}

fn blank_value(spec: &FieldSpec) -> Option<Value> {
    match spec.blank {
        BlankPolicy::ResetToDefault => Some(spec.default_value()),
        BlankPolicy::KeepCurrent => None,
    }
}

/// Integer prefix of `s`, C `atoi` style.
///
/// Leading whitespace and one sign are accepted; parsing stops at the first
/// non-digit. No digits reads as zero. Overflow saturates.
pub fn parse_int_lenient(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if negative {
        -value
    } else {
        value
    }
}

/// Float prefix of `s`, C `atof` style.
///
/// Accepts `[ws][sign]digits[.digits][(e|E)[sign]digits]`. Text without a
/// numeric prefix, and results that overflow to infinity, read as zero.
pub fn parse_float_lenient(s: &str) -> f32 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end]
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
