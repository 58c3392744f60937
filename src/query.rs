//! Read-side API for captured fields.
//!
//! Keys are the composite form produced at bind time (`"alpha-turret1"`).
//! Every miss (unknown key, unknown field, wrong type) is `None`; typed
//! getters never coerce between JSON types.

use crate::capture::{CompositeKey, ModScope};
use serde_json::Value;

pub trait FieldQuery {
    /// The stored value in its original JSON form, whatever its type. Use this
    /// for object- and array-valued fields.
    fn get_raw(&self, key: &str, field: &str) -> Option<Value>;

    fn get_string(&self, key: &str, field: &str) -> Option<String> {
        match self.get_raw(key, field)? {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Integer literals only; float literals such as `3.0` are absent.
    fn get_integer(&self, key: &str, field: &str) -> Option<i64> {
        match self.get_raw(key, field)? {
            Value::Number(number) if !number.is_f64() => number.as_i64(),
            _ => None,
        }
    }

    /// Float literals only; integer literals are absent.
    fn get_float(&self, key: &str, field: &str) -> Option<f64> {
        match self.get_raw(key, field)? {
            Value::Number(number) if number.is_f64() => number.as_f64(),
            _ => None,
        }
    }

    fn get_boolean(&self, key: &str, field: &str) -> Option<bool> {
        match self.get_raw(key, field)? {
            Value::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// Raw lookup for callers holding the scope and entity name separately.
    fn get_scoped(&self, scope: &ModScope, name: &str, field: &str) -> Option<Value> {
        self.get_raw(CompositeKey::compose(scope, name).as_str(), field)
    }
}
