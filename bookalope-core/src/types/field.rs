//! Write-through metadata fields with explicit "unset" state

use serde::Serialize;
use serde_json::{Map, Value};

/// One editable metadata value of a bookflow.
///
/// `Unset` fields are left out of a save entirely, so values the client
/// never loaded stay untouched on the server. `Cleared` is sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    #[default]
    Unset,
    Set(T),
    Cleared,
}

impl<T> Field<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            Field::Set(value) => Some(value),
            Field::Unset | Field::Cleared => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Field::Unset)
    }

    /// Build from a server value, where `null` means "nothing known"
    pub fn from_server(value: Option<T>) -> Self {
        value.map_or(Field::Unset, Field::Set)
    }
}

impl<T: Serialize> Field<T> {
    /// Insert this field into a request body unless it is unset
    pub(crate) fn write_into(
        &self,
        key: &str,
        body: &mut Map<String, Value>,
    ) -> Result<(), serde_json::Error> {
        match self {
            Field::Unset => {}
            Field::Set(value) => {
                body.insert(key.to_string(), serde_json::to_value(value)?);
            }
            Field::Cleared => {
                body.insert(key.to_string(), Value::Null);
            }
        }
        Ok(())
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Set(value)
    }
}

impl From<&str> for Field<String> {
    fn from(value: &str) -> Self {
        Field::Set(value.to_string())
    }
}
