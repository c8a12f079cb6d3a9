//! Opaque host side effects attached to states.
//!
//! A behavior stands for something the host runtime does when a state plays
//! (a parameter driver, a tracking control, ...). The core never interprets
//! the kind string or the field names; it only guarantees at most one
//! behavior per kind per state, created lazily on the first field write.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::parameter::ParameterValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub kind: String,
    pub fields: IndexMap<String, ParameterValue>,
}

impl Behavior {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<ParameterValue>) {
        self.fields.insert(field.into(), value.into());
    }
}
