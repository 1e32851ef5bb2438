//! Component signatures.
//!
//! A signature declares everything a component exchanges with the rest of
//! the simulation: the variables it produces, updates, requires or reads,
//! the attributes and parameters it relies on, and any extra input files.
//! The engine checks these declarations against the spatial domain and the
//! parameter sets before the first step runs, so a mis-wired coupling fails
//! during CHECKCONSISTENCY instead of mid-run.

use crate::value::ValueType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a simulator or observer within a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        ComponentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        ComponentId(id.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        ComponentId(id)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A declared variable exchange on one units class.
///
/// `value_type` of `None` declares an untyped exchange: any stored type
/// satisfies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRequest {
    pub name: String,
    pub units_class: String,
    pub value_type: Option<ValueType>,
    pub unit: Option<String>,
    pub description: Option<String>,
}

impl VariableRequest {
    pub fn new(name: impl Into<String>, units_class: impl Into<String>) -> Self {
        VariableRequest {
            name: name.into(),
            units_class: units_class.into(),
            value_type: None,
            unit: None,
            description: None,
        }
    }

    pub fn typed(
        name: impl Into<String>,
        units_class: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        VariableRequest {
            value_type: Some(value_type),
            ..VariableRequest::new(name, units_class)
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A declared attribute exchange on one units class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRequest {
    pub name: String,
    pub units_class: String,
    pub description: Option<String>,
}

impl AttributeRequest {
    pub fn new(name: impl Into<String>, units_class: impl Into<String>) -> Self {
        AttributeRequest {
            name: name.into(),
            units_class: units_class.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A declared parameter usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRequest {
    pub name: String,
    pub description: Option<String>,
}

impl ParameterRequest {
    pub fn new(name: impl Into<String>) -> Self {
        ParameterRequest {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Everything a component declares to handle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandledData {
    pub required_variables: Vec<VariableRequest>,
    pub produced_variables: Vec<VariableRequest>,
    pub updated_variables: Vec<VariableRequest>,
    pub used_variables: Vec<VariableRequest>,
    pub required_attributes: Vec<AttributeRequest>,
    pub produced_attributes: Vec<AttributeRequest>,
    pub used_attributes: Vec<AttributeRequest>,
    pub required_parameters: Vec<ParameterRequest>,
    pub used_parameters: Vec<ParameterRequest>,
    pub required_extra_files: Vec<String>,
    pub used_extra_files: Vec<String>,
}

/// Declarative description of a simulator or observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub id: ComponentId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub handled_data: HandledData,
}

impl Signature {
    pub fn new(id: impl Into<ComponentId>) -> Self {
        Signature {
            id: id.into(),
            name: None,
            description: None,
            version: None,
            handled_data: HandledData::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn requires_variable(mut self, request: VariableRequest) -> Self {
        self.handled_data.required_variables.push(request);
        self
    }

    pub fn produces_variable(mut self, request: VariableRequest) -> Self {
        self.handled_data.produced_variables.push(request);
        self
    }

    pub fn updates_variable(mut self, request: VariableRequest) -> Self {
        self.handled_data.updated_variables.push(request);
        self
    }

    pub fn uses_variable(mut self, request: VariableRequest) -> Self {
        self.handled_data.used_variables.push(request);
        self
    }

    pub fn requires_attribute(mut self, request: AttributeRequest) -> Self {
        self.handled_data.required_attributes.push(request);
        self
    }

    pub fn produces_attribute(mut self, request: AttributeRequest) -> Self {
        self.handled_data.produced_attributes.push(request);
        self
    }

    pub fn uses_attribute(mut self, request: AttributeRequest) -> Self {
        self.handled_data.used_attributes.push(request);
        self
    }

    pub fn requires_parameter(mut self, request: ParameterRequest) -> Self {
        self.handled_data.required_parameters.push(request);
        self
    }

    pub fn uses_parameter(mut self, request: ParameterRequest) -> Self {
        self.handled_data.used_parameters.push(request);
        self
    }

    pub fn requires_extra_file(mut self, file_name: impl Into<String>) -> Self {
        self.handled_data.required_extra_files.push(file_name.into());
        self
    }

    pub fn uses_extra_file(mut self, file_name: impl Into<String>) -> Self {
        self.handled_data.used_extra_files.push(file_name.into());
        self
    }
}
