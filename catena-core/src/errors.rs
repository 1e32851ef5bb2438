use crate::signature::ComponentId;
use crate::spatial::UnitId;
use crate::time::TimeIndex;
use crate::value::ValueType;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for every failure the engine and the data stores can raise.
///
/// Each variant carries the context a caller needs to diagnose the model:
/// the offending component, the data item name and the units class involved.
/// All errors are fatal to the run; recovery is the caller's decision.
#[derive(Error, Debug)]
pub enum CatenaError {
    #[error("the model contains no simulation component")]
    EmptyModel,
    #[error("file '{file_name}' required by '{component}' is missing from the input directory")]
    MissingFile {
        file_name: String,
        component: ComponentId,
    },
    #[error("units class '{class}' declared by '{component}' does not exist in the spatial domain")]
    UnknownUnitsClass {
        class: String,
        component: ComponentId,
    },
    #[error("variable '{variable}' on class '{class}' produced by '{component}' already exists")]
    DuplicateVariable {
        variable: String,
        class: String,
        component: ComponentId,
    },
    #[error("variable '{variable}' on class '{class}' required by '{component}' does not exist")]
    MissingVariable {
        variable: String,
        class: String,
        component: ComponentId,
    },
    #[error(
        "variable '{variable}' on class '{class}' required by '{component}' \
         does not have the expected type {expected}"
    )]
    VariableTypeMismatch {
        variable: String,
        class: String,
        component: ComponentId,
        expected: ValueType,
    },
    #[error("attribute '{attribute}' on class '{class}' required by '{component}' does not exist")]
    MissingAttribute {
        attribute: String,
        class: String,
        component: ComponentId,
    },
    #[error("parameter '{parameter}' required by '{component}' is not set")]
    MissingParameter {
        parameter: String,
        component: ComponentId,
    },
    #[error("parameter '{parameter}' required by '{component}' is empty")]
    EmptyParameter {
        parameter: String,
        component: ComponentId,
    },
    #[error("cannot prepare output directory '{path}': {source}")]
    OutputDirCreation {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(
        "variable '{variable}' on unit {class}#{unit} has {found} recorded value(s), \
         expected {expected}"
    )]
    ProductionInvariant {
        variable: String,
        class: String,
        unit: UnitId,
        expected: usize,
        found: usize,
    },
    #[error("'{component}' raised an error: {message}")]
    Component {
        component: ComponentId,
        message: String,
    },
    #[error("invalid scheduling request from '{component}': {details}")]
    InvalidSchedulingRequest {
        component: ComponentId,
        details: String,
    },

    // Store-level failures, raised without component context.
    #[error("unit {class}#{id} does not exist")]
    UnitNotFound { class: String, id: UnitId },
    #[error("unit {class}#{id} already exists")]
    DuplicateUnit { class: String, id: UnitId },
    #[error("variable '{variable}' does not exist")]
    VariableNotFound { variable: String },
    #[error("variable '{variable}' already exists")]
    VariableAlreadyExists { variable: String },
    #[error("value for '{variable}' at index {index} is not newer than the latest index {latest}")]
    StaleValue {
        variable: String,
        index: TimeIndex,
        latest: TimeIndex,
    },
    #[error("no value recorded for '{variable}' at index {index}")]
    ValueNotFound { variable: String, index: TimeIndex },
    #[error("value for '{variable}' does not match its declared type {expected}")]
    InvalidValueType {
        variable: String,
        expected: ValueType,
    },

    // Configuration and I/O failures.
    #[error("invalid configuration: {message}")]
    Config { message: String },
    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, CatenaError>`.
pub type CatenaResult<T> = Result<T, CatenaError>;
