//! Consistency checks run before a simulation starts stepping.

use crate::errors::{CatenaError, CatenaResult};
use crate::model::ModelInstance;
use crate::parameters::resolve_required_parameter;
use crate::runenv::RunEnvironment;
use crate::signature::{ComponentId, VariableRequest};
use crate::spatial::{SpatialDomain, SpatialUnit};

/// Checks that every extra file a signature requires is present in the
/// input directory. Used files are optional and not checked.
pub(crate) fn check_extra_files(
    model: &ModelInstance,
    run_env: &RunEnvironment,
) -> CatenaResult<()> {
    for item in model.items() {
        for file_name in &item.signature().handled_data.required_extra_files {
            if !run_env.input_full_path(file_name).is_file() {
                return Err(CatenaError::MissingFile {
                    file_name: file_name.clone(),
                    component: item.id().clone(),
                });
            }
        }
    }
    Ok(())
}

fn require_class(
    domain: &SpatialDomain,
    class: &str,
    component: &ComponentId,
) -> CatenaResult<()> {
    if !domain.class_exists(class) {
        return Err(CatenaError::UnknownUnitsClass {
            class: class.to_string(),
            component: component.clone(),
        });
    }
    Ok(())
}

fn check_variable_exists(
    unit: &SpatialUnit,
    request: &VariableRequest,
    component: &ComponentId,
) -> CatenaResult<()> {
    if !unit.variables().exists(&request.name) {
        return Err(CatenaError::MissingVariable {
            variable: request.name.clone(),
            class: request.units_class.clone(),
            component: component.clone(),
        });
    }
    if let Some(expected) = request.value_type {
        if !unit.variables().typed_exists(&request.name, Some(expected)) {
            return Err(CatenaError::VariableTypeMismatch {
                variable: request.name.clone(),
                class: request.units_class.clone(),
                component: component.clone(),
                expected,
            });
        }
    }
    Ok(())
}

/// Checks the variable exchanges of the whole model and creates the
/// declared series.
///
/// Runs in two passes: first every produced and updated variable of every
/// simulator is created, then every required variable is checked. A
/// required variable therefore resolves no matter where its producer sits
/// in the registration order. Producing a variable twice is an error;
/// updating an existing one is not, and an updated variable nobody produces
/// is created on the fly with the updater's declared type.
pub(crate) fn check_model_consistency(
    model: &ModelInstance,
    domain: &mut SpatialDomain,
) -> CatenaResult<()> {
    for item in model.items() {
        for request in &item.signature().handled_data.produced_variables {
            require_class(domain, &request.units_class, item.id())?;
            // full existence pre-check before mutating any unit
            let units = domain
                .units_of_class(&request.units_class)
                .expect("class checked above");
            for unit in units {
                if unit.variables().exists(&request.name) {
                    return Err(CatenaError::DuplicateVariable {
                        variable: request.name.clone(),
                        class: request.units_class.clone(),
                        component: item.id().clone(),
                    });
                }
            }
            let units = domain
                .units_of_class_mut(&request.units_class)
                .expect("class checked above");
            for unit in units {
                unit.variables_mut()
                    .create_if_absent(&request.name, request.value_type);
            }
        }
        for request in &item.signature().handled_data.updated_variables {
            require_class(domain, &request.units_class, item.id())?;
            let units = domain
                .units_of_class_mut(&request.units_class)
                .expect("class checked above");
            for unit in units {
                unit.variables_mut()
                    .create_if_absent(&request.name, request.value_type);
            }
        }
    }

    for item in model.items() {
        for request in &item.signature().handled_data.required_variables {
            require_class(domain, &request.units_class, item.id())?;
            let units = domain
                .units_of_class(&request.units_class)
                .expect("class checked above");
            for unit in units {
                check_variable_exists(unit, request, item.id())?;
            }
        }
    }
    Ok(())
}

/// Checks attribute exchanges simulator by simulator.
///
/// Unlike variables this is a single pass: a simulator requiring an
/// attribute only sees the attributes present in the domain's input data
/// plus those produced by simulators registered before it.
pub(crate) fn check_attributes_consistency(
    model: &ModelInstance,
    domain: &mut SpatialDomain,
) -> CatenaResult<()> {
    for item in model.items() {
        for request in &item.signature().handled_data.required_attributes {
            require_class(domain, &request.units_class, item.id())?;
            let units = domain
                .units_of_class(&request.units_class)
                .expect("class checked above");
            for unit in units {
                if !unit.attributes().exists(&request.name) {
                    return Err(CatenaError::MissingAttribute {
                        attribute: request.name.clone(),
                        class: request.units_class.clone(),
                        component: item.id().clone(),
                    });
                }
            }
        }
        for request in &item.signature().handled_data.produced_attributes {
            require_class(domain, &request.units_class, item.id())?;
            let units = domain
                .units_of_class_mut(&request.units_class)
                .expect("class checked above");
            for unit in units {
                unit.attributes_mut().create_if_absent(&request.name);
            }
        }
    }
    Ok(())
}

/// Checks that every required parameter resolves to a non-empty value,
/// locally or through the model's global parameters.
pub(crate) fn check_parameters_consistency(model: &ModelInstance) -> CatenaResult<()> {
    for item in model.items() {
        for request in &item.signature().handled_data.required_parameters {
            resolve_required_parameter(
                item.parameters(),
                Some(model.global_parameters()),
                &request.name,
                item.id(),
            )?;
        }
    }
    Ok(())
}

/// Checks that every variable on every unit holds exactly `expected`
/// values: 0 right before initialization, 1 right after it.
pub(crate) fn check_vars_production(domain: &SpatialDomain, expected: usize) -> CatenaResult<()> {
    for unit in domain.units() {
        for (name, series) in unit.variables().iter() {
            if series.len() != expected {
                return Err(CatenaError::ProductionInvariant {
                    variable: name.clone(),
                    class: unit.class().to_string(),
                    unit: unit.id(),
                    expected,
                    found: series.len(),
                });
            }
        }
    }
    Ok(())
}
