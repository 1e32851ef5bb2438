//! Fixed-value generator.
//!
//! Produces one double variable at a constant value on every unit of a
//! class, at initialization and then at every default step. The value comes
//! from the `fixedvalue` parameter.

use catena_core::component::{Simulator, SimulatorContext};
use catena_core::errors::CatenaResult;
use catena_core::signature::{ParameterRequest, Signature, VariableRequest};
use catena_core::time::SchedulingRequest;
use catena_core::value::{Value, ValueType};

/// Parameter holding the produced value.
pub const PARAM_FIXED_VALUE: &str = "fixedvalue";

/// Feeds a model with a constant forcing variable.
#[derive(Debug)]
pub struct FixedGenerator {
    units_class: String,
    var_name: String,
    value: f64,
}

impl FixedGenerator {
    /// Generator producing `var_name` on every unit of `units_class`. The
    /// value itself is read from the parameters during INITPARAMS.
    pub fn new(units_class: &str, var_name: &str) -> Self {
        FixedGenerator {
            units_class: units_class.to_string(),
            var_name: var_name.to_string(),
            value: 0.0,
        }
    }

    fn write_all(&self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        let index = ctx.status().current_index();
        let value = Value::Double(self.value);
        if let Some(units) = ctx.domain_mut().units_of_class_mut(&self.units_class) {
            for unit in units {
                unit.variables_mut()
                    .append(&self.var_name, index, value.clone())?;
            }
        }
        Ok(())
    }
}

impl Simulator for FixedGenerator {
    fn signature(&self) -> Signature {
        Signature::new("gen.fixed")
            .with_name("Fixed values generator")
            .produces_variable(VariableRequest::typed(
                &self.var_name,
                &self.units_class,
                ValueType::Double,
            ))
            .requires_parameter(
                ParameterRequest::new(PARAM_FIXED_VALUE).with_description("the produced value"),
            )
    }

    fn init_params(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        let raw = ctx.require_parameter(PARAM_FIXED_VALUE)?;
        self.value = raw.as_f64().ok_or_else(|| {
            ctx.raise_error(format!("parameter '{PARAM_FIXED_VALUE}' is not a number"))
        })?;
        Ok(())
    }

    fn initialize_run(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        self.write_all(ctx)?;
        Ok(SchedulingRequest::DefaultDeltaT)
    }

    fn run_step(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        self.write_all(ctx)?;
        Ok(SchedulingRequest::DefaultDeltaT)
    }
}
