//! Random-value generator.
//!
//! Produces one double variable drawn uniformly from `[range.min,
//! range.max]` on every unit of a class, at initialization and then at
//! every default step. An optional `seed` parameter makes the sequence
//! reproducible.

use catena_core::component::{Simulator, SimulatorContext};
use catena_core::errors::CatenaResult;
use catena_core::parameters::ParameterTree;
use catena_core::signature::{ParameterRequest, Signature, VariableRequest};
use catena_core::time::SchedulingRequest;
use catena_core::value::{Value, ValueType};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Lower bound of the drawn values.
pub const PARAM_RANGE_MIN: &str = "range.min";
/// Upper bound of the drawn values.
pub const PARAM_RANGE_MAX: &str = "range.max";
/// Optional seed for a reproducible sequence.
pub const PARAM_SEED: &str = "seed";

/// Feeds a model with uniformly distributed random values.
#[derive(Debug)]
pub struct RandomGenerator {
    units_class: String,
    var_name: String,
    min: f64,
    max: f64,
    rng: SmallRng,
}

impl RandomGenerator {
    /// Generator producing `var_name` on every unit of `units_class`. The
    /// range bounds and the optional seed are read from the parameters
    /// during INITPARAMS.
    pub fn new(units_class: &str, var_name: &str) -> Self {
        RandomGenerator {
            units_class: units_class.to_string(),
            var_name: var_name.to_string(),
            min: 0.0,
            max: 1.0,
            rng: SmallRng::from_entropy(),
        }
    }

    fn bound(tree: &ParameterTree, ctx: &SimulatorContext, key: &str) -> CatenaResult<f64> {
        tree.value(key)
            .and_then(|value| value.as_f64())
            .ok_or_else(|| ctx.raise_error(format!("parameter '{key}' is missing or not a number")))
    }

    fn write_all(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        let index = ctx.status().current_index();
        if let Some(units) = ctx.domain_mut().units_of_class_mut(&self.units_class) {
            for unit in units {
                let value = self.rng.gen_range(self.min..=self.max);
                unit.variables_mut()
                    .append(&self.var_name, index, Value::Double(value))?;
            }
        }
        Ok(())
    }
}

impl Simulator for RandomGenerator {
    fn signature(&self) -> Signature {
        Signature::new("gen.random")
            .with_name("Random values generator")
            .produces_variable(VariableRequest::typed(
                &self.var_name,
                &self.units_class,
                ValueType::Double,
            ))
            .requires_parameter(ParameterRequest::new(PARAM_RANGE_MIN))
            .requires_parameter(ParameterRequest::new(PARAM_RANGE_MAX))
            .uses_parameter(
                ParameterRequest::new(PARAM_SEED).with_description("seed for reproducible draws"),
            )
    }

    fn init_params(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        let tree = ctx.parameters_tree();
        self.min = Self::bound(&tree, ctx, PARAM_RANGE_MIN)?;
        self.max = Self::bound(&tree, ctx, PARAM_RANGE_MAX)?;
        if self.min > self.max {
            return Err(ctx.raise_error(format!(
                "'{PARAM_RANGE_MIN}' ({}) is greater than '{PARAM_RANGE_MAX}' ({})",
                self.min, self.max
            )));
        }
        if let Some(raw) = ctx.parameter(PARAM_SEED) {
            let seed = raw.as_u64().ok_or_else(|| {
                ctx.raise_error(format!("parameter '{PARAM_SEED}' is not an unsigned integer"))
            })?;
            self.rng = SmallRng::seed_from_u64(seed);
        }
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
