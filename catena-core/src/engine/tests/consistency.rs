//! Consistency checking of signatures against the domain and parameters.

use crate::engine::{Simulation, SimulationBuilder};
use crate::errors::{CatenaError, CatenaResult};
use crate::example_components::{
    new_call_log, AttributeProducer, AttributeRequirer, ExtraFileRequirer, FixedProducer,
    ParamEcho, ParamRequirer, VariableRequirer, VariableUpdater,
};
use crate::listener::NoopListener;
use crate::parameters::ParameterSet;
use crate::runenv::RunEnvironment;
use crate::spatial::SpatialDomain;
use crate::status::{SchedulingConstraint, SimulationStatus};
use crate::value::{Value, ValueType};
use chrono::{TimeZone, Utc};

fn hourly_status(hours: u32) -> SimulationStatus {
    SimulationStatus::new(
        Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2001, 1, 1, hours, 0, 0).unwrap(),
        3600,
        SchedulingConstraint::None,
    )
    .unwrap()
}

fn su_domain(count: u32) -> SpatialDomain {
    let mut domain = SpatialDomain::new();
    for id in 1..=count {
        domain.add_unit("SU", id).unwrap();
    }
    domain
}

fn builder_in(dir: &tempfile::TempDir) -> SimulationBuilder {
    let mut builder = SimulationBuilder::new();
    builder
        .with_status(hourly_status(10))
        .with_run_environment(RunEnvironment::new(
            dir.path().join("in"),
            dir.path().join("out"),
        ))
        .with_domain(su_domain(2));
    builder
}

/// Drive a simulation up to and including CHECKCONSISTENCY.
fn check(sim: &mut Simulation) -> CatenaResult<()> {
    let mut listener = NoopListener;
    let mut engine = sim.engine(&mut listener)?;
    engine.init_params()?;
    engine.prepare_data()?;
    engine.check_consistency()
}

#[test]
fn requirer_may_precede_producer() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder
        .with_simulator(
            "req.typed",
            Box::new(VariableRequirer::typed("SU", "rain", ValueType::Double)),
            ParameterSet::new(),
        )
        .with_simulator(
            "req.untyped",
            Box::new(VariableRequirer::new("SU", "rain")),
            ParameterSet::new(),
        )
        .with_simulator(
            "prod",
            Box::new(FixedProducer::new("SU", "rain", 1.0)),
            ParameterSet::new(),
        );
    let mut sim = builder.build().unwrap();

    check(&mut sim).unwrap();

    // The series exists on every unit, typed but still empty.
    for id in [1, 2] {
        let unit = sim.domain().unit("SU", id).unwrap();
        assert!(unit.variables().typed_exists("rain", Some(ValueType::Double)));
        assert!(unit.variables().series("rain").unwrap().is_empty());
    }
}

#[test]
fn missing_producer_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder.with_simulator(
        "req",
        Box::new(VariableRequirer::new("SU", "flow")),
        ParameterSet::new(),
    );
    let mut sim = builder.build().unwrap();

    let err = check(&mut sim).unwrap_err();
    assert!(matches!(
        err,
        CatenaError::MissingVariable { variable, class, component }
            if variable == "flow" && class == "SU" && component.as_str() == "req"
    ));
}

#[test]
fn duplicate_production_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder
        .with_simulator(
            "prod.a",
            Box::new(FixedProducer::new("SU", "rain", 1.0)),
            ParameterSet::new(),
        )
        .with_simulator(
            "prod.b",
            Box::new(FixedProducer::new("SU", "rain", 2.0)),
            ParameterSet::new(),
        );
    let mut sim = builder.build().unwrap();

    let err = check(&mut sim).unwrap_err();
    assert!(matches!(
        err,
        CatenaError::DuplicateVariable { variable, component, .. }
            if variable == "rain" && component.as_str() == "prod.b"
    ));
}

#[test]
fn type_mismatch_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder
        .with_simulator(
            "prod",
            Box::new(FixedProducer::new("SU", "rain", 1.0)),
            ParameterSet::new(),
        )
        .with_simulator(
            "req",
            Box::new(VariableRequirer::typed("SU", "rain", ValueType::Integer)),
            ParameterSet::new(),
        );
    let mut sim = builder.build().unwrap();

    let err = check(&mut sim).unwrap_err();
    assert!(matches!(
        err,
        CatenaError::VariableTypeMismatch { variable, expected, .. }
            if variable == "rain" && expected == ValueType::Integer
    ));
}

#[test]
fn update_declaration_creates_missing_series() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder.with_simulator(
        "upd",
        Box::new(VariableUpdater::new("SU", "state")),
        ParameterSet::new(),
    );
    let mut sim = builder.build().unwrap();

    check(&mut sim).unwrap();
    assert!(sim.domain().unit("SU", 1).unwrap().variables().exists("state"));
}

#[test]
fn updating_a_produced_variable_keeps_its_type() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder
        .with_simulator(
            "prod",
            Box::new(FixedProducer::new("SU", "rain", 1.0)),
            ParameterSet::new(),
        )
        .with_simulator(
            "upd",
            Box::new(VariableUpdater::new("SU", "rain")),
            ParameterSet::new(),
        );
    let mut sim = builder.build().unwrap();

    check(&mut sim).unwrap();
    // The updater's untyped declaration does not erase the produced type.
    let unit = sim.domain().unit("SU", 1).unwrap();
    assert!(unit.variables().typed_exists("rain", Some(ValueType::Double)));
}

#[test]
fn producing_an_updated_variable_is_rejected() {
    // Creation runs simulator by simulator, so an updater registered first
    // creates the series and the later strict production trips over it.
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder
        .with_simulator(
            "upd",
            Box::new(VariableUpdater::new("SU", "rain")),
            ParameterSet::new(),
        )
        .with_simulator(
            "prod",
            Box::new(FixedProducer::new("SU", "rain", 1.0)),
            ParameterSet::new(),
        );
    let mut sim = builder.build().unwrap();

    let err = check(&mut sim).unwrap_err();
    assert!(matches!(
        err,
        CatenaError::DuplicateVariable { component, .. } if component.as_str() == "prod"
    ));
}

#[test]
fn unknown_units_class_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder.with_simulator(
        "prod",
        Box::new(FixedProducer::new("GU", "level", 0.0)),
        ParameterSet::new(),
    );
    let mut sim = builder.build().unwrap();

    let err = check(&mut sim).unwrap_err();
    assert!(matches!(
        err,
        CatenaError::UnknownUnitsClass { class, component }
            if class == "GU" && component.as_str() == "prod"
    ));
}

#[test]
fn attribute_producer_fills_values_for_later_requirers() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder
        .with_simulator(
            "attr.prod",
            Box::new(AttributeProducer::new("SU", "area", 42.0)),
            ParameterSet::new(),
        )
        .with_simulator(
            "attr.req",
            Box::new(AttributeRequirer::new("SU", "area")),
            ParameterSet::new(),
        );
    let mut sim = builder.build().unwrap();

    check(&mut sim).unwrap();
    let unit = sim.domain().unit("SU", 2).unwrap();
    assert_eq!(unit.attributes().get("area"), Some(&Value::Double(42.0)));
}

#[test]
fn attribute_checking_is_a_single_pass() {
    // Unlike variables, attribute checks run in registration order: a
    // requirer placed before the producer does not see the attribute yet.
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder
        .with_simulator(
            "attr.req",
            Box::new(AttributeRequirer::new("SU", "area")),
            ParameterSet::new(),
        )
        .with_simulator(
            "attr.prod",
            Box::new(AttributeProducer::new("SU", "area", 42.0)),
            ParameterSet::new(),
        );
    let mut sim = builder.build().unwrap();

    let err = check(&mut sim).unwrap_err();
    assert!(matches!(
        err,
        CatenaError::MissingAttribute { attribute, class, component }
            if attribute == "area" && class == "SU" && component.as_str() == "attr.req"
    ));
}

#[test]
fn required_extra_file_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder.with_simulator(
        "reader",
        Box::new(ExtraFileRequirer::new("soil.csv")),
        ParameterSet::new(),
    );
    let mut sim = builder.build().unwrap();

    let err = check(&mut sim).unwrap_err();
    assert!(matches!(
        err,
        CatenaError::MissingFile { file_name, component }
            if file_name == "soil.csv" && component.as_str() == "reader"
    ));

    // Present file passes.
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("in")).unwrap();
    std::fs::write(dir.path().join("in/soil.csv"), "id;depth\n").unwrap();
    let mut builder = builder_in(&dir);
    builder.with_simulator(
        "reader",
        Box::new(ExtraFileRequirer::new("soil.csv")),
        ParameterSet::new(),
    );
    let mut sim = builder.build().unwrap();
    check(&mut sim).unwrap();
}

#[test]
fn required_parameter_resolution() {
    // Locally set.
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder.with_simulator(
        "sim",
        Box::new(ParamRequirer::new("coeff")),
        ParameterSet::new().with("coeff", "0.8"),
    );
    check(&mut builder.build().unwrap()).unwrap();

    // Falls back to the global set.
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder
        .with_global_parameter("coeff", "0.8")
        .with_simulator("sim", Box::new(ParamRequirer::new("coeff")), ParameterSet::new());
    check(&mut builder.build().unwrap()).unwrap();

    // An empty local value fails even when a global value exists.
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder
        .with_global_parameter("coeff", "0.8")
        .with_simulator(
            "sim",
            Box::new(ParamRequirer::new("coeff")),
            ParameterSet::new().with("coeff", ""),
        );
    let err = check(&mut builder.build().unwrap()).unwrap_err();
    assert!(matches!(
        err,
        CatenaError::EmptyParameter { parameter, component }
            if parameter == "coeff" && component.as_str() == "sim"
    ));

    // Absent everywhere.
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    builder.with_simulator("sim", Box::new(ParamRequirer::new("coeff")), ParameterSet::new());
    let err = check(&mut builder.build().unwrap()).unwrap_err();
    assert!(matches!(err, CatenaError::MissingParameter { .. }));
}

#[test]
fn optional_parameters_prefer_local_values() {
    let dir = tempfile::tempdir().unwrap();
    let log = new_call_log();
    let mut builder = builder_in(&dir);
    builder
        .with_global_parameter("mode", "slow")
        .with_global_parameter("level", "7")
        .with_simulator(
            "echo.mode",
            Box::new(ParamEcho::new("mode", log.clone())),
            ParameterSet::new().with("mode", "fast"),
        )
        .with_simulator(
            "echo.level",
            Box::new(ParamEcho::new("level", log.clone())),
            ParameterSet::new(),
        )
        .with_simulator(
            "echo.ghost",
            Box::new(ParamEcho::new("ghost", log.clone())),
            ParameterSet::new(),
        );
    let mut sim = builder.build().unwrap();

    let mut listener = NoopListener;
    sim.engine(&mut listener).unwrap().init_params().unwrap();
    assert_eq!(*log.borrow(), ["mode=fast", "level=7", "ghost=<absent>"]);
}

#[test]
fn empty_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = builder_in(&dir);
    let mut sim = builder.build().unwrap();

    let err = check(&mut sim).unwrap_err();
    assert!(matches!(err, CatenaError::EmptyModel));
}
