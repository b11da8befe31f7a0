//! Integration tests for the calculation engine, using the demo project.
use float_cmp::assert_approx_eq;
use retrofit::calculation::energy_system::{CostBuckets, size_and_cost_systems};
use retrofit::calculation::measures::aggregate_building_measures;
use retrofit::calculation::{ResultStore, ScenarioResults};
use retrofit::energy_system::{CostCategory, SystemCategory};
use retrofit::input::load_project;
use retrofit::measure::MeasureCategory;
use retrofit::project::Project;
use retrofit::scenario::{LifetimeEnergyCostMode, ScenarioID};

fn load_demo() -> Project {
    load_project("demos/simple").unwrap()
}

fn calculate(project: &Project) -> ResultStore {
    let mut store = ResultStore::new();
    let errors = store.recalculate(project);
    assert!(errors.is_empty(), "Scenarios failed: {errors:?}");
    store
}

fn results<'a>(store: &'a ResultStore, scenario_id: &str) -> &'a ScenarioResults {
    store.get(&ScenarioID::from(scenario_id)).unwrap()
}

#[test]
fn deleted_building_types_are_skipped() {
    let project = load_demo();
    let reference = &project.scenarios["REF"];
    assert!(reference.building_types.contains_key("SFH"));
    assert!(!reference.building_types.contains_key("OLD"));
    assert_eq!(
        project.scenarios["RENO"].energy_cost_mode,
        LifetimeEnergyCostMode::AnnualIncrease
    );
}

#[test]
fn decentralized_reference_scenario() {
    let project = load_demo();
    let store = calculate(&project);
    let reference = results(&store, "REF");

    let system = &reference.systems["GAS_BOILER"];
    assert_eq!(system.category, SystemCategory::Decentralized);
    assert_eq!(system.centralized_size, 0.0);
    let building_types: Vec<_> = system
        .decentralized_sizes
        .iter()
        .map(|size| size.building_type_id.as_str())
        .collect();
    assert_eq!(building_types, ["MFH", "SFH"]);
    assert!(system.investment.substation > 0.0);
    assert_eq!(system.investment.total(), system.investment.substation);
    assert_approx_eq!(f64, system.total_heating_need, 40.0 * 22000.0 + 10.0 * 95000.0);

    // No measures are applied
    assert!(reference.measures.values().all(|measures| measures.is_empty()));
}

#[test]
fn centralized_renovation_scenario() {
    let project = load_demo();
    let store = calculate(&project);
    let renovation = results(&store, "RENO");

    let system = &renovation.systems["DH"];
    let summed: f64 = system
        .decentralized_sizes
        .iter()
        .map(|size| size.size * f64::from(size.building_count))
        .sum();
    assert_approx_eq!(f64, system.centralized_size, summed / 0.85, epsilon = 1e-9);
    for category in [
        CostCategory::Investment,
        CostCategory::Maintenance,
        CostCategory::Embodied,
    ] {
        let costs = system.costs(category);
        assert!(costs.substation > 0.0);
        assert!(costs.intake > 0.0);
        assert!(costs.generation > 0.0);
        assert!(costs.circulation > 0.0);
    }

    // Shared measures are counted once
    let roof = &renovation.measures[&MeasureCategory::Roof]["ROOF_INS"];
    assert_eq!(roof.cost, 12000.0);
    assert_eq!(roof.occurrences, 2);
    assert_eq!(roof.building_count, 50);

    // Renovation reduces primary energy use
    let reference = results(&store, "REF");
    assert!(renovation.summary.specific.primary_energy < reference.summary.specific.primary_energy);
}

#[test]
fn systems_without_category_cost_nothing() {
    let project = load_demo();
    let store = calculate(&project);
    let keep = results(&store, "KEEP");

    let system = &keep.systems["EXISTING"];
    assert_eq!(system.investment, CostBuckets::default());
    assert_eq!(system.maintenance, CostBuckets::default());
    assert_eq!(system.embodied, CostBuckets::default());
    assert!(system.primary_energy.total > 0.0);

    // The MFH has no energy system in this scenario
    assert_eq!(system.decentralized_sizes.len(), 1);
    assert_approx_eq!(f64, keep.summary.total_building_area, 40.0 * 150.0 + 10.0 * 900.0);
}

#[test]
fn results_are_deterministic() {
    let mut project = load_demo();
    let first = calculate(&project);
    let second = calculate(&project);
    for scenario_id in project.scenarios.keys() {
        assert_eq!(first.get(scenario_id), second.get(scenario_id));
    }

    for scenario in project.scenarios.values_mut() {
        scenario.building_types.reverse();
    }
    let reversed = calculate(&project);
    for scenario_id in project.scenarios.keys() {
        assert_eq!(first.get(scenario_id), reversed.get(scenario_id));
    }
}

#[test]
fn component_functions_agree_with_result_store() {
    let project = load_demo();
    let store = calculate(&project);
    let systems = size_and_cost_systems(&project).unwrap();
    let measures = aggregate_building_measures(&project).unwrap();

    for (scenario_id, results) in store.iter() {
        assert_eq!(&systems[scenario_id], &results.systems);
        assert_eq!(&measures[scenario_id], &results.measures);
    }
}
