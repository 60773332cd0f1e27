//! Fitment and enrichment behavior tests against the library API

use serde_json::json;
use swapspec::core::provenance::{annotate_record, SpecSource};
use swapspec::core::{EntityId, EntityPrefix};
use swapspec::enrich::{enrich, CatalogProvider, EnrichOutcome};
use swapspec::entities::{Build, Engine, Transmission, Vehicle};
use swapspec::fitment::{Rule, RULES};
use swapspec::{evaluate_advisories, evaluate_fitment, FitmentInput, Severity};

fn build() -> Build {
    Build::new(
        "tester",
        EntityId::new(EntityPrefix::Veh),
        EntityId::new(EntityPrefix::Eng),
    )
}

fn complete_engine() -> Engine {
    let mut engine = Engine::new("Chevrolet", "LS3");
    engine.displacement_liters = Some(6.2);
    engine.compression_ratio = Some(10.4);
    engine.valve_train = Some("OHV".to_string());
    engine
}

// ============================================================================
// Rule Behavior
// ============================================================================

#[test]
fn test_reference_swap_scenario() {
    let mut engine = Engine::new("Chevrolet", "LS3");
    engine.fuel_pressure_psi = Some(58.0);
    engine.fuel_flow_lph = Some(227.0);
    engine.cooling_btu_min = Some(12000.0);
    engine.weight_lbs = Some(418.0);
    let vehicle = Vehicle::new(1969, "Chevrolet", "Camaro");
    let b = build();

    let messages = evaluate_fitment(Some(&engine), Some(&vehicle), None, &b);

    assert_eq!(messages.len(), 4);
    assert!(messages[0].starts_with("High-pressure fuel system required: 58 psi"));
    assert!(messages[1].starts_with("High fuel flow requirement: 227 lph"));
    assert!(messages[2].starts_with("Significant cooling capacity needed: 12000 BTU/min"));
    assert!(messages[3].starts_with(
        "Missing critical engine specs: displacement, compression ratio, \
         valve train type, CAN bus protocol"
    ));
}

#[test]
fn test_external_balance_is_single_critical_in_any_case() {
    let b = build();
    for balance in ["external", "EXTERNAL", " External "] {
        let mut engine = complete_engine();
        engine.balance_type = Some(balance.to_string());

        let input = FitmentInput::new(Some(&engine), None, None, &b);
        let critical: Vec<_> = evaluate_advisories(&input)
            .into_iter()
            .filter(|a| a.severity == Severity::Critical)
            .collect();

        assert_eq!(critical.len(), 1, "balance {:?}", balance);
        assert_eq!(critical[0].rule, Rule::ExternalBalance);
        assert!(critical[0].message.starts_with("CRITICAL:"));
    }

    let mut engine = complete_engine();
    engine.balance_type = Some("internal".to_string());
    let input = FitmentInput::new(Some(&engine), None, None, &b);
    assert!(evaluate_advisories(&input)
        .iter()
        .all(|a| a.severity != Severity::Critical));
}

#[test]
fn test_torque_advisory_fires_above_85_percent() {
    let b = build();
    let mut trans = Transmission::new("Tremec", "T56");
    trans.max_torque_capacity_lb_ft = Some(450);

    let mut engine = complete_engine();
    engine.can_bus_protocol = None;
    engine.torque_lb_ft = Some(382);
    let quiet = evaluate_fitment(Some(&engine), None, Some(&trans), &b);
    assert!(quiet.iter().all(|m| !m.contains("transmission capacity")));

    engine.torque_lb_ft = Some(424);
    let loud = evaluate_fitment(Some(&engine), None, Some(&trans), &b);
    let torque = loud
        .iter()
        .find(|m| m.contains("transmission capacity"))
        .unwrap();
    assert!(torque.contains("424 lb-ft"));
    assert!(torque.contains("94%"));
    assert!(torque.contains("(450 lb-ft)"));
}

#[test]
fn test_zero_torque_capacity_is_unknown() {
    let b = build();
    let mut trans = Transmission::new("Tremec", "T56");
    trans.max_torque_capacity_lb_ft = Some(0);
    let mut engine = complete_engine();
    engine.torque_lb_ft = Some(424);

    let messages = evaluate_fitment(Some(&engine), None, Some(&trans), &b);
    assert!(messages.iter().all(|m| !m.contains("transmission capacity")));
}

#[test]
fn test_bay_and_clearance_rules() {
    let b = build();
    let mut engine = complete_engine();
    engine.length_in = Some(28.0);
    engine.width_in = Some(26.0);
    engine.oil_pan_depth_in = Some(4.0);
    let mut vehicle = Vehicle::new(1969, "Chevrolet", "Camaro");
    vehicle.bay_length_in = Some(28.5);
    vehicle.bay_width_in = Some(30.0);
    vehicle.stock_ground_clearance_in = Some(6.0);
    vehicle.driveline_angle_deg = Some(3.5);

    let input = FitmentInput::new(Some(&engine), Some(&vehicle), None, &b);
    let rules: Vec<Rule> = evaluate_advisories(&input)
        .into_iter()
        .map(|a| a.rule)
        .collect();

    assert_eq!(
        rules,
        vec![
            Rule::OilPanClearance,
            Rule::DrivelineAngle,
            Rule::BayLength,
            Rule::DataCompleteness,
        ]
    );
}

#[test]
fn test_every_rule_fires_in_fixed_order() {
    let mut engine = Engine::new("Chevrolet", "454");
    engine.fuel_pressure_psi = Some(58.0);
    engine.fuel_flow_lph = Some(227.0);
    engine.cooling_btu_min = Some(12000.0);
    engine.weight_lbs = Some(560.0);
    engine.balance_type = Some("external".to_string());
    engine.compression_ratio = Some(11.0);
    engine.can_bus_protocol = Some("GMLAN".to_string());
    engine.valve_train = Some("OHV".to_string());
    engine.oil_pan_depth_in = Some(4.0);
    engine.length_in = Some(30.0);
    engine.width_in = Some(29.5);
    engine.torque_lb_ft = Some(500);

    let mut vehicle = Vehicle::new(1970, "Chevrolet", "Chevelle");
    vehicle.stock_ground_clearance_in = Some(6.0);
    vehicle.driveline_angle_deg = Some(3.5);
    vehicle.bay_length_in = Some(30.5);
    vehicle.bay_width_in = Some(30.0);

    let mut trans = Transmission::new("GM", "TH400");
    trans.max_torque_capacity_lb_ft = Some(450);

    let mut b = build();
    b.collision_data = Some(json!({
        "collisions": ["one", "two", "three", "four", "five"]
    }));

    let input = FitmentInput::new(Some(&engine), Some(&vehicle), Some(&trans), &b);
    let rules: Vec<Rule> = evaluate_advisories(&input)
        .into_iter()
        .map(|a| a.rule)
        .collect();

    let mut expected = RULES.to_vec();
    expected.extend([Rule::Collision, Rule::Collision]);
    assert_eq!(rules, expected);
}

#[test]
fn test_collisions_capped_at_three() {
    let mut b = build();
    b.collision_data = Some(json!({
        "collisions": ["one", "two", "three", "four", "five"]
    }));

    let messages = evaluate_fitment(None, None, None, &b);
    assert_eq!(
        messages,
        vec![
            "Fitment issue detected: one",
            "Fitment issue detected: two",
            "Fitment issue detected: three",
        ]
    );
}

#[test]
fn test_completeness_names_missing_specs_in_order() {
    let b = build();
    let mut engine = Engine::new("Chevrolet", "LS3");
    engine.compression_ratio = Some(10.4);
    engine.valve_train = Some("OHV".to_string());
    engine.can_bus_protocol = Some("".to_string());

    let messages = evaluate_fitment(Some(&engine), None, None, &b);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Missing critical engine specs: displacement, CAN bus protocol."));
}

#[test]
fn test_evaluation_is_repeatable() {
    let mut engine = complete_engine();
    engine.fuel_pressure_psi = Some(58.0);
    engine.balance_type = Some("external".to_string());
    engine.weight_lbs = Some(560.0);
    let mut b = build();
    b.collision_data = Some(json!({"collisions": ["header vs frame"]}));

    let first = evaluate_fitment(Some(&engine), None, None, &b);
    let second = evaluate_fitment(Some(&engine), None, None, &b);
    assert_eq!(first, second);

    // Critical items keep their rule position instead of moving to the front
    assert!(first[0].starts_with("High-pressure fuel"));
    assert!(first[1].starts_with("Engine weight: 560 lbs"));
    assert!(first[2].starts_with("CRITICAL:"));
    assert!(first[first.len() - 1].starts_with("Fitment issue detected"));
}

#[test]
fn test_no_records_no_advisories() {
    let b = build();
    assert!(evaluate_fitment(None, None, None, &b).is_empty());
}

// ============================================================================
// Enrichment
// ============================================================================

const CATALOG: &str = "\
provider: carquery_api
engines:
  - make: Chevrolet
    model: LS3
    specs:
      power_hp: 480
      compression_ratio: 10.7
      displacement_liters: \"6.2 liters\"
";

#[test]
fn test_enrichment_never_overwrites_user_values() {
    let provider = CatalogProvider::from_yaml(CATALOG).unwrap();
    let mut engine = Engine::new("Chevrolet", "LS3");
    engine.power_hp = Some(430);
    engine.sources = annotate_record(&engine).unwrap();

    let outcome = enrich(&mut engine, &provider);

    assert_eq!(engine.power_hp, Some(430));
    assert_eq!(
        engine.sources.get("power_hp"),
        Some(&SpecSource::UserContributed)
    );
    assert_eq!(engine.compression_ratio, Some(10.7));
    assert_eq!(
        engine.sources.get("compression_ratio"),
        Some(&SpecSource::verified("carquery_api"))
    );

    // A value of the wrong type is skipped, not stored
    assert_eq!(engine.displacement_liters, None);
    assert!(engine.sources.get("displacement_liters").is_none());

    match outcome {
        EnrichOutcome::Enriched { provider, fields, .. } => {
            assert_eq!(provider, "carquery_api");
            assert_eq!(fields, vec!["compression_ratio".to_string()]);
        }
        other => panic!("expected enrichment, got {:?}", other),
    }
}

#[test]
fn test_enrichment_without_match_leaves_record_alone() {
    let provider = CatalogProvider::from_yaml(CATALOG).unwrap();
    let mut engine = Engine::new("Ford", "Coyote");
    let before = serde_json::to_value(&engine).unwrap();

    let outcome = enrich(&mut engine, &provider);

    assert!(matches!(outcome, EnrichOutcome::Skipped(_)));
    assert_eq!(serde_json::to_value(&engine).unwrap(), before);
}
