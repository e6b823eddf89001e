use approx::{assert_abs_diff_eq, assert_relative_eq};
use wingmesh_engine::components::{GeometryMesh, MeshComponent, ParameterSet};
use wingmesh_engine::config::{GeometryConfig, PRESET_NAMES};
use wingmesh_engine::geom::{
    PlanformSummary, ReferencePlanform, WingMesh, gen_crm_mesh, gen_mesh, half_mesh, mirror,
};

fn rect_component(num_twist: usize) -> GeometryMesh {
    GeometryMesh::new(gen_mesh(2, 5, 10.0, 2.0, 0.0).expect("baseline"), num_twist)
        .expect("component")
}

fn baseline_half(component: &GeometryMesh) -> WingMesh {
    component
        .baseline()
        .spanwise_slice(0..component.half_index() + 1)
        .expect("half")
}

#[test]
fn neutral_parameters_reproduce_rectangular_half() {
    let comp = rect_component(3);
    let out = comp.evaluate(&comp.default_parameters()).expect("evaluate");
    assert!(out.max_abs_diff(&baseline_half(&comp)) < 1e-12);
}

#[test]
fn neutral_parameters_reproduce_crm_half() {
    let baseline = gen_crm_mesh(4, 6, 3, &ReferencePlanform::CRM).expect("crm");
    let comp = GeometryMesh::new(baseline, 5).expect("component");
    let out = comp.evaluate(&comp.default_parameters()).expect("evaluate");
    assert_eq!(out.shape(), (3, 9));
    assert!(out.max_abs_diff(&baseline_half(&comp)) < 1e-12);
}

#[test]
fn tapered_rectangle_halves_tip_chord() {
    let comp = rect_component(2);
    let params = comp.default_parameters().with_taper(0.5);
    let out = comp.evaluate(&params).expect("evaluate");

    let summary = PlanformSummary::from_mesh(&out);
    assert_eq!(summary.num_y, 3);
    assert_abs_diff_eq!(summary.chords[0], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.chords[1], 1.5, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.chords[2], 2.0, epsilon = 1e-12);
    assert_relative_eq!(summary.taper_ratio().expect("root chord"), 0.5, epsilon = 1e-12);
}

#[test]
fn uniform_twist_pitches_every_station() {
    let comp = rect_component(1);
    let params = comp.default_parameters().with_twist(&[10.0]);
    let out = comp.evaluate(&params).expect("evaluate");

    // LE sits 0.5 ahead of the quarter chord on a chord of 2.
    let expected_z = 0.5 * 10.0_f64.to_radians().sin();
    for le in out.leading_edge() {
        assert_abs_diff_eq!(le[2].re, expected_z, epsilon = 1e-12);
    }
    for te in out.trailing_edge() {
        assert_abs_diff_eq!(te[2].re, -3.0 * expected_z, epsilon = 1e-12);
    }
}

#[test]
fn swept_half_moves_tip_aft() {
    let comp = rect_component(2);
    let params = comp.default_parameters().with_sweep(30.0);
    let out = comp.evaluate(&params).expect("evaluate");

    let shift = 5.0 * 30.0_f64.to_radians().tan();
    assert_abs_diff_eq!(out.get(0, 0)[0].re, -1.0 + shift, epsilon = 1e-12);
    assert_abs_diff_eq!(out.get(0, 2)[0].re, -1.0, epsilon = 1e-12);
}

#[test]
fn stretched_half_reaches_half_span() {
    let comp = rect_component(2);
    let params = comp.default_parameters().with_span(16.0);
    let out = comp.evaluate(&params).expect("evaluate");
    let le = out.leading_edge();
    // Station 0 is pinned at -5; the plane station moves by half the growth.
    assert_abs_diff_eq!(le[0][1].re, -5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(le[2][1].re, 3.0, epsilon = 1e-12);
}

#[test]
fn evaluated_half_mirrors_to_symmetric_wing() {
    let comp = rect_component(3);
    let params = comp
        .default_parameters()
        .with_twist(&[2.0, 0.0, 2.0])
        .with_taper(0.6);
    let half = comp.evaluate(&params).expect("evaluate");
    let full = mirror(&half, false).expect("mirror");
    assert_eq!(full.shape(), (2, 5));
    assert_eq!(half_mesh(&full, false).expect("half"), half);

    let summary = PlanformSummary::from_mesh(&full);
    assert_abs_diff_eq!(summary.chords[0], summary.chords[4], epsilon = 1e-12);
}

#[test]
fn every_preset_evaluates() {
    for name in PRESET_NAMES {
        let config = GeometryConfig::preset(name).expect("preset");
        let comp = config.build_component().expect("component");
        let params = config.parameters(&comp).expect("params");
        let mesh = comp.evaluate(&params).expect("evaluate");
        assert_eq!(mesh.shape(), comp.output_shape(), "{name}");
        mesh.validate_finite().expect("finite");
    }
}

#[test]
fn json_config_drives_component() {
    let config = GeometryConfig::from_json_str(
        r#"{
            "name": "tapered",
            "baseline": {"type": "rectangular", "num_x": 3, "num_y": 7, "span": 12.0, "chord": 2.0},
            "num_twist": 2,
            "design": {"taper": 0.25}
        }"#,
    )
    .expect("config");
    let comp = config.build_component().expect("component");
    let params: ParameterSet = config.parameters(&comp).expect("params");
    let out = comp.evaluate(&params).expect("evaluate");

    let summary = PlanformSummary::from_mesh(&out);
    assert_eq!((summary.num_x, summary.num_y), (3, 4));
    assert_abs_diff_eq!(summary.tip_chord, 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.root_chord, 2.0, epsilon = 1e-12);
}
