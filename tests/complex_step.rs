use approx::assert_relative_eq;
use rand::prelude::StdRng;
use rand::{Rng, SeedableRng};
use wingmesh_engine::components::{
    DesignVariable, GeometryMesh, MeshComponent, ParameterSet, complex_step_derivative,
    complex_step_jacobian, evaluate_many,
};
use wingmesh_engine::geom::{
    ReferencePlanform, Scalar, Tolerance, gen_crm_mesh, gen_mesh, real,
};

const FD_STEP: f64 = 1e-6;

fn crm_component() -> GeometryMesh {
    let baseline = gen_crm_mesh(3, 4, 3, &ReferencePlanform::CRM).expect("crm");
    GeometryMesh::new(baseline, 4).expect("component")
}

fn random_parameters(rng: &mut StdRng, comp: &GeometryMesh) -> ParameterSet {
    let span = comp.baseline_span();
    let twist: Vec<f64> = (0..comp.num_twist())
        .map(|_| rng.random_range(-5.0..5.0))
        .collect();
    ParameterSet::new(comp.num_twist())
        .with_span(rng.random_range(0.8 * span..1.2 * span))
        .with_sweep(rng.random_range(-20.0..35.0))
        .with_dihedral(rng.random_range(-5.0..10.0))
        .with_twist(&twist)
        .with_taper(rng.random_range(0.3..1.0))
}

fn shifted(params: &ParameterSet, variable: DesignVariable, delta: f64) -> ParameterSet {
    let mut out = params.clone();
    let slot = match variable {
        DesignVariable::Span => &mut out.span,
        DesignVariable::Sweep => &mut out.sweep,
        DesignVariable::Dihedral => &mut out.dihedral,
        DesignVariable::Twist(i) => &mut out.twist[i],
        DesignVariable::Taper => &mut out.taper,
    };
    *slot += real(delta);
    out
}

/// Central difference of the real pipeline, row-major like `MeshDerivative`.
fn central_difference(
    comp: &GeometryMesh,
    params: &ParameterSet,
    variable: DesignVariable,
) -> Vec<[f64; 3]> {
    let plus = comp
        .evaluate(&shifted(params, variable, FD_STEP))
        .expect("plus")
        .real_points();
    let minus = comp
        .evaluate(&shifted(params, variable, -FD_STEP))
        .expect("minus")
        .real_points();
    plus.iter()
        .zip(&minus)
        .map(|(p, m)| {
            [
                (p[0] - m[0]) / (2.0 * FD_STEP),
                (p[1] - m[1]) / (2.0 * FD_STEP),
                (p[2] - m[2]) / (2.0 * FD_STEP),
            ]
        })
        .collect()
}

// ============================================================================
// Agreement with finite differences
// ============================================================================

#[test]
fn complex_step_matches_central_difference_on_crm() {
    let comp = crm_component();
    let mut rng: StdRng = SeedableRng::seed_from_u64(7);

    for _ in 0..3 {
        let params = random_parameters(&mut rng, &comp);
        for variable in DesignVariable::all(comp.num_twist()) {
            let cs = complex_step_derivative(&comp, &params, variable, Tolerance::COMPLEX_STEP.eps)
                .expect("complex step");
            let fd = central_difference(&comp, &params, variable);
            assert_eq!(cs.values.len(), fd.len());
            for (a, b) in cs.values.iter().zip(&fd) {
                for k in 0..3 {
                    assert_relative_eq!(a[k], b[k], epsilon = 1e-5, max_relative = 1e-5);
                }
            }
        }
    }
}

#[test]
fn complex_step_matches_central_difference_on_cosine_rectangle() {
    let baseline = gen_mesh(3, 9, 16.0, 3.0, 0.5).expect("baseline");
    let comp = GeometryMesh::new(baseline, 3).expect("component");
    let mut rng: StdRng = SeedableRng::seed_from_u64(42);
    let params = random_parameters(&mut rng, &comp);

    for variable in DesignVariable::all(comp.num_twist()) {
        let cs = complex_step_derivative(&comp, &params, variable, 1e-20).expect("complex step");
        let fd = central_difference(&comp, &params, variable);
        for (a, b) in cs.values.iter().zip(&fd) {
            for k in 0..3 {
                assert_relative_eq!(a[k], b[k], epsilon = 1e-5, max_relative = 1e-5);
            }
        }
    }
}

// ============================================================================
// Sanity of individual columns
// ============================================================================

#[test]
fn real_part_is_unchanged_by_perturbation() {
    let comp = crm_component();
    let mut rng: StdRng = SeedableRng::seed_from_u64(3);
    let params = random_parameters(&mut rng, &comp);
    let reference = comp.evaluate(&params).expect("evaluate");

    let mut perturbed = params.clone();
    perturbed.sweep += Scalar::new(0.0, 1e-30);
    let out = comp.evaluate(&perturbed).expect("evaluate");
    for (a, b) in out.real_points().iter().zip(reference.real_points()) {
        for k in 0..3 {
            assert_relative_eq!(a[k], b[k], epsilon = 1e-12);
        }
    }
    assert!(out.imag_points().iter().flatten().any(|v| v.abs() > 0.0));
}

#[test]
fn twist_column_leaves_quarter_chord_fixed() {
    let baseline = gen_mesh(5, 7, 12.0, 2.0, 0.0).expect("baseline");
    let comp = GeometryMesh::new(baseline, 3).expect("component");
    let params = comp.default_parameters();
    let d = complex_step_derivative(&comp, &params, DesignVariable::Twist(1), 1e-30)
        .expect("complex step");

    // Chordwise stations at 0, 1/4, ... of the chord; row 1 is the quarter chord.
    for iy in 0..d.num_y {
        assert!(d.get(1, iy).iter().all(|v| v.abs() < 1e-12));
    }
    assert!(d.max_abs() > 0.0);
    // Twist is a pure rotation about a spanwise axis.
    assert!(d.values.iter().all(|v| v[1].abs() < 1e-12));
}

// ============================================================================
// Jacobian and batch evaluation
// ============================================================================

#[test]
fn jacobian_columns_match_single_derivatives() {
    let comp = crm_component();
    let mut rng: StdRng = SeedableRng::seed_from_u64(11);
    let params = random_parameters(&mut rng, &comp);
    let step = Tolerance::COMPLEX_STEP.eps;

    let columns = complex_step_jacobian(&comp, &params, step).expect("jacobian");
    let vars = DesignVariable::all(comp.num_twist());
    assert_eq!(columns.len(), vars.len());
    for (column, var) in columns.iter().zip(vars) {
        assert_eq!(column.variable, var);
        let single = complex_step_derivative(&comp, &params, var, step).expect("column");
        assert_eq!(column, &single);
    }

    let again = complex_step_jacobian(&comp, &params, step).expect("jacobian");
    assert_eq!(columns, again);
}

#[test]
fn evaluate_many_matches_individual_evaluations() {
    let components = vec![
        crm_component(),
        GeometryMesh::new(gen_mesh(2, 5, 10.0, 2.0, 0.0).expect("rect"), 4).expect("component"),
        GeometryMesh::new(gen_mesh(4, 11, 30.0, 5.0, 1.0).expect("rect"), 4).expect("component"),
    ];
    let params = ParameterSet::new(4)
        .with_span(40.0)
        .with_sweep(15.0)
        .with_twist(&[1.0, 0.5, 0.0, -0.5])
        .with_taper(0.7);

    let batch = evaluate_many(&components, &params).expect("batch");
    assert_eq!(batch.len(), components.len());
    for (mesh, comp) in batch.iter().zip(&components) {
        assert_eq!(mesh, &comp.evaluate(&params).expect("single"));
    }
}

#[test]
fn evaluate_many_fails_on_first_bad_component() {
    let components = vec![
        GeometryMesh::new(gen_mesh(2, 5, 10.0, 2.0, 0.0).expect("rect"), 2).expect("component"),
        GeometryMesh::new(gen_mesh(2, 5, 10.0, 2.0, 0.0).expect("rect"), 3).expect("component"),
    ];
    let params = ParameterSet::new(2).with_span(10.0);
    assert!(evaluate_many(&components, &params).is_err());
}
