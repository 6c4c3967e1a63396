//! End-to-end tests through the public library API.
//!
//! Covers:
//! - recovery of a payoff already in the basis
//! - error kinds surfaced to callers
//! - the file artifacts a comparison run writes

use std::path::PathBuf;

use payoff_replicator::app::pipeline::run_approximation;
use payoff_replicator::domain::{
    ApproxConfig, FitMethod, GridConfig, ParityMode, RunConfig, SolverOptions, TargetKind, TargetSpec,
};
use payoff_replicator::error::ApproxError;
use payoff_replicator::fit::{approximate_all, approximate_payoff, assemble_system, fit_by_name};
use payoff_replicator::io::{read_fit_json, read_payoff_table};
use payoff_replicator::math::build_basis;
use payoff_replicator::models::{PayoffFn, portfolio_value, predict_fit};

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("replicate_it_{name}_{}", std::process::id()))
}

// =======================================================================
// Strikes 90/100/110, spot 100, target max(S-100, 0), L2 with γ = 0.
// The target is the middle call, so the fit must put all weight there.
// =======================================================================
#[test]
fn call_in_basis_is_recovered_exactly() {
    let target = PayoffFn(|s: f64| (s - 100.0).max(0.0));
    let config = ApproxConfig {
        method: FitMethod::L2,
        regularization: 0.0,
        parity: ParityMode::On,
        ..ApproxConfig::default()
    };
    let fit = approximate_payoff(&target, &[90.0, 100.0, 110.0], 100.0, &config).expect("fit failed");

    assert_eq!(fit.weights.len(), 3);
    let expected = [0.0, 1.0, 0.0];
    for (w, e) in fit.weights.iter().zip(expected) {
        assert!((w - e).abs() < 1e-8, "weights {:?}", fit.weights);
    }
    assert!(fit.spot_coefficient.abs() < 1e-8);
}

#[test]
fn tiny_ridge_penalty_stays_close_to_exact_recovery() {
    let target = PayoffFn(|s: f64| (s - 100.0).max(0.0));
    let config = ApproxConfig {
        method: FitMethod::L2,
        regularization: 1e-8,
        parity: ParityMode::On,
        ..ApproxConfig::default()
    };
    let fit = approximate_payoff(&target, &[90.0, 100.0, 110.0], 100.0, &config).expect("fit failed");
    assert!((fit.weights[1] - 1.0).abs() < 1e-4, "weights {:?}", fit.weights);
    assert!(fit.weights[0].abs() < 1e-4);
    assert!(fit.weights[2].abs() < 1e-4);
}

#[test]
fn parity_off_fit_reproduces_target_on_grid() {
    // Calls and puts at the same strikes are collinear with the identity, so
    // individual weights are not unique; the replicated payoff still is.
    let target = PayoffFn(|s: f64| (s - 100.0).max(0.0));
    let strikes = [90.0, 100.0, 110.0];
    let config = ApproxConfig {
        method: FitMethod::L2,
        regularization: 0.0,
        ..ApproxConfig::default()
    };
    let fit = approximate_payoff(&target, &strikes, 100.0, &config).expect("fit failed");
    assert_eq!(fit.weights.len(), 6);
    assert_eq!(fit.spot_coefficient, 0.0);
    for s in [50.0, 95.0, 100.0, 120.0, 150.0] {
        let v = predict_fit(&strikes, ParityMode::Off, &fit, s);
        assert!((v - (s - 100.0_f64).max(0.0)).abs() < 1e-6, "S={s}: {v}");
    }
}

#[test]
fn design_matrix_has_default_shape() {
    let basis = build_basis(&[70.0, 80.0, 90.0, 100.0], ParityMode::Off);
    let target = PayoffFn(|s: f64| s);
    let system = assemble_system(&basis, &target, 100.0, &GridConfig::default()).expect("assembly failed");
    assert_eq!(system.a.nrows(), 100);
    assert_eq!(system.a.ncols(), 8);
    assert_eq!(system.b.len(), 100);
}

#[test]
fn all_methods_agree_on_an_easy_target() {
    let target = PayoffFn(|s: f64| (s - 100.0).max(0.0));
    let config = ApproxConfig {
        regularization: 0.0,
        parity: ParityMode::On,
        ..ApproxConfig::default()
    };
    let fits = approximate_all(&target, &[90.0, 100.0, 110.0], 100.0, &config, &FitMethod::ALL).expect("fit failed");
    assert_eq!(fits.len(), 3);
    for (fit, method) in fits.iter().zip(FitMethod::ALL) {
        assert_eq!(fit.method, method);
        let err = (predict_fit(&[90.0, 100.0, 110.0], ParityMode::On, &fit.result, 125.0) - 25.0).abs();
        // L2 is exact; the iterative solvers stop at their tolerances.
        let tol = if method == FitMethod::L2 { 1e-6 } else { 3.0 };
        assert!(err < tol, "{method}: error {err} at S=125");
    }
}

// =======================================================================
// Error kinds
// =======================================================================
#[test]
fn unknown_method_name_is_invalid_input() {
    let basis = build_basis(&[100.0], ParityMode::Off);
    let target = PayoffFn(|s: f64| s);
    let system = assemble_system(&basis, &target, 100.0, &GridConfig::default()).expect("assembly failed");
    let err = fit_by_name(&system.a, &system.b, "bogus", 0.1, &SolverOptions::default()).unwrap_err();
    assert!(matches!(err, ApproxError::InvalidInput { .. }), "{err:?}");
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn non_positive_spot_is_invalid_input() {
    let target = PayoffFn(|s: f64| s);
    for spot in [0.0, -100.0] {
        let err = approximate_payoff(&target, &[100.0], spot, &ApproxConfig::default()).unwrap_err();
        assert!(matches!(err, ApproxError::InvalidInput { .. }), "{err:?}");
    }
}

#[test]
fn target_failure_is_propagated_unchanged() {
    let target = PayoffFn(|s: f64| if s > 120.0 { f64::NAN } else { s });
    let err = approximate_payoff(&target, &[100.0], 100.0, &ApproxConfig::default()).unwrap_err();
    match err {
        ApproxError::Evaluation { price, .. } => assert!(price > 120.0),
        other => panic!("expected evaluation error, got {other:?}"),
    }
}

// =======================================================================
// Comparison run artifacts
// =======================================================================
#[test]
fn compare_run_writes_tables_figures_and_report() {
    let dir = scratch_dir("bundle");
    let json = dir.join("report.json");
    std::fs::create_dir_all(&dir).expect("create scratch dir");

    let config = RunConfig {
        strikes: vec![80.0, 90.0, 100.0, 110.0, 120.0],
        spot: 100.0,
        methods: FitMethod::ALL.to_vec(),
        regularization: 0.1,
        parity: ParityMode::On,
        target: TargetSpec::Catalog {
            kind: TargetKind::Butterfly,
            center: 100.0,
            width: 10.0,
        },
        grid: GridConfig::default(),
        solver: SolverOptions::default(),
        eval_grid: GridConfig::with_points(500),
        plot: false,
        plot_width: 80,
        plot_height: 20,
        export_json: Some(json.clone()),
        out_dir: Some(dir.clone()),
    };
    let out = run_approximation(&config).expect("run failed");

    let names: Vec<String> = out
        .artifacts
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(
        names,
        vec![
            "regularization_comparison.dat",
            "regularization_comparison.tex",
            "weighted_loss.dat",
            "weighted_loss.tex",
        ]
    );

    let dat = std::fs::read_to_string(dir.join("regularization_comparison.dat")).expect("read dat");
    let mut lines = dat.lines();
    assert_eq!(lines.next(), Some("# S target l2 l1"));
    assert_eq!(lines.count(), 500);

    let report = read_fit_json(&json).expect("read report");
    assert_eq!(report.fits.len(), 3);
    let l2 = &report.fits[0];
    let curve = out.table.curve(FitMethod::L2).expect("l2 curve");
    let s = out.table.prices[250];
    assert!((portfolio_value(&l2.positions, s) - curve.values[250]).abs() < 1e-9);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn tabulated_target_matches_its_catalog_twin() {
    let csv = "price,payoff\n40,0\n90,0\n100,10\n110,0\n160,0\n";
    let table = read_payoff_table(csv.as_bytes()).expect("parse table");
    let config = ApproxConfig {
        regularization: 0.0,
        parity: ParityMode::On,
        ..ApproxConfig::default()
    };
    let strikes = [90.0, 100.0, 110.0];
    let from_table = approximate_payoff(&table, &strikes, 100.0, &config).expect("table fit");
    let butterfly = PayoffFn(|s: f64| {
        (s - 90.0).max(0.0) - 2.0 * (s - 100.0).max(0.0) + (s - 110.0).max(0.0)
    });
    let from_fn = approximate_payoff(&butterfly, &strikes, 100.0, &config).expect("fn fit");
    for (a, b) in from_table.weights.iter().zip(&from_fn.weights) {
        assert!((a - b).abs() < 1e-8);
    }
    assert!((from_fn.weights[1] + 2.0).abs() < 1e-8);
}
