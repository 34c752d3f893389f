use hybridfit::solve_prototype_hybrid;
use hybridfit_problems::prototype::{prototype_bounds, prototype_is_feasible};

mod common;
use common::assert_in_bounds;

#[test]
fn test_refinement_is_feasible_and_does_not_regress() {
    let (global, refined) = solve_prototype_hybrid(0).unwrap();

    assert!(
        prototype_is_feasible(&refined.x, 1e-5),
        "refined point infeasible: {:?}",
        refined.x
    );
    assert!(
        refined.fun <= global.fun + 1e-6,
        "refinement regressed: {} vs {}",
        refined.fun,
        global.fun
    );
    assert_in_bounds(&refined.x, &prototype_bounds(), 1e-8);
}

#[test]
fn test_stage_tags_stay_distinct() {
    let (global, refined) = solve_prototype_hybrid(42).unwrap();

    assert_eq!(global.method, "mh:de(penalized)");
    assert!(global.success);
    assert!(global.path.is_none());
    assert_in_bounds(&global.x, &prototype_bounds(), 1e-9);

    assert!(refined.method.starts_with("nlopt:cobyla"));
    assert!(refined.method.ends_with(" (refine)"));
}
