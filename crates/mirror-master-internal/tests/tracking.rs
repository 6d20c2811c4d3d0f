use mirror_master_internal::config::Config;
use mirror_master_internal::cost::Penalty;
use mirror_master_internal::geometry::Complex;
use mirror_master_internal::session::Session;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sweep(session: &mut Session, from: Complex, to: Complex, steps: u32) {
    for i in 0..=steps {
        let t = f64::from(i) / f64::from(steps);
        let target = from + (to - from) * t;
        let frame = session.step(target).unwrap();

        let solution = frame
            .solution
            .unwrap_or_else(|| panic!("no solution for {target}"));
        assert!(solution.feasible, "infeasible pose for {target}");
        assert!(
            solution.cost.total < 1e-4,
            "cost {} for {target}",
            solution.cost.total
        );
    }
}

#[test]
fn horizontal_sweep_stays_feasible() {
    init();

    let mut session = Session::new(Config::default()).unwrap();
    sweep(&mut session, Complex::new(-4.0, 8.0), Complex::new(4.0, 8.0), 32);
}

#[test]
fn warm_started_sweep_stays_feasible() {
    init();

    let mut session = Session::new(Config {
        warm_start: true,
        ..Config::default()
    })
    .unwrap();
    sweep(&mut session, Complex::new(-4.0, 8.0), Complex::new(4.0, 8.0), 32);
}

#[test]
fn both_penalties_track_overhead_targets() {
    init();

    for penalty in [Penalty::FocusAligned, Penalty::Classic] {
        let mut session = Session::new(Config {
            penalty,
            ..Config::default()
        })
        .unwrap();

        sweep(&mut session, Complex::new(-3.0, 10.0), Complex::new(3.0, 10.0), 20);
    }
}

#[test]
fn penalty_can_be_switched_mid_session() {
    init();

    let mut session = Session::new(Config::default()).unwrap();
    let target = Complex::new(0.0, 10.0);

    let aligned = session.step(target).unwrap().solution.unwrap();
    let penalty = session.config().penalty.toggled();
    session.set_penalty(penalty);
    let classic = session.step(target).unwrap().solution.unwrap();

    assert_eq!(session.config().penalty, Penalty::Classic);
    assert!(aligned.feasible && classic.feasible);
    assert!(aligned.cost.total < 1e-4 && classic.cost.total < 1e-4);
}

#[test]
fn far_right_target_keeps_the_first_piston_within_its_stroke() {
    init();

    let mut session = Session::new(Config::default()).unwrap();
    let solution = session
        .step(Complex::new(6.0, 11.0))
        .unwrap()
        .solution
        .unwrap();
    let (first, second) = solution.pose.pistons;

    assert!(solution.feasible);
    // PA1 carries the end on the far side of the mirror, so it is the long one.
    assert!(first > second);
    assert!(first <= session.dimensions().piston_max + 1e-4);
}
