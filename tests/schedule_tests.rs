use board_schedule::{
    DanglingPolicy, Dependency, DependencyKind, EngineConfig, ScheduleError, Task,
    compute_schedule_with,
};
use chrono::NaiveDate;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn config() -> EngineConfig {
    EngineConfig::default().with_fallback_anchor(d(2025, 1, 6))
}

/// A is two days, B three, C one; B and C both follow A.
fn abc() -> (Vec<Task>, Vec<Dependency>) {
    let tasks = vec![
        Task::new(1, "A").with_dates(d(2025, 1, 6), d(2025, 1, 7)),
        Task::new(2, "B").with_dates(d(2025, 1, 8), d(2025, 1, 10)),
        Task::new(3, "C").with_dates(d(2025, 1, 8), d(2025, 1, 8)),
    ];
    let deps = vec![Dependency::new(1, 2), Dependency::new(1, 3)];
    (tasks, deps)
}

#[test]
fn three_task_board_has_expected_offsets_and_critical_path() {
    let (tasks, deps) = abc();
    let schedule = compute_schedule_with(&tasks, &deps, &config()).unwrap();

    assert_eq!(schedule.project_duration_days, 5);

    let a = schedule.task(1).unwrap();
    assert_eq!((a.es, a.ef, a.ls, a.lf, a.slack), (0, 2, 0, 2, 0));
    assert!(a.critical);

    let b = schedule.task(2).unwrap();
    assert_eq!((b.es, b.ef, b.ls, b.lf, b.slack), (2, 5, 2, 5, 0));
    assert!(b.critical);

    let c = schedule.task(3).unwrap();
    assert_eq!((c.es, c.ef, c.ls, c.lf, c.slack), (2, 3, 4, 5, 2));
    assert!(!c.critical);

    assert_eq!(schedule.critical_path(), vec![1, 2]);
}

#[test]
fn undated_tasks_are_laid_out_from_the_anchor() {
    let tasks = vec![
        Task::new(1, "Kickoff").with_start(d(2025, 3, 3)),
        Task::new(2, "Draft"),
        Task::new(3, "Review"),
    ];
    let deps = vec![Dependency::new(1, 2), Dependency::new(2, 3)];
    let schedule = compute_schedule_with(&tasks, &deps, &config()).unwrap();

    assert_eq!(schedule.anchor_date, d(2025, 3, 3));
    let review = schedule.task(3).unwrap();
    assert_eq!(review.es, 2);
    assert_eq!(review.start, d(2025, 3, 5));
    assert_eq!(review.end, d(2025, 3, 5));
    assert_eq!(schedule.finish_date(), Some(d(2025, 3, 5)));
}

#[test]
fn fallback_anchor_applies_when_no_task_is_dated() {
    let tasks = vec![Task::new(1, "Only")];
    let schedule = compute_schedule_with(&tasks, &[], &config()).unwrap();
    assert_eq!(schedule.anchor_date, d(2025, 1, 6));
    assert_eq!(schedule.task(1).unwrap().start, d(2025, 1, 6));
}

#[test]
fn empty_board_has_zero_duration() {
    let schedule = compute_schedule_with(&[], &[], &config()).unwrap();
    assert_eq!(schedule.project_duration_days, 0);
    assert!(schedule.tasks.is_empty());
    assert!(schedule.critical_path().is_empty());
}

#[test]
fn closing_a_loop_reports_cycle() {
    let (tasks, mut deps) = abc();
    deps.push(Dependency::new(2, 1));
    let err = compute_schedule_with(&tasks, &deps, &config()).unwrap_err();
    match err {
        ScheduleError::CycleDetected { tasks } => {
            assert!(tasks.contains(&1));
            assert!(tasks.contains(&2));
        }
        other => panic!("expected cycle, got {other:?}"),
    }
}

#[test]
fn cycle_message_is_user_facing() {
    let tasks = vec![Task::new(1, "A")];
    let deps = vec![Dependency::new(1, 1)];
    let err = compute_schedule_with(&tasks, &deps, &config()).unwrap_err();
    assert!(err.is_cycle());
    assert_eq!(
        err.user_message(),
        "scheduling unavailable for this board: cyclic dependency detected"
    );
}

#[test]
fn dangling_edges_are_skipped_and_counted() {
    let (tasks, mut deps) = abc();
    deps.push(Dependency::new(1, 42));
    deps.push(Dependency::new(99, 3));
    let schedule = compute_schedule_with(&tasks, &deps, &config()).unwrap();
    assert_eq!(schedule.skipped_dependency_count(), 2);
    assert_eq!(schedule.project_duration_days, 5);
}

#[test]
fn dangling_edges_can_be_rejected() {
    let (tasks, mut deps) = abc();
    deps.push(Dependency::new(1, 42));
    let config = config().with_dangling_policy(DanglingPolicy::Reject);
    let err = compute_schedule_with(&tasks, &deps, &config).unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::DanglingDependency {
            predecessor: 1,
            successor: 42
        }
    ));
}

#[test]
fn non_finish_to_start_kinds_are_timed_as_finish_to_start() {
    let (tasks, _) = abc();
    let deps = vec![
        Dependency::with_kind(1, 2, DependencyKind::StartToStart),
        Dependency::with_kind(1, 3, DependencyKind::FinishToFinish),
    ];
    let schedule = compute_schedule_with(&tasks, &deps, &config()).unwrap();
    assert_eq!(schedule.task(2).unwrap().es, 2);
    assert_eq!(schedule.task(3).unwrap().es, 2);
}

#[test]
fn duplicate_task_ids_are_rejected() {
    let tasks = vec![Task::new(1, "A"), Task::new(1, "A again")];
    let err = compute_schedule_with(&tasks, &[], &config()).unwrap_err();
    assert!(matches!(err, ScheduleError::DuplicateTask { id: 1 }));
}

#[test]
fn rerunning_yields_identical_results() {
    let (tasks, deps) = abc();
    let first = compute_schedule_with(&tasks, &deps, &config()).unwrap();
    let second = compute_schedule_with(&tasks, &deps, &config()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn results_follow_board_order_and_topological_order_is_recorded() {
    let tasks = vec![Task::new(5, "Late"), Task::new(2, "Early")];
    let deps = vec![Dependency::new(2, 5)];
    let schedule = compute_schedule_with(&tasks, &deps, &config()).unwrap();
    let ids: Vec<_> = schedule.tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![5, 2]);
    assert_eq!(schedule.topological_order, vec![2, 5]);
}
