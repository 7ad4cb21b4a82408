use board_schedule::{Dependency, EngineConfig, Task, compute_schedule_with};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

fn config() -> EngineConfig {
    EngineConfig::default().with_fallback_anchor(anchor())
}

/// Tasks with random durations plus forward-only edges, so the graph is
/// always acyclic.
fn dag() -> impl Strategy<Value = (Vec<Task>, Vec<Dependency>)> {
    (1usize..24)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(1i64..8, n),
                prop::collection::vec((0..n, 0..n), 0..n * 2),
            )
        })
        .prop_map(|(durations, pairs)| {
            let tasks = durations
                .iter()
                .enumerate()
                .map(|(i, days)| {
                    let start = anchor();
                    Task::new(i as i32 + 1, format!("T{}", i + 1))
                        .with_dates(start, start + Duration::days(days - 1))
                })
                .collect::<Vec<_>>();
            let deps = pairs
                .into_iter()
                .filter(|(a, b)| a < b)
                .map(|(a, b)| Dependency::new(a as i32 + 1, b as i32 + 1))
                .collect();
            (tasks, deps)
        })
}

proptest! {
    #[test]
    fn offsets_respect_cpm_invariants((tasks, deps) in dag()) {
        let schedule = compute_schedule_with(&tasks, &deps, &config()).unwrap();

        let max_ef = schedule.tasks.iter().map(|t| t.ef).max().unwrap_or(0);
        prop_assert_eq!(schedule.project_duration_days, max_ef);
        prop_assert!(schedule.tasks.iter().any(|t| t.slack == 0));

        for result in &schedule.tasks {
            prop_assert!(result.es >= 0);
            prop_assert!(result.slack >= 0);
            prop_assert_eq!(result.slack, result.ls - result.es);
            prop_assert_eq!(result.ef, result.es + result.duration_days);
            prop_assert_eq!(result.lf, result.ls + result.duration_days);
            prop_assert_eq!(result.critical, result.slack == 0);
        }

        for dep in &deps {
            let pred = schedule.task(dep.predecessor_id).unwrap();
            let succ = schedule.task(dep.successor_id).unwrap();
            prop_assert!(succ.es >= pred.ef);
            prop_assert!(pred.lf <= succ.ls);
        }
    }

    #[test]
    fn roots_start_at_zero((tasks, deps) in dag()) {
        let schedule = compute_schedule_with(&tasks, &deps, &config()).unwrap();
        for result in &schedule.tasks {
            if !deps.iter().any(|d| d.successor_id == result.id) {
                prop_assert_eq!(result.es, 0);
                prop_assert_eq!(result.ef, result.duration_days);
            }
        }
    }

    #[test]
    fn back_edge_always_reports_cycle((tasks, mut deps) in dag()) {
        prop_assume!(!deps.is_empty());
        let first = deps[0].clone();
        deps.push(Dependency::new(first.successor_id, first.predecessor_id));
        let err = compute_schedule_with(&tasks, &deps, &config()).unwrap_err();
        prop_assert!(err.is_cycle());
    }

    #[test]
    fn topological_order_covers_every_task((tasks, deps) in dag()) {
        let schedule = compute_schedule_with(&tasks, &deps, &config()).unwrap();
        prop_assert_eq!(schedule.topological_order.len(), tasks.len());
        let position = |id: i32| schedule.topological_order.iter().position(|x| *x == id).unwrap();
        for dep in &deps {
            prop_assert!(position(dep.predecessor_id) < position(dep.successor_id));
        }
    }
}
