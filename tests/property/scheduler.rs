use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use wffbuild::dag::{Scheduler, TaskAction, TaskGraph, TaskRegistry, TaskRunState};
use wffbuild::engine::TaskOutcome;

// Strategy to generate a valid task graph.
// We ensure acyclicity by only allowing task N to depend on tasks 0..N-1.
fn graph_strategy(max_tasks: usize) -> impl Strategy<Value = TaskGraph> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        );

        deps_strat.prop_map(move |raw_deps| {
            let mut registry = TaskRegistry::new();
            for i in 0..raw_deps.len() {
                let name = format!("task_{i}");
                registry
                    .register(&name, TaskAction::Command(format!("echo {name}")))
                    .unwrap();
            }

            let mut binder = registry.into_binder().unwrap();
            for (i, potential_deps) in raw_deps.into_iter().enumerate() {
                // Only allow deps < i.
                let valid: HashSet<usize> = if i == 0 {
                    HashSet::new()
                } else {
                    potential_deps.into_iter().map(|d| d % i).collect()
                };
                for dep in valid {
                    binder
                        .bind(&format!("task_{dep}"), &format!("task_{i}"))
                        .unwrap();
                }
            }
            binder.finish().unwrap()
        })
    })
}

proptest! {
    #[test]
    fn run_terminates_and_failed_tasks_block_dependents(
        graph in graph_strategy(10),
        target_indices in proptest::collection::vec(0..10usize, 1..5),
        failing_indices in proptest::collection::vec(0..10usize, 0..5),
    ) {
        let names: Vec<String> = graph.tasks().map(str::to_string).collect();
        let targets: Vec<String> = target_indices
            .iter()
            .map(|&i| names[i % names.len()].clone())
            .collect();
        let failing: BTreeSet<String> = failing_indices
            .iter()
            .map(|&i| names[i % names.len()].clone())
            .collect();

        let mut scheduler = Scheduler::new(graph.clone());
        scheduler.start_run(&targets).unwrap();

        let mut executed = Vec::new();
        let mut steps = 0;
        while let Some(task) = scheduler.next_ready() {
            steps += 1;
            prop_assert!(steps <= names.len(), "scheduler handed out too many tasks");

            // Every prerequisite succeeded before this task was released.
            for dep in graph.dependencies_of(&task.name) {
                prop_assert_eq!(scheduler.run_state_of(dep), TaskRunState::DoneSuccess);
            }

            let outcome = if failing.contains(&task.name) {
                TaskOutcome::Failed
            } else {
                TaskOutcome::Success
            };
            scheduler.handle_completion(&task.name, outcome);
            executed.push(task.name);
        }

        // Nothing left hanging, and every target was either run or blocked.
        prop_assert!(scheduler.pending_tasks().is_empty());
        for target in &targets {
            let state = scheduler.run_state_of(target);
            prop_assert!(
                state == TaskRunState::DoneSuccess || state == TaskRunState::DoneFailed
            );
        }

        // Each task runs at most once.
        let unique: BTreeSet<&String> = executed.iter().collect();
        prop_assert_eq!(unique.len(), executed.len());
    }
}
