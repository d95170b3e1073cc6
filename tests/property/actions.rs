//! Property-based tests for action ordering

use launchpad::action::{collect_compatible, Action, ActionContext, ActionOutcome};
use launchpad::error::LaunchError;
use launchpad::types::SessionMap;
use proptest::prelude::*;
use std::sync::Arc;

struct Ranked {
    name: String,
    label: String,
    order: i32,
    compatible: bool,
}

impl Action for Ranked {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn is_compatible(&self, _session: &SessionMap) -> bool {
        self.compatible
    }

    fn process(&self, _context: &ActionContext<'_>) -> Result<ActionOutcome, LaunchError> {
        Ok(ActionOutcome::Completed)
    }
}

/// Compatible actions come out sorted by (order, name), ties in discovery order
#[test]
fn test_compatible_actions_sorted_and_stable() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &prop::collection::vec((-3i32..3, "[ab]{1,2}", any::<bool>()), 0..20),
            |specs| {
                let actions: Vec<Arc<dyn Action>> = specs
                    .iter()
                    .enumerate()
                    .map(|(index, (order, name, compatible))| {
                        Arc::new(Ranked {
                            name: name.clone(),
                            label: index.to_string(),
                            order: *order,
                            compatible: *compatible,
                        }) as Arc<dyn Action>
                    })
                    .collect();

                let records = collect_compatible(&actions, &SessionMap::new());
                let expected = specs.iter().filter(|(_, _, compatible)| *compatible).count();
                prop_assert_eq!(records.len(), expected);

                for pair in records.windows(2) {
                    let (a, b) = (&pair[0], &pair[1]);
                    prop_assert!((a.order, &a.name) <= (b.order, &b.name));
                    if (a.order, &a.name) == (b.order, &b.name) {
                        let first: usize = a.label.parse().unwrap();
                        let second: usize = b.label.parse().unwrap();
                        prop_assert!(first < second);
                    }
                }
                Ok(())
            },
        )
        .unwrap();
}
