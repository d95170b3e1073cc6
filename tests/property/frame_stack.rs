//! Property-based tests for the frame stack

use launchpad::frame::{Frame, FrameKind, FrameStack};
use launchpad::types::{EntityId, Environment};
use proptest::prelude::*;
use serde_json::Map;

#[derive(Debug, Clone)]
enum Op {
    Push(String),
    Pop,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(Op::Push),
        Just(Op::Pop),
    ]
}

fn frame(name: &str) -> Frame {
    Frame {
        kind: FrameKind::Asset,
        name: name.to_string(),
        id: EntityId::new(name),
        environment: Environment::new(),
        data: Map::new(),
        tasks: None,
    }
}

/// Breadcrumbs mirror the frames after any sequence of pushes and pops
#[test]
fn test_breadcrumbs_track_frames() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(op_strategy(), 0..40), |ops| {
            let mut stack = FrameStack::new();
            let mut model: Vec<String> = Vec::new();

            for op in ops {
                match op {
                    Op::Push(name) => {
                        stack.push(frame(&name));
                        model.push(name);
                    }
                    Op::Pop => {
                        let popped = stack.pop().map(|frame| frame.name);
                        prop_assert_eq!(popped, model.pop());
                    }
                }
                let names: Vec<&str> = stack.frames().iter().map(|f| f.name.as_str()).collect();
                prop_assert_eq!(stack.breadcrumbs(), model.as_slice());
                prop_assert_eq!(names.len(), stack.depth());
                prop_assert_eq!(stack.top().map(|f| f.name.clone()), model.last().cloned());
            }
            Ok(())
        })
        .unwrap();
}
