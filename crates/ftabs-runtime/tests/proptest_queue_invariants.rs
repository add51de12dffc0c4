#![forbid(unsafe_code)]

//! Property-based invariant tests for `TaskQueue`.
//!
//! 1. Coalescing keeps at most one pending entry per key
//! 2. A rescheduled key keeps its first position and runs its latest task
//! 3. Draining runs tasks in enqueue order and empties the queue
//! 4. `schedule_keyed` reports replacement exactly when the key was pending

use ftabs_runtime::TaskQueue;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Plain,
    Keyed(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Plain),
        3 => (0u8..8).prop_map(Op::Keyed),
    ]
}

/// Reference model: one slot per pending entry, holding its key and the
/// sequence number of the task that will run.
fn model(ops: &[Op]) -> Vec<(Option<u8>, usize)> {
    let mut slots: Vec<(Option<u8>, usize)> = Vec::new();
    for (seq, op) in ops.iter().enumerate() {
        match op {
            Op::Plain => slots.push((None, seq)),
            Op::Keyed(key) => match slots.iter_mut().find(|(k, _)| *k == Some(*key)) {
                Some(slot) => slot.1 = seq,
                None => slots.push((Some(*key), seq)),
            },
        }
    }
    slots
}

proptest! {
    #[test]
    fn coalescing_matches_model(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let mut queue: TaskQueue<u8, Vec<usize>> = TaskQueue::new();
        for (seq, op) in ops.iter().enumerate() {
            match op {
                Op::Plain => queue.schedule(move |log| log.push(seq)),
                Op::Keyed(key) => {
                    let was_pending = queue.is_pending(key);
                    let replaced = queue.schedule_keyed(*key, move |log| log.push(seq));
                    prop_assert_eq!(replaced, was_pending);
                    prop_assert!(queue.is_pending(key));
                }
            }
        }

        let expected = model(&ops);
        prop_assert_eq!(queue.len(), expected.len());
        for key in 0u8..8 {
            let pending = expected.iter().filter(|(k, _)| *k == Some(key)).count();
            prop_assert!(pending <= 1);
            prop_assert_eq!(queue.is_pending(&key), pending == 1);
        }

        let mut log = Vec::new();
        for task in queue.take_round() {
            task(&mut log);
        }
        let order: Vec<usize> = expected.iter().map(|(_, seq)| *seq).collect();
        prop_assert_eq!(log, order);
        prop_assert!(queue.is_empty());
    }

    #[test]
    fn drained_keys_can_be_scheduled_again(keys in proptest::collection::vec(0u8..4, 1..16)) {
        let mut queue: TaskQueue<u8, Vec<u8>> = TaskQueue::new();
        let mut distinct = Vec::new();
        for &key in &keys {
            queue.schedule_keyed(key, move |log| log.push(key));
            if !distinct.contains(&key) {
                distinct.push(key);
            }
        }
        let round = queue.take_round();
        for &key in &distinct {
            prop_assert!(!queue.is_pending(&key));
            prop_assert!(!queue.schedule_keyed(key, move |log| log.push(key)));
        }
        let mut first = Vec::new();
        for task in round {
            task(&mut first);
        }
        let mut second = Vec::new();
        for task in queue.take_round() {
            task(&mut second);
        }
        prop_assert_eq!(first, second);
    }
}
