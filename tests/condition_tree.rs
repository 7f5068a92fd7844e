use condtree::{
    Comparison, Operand, Operation, OperationError, OperationFactory, OperationKind, Record,
    Value,
};
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn leaf(comparison: Comparison) -> Operand<Comparison> {
    Operand::condition(comparison)
}

fn person(age: i64, status: &str) -> Record {
    Record::new().with("age", age).with("status", status)
}

#[test]
fn test_and_of_comparisons() {
    let filter = Operation::and([
        leaf(Comparison::gt("age", 18)),
        leaf(Comparison::eq("status", "active")),
    ])
    .unwrap();

    assert!(filter.matches(&person(20, "active")));
    assert!(!filter.matches(&person(15, "active")));
    assert!(!filter.matches(&person(20, "banned")));
    assert!(filter.is_valid());
}

#[test]
fn test_or_then_merge() {
    let filter = Operation::or([leaf(Comparison::eq("x", 1)), leaf(Comparison::eq("x", 2))])
        .unwrap();
    let three = Record::new().with("x", 3);
    assert!(!filter.matches(&three));

    filter.merge([leaf(Comparison::eq("x", 3))]).unwrap();
    assert!(filter.matches(&three));
    assert_eq!(filter.len(), 3);
}

#[test]
fn test_not_of_comparison() {
    let filter = Operation::not(leaf(Comparison::eq("x", 1))).unwrap();
    assert!(filter.matches(&Record::new().with("x", 2)));
    assert!(!filter.matches(&Record::new().with("x", 1)));
}

#[test]
fn test_unknown_kind() {
    let err = OperationFactory::create("xor", [leaf(Comparison::eq("x", 1))]).unwrap_err();
    assert_eq!(
        err,
        OperationError::UnknownKind {
            slug: "xor".to_string()
        }
    );
}

#[test]
fn test_null_is_a_non_dropping_conjunct() {
    let filter = Operation::and([
        Operand::from(Operation::null()),
        leaf(Comparison::eq("x", 1)),
    ])
    .unwrap();

    assert_eq!(filter.len(), 2);
    assert!(filter.matches(&Record::new().with("x", 1)));
    assert!(!filter.matches(&Record::new().with("x", 2)));
    assert!(filter.is_valid());
}

#[test]
fn test_composing_code_can_drop_null() {
    let filter = Operation::and([
        Operand::from(Operation::null()),
        leaf(Comparison::eq("x", 1)),
    ])
    .unwrap();

    let without_null = Operation::and(
        filter
            .operands()
            .iter()
            .filter(|operand| operand.kind() != Some(OperationKind::Null))
            .cloned(),
    )
    .unwrap();

    for x in 0..3 {
        let record = Record::new().with("x", x);
        assert_eq!(filter.matches(&record), without_null.matches(&record));
    }
}

#[test]
fn test_nested_filter() {
    // age >= 18 AND (status = 'active' OR status = 'trial') AND NOT banned = true
    let status = Operation::or([
        leaf(Comparison::eq("status", "active")),
        leaf(Comparison::eq("status", "trial")),
    ])
    .unwrap();
    let banned = Operation::not(leaf(Comparison::eq("banned", true))).unwrap();
    let filter = Operation::and([
        leaf(Comparison::ge("age", 18)),
        Operand::from(status),
        Operand::from(banned),
    ])
    .unwrap();

    assert!(filter.matches(&person(30, "trial")));
    assert!(!filter.matches(&person(30, "closed")));
    assert!(!filter.matches(&person(30, "active").with("banned", true)));
    assert!(filter.matches(&person(30, "active").with("banned", false)));
}

#[test]
fn test_nesting_order_does_not_matter() {
    let a = || leaf(Comparison::eq("a", 1));
    let b = || leaf(Comparison::eq("b", 1));
    let c = || leaf(Comparison::eq("c", 1));

    let left = Operation::and([
        Operand::from(Operation::and([a(), b()]).unwrap()),
        c(),
    ])
    .unwrap();
    let right = Operation::and([
        a(),
        Operand::from(Operation::and([b(), c()]).unwrap()),
    ])
    .unwrap();

    assert_eq!(left, right);
    assert_eq!(left.structural_hash(), right.structural_hash());
    assert_eq!(left.to_string(), right.to_string());
}

#[test]
fn test_shuffled_insertion_is_equal() {
    let mut operands: Vec<Operand<Comparison>> = (0..16)
        .map(|i| leaf(Comparison::eq(format!("field_{}", i), i)))
        .collect();
    operands.push(Operand::values([Value::from(1), Value::from("a")]));
    operands.push(Operand::from(
        Operation::not(leaf(Comparison::lt("age", 18))).unwrap(),
    ));

    let reference = Operation::and(operands.clone()).unwrap();
    let mut rng = thread_rng();
    for _ in 0..20 {
        operands.shuffle(&mut rng);
        let shuffled = Operation::and(operands.clone()).unwrap();
        assert_eq!(shuffled, reference);
        assert_eq!(shuffled.to_string(), reference.to_string());
    }
}

#[test]
fn test_structural_hash_dedupes_in_hash_set() {
    let mut plans = HashSet::new();
    plans.insert(
        Operation::or([leaf(Comparison::eq("x", 1)), leaf(Comparison::eq("x", 2))]).unwrap(),
    );
    plans.insert(
        Operation::or([leaf(Comparison::eq("x", 2)), leaf(Comparison::eq("x", 1))]).unwrap(),
    );
    plans.insert(
        Operation::and([leaf(Comparison::eq("x", 2)), leaf(Comparison::eq("x", 1))]).unwrap(),
    );
    assert_eq!(plans.len(), 2);
}

#[test]
fn test_invalid_leaf_validity() {
    let invalid = || leaf(Comparison::gt("age", Value::Null));
    let valid = || leaf(Comparison::eq("status", "active"));

    assert!(Operation::or([invalid(), valid()]).unwrap().is_valid());
    assert!(!Operation::and([invalid(), valid()]).unwrap().is_valid());

    let filter = Operation::and([valid()]).unwrap();
    assert!(filter.is_valid());
    assert!(!filter.clear().unwrap().is_valid());
}

#[test]
fn test_raw_values_operand() {
    let filter = Operation::and([
        Operand::values([1, 2, 3]),
        leaf(Comparison::eq("x", 1)),
    ])
    .unwrap();
    assert!(filter.matches(&Record::new().with("x", 1)));
    assert!(filter.is_valid());
}

#[test]
fn test_concurrent_reads() {
    let inner = Operation::not(leaf(Comparison::eq("x", 1))).unwrap();
    let middle = Operation::or([Operand::from(inner), leaf(Comparison::eq("y", 1))]).unwrap();
    let root = Arc::new(Operation::not(Operand::from(middle)).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let root = Arc::clone(&root);
            thread::spawn(move || {
                let operand = root.operand().unwrap();
                let middle = operand.as_operation().unwrap();
                let operands = middle.operands();
                let inner = operands
                    .iter()
                    .filter_map(Operand::as_operation)
                    .next()
                    .unwrap();

                let record = Record::new().with("x", i % 2).with("y", 0);
                (
                    inner.negated(),
                    middle.negated(),
                    root.negated(),
                    root.matches(&record),
                )
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (inner, middle, root, matched) = handle.join().unwrap();
        assert!(!inner);
        assert!(middle);
        assert!(root);
        // root = NOT (NOT x = 1 OR y = 1), which holds only when x = 1
        assert_eq!(matched, i % 2 == 1);
    }
}
