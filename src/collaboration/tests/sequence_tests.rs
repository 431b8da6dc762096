//! Tests for the dense-position element sequence.

use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::rstest;

use crate::collaboration::domain::{
    CollaborationDomainError, Element, ElementId, ElementSequence, Milestone, MoveOutcome, Task,
};

fn task_element(name: &str) -> Element {
    let task = Task::new(name, "", None, false).expect("valid task");
    Element::new_task(task, &DefaultClock)
}

fn milestone_element(name: &str) -> Element {
    let date = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");
    let milestone = Milestone::new(name, date).expect("valid milestone");
    Element::new_milestone(milestone, &DefaultClock)
}

fn names(sequence: &ElementSequence) -> Vec<&str> {
    sequence.iter().map(Element::name).collect()
}

fn assert_dense(sequence: &ElementSequence) {
    for (expected, element) in sequence.iter().enumerate() {
        assert_eq!(
            sequence.position_of(element.id()),
            Some(expected),
            "positions must form a dense zero-based range"
        );
    }
}

#[rstest]
fn append_assigns_next_position(#[values(0_usize, 1, 4)] existing: usize) {
    let mut sequence = ElementSequence::new();
    for index in 0..existing {
        sequence.append(task_element(&format!("task {index}")));
    }

    let appended = task_element("appended");
    let id = appended.id();
    sequence.append(appended);

    assert_eq!(sequence.position_of(id), Some(existing));
    assert_eq!(
        sequence.find(id).map(Element::name),
        Some("appended"),
        "lookup by id must see the appended element"
    );
    assert_dense(&sequence);
}

#[rstest]
fn reorder_and_delete_keep_positions_dense() {
    // A=0, B=1, D=2; move D to the front, delete B, append E, then try a
    // stale out-of-range move.
    let mut sequence = ElementSequence::new();
    let a = task_element("A");
    let b = milestone_element("B");
    let d = task_element("D");
    let (a_id, b_id, d_id) = (a.id(), b.id(), d.id());
    sequence.append(a);
    sequence.append(b);
    sequence.append(d);

    assert_eq!(
        sequence.move_element(d_id, 0).expect("known element"),
        MoveOutcome::Moved
    );
    assert_eq!(names(&sequence), vec!["D", "A", "B"]);

    sequence.remove(b_id).expect("known element");
    assert_eq!(names(&sequence), vec!["D", "A"]);
    assert_dense(&sequence);

    sequence.append(task_element("E"));
    assert_eq!(names(&sequence), vec!["D", "A", "E"]);

    assert_eq!(
        sequence.move_element(a_id, 5).expect("known element"),
        MoveOutcome::OutOfRange
    );
    assert_eq!(names(&sequence), vec!["D", "A", "E"], "no-op must not reorder");
    assert_dense(&sequence);
}

#[rstest]
fn move_to_current_position_is_unchanged() {
    let mut sequence = ElementSequence::new();
    let first = task_element("first");
    let id = first.id();
    sequence.append(first);
    sequence.append(task_element("second"));

    assert_eq!(
        sequence.move_element(id, 0).expect("known element"),
        MoveOutcome::Unchanged
    );
    assert_eq!(names(&sequence), vec!["first", "second"]);
}

#[rstest]
#[case(0, 2)]
#[case(2, 0)]
#[case(1, 2)]
fn move_shifts_intervening_elements(#[case] from: usize, #[case] to: usize) {
    let mut sequence = ElementSequence::new();
    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let element = task_element(name);
        ids.push(element.id());
        sequence.append(element);
    }

    let moved = *ids.get(from).expect("seeded element");
    assert_eq!(
        sequence.move_element(moved, to).expect("known element"),
        MoveOutcome::Moved
    );
    assert_eq!(sequence.position_of(moved), Some(to));
    assert_dense(&sequence);
}

#[rstest]
fn move_unknown_element_errors() {
    let mut sequence = ElementSequence::new();
    sequence.append(task_element("only"));

    let result = sequence.move_element(ElementId::new(), 0);
    assert!(matches!(
        result,
        Err(CollaborationDomainError::UnknownElement(_))
    ));
}

#[rstest]
fn from_persisted_rejects_duplicate_positions() {
    let rows = vec![(0, task_element("a")), (1, task_element("b")), (1, task_element("c"))];
    let result = ElementSequence::from_persisted(rows);
    assert!(matches!(
        result,
        Err(CollaborationDomainError::DuplicatePosition { position: 1 })
    ));
}

#[rstest]
fn from_persisted_rejects_position_gaps() {
    let rows = vec![(0, task_element("a")), (2, task_element("b"))];
    let result = ElementSequence::from_persisted(rows);
    assert!(matches!(
        result,
        Err(CollaborationDomainError::PositionGap {
            expected: 1,
            found: 2
        })
    ));
}

#[rstest]
fn from_persisted_orders_by_stored_position() {
    let first = task_element("first");
    let second = milestone_element("second");
    let rows = vec![(1, second), (0, first)];

    let sequence = ElementSequence::from_persisted(rows).expect("dense rows");
    assert_eq!(names(&sequence), vec!["first", "second"]);
}

#[rstest]
fn task_progress_ignores_milestones() {
    let mut sequence = ElementSequence::new();
    let mut done = task_element("done");
    done.as_task_mut()
        .expect("task element")
        .complete(crate::group::domain::UserId::new(), &DefaultClock);
    sequence.append(done);
    sequence.append(task_element("open"));
    sequence.append(milestone_element("launch"));

    assert_eq!(sequence.task_progress(), (2, 1));
}
