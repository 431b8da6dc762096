//! Tests for the embedded fragment templates.

use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::rstest;

use crate::collaboration::domain::{
    Collaboration, Element, ElementSequence, Milestone, Task,
};
use crate::collaboration::services::{CollaborationSummary, ElementListView};
use crate::group::domain::{GroupId, UserId, UserRef};
use crate::rendering::FragmentRenderer;

fn sample_view() -> ElementListView {
    let collaboration = Collaboration::new(
        GroupId::new(),
        "Spring Fair",
        "The annual fair",
        UserRef::detached(),
        &DefaultClock,
    )
    .expect("valid collaboration");

    let mut sequence = ElementSequence::new();
    let mut done = Task::new("Book the hall", "", None, false).expect("valid task");
    done.complete(UserId::new(), &DefaultClock);
    sequence.append(Element::new_task(done, &DefaultClock));
    let open = Task::new("Hang posters", "", None, true).expect("valid task");
    sequence.append(Element::new_task(open, &DefaultClock));
    let date = NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date");
    let milestone = Milestone::new("Fair day", date).expect("valid milestone");
    sequence.append(Element::new_milestone(milestone, &DefaultClock));

    ElementListView::assemble(&collaboration, &sequence)
}

#[rstest]
fn element_list_renders_rows_in_position_order() {
    let html = FragmentRenderer::new()
        .element_list(&sample_view())
        .expect("render should succeed");

    let hall = html.find("Book the hall").expect("completed task rendered");
    let posters = html.find("Hang posters").expect("open task rendered");
    let fair = html.find("Fair day").expect("milestone rendered");
    assert!(hall < posters && posters < fair, "rows must follow positions");
    assert!(html.contains(r#"data-position="0""#));
    assert!(html.contains(r#"data-position="2""#));
}

#[rstest]
fn element_list_offers_the_opposite_toggle() {
    let html = FragmentRenderer::new()
        .element_list(&sample_view())
        .expect("render should succeed");

    assert!(
        html.contains(r#"value="undo""#),
        "completed task must offer undo"
    );
    assert!(
        html.contains(r#"value="complete""#),
        "open task must offer complete"
    );
    assert!(html.contains("2026-05-01"), "milestone date must render");
}

#[rstest]
fn collaboration_cards_render_progress() {
    let collaboration = Collaboration::new(
        GroupId::new(),
        "Harvest",
        "",
        UserRef::detached(),
        &DefaultClock,
    )
    .expect("valid collaboration");
    let mut sequence = ElementSequence::new();
    let mut done = Task::new("dig", "", None, false).expect("valid task");
    done.complete(UserId::new(), &DefaultClock);
    sequence.append(Element::new_task(done, &DefaultClock));
    sequence.append(Element::new_task(
        Task::new("rake", "", None, false).expect("valid task"),
        &DefaultClock,
    ));
    let summary = CollaborationSummary::assemble(&collaboration, &sequence);

    let html = FragmentRenderer::new()
        .collaboration_cards(std::slice::from_ref(&summary))
        .expect("render should succeed");

    assert!(html.contains("Harvest"));
    assert!(html.contains("1/2"));
    assert!(html.contains("status-ongoing"));
}
