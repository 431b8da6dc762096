//! Service tests for element workflows.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use crate::collaboration::{
    adapters::memory::{InMemoryCollaborationRepository, InMemoryElementStore},
    domain::{
        Collaboration, CollaborationDomainError, CollaborationId, Element, ElementId,
        ElementKind, ElementSequence, MoveOutcome, Task, ToggleAction,
    },
    ports::{
        AttachmentError, AttachmentStore, AttachmentUpload, CollaborationRepository,
        CollaborationRepositoryError, CollaborationRepositoryResult, ElementStore,
        SequenceRevision,
    },
    services::{ElementService, ElementServiceError, MilestoneInput, TaskInput, ToggleOutcome},
};
use crate::group::{
    adapters::memory::InMemoryMembershipRepository,
    domain::{GroupId, Membership, MembershipStatus, Slug, UserId, UserRef},
    ports::MembershipRepository,
    services::PermissionGate,
};

/// Test double recording saves and removals instead of touching disk.
#[derive(Debug, Default)]
struct RecordingAttachmentStore {
    saved: Mutex<Vec<String>>,
    removed: Mutex<Vec<String>>,
}

#[async_trait]
impl AttachmentStore for RecordingAttachmentStore {
    async fn save(&self, upload: AttachmentUpload) -> Result<String, AttachmentError> {
        let path = format!("stored-{}", upload.file_name);
        self.saved.lock().expect("lock").push(path.clone());
        Ok(path)
    }

    async fn remove(&self, path: &str) -> Result<(), AttachmentError> {
        self.removed.lock().expect("lock").push(path.to_owned());
        Ok(())
    }
}

/// Element store that yields to the scheduler between load and return,
/// widening the window in which another writer can slip in.
#[derive(Debug, Default)]
struct YieldingElementStore {
    inner: InMemoryElementStore,
}

#[async_trait]
impl ElementStore for YieldingElementStore {
    async fn load_sequence(
        &self,
        collaboration: CollaborationId,
    ) -> CollaborationRepositoryResult<(ElementSequence, SequenceRevision)> {
        let loaded = self.inner.load_sequence(collaboration).await?;
        tokio::task::yield_now().await;
        Ok(loaded)
    }

    async fn store_sequence(
        &self,
        collaboration: CollaborationId,
        sequence: &ElementSequence,
        expected: SequenceRevision,
    ) -> CollaborationRepositoryResult<()> {
        self.inner
            .store_sequence(collaboration, sequence, expected)
            .await
    }
}

type TestService = ElementService<
    InMemoryCollaborationRepository,
    InMemoryElementStore,
    PermissionGate<InMemoryMembershipRepository>,
    RecordingAttachmentStore,
    DefaultClock,
>;

struct Harness {
    service: TestService,
    collaborations: Arc<InMemoryCollaborationRepository>,
    memberships: Arc<InMemoryMembershipRepository>,
    attachments: Arc<RecordingAttachmentStore>,
}

#[fixture]
fn harness() -> Harness {
    let collaborations = Arc::new(InMemoryCollaborationRepository::new());
    let elements = Arc::new(InMemoryElementStore::new());
    let memberships = Arc::new(InMemoryMembershipRepository::new());
    let gate = Arc::new(PermissionGate::new(Arc::clone(&memberships)));
    let attachments = Arc::new(RecordingAttachmentStore::default());
    let service = ElementService::new(
        Arc::clone(&collaborations),
        elements,
        gate,
        Arc::clone(&attachments),
        Arc::new(DefaultClock),
    );
    Harness {
        service,
        collaborations,
        memberships,
        attachments,
    }
}

async fn seed_collaboration(harness: &Harness) -> (GroupId, Slug) {
    let group = GroupId::new();
    let collaboration =
        Collaboration::new(group, "Spring Fair", "", UserRef::detached(), &DefaultClock)
            .expect("valid collaboration");
    harness
        .collaborations
        .store(&collaboration)
        .await
        .expect("store collaboration");
    (group, collaboration.slug().clone())
}

async fn seed_member(harness: &Harness, group: GroupId, status: MembershipStatus) -> UserId {
    let membership = Membership::with_status(UserId::new(), group, status, &DefaultClock);
    harness
        .memberships
        .store(&membership)
        .await
        .expect("store membership");
    membership.user()
}

fn task_input(name: &str, prompt_for_details: bool) -> TaskInput {
    TaskInput {
        name: name.to_owned(),
        description: String::new(),
        assigned_to: None,
        prompt_for_details,
    }
}

fn parse_id(raw: &str) -> ElementId {
    raw.parse::<uuid::Uuid>()
        .map(ElementId::from_uuid)
        .expect("uuid id")
}

async fn seed_task(
    harness: &Harness,
    actor: UserId,
    slug: &Slug,
    name: &str,
    prompt_for_details: bool,
) -> ElementId {
    let view = harness
        .service
        .create_task(actor, slug, task_input(name, prompt_for_details))
        .await
        .expect("create task");
    let row = view.elements.last().expect("appended row");
    parse_id(&row.id)
}

async fn listed_names(harness: &Harness, actor: UserId, slug: &Slug) -> Vec<String> {
    harness
        .service
        .list(actor, slug)
        .await
        .expect("list elements")
        .elements
        .into_iter()
        .map(|row| row.name)
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_elements_take_successive_positions(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;

    let after_task = harness
        .service
        .create_task(member, &slug, task_input("Book the hall", false))
        .await
        .expect("create task");
    let after_milestone = harness
        .service
        .create_milestone(
            member,
            &slug,
            MilestoneInput {
                name: "Fair day".into(),
                target_date: NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date"),
            },
        )
        .await
        .expect("create milestone");

    let task_row = after_task.elements.last().expect("task row");
    assert_eq!(task_row.position, 0);
    let milestone_row = after_milestone.elements.last().expect("milestone row");
    assert_eq!(milestone_row.position, 1);
    assert_eq!(milestone_row.kind, ElementKind::Milestone);
    assert_eq!(
        listed_names(&harness, member, &slug).await,
        vec!["Book the hall", "Fair day"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mutations_return_the_refreshed_list(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;

    let view = harness
        .service
        .create_task(member, &slug, task_input("Book the hall", false))
        .await
        .expect("create task");

    assert_eq!(view.slug, slug.to_string());
    assert_eq!(view.task_total, 1);
    assert_eq!(view.task_completed, 0);
    assert_eq!(view.elements.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_keep_both_tasks(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    // The yielding store parks each writer between its load and the store,
    // forcing the two cycles to interleave.
    let service = ElementService::new(
        Arc::clone(&harness.collaborations),
        Arc::new(YieldingElementStore::default()),
        Arc::new(PermissionGate::new(Arc::clone(&harness.memberships))),
        Arc::clone(&harness.attachments),
        Arc::new(DefaultClock),
    );

    let (first, second) = tokio::join!(
        service.create_task(member, &slug, task_input("Order bunting", false)),
        service.create_task(member, &slug, task_input("Hire the band", false)),
    );
    first.expect("first create");
    second.expect("second create");

    let mut names = service
        .list(member, &slug)
        .await
        .expect("list elements")
        .elements
        .into_iter()
        .map(|row| row.name)
        .collect::<Vec<_>>();
    names.sort();
    assert_eq!(names, vec!["Hire the band", "Order bunting"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_revision_store_is_rejected() {
    let store = InMemoryElementStore::new();
    let collaboration = CollaborationId::new();
    let (mut sequence, revision) = store
        .load_sequence(collaboration)
        .await
        .expect("load empty sequence");
    let task = Task::new("Paint the sign", "", None, false).expect("valid task");
    sequence.append(Element::new_task(task, &DefaultClock));
    store
        .store_sequence(collaboration, &sequence, revision)
        .await
        .expect("store against the loaded revision");

    let result = store.store_sequence(collaboration, &sequence, revision).await;

    assert!(matches!(
        result,
        Err(CollaborationRepositoryError::StaleSequence(_))
    ));
    let (reloaded, bumped) = store
        .load_sequence(collaboration)
        .await
        .expect("reload");
    assert_eq!(reloaded.len(), 1);
    assert_eq!(bumped, revision.next());
}

#[rstest]
#[case(Some(MembershipStatus::Pending))]
#[case(Some(MembershipStatus::Ignored))]
#[case(None)]
#[tokio::test(flavor = "multi_thread")]
async fn inactive_users_are_forbidden(
    harness: Harness,
    #[case] status: Option<MembershipStatus>,
) {
    let (group, slug) = seed_collaboration(&harness).await;
    let actor = match status {
        Some(status) => seed_member(&harness, group, status).await,
        None => UserId::new(),
    };

    let result = harness
        .service
        .create_task(actor, &slug, task_input("Sneaky", false))
        .await;

    assert!(matches!(result, Err(ElementServiceError::Forbidden)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admins_hold_element_access(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let admin = seed_member(&harness, group, MembershipStatus::Admin).await;

    let view = harness
        .service
        .create_task(admin, &slug, task_input("Order bunting", false))
        .await
        .expect("admins are members too");
    let row = view.elements.last().expect("appended row");
    assert_eq!(row.position, 0);
}

#[rstest]
#[case(false)]
#[case(true)]
#[tokio::test(flavor = "multi_thread")]
async fn completing_surfaces_the_details_prompt_flag(
    harness: Harness,
    #[case] prompt_for_details: bool,
) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    let task = seed_task(&harness, member, &slug, "Hang posters", prompt_for_details).await;

    let (outcome, view) = harness
        .service
        .toggle_task(member, &slug, task, Some(ToggleAction::Complete))
        .await
        .expect("toggle should succeed");

    assert_eq!(outcome, ToggleOutcome::Completed { prompt_for_details });
    let row = view.elements.first().expect("toggled row");
    assert!(row.completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn toggle_without_action_changes_nothing(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    seed_task(&harness, member, &slug, "Hang posters", false).await;
    let task = seed_task(&harness, member, &slug, "Hang posters again", false).await;

    let (outcome, view) = harness
        .service
        .toggle_task(member, &slug, task, ToggleAction::parse("finish"))
        .await
        .expect("unknown action must not error");

    assert_eq!(outcome, ToggleOutcome::Ignored);
    assert_eq!(view.elements.len(), 2);
    assert!(view.elements.iter().all(|row| !row.completed));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn undo_discards_details_and_removes_the_file(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    let task = seed_task(&harness, member, &slug, "Collect donations", true).await;

    harness
        .service
        .toggle_task(member, &slug, task, Some(ToggleAction::Complete))
        .await
        .expect("complete");
    let detailed = harness
        .service
        .complete_details(
            member,
            &slug,
            task,
            Some("counted and banked".into()),
            Some(AttachmentUpload {
                file_name: "receipt.pdf".into(),
                bytes: vec![1, 2, 3],
            }),
        )
        .await
        .expect("record details");
    let detailed_row = detailed.elements.first().expect("detailed row");
    assert_eq!(detailed_row.attachment.as_deref(), Some("stored-receipt.pdf"));

    let (outcome, view) = harness
        .service
        .toggle_task(member, &slug, task, Some(ToggleAction::Undo))
        .await
        .expect("undo");

    assert_eq!(outcome, ToggleOutcome::Reopened);
    let row = view.elements.first().expect("seeded row");
    assert!(!row.completed);
    assert!(row.completed_at.is_none());
    assert!(row.completion_notes.is_none());
    assert!(row.attachment.is_none());
    let removed = harness.attachments.removed.lock().expect("lock");
    assert_eq!(removed.as_slice(), ["stored-receipt.pdf"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recompleting_removes_the_superseded_file(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    let task = seed_task(&harness, member, &slug, "Count the takings", true).await;

    harness
        .service
        .toggle_task(member, &slug, task, Some(ToggleAction::Complete))
        .await
        .expect("complete");
    harness
        .service
        .complete_details(
            member,
            &slug,
            task,
            None,
            Some(AttachmentUpload {
                file_name: "first-count.pdf".into(),
                bytes: vec![1],
            }),
        )
        .await
        .expect("record details");

    let (outcome, view) = harness
        .service
        .toggle_task(member, &slug, task, Some(ToggleAction::Complete))
        .await
        .expect("recomplete");

    assert!(matches!(outcome, ToggleOutcome::Completed { .. }));
    let row = view.elements.first().expect("toggled row");
    assert!(row.completed);
    assert!(row.attachment.is_none(), "recompleting starts a fresh payload");
    let removed = harness.attachments.removed.lock().expect("lock");
    assert_eq!(removed.as_slice(), ["stored-first-count.pdf"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replacing_details_removes_the_old_file(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    let task = seed_task(&harness, member, &slug, "Photograph the stalls", true).await;

    harness
        .service
        .toggle_task(member, &slug, task, Some(ToggleAction::Complete))
        .await
        .expect("complete");
    harness
        .service
        .complete_details(
            member,
            &slug,
            task,
            None,
            Some(AttachmentUpload {
                file_name: "blurry.jpg".into(),
                bytes: vec![1],
            }),
        )
        .await
        .expect("first details");
    let view = harness
        .service
        .complete_details(
            member,
            &slug,
            task,
            None,
            Some(AttachmentUpload {
                file_name: "sharp.jpg".into(),
                bytes: vec![2],
            }),
        )
        .await
        .expect("second details");

    let row = view.elements.first().expect("detailed row");
    assert_eq!(row.attachment.as_deref(), Some("stored-sharp.jpg"));
    let removed = harness.attachments.removed.lock().expect("lock");
    assert_eq!(removed.as_slice(), ["stored-blurry.jpg"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_details_remove_the_saved_file(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    let task = seed_task(&harness, member, &slug, "Still open", true).await;

    let result = harness
        .service
        .complete_details(
            member,
            &slug,
            task,
            Some("too early".into()),
            Some(AttachmentUpload {
                file_name: "premature.pdf".into(),
                bytes: vec![9],
            }),
        )
        .await;

    assert!(matches!(
        result,
        Err(ElementServiceError::Domain(
            CollaborationDomainError::DetailsOnOpenTask
        ))
    ));
    let saved = harness.attachments.saved.lock().expect("lock");
    assert_eq!(saved.as_slice(), ["stored-premature.pdf"]);
    let removed = harness.attachments.removed.lock().expect("lock");
    assert_eq!(removed.as_slice(), ["stored-premature.pdf"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn details_on_an_open_task_error(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    let task = seed_task(&harness, member, &slug, "Open task", true).await;

    let result = harness
        .service
        .complete_details(member, &slug, task, Some("too early".into()), None)
        .await;

    assert!(matches!(
        result,
        Err(ElementServiceError::Domain(
            CollaborationDomainError::DetailsOnOpenTask
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn toggling_a_milestone_is_rejected(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    let view = harness
        .service
        .create_milestone(
            member,
            &slug,
            MilestoneInput {
                name: "Opening".into(),
                target_date: NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date"),
            },
        )
        .await
        .expect("create milestone");
    let id = parse_id(&view.elements.last().expect("milestone row").id);

    let result = harness
        .service
        .toggle_task(member, &slug, id, Some(ToggleAction::Complete))
        .await;

    assert!(matches!(
        result,
        Err(ElementServiceError::Domain(
            CollaborationDomainError::NotATask(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_an_element_reorders_the_list(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    seed_task(&harness, member, &slug, "first", false).await;
    seed_task(&harness, member, &slug, "second", false).await;
    let third = seed_task(&harness, member, &slug, "third", false).await;

    let (outcome, view) = harness
        .service
        .move_element(member, &slug, third, 0)
        .await
        .expect("move");

    assert_eq!(outcome, MoveOutcome::Moved);
    let reordered: Vec<&str> = view.elements.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(reordered, vec!["third", "first", "second"]);
    assert_eq!(
        listed_names(&harness, member, &slug).await,
        vec!["third", "first", "second"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn out_of_range_move_is_a_silent_noop(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    let first = seed_task(&harness, member, &slug, "first", false).await;
    seed_task(&harness, member, &slug, "second", false).await;

    let (outcome, view) = harness
        .service
        .move_element(member, &slug, first, 9)
        .await
        .expect("stale target must not error");

    assert_eq!(outcome, MoveOutcome::OutOfRange);
    let unchanged: Vec<&str> = view.elements.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(unchanged, vec!["first", "second"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_closes_the_position_gap(harness: Harness) {
    let (group, slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    seed_task(&harness, member, &slug, "keep", false).await;
    let doomed = seed_task(&harness, member, &slug, "doomed", false).await;
    seed_task(&harness, member, &slug, "shifts down", false).await;

    let view = harness
        .service
        .delete_element(member, &slug, doomed)
        .await
        .expect("delete");

    let positions: Vec<usize> = view.elements.iter().map(|row| row.position).collect();
    assert_eq!(positions, vec![0, 1]);
    let names: Vec<&str> = view.elements.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["keep", "shifts down"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_slug_is_reported(harness: Harness) {
    let (group, _slug) = seed_collaboration(&harness).await;
    let member = seed_member(&harness, group, MembershipStatus::Current).await;
    let missing = Slug::derive("never stored").expect("valid slug");

    let result = harness.service.list(member, &missing).await;
    assert!(matches!(result, Err(ElementServiceError::UnknownSlug(_))));
}
