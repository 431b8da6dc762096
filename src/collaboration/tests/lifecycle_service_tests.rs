//! Service tests for the collaboration lifecycle and group listing.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};

use crate::collaboration::{
    adapters::memory::{InMemoryCollaborationRepository, InMemoryElementStore},
    domain::{
        Collaboration, CollaborationId, CollaborationStatus, Element, ElementSequence,
        PersistedCollaborationData, StatusFilter, Task,
    },
    ports::{CollaborationRepository, ElementStore},
    services::{CollaborationRequest, CollaborationService, CollaborationServiceError},
};
use crate::group::{
    adapters::memory::InMemoryMembershipRepository,
    domain::{GroupId, Membership, MembershipStatus, Slug, UserId, UserRef},
    ports::MembershipRepository,
    services::PermissionGate,
};

type TestService = CollaborationService<
    InMemoryCollaborationRepository,
    InMemoryElementStore,
    PermissionGate<InMemoryMembershipRepository>,
    DefaultClock,
>;

struct Harness {
    service: TestService,
    collaborations: Arc<InMemoryCollaborationRepository>,
    elements: Arc<InMemoryElementStore>,
    memberships: Arc<InMemoryMembershipRepository>,
}

#[fixture]
fn harness() -> Harness {
    let collaborations = Arc::new(InMemoryCollaborationRepository::new());
    let elements = Arc::new(InMemoryElementStore::new());
    let memberships = Arc::new(InMemoryMembershipRepository::new());
    let gate = Arc::new(PermissionGate::new(Arc::clone(&memberships)));
    let service = CollaborationService::new(
        Arc::clone(&collaborations),
        Arc::clone(&elements),
        gate,
        Arc::new(DefaultClock),
    );
    Harness {
        service,
        collaborations,
        elements,
        memberships,
    }
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

async fn seed_tasks(
    harness: &Harness,
    collaboration: &Collaboration,
    total: usize,
    completed: usize,
) {
    let mut sequence = ElementSequence::new();
    for index in 0..total {
        let mut task = Task::new(format!("task {index}"), "", None, false).expect("valid task");
        if index < completed {
            task.complete(UserId::new(), &DefaultClock);
        }
        sequence.append(Element::new_task(task, &DefaultClock));
    }
    let (_, revision) = harness
        .elements
        .load_sequence(collaboration.id())
        .await
        .expect("load revision");
    harness
        .elements
        .store_sequence(collaboration.id(), &sequence, revision)
        .await
        .expect("store sequence");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_requires_admin_standing(harness: Harness) {
    let group = GroupId::new();
    let member = seed_member(&harness, group, MembershipStatus::Current).await;

    let result = harness
        .service
        .create(member, group, CollaborationRequest::new("Village Fete", ""))
        .await;

    assert!(matches!(result, Err(CollaborationServiceError::Forbidden)));
}

#[rstest]
fn persisted_collaborations_rebuild_including_soft_delete() {
    let stamp = chrono::Utc::now();
    let slug = Slug::derive("Winter Fair").expect("valid slug");

    let collaboration = Collaboration::from_persisted(PersistedCollaborationData {
        id: CollaborationId::new(),
        group: GroupId::new(),
        name: "Winter Fair".into(),
        description: "postponed".into(),
        slug: slug.clone(),
        image: Some("fair.jpg".into()),
        created_by: UserRef::detached(),
        created_at: stamp,
        updated_at: stamp,
        deleted_at: Some(stamp),
    });

    assert_eq!(collaboration.slug(), &slug);
    assert_eq!(collaboration.image(), Some("fair.jpg"));
    assert!(collaboration.created_by().is_detached());
    assert!(collaboration.is_deleted());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_derives_and_deduplicates_slugs(harness: Harness) {
    let group = GroupId::new();
    let admin = seed_member(&harness, group, MembershipStatus::Admin).await;

    let first = harness
        .service
        .create(admin, group, CollaborationRequest::new("Village Fete", ""))
        .await
        .expect("first creation");
    let second = harness
        .service
        .create(admin, group, CollaborationRequest::new("Village Fete", ""))
        .await
        .expect("second creation");

    assert_eq!(first.slug().as_str(), "village-fete");
    assert_ne!(first.slug(), second.slug());
    assert!(second.slug().as_str().starts_with("village-fete-"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn soft_delete_hides_the_collaboration(harness: Harness) {
    let group = GroupId::new();
    let admin = seed_member(&harness, group, MembershipStatus::Admin).await;
    let collaboration = harness
        .service
        .create(admin, group, CollaborationRequest::new("Quiet Project", ""))
        .await
        .expect("creation");

    harness
        .service
        .delete(admin, collaboration.slug())
        .await
        .expect("soft delete");

    assert!(
        harness
            .collaborations
            .find_by_slug(collaboration.slug())
            .await
            .expect("lookup")
            .is_none(),
        "a deleted collaboration must act as absent"
    );
    assert!(
        harness
            .collaborations
            .find_by_id(collaboration.id())
            .await
            .expect("lookup")
            .is_none()
    );
    let listed = harness
        .service
        .list_for_group(admin, group, StatusFilter::All)
        .await
        .expect("list");
    assert!(listed.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_renames_but_keeps_the_slug(harness: Harness) {
    let group = GroupId::new();
    let admin = seed_member(&harness, group, MembershipStatus::Admin).await;
    let created = harness
        .service
        .create(admin, group, CollaborationRequest::new("Old Name", ""))
        .await
        .expect("creation");

    let updated = harness
        .service
        .update(
            admin,
            created.slug(),
            CollaborationRequest::new("New Name", "fresh description"),
        )
        .await
        .expect("update");

    assert_eq!(updated.name(), "New Name");
    assert_eq!(updated.slug(), created.slug(), "slug is stable once allocated");
}

#[rstest]
#[case(StatusFilter::All, &["planning", "ongoing", "completed"])]
#[case(StatusFilter::Planning, &["planning"])]
#[case(StatusFilter::Ongoing, &["ongoing"])]
#[case(StatusFilter::Completed, &["completed"])]
#[tokio::test(flavor = "multi_thread")]
async fn listing_filters_on_derived_status(
    harness: Harness,
    #[case] filter: StatusFilter,
    #[case] expected: &'static [&'static str],
) {
    let group = GroupId::new();
    let admin = seed_member(&harness, group, MembershipStatus::Admin).await;
    let planning = harness
        .service
        .create(admin, group, CollaborationRequest::new("planning", ""))
        .await
        .expect("creation");
    let ongoing = harness
        .service
        .create(admin, group, CollaborationRequest::new("ongoing", ""))
        .await
        .expect("creation");
    let completed = harness
        .service
        .create(admin, group, CollaborationRequest::new("completed", ""))
        .await
        .expect("creation");
    seed_tasks(&harness, &planning, 0, 0).await;
    seed_tasks(&harness, &ongoing, 3, 1).await;
    seed_tasks(&harness, &completed, 2, 2).await;

    let mut listed: Vec<String> = harness
        .service
        .list_for_group(admin, group, filter)
        .await
        .expect("list")
        .into_iter()
        .map(|summary| summary.name)
        .collect();
    listed.sort();

    let mut expected: Vec<String> = expected.iter().map(|name| (*name).to_owned()).collect();
    expected.sort();
    assert_eq!(listed, expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn summaries_carry_task_progress(harness: Harness) {
    let group = GroupId::new();
    let admin = seed_member(&harness, group, MembershipStatus::Admin).await;
    let collaboration = harness
        .service
        .create(admin, group, CollaborationRequest::new("Harvest", ""))
        .await
        .expect("creation");
    seed_tasks(&harness, &collaboration, 4, 3).await;

    let listed = harness
        .service
        .list_for_group(admin, group, StatusFilter::All)
        .await
        .expect("list");

    let summary = listed.first().expect("one summary");
    assert_eq!(summary.status, CollaborationStatus::Ongoing);
    assert_eq!((summary.task_total, summary.task_completed), (4, 3));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_members_cannot_list(harness: Harness) {
    let group = GroupId::new();
    seed_member(&harness, group, MembershipStatus::Admin).await;

    let result = harness
        .service
        .list_for_group(UserId::new(), group, StatusFilter::All)
        .await;

    assert!(matches!(result, Err(CollaborationServiceError::Forbidden)));
}
