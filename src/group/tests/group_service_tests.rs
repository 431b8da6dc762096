//! Service tests for group creation and lifecycle.

use std::sync::Arc;

use crate::group::{
    adapters::memory::{InMemoryGroupRepository, InMemoryMembershipRepository},
    domain::{Group, GroupId, MembershipStatus, PersistedGroupData, Slug, UserId, UserRef},
    ports::MembershipRepository,
    services::{CreateGroupRequest, GroupService, GroupServiceError},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService =
    GroupService<InMemoryGroupRepository, InMemoryMembershipRepository, DefaultClock>;

struct Harness {
    service: TestService,
    memberships: Arc<InMemoryMembershipRepository>,
}

#[fixture]
fn harness() -> Harness {
    let groups = Arc::new(InMemoryGroupRepository::new());
    let memberships = Arc::new(InMemoryMembershipRepository::new());
    let service = GroupService::new(groups, Arc::clone(&memberships), Arc::new(DefaultClock));
    Harness {
        service,
        memberships,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_seeds_founding_admin(harness: Harness) {
    let founder = UserId::new();
    let group = harness
        .service
        .create(founder, CreateGroupRequest::new("Garden Group", "Planting"))
        .await
        .expect("creation should succeed");

    assert_eq!(group.slug().as_str(), "garden-group");
    let membership = harness
        .memberships
        .find_by_user_and_group(founder, group.id())
        .await
        .expect("lookup should succeed")
        .expect("founder membership must exist");
    assert_eq!(membership.status(), MembershipStatus::Admin);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_deduplicates_colliding_slugs(harness: Harness) {
    let first = harness
        .service
        .create(UserId::new(), CreateGroupRequest::new("Book Club", ""))
        .await
        .expect("first creation should succeed");
    let second = harness
        .service
        .create(UserId::new(), CreateGroupRequest::new("Book Club", ""))
        .await
        .expect("second creation should succeed");

    assert_ne!(first.slug(), second.slug());
    assert!(second.slug().as_str().starts_with("book-club-"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_requires_admin(harness: Harness) {
    let group = harness
        .service
        .create(UserId::new(), CreateGroupRequest::new("Chess Circle", ""))
        .await
        .expect("creation should succeed");

    let outsider = UserId::new();
    let result = harness
        .service
        .update(
            outsider,
            group.id(),
            CreateGroupRequest::new("Chess Society", ""),
        )
        .await;

    assert!(matches!(result, Err(GroupServiceError::Forbidden)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_name_is_rejected(harness: Harness) {
    let result = harness
        .service
        .create(UserId::new(), CreateGroupRequest::new("   ", "whitespace"))
        .await;
    assert!(matches!(result, Err(GroupServiceError::Domain(_))));
}

#[rstest]
fn persisted_groups_rebuild_with_their_slug() {
    let stamp = chrono::Utc::now();
    let slug = Slug::derive("Allotment Society").expect("valid slug");

    let group = Group::from_persisted(PersistedGroupData {
        id: GroupId::new(),
        name: "Allotment Society".into(),
        description: "Veg and chat".into(),
        slug: slug.clone(),
        created_by: UserRef::detached(),
        created_at: stamp,
        updated_at: stamp,
    });

    assert_eq!(group.name(), "Allotment Society");
    assert_eq!(group.slug(), &slug);
    assert!(group.created_by().is_detached());
}
