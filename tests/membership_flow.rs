//! Membership lifecycle over the in-memory adapters.
//!
//! Follows a user from join request through approval to departure,
//! checking element access at each step.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use collabl::collaboration::{
    adapters::memory::{InMemoryCollaborationRepository, InMemoryElementStore},
    ports::{AttachmentError, AttachmentStore, AttachmentUpload},
    services::{CollaborationRequest, CollaborationService, ElementService, ElementServiceError},
};
use collabl::group::{
    adapters::memory::{InMemoryGroupRepository, InMemoryMembershipRepository},
    domain::{GroupId, Membership, Slug, UserId},
    services::{
        CreateGroupRequest, GroupService, JoinOutcome, LeaveOutcome, MembershipService,
        PermissionGate,
    },
};

#[derive(Debug, Default)]
struct NullAttachmentStore;

#[async_trait]
impl AttachmentStore for NullAttachmentStore {
    async fn save(&self, upload: AttachmentUpload) -> Result<String, AttachmentError> {
        Ok(upload.file_name)
    }

    async fn remove(&self, _path: &str) -> Result<(), AttachmentError> {
        Ok(())
    }
}

type Gate = PermissionGate<InMemoryMembershipRepository>;

struct World {
    groups: GroupService<InMemoryGroupRepository, InMemoryMembershipRepository, DefaultClock>,
    memberships:
        MembershipService<InMemoryGroupRepository, InMemoryMembershipRepository, DefaultClock>,
    collaborations: CollaborationService<
        InMemoryCollaborationRepository,
        InMemoryElementStore,
        Gate,
        DefaultClock,
    >,
    elements: ElementService<
        InMemoryCollaborationRepository,
        InMemoryElementStore,
        Gate,
        NullAttachmentStore,
        DefaultClock,
    >,
}

#[fixture]
fn world() -> World {
    let group_repo = Arc::new(InMemoryGroupRepository::new());
    let membership_repo = Arc::new(InMemoryMembershipRepository::new());
    let collaboration_repo = Arc::new(InMemoryCollaborationRepository::new());
    let element_store = Arc::new(InMemoryElementStore::new());
    let gate = Arc::new(PermissionGate::new(Arc::clone(&membership_repo)));
    let clock = Arc::new(DefaultClock);

    World {
        groups: GroupService::new(
            Arc::clone(&group_repo),
            Arc::clone(&membership_repo),
            Arc::clone(&clock),
        ),
        memberships: MembershipService::new(
            group_repo,
            Arc::clone(&membership_repo),
            Arc::clone(&clock),
        ),
        collaborations: CollaborationService::new(
            Arc::clone(&collaboration_repo),
            Arc::clone(&element_store),
            Arc::clone(&gate),
            Arc::clone(&clock),
        ),
        elements: ElementService::new(
            collaboration_repo,
            element_store,
            gate,
            Arc::new(NullAttachmentStore),
            clock,
        ),
    }
}

async fn seed_collaboration(world: &World, founder: UserId) -> (GroupId, Slug) {
    let group = world
        .groups
        .create(founder, CreateGroupRequest::new("Rowing Club", ""))
        .await
        .expect("create group")
        .id();
    let slug = world
        .collaborations
        .create(founder, group, CollaborationRequest::new("Regatta", ""))
        .await
        .expect("create collaboration")
        .slug()
        .clone();
    (group, slug)
}

fn pending(outcome: JoinOutcome) -> Membership {
    match outcome {
        JoinOutcome::Requested(membership) => membership,
        JoinOutcome::AlreadyRequested => panic!("expected a fresh join request"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approval_unlocks_element_access(world: World) {
    let founder = UserId::new();
    let joiner = UserId::new();
    let (group, slug) = seed_collaboration(&world, founder).await;
    world
        .elements
        .list(founder, &slug)
        .await
        .expect("founding admin has access");

    let outcome = world
        .memberships
        .request_join(joiner, group)
        .await
        .expect("request join");
    let membership = pending(outcome);

    // A pending request grants nothing.
    let denied = world.elements.list(joiner, &slug).await;
    assert!(matches!(denied, Err(ElementServiceError::Forbidden)));

    world
        .memberships
        .approve(founder, membership.id())
        .await
        .expect("approve");
    world
        .elements
        .list(joiner, &slug)
        .await
        .expect("approved member has access");

    // Leaving revokes it again.
    let left = world
        .memberships
        .leave(joiner, group)
        .await
        .expect("leave");
    assert_eq!(left, LeaveOutcome::Left);
    let denied = world.elements.list(joiner, &slug).await;
    assert!(matches!(denied, Err(ElementServiceError::Forbidden)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn the_sole_admin_cannot_leave(world: World) {
    let founder = UserId::new();
    let (group, _slug) = seed_collaboration(&world, founder).await;

    let outcome = world.memberships.leave(founder, group).await.expect("leave");

    assert_eq!(outcome, LeaveOutcome::LastAdmin);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_join_requests_are_collapsed(world: World) {
    let founder = UserId::new();
    let joiner = UserId::new();
    let (group, _slug) = seed_collaboration(&world, founder).await;

    let first = world
        .memberships
        .request_join(joiner, group)
        .await
        .expect("request join");
    let second = world
        .memberships
        .request_join(joiner, group)
        .await
        .expect("repeat request");

    assert!(matches!(first, JoinOutcome::Requested(_)));
    assert_eq!(second, JoinOutcome::AlreadyRequested);
}
