//! `PostgreSQL` repository implementations for group and membership storage.

use super::{
    models::{GroupRow, MembershipRow, NewGroupRow, NewMembershipRow},
    schema::{groups, memberships},
};
use crate::group::{
    domain::{
        Group, GroupId, Membership, MembershipId, MembershipStatus, PersistedGroupData,
        PersistedMembershipData, Slug, UserId, UserRef,
    },
    ports::{
        GroupRepository, GroupRepositoryError, GroupRepositoryResult, MembershipRepository,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by group adapters.
pub type GroupPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed group repository.
#[derive(Debug, Clone)]
pub struct PostgresGroupRepository {
    pool: GroupPgPool,
}

/// `PostgreSQL`-backed membership repository.
#[derive(Debug, Clone)]
pub struct PostgresMembershipRepository {
    pool: GroupPgPool,
}

async fn run_blocking<F, T>(pool: &GroupPgPool, f: F) -> GroupRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> GroupRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(GroupRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(GroupRepositoryError::persistence)?
}

impl PostgresGroupRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: GroupPgPool) -> Self {
        Self { pool }
    }
}

impl PostgresMembershipRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: GroupPgPool) -> Self {
        Self { pool }
    }
}

fn to_group_row(group: &Group) -> NewGroupRow {
    NewGroupRow {
        id: group.id().into_inner(),
        name: group.name().to_owned(),
        description: group.description().to_owned(),
        slug: group.slug().to_string(),
        created_by: group.created_by().user_id().map(UserId::into_inner),
        created_at: group.created_at(),
        updated_at: group.updated_at(),
    }
}

fn row_to_group(row: GroupRow) -> GroupRepositoryResult<Group> {
    let slug = Slug::from_persisted(row.slug).map_err(GroupRepositoryError::persistence)?;
    Ok(Group::from_persisted(PersistedGroupData {
        id: GroupId::from_uuid(row.id),
        name: row.name,
        description: row.description,
        slug,
        created_by: row.created_by.map_or_else(UserRef::detached, |id| {
            UserRef::to_user(UserId::from_uuid(id))
        }),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn to_membership_row(membership: &Membership) -> NewMembershipRow {
    NewMembershipRow {
        id: membership.id().into_inner(),
        user_id: membership.user().into_inner(),
        group_id: membership.group().into_inner(),
        status: membership.status().as_str().to_owned(),
        subscribed: membership.subscribed(),
        created_at: membership.created_at(),
        updated_at: membership.updated_at(),
    }
}

fn row_to_membership(row: MembershipRow) -> GroupRepositoryResult<Membership> {
    let status = MembershipStatus::try_from(row.status.as_str())
        .map_err(GroupRepositoryError::persistence)?;
    Ok(Membership::from_persisted(PersistedMembershipData {
        id: MembershipId::from_uuid(row.id),
        user: UserId::from_uuid(row.user_id),
        group: GroupId::from_uuid(row.group_id),
        status,
        subscribed: row.subscribed,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn store(&self, group: &Group) -> GroupRepositoryResult<()> {
        let new_row = to_group_row(group);
        let slug = group.slug().clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(groups::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        GroupRepositoryError::DuplicateSlug(slug.clone())
                    }
                    _ => GroupRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, group: &Group) -> GroupRepositoryResult<()> {
        let row = to_group_row(group);
        let id = group.id();
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(groups::table.filter(groups::id.eq(row.id)))
                .set((
                    groups::name.eq(&row.name),
                    groups::description.eq(&row.description),
                    groups::slug.eq(&row.slug),
                    groups::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(GroupRepositoryError::persistence)?;
            if updated == 0 {
                return Err(GroupRepositoryError::GroupNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: GroupId) -> GroupRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(groups::table.filter(groups::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(GroupRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(GroupRepositoryError::GroupNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: GroupId) -> GroupRepositoryResult<Option<Group>> {
        run_blocking(&self.pool, move |connection| {
            let row = groups::table
                .filter(groups::id.eq(id.into_inner()))
                .select(GroupRow::as_select())
                .first::<GroupRow>(connection)
                .optional()
                .map_err(GroupRepositoryError::persistence)?;
            row.map(row_to_group).transpose()
        })
        .await
    }

    async fn find_by_slug(&self, slug: &Slug) -> GroupRepositoryResult<Option<Group>> {
        let lookup = slug.to_string();
        run_blocking(&self.pool, move |connection| {
            let row = groups::table
                .filter(groups::slug.eq(&lookup))
                .select(GroupRow::as_select())
                .first::<GroupRow>(connection)
                .optional()
                .map_err(GroupRepositoryError::persistence)?;
            row.map(row_to_group).transpose()
        })
        .await
    }
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn store(&self, membership: &Membership) -> GroupRepositoryResult<()> {
        let new_row = to_membership_row(membership);
        let user = membership.user();
        let group = membership.group();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(memberships::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        GroupRepositoryError::DuplicateMembership { user, group }
                    }
                    _ => GroupRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, membership: &Membership) -> GroupRepositoryResult<()> {
        let row = to_membership_row(membership);
        let id = membership.id();
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(memberships::table.filter(memberships::id.eq(row.id)))
                .set((
                    memberships::status.eq(&row.status),
                    memberships::subscribed.eq(row.subscribed),
                    memberships::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(GroupRepositoryError::persistence)?;
            if updated == 0 {
                return Err(GroupRepositoryError::MembershipNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: MembershipId) -> GroupRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted =
                diesel::delete(memberships::table.filter(memberships::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(GroupRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(GroupRepositoryError::MembershipNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: MembershipId) -> GroupRepositoryResult<Option<Membership>> {
        run_blocking(&self.pool, move |connection| {
            let row = memberships::table
                .filter(memberships::id.eq(id.into_inner()))
                .select(MembershipRow::as_select())
                .first::<MembershipRow>(connection)
                .optional()
                .map_err(GroupRepositoryError::persistence)?;
            row.map(row_to_membership).transpose()
        })
        .await
    }

    async fn find_by_user_and_group(
        &self,
        user: UserId,
        group: GroupId,
    ) -> GroupRepositoryResult<Option<Membership>> {
        run_blocking(&self.pool, move |connection| {
            let row = memberships::table
                .filter(memberships::user_id.eq(user.into_inner()))
                .filter(memberships::group_id.eq(group.into_inner()))
                .select(MembershipRow::as_select())
                .first::<MembershipRow>(connection)
                .optional()
                .map_err(GroupRepositoryError::persistence)?;
            row.map(row_to_membership).transpose()
        })
        .await
    }

    async fn find_by_group(&self, group: GroupId) -> GroupRepositoryResult<Vec<Membership>> {
        run_blocking(&self.pool, move |connection| {
            let rows = memberships::table
                .filter(memberships::group_id.eq(group.into_inner()))
                .select(MembershipRow::as_select())
                .load::<MembershipRow>(connection)
                .map_err(GroupRepositoryError::persistence)?;
            rows.into_iter().map(row_to_membership).collect()
        })
        .await
    }

    async fn find_by_user(&self, user: UserId) -> GroupRepositoryResult<Vec<Membership>> {
        run_blocking(&self.pool, move |connection| {
            let rows = memberships::table
                .filter(memberships::user_id.eq(user.into_inner()))
                .select(MembershipRow::as_select())
                .load::<MembershipRow>(connection)
                .map_err(GroupRepositoryError::persistence)?;
            rows.into_iter().map(row_to_membership).collect()
        })
        .await
    }
}
