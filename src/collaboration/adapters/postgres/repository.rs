//! `PostgreSQL` repository implementations for collaboration and element
//! storage.
//!
//! `store_sequence` rewrites a collaboration's whole element set inside one
//! transaction, holding a `FOR UPDATE` lock on the collaboration row and
//! checking its `elements_revision` against the revision the caller loaded,
//! so a writer working from stale state is rejected rather than overwriting
//! a concurrent change.

use super::{
    models::{CollaborationRow, ElementRow, NewCollaborationRow, NewElementRow},
    schema::{collaborations, elements},
};
use crate::collaboration::{
    domain::{
        Collaboration, CollaborationId, Completion, Element, ElementBody, ElementId, ElementKind,
        ElementSequence, Milestone, PersistedCollaborationData, PersistedElementData, Task,
    },
    ports::{
        CollaborationRepository, CollaborationRepositoryError, CollaborationRepositoryResult,
        ElementStore, SequenceRevision,
    },
};
use crate::group::domain::{GroupId, Slug, UserId, UserRef};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by collaboration adapters.
pub type CollaborationPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed collaboration repository.
#[derive(Debug, Clone)]
pub struct PostgresCollaborationRepository {
    pool: CollaborationPgPool,
}

/// `PostgreSQL`-backed element store.
#[derive(Debug, Clone)]
pub struct PostgresElementStore {
    pool: CollaborationPgPool,
}

impl From<DieselError> for CollaborationRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

async fn run_blocking<F, T>(pool: &CollaborationPgPool, f: F) -> CollaborationRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> CollaborationRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool
            .get()
            .map_err(CollaborationRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(CollaborationRepositoryError::persistence)?
}

impl PostgresCollaborationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CollaborationPgPool) -> Self {
        Self { pool }
    }
}

impl PostgresElementStore {
    /// Creates a new element store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CollaborationPgPool) -> Self {
        Self { pool }
    }
}

fn corrupt_row(detail: impl Into<String>) -> CollaborationRepositoryError {
    CollaborationRepositoryError::persistence(std::io::Error::other(detail.into()))
}

fn to_collaboration_row(collaboration: &Collaboration, element_count: i32) -> NewCollaborationRow {
    NewCollaborationRow {
        id: collaboration.id().into_inner(),
        group_id: collaboration.group().into_inner(),
        name: collaboration.name().to_owned(),
        description: collaboration.description().to_owned(),
        slug: collaboration.slug().to_string(),
        image: collaboration.image().map(str::to_owned),
        created_by: collaboration.created_by().user_id().map(UserId::into_inner),
        number_of_elements: element_count,
        elements_revision: SequenceRevision::initial().value(),
        created_at: collaboration.created_at(),
        updated_at: collaboration.updated_at(),
        deleted_at: collaboration.deleted_at(),
    }
}

fn row_to_collaboration(row: CollaborationRow) -> CollaborationRepositoryResult<Collaboration> {
    let slug =
        Slug::from_persisted(row.slug).map_err(CollaborationRepositoryError::persistence)?;
    Ok(Collaboration::from_persisted(PersistedCollaborationData {
        id: CollaborationId::from_uuid(row.id),
        group: GroupId::from_uuid(row.group_id),
        name: row.name,
        description: row.description,
        slug,
        image: row.image,
        created_by: row.created_by.map_or_else(UserRef::detached, |id| {
            UserRef::to_user(UserId::from_uuid(id))
        }),
        created_at: row.created_at,
        updated_at: row.updated_at,
        deleted_at: row.deleted_at,
    }))
}

fn element_to_row(
    collaboration: CollaborationId,
    position: usize,
    element: &Element,
) -> CollaborationRepositoryResult<NewElementRow> {
    let mut row = NewElementRow {
        id: element.id().into_inner(),
        collaboration_id: collaboration.into_inner(),
        position: i32::try_from(position).map_err(CollaborationRepositoryError::persistence)?,
        kind: element.kind().as_str().to_owned(),
        name: element.name().to_owned(),
        description: String::new(),
        assigned_to: None,
        prompt_for_details: false,
        completed_at: None,
        completed_by: None,
        completion_notes: None,
        attachment: None,
        target_date: None,
        created_at: element.created_at(),
        updated_at: element.updated_at(),
    };
    match element.body() {
        ElementBody::Task(task) => {
            row.description = task.description().to_owned();
            row.assigned_to = task.assigned_to().map(UserId::into_inner);
            row.prompt_for_details = task.prompt_for_details();
            if let Some(completion) = task.completion() {
                row.completed_at = Some(completion.completed_at());
                row.completed_by = completion.completed_by().user_id().map(UserId::into_inner);
                row.completion_notes = completion.notes().map(str::to_owned);
                row.attachment = completion.attachment().map(str::to_owned);
            }
        }
        ElementBody::Milestone(milestone) => {
            row.target_date = Some(milestone.target_date());
        }
    }
    Ok(row)
}

fn row_to_element(row: ElementRow) -> CollaborationRepositoryResult<(usize, Element)> {
    let position =
        usize::try_from(row.position).map_err(CollaborationRepositoryError::persistence)?;
    let kind = ElementKind::try_from(row.kind.as_str())
        .map_err(CollaborationRepositoryError::persistence)?;
    let body = match kind {
        ElementKind::Task => {
            let completion = row.completed_at.map(|completed_at| {
                Completion::from_persisted(
                    completed_at,
                    row.completed_by.map_or_else(UserRef::detached, |id| {
                        UserRef::to_user(UserId::from_uuid(id))
                    }),
                    row.completion_notes,
                    row.attachment,
                )
            });
            ElementBody::Task(Task::from_persisted(
                row.name,
                row.description,
                row.assigned_to.map(UserId::from_uuid),
                row.prompt_for_details,
                completion,
            ))
        }
        ElementKind::Milestone => {
            let target_date = row
                .target_date
                .ok_or_else(|| corrupt_row(format!("milestone {} has no target date", row.id)))?;
            ElementBody::Milestone(Milestone::from_persisted(row.name, target_date))
        }
    };
    Ok((
        position,
        Element::from_persisted(PersistedElementData {
            id: ElementId::from_uuid(row.id),
            body,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }),
    ))
}

fn live() -> diesel::dsl::IsNull<collaborations::deleted_at> {
    collaborations::deleted_at.is_null()
}

#[async_trait]
impl CollaborationRepository for PostgresCollaborationRepository {
    async fn store(&self, collaboration: &Collaboration) -> CollaborationRepositoryResult<()> {
        let new_row = to_collaboration_row(collaboration, 0);
        let slug = collaboration.slug().clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(collaborations::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CollaborationRepositoryError::DuplicateSlug(slug.clone())
                    }
                    _ => CollaborationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, collaboration: &Collaboration) -> CollaborationRepositoryResult<()> {
        let row = to_collaboration_row(collaboration, 0);
        let id = collaboration.id();
        run_blocking(&self.pool, move |connection| {
            let updated =
                diesel::update(collaborations::table.filter(collaborations::id.eq(row.id)))
                    .set((
                        collaborations::name.eq(&row.name),
                        collaborations::description.eq(&row.description),
                        collaborations::slug.eq(&row.slug),
                        collaborations::image.eq(&row.image),
                        collaborations::updated_at.eq(row.updated_at),
                        collaborations::deleted_at.eq(row.deleted_at),
                    ))
                    .execute(connection)
                    .map_err(CollaborationRepositoryError::persistence)?;
            if updated == 0 {
                return Err(CollaborationRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: CollaborationId,
    ) -> CollaborationRepositoryResult<Option<Collaboration>> {
        run_blocking(&self.pool, move |connection| {
            let row = collaborations::table
                .filter(collaborations::id.eq(id.into_inner()))
                .filter(live())
                .select(CollaborationRow::as_select())
                .first::<CollaborationRow>(connection)
                .optional()
                .map_err(CollaborationRepositoryError::persistence)?;
            row.map(row_to_collaboration).transpose()
        })
        .await
    }

    async fn find_by_slug(
        &self,
        slug: &Slug,
    ) -> CollaborationRepositoryResult<Option<Collaboration>> {
        let lookup = slug.to_string();
        run_blocking(&self.pool, move |connection| {
            let row = collaborations::table
                .filter(collaborations::slug.eq(&lookup))
                .filter(live())
                .select(CollaborationRow::as_select())
                .first::<CollaborationRow>(connection)
                .optional()
                .map_err(CollaborationRepositoryError::persistence)?;
            row.map(row_to_collaboration).transpose()
        })
        .await
    }

    async fn find_by_group(
        &self,
        group: GroupId,
    ) -> CollaborationRepositoryResult<Vec<Collaboration>> {
        run_blocking(&self.pool, move |connection| {
            let rows = collaborations::table
                .filter(collaborations::group_id.eq(group.into_inner()))
                .filter(live())
                .order(collaborations::created_at.desc())
                .select(CollaborationRow::as_select())
                .load::<CollaborationRow>(connection)
                .map_err(CollaborationRepositoryError::persistence)?;
            rows.into_iter().map(row_to_collaboration).collect()
        })
        .await
    }
}

#[async_trait]
impl ElementStore for PostgresElementStore {
    async fn load_sequence(
        &self,
        collaboration: CollaborationId,
    ) -> CollaborationRepositoryResult<(ElementSequence, SequenceRevision)> {
        run_blocking(&self.pool, move |connection| {
            connection.transaction::<_, CollaborationRepositoryError, _>(|connection| {
                // The shared lock keeps a concurrent store from committing
                // between the revision read and the row read.
                let revision = collaborations::table
                    .filter(collaborations::id.eq(collaboration.into_inner()))
                    .for_share()
                    .select(collaborations::elements_revision)
                    .first::<i64>(connection)
                    .optional()?
                    .map_or_else(SequenceRevision::initial, SequenceRevision::from_value);
                let rows = elements::table
                    .filter(elements::collaboration_id.eq(collaboration.into_inner()))
                    .order(elements::position.asc())
                    .select(ElementRow::as_select())
                    .load::<ElementRow>(connection)?;
                let pairs = rows
                    .into_iter()
                    .map(row_to_element)
                    .collect::<CollaborationRepositoryResult<Vec<_>>>()?;
                let sequence = ElementSequence::from_persisted(pairs).map_err(|err| {
                    CollaborationRepositoryError::CorruptSequence(collaboration, err)
                })?;
                Ok((sequence, revision))
            })
        })
        .await
    }

    async fn store_sequence(
        &self,
        collaboration: CollaborationId,
        sequence: &ElementSequence,
        expected: SequenceRevision,
    ) -> CollaborationRepositoryResult<()> {
        let new_rows = sequence
            .iter()
            .enumerate()
            .map(|(position, element)| element_to_row(collaboration, position, element))
            .collect::<CollaborationRepositoryResult<Vec<_>>>()?;
        let count = i32::try_from(sequence.len())
            .map_err(CollaborationRepositoryError::persistence)?;
        run_blocking(&self.pool, move |connection| {
            connection.transaction::<_, CollaborationRepositoryError, _>(|connection| {
                let current = collaborations::table
                    .filter(collaborations::id.eq(collaboration.into_inner()))
                    .for_update()
                    .select(collaborations::elements_revision)
                    .first::<i64>(connection)
                    .optional()?;
                let Some(current) = current else {
                    return Err(CollaborationRepositoryError::NotFound(collaboration));
                };
                if SequenceRevision::from_value(current) != expected {
                    return Err(CollaborationRepositoryError::StaleSequence(collaboration));
                }
                diesel::delete(
                    elements::table
                        .filter(elements::collaboration_id.eq(collaboration.into_inner())),
                )
                .execute(connection)?;
                diesel::insert_into(elements::table)
                    .values(&new_rows)
                    .execute(connection)?;
                diesel::update(
                    collaborations::table
                        .filter(collaborations::id.eq(collaboration.into_inner())),
                )
                .set((
                    collaborations::number_of_elements.eq(count),
                    collaborations::elements_revision.eq(expected.next().value()),
                ))
                .execute(connection)?;
                Ok(())
            })
        })
        .await
    }
}
