//! `PostgreSQL` repository implementation for lead storage.

use super::{
    models::{LeadRow, row_to_lead, to_new_row},
    schema::leads,
};
use crate::crm::domain::PersonId;
use crate::identity::{EmailAddress, PhoneKey, PhoneNumber};
use crate::lead::domain::{Lead, LeadId};
use crate::lead::ports::{LeadQuery, LeadRepository, LeadRepositoryError, LeadRepositoryResult};
use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Bool;

/// `PostgreSQL` connection pool type used by lead adapters.
pub type LeadPgPool = Pool<ConnectionManager<PgConnection>>;

/// Unique index guarding one lead per email.
const EMAIL_UNIQUE_INDEX: &str = "idx_leads_email_unique";

/// Unique index guarding one lead per phone key.
const PHONE_KEY_UNIQUE_INDEX: &str = "idx_leads_phone_key_unique";

/// `PostgreSQL`-backed lead repository.
#[derive(Debug, Clone)]
pub struct PostgresLeadRepository {
    pool: LeadPgPool,
}

impl PostgresLeadRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: LeadPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> LeadRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> LeadRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(LeadRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(LeadRepositoryError::persistence)?
    }
}

#[async_trait]
impl LeadRepository for PostgresLeadRepository {
    async fn insert(&self, lead: &Lead) -> LeadRepositoryResult<()> {
        let lead_id = lead.id();
        let new_row = to_new_row(lead);
        let email_key = lead
            .identity()
            .email()
            .map(|email| email.as_str().to_owned());
        let phone_key = lead
            .identity()
            .phone_key()
            .map(|key| key.as_str().to_owned());

        self.run_blocking(move |connection| {
            diesel::insert_into(leads::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_constraint(info.as_ref(), EMAIL_UNIQUE_INDEX) =>
                    {
                        LeadRepositoryError::DuplicateIdentity(
                            email_key.clone().unwrap_or_default(),
                        )
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_constraint(info.as_ref(), PHONE_KEY_UNIQUE_INDEX) =>
                    {
                        LeadRepositoryError::DuplicateIdentity(
                            phone_key.clone().unwrap_or_default(),
                        )
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        LeadRepositoryError::DuplicateLead(lead_id)
                    }
                    _ => LeadRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn mark_synced(&self, id: LeadId, person: &PersonId) -> LeadRepositoryResult<()> {
        let person_value = person.as_str().to_owned();
        self.run_blocking(move |connection| {
            let current: Option<Option<String>> = leads::table
                .filter(leads::id.eq(id.into_inner()))
                .select(leads::crm_person_id)
                .first(connection)
                .optional()
                .map_err(LeadRepositoryError::persistence)?;

            match current {
                None => return Err(LeadRepositoryError::NotFound(id)),
                Some(Some(existing)) if existing == person_value => return Ok(()),
                Some(Some(_)) => return Err(LeadRepositoryError::LinkConflict(id)),
                Some(None) => {}
            }

            // The guard re-checks the linkage so a concurrent writer in the
            // window since the read cannot be overwritten.
            let updated = diesel::update(
                leads::table.filter(
                    leads::id.eq(id.into_inner()).and(
                        leads::crm_person_id
                            .is_null()
                            .or(leads::crm_person_id.eq(person_value.clone())),
                    ),
                ),
            )
            .set((
                leads::crm_person_id.eq(person_value.clone()),
                leads::crm_synced.eq(true),
                leads::updated_at.eq(diesel::dsl::now),
            ))
            .execute(connection)
            .map_err(LeadRepositoryError::persistence)?;

            if updated == 0 {
                return Err(LeadRepositoryError::LinkConflict(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_unsynced(&self) -> LeadRepositoryResult<Vec<Lead>> {
        self.run_blocking(|connection| {
            let rows = leads::table
                .filter(leads::crm_synced.eq(false))
                .order(leads::created_at.asc())
                .select(LeadRow::as_select())
                .load::<LeadRow>(connection)
                .map_err(LeadRepositoryError::persistence)?;
            rows.into_iter()
                .map(|row| row_to_lead(row).map_err(LeadRepositoryError::persistence))
                .collect()
        })
        .await
    }

    async fn find_by_id(&self, id: LeadId) -> LeadRepositoryResult<Option<Lead>> {
        self.run_blocking(move |connection| {
            let row = leads::table
                .filter(leads::id.eq(id.into_inner()))
                .select(LeadRow::as_select())
                .first::<LeadRow>(connection)
                .optional()
                .map_err(LeadRepositoryError::persistence)?;
            row.map(|found| row_to_lead(found).map_err(LeadRepositoryError::persistence))
                .transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> LeadRepositoryResult<Option<LeadId>> {
        let value = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let id: Option<uuid::Uuid> = leads::table
                .filter(leads::email.eq(value))
                .select(leads::id)
                .first(connection)
                .optional()
                .map_err(LeadRepositoryError::persistence)?;
            Ok(id.map(LeadId::from_uuid))
        })
        .await
    }

    async fn find_by_phone(&self, key: &PhoneKey) -> LeadRepositoryResult<Option<LeadId>> {
        let value = key.as_str().to_owned();
        self.run_blocking(move |connection| {
            let id: Option<uuid::Uuid> = leads::table
                .filter(leads::phone_key.eq(value))
                .select(leads::id)
                .first(connection)
                .optional()
                .map_err(LeadRepositoryError::persistence)?;
            Ok(id.map(LeadId::from_uuid))
        })
        .await
    }

    async fn search(&self, query: &LeadQuery) -> LeadRepositoryResult<Vec<Lead>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let email = query.email.as_ref().map(|value| value.as_str().to_owned());
        let phone_key = query
            .phone
            .as_ref()
            .and_then(PhoneNumber::match_key)
            .map(|key| key.as_str().to_owned());
        let name = query.name.clone();

        self.run_blocking(move |connection| {
            // Seeded with FALSE so each present criterion widens the match.
            let mut selection = leads::table
                .select(LeadRow::as_select())
                .into_boxed()
                .filter(sql::<Bool>("FALSE"));
            if let Some(value) = email {
                selection = selection.or_filter(leads::email.eq(value));
            }
            if let Some(value) = phone_key {
                selection = selection.or_filter(leads::phone_key.eq(value));
            }
            if let Some(fragment) = name {
                let pattern = format!("%{fragment}%");
                selection = selection.or_filter(
                    leads::first_name
                        .ilike(pattern.clone())
                        .or(leads::last_name.ilike(pattern)),
                );
            }

            let rows = selection
                .order(leads::created_at.asc())
                .load::<LeadRow>(connection)
                .map_err(LeadRepositoryError::persistence)?;
            rows.into_iter()
                .map(|row| row_to_lead(row).map_err(LeadRepositoryError::persistence))
                .collect()
        })
        .await
    }
}

fn is_constraint(info: &dyn DatabaseErrorInformation, name: &str) -> bool {
    info.constraint_name().is_some_and(|found| found == name)
}
