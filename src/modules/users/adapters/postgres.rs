// PostgreSQL implementation of the UserStore port. Filter and patch queries
// are assembled dynamically with QueryBuilder since every field is optional.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::modules::users::core::model::{User, UserFilter, UserPage, UserPatch};
use crate::modules::users::ports::{NewUser, UserStore, UserStoreError};

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> UserStoreError {
    UserStoreError::Backend(err.to_string())
}

fn push_ilike(qb: &mut QueryBuilder<'_, Postgres>, column: &str, needle: &str) {
    qb.push(" AND ")
        .push(column)
        .push(" ILIKE ")
        .push_bind(format!("%{needle}%"));
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (passport, name, surname, patronymic, address) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&user.passport)
        .bind(&user.name)
        .bind(&user.surname)
        .bind(&user.patronymic)
        .bind(&user.address)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;
        Ok(User {
            id,
            passport: user.passport,
            name: user.name,
            surname: user.surname,
            patronymic: user.patronymic,
            address: user.address,
        })
    }

    async fn find(
        &self,
        filter: &UserFilter,
        limit: u64,
        offset: u64,
    ) -> Result<UserPage, UserStoreError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT count(*) OVER () AS total, id, passport, name, surname, patronymic, address \
             FROM users WHERE TRUE",
        );
        if let Some(id) = filter.id {
            qb.push(" AND id = ").push_bind(id);
        }
        if let Some(passport) = &filter.passport {
            push_ilike(&mut qb, "passport", passport);
        }
        if let Some(name) = &filter.name {
            push_ilike(&mut qb, "name", name);
        }
        if let Some(surname) = &filter.surname {
            push_ilike(&mut qb, "surname", surname);
        }
        if let Some(patronymic) = &filter.patronymic {
            push_ilike(&mut qb, "patronymic", patronymic);
        }
        if let Some(address) = &filter.address {
            push_ilike(&mut qb, "address", address);
        }
        qb.push(" ORDER BY id");
        if limit > 0 {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }
        if offset > 0 {
            qb.push(" OFFSET ").push_bind(offset as i64);
        }

        let rows = qb.build().fetch_all(&self.pool).await.map_err(backend)?;
        let total = rows
            .first()
            .map(|r| r.try_get::<i64, _>("total"))
            .transpose()
            .map_err(backend)?
            .unwrap_or(0);
        let users = rows
            .iter()
            .map(|row| {
                Ok(User {
                    id: row.try_get("id")?,
                    passport: row.try_get("passport")?,
                    name: row.try_get("name")?,
                    surname: row.try_get("surname")?,
                    patronymic: row.try_get("patronymic")?,
                    address: row.try_get("address")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(backend)?;
        Ok(UserPage { users, total })
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<(), UserStoreError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE users SET ");
        let mut fields = qb.separated(", ");
        if let Some(passport) = &patch.passport {
            fields.push("passport = ").push_bind_unseparated(passport);
        }
        if let Some(name) = &patch.name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(surname) = &patch.surname {
            fields.push("surname = ").push_bind_unseparated(surname);
        }
        if let Some(patronymic) = &patch.patronymic {
            fields.push("patronymic = ").push_bind_unseparated(patronymic);
        }
        if let Some(address) = &patch.address {
            fields.push("address = ").push_bind_unseparated(address);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.build().execute(&self.pool).await.map_err(backend)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), UserStoreError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}
