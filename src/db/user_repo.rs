// src/db/user_repo.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::{map_fk_violation, DeletePolicy, PgRepository, UserStore},
    models::auth::{NewUser, User},
};

// Colunas de 'auth_user' + os ids dos inventários do usuário
const USER_SELECT: &str = r#"
    SELECT
        u.id, u.username, u.first_name, u.last_name, u.email, u.password_hash,
        u.last_login, u.is_superuser, u.is_staff, u.is_active, u.date_joined,
        ARRAY(SELECT i.id FROM inventory i WHERE i.user_id = u.id ORDER BY i.id) AS inventories
    FROM auth_user u
"#;

fn map_username_violation(e: sqlx::Error, username: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::DuplicateValue {
                field: "username",
                value: username.to_string(),
            };
        }
    }
    e.into()
}

#[async_trait]
impl UserStore for PgRepository {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!("{USER_SELECT} ORDER BY u.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE u.username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, AppError> {
        // Usuário novo ainda não tem inventários
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO auth_user (
                username, first_name, last_name, email, password_hash,
                last_login, is_superuser, is_staff, is_active, date_joined
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING
                id, username, first_name, last_name, email, password_hash,
                last_login, is_superuser, is_staff, is_active, date_joined,
                '{}'::BIGINT[] AS inventories
            "#,
        )
        .bind(&new.username)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.last_login)
        .bind(new.is_superuser)
        .bind(new.is_staff)
        .bind(new.is_active)
        .bind(new.date_joined)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_username_violation(e, &new.username))
    }

    async fn update_user(&self, user: &User) -> Result<Option<User>, AppError> {
        let mut tx = self.pool.begin().await?;

        // date_joined fica de fora: é imutável
        let result = sqlx::query(
            r#"
            UPDATE auth_user SET
                username = $2, first_name = $3, last_name = $4, email = $5,
                password_hash = $6, last_login = $7, is_superuser = $8,
                is_staff = $9, is_active = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.last_login)
        .bind(user.is_superuser)
        .bind(user.is_staff)
        .bind(user.is_active)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_username_violation(e, &user.username))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let updated = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE u.id = $1"))
            .bind(user.id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_user(&self, id: i64, policy: DeletePolicy) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM auth_user WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            return Err(AppError::NotFound { entity: "Usuário", id });
        }

        match policy {
            DeletePolicy::Restrict => {
                let owned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory WHERE user_id = $1")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
                if owned > 0 {
                    return Err(AppError::HasDependents {
                        entity: "Usuário",
                        id,
                        dependents: "inventários",
                    });
                }
            }
            DeletePolicy::Cascade => {
                sqlx::query(
                    r#"
                    DELETE FROM inventory_item
                    WHERE inventory_id IN (SELECT id FROM inventory WHERE user_id = $1)
                    "#,
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;

                sqlx::query("DELETE FROM inventory WHERE user_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        // Um inventário criado em paralelo ainda esbarra na FK RESTRICT
        sqlx::query("DELETE FROM auth_user WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_fk_violation(
                    e,
                    AppError::HasDependents { entity: "Usuário", id, dependents: "inventários" },
                )
            })?;

        tx.commit().await?;
        Ok(())
    }
}
