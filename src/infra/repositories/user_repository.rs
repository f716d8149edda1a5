//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{User, UserScope};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Users are never hard-deleted; deactivation flips `is_active` and the
/// scope predicates decide who stays visible.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID, active or not
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by (normalized) email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fetch every user whose id is in `ids`; unknown ids are skipped
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;

    /// List users matching `scope`, ordered by name
    async fn list(&self, scope: UserScope) -> AppResult<Vec<User>>;

    /// Create a new user
    async fn create(&self, user: User) -> AppResult<User>;

    /// Flip the active flag. Returns the updated user, `None` if unknown.
    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Translate a user scope into a SQL condition
fn scope_condition(scope: &UserScope) -> Condition {
    match scope {
        UserScope::Only(id) => Condition::all().add(user::Column::Id.eq(*id)),
        UserScope::ActiveWithRoles(roles) => Condition::all()
            .add(user::Column::IsActive.eq(true))
            .add(user::Column::Role.is_in(roles.iter().map(|r| r.as_str()))),
    }
}

fn into_users(models: Vec<user::Model>) -> AppResult<Vec<User>> {
    models.into_iter().map(User::try_from).collect()
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        into_users(models)
    }

    async fn list(&self, scope: UserScope) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(scope_condition(&scope))
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await?;

        into_users(models)
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let exists = UserEntity::find()
            .filter(user::Column::Email.eq(user.email.as_str()))
            .count(&self.db)
            .await?;
        if exists > 0 {
            return Err(AppError::conflict("User"));
        }

        let active_model: ActiveModel = user.into();
        let model = active_model.insert(&self.db).await?;
        User::try_from(model)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>> {
        let Some(model) = UserEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = model.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        User::try_from(model).map(Some)
    }
}
