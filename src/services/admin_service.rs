use std::sync::Arc;

use uuid::Uuid;

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::models::role::{AppRole, CreatedUser, NewUser};

#[derive(Clone)]
pub struct AdminService {
    backend: Arc<dyn Backend>,
}

impl AdminService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn is_admin(&self, user_id: Uuid) -> Result<bool> {
        self.backend.check_role(user_id, AppRole::Admin).await
    }

    /// Creates a dashboard account. Only callers holding the admin role may
    /// do this.
    pub async fn create_user(&self, caller: Uuid, user: NewUser) -> Result<CreatedUser> {
        if !self.is_admin(caller).await? {
            tracing::warn!(caller = %caller, "non-admin attempted to create a user");
            return Err(Error::Forbidden("Admin role required".to_string()));
        }
        let role = user.role;
        let created = self.backend.create_user(user).await?;
        tracing::info!(caller = %caller, user_id = %created.id, role = role.as_str(), "user created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use mockall::predicate::eq;

    fn new_user() -> NewUser {
        NewUser {
            email: "hr@example.com".to_string(),
            password: "correct-horse".to_string(),
            full_name: None,
            role: AppRole::User,
        }
    }

    #[tokio::test]
    async fn non_admin_cannot_create_users() {
        let caller = Uuid::new_v4();
        let mut backend = MockBackend::new();
        backend
            .expect_check_role()
            .with(eq(caller), eq(AppRole::Admin))
            .times(1)
            .returning(|_, _| Ok(false));
        backend.expect_create_user().never();

        let svc = AdminService::new(Arc::new(backend));
        assert!(matches!(
            svc.create_user(caller, new_user()).await,
            Err(Error::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn admin_creates_users() {
        let mut backend = MockBackend::new();
        backend.expect_check_role().returning(|_, _| Ok(true));
        backend.expect_create_user().times(1).returning(|u| {
            Ok(CreatedUser {
                id: Uuid::nil(),
                email: u.email,
            })
        });
        let svc = AdminService::new(Arc::new(backend));
        let created = svc.create_user(Uuid::new_v4(), new_user()).await.unwrap();
        assert_eq!(created.email, "hr@example.com");
    }
}
