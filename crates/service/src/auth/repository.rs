use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthUser, NewAccount};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Lookup by email, returning the user together with the stored hash.
    async fn find_by_email(&self, email: &str) -> Result<Option<(AuthUser, String)>, AuthError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn create_account(&self, new: NewAccount) -> Result<AuthUser, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        accounts: Mutex<HashMap<String, (AuthUser, String)>>, // key: email
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_by_email(
            &self,
            email: &str,
        ) -> Result<Option<(AuthUser, String)>, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.get(email).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.values().find(|(u, _)| u.id == id).map(|(u, _)| u.clone()))
        }

        async fn create_account(&self, new: NewAccount) -> Result<AuthUser, AuthError> {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(&new.email) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                first_name: new.first_name,
                last_name: new.last_name,
                email: new.email.clone(),
                role: new.role,
                city: new.city,
                phone: new.phone,
                address: new.address,
                photo: new.photo,
            };
            accounts.insert(new.email, (user.clone(), new.password_hash));
            Ok(user)
        }
    }
}
