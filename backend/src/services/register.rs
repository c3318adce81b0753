use tracing::info;

use super::{present, ServiceError, ServiceResult, EMAIL_REQUIRED};
use crate::db::FullRepository;
use crate::models::{NewUser, User};

/// Registration request as received.
#[derive(Debug, Clone, Default)]
pub struct RegisterUser {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Create a user.
///
/// Only the presence of `email` is checked; uniqueness is left to the store
/// and a violation comes back as an ordinary repository error.
pub async fn register_user(
    repository: &dyn FullRepository,
    input: RegisterUser,
) -> ServiceResult<User> {
    let email = present(input.email).ok_or(ServiceError::InvalidInput(EMAIL_REQUIRED))?;
    let new_user = NewUser {
        email,
        name: present(input.name),
    };

    let user = repository.create_user(&new_user).await?;
    info!(user_id = %user.id, "registered user");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LocalRepository;

    #[tokio::test]
    async fn test_missing_email_creates_nothing() {
        let repo = LocalRepository::new();
        for email in [None, Some(String::new())] {
            let err = register_user(
                &repo,
                RegisterUser {
                    email,
                    name: Some("Ann".into()),
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(EMAIL_REQUIRED)));
        }
        assert_eq!(repo.user_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_name_is_stored_as_null() {
        let repo = LocalRepository::new();
        let user = register_user(
            &repo,
            RegisterUser {
                email: Some("a@x.com".into()),
                name: Some(String::new()),
            },
        )
        .await
        .unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.name, None);
    }

    #[tokio::test]
    async fn test_duplicate_email_surfaces_store_message() {
        let repo = LocalRepository::new();
        let input = RegisterUser {
            email: Some("a@x.com".into()),
            name: None,
        };
        register_user(&repo, input.clone()).await.unwrap();
        let err = register_user(&repo, input).await.unwrap_err();
        assert!(err.is_dependency_failure());
        assert!(err.message().contains("users_email_key"));
        assert_eq!(repo.user_count(), 1);
    }
}
