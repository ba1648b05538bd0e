//! Account and bearer token service.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::{TokenRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Number of random bytes in a raw token (40 hex characters).
const TOKEN_BYTES: usize = 20;

/// Unique constraint on `users.username`.
const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Caller identity resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    /// The token that authenticated this request.
    pub token_id: i64,
}

/// Service for registration, login and bearer token handling.
///
/// Raw tokens are handed to the client once and are stored as HMAC-SHA256
/// hashes keyed by `signing_secret`. An attacker with read-only access to the
/// database cannot verify or forge tokens without the server-side secret.
pub struct AuthService<U: UserRepository, T: TokenRepository> {
    users: Arc<U>,
    tokens: Arc<T>,
    signing_secret: String,
}

impl<U: UserRepository, T: TokenRepository> AuthService<U, T> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` - credential store
    /// - `tokens` - token store
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    pub fn new(users: Arc<U>, tokens: Arc<T>, signing_secret: String) -> Self {
        Self {
            users,
            tokens,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .map_err(|e| AppError::internal("HMAC init failed", json!({ "reason": e.to_string() })))?;
        mac.update(token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn generate_token() -> Result<String, AppError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        getrandom::fill(&mut bytes).map_err(|e| {
            AppError::internal("Token generation failed", json!({ "reason": e.to_string() }))
        })?;
        Ok(hex::encode(bytes))
    }

    /// Issues a fresh token for a user and returns the raw value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on random source or database errors.
    pub async fn issue_token(&self, user_id: i64) -> Result<String, AppError> {
        let raw = Self::generate_token()?;
        let token_hash = self.hash_token(&raw)?;

        self.tokens.create_token(user_id, &token_hash).await?;
        metrics::counter!("tokens_issued_total").increment(1);

        Ok(raw)
    }

    /// Creates an account and issues its first token.
    ///
    /// Input shape (lengths, allowed characters) is validated at the request
    /// boundary; this method enforces uniqueness. The account and its token
    /// are stored atomically, so a failed registration can be retried.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the username is taken, including a
    /// concurrent registration that wins the unique index.
    /// Returns [`AppError::Internal`] on hashing or database errors.
    #[instrument(name = "AuthService: register", skip_all, fields(username = %username))]
    pub async fn register(&self, username: &str, password: &str) -> Result<(User, String), AppError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(username_taken(username));
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::internal("Hashing task failed", json!({ "reason": e.to_string() })))?
            .map_err(|e| AppError::internal("Password hashing failed", json!({ "reason": e.to_string() })))?;

        let token = Self::generate_token()?;
        let token_hash = self.hash_token(&token)?;

        let new_user = NewUser {
            username: username.to_string(),
            password_hash,
        };

        let user = match self.users.create_with_token(new_user, &token_hash).await {
            Ok(user) => user,
            Err(AppError::Conflict { details, .. })
                if details["constraint"] == USERNAME_CONSTRAINT =>
            {
                return Err(username_taken(username));
            }
            Err(AppError::Conflict { details, .. }) => {
                return Err(AppError::internal("Token collision on registration", details));
            }
            Err(e) => return Err(e),
        };

        metrics::counter!("tokens_issued_total").increment(1);
        metrics::counter!("users_registered_total").increment(1);
        tracing::info!(user_id = user.id, "User registered");

        Ok((user, token))
    }

    /// Checks a username/password pair.
    ///
    /// Returns `Ok(None)` for an unknown user or a wrong password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors or a malformed stored hash.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            return Ok(None);
        };

        let password = password.to_string();
        let stored = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| AppError::internal("Hashing task failed", json!({ "reason": e.to_string() })))?
            .map_err(|e| {
                AppError::internal(
                    "Password verification failed",
                    json!({ "reason": e.to_string(), "user_id": user.id }),
                )
            })?;

        Ok(matches.then_some(user))
    }

    /// Logs a user in and issues a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] on an unknown user or a wrong password.
    /// Returns [`AppError::Internal`] on database errors.
    #[instrument(name = "AuthService: login", skip_all, fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let Some(user) = self.verify_credentials(username, password).await? else {
            tracing::debug!("Login rejected");
            return Err(AppError::unauthorized("Invalid credentials", json!({})));
        };

        self.issue_token(user.id).await
    }

    /// Exchanges credentials for a token without the login side effects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on bad credentials.
    /// Returns [`AppError::Internal`] on database errors.
    #[instrument(name = "AuthService: obtain_token", skip_all, fields(username = %username))]
    pub async fn obtain_token(&self, username: &str, password: &str) -> Result<String, AppError> {
        let Some(user) = self.verify_credentials(username, password).await? else {
            return Err(AppError::bad_request(
                "Unable to log in with provided credentials.",
                json!({}),
            ));
        };

        self.issue_token(user.id).await
    }

    /// Resolves a raw bearer token to its user.
    ///
    /// On success, updates the `last_used_at` timestamp for monitoring and
    /// audit purposes. Failing to touch the timestamp does not fail the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if:
    /// - Token hash does not match any stored credentials
    /// - Token has been revoked
    /// - The owning user no longer exists
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        let token_hash = self.hash_token(token)?;

        let Some(api_token) = self.tokens.find_active(&token_hash).await? else {
            return Err(invalid_token());
        };

        let Some(user) = self.users.find_by_id(api_token.user_id).await? else {
            return Err(invalid_token());
        };

        if let Err(e) = self.tokens.update_last_used(api_token.id).await {
            tracing::warn!(error = %e, token_id = api_token.id, "Failed to update last_used_at");
        }

        Ok(AuthUser {
            user,
            token_id: api_token.id,
        })
    }

    /// Revokes the token that authenticated the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn logout(&self, auth: &AuthUser) -> Result<(), AppError> {
        let revoked = self.tokens.revoke_token(auth.token_id).await?;
        tracing::info!(user_id = auth.user.id, token_id = auth.token_id, revoked, "Logged out");
        Ok(())
    }

    /// Revokes every active token of a user. Returns how many were revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn revoke_all(&self, user_id: i64) -> Result<u64, AppError> {
        self.tokens.revoke_all_for_user(user_id).await
    }
}

fn username_taken(username: &str) -> AppError {
    AppError::bad_request("Username already exists", json!({ "username": username }))
}

fn invalid_token() -> AppError {
    AppError::unauthorized(
        "Unauthorized",
        json!({ "reason": "Invalid or revoked token" }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{ApiToken, MockTokenRepository, MockUserRepository};
    use chrono::Utc;

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    fn compute_expected_hash(token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(test_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn test_user(id: i64, username: &str, password: &str) -> User {
        User {
            id,
            username: username.to_string(),
            password_hash: hash_password(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn test_token(id: i64, user_id: i64, token_hash: &str) -> ApiToken {
        ApiToken {
            id,
            user_id,
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        }
    }

    fn service(
        users: MockUserRepository,
        tokens: MockTokenRepository,
    ) -> AuthService<MockUserRepository, MockTokenRepository> {
        AuthService::new(Arc::new(users), Arc::new(tokens), test_secret())
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut users = MockUserRepository::new();
        let mut tokens = MockTokenRepository::new();

        let token = "valid-token";
        let expected_hash = compute_expected_hash(token);

        tokens
            .expect_find_active()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(|hash| Ok(Some(test_token(5, 1, hash))));
        tokens
            .expect_update_last_used()
            .withf(|id| *id == 5)
            .times(1)
            .returning(|_| Ok(()));
        users
            .expect_find_by_id()
            .withf(|id| *id == 1)
            .returning(|id| Ok(Some(test_user(id, "alice", "pw"))));

        let auth = service(users, tokens).authenticate(token).await.unwrap();

        assert_eq!(auth.user.username, "alice");
        assert_eq!(auth.token_id, 5);
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        let users = MockUserRepository::new();
        let mut tokens = MockTokenRepository::new();

        tokens.expect_find_active().times(1).returning(|_| Ok(None));
        tokens.expect_update_last_used().times(0);

        let result = service(users, tokens).authenticate("invalid-token").await;

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_tolerates_last_used_failure() {
        let mut users = MockUserRepository::new();
        let mut tokens = MockTokenRepository::new();

        tokens
            .expect_find_active()
            .returning(|hash| Ok(Some(test_token(1, 1, hash))));
        tokens
            .expect_update_last_used()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id, "alice", "pw"))));

        let result = service(users, tokens).authenticate("token").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_register_creates_user_and_token() {
        let mut users = MockUserRepository::new();
        let mut tokens = MockTokenRepository::new();

        users
            .expect_find_by_username()
            .withf(|name| name == "alice")
            .returning(|_| Ok(None));
        users
            .expect_create_with_token()
            .withf(|new_user, hash| {
                new_user.username == "alice"
                    && new_user.password_hash.starts_with("$argon2id$")
                    && hash.len() == 64
            })
            .times(1)
            .returning(|new_user, _| {
                Ok(User {
                    id: 7,
                    username: new_user.username,
                    password_hash: new_user.password_hash,
                    created_at: Utc::now(),
                })
            });
        tokens.expect_create_token().times(0);

        let (user, token) = service(users, tokens)
            .register("alice", "s3cret")
            .await
            .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_register_stores_hash_of_returned_token() {
        let mut users = MockUserRepository::new();
        let stored_hash = Arc::new(std::sync::Mutex::new(String::new()));
        let captured = stored_hash.clone();

        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_create_with_token()
            .returning(move |new_user, hash| {
                *captured.lock().unwrap() = hash.to_string();
                Ok(User {
                    id: 1,
                    username: new_user.username,
                    password_hash: new_user.password_hash,
                    created_at: Utc::now(),
                })
            });

        let (_, token) = service(users, MockTokenRepository::new())
            .register("alice", "pw")
            .await
            .unwrap();

        assert_eq!(*stored_hash.lock().unwrap(), compute_expected_hash(&token));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut users = MockUserRepository::new();
        let tokens = MockTokenRepository::new();

        users
            .expect_find_by_username()
            .returning(|name| Ok(Some(test_user(1, name, "pw"))));
        users.expect_create_with_token().times(0);

        let result = service(users, tokens).register("alice", "pw").await;

        match result {
            Err(AppError::Validation { message, .. }) => {
                assert_eq!(message, "Username already exists")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_unique_violation_maps_to_validation() {
        let mut users = MockUserRepository::new();
        let tokens = MockTokenRepository::new();

        users.expect_find_by_username().returning(|_| Ok(None));
        users.expect_create_with_token().returning(|_, _| {
            Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "users_username_key" }),
            ))
        });

        let result = service(users, tokens).register("alice", "pw").await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_token_collision_is_internal() {
        let mut users = MockUserRepository::new();

        users.expect_find_by_username().returning(|_| Ok(None));
        users.expect_create_with_token().returning(|_, _| {
            Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "api_tokens_token_hash_key" }),
            ))
        });

        let result = service(users, MockTokenRepository::new())
            .register("alice", "pw")
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_login_success_issues_distinct_tokens() {
        let mut users = MockUserRepository::new();
        let mut tokens = MockTokenRepository::new();

        let stored = test_user(3, "bob", "correct");
        users
            .expect_find_by_username()
            .returning(move |_| Ok(Some(stored.clone())));
        tokens
            .expect_create_token()
            .times(2)
            .returning(|user_id, hash| Ok(test_token(1, user_id, hash)));

        let svc = service(users, tokens);
        let first = svc.login("bob", "correct").await.unwrap();
        let second = svc.login("bob", "correct").await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut users = MockUserRepository::new();
        let mut tokens = MockTokenRepository::new();

        let stored = test_user(3, "bob", "correct");
        users
            .expect_find_by_username()
            .returning(move |_| Ok(Some(stored.clone())));
        tokens.expect_create_token().times(0);

        let result = service(users, tokens).login("bob", "wrong").await;

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let mut users = MockUserRepository::new();
        let tokens = MockTokenRepository::new();

        users.expect_find_by_username().returning(|_| Ok(None));

        let result = service(users, tokens).login("ghost", "pw").await;

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_obtain_token_bad_credentials_is_validation() {
        let mut users = MockUserRepository::new();
        let tokens = MockTokenRepository::new();

        users.expect_find_by_username().returning(|_| Ok(None));

        let result = service(users, tokens).obtain_token("ghost", "pw").await;

        match result {
            Err(AppError::Validation { message, .. }) => {
                assert_eq!(message, "Unable to log in with provided credentials.")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_logout_revokes_presented_token() {
        let users = MockUserRepository::new();
        let mut tokens = MockTokenRepository::new();

        tokens
            .expect_revoke_token()
            .withf(|id| *id == 42)
            .times(1)
            .returning(|_| Ok(true));

        let auth = AuthUser {
            user: User {
                id: 1,
                username: "alice".to_string(),
                password_hash: String::new(),
                created_at: Utc::now(),
            },
            token_id: 42,
        };

        assert!(service(users, tokens).logout(&auth).await.is_ok());
    }

    #[test]
    fn test_hash_token_consistency() {
        let svc = service(MockUserRepository::new(), MockTokenRepository::new());

        let hash1 = svc.hash_token("test-token").unwrap();
        let hash2 = svc.hash_token("test-token").unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_hash_token_secret_matters() {
        let svc1 = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockTokenRepository::new()),
            "secret-a".to_string(),
        );
        let svc2 = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockTokenRepository::new()),
            "secret-b".to_string(),
        );

        assert_ne!(
            svc1.hash_token("token").unwrap(),
            svc2.hash_token("token").unwrap()
        );
    }
}
