//! Registration, login, logout and token authentication.

use std::sync::Arc;

use crate::application::dto::SessionDto;
use crate::application::ports::{Clock, CredentialPort};
use crate::domain::accounts::{
    Account, AccountRepository, LOGIN_USERNAME_MAX_LEN, NewUser, RegistrationForm, Session,
    validate_username,
};
use crate::domain::shared::{DomainError, Timestamp};
use crate::error::MarketplaceError;
use crate::observability::UseCaseTimer;

/// Use case for account sessions.
pub struct SessionUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    credentials: Arc<dyn CredentialPort>,
    clock: Arc<dyn Clock>,
    token_ttl_secs: i64,
}

impl<R> SessionUseCase<R>
where
    R: AccountRepository,
{
    /// Create a new SessionUseCase.
    pub fn new(
        repo: Arc<R>,
        credentials: Arc<dyn CredentialPort>,
        clock: Arc<dyn Clock>,
        token_ttl_secs: u64,
    ) -> Self {
        Self {
            repo,
            credentials,
            clock,
            token_ttl_secs: i64::try_from(token_ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Create an account and log it in.
    ///
    /// # Errors
    ///
    /// Invalid form fields, a taken username or a storage failure.
    pub async fn register(&self, form: RegistrationForm) -> Result<SessionDto, MarketplaceError> {
        let timer = UseCaseTimer::start("register");
        timer.finish(self.try_register(form).await)
    }

    async fn try_register(&self, form: RegistrationForm) -> Result<SessionDto, MarketplaceError> {
        form.validate()?;
        let password_hash = self.credentials.hash_password(&form.password1)?;
        let now = self.clock.now();

        let account = self
            .repo
            .create_account(NewUser {
                username: form.username,
                password_hash,
                first_name: form.first_name.unwrap_or_default(),
                last_name: form.last_name.unwrap_or_default(),
                is_staff: false,
                is_seller: form.is_seller,
                registered_at: now,
            })
            .await?;

        tracing::info!(
            user_id = %account.id(),
            username = %account.user.username,
            is_seller = account.is_seller(),
            "new user logged in"
        );

        self.open_session(&account, now).await
    }

    /// Check a username and password and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_CREDENTIALS` for an unknown user or a wrong password.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionDto, MarketplaceError> {
        let timer = UseCaseTimer::start("login");
        timer.finish(self.try_login(username, password).await)
    }

    async fn try_login(&self, username: &str, password: &str) -> Result<SessionDto, MarketplaceError> {
        validate_username(username, LOGIN_USERNAME_MAX_LEN)?;
        if password.is_empty() {
            return Err(DomainError::invalid("password", "this field is required").into());
        }

        let Some(credentials) = self.repo.find_credentials(username).await? else {
            tracing::warn!(username = %username, "login for unknown user");
            return Err(MarketplaceError::invalid_credentials());
        };
        if !self
            .credentials
            .verify_password(&credentials.password_hash, password)?
        {
            tracing::warn!(user_id = %credentials.user_id, "login with wrong password");
            return Err(MarketplaceError::invalid_credentials());
        }

        let account = self
            .repo
            .find_account(credentials.user_id)
            .await?
            .ok_or_else(MarketplaceError::invalid_credentials)?;

        tracing::info!(user_id = %account.id(), username = %account.user.username, "user logged in");
        self.open_session(&account, self.clock.now()).await
    }

    /// Revoke a bearer token.
    ///
    /// # Errors
    ///
    /// Storage failures only; an unknown token is not an error.
    pub async fn logout(&self, token: &str) -> Result<(), MarketplaceError> {
        let digest = self.credentials.digest_token(token);
        if self.repo.revoke_session(&digest).await? {
            tracing::info!("user logged out");
        }
        Ok(())
    }

    /// Resolve a bearer token to its account.
    ///
    /// # Errors
    ///
    /// Returns `UNAUTHENTICATED` for an unknown or expired token.
    pub async fn authenticate(&self, token: &str) -> Result<Account, MarketplaceError> {
        let digest = self.credentials.digest_token(token);
        let user = self
            .repo
            .find_session(&digest, self.clock.now())
            .await?
            .ok_or_else(MarketplaceError::unauthenticated)?;
        self.repo
            .find_account(user)
            .await?
            .ok_or_else(MarketplaceError::unauthenticated)
    }

    /// Create a staff account unless the username is already taken.
    ///
    /// Returns whether an account was created.
    ///
    /// # Errors
    ///
    /// Invalid username, hashing or storage failures.
    pub async fn ensure_staff_account(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, MarketplaceError> {
        validate_username(username, LOGIN_USERNAME_MAX_LEN)?;
        if self.repo.find_credentials(username).await?.is_some() {
            return Ok(false);
        }
        let password_hash = self.credentials.hash_password(password)?;
        let account = self
            .repo
            .create_account(NewUser {
                username: username.to_string(),
                password_hash,
                first_name: String::new(),
                last_name: String::new(),
                is_staff: true,
                is_seller: false,
                registered_at: self.clock.now(),
            })
            .await?;
        tracing::info!(user_id = %account.id(), username = %username, "staff account created");
        Ok(true)
    }

    async fn open_session(
        &self,
        account: &Account,
        now: Timestamp,
    ) -> Result<SessionDto, MarketplaceError> {
        let issued = self.credentials.issue_token();
        let session = Session {
            token_hash: issued.digest,
            user_id: account.id(),
            created_at: now,
            expires_at: now.plus_seconds(self.token_ttl_secs),
        };
        self.repo.create_session(&session).await?;
        Ok(SessionDto {
            token: issued.token,
            user_id: account.id(),
            username: account.user.username.clone(),
            expires_at: session.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::Fixture;
    use crate::error::ErrorCode;

    fn form(username: &str) -> RegistrationForm {
        RegistrationForm {
            username: username.to_string(),
            password1: "correct-horse".to_string(),
            password2: "correct-horse".to_string(),
            first_name: Some("Ada".to_string()),
            ..RegistrationForm::default()
        }
    }

    #[tokio::test]
    async fn register_logs_in_immediately() {
        let fx = Fixture::new().await;
        let session = fx.sessions.register(form("ada")).await.unwrap();

        let account = fx.sessions.authenticate(&session.token).await.unwrap();
        assert_eq!(account.user.username, "ada");
        assert_eq!(account.user.first_name, "Ada");
        assert!(!account.is_seller());
        assert!(account.profile.funds.is_zero());
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let fx = Fixture::new().await;
        fx.sessions.register(form("ada")).await.unwrap();
        let err = fx.sessions.register(form("ada")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyExists);
    }

    #[tokio::test]
    async fn login_checks_password() {
        let fx = Fixture::new().await;
        fx.sessions.register(form("ada")).await.unwrap();

        let ok = fx.sessions.login("ada", "correct-horse").await.unwrap();
        assert_eq!(ok.username, "ada");

        let wrong = fx.sessions.login("ada", "battery-staple").await.unwrap_err();
        assert_eq!(wrong.code(), ErrorCode::InvalidCredentials);

        let unknown = fx.sessions.login("bob", "correct-horse").await.unwrap_err();
        assert_eq!(unknown.code(), ErrorCode::InvalidCredentials);
    }

    #[tokio::test]
    async fn login_enforces_form_username_length() {
        let fx = Fixture::new().await;
        let long = "a".repeat(LOGIN_USERNAME_MAX_LEN + 1);
        let err = fx.sessions.login(&long, "whatever-pass").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidField);
    }

    #[tokio::test]
    async fn logout_revokes_token() {
        let fx = Fixture::new().await;
        let session = fx.sessions.register(form("ada")).await.unwrap();
        fx.sessions.logout(&session.token).await.unwrap();

        let err = fx.sessions.authenticate(&session.token).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthenticated);
    }

    #[tokio::test]
    async fn tokens_expire() {
        let fx = Fixture::new().await;
        let session = fx.sessions.register(form("ada")).await.unwrap();

        fx.clock.advance(Fixture::TOKEN_TTL_SECS + 1);
        let err = fx.sessions.authenticate(&session.token).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthenticated);
    }

    #[tokio::test]
    async fn staff_account_is_created_once() {
        let fx = Fixture::new().await;
        assert!(fx.sessions.ensure_staff_account("admin", "admin-pass").await.unwrap());
        assert!(!fx.sessions.ensure_staff_account("admin", "other-pass").await.unwrap());

        let session = fx.sessions.login("admin", "admin-pass").await.unwrap();
        let account = fx.sessions.authenticate(&session.token).await.unwrap();
        assert!(account.user.is_staff);
    }
}
