//! Server side of the identity boundary: accounts, credential checks and
//! token issuance. Callers get provider errors back untranslated.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::auth::jwt::{generate_token, verify_token};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::Session;
use crate::error::AuthError;
use crate::model::User;
use crate::models::TokenType;
use crate::store::{StoreError, UserStore};
use crate::utils::{email_cache::TakenEmailCache, email_filter::EmailFilter};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub access_ttl: usize,
    pub refresh_ttl: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Outcome of a successful register, sign-in or refresh.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: Session,
    pub tokens: AuthTokens,
}

pub struct IdentityProvider {
    users: Arc<dyn UserStore>,
    tokens: TokenSettings,
    filter: EmailFilter,
    cache: TakenEmailCache,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl IdentityProvider {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenSettings) -> Self {
        Self {
            users,
            tokens,
            filter: EmailFilter::new(),
            cache: TakenEmailCache::new(),
        }
    }

    /// true  => email AVAILABLE
    /// false => email TAKEN
    async fn is_email_available(&self, email: &str) -> Result<bool, StoreError> {
        // Cuckoo filter: a miss is a definite negative
        if !self.filter.might_exist(email) {
            return Ok(true);
        }

        // Moka cache: fast positive
        if self.cache.is_taken(email).await {
            return Ok(false);
        }

        let exists = self.users.email_exists(email).await?;
        if exists {
            self.cache.mark_taken(email).await;
        }
        Ok(!exists)
    }

    /// Create an account and sign it in.
    #[instrument(name = "identity_register", skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let email = normalize_email(email);
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !valid_email {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        if !self.is_email_available(&email).await? {
            info!("Registration rejected: email taken");
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password).map_err(|e| AuthError::Hash(e.to_string()))?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash,
            created_at: Utc::now(),
        };

        match self.users.insert_user(&user).await {
            Ok(()) => {}
            // lost a race with a concurrent registration
            Err(StoreError::Conflict) => return Err(AuthError::EmailTaken),
            Err(e) => return Err(e.into()),
        }
        self.filter.insert(&email);
        self.cache.mark_taken(&email).await;

        info!(user_id = %user.id, "User registered");
        self.issue(Session::new(user.id, user.email)).await
    }

    #[instrument(name = "identity_sign_in", skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                info!("Invalid credentials: user not found");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if let Err(e) = verify_password(password, &user.password_hash) {
            info!(error = %e, "Invalid credentials: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        debug!(user_id = %user.id, "Password verified");
        self.issue(Session::new(user.id, user.email)).await
    }

    /// Revoke a refresh token. Unknown, malformed or already revoked tokens
    /// are accepted silently.
    pub async fn sign_out(&self, refresh_token: &str) -> Result<(), AuthError> {
        let claims = match verify_token(refresh_token, &self.tokens.secret) {
            Ok(c) if c.token_type == TokenType::Refresh => c,
            _ => return Ok(()),
        };
        self.users.revoke_refresh_token(&claims.jti).await?;
        info!(user_id = %claims.sub, "Signed out");
        Ok(())
    }

    /// Rotate a refresh token: the presented one is revoked and a new pair issued.
    pub async fn refresh(&self, refresh_token: &str) -> Result<SignedIn, AuthError> {
        let claims = verify_token(refresh_token, &self.tokens.secret)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        if claims.token_type != TokenType::Refresh {
            return Err(AuthError::InvalidToken("not a refresh token".into()));
        }

        if !self.users.revoke_refresh_token(&claims.jti).await? {
            warn!(user_id = %claims.sub, "Refresh token reuse or unknown token");
            return Err(AuthError::InvalidToken("refresh token revoked".into()));
        }

        self.issue(Session::new(claims.sub, claims.email)).await
    }

    /// Resolve an access token to the session it was issued for.
    pub fn verify(&self, access_token: &str) -> Result<Session, AuthError> {
        let claims = verify_token(access_token, &self.tokens.secret)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        if claims.token_type != TokenType::Access {
            return Err(AuthError::InvalidToken("not an access token".into()));
        }
        Ok(Session::new(claims.sub, claims.email))
    }

    async fn issue(&self, session: Session) -> Result<SignedIn, AuthError> {
        let (access_token, _) = generate_token(
            &session.user_id,
            &session.email,
            TokenType::Access,
            &self.tokens.secret,
            self.tokens.access_ttl,
        )?;
        let (refresh_token, refresh_claims) = generate_token(
            &session.user_id,
            &session.email,
            TokenType::Refresh,
            &self.tokens.secret,
            self.tokens.refresh_ttl,
        )?;

        let expires_at = Utc
            .timestamp_opt(refresh_claims.exp as i64, 0)
            .single()
            .unwrap_or_else(Utc::now);
        self.users
            .store_refresh_token(&session.user_id, &refresh_claims.jti, expires_at)
            .await?;

        Ok(SignedIn {
            session,
            tokens: AuthTokens {
                access_token,
                refresh_token,
            },
        })
    }

    /// Load registered emails into the availability filter and cache in
    /// batches of `batch_size`.
    pub async fn warmup(&self, batch_size: usize) -> Result<usize, StoreError> {
        let emails = self.users.emails().await?;
        for batch in emails.chunks(batch_size.max(1)) {
            self.filter.insert_batch(batch);
            self.cache.mark_batch(batch).await;
        }
        log::info!("Email filter warmup complete: {} users", emails.len());
        Ok(emails.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rstest::rstest;

    fn provider() -> IdentityProvider {
        IdentityProvider::new(
            Arc::new(MemoryStore::new()),
            TokenSettings {
                secret: "test-secret".into(),
                access_ttl: 900,
                refresh_ttl: 3600,
            },
        )
    }

    #[actix_web::test]
    async fn register_then_sign_in() {
        let idp = provider();
        let registered = idp.register(" Jane@Example.com ", "s3cret!pw").await.unwrap();
        assert_eq!(registered.session.email, "jane@example.com");

        let signed_in = idp.sign_in("jane@example.com", "s3cret!pw").await.unwrap();
        assert_eq!(signed_in.session.user_id, registered.session.user_id);

        let session = idp.verify(&signed_in.tokens.access_token).unwrap();
        assert_eq!(session, signed_in.session);
    }

    #[actix_web::test]
    async fn duplicate_email_is_rejected() {
        let idp = provider();
        idp.register("jane@example.com", "s3cret!pw").await.unwrap();

        let err = idp.register("JANE@example.com", "another!pw").await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[rstest]
    #[case("not-an-email", "s3cret!pw")]
    #[case("@example.com", "s3cret!pw")]
    #[case("jane@example.com", "short")]
    #[actix_web::test]
    async fn rejects_bad_registration_input(#[case] email: &str, #[case] password: &str) {
        let err = provider().register(email, password).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail | AuthError::WeakPassword));
    }

    #[actix_web::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let idp = provider();
        idp.register("jane@example.com", "s3cret!pw").await.unwrap();

        let wrong = idp.sign_in("jane@example.com", "nope-nope").await.unwrap_err();
        let unknown = idp.sign_in("john@example.com", "s3cret!pw").await.unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[actix_web::test]
    async fn refresh_rotates_once_and_sign_out_revokes() {
        let idp = provider();
        let first = idp.register("jane@example.com", "s3cret!pw").await.unwrap();

        let second = idp.refresh(&first.tokens.refresh_token).await.unwrap();
        assert!(idp.refresh(&first.tokens.refresh_token).await.is_err());

        idp.sign_out(&second.tokens.refresh_token).await.unwrap();
        assert!(idp.refresh(&second.tokens.refresh_token).await.is_err());
        // idempotent
        idp.sign_out(&second.tokens.refresh_token).await.unwrap();
    }

    #[actix_web::test]
    async fn tokens_are_not_interchangeable() {
        let idp = provider();
        let signed_in = idp.register("jane@example.com", "s3cret!pw").await.unwrap();

        assert!(idp.verify(&signed_in.tokens.refresh_token).is_err());
        assert!(idp.refresh(&signed_in.tokens.access_token).await.is_err());
    }

    #[actix_web::test]
    async fn warmup_marks_existing_emails_taken() {
        let store = Arc::new(MemoryStore::new());
        let settings = TokenSettings {
            secret: "test-secret".into(),
            access_ttl: 900,
            refresh_ttl: 3600,
        };
        IdentityProvider::new(store.clone(), settings.clone())
            .register("jane@example.com", "s3cret!pw")
            .await
            .unwrap();

        let restarted = IdentityProvider::new(store, settings);
        assert_eq!(restarted.warmup(100).await.unwrap(), 1);
        assert!(!restarted.is_email_available("jane@example.com").await.unwrap());
        assert!(restarted.is_email_available("john@example.com").await.unwrap());
    }
}
