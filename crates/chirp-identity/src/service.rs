//! Signup, login, and token authentication.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use chirp_types::{User, UserId};

use crate::error::IdentityError;
use crate::password;
use crate::store::{NewUser, UserStore};
use crate::token::{Claims, TokenService};

/// A successful login: the account plus a freshly minted access token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The authenticated account.
    pub user: User,
    /// Signed bearer token, valid for 24 hours.
    pub access_token: String,
}

/// The identity service: account registration and credential checks.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl IdentityService {
    /// Create an identity service over the given store and token signer.
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Validation`] when name, email, or password is
    /// missing; [`IdentityError::EmailTaken`] on a duplicate email.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        profile: &str,
    ) -> Result<User, IdentityError> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(IdentityError::Validation(String::from(
                "name, email, and password are required",
            )));
        }

        let password_hash = password::hash_password(password)?;
        let user = self
            .store
            .insert(
                NewUser {
                    name: name.to_owned(),
                    email: email.to_owned(),
                    profile: profile.to_owned(),
                    password_hash,
                },
                Utc::now(),
            )
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Authenticate credentials and mint an access token.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Validation`] for missing fields, otherwise
    /// [`IdentityError::InvalidCredentials`] -- the same kind whether
    /// the email is unknown or the password wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, IdentityError> {
        if email.is_empty() || password.is_empty() {
            return Err(IdentityError::Validation(String::from(
                "email and password are required",
            )));
        }

        let Some(credentials) = self.store.get_by_email(email).await? else {
            return Err(IdentityError::InvalidCredentials);
        };
        if !password::verify_password(password, &credentials.password_hash) {
            return Err(IdentityError::InvalidCredentials);
        }

        let access_token = self.tokens.mint(&credentials.user)?;
        info!(user_id = %credentials.user.id, "user logged in");
        Ok(LoginOutcome {
            user: credentials.user,
            access_token,
        })
    }

    /// Validate a bearer token and return its claims.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Token`] for anything wrong with the token.
    pub fn authenticate(&self, token: &str) -> Result<Claims, IdentityError> {
        self.tokens.validate(token)
    }

    /// Fetch an account by id.
    pub async fn user(&self, id: UserId) -> Result<Option<User>, IdentityError> {
        self.store.get(id).await
    }
}
