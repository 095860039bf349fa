//! Credential store operations: registration, authentication and password
//! reset on top of [`UserRepo`].

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        password::{hash_in_background, verify_in_background},
        repo::UserRepo,
        repo_types::User,
    },
    db::UserId,
    error::{ApiError, ApiResult},
};

const MAX_PASSWORD_BYTES: usize = 1024;

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^\S{1,64}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

fn validate(username: &str, password: &str) -> ApiResult<()> {
    if !is_valid_username(username) {
        return Err(ApiError::Validation(
            "username must be 1-64 characters without whitespace".into(),
        ));
    }
    validate_password(password)
}

fn validate_password(password: &str) -> ApiResult<()> {
    if password.is_empty() || password.len() > MAX_PASSWORD_BYTES {
        return Err(ApiError::Validation(format!(
            "password must be 1-{MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

pub async fn register(users: &dyn UserRepo, username: &str, password: &str) -> ApiResult<UserId> {
    validate(username, password)?;
    let hash = hash_in_background(password.to_owned()).await?;
    let user_id = users.create(username, &hash).await?;
    info!(user_id, username, "user registered");
    Ok(user_id)
}

/// Unknown usernames and wrong passwords both come back as
/// [`ApiError::BadCredentials`].
pub async fn authenticate(users: &dyn UserRepo, username: &str, password: &str) -> ApiResult<User> {
    let Some(user) = users.find_by_username(username).await? else {
        warn!(username, "login unknown username");
        return Err(ApiError::BadCredentials);
    };

    let ok = verify_in_background(password.to_owned(), user.password_hash.clone()).await?;
    if !ok {
        warn!(username, user_id = user.id, "login invalid password");
        return Err(ApiError::BadCredentials);
    }
    Ok(user)
}

/// Only the new password is checked up front; a username that was never
/// registered ends up as [`crate::db::RepoError::UserNotFound`].
pub async fn reset_password(users: &dyn UserRepo, username: &str, password: &str) -> ApiResult<()> {
    validate_password(password)?;
    let hash = hash_in_background(password.to_owned()).await?;
    users.update_password(username, &hash).await?;
    warn!(username, "password reset without prior authentication");
    Ok(())
}
