//! Session commands.

use shopfront_core::LoginForm;
use shopfront_storefront::{AppError, AppState, LoginOutcome};

use super::CliError;

/// Sign in. A blank field or a rejected login fails the command.
pub async fn login(state: &AppState, username: String, password: String) -> Result<(), CliError> {
    let form = LoginForm { username, password };
    match state.login(&form).await {
        LoginOutcome::SignedIn => Ok(()),
        LoginOutcome::Invalid(errors) => Err(AppError::from(errors).into()),
        LoginOutcome::Rejected => {
            let message = state
                .auth()
                .error()
                .unwrap_or_else(|| "Login failed".to_string());
            state.auth().clear_error();
            Err(CliError::Failed(message))
        }
    }
}

#[allow(clippy::print_stdout)]
pub fn whoami(state: &AppState) {
    let session = state.auth().snapshot();
    match session.username {
        Some(username) if session.is_authenticated => println!("Signed in as {username}"),
        _ => println!("Not signed in"),
    }
}
