use crate::{
    cli::globals::GlobalArgs,
    client::{AuthSession, SessionStore},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[derive(Debug)]
pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub token: SecretString,
    pub username: String,
    pub member_no: String,
    pub role: String,
    pub nickname: String,
    pub points: i64,
}

#[derive(Debug)]
pub struct LogoutArgs {
    pub globals: GlobalArgs,
}

/// Stores the session issued by the login endpoint.
///
/// # Errors
/// Returns an error if the token is blank or the session file cannot be written.
pub fn login(args: LoginArgs) -> Result<()> {
    let token = args.token.expose_secret().trim();
    if token.is_empty() {
        anyhow::bail!("token must not be empty");
    }

    let session = AuthSession {
        token: SecretString::from(token.to_string()),
        username: args.username,
        member_no: args.member_no,
        role: args.role,
        nickname: args.nickname,
        points: args.points,
    };

    let store = args.globals.store();
    session
        .save(&store)
        .with_context(|| format!("failed to write {}", store.path().display()))?;

    info!("session stored in {}", store.path().display());
    println!("logged in as {}", display_name(&session));

    Ok(())
}

/// Clears every session key.
///
/// # Errors
/// Returns an error if the session file cannot be updated.
pub fn logout(args: &LogoutArgs) -> Result<()> {
    let store = args.globals.store();
    let was_authenticated = AuthSession::is_authenticated(&store);

    AuthSession::clear(&store)
        .with_context(|| format!("failed to update {}", store.path().display()))?;

    if was_authenticated {
        println!("logged out");
    } else {
        println!("no active session");
    }

    Ok(())
}

fn display_name(session: &AuthSession) -> &str {
    [&session.nickname, &session.username]
        .into_iter()
        .find(|name| !name.is_empty())
        .map_or("anonymous", String::as_str)
}

/// Session currently held by `store`, if any.
#[must_use]
pub fn current(store: &dyn SessionStore) -> Option<AuthSession> {
    AuthSession::load(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs, path::PathBuf};
    use uuid::Uuid;

    fn globals() -> GlobalArgs {
        GlobalArgs {
            origin: "http://localhost:8080".to_string(),
            api_base_url: None,
            session_file: env::temp_dir()
                .join(format!("buka-cli-{}", Uuid::new_v4()))
                .join("session.json"),
            framed_in: None,
        }
    }

    fn login_args(globals: GlobalArgs, token: &str) -> LoginArgs {
        LoginArgs {
            globals,
            token: SecretString::from(token.to_string()),
            username: "alice".to_string(),
            member_no: "M0001".to_string(),
            role: "ADMIN".to_string(),
            nickname: String::new(),
            points: 120,
        }
    }

    fn cleanup(path: &PathBuf) {
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_login_then_logout() {
        let globals = globals();
        let path = globals.session_file.clone();

        login(login_args(globals.clone(), " jwt-abc ")).unwrap();

        let session = current(&globals.store()).unwrap();
        assert_eq!(session.token.expose_secret(), "jwt-abc");
        assert_eq!(session.username, "alice");
        assert_eq!(session.member_no, "M0001");
        assert_eq!(session.points, 120);
        assert_eq!(display_name(&session), "alice");

        logout(&LogoutArgs {
            globals: globals.clone(),
        })
        .unwrap();
        assert!(current(&globals.store()).is_none());

        cleanup(&path);
    }

    #[test]
    fn test_login_rejects_blank_token() {
        let globals = globals();
        let path = globals.session_file.clone();

        assert!(login(login_args(globals, "   ")).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_logout_without_session() {
        let globals = globals();
        assert!(logout(&LogoutArgs { globals }).is_ok());
    }
}
