use crate::cli::actions::{fetch, image, pages, password, session, status, Action};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Fetch(args) => fetch::execute(args).await,
        Action::Image(args) => image::execute(args).await,
        Action::Pages(args) => pages::execute(&args),
        Action::Password(args) => {
            password::execute(&args);
            Ok(())
        }
        Action::Login(args) => session::login(args),
        Action::Logout(args) => session::logout(&args),
        Action::Status(args) => status::execute(&args),
    }
}
