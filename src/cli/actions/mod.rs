pub mod fetch;
pub mod image;
pub mod pages;
pub mod password;
pub mod session;
pub mod status;

mod run;

#[derive(Debug)]
pub enum Action {
    Fetch(fetch::Args),
    Image(image::Args),
    Pages(pages::Args),
    Password(password::Args),
    Login(session::LoginArgs),
    Logout(session::LogoutArgs),
    Status(status::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
