//! Maps validated CLI matches to an [`Action`].

use crate::{
    cli::{
        actions::{fetch, image, pages, password, session, status, Action},
        globals::GlobalArgs,
    },
    widgets::Audience,
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: {name}"))
}

fn optional(matches: &clap::ArgMatches, name: &str) -> String {
    matches.get_one::<String>(name).cloned().unwrap_or_default()
}

fn many(matches: &clap::ArgMatches, name: &str) -> Vec<String> {
    matches
        .get_many::<String>(name)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = GlobalArgs::parse(matches)?;

    match matches.subcommand() {
        Some(("fetch", sub_m)) => Ok(Action::Fetch(fetch::Args {
            globals,
            url: required(sub_m, "url")?,
            method: required(sub_m, "method")?,
            headers: many(sub_m, "header"),
            data: sub_m.get_one::<String>("data").cloned(),
            auth: sub_m.get_flag("auth"),
        })),
        Some(("image", sub_m)) => Ok(Action::Image(image::Args {
            globals,
            url: required(sub_m, "url")?,
            output: PathBuf::from(required(sub_m, "output")?),
        })),
        Some(("pages", sub_m)) => Ok(Action::Pages(pages::Args {
            file: sub_m.get_one::<String>("file").map(PathBuf::from),
            html: sub_m.get_flag("html"),
            icons: sub_m.get_flag("icons"),
            stylesheets: many(sub_m, "stylesheet"),
        })),
        Some(("password", sub_m)) => Ok(Action::Password(password::Args {
            password: SecretString::from(required(sub_m, "password")?),
        })),
        Some(("login", sub_m)) => Ok(Action::Login(session::LoginArgs {
            globals,
            token: SecretString::from(required(sub_m, "token")?),
            username: optional(sub_m, "username"),
            member_no: optional(sub_m, "member-no"),
            role: optional(sub_m, "role"),
            nickname: optional(sub_m, "nickname"),
            points: sub_m.get_one::<i64>("points").copied().unwrap_or(0),
        })),
        Some(("logout", _)) => Ok(Action::Logout(session::LogoutArgs { globals })),
        Some(("status", sub_m)) => Ok(Action::Status(status::Args {
            code: required(sub_m, "code")?,
            audience: if sub_m.get_flag("admin") {
                Audience::Admin
            } else {
                Audience::Member
            },
        })),
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => Err(anyhow!("missing subcommand")),
    }
}
