pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const ARG_ORIGIN: &str = "origin";
pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_SESSION_FILE: &str = "session-file";
pub const ARG_FRAMED_IN: &str = "framed-in";

pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_SESSION_FILE: &str = ".buka/session.json";

fn fetch() -> Command {
    Command::new("fetch")
        .about("Call the API through the request gateway and print the JSON body")
        .arg(Arg::new("url").help("Absolute URL or path relative to the API base").required(true))
        .arg(
            Arg::new("method")
                .short('X')
                .long("method")
                .help("HTTP method")
                .default_value("GET"),
        )
        .arg(
            Arg::new("header")
                .short('H')
                .long("header")
                .help("Extra header as 'Name: value' (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .help("JSON request body"),
        )
        .arg(
            Arg::new("auth")
                .long("auth")
                .help("Send the stored session token as a bearer token")
                .action(ArgAction::SetTrue),
        )
}

fn image() -> Command {
    Command::new("image")
        .about("Download a protected image with the stored session token")
        .arg(Arg::new("url").required(true))
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("File to write the image to")
                .required(true),
        )
}

fn pages() -> Command {
    Command::new("pages")
        .about("Render pagination controls for a page-result JSON document")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .help("Page result JSON file (default: stdin)"),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .help("Print Bootstrap markup instead of text")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stylesheet")
                .long("stylesheet")
                .help("Stylesheet href loaded by the page, used to detect the icon font (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("icons")
                .long("icons")
                .help("Use icon glyphs for the navigation buttons")
                .action(ArgAction::SetTrue)
                .conflicts_with("stylesheet"),
        )
}

fn password() -> Command {
    Command::new("password")
        .about("Score a password from 0 (empty) to 4 (strong)")
        .arg(Arg::new("password").required(true))
}

fn login() -> Command {
    Command::new("login")
        .about("Store a session issued by the backend")
        .arg(
            Arg::new("token")
                .long("token")
                .help("JWT issued at login")
                .env("BUKA_TOKEN")
                .hide_env_values(true)
                .required(true),
        )
        .arg(Arg::new("username").long("username").default_value(""))
        .arg(Arg::new("member-no").long("member-no").default_value(""))
        .arg(Arg::new("role").long("role").default_value(""))
        .arg(Arg::new("nickname").long("nickname").default_value(""))
        .arg(
            Arg::new("points")
                .long("points")
                .default_value("0")
                .value_parser(clap::value_parser!(i64)),
        )
}

fn status() -> Command {
    Command::new("status")
        .about("Show how a ticket status code is displayed")
        .arg(Arg::new("code").help("PENDING, PROCESSING, REPLIED or CLOSED").required(true))
        .arg(
            Arg::new("admin")
                .long("admin")
                .help("Use the operator labels")
                .action(ArgAction::SetTrue),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("buka")
        .about("Admin front-end client toolkit")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_ORIGIN)
                .long("origin")
                .help("Origin the admin front end is served from; selects the API base")
                .env("BUKA_ORIGIN")
                .default_value(DEFAULT_ORIGIN)
                .global(true),
        )
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long("api-base-url")
                .help("Explicit API base URL, overrides the origin-based choice")
                .env("BUKA_API_BASE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long("session-file")
                .help("JSON file holding the auth session")
                .env("BUKA_SESSION_FILE")
                .default_value(DEFAULT_SESSION_FILE)
                .global(true),
        )
        .arg(
            Arg::new(ARG_FRAMED_IN)
                .long("framed-in")
                .help("Parent page path when running embedded in another page")
                .env("BUKA_FRAMED_IN")
                .global(true),
        )
        .subcommand(fetch())
        .subcommand(image())
        .subcommand(pages())
        .subcommand(password())
        .subcommand(login())
        .subcommand(Command::new("logout").about("Clear the stored session"))
        .subcommand(status());

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "buka");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Admin front-end client toolkit".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_fetch_args() {
        temp_env::with_vars(
            [
                ("BUKA_ORIGIN", None::<&str>),
                ("BUKA_API_BASE_URL", None),
                ("BUKA_SESSION_FILE", None),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "buka",
                    "fetch",
                    "/tickets",
                    "-X",
                    "POST",
                    "-H",
                    "X-Trace: 1",
                    "-H",
                    "Accept: application/json",
                    "--data",
                    r#"{"title":"help"}"#,
                    "--auth",
                ]);

                assert_eq!(
                    matches.get_one::<String>(ARG_ORIGIN).cloned(),
                    Some(DEFAULT_ORIGIN.to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_SESSION_FILE).cloned(),
                    Some(DEFAULT_SESSION_FILE.to_string())
                );

                let (name, sub) = matches.subcommand().unwrap();
                assert_eq!(name, "fetch");
                assert_eq!(sub.get_one::<String>("method").cloned(), Some("POST".to_string()));
                let headers: Vec<&String> = sub.get_many::<String>("header").unwrap().collect();
                assert_eq!(headers.len(), 2);
                assert!(sub.get_flag("auth"));
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("BUKA_ORIGIN", Some("https://buka.tw")),
                ("BUKA_API_BASE_URL", Some("https://staging.buka.tw/api")),
                ("BUKA_SESSION_FILE", Some("/tmp/buka-session.json")),
                ("BUKA_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["buka", "logout"]);
                assert_eq!(
                    matches.get_one::<String>(ARG_ORIGIN).cloned(),
                    Some("https://buka.tw".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_API_BASE_URL).cloned(),
                    Some("https://staging.buka.tw/api".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_SESSION_FILE).cloned(),
                    Some("/tmp/buka-session.json".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("BUKA_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["buka", "password", "x"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(u8::try_from(index).unwrap())
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars([("BUKA_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["buka".to_string(), "logout".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(u8::try_from(index).unwrap())
                );
            });
        }
    }

    #[test]
    fn test_login_requires_token() {
        temp_env::with_vars([("BUKA_TOKEN", None::<&str>)], || {
            let result = new().try_get_matches_from(vec!["buka", "login", "--username", "alice"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_login_token_from_env() {
        temp_env::with_vars([("BUKA_TOKEN", Some("jwt-from-env"))], || {
            let matches = new().get_matches_from(vec!["buka", "login", "--points", "7"]);
            let (_, sub) = matches.subcommand().unwrap();
            assert_eq!(
                sub.get_one::<String>("token").cloned(),
                Some("jwt-from-env".to_string())
            );
            assert_eq!(sub.get_one::<i64>("points").copied(), Some(7));
        });
    }
}
