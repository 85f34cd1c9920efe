use clap::{Arg, ArgAction, Command};

pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_PASSWORD_CONFIRMATION: &str = "password-confirmation";
pub const ARG_EMAIL: &str = "email";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_SECOND_NAME: &str = "second-name";
pub const ARG_THIRD_NAME: &str = "third-name";
pub const ARG_MAIN_ADDRESS: &str = "main-address";
pub const ARG_AGE: &str = "age";
pub const ARG_ROLE: &str = "role";
pub const ARG_REFRESH: &str = "refresh";

fn name_args(command: Command) -> Command {
    command
        .arg(Arg::new(ARG_FIRST_NAME).long(ARG_FIRST_NAME).help("First name"))
        .arg(Arg::new(ARG_SECOND_NAME).long(ARG_SECOND_NAME).help("Second name"))
        .arg(Arg::new(ARG_THIRD_NAME).long(ARG_THIRD_NAME).help("Third name"))
        .arg(
            Arg::new(ARG_MAIN_ADDRESS)
                .long(ARG_MAIN_ADDRESS)
                .help("Main address"),
        )
        .arg(
            Arg::new(ARG_AGE)
                .long(ARG_AGE)
                .help("Age")
                .value_parser(clap::value_parser!(u32)),
        )
}

#[must_use]
pub fn login() -> Command {
    Command::new("login")
        .about("Sign in and store the session")
        .arg(
            Arg::new(ARG_USERNAME)
                .short('u')
                .long(ARG_USERNAME)
                .help("Username")
                .env("BOOKDESK_USERNAME")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .short('p')
                .long(ARG_PASSWORD)
                .help("Password")
                .env("BOOKDESK_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

#[must_use]
pub fn logout() -> Command {
    Command::new("logout").about("Forget the stored session")
}

#[must_use]
pub fn register() -> Command {
    name_args(
        Command::new("register")
            .about("Create an account")
            .arg(Arg::new(ARG_EMAIL).long(ARG_EMAIL).help("Email (required)"))
            .arg(
                Arg::new(ARG_PASSWORD)
                    .long(ARG_PASSWORD)
                    .help("Password (required)")
                    .env("BOOKDESK_PASSWORD")
                    .hide_env_values(true),
            )
            .arg(
                Arg::new(ARG_PASSWORD_CONFIRMATION)
                    .long(ARG_PASSWORD_CONFIRMATION)
                    .help("Password confirmation (required)"),
            )
            .arg(
                Arg::new(ARG_ROLE)
                    .long(ARG_ROLE)
                    .help("Account role")
                    .value_parser(["USER", "ADMIN"])
                    .ignore_case(true)
                    .default_value("USER"),
            ),
    )
}

#[must_use]
pub fn whoami() -> Command {
    Command::new("whoami")
        .about("Show the stored session")
        .arg(
            Arg::new(ARG_REFRESH)
                .long(ARG_REFRESH)
                .help("Fetch the current role from the service first")
                .action(ArgAction::SetTrue),
        )
}

#[must_use]
pub fn menu() -> Command {
    Command::new("menu").about("List the screens available to the current session")
}

#[must_use]
pub fn profile() -> Command {
    Command::new("profile")
        .about("Show or edit your profile")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("show").about("Show your profile"))
        .subcommand(name_args(
            Command::new("update").about("Update your profile; omitted fields are kept"),
        ))
}
