use super::{account, comment};
use clap::{Arg, Command};

pub const ARG_USER_ID: &str = "user-id";

fn user_id() -> Arg {
    Arg::new(ARG_USER_ID)
        .help("User id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

#[must_use]
pub fn subcommand() -> Command {
    Command::new("user")
        .about("Look up users and their rentals (admin)")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("search")
                .about("Search users")
                .arg(Arg::new(account::ARG_EMAIL).long(account::ARG_EMAIL).help("Email"))
                .arg(
                    Arg::new(account::ARG_FIRST_NAME)
                        .long(account::ARG_FIRST_NAME)
                        .help("First name"),
                )
                .arg(
                    Arg::new(account::ARG_SECOND_NAME)
                        .long(account::ARG_SECOND_NAME)
                        .help("Second name"),
                )
                .arg(
                    Arg::new(account::ARG_THIRD_NAME)
                        .long(account::ARG_THIRD_NAME)
                        .help("Third name"),
                )
                .arg(
                    Arg::new(account::ARG_MAIN_ADDRESS)
                        .long(account::ARG_MAIN_ADDRESS)
                        .help("Main address"),
                ),
        )
        .subcommand(
            Command::new("books")
                .about("List the rentals of a user")
                .arg(user_id()),
        )
        .subcommand(
            Command::new("comments")
                .about("List the comments of a user")
                .arg(user_id())
                .arg(comment::all()),
        )
}
