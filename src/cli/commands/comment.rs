use clap::{Arg, ArgAction, Command};

pub const ARG_RENT_ID: &str = "rent-id";
pub const ARG_TEXT: &str = "text";
pub const ARG_ALL: &str = "all";

fn rent_id() -> Arg {
    Arg::new(ARG_RENT_ID)
        .help("Rental id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

#[must_use]
pub fn all() -> Arg {
    Arg::new(ARG_ALL)
        .long(ARG_ALL)
        .help("Include rentals without a comment")
        .action(ArgAction::SetTrue)
}

#[must_use]
pub fn subcommand() -> Command {
    Command::new("comment")
        .about("Comment on rented books")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("add")
                .about("Set the comment of a rental")
                .arg(rent_id())
                .arg(Arg::new(ARG_TEXT).help("Comment").required(true)),
        )
        .subcommand(
            Command::new("delete")
                .about("Remove the comment of a rental")
                .arg(rent_id()),
        )
        .subcommand(
            Command::new("mine")
                .about("List your comments")
                .arg(all()),
        )
}
