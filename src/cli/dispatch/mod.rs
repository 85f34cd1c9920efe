use crate::{
    cli::{
        actions::{Action, account, book, comment, user},
        commands::{self, account as account_args, book as book_args, comment as comment_args},
        globals::GlobalArgs,
    },
    library::{
        BookCriteria, NewBook, ProfileUpdate, Registration, SortDirection, SortKey, UserCriteria,
    },
    session::{Role, default_session_path},
};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

fn string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

fn required<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Result<T> {
    matches
        .get_one::<T>(id)
        .cloned()
        .with_context(|| format!("missing required argument: {id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Option<SecretString> {
    string(matches, id).map(SecretString::from)
}

/// # Errors
/// Returns an error if required arguments are missing or malformed.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = GlobalArgs::new(
        required::<String>(matches, commands::ARG_API_URL)?,
        matches
            .get_one::<PathBuf>(commands::ARG_SESSION_FILE)
            .cloned()
            .unwrap_or_else(default_session_path),
        matches.get_flag(commands::ARG_JSON),
    );

    match matches.subcommand() {
        Some(("book", sub)) => book_action(globals, sub),
        Some(("comment", sub)) => comment_action(globals, sub),
        Some(("user", sub)) => user_action(globals, sub),
        Some((name, sub)) => account_action(globals, name, sub),
        None => Err(anyhow!("no command given")),
    }
}

fn account_action(globals: GlobalArgs, name: &str, matches: &ArgMatches) -> Result<Action> {
    let operation = match name {
        "login" => account::Operation::Login {
            username: required(matches, account_args::ARG_USERNAME)?,
            password: secret(matches, account_args::ARG_PASSWORD)
                .context("missing required argument: password")?,
        },
        "logout" => account::Operation::Logout,
        "register" => account::Operation::Register(registration(matches)?),
        "whoami" => account::Operation::Whoami {
            refresh: matches.get_flag(account_args::ARG_REFRESH),
        },
        "menu" => account::Operation::Menu,
        "profile" => match matches.subcommand() {
            Some(("show", _)) => account::Operation::ShowProfile,
            Some(("update", sub)) => account::Operation::UpdateProfile(profile_update(sub)),
            _ => return Err(anyhow!("unknown profile command")),
        },
        other => return Err(anyhow!("unknown command: {other}")),
    };

    Ok(Action::Account(account::Args { globals, operation }))
}

fn registration(matches: &ArgMatches) -> Result<Registration> {
    let role = string(matches, account_args::ARG_ROLE)
        .map(|role| role.parse::<Role>())
        .transpose()
        .map_err(|err| anyhow!(err))?;

    Ok(Registration {
        first_name: string(matches, account_args::ARG_FIRST_NAME),
        second_name: string(matches, account_args::ARG_SECOND_NAME),
        third_name: string(matches, account_args::ARG_THIRD_NAME),
        email: string(matches, account_args::ARG_EMAIL),
        password: secret(matches, account_args::ARG_PASSWORD),
        password_confirmation: secret(matches, account_args::ARG_PASSWORD_CONFIRMATION),
        main_address: string(matches, account_args::ARG_MAIN_ADDRESS),
        age: matches.get_one::<u32>(account_args::ARG_AGE).copied(),
        role,
    })
}

fn profile_update(matches: &ArgMatches) -> ProfileUpdate {
    ProfileUpdate {
        first_name: string(matches, account_args::ARG_FIRST_NAME),
        second_name: string(matches, account_args::ARG_SECOND_NAME),
        third_name: string(matches, account_args::ARG_THIRD_NAME),
        main_address: string(matches, account_args::ARG_MAIN_ADDRESS),
        age: matches.get_one::<u32>(account_args::ARG_AGE).copied(),
    }
}

fn book_action(globals: GlobalArgs, matches: &ArgMatches) -> Result<Action> {
    let operation = match matches.subcommand() {
        Some(("search", sub)) => {
            let sort = string(sub, book_args::ARG_SORT)
                .map(|key| key.parse::<SortKey>())
                .transpose()
                .map_err(|err| anyhow!(err))?
                .map(|key| {
                    let direction = if sub.get_flag(book_args::ARG_DESC) {
                        SortDirection::Desc
                    } else {
                        SortDirection::Asc
                    };
                    (key, direction)
                });

            book::Operation::Search {
                criteria: BookCriteria {
                    title: string(sub, book_args::ARG_TITLE),
                    author: string(sub, book_args::ARG_AUTHOR),
                    isbn: string(sub, book_args::ARG_ISBN),
                    price_from: sub.get_one::<f64>(book_args::ARG_PRICE_FROM).copied(),
                    price_to: sub.get_one::<f64>(book_args::ARG_PRICE_TO).copied(),
                },
                sort,
            }
        }
        Some(("add", sub)) => {
            let publish_date = required::<String>(sub, book_args::ARG_PUBLISH_DATE)?;
            let publish_date = NaiveDate::parse_from_str(&publish_date, "%Y-%m-%d")
                .with_context(|| format!("invalid publish date {publish_date}, expected YYYY-MM-DD"))?;
            let stock = required::<i64>(sub, book_args::ARG_STOCK)?;

            book::Operation::Add {
                book: NewBook {
                    title: required(sub, book_args::ARG_TITLE)?,
                    author: required(sub, book_args::ARG_AUTHOR)?,
                    isbn: required(sub, book_args::ARG_ISBN)?,
                    price: required(sub, book_args::ARG_PRICE)?,
                    stock,
                    stock_available: sub
                        .get_one::<i64>(book_args::ARG_STOCK_AVAILABLE)
                        .copied()
                        .unwrap_or(stock),
                    publish_date,
                },
                cover: sub.get_one::<PathBuf>(book_args::ARG_COVER).cloned(),
            }
        }
        Some(("stock", sub)) => book::Operation::Stock {
            book_id: required(sub, book_args::ARG_BOOK_ID)?,
            stock: required(sub, book_args::ARG_STOCK)?,
        },
        Some(("restock", sub)) => book::Operation::Restock {
            book_id: required(sub, book_args::ARG_BOOK_ID)?,
            quantity: required(sub, book_args::ARG_QUANTITY)?,
        },
        Some(("rent", sub)) => book::Operation::Rent {
            book_id: required(sub, book_args::ARG_BOOK_ID)?,
            user_id: required(sub, book_args::ARG_USER_ID)?,
        },
        Some(("return", sub)) => book::Operation::Return {
            rent_id: required(sub, book_args::ARG_RENT_ID)?,
        },
        Some(("mine", _)) => book::Operation::Mine,
        _ => return Err(anyhow!("unknown book command")),
    };

    Ok(Action::Book(book::Args { globals, operation }))
}

fn comment_action(globals: GlobalArgs, matches: &ArgMatches) -> Result<Action> {
    let operation = match matches.subcommand() {
        Some(("add", sub)) => comment::Operation::Add {
            rent_id: required(sub, comment_args::ARG_RENT_ID)?,
            text: required(sub, comment_args::ARG_TEXT)?,
        },
        Some(("delete", sub)) => comment::Operation::Delete {
            rent_id: required(sub, comment_args::ARG_RENT_ID)?,
        },
        Some(("mine", sub)) => comment::Operation::Mine {
            all: sub.get_flag(comment_args::ARG_ALL),
        },
        _ => return Err(anyhow!("unknown comment command")),
    };

    Ok(Action::Comment(comment::Args { globals, operation }))
}

fn user_action(globals: GlobalArgs, matches: &ArgMatches) -> Result<Action> {
    let operation = match matches.subcommand() {
        Some(("search", sub)) => user::Operation::Search(UserCriteria {
            first_name: string(sub, account_args::ARG_FIRST_NAME),
            second_name: string(sub, account_args::ARG_SECOND_NAME),
            third_name: string(sub, account_args::ARG_THIRD_NAME),
            email: string(sub, account_args::ARG_EMAIL),
            main_address: string(sub, account_args::ARG_MAIN_ADDRESS),
        }),
        Some(("books", sub)) => user::Operation::Books {
            user_id: required(sub, commands::user::ARG_USER_ID)?,
        },
        Some(("comments", sub)) => user::Operation::Comments {
            user_id: required(sub, commands::user::ARG_USER_ID)?,
            all: sub.get_flag(comment_args::ARG_ALL),
        },
        _ => return Err(anyhow!("unknown user command")),
    };

    Ok(Action::User(user::Args { globals, operation }))
}
