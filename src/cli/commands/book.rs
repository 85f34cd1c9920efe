use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

pub const ARG_TITLE: &str = "title";
pub const ARG_AUTHOR: &str = "author";
pub const ARG_ISBN: &str = "isbn";
pub const ARG_PRICE: &str = "price";
pub const ARG_PRICE_FROM: &str = "price-from";
pub const ARG_PRICE_TO: &str = "price-to";
pub const ARG_SORT: &str = "sort";
pub const ARG_DESC: &str = "desc";
pub const ARG_STOCK: &str = "stock";
pub const ARG_STOCK_AVAILABLE: &str = "stock-available";
pub const ARG_PUBLISH_DATE: &str = "publish-date";
pub const ARG_COVER: &str = "cover";
pub const ARG_BOOK_ID: &str = "book-id";
pub const ARG_QUANTITY: &str = "quantity";
pub const ARG_USER_ID: &str = "user-id";
pub const ARG_RENT_ID: &str = "rent-id";

fn book_id() -> Arg {
    Arg::new(ARG_BOOK_ID)
        .help("Book id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

#[must_use]
pub fn subcommand() -> Command {
    Command::new("book")
        .about("Search, add, stock and rent books")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("search")
                .about("Search the catalogue")
                .arg(Arg::new(ARG_TITLE).long(ARG_TITLE).help("Title contains"))
                .arg(Arg::new(ARG_AUTHOR).long(ARG_AUTHOR).help("Author contains"))
                .arg(Arg::new(ARG_ISBN).long(ARG_ISBN).help("ISBN"))
                .arg(
                    Arg::new(ARG_PRICE_FROM)
                        .long(ARG_PRICE_FROM)
                        .help("Minimum price")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new(ARG_PRICE_TO)
                        .long(ARG_PRICE_TO)
                        .help("Maximum price")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new(ARG_SORT)
                        .long(ARG_SORT)
                        .help("Sort results by column")
                        .value_parser(["title", "author", "isbn", "price"]),
                )
                .arg(
                    Arg::new(ARG_DESC)
                        .long(ARG_DESC)
                        .help("Sort descending")
                        .requires(ARG_SORT)
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Add a book to the catalogue (admin)")
                .arg(Arg::new(ARG_TITLE).long(ARG_TITLE).help("Title").required(true))
                .arg(
                    Arg::new(ARG_AUTHOR)
                        .long(ARG_AUTHOR)
                        .help("Author")
                        .required(true),
                )
                .arg(Arg::new(ARG_ISBN).long(ARG_ISBN).help("ISBN").required(true))
                .arg(
                    Arg::new(ARG_PRICE)
                        .long(ARG_PRICE)
                        .help("Price")
                        .required(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new(ARG_STOCK)
                        .long(ARG_STOCK)
                        .help("Copies owned")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(
                    Arg::new(ARG_STOCK_AVAILABLE)
                        .long(ARG_STOCK_AVAILABLE)
                        .help("Copies available for rent (default: --stock)")
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(
                    Arg::new(ARG_PUBLISH_DATE)
                        .long(ARG_PUBLISH_DATE)
                        .help("Publish date, YYYY-MM-DD")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_COVER)
                        .long(ARG_COVER)
                        .help("Cover image (.jpg or .jpeg)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("stock")
                .about("Set the stock of a book (admin)")
                .arg(book_id())
                .arg(
                    Arg::new(ARG_STOCK)
                        .help("New stock")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("restock")
                .about("Add copies to the current stock of a book (admin)")
                .arg(book_id())
                .arg(
                    Arg::new(ARG_QUANTITY)
                        .help("Copies to add")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("rent")
                .about("Rent a book to a user for six months (admin)")
                .arg(book_id())
                .arg(
                    Arg::new(ARG_USER_ID)
                        .long(ARG_USER_ID)
                        .help("User renting the book")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("return")
                .about("Mark a rental as returned (admin)")
                .arg(
                    Arg::new(ARG_RENT_ID)
                        .help("Rental id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        )
        .subcommand(Command::new("mine").about("List your rentals"))
}
