//! Request and response payloads of the library REST service. The service owns
//! the schema, so response types are lenient: every field is optional and
//! unknown fields are ignored.

use crate::session::Role;
use chrono::NaiveDate;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, str::FromStr};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub stock_available: Option<i64>,
    #[serde(alias = "publishDate")]
    pub date_published: Option<String>,
}

/// A rental as listed on "my books" and in the admin user view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RentedBook {
    pub rent_id: Option<i64>,
    pub id: Option<i64>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub price: Option<f64>,
    pub date_published: Option<String>,
    pub rent_date: Option<String>,
    pub return_date: Option<String>,
    pub returned: Option<bool>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookComment {
    pub rent_id: Option<i64>,
    pub book_title: Option<String>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSummary {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub third_name: Option<String>,
    pub email: Option<String>,
    pub main_address: Option<String>,
}

impl UserSummary {
    /// The id used by rental and comment lookups.
    #[must_use]
    pub fn lookup_id(&self) -> Option<i64> {
        self.user_id.or(self.id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub third_name: Option<String>,
    pub email: Option<String>,
    pub main_address: Option<String>,
    pub age: Option<u32>,
    pub role: Option<String>,
}

impl UserProfile {
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|role| role.parse().ok())
    }
}

/// Editable profile fields. Unset fields keep the current value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub third_name: Option<String>,
    pub main_address: Option<String>,
    pub age: Option<u32>,
}

impl ProfileUpdate {
    /// Fill unset fields from the current profile, as the edit form does.
    #[must_use]
    pub fn merged_with(self, current: &UserProfile) -> Self {
        Self {
            first_name: self.first_name.or_else(|| current.first_name.clone()),
            second_name: self.second_name.or_else(|| current.second_name.clone()),
            third_name: self.third_name.or_else(|| current.third_name.clone()),
            main_address: self.main_address.or_else(|| current.main_address.clone()),
            age: self.age.or(current.age),
        }
    }
}

/// Sign-up form. Passwords stay secret until the payload is built.
#[derive(Clone, Debug, Default)]
pub struct Registration {
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub third_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub password_confirmation: Option<SecretString>,
    pub main_address: Option<String>,
    pub age: Option<u32>,
    pub role: Option<Role>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCriteria {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub price_from: Option<f64>,
    pub price_to: Option<f64>,
}

impl BookCriteria {
    /// Blank text criteria are sent as `null`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: blank_to_none(self.title),
            author: blank_to_none(self.author),
            isbn: blank_to_none(self.isbn),
            ..self
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCriteria {
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub third_name: Option<String>,
    pub email: Option<String>,
    pub main_address: Option<String>,
}

impl UserCriteria {
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            first_name: blank_to_none(self.first_name),
            second_name: blank_to_none(self.second_name),
            third_name: blank_to_none(self.third_name),
            email: blank_to_none(self.email),
            main_address: blank_to_none(self.main_address),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: f64,
    pub stock: i64,
    pub stock_available: i64,
    pub publish_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentRequest {
    pub user_id: i64,
    pub book_id: i64,
    pub return_date: NaiveDate,
}

/// `comment: null` deletes the comment of a rental.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub rent_id: i64,
    pub comment: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Author,
    Isbn,
    Price,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "isbn" => Ok(Self::Isbn),
            "price" => Ok(Self::Price),
            other => Err(format!("cannot sort by {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Clicking the active column flips the direction; any other column starts ascending.
    #[must_use]
    pub fn toggled(active: Option<(SortKey, Self)>, key: SortKey) -> Self {
        match active {
            Some((current, Self::Asc)) if current == key => Self::Desc,
            _ => Self::Asc,
        }
    }
}

impl SortKey {
    pub(crate) fn compare(self, a: &Book, b: &Book) -> Ordering {
        match self {
            Self::Title => a.title.cmp(&b.title),
            Self::Author => a.author.cmp(&b.author),
            Self::Isbn => a.isbn.cmp(&b.isbn),
            Self::Price => a
                .price
                .partial_cmp(&b.price)
                .unwrap_or(Ordering::Equal),
        }
    }
}

pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
