pub mod committee;
pub mod draw;
pub mod notify;
pub mod payment;
pub mod profile;
pub mod rules;
pub mod whatsapp;

use parchipay_core::{Committee, Directory, User};

/// Resolve a user id against the registry.
pub fn user<'a>(dir: &'a Directory, user_id: &str) -> Result<&'a User, Box<dyn std::error::Error>> {
    dir.user(user_id)
        .ok_or_else(|| format!("no user with id '{user_id}'").into())
}

pub fn committee<'a>(
    dir: &'a Directory,
    committee_id: &str,
) -> Result<&'a Committee, Box<dyn std::error::Error>> {
    dir.committee(committee_id)
        .ok_or_else(|| format!("no committee with id '{committee_id}'").into())
}
