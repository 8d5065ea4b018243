//! # Users
//!
//! Operations over the in-memory user collection. Records are opaque field
//! maps, only `id` is interpreted.
//!
//! ## Ids
//! - Path parameters are coerced to numbers before comparing with `id`, so `"3"`, `"3.0"` and `" 3"` all match `3`
//! - A parameter that is not a number matches nothing
//! - New ids are the id of the **last** record plus one, not the largest id plus one
use serde_json::Value;

pub use seed::User;

use crate::{error::AppError, utils::to_number};

pub const ID: &str = "id";

fn numeric_id(user: &User) -> Option<f64> {
    user.get(ID).and_then(Value::as_f64)
}

fn integer_id(user: &User) -> Option<i64> {
    let id = user.get(ID)?;

    id.as_i64().or_else(|| {
        id.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

pub fn matches_id(user: &User, param: &str) -> bool {
    let wanted = to_number(param);

    numeric_id(user).is_some_and(|id| id == wanted)
}

/// Id for a record appended after `users`, `1` for an empty collection.
pub fn next_id(users: &[User]) -> Result<i64, AppError> {
    let Some(last) = users.last() else {
        return Ok(1);
    };

    integer_id(last)
        .and_then(|id| id.checked_add(1))
        .ok_or_else(|| {
            AppError::Validation(format!("last user has no integer id: {:?}", last.get(ID)))
        })
}

/// The assigned id replaces any `id` sent in the body.
pub fn with_id(mut user: User, id: i64) -> User {
    user.insert(ID.to_string(), Value::from(id));
    user
}

/// Shallow merge, fields from `changes` win, `id` included.
pub fn merge(mut user: User, changes: &User) -> User {
    for (key, value) in changes {
        user.insert(key.clone(), value.clone());
    }
    user
}

pub fn update(users: Vec<User>, param: &str, changes: &User) -> Vec<User> {
    users
        .into_iter()
        .map(|user| {
            if matches_id(&user, param) {
                merge(user, changes)
            } else {
                user
            }
        })
        .collect()
}

pub fn without(users: Vec<User>, param: &str) -> Vec<User> {
    users
        .into_iter()
        .filter(|user| !matches_id(user, param))
        .collect()
}

pub fn find(users: Vec<User>, param: &str) -> Option<User> {
    users.into_iter().find(|user| matches_id(user, param))
}

#[cfg(test)]
pub(crate) fn parse_users(value: Value) -> Vec<User> {
    seed::users_from_value(value).unwrap()
}
