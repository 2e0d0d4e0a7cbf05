//! The user data store: catalogue state, the views derived from it and the
//! JSON document it is persisted as.

pub mod catalogue;
pub mod error;
pub mod query;
pub mod schema;
pub mod transfer;
