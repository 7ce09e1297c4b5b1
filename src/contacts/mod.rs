//! Companies, people, groups and locations, with phone numbers, email
//! addresses, instant messengers, web sites, street addresses and special
//! dates attached to companies and people.

pub mod error;
pub mod forms;
pub mod models;
pub mod owner;
pub mod service;
pub mod special_dates;
pub mod urls;

pub use error::ContactsError;
pub use owner::{Owner, OwnerKind, OwnerRef};
pub use service::ContactsService;
