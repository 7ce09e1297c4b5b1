pub mod contacts;
pub mod core;

pub use contacts::{ContactsError, ContactsService};
pub use crate::core::config::ContactsConfig;
