pub mod schema;
#[cfg(test)]
pub mod test_utils;
pub mod utils;

pub use schema::*;
