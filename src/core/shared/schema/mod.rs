pub mod contacts;
pub use self::contacts::*;
