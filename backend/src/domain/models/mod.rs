pub mod identity;
pub mod user;

pub use identity::*;
pub use user::*;
