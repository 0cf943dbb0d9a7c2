mod clock;
mod user;

pub use clock::*;
pub use user::*;
