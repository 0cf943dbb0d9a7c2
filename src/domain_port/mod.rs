// store

mod refresh_token_store;

pub use refresh_token_store::*;

// repo

mod user_directory;

pub use user_directory::*;
