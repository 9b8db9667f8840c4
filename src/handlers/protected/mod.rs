// handlers/protected/mod.rs - Handlers behind the bearer token gate
//
// Route prefixes: /quotes, /character/*, /api/*
// Every handler here runs only after auth_middleware has attached an AuthUser.

pub mod character;
pub mod diagnostic;
pub mod favorites;
pub mod quotes;

pub use character::{character_get, character_list, character_quotes};
pub use diagnostic::api_test;
pub use favorites::{favorites_create, favorites_delete, favorites_list};
pub use quotes::quote_list;
