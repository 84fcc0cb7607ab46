//! Game publisher API integration
//!
//! Token exchange and the per-character profile client. All per-character
//! failures are local (`FetchFailure`); only the token exchange is fatal.

pub mod client;
pub mod token;

// Re-export commonly used types
pub use client::{
    build_http_client, CharacterApi, CharacterSummary, DocumentFetch, FetchFailure,
    HttpCharacterApi, ProfileDocument, PvpSummary,
};
pub use token::request_access_token;
