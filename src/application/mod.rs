pub mod credential_store;
pub mod token_lifecycle;

pub use credential_store::CredentialStore;
pub use token_lifecycle::TokenManager;
