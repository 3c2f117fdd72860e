pub mod credentials;
pub mod sheets;

// Re-export commonly used types
pub use credentials::*;
