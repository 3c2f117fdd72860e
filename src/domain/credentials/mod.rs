pub mod access_token;
pub mod config_record;
pub mod license;
pub mod service_account;

pub use access_token::{AccessToken, SAFETY_MARGIN};
pub use config_record::ConfigRecord;
pub use license::{LicenseEntry, LicenseRows};
pub use service_account::ServiceAccountKey;
