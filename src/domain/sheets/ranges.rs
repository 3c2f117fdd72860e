// For now, the ranges are hardcoded defaults; each one can be overridden in the config file

pub mod config {
    pub const SHEET: &str = "ReelShareConfig";
    /// API key, model and server address, one per row.
    pub const RO_VALUES: &str = "B1:B3";
}

pub mod licenses {
    pub const SHEET: &str = "Suno";
    pub const RO_SERVER: &str = "B1";
    pub const RW_ACTIVE: &str = "A2:B2";
    /// Open-ended: account in column A, license key in column B.
    pub const RO_LIST: &str = "A10:B";
}
