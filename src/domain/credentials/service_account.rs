use serde::Deserialize;

/// The parts of a Google service-account JSON key the broker needs.
#[derive(Deserialize, Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Keys pasted through environment variables or hand-edited files often carry
    /// literal `\n` sequences instead of line breaks, which PEM parsing rejects.
    pub fn normalized(mut self) -> Self {
        self.private_key = self.private_key.replace("\\n", "\n");
        self
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
