use rand::RngCore;

use app_api::AppContext;

#[derive(Clone)]
pub struct HttpState {
    pub context: AppContext,
    token: String,
}

impl HttpState {
    pub fn new(context: AppContext, token: String) -> Self {
        Self { context, token }
    }

    pub fn token_matches(&self, candidate: Option<&str>) -> bool {
        candidate == Some(self.token.as_str())
    }
}

/// Random hex token that local clients must echo in the `x-water-token`
/// header.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}
