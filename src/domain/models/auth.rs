use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";

/// Access token claims issued by the external identity service for staff.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,

    #[serde(rename = "https://kbox.co.il/claims/role")]
    pub role: String,

    /// Present when the token is delivered as a cookie; echoed in `X-CSRF-Token`.
    #[serde(rename = "https://kbox.co.il/claims/csrf", default)]
    pub csrf_token: Option<String>,
}
