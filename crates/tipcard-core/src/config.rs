use serde::{Deserialize, Serialize};

/// The fixed demo credential pair.
///
/// Demo sign-in is always available, including with no network and an empty
/// cache, so support staff and reviewers can walk the product without a
/// provisioned backend account.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DemoCredentials {
    pub email: String,
    pub password: String,
    pub org_id: String,
}

impl Default for DemoCredentials {
    fn default() -> Self {
        Self {
            email: "demo@hotel.com".to_string(),
            password: "demo123".to_string(),
            org_id: "DEMO1234".to_string(),
        }
    }
}

/// Application configuration, loaded from `config.toml` when present.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL embedded in per-room tip QR codes.
    #[serde(default = "default_tip_base_url")]
    pub tip_base_url: String,
    #[serde(default)]
    pub demo: DemoCredentials,
}

fn default_tip_base_url() -> String {
    "https://tip.hotelapp.com".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tip_base_url: default_tip_base_url(),
            demo: DemoCredentials::default(),
        }
    }
}
