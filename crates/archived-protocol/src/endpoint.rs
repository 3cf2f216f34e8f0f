pub const PROTOCOL_VERSION: u32 = 1;

/// HTTP endpoint paths.
pub mod endpoints {
    pub const READ: &str = "/v1/read";
    pub const CREATE: &str = "/v1/create";
    pub const MOVE: &str = "/v1/move";
    pub const DELETE: &str = "/v1/delete";
    pub const SEARCH: &str = "/v1/search";
    pub const IMAGE: &str = "/v1/image";
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: PROTOCOL_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_defaults() {
        let h = HealthResponse::default();
        assert_eq!(h.status, "ok");
        assert_eq!(h.protocol_version, 1);
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(endpoints::HEALTH, "/v1/health");
        assert_eq!(endpoints::READ, "/v1/read");
        assert_eq!(endpoints::SEARCH, "/v1/search");
    }
}
