//! Route paths and auth constants.

/// Prefix of every authenticated route.
pub const API_PREFIX: &str = "/api";

/// Mount point of the local assets directory.
pub const ASSETS_ROUTE: &str = "/assets";

/// `iss` claim of access tokens accepted by the API.
pub const JWT_ISSUER: &str = "tubely-access";

/// Extra room on top of the file cap for multipart boundaries and part headers.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;
