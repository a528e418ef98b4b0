pub const SESSION_LIFETIME_HOURS: i64 = 1;
pub const TOKEN_PREFIX: &str = "Token ";

pub const MIN_PASSWORD_LENGTH: usize = 5;

pub const MEDIA_SUBDIR: &str = "recipe";
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub const DB_CONNECT_ATTEMPTS: u32 = 30;
pub const DB_CONNECT_INTERVAL_SECONDS: u64 = 1;
