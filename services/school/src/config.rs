use std::path::PathBuf;

/// School service configuration loaded from environment variables.
#[derive(Debug)]
pub struct SchoolConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3110). Env var: `SCHOOL_PORT`.
    pub school_port: u16,
    /// Public base URL embedded in certificate emails (default
    /// "http://localhost:3110"). Env var: `BASE_URL`.
    pub base_url: String,
    /// Directory certificate PDFs are written to (default "certificates").
    /// Env var: `CERTIFICATES_DIR`.
    pub certificates_dir: PathBuf,
    /// SMTP connection URL (e.g. "smtp://mail:25").
    pub smtp_url: String,
    /// From address for outgoing mail (e.g. "Campus <noreply@example.com>").
    pub mail_from: String,
}

impl SchoolConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            school_port: std::env::var("SCHOOL_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3110),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3110".to_owned()),
            certificates_dir: std::env::var("CERTIFICATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("certificates")),
            smtp_url: std::env::var("SMTP_URL").expect("SMTP_URL"),
            mail_from: std::env::var("MAIL_FROM").expect("MAIL_FROM"),
        }
    }
}
