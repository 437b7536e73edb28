use std::env;

/// Development signing key. Serving with this value leaves sessions forgeable,
/// so `serve` logs a warning when it is still in place.
pub const DEV_SECRET_KEY: &str = "dev";

#[derive(Clone)]
pub struct Config {
    /// Filesystem path of the SQLite database.
    pub database: String,
    /// Secret used to sign session cookies. Must stay stable across restarts
    /// or every outstanding session becomes invalid.
    pub secret_key: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        let database = env::var("DATABASE").unwrap_or_else(|_| "basicblog.db".into());
        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| DEV_SECRET_KEY.into());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3030".into());

        Config {
            database,
            secret_key,
            bind_addr,
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.secret_key == DEV_SECRET_KEY
    }
}
