use crate::env::{flag_or, parse_or, string_or};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub metrics_port: u16,
    /// Apply pending migrations before accepting traffic
    pub run_migrations: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: string_or("SERVER_HOST", "0.0.0.0"),
            port: parse_or("SERVER_PORT", 4000),
            metrics_port: parse_or("METRICS_PORT", 9090),
            run_migrations: flag_or("RUN_MIGRATIONS", true),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
