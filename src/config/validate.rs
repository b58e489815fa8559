use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.max_connections == 0 {
        errors.push("database.max_connections must be > 0".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    if cfg
        .csrf
        .token
        .as_deref()
        .is_some_and(|token| token.trim().is_empty())
    {
        errors.push("csrf.token must not be blank when set".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::AppConfig;

    #[test]
    fn defaults_are_valid() {
        validate(&AppConfig::default()).expect("default config should validate");
    }

    #[test]
    fn collects_every_problem_in_one_error() {
        let mut cfg = AppConfig::default();
        cfg.general.host = "  ".to_string();
        cfg.database.max_connections = 2;
        cfg.database.min_idle = 5;
        cfg.csrf.token = Some(String::new());

        let message = validate(&cfg).expect_err("config should be rejected").to_string();
        assert!(message.contains("general.host must not be empty"));
        assert!(message.contains("database.min_idle (5) must be <= database.max_connections (2)"));
        assert!(message.contains("csrf.token must not be blank when set"));
    }

    #[test]
    fn rejects_zero_sized_pool() {
        let mut cfg = AppConfig::default();
        cfg.database.max_connections = 0;
        cfg.database.min_idle = 0;

        let message = validate(&cfg).expect_err("config should be rejected").to_string();
        assert!(message.contains("database.max_connections must be > 0"));
    }
}
