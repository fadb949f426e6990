mod parsing;
mod secret;
mod settings;
mod types;

pub(crate) use types::{ConfigError, EvaluationSettings, Settings};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn load_reads_policy_flag() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("EVAL_ADMIN_BYPASS_RESPONSE_CHECK", "yes");

        let settings = Settings::load().expect("settings");
        assert!(settings.evaluation().admin_bypass_response_check);

        std::env::remove_var("EVAL_ADMIN_BYPASS_RESPONSE_CHECK");
        let settings = Settings::load().expect("settings");
        assert!(!settings.evaluation().admin_bypass_response_check);
    }

    #[tokio::test]
    async fn strict_config_requires_database_password() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("POSTGRES_PASSWORD");
        std::env::set_var("EVAL_STRICT_CONFIG", "1");

        let err = Settings::load().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret("POSTGRES_PASSWORD")));

        std::env::remove_var("EVAL_STRICT_CONFIG");
    }

    #[tokio::test]
    async fn rejects_unsupported_jwt_algorithm() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("ALGORITHM", "RS512");

        let err = Settings::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "ALGORITHM", .. }));

        std::env::remove_var("ALGORITHM");
    }

    #[tokio::test]
    async fn server_addr_joins_host_and_port() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("EVAL_HOST", "127.0.0.1");
        std::env::set_var("EVAL_PORT", "9100");

        let settings = Settings::load().expect("settings");
        assert_eq!(settings.server_addr(), "127.0.0.1:9100");

        std::env::remove_var("EVAL_HOST");
        std::env::remove_var("EVAL_PORT");
    }
}
