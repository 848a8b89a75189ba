//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_platform_section() {
        let toml = r#"
            [platform]
            base_url = "https://bmp.example.com/api/v1"
            access_token = "Bearer abc123"
            sender = "6287854171391"
            platform = "WA"
            channel = "business"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let platform = &config.platform;

        assert_eq!(
            platform.base_url.as_deref(),
            Some("https://bmp.example.com/api/v1")
        );
        assert_eq!(platform.access_token.as_deref(), Some("Bearer abc123"));
        assert_eq!(platform.sender.as_deref(), Some("6287854171391"));
        assert_eq!(platform.platform.as_deref(), Some("WA"));
        assert_eq!(platform.channel.as_deref(), Some("business"));
    }

    #[test]
    fn parse_remaining_sections() {
        let toml = r#"
            [http]
            timeout_ms = 2500
            max_attempts = 5

            [log]
            level = "debug"

            [server]
            port = 8080
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.http.timeout_ms, Some(2500));
        assert_eq!(config.http.max_attempts, Some(5));
        assert_eq!(config.log.level.as_deref(), Some("debug"));
        assert_eq!(config.server.port, Some(8080));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.platform.base_url.is_none());
        assert!(config.http.timeout_ms.is_none());
        assert!(config.log.level.is_none());
        assert!(config.server.port.is_none());
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_section_is_rejected() {
        assert!(TomlConfig::parse("[database]\nurl = \"x\"").is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(TomlConfig::parse("[http]\nretries = 3").is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(TomlConfig::parse("[server]\nport = \"eighty\"").is_err());
    }

    #[test]
    fn negative_port_is_rejected() {
        assert!(TomlConfig::parse("[server]\nport = -1").is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert_eq!(config.log.level.as_deref(), Some("info"));
        assert!(config.platform.base_url.is_none());
    }

    #[test]
    fn template_names_every_environment_variable() {
        let template = default_config_template();

        for var in [
            "BMP_API_BASE_URL",
            "BMP_ACCESS_TOKEN",
            "BMP_SENDER_MSISDN",
            "BMP_PLATFORM",
            "BMP_CHANNEL",
            "REQUEST_TIMEOUT_MS",
            "RETRY_MAX_ATTEMPTS",
            "LOG_LEVEL",
            "PORT",
        ] {
            assert!(template.contains(var), "template should mention {var}");
        }
    }
}
