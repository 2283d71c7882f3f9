//! Tests for TOML configuration parsing.

use std::path::Path;

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_paths_section() {
        let toml = r#"
            [paths]
            root = "/app/public"
            composer_root = "/app"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(config.paths.root.as_deref(), Some(Path::new("/app/public")));
        assert_eq!(config.paths.composer_root.as_deref(), Some(Path::new("/app")));
    }

    #[test]
    fn parse_context_and_console() {
        let toml = r#"
            [context]
            name = "Development/Docker"

            [console]
            binary = "php"
            args = ["vendor/bin/typo3"]
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(config.context.name.as_deref(), Some("Development/Docker"));
        assert_eq!(config.console.binary.as_deref(), Some(Path::new("php")));
        assert_eq!(
            config.console.args,
            Some(vec!["vendor/bin/typo3".to_string()])
        );
    }

    #[test]
    fn parse_scaffold_section() {
        let toml = r#"
            [scaffold]
            template = "conf/AdditionalConfiguration.php.dist"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(
            config.scaffold.template.as_deref(),
            Some(Path::new("conf/AdditionalConfiguration.php.dist"))
        );
    }

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.paths.root.is_none());
        assert!(config.context.name.is_none());
        assert!(config.console.args.is_none());
        assert!(config.scaffold.template.is_none());
    }

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
            [paths]
            web_root = "/app"
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn reject_unknown_sections() {
        let toml = r#"
            [webhook]
            url = "https://example.com"
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();
        assert!(config.paths.root.is_none());
    }

    #[test]
    fn default_template_documents_every_section() {
        let template = default_config_template();
        for section in ["[paths]", "[context]", "[console]", "[scaffold]"] {
            assert!(template.contains(section), "missing {section}");
        }
    }
}
