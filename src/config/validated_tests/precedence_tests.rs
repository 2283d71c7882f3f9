//! Tests for CLI vs TOML precedence rules.

use std::path::Path;

use crate::compile::ScaffoldTemplate;
use crate::context::RootContext;

use super::*;

mod cli_precedence {
    use super::*;

    #[test]
    fn cli_root_overrides_toml() {
        let cli = cli(&["--root", "/cli"]);
        let toml = toml(
            r#"
            [paths]
            root = "/toml"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.paths.root(), Path::new("/cli"));
    }

    #[test]
    fn cli_context_overrides_toml() {
        let cli = cli(&["--root", "/app", "--context", "Development"]);
        let toml = toml(
            r#"
            [context]
            name = "Production"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.context.root(), RootContext::Development);
    }

    #[test]
    fn cli_console_args_replace_toml() {
        let cli = cli(&["--root", "/app", "--console-arg", "cli-arg"]);
        let toml = toml(
            r#"
            [console]
            binary = "php"
            args = ["toml-a", "toml-b"]
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.console.program(), Path::new("php"));
        assert_eq!(config.console.args(), ["cli-arg"]);
    }

    #[test]
    fn cli_scaffold_overrides_toml() {
        let cli = cli(&["--root", "/app", "--scaffold-template", "cli.php"]);
        let toml = toml(
            r#"
            [scaffold]
            template = "toml.php"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.scaffold, ScaffoldTemplate::File("cli.php".into()));
    }
}

mod toml_fallback {
    use super::*;

    #[test]
    fn toml_values_used_without_cli() {
        let cli = cli(&[]);
        let toml = toml(
            r#"
            [paths]
            root = "/app/public"
            composer_root = "/app"

            [context]
            name = "Production/Staging"

            [console]
            args = ["--no-ansi"]
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.paths.root(), Path::new("/app/public"));
        assert_eq!(config.paths.composer_root(), Path::new("/app"));
        assert_eq!(config.context.to_string(), "Production/Staging");
        assert_eq!(config.console.args(), ["--no-ansi"]);
    }
}

mod defaults {
    use super::*;

    #[test]
    fn defaults_without_toml() {
        let cli = cli(&["--root", "/app"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.paths.composer_root(), Path::new("/app"));
        assert!(config.console.args().is_empty());
        assert_eq!(
            config.console.program(),
            Path::new(crate::config::defaults::CONSOLE_BINARY)
        );
        assert_eq!(config.scaffold, ScaffoldTemplate::Embedded);
        assert!(!config.verbose);
    }

    #[test]
    fn verbose_flag() {
        let cli = cli(&["--root", "/app", "-v"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();
        assert!(config.verbose);
    }
}
