#[cfg(test)]
mod tests {
    use crate::config::{
        ConfigBuilder, ConfigError, ConfigLoader, LogFormat, LogLevel, SerprankConfig,
        validate_credentials, validation,
    };
    use figment::providers::{Format, Toml};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = SerprankConfig::default();
        assert_eq!(config.scoring.base_weight, 0.6);
        assert_eq!(config.scoring.recency_weight, 0.4);
        assert_eq!(config.search_api.endpoint, "https://serpapi.com/search.json");
        assert_eq!(config.search_api.results_per_page, 10);
        assert_eq!(config.search_api.max_pages, 5);
        assert_eq!(config.store.url, "http://localhost:9200");
        assert_eq!(config.store.index, "search_results");
        assert_eq!(config.store.scroll_keep_alive, "2m");
        assert_eq!(
            config.export.training_path(),
            PathBuf::from("output/ranking_training_data.jsonl")
        );
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_weights(0.7, 0.3, 14.0)
            .with_search_api_key("serp-key")
            .with_store_url("https://my-deployment.es.us-east-1.aws.found.io")
            .with_store_api_key("es-key")
            .with_output_dir("/tmp/serprank")
            .with_log_level(LogLevel::Debug)
            .build()
            .unwrap();

        assert_eq!(config.scoring.decay_days, 14.0);
        assert_eq!(config.search_api.api_key.as_deref(), Some("serp-key"));
        assert!(config.store.is_cloud_deployment());
        assert_eq!(
            config.export.prompt_path(),
            PathBuf::from("/tmp/serprank/vertex_ready.jsonl")
        );
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_validation() {
        assert!(ConfigBuilder::new().build().is_ok());
        assert!(validation::validate_config(&SerprankConfig::default()).is_ok());

        let bad_decay = ConfigBuilder::new().with_weights(0.6, 0.4, 0.0).build();
        assert!(matches!(bad_decay, Err(ConfigError::ValidationError(_))));

        let bad_url = ConfigBuilder::new().with_store_url("localhost:9200").build();
        assert!(matches!(bad_url, Err(ConfigError::ValidationError(_))));

        let bad_index = ConfigBuilder::new().with_index("  ").build();
        assert!(bad_index.is_err());
    }

    #[test]
    fn test_validate_credentials() {
        let missing = validate_credentials(&SerprankConfig::default());
        match missing {
            Err(ConfigError::MissingCredentials(vars)) => assert_eq!(vars, vec!["SERPAPI_KEY"]),
            other => panic!("Unexpected result: {:?}", other),
        }

        let local = ConfigBuilder::new()
            .with_search_api_key("k")
            .build()
            .unwrap();
        assert!(validate_credentials(&local).is_ok());

        // Without a store key the URL alone does not make a deployment hosted
        let no_key = ConfigBuilder::new()
            .with_search_api_key("k")
            .with_store_url("https://x.es.io")
            .build()
            .unwrap();
        assert!(!no_key.store.is_cloud_deployment());
        assert!(validate_credentials(&no_key).is_ok());
    }

    #[test]
    fn test_predefined_configs() {
        let dev = ConfigBuilder::development().build().unwrap();
        let test = ConfigBuilder::testing().build().unwrap();

        assert_eq!(dev.logging.level, LogLevel::Debug);
        assert_eq!(dev.logging.format, LogFormat::Pretty);
        assert_eq!(test.export.output_dir, PathBuf::from("./test_output"));
        assert_eq!(test.store.index, "search_results_test");
    }

    #[test]
    fn test_loader_merges_toml() {
        let toml = r#"
            [scoring]
            decay_days = 7.0

            [store]
            index = "news"
            timeout = "5s"

            [logging]
            level = "warn"
            format = "json"
        "#;

        let mut loader = ConfigLoader::new();
        loader.merge(Toml::string(toml));
        let config = loader.extract().unwrap();

        assert_eq!(config.scoring.decay_days, 7.0);
        assert_eq!(config.scoring.base_weight, 0.6);
        assert_eq!(config.store.index, "news");
        assert_eq!(config.store.timeout, Duration::from_secs(5));
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SERPRANK_STORE__INDEX", "from_env");
            jail.set_env("SERPRANK_SCORING__BASE_WEIGHT", "0.8");
            jail.set_env("SERPAPI_KEY", "legacy-key");
            jail.set_env("ELASTIC_URL", "http://es.internal:9200");

            let config = ConfigLoader::new()
                .load_legacy_env()
                .load_env()
                .extract()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.store.index, "from_env");
            assert_eq!(config.scoring.base_weight, 0.8);
            assert_eq!(config.search_api.api_key.as_deref(), Some("legacy-key"));
            assert_eq!(config.store.url, "http://es.internal:9200");
            Ok(())
        });
    }

    #[test]
    fn test_loader_prefixed_env_beats_legacy() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ELASTIC_URL", "http://legacy:9200");
            jail.set_env("SERPRANK_STORE__URL", "http://prefixed:9200");

            let config = ConfigLoader::new()
                .load_legacy_env()
                .load_env()
                .extract()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.store.url, "http://prefixed:9200");
            Ok(())
        });
    }

    #[test]
    fn test_loader_missing_file() {
        let mut loader = ConfigLoader::new();
        assert!(matches!(
            loader.load_file("/definitely/not/here.toml"),
            Err(ConfigError::FileLoadError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = ConfigBuilder::new()
            .with_search_api_key("k")
            .with_output_dir("/tmp/out")
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SerprankConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_log_enums_parse() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("loud".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Json.to_string(), "json");
    }
}
