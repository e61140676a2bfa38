//! Configuration loading and validation
//!
//! Loads YAML the way the binary does and checks that bad configurations
//! are rejected before any server state is built.

#[cfg(test)]
mod tests {
    use functions_gateway::config::{Config, RateLimitRule};
    use functions_gateway::core::registry::FunctionType;
    use functions_gateway::server::AppState;
    use functions_gateway::server::builder::load_config;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_full_config_builds_state() {
        let file = write_config(
            r#"
server:
  host: "127.0.0.1"
  port: 8088
rate_limit:
  limits:
    ip:
      window_ms: 60000
      max_requests: 100
    function:
      window_ms: 1000
      max_requests: 10
  endpoint_limits:
    "POST /functions/*":
      window_ms: 1000
      max_requests: 20
  whitelist_ips: ["10.0.0.0/8"]
executors:
  code:
    endpoint: "http://127.0.0.1:9100/execute"
    max_concurrency: 4
functions:
  - id: "echo"
    version: "1.0.0"
    language: "typescript"
    source: "export default (x) => x"
  - id: "writer"
    version: "1.0.0"
    type: "generative"
    timeoutMs: 5000
"#,
        );

        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config.server().port, 8088);
        assert_eq!(
            config.rate_limit().limits["function"],
            RateLimitRule::new(1000, 10)
        );
        assert_eq!(config.functions().len(), 2);
        assert_eq!(config.functions()[1].descriptor.timeout_ms, Some(5000));

        let state = AppState::from_config(config).unwrap();
        assert_eq!(
            state.limiter.rule_names(),
            vec!["ip", "function", "POST /functions/*"]
        );
        let slot = state.dispatcher.executors().get(FunctionType::Code).unwrap();
        assert_eq!(slot.available_permits(), Some(4));
    }

    #[tokio::test]
    async fn test_unknown_dimension_rejected() {
        let file = write_config(
            r#"
rate_limit:
  limits:
    country:
      window_ms: 1000
      max_requests: 1
"#,
        );
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("country"));
    }

    #[tokio::test]
    async fn test_bad_executor_endpoint_rejected() {
        let file = write_config(
            r#"
executors:
  agentic:
    endpoint: "ftp://agents.internal"
"#,
        );
        assert!(Config::from_file(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_unparseable_yaml_rejected() {
        let file = write_config("server: [unclosed");
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_config_round_trips_through_yaml() {
        let mut config = Config::default();
        config
            .gateway
            .rate_limit
            .endpoint_limits
            .insert("GET /functions/*".to_string(), RateLimitRule::new(500, 5));

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("GET /functions/*"));
        assert!(yaml.contains("window_ms: 500"));
    }
}
