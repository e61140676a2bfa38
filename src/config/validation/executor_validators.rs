//! Executor validators

use super::Validate;
use crate::config::models::ExecutorsConfig;
use url::Url;

impl Validate for ExecutorsConfig {
    fn validate(&self) -> Result<(), String> {
        for (function_type, executor) in self {
            if let Some(endpoint) = &executor.endpoint {
                let url = Url::parse(endpoint).map_err(|e| {
                    format!("Executor '{}' has invalid endpoint: {}", function_type, e)
                })?;
                match url.scheme() {
                    "http" | "https" => {}
                    scheme => {
                        return Err(format!(
                            "Executor '{}' endpoint must use http:// or https://, got: {}",
                            function_type, scheme
                        ));
                    }
                }
            }
            if executor.max_concurrency == Some(0) {
                return Err(format!(
                    "Executor '{}' max_concurrency must be greater than 0",
                    function_type
                ));
            }
        }
        Ok(())
    }
}
