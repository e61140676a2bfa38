//! Invocation pipeline through the HTTP surface

#[cfg(test)]
mod tests {
    use crate::common::{
        EchoExecutor, FailingExecutor, SleepyExecutor, TestGateway, assert_error_body,
        client_request,
    };
    use actix_web::http::StatusCode;
    use actix_web::test;
    use functions_gateway::server::create_app;
    use functions_gateway::core::executors::ExecutorError;
    use functions_gateway::core::registry::{FunctionDescriptor, FunctionType};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;

    #[actix_web::test]
    async fn test_health_check() {
        let gateway = TestGateway::builder().build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["rate_limiting"], true);
    }

    #[actix_web::test]
    async fn test_invoke_latest_version() {
        let gateway = TestGateway::builder().build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/echo", "203.0.113.1")
            .set_json(json!({"name": "ada"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let elapsed: u64 = res
            .headers()
            .get("x-execution-time")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["input"], json!({"name": "ada"}));
        assert_eq!(body["version"], "2.0.0");
        assert_eq!(body["method"], "POST");
        assert_eq!(body["hasSource"], true);
        assert_eq!(body["_meta"]["executorType"], "code");
        assert_eq!(body["_meta"]["executedWith"], "echo-runtime");
        assert_eq!(body["_meta"]["duration"], elapsed);
    }

    #[actix_web::test]
    async fn test_invoke_pinned_version() {
        let gateway = TestGateway::builder().build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/echo?version=1.0.0", "203.0.113.1")
            .set_json(json!({}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["version"], "1.0.0");
    }

    #[actix_web::test]
    async fn test_unknown_function_and_version() {
        let gateway = TestGateway::builder().build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("GET", "/functions/nope", "203.0.113.1").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers().get("x-execution-time").unwrap(), "0");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "Function 'nope' not found"}));

        let req = client_request("GET", "/functions/echo?version=9.9.9", "203.0.113.1").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_invalid_json_body() {
        let gateway = TestGateway::builder().build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/echo", "203.0.113.1")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_error_body(&body, "Invalid JSON");
    }

    #[actix_web::test]
    async fn test_oversized_body_gets_json_error() {
        let gateway = TestGateway::builder().max_body_size(16).build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/echo", "203.0.113.1")
            .insert_header(("content-type", "text/plain"))
            .set_payload("x".repeat(17))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(res.headers().get("content-type").unwrap(), "application/json");
        assert_eq!(res.headers().get("x-execution-time").unwrap(), "0");

        let body: Value = test::read_body_json(res).await;
        assert_error_body(&body, "size limit");

        let req = client_request("POST", "/functions/echo", "203.0.113.1")
            .insert_header(("content-type", "text/plain"))
            .set_payload("x".repeat(16))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_form_and_text_bodies() {
        let gateway = TestGateway::builder().build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/echo", "203.0.113.1")
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload("a=1&b=two+words")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["input"], json!({"a": "1", "b": "two words"}));

        let req = client_request("PUT", "/functions/echo", "203.0.113.1")
            .insert_header(("content-type", "text/plain"))
            .set_payload("hello")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["input"], "hello");
        assert_eq!(body["method"], "PUT");
    }

    #[actix_web::test]
    async fn test_empty_body_is_empty_object() {
        let gateway = TestGateway::builder().build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("GET", "/functions/echo/", "203.0.113.1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["input"], json!({}));
    }

    #[actix_web::test]
    async fn test_type_without_executor_is_unavailable() {
        let gateway = TestGateway::builder().build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/writer", "203.0.113.1").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = test::read_body_json(res).await;
        assert_error_body(&body, "generative");
        assert_eq!(body["_meta"]["executorType"], "generative");
    }

    #[actix_web::test]
    async fn test_unknown_function_type_is_not_implemented() {
        let gateway = TestGateway::builder().build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/teleport", "203.0.113.1").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);

        let body: Value = test::read_body_json(res).await;
        assert_error_body(&body, "quantum");
        assert_eq!(body["_meta"]["executorType"], "quantum");
    }

    #[actix_web::test]
    async fn test_executor_failure_maps_to_500() {
        let gateway = TestGateway::builder()
            .executor(
                FunctionType::Generative,
                Arc::new(FailingExecutor(ExecutorError::Failed("model refused".into()))),
                None,
            )
            .build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/writer", "203.0.113.1").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.headers().get("x-execution-time").is_some());

        let body: Value = test::read_body_json(res).await;
        assert_error_body(&body, "model refused");
        assert_eq!(body["_meta"]["executorType"], "generative");
    }

    #[actix_web::test]
    async fn test_execution_timeout_is_504() {
        let gateway = TestGateway::builder()
            .executor(
                FunctionType::Agentic,
                Arc::new(SleepyExecutor(Duration::from_millis(500))),
                None,
            )
            .build();
        let app = test::init_service(create_app(gateway.data())).await;

        // planner declares a 50ms budget
        let req = client_request("POST", "/functions/planner", "203.0.113.1").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);

        let body: Value = test::read_body_json(res).await;
        assert_error_body(&body, "timed out after 50ms");
        assert_eq!(body["_meta"]["executorType"], "agentic");
    }

    #[actix_web::test]
    async fn test_default_budget_applies_to_untimed_functions() {
        let gateway = TestGateway::builder()
            .default_timeout_ms(30)
            .executor(
                FunctionType::Code,
                Arc::new(SleepyExecutor(Duration::from_millis(500))),
                None,
            )
            .build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/hello", "203.0.113.1").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[actix_web::test]
    async fn test_scalar_result_is_wrapped() {
        let gateway = TestGateway::builder()
            .executor(
                FunctionType::Code,
                Arc::new(SleepyExecutor(Duration::from_millis(1))),
                None,
            )
            .build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/hello", "203.0.113.1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"], "done");
        assert_eq!(body["_meta"]["executedWith"], "sleepy");
    }

    #[actix_web::test]
    async fn test_functions_registered_after_startup_are_visible() {
        let gateway = TestGateway::builder()
            .executor(FunctionType::Human, Arc::new(EchoExecutor), None)
            .build();
        let app = test::init_service(create_app(gateway.data())).await;

        gateway.registry.register(
            FunctionDescriptor::new("review", "1.0.0").with_type("human"),
            None,
        );

        let req = client_request("POST", "/functions/review", "203.0.113.1").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["hasSource"], false);
        assert_eq!(body["_meta"]["executorType"], "human");
    }

    #[actix_web::test]
    async fn test_request_id_is_echoed() {
        let gateway = TestGateway::builder().build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("GET", "/functions/echo", "203.0.113.1")
            .insert_header(("x-request-id", "req-42"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.headers().get("x-request-id").unwrap(), "req-42");

        let req = client_request("GET", "/functions/echo", "203.0.113.1").to_request();
        let res = test::call_service(&app, req).await;
        let generated = res.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(generated).is_ok());
    }
}
