//! Admission control through the HTTP surface

#[cfg(test)]
mod tests {
    use crate::common::{START, TestGateway, assert_rate_limit_headers, client_request};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use functions_gateway::server::create_app;
    use serde_json::Value;

    const WINDOW_RESET_SECS: u64 = (START + 60_000) / 1000;

    #[actix_web::test]
    async fn test_ip_quota_allows_then_denies() {
        let gateway = TestGateway::builder().ip_limit(60_000, 3).build();
        let app = test::init_service(create_app(gateway.data())).await;

        for remaining in [2u64, 1, 0] {
            let req = client_request("POST", "/functions/echo", "203.0.113.1").to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert_rate_limit_headers(&res, 3, remaining, WINDOW_RESET_SECS);
        }

        let req = client_request("POST", "/functions/echo", "203.0.113.1").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_rate_limit_headers(&res, 3, 0, WINDOW_RESET_SECS);
        assert_eq!(res.headers().get("retry-after").unwrap(), "60");

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Too Many Requests");
        assert_eq!(
            body["message"],
            "Rate limit exceeded for ip. Try again in 60 seconds."
        );
        assert_eq!(body["retryAfter"], 60);
        assert_eq!(body["resetAt"], START + 60_000);
    }

    #[actix_web::test]
    async fn test_denied_request_never_reaches_dispatcher() {
        let gateway = TestGateway::builder().ip_limit(60_000, 1).build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/echo", "203.0.113.2").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        // A function that does not exist would 404 if dispatched
        let req = client_request("POST", "/functions/missing", "203.0.113.2").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(res.headers().get("x-execution-time").is_none());
    }

    #[actix_web::test]
    async fn test_window_resets_after_expiry() {
        let gateway = TestGateway::builder().ip_limit(1_000, 1).build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("GET", "/functions/echo", "203.0.113.3").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        let req = client_request("GET", "/functions/echo", "203.0.113.3").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );

        gateway.advance(1_000);

        let req = client_request("GET", "/functions/echo", "203.0.113.3").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_rate_limit_headers(&res, 1, 0, (START + 2_000) / 1000);
    }

    #[actix_web::test]
    async fn test_clients_are_isolated() {
        let gateway = TestGateway::builder().ip_limit(60_000, 1).build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("GET", "/functions/echo", "198.51.100.1").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        let req = client_request("GET", "/functions/echo", "198.51.100.2").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_cloudflare_header_wins_over_forwarded_for() {
        let gateway = TestGateway::builder().ip_limit(60_000, 1).build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("GET", "/functions/echo", "198.51.100.7")
            .insert_header(("cf-connecting-ip", "192.0.2.50"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        // Same forwarded address, different edge address: separate bucket
        let req = client_request("GET", "/functions/echo", "198.51.100.7")
            .insert_header(("cf-connecting-ip", "192.0.2.51"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = client_request("GET", "/functions/echo", "10.9.9.9")
            .insert_header(("cf-connecting-ip", "192.0.2.50"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn test_bypass_paths_skip_admission() {
        let gateway = TestGateway::builder()
            .ip_limit(60_000, 1)
            .bypass("/functions/hello")
            .build();
        let app = test::init_service(create_app(gateway.data())).await;

        for _ in 0..5 {
            let req = client_request("GET", "/health", "203.0.113.9").to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert!(res.headers().get("x-ratelimit-limit").is_none());

            let req = client_request("GET", "/functions/hello", "203.0.113.9").to_request();
            let res = test::call_service(&app, req).await;
            assert_ne!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        }

        // Bypassed traffic did not consume quota
        let req = client_request("GET", "/functions/echo", "203.0.113.9").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_whitelisted_network_is_never_limited() {
        let gateway = TestGateway::builder()
            .ip_limit(60_000, 1)
            .whitelist("10.0.0.0/8")
            .build();
        let app = test::init_service(create_app(gateway.data())).await;

        for _ in 0..5 {
            let req = client_request("POST", "/functions/echo", "10.1.2.3").to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert!(res.headers().get("x-ratelimit-remaining").is_none());
        }

        let req = client_request("POST", "/functions/echo", "11.1.2.3").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        let req = client_request("POST", "/functions/echo", "11.1.2.3").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn test_function_dimension_is_shared_across_clients() {
        let gateway = TestGateway::builder()
            .limit("function", 60_000, 2)
            .build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/echo", "198.51.100.10").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        let req = client_request("POST", "/functions/echo", "198.51.100.11").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = client_request("POST", "/functions/echo", "198.51.100.12").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        let body: Value = test::read_body_json(res).await;
        assert!(body["message"].as_str().unwrap().contains("function"));

        // Another function has its own window
        let req = client_request("POST", "/functions/hello", "198.51.100.12").to_request();
        assert_ne!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn test_endpoint_pattern_limit() {
        let gateway = TestGateway::builder()
            .ip_limit(60_000, 100)
            .endpoint_limit("POST /functions/*", 10_000, 1)
            .build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = client_request("POST", "/functions/echo", "198.51.100.20").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        // The pattern covers every function id
        let req = client_request("POST", "/functions/hello", "198.51.100.21").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers().get("retry-after").unwrap(), "10");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body["message"],
            "Rate limit exceeded for endpoint. Try again in 10 seconds."
        );

        // Other methods do not match the pattern
        let req = client_request("GET", "/functions/echo", "198.51.100.22").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_disabled_limiter_admits_everything() {
        let gateway = TestGateway::builder()
            .ip_limit(60_000, 1)
            .rate_limiting(false)
            .build();
        let app = test::init_service(create_app(gateway.data())).await;

        for _ in 0..3 {
            let req = client_request("GET", "/functions/echo", "203.0.113.30").to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert!(res.headers().get("x-ratelimit-limit").is_none());
        }
    }

    #[actix_web::test]
    async fn test_missing_client_address_shares_unknown_bucket() {
        let gateway = TestGateway::builder().ip_limit(60_000, 1).build();
        let app = test::init_service(create_app(gateway.data())).await;

        let req = test::TestRequest::get().uri("/functions/echo").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/functions/hello").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
