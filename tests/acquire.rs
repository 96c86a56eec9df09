use std::time::Duration;

use httpmock::{Method::GET, Method::POST, MockServer};
use pixfall::{
    AcquireConfig, GenerationRequest, ImageAcquirer, ImageModel, Orientation, PollPolicy,
    ProviderKind,
};

fn should_skip() -> bool {
    pixfall::utils::test_support::should_skip_httpmock()
}

fn fast_poll(max_attempts: u32) -> PollPolicy {
    PollPolicy::new(max_attempts, Duration::ZERO, Duration::from_secs(5))
}

fn acquirer_for(server: &MockServer, config: AcquireConfig) -> ImageAcquirer {
    ImageAcquirer::new(
        config
            .with_together_base_url(server.url("/together"))
            .with_bfl_base_url(server.url("/bfl"))
            .with_pollinations_base_url(server.url(""))
            .with_unsplash_base_url(server.url("/unsplash")),
    )
    .with_poll_policy(fast_poll(30))
}

#[tokio::test]
async fn hosted_success_short_circuits_the_chain() {
    if should_skip() {
        return;
    }
    let server = MockServer::start_async().await;
    let together = server
        .mock_async(|when, then| {
            when.method(POST).path("/together/images/generations");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    serde_json::json!({ "data": [{ "url": "https://cdn.example.com/hosted.png" }] })
                        .to_string(),
                );
        })
        .await;
    let bfl_submit = server
        .mock_async(|when, then| {
            when.method(POST).path("/bfl/flux-pro-1.1");
            then.status(200).body("{}");
        })
        .await;
    let pollinations = server
        .mock_async(|when, then| {
            when.method(GET).path_includes("/prompt/");
            then.status(200).body("image bytes");
        })
        .await;

    let acquirer = acquirer_for(
        &server,
        AcquireConfig::default()
            .with_together_api_key("tok-1")
            .with_bfl_api_key("key-1"),
    );
    let outcome = acquirer
        .generate_image("a red fox", Some(ImageModel::FluxSchnellFree))
        .await;

    assert!(outcome.success);
    assert_eq!(
        outcome.image_url.as_deref(),
        Some("https://cdn.example.com/hosted.png")
    );
    assert_eq!(outcome.provider, Some(ProviderKind::Together));
    assert_eq!(together.hits_async().await, 1);
    assert_eq!(bfl_submit.hits_async().await, 0);
    assert_eq!(pollinations.hits_async().await, 0);
}

#[tokio::test]
async fn hosted_failure_falls_through_to_bfl() {
    if should_skip() {
        return;
    }
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/together/images/generations");
            then.status(500).body("internal error");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/bfl/flux-pro-1.1");
            then.status(200)
                .header("content-type", "application/json")
                .body(serde_json::json!({ "id": "job-1" }).to_string());
        })
        .await;
    let poll = server
        .mock_async(|when, then| {
            when.method(GET).path("/bfl/get_result").query_param("id", "job-1");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    serde_json::json!({
                        "status": "Ready",
                        "result": { "sample": "https://cdn.example.com/job-1.png" }
                    })
                    .to_string(),
                );
        })
        .await;

    let acquirer = acquirer_for(
        &server,
        AcquireConfig::default()
            .with_together_api_key("tok-1")
            .with_bfl_api_key("key-1"),
    );
    let outcome = acquirer.generate_image("a red fox", None).await;

    assert!(outcome.success);
    assert_eq!(outcome.provider, Some(ProviderKind::Bfl));
    assert_eq!(
        outcome.image_url.as_deref(),
        Some("https://cdn.example.com/job-1.png")
    );
    assert_eq!(poll.hits_async().await, 1);
}

#[tokio::test]
async fn bfl_error_status_advances_to_the_key_free_fallback() {
    if should_skip() {
        return;
    }
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/bfl/flux-pro-1.1");
            then.status(200)
                .header("content-type", "application/json")
                .body(serde_json::json!({ "id": "job-2" }).to_string());
        })
        .await;
    let poll = server
        .mock_async(|when, then| {
            when.method(GET).path("/bfl/get_result");
            then.status(200)
                .header("content-type", "application/json")
                .body(serde_json::json!({ "status": "Error" }).to_string());
        })
        .await;
    let pollinations = server
        .mock_async(|when, then| {
            when.method(GET).path_includes("/prompt/");
            then.status(200).body("image bytes");
        })
        .await;

    let acquirer = acquirer_for(&server, AcquireConfig::default().with_bfl_api_key("key-1"));
    let outcome = acquirer.generate_image("a red fox", None).await;

    assert!(outcome.success);
    assert_eq!(outcome.provider, Some(ProviderKind::Pollinations));
    assert_eq!(poll.hits_async().await, 1);
    assert_eq!(pollinations.hits_async().await, 1);
}

#[tokio::test]
async fn no_credentials_means_the_fallback_generator_runs() {
    if should_skip() {
        return;
    }
    let server = MockServer::start_async().await;
    let pollinations = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_includes("/prompt/")
                .query_param("width", "1024")
                .query_param("height", "768")
                .query_param("nologo", "true");
            then.status(200).body("image bytes");
        })
        .await;

    let acquirer = acquirer_for(&server, AcquireConfig::default());
    let outcome = acquirer.generate_image("a red fox", None).await;

    assert!(outcome.success);
    assert_eq!(outcome.provider, Some(ProviderKind::Pollinations));
    assert!(outcome.image_url.as_deref().unwrap_or("").contains("seed="));
    assert_eq!(pollinations.hits_async().await, 1);
}

#[tokio::test]
async fn exhausted_chain_surfaces_the_last_error() {
    if should_skip() {
        return;
    }
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/together/images/generations");
            then.status(500).body("hosted down");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/bfl/flux-pro-1.1");
            then.status(500).body("bfl down");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_includes("/prompt/");
            then.status(502).body("generator down");
        })
        .await;

    let acquirer = acquirer_for(
        &server,
        AcquireConfig::default()
            .with_together_api_key("tok-1")
            .with_bfl_api_key("key-1"),
    );
    let outcome = acquirer.generate_image("a red fox", None).await;

    assert!(!outcome.success);
    assert!(outcome.image_url.is_none());
    let message = outcome.error_message.expect("failure carries a message");
    assert!(message.contains("502"), "last error should win: {message}");
}

#[tokio::test]
async fn never_ready_job_times_out_within_the_poll_bound() {
    if should_skip() {
        return;
    }
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/bfl/flux-pro-1.1");
            then.status(200)
                .header("content-type", "application/json")
                .body(serde_json::json!({ "id": "job-3" }).to_string());
        })
        .await;
    let poll = server
        .mock_async(|when, then| {
            when.method(GET).path("/bfl/get_result");
            then.status(200)
                .header("content-type", "application/json")
                .body(serde_json::json!({ "status": "Pending" }).to_string());
        })
        .await;
    // No pollinations mock: the fallback hits an unmatched path and fails,
    // so the request as a whole fails after the poll bound is consumed.
    let acquirer = ImageAcquirer::new(
        AcquireConfig::default()
            .with_bfl_api_key("key-1")
            .with_bfl_base_url(server.url("/bfl"))
            .with_pollinations_base_url(server.url("/nowhere")),
    )
    .with_poll_policy(fast_poll(5));

    let outcome = acquirer.generate_image("a red fox", None).await;

    assert!(!outcome.success);
    assert_eq!(poll.hits_async().await, 5);
}

#[tokio::test]
async fn two_fallback_generations_use_distinct_seeds() {
    if should_skip() {
        return;
    }
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_includes("/prompt/");
            then.status(200).body("image bytes");
        })
        .await;

    let acquirer = acquirer_for(&server, AcquireConfig::default());
    let request = GenerationRequest::new("a red fox")
        .unwrap()
        .with_size(1024, 768)
        .unwrap();

    let first = acquirer.acquire(&request).await.unwrap();
    let second = acquirer.acquire(&request).await.unwrap();
    assert_ne!(first.url, second.url, "seeds must differ between calls");
}

#[tokio::test]
async fn stock_image_prefers_unsplash_when_configured() {
    if should_skip() {
        return;
    }
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/unsplash/search/photos")
                .query_param("query", "mountains")
                .query_param("orientation", "portrait");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    serde_json::json!({
                        "results": [{ "urls": { "regular": "https://images.example.com/m.jpg" } }]
                    })
                    .to_string(),
                );
        })
        .await;
    let pollinations = server
        .mock_async(|when, then| {
            when.method(GET).path_includes("/prompt/");
            then.status(200).body("image bytes");
        })
        .await;

    let acquirer = acquirer_for(
        &server,
        AcquireConfig::default().with_unsplash_access_key("ak-1"),
    );
    let outcome = acquirer.stock_image("mountains", Orientation::Portrait).await;

    assert!(outcome.success);
    assert_eq!(outcome.provider, Some(ProviderKind::Unsplash));
    assert_eq!(search.hits_async().await, 1);
    assert_eq!(pollinations.hits_async().await, 0);
}

#[tokio::test]
async fn stock_image_without_a_key_renders_a_photographic_stand_in() {
    if should_skip() {
        return;
    }
    let server = MockServer::start_async().await;
    let pollinations = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_includes("/prompt/")
                .path_includes("photograph")
                .query_param("width", "768")
                .query_param("height", "1024");
            then.status(200).body("image bytes");
        })
        .await;

    let acquirer = acquirer_for(&server, AcquireConfig::default());
    let outcome = acquirer.stock_image("mountains", Orientation::Portrait).await;

    assert!(outcome.success);
    assert_eq!(outcome.provider, Some(ProviderKind::Pollinations));
    assert_eq!(pollinations.hits_async().await, 1);
}
