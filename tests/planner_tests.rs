use mockito::Matcher;
use serde_json::json;
use std::time::Duration;
use itinerary_rs::{
    ChatCompletionRequest, ItineraryError, ItineraryPlanner, ModelClient, OpenAIClient,
    PlaceCatalogEntry, PlannerConfig, TripRequest,
};

fn completion_body(content: &str) -> String {
    json!({
        "id": "gen-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

fn trip(days: usize) -> TripRequest {
    TripRequest::new(
        vec!["Washington".to_string()],
        vec!["Seattle".to_string()],
        days,
    )
}

fn catalog() -> Vec<PlaceCatalogEntry> {
    vec![
        PlaceCatalogEntry::new("Pike Place Market").with_local_image("file:///img/pike.jpg"),
        PlaceCatalogEntry::new("Kerry Park"),
    ]
}

#[tokio::test]
async fn test_plan_against_mock_provider() {
    let mut server = mockito::Server::new_async().await;
    let reply = "```json\n{\"summary\": {\"total_places\": 2}, \"days\": [{\"day\": 1, \"title\": \"Market day\", \"morning\": {\"breakfast\": \"Bagel $6\", \"place_to_visit\": \"Pike Place Market\"}, \"afternoon\": {}, \"evening\": {}}]}\n```\nClosing note: Have fun!";
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "test/model",
            "max_tokens": 8000,
            "response_format": {"type": "json_object"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(reply))
        .create_async()
        .await;

    let config = PlannerConfig::new("test-key")
        .with_base_url(server.url())
        .with_model("test/model")
        .with_timeout(Duration::from_secs(5));
    let itinerary = ItineraryPlanner::new(config)
        .plan(&trip(2), &catalog())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(itinerary.days.len(), 2);
    assert_eq!(itinerary.days[0].title, "Market day");
    assert_eq!(itinerary.days[0].day_image.as_deref(), Some("file:///img/pike.jpg"));
    assert_eq!(itinerary.days[1].morning.breakfast, "Breakfast suggestion");
    assert_eq!(itinerary.extras.closing_note, "Have fun!");
}

#[tokio::test]
async fn test_api_error_message_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": {"message": "No auth credentials found"}}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = OpenAIClient::new("bad-key").with_base_url(server.url());
    let err = client
        .complete(
            ChatCompletionRequest::from_prompt("test/model", "hi"),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, ItineraryError::Http(_)));
    assert!(err.to_string().contains("No auth credentials found"));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body("upstream unavailable")
        .expect(4)
        .create_async()
        .await;

    let client = OpenAIClient::new("test-key").with_base_url(server.url());
    let err = client
        .complete(
            ChatCompletionRequest::from_prompt("test/model", "hi"),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_rate_limit_honours_retry_after() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_header("retry-after", "0")
        .with_body("{}")
        .expect(4)
        .create_async()
        .await;

    let client = OpenAIClient::new("test-key").with_base_url(server.url());
    let err = client
        .complete(
            ChatCompletionRequest::from_prompt("test/model", "hi"),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, ItineraryError::RateLimit { retry_after: 1 }));
}

#[tokio::test]
async fn test_reply_without_text_is_a_model_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": []}).to_string())
        .create_async()
        .await;

    let config = PlannerConfig::new("test-key").with_base_url(server.url());
    let err = ItineraryPlanner::new(config)
        .plan(&trip(1), &catalog())
        .await
        .unwrap_err();

    assert!(matches!(err, ItineraryError::Model(_)));
    assert_eq!(err.error_code(), "MODEL_ERROR");
}
