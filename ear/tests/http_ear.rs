use ear::{Ear, EarError, HttpEar};
use httpmock::{Method::GET, MockServer};

#[tokio::test]
async fn returns_the_recognized_transcript() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/listen");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"transcript": "rescan"}"#);
        })
        .await;

    let ear = HttpEar::new(server.base_url());
    assert_eq!(ear.listen().await.unwrap(), "rescan");
    mock.assert_async().await;
}

#[tokio::test]
async fn whitespace_is_trimmed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/listen");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"transcript": "  thank you  "}"#);
        })
        .await;

    let ear = HttpEar::new(server.base_url());
    assert_eq!(ear.listen().await.unwrap(), "thank you");
}

#[tokio::test]
async fn empty_transcript_is_unrecognized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/listen");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"transcript": ""}"#);
        })
        .await;

    let ear = HttpEar::new(server.base_url());
    let err = ear.listen().await.unwrap_err();
    assert!(matches!(err, EarError::Unrecognized));
}

#[tokio::test]
async fn server_error_is_a_service_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/listen");
            then.status(500);
        })
        .await;

    let ear = HttpEar::new(server.base_url());
    let err = ear.listen().await.unwrap_err();
    assert!(matches!(err, EarError::Service(_)));
}
