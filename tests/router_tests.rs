use std::sync::Arc;

use sentiment_router::clients::memory::{MemoryChannel, MemoryStore, ScriptedClassifier};
use sentiment_router::core::models::{Classification, Sentiment, SentimentScores};
use sentiment_router::router::IngestRouter;
use sentiment_router::router::handler::handle_notification;
use serde_json::{Value, json};

struct Harness {
    store: Arc<MemoryStore>,
    classifier: Arc<ScriptedClassifier>,
    high: Arc<MemoryChannel>,
    normal: Arc<MemoryChannel>,
}

impl Harness {
    fn new(classifier: ScriptedClassifier) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            classifier: Arc::new(classifier),
            high: Arc::new(MemoryChannel::new()),
            normal: Arc::new(MemoryChannel::new()),
        }
    }

    fn router(&self) -> IngestRouter {
        IngestRouter::new(
            self.store.clone(),
            self.classifier.clone(),
            self.high.clone(),
            self.normal.clone(),
        )
    }
}

fn classification(sentiment: Sentiment) -> Classification {
    let scores = match sentiment {
        Sentiment::Positive => SentimentScores {
            positive: 0.97,
            negative: 0.01,
            neutral: 0.015,
            mixed: 0.005,
        },
        Sentiment::Negative => SentimentScores {
            positive: 0.01,
            negative: 0.95,
            neutral: 0.03,
            mixed: 0.01,
        },
        Sentiment::Neutral | Sentiment::Mixed => SentimentScores {
            positive: 0.2,
            negative: 0.2,
            neutral: 0.4,
            mixed: 0.2,
        },
    };
    Classification { sentiment, scores }
}

fn notification(objects: &[(&str, &str)]) -> Value {
    let records: Vec<Value> = objects
        .iter()
        .map(|(bucket, key)| {
            json!({
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": bucket },
                    "object": { "key": key }
                }
            })
        })
        .collect();
    json!({ "Records": records })
}

fn body_of(response: &Value) -> Value {
    serde_json::from_str(response["body"].as_str().expect("body is a string")).unwrap()
}

#[tokio::test]
async fn positive_upload_goes_to_normal_queue() {
    let harness = Harness::new(
        ScriptedClassifier::new().with_answer("I love this!", classification(Sentiment::Positive)),
    );
    harness.store.put("b", "greeting.txt", "I love this!");

    let response = handle_notification(&harness.router(), &notification(&[("b", "greeting.txt")])).await;

    assert_eq!(response["statusCode"], 200);
    let results = body_of(&response)["results"].as_array().unwrap().clone();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["file"], "greeting.txt");
    assert_eq!(results[0]["queue"], "NormalQueue");
    assert_eq!(results[0]["priority"], "🟢 NORMAL PRIORITY");
    assert_eq!(results[0]["sentiment"], "POSITIVE");

    assert!(harness.high.messages().is_empty());
    let queued = harness.normal.messages();
    assert_eq!(queued.len(), 1);
    assert_eq!(results[0]["message_id"], queued[0].message_id.as_str());
    assert_eq!(queued[0].attributes["Sentiment"], "POSITIVE");
    assert_eq!(queued[0].attributes["S3Key"], "greeting.txt");

    let body: Value = serde_json::from_str(&queued[0].body).unwrap();
    assert_eq!(body["s3_bucket"], "b");
    assert_eq!(body["s3_key"], "greeting.txt");
    assert_eq!(body["preview"], "I love this!");
    assert_eq!(body["sentiment_scores"]["positive"], 0.97);
    assert!(body["timestamp"].as_str().unwrap().ends_with("+00:00"));
}

#[tokio::test]
async fn negative_upload_goes_to_high_priority_queue() {
    let harness = Harness::new(
        ScriptedClassifier::new()
            .with_answer("This is terrible.", classification(Sentiment::Negative)),
    );
    harness.store.put("b", "complaint.txt", "This is terrible.");

    let response =
        handle_notification(&harness.router(), &notification(&[("b", "complaint.txt")])).await;

    let results = body_of(&response)["results"].clone();
    assert_eq!(results[0]["queue"], "HighPriorityQueue");
    assert_eq!(results[0]["priority"], "🔴 HIGH PRIORITY");
    assert_eq!(harness.high.messages().len(), 1);
    assert!(harness.normal.messages().is_empty());
}

#[tokio::test]
async fn neutral_and_mixed_are_normal_priority() {
    let harness = Harness::new(
        ScriptedClassifier::new()
            .with_answer("meh", classification(Sentiment::Neutral))
            .with_answer("good and bad", classification(Sentiment::Mixed)),
    );
    harness.store.put("b", "a.txt", "meh");
    harness.store.put("b", "c.txt", "good and bad");

    let response =
        handle_notification(&harness.router(), &notification(&[("b", "a.txt"), ("b", "c.txt")]))
            .await;

    let results = body_of(&response)["results"].clone();
    assert_eq!(results[0]["queue"], "NormalQueue");
    assert_eq!(results[1]["queue"], "NormalQueue");
    assert_eq!(results[1]["sentiment"], "MIXED");
    assert_eq!(harness.normal.messages().len(), 2);
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let harness = Harness::new(ScriptedClassifier::new());

    for payload in [json!({ "Records": [] }), json!({})] {
        let response = handle_notification(&harness.router(), &payload).await;
        assert_eq!(response["statusCode"], 400);
        let body = body_of(&response);
        assert_eq!(body["error"], "No Records in event");
        assert!(body.get("results").is_none());
    }
    assert!(harness.classifier.calls().is_empty());
}

#[tokio::test]
async fn missing_object_is_recorded_as_no_such_key() {
    let harness = Harness::new(ScriptedClassifier::new());

    let response = handle_notification(&harness.router(), &notification(&[("b", "gone.txt")])).await;

    assert_eq!(response["statusCode"], 207);
    let results = body_of(&response)["results"].clone();
    assert_eq!(results[0], json!({ "file": "gone.txt", "error": "NoSuchKey" }));
}

#[tokio::test]
async fn failures_do_not_affect_siblings() {
    let harness = Harness::new(
        ScriptedClassifier::new().with_answer("Great job", classification(Sentiment::Positive)),
    );
    harness.store.put("b", "ok.txt", "Great job");

    let response = handle_notification(
        &harness.router(),
        &notification(&[("b", "gone.txt"), ("b", "ok.txt")]),
    )
    .await;

    assert_eq!(response["statusCode"], 207);
    let results = body_of(&response)["results"].as_array().unwrap().clone();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["error"], "NoSuchKey");
    assert_eq!(results[1]["file"], "ok.txt");
    assert_eq!(results[1]["queue"], "NormalQueue");
    assert_eq!(harness.normal.messages().len(), 1);
}

#[tokio::test]
async fn unreadable_and_blank_files_are_skipped() {
    let harness = Harness::new(ScriptedClassifier::new());
    harness.store.put("b", "image.png", vec![0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe]);
    harness.store.put("b", "blank.txt", "   \n\t");

    let response = handle_notification(
        &harness.router(),
        &notification(&[("b", "image.png"), ("b", "blank.txt")]),
    )
    .await;

    assert_eq!(response["statusCode"], 200);
    let results = body_of(&response)["results"].clone();
    assert_eq!(results[0], json!({ "file": "image.png", "status": "skipped_non_utf8" }));
    assert_eq!(results[1], json!({ "file": "blank.txt", "status": "empty_file" }));
    assert!(harness.classifier.calls().is_empty());
    assert!(harness.normal.messages().is_empty());
}

#[tokio::test]
async fn long_text_is_truncated_for_analysis_but_not_for_preview() {
    let harness =
        Harness::new(ScriptedClassifier::new().with_fallback(classification(Sentiment::Neutral)));
    let text = "ñ".repeat(3000);
    harness.store.put("b", "long.txt", text.clone());

    handle_notification(&harness.router(), &notification(&[("b", "long.txt")])).await;

    let calls = harness.classifier.calls();
    assert_eq!(calls.len(), 1);
    let (analyzed, language) = &calls[0];
    assert_eq!(language, "en");
    assert_eq!(analyzed.len(), 5000);
    assert!(text.starts_with(analyzed.as_str()));

    let body: Value = serde_json::from_str(&harness.normal.messages()[0].body).unwrap();
    let preview = body["preview"].as_str().unwrap();
    assert_eq!(preview.chars().count(), 300);
    assert_eq!(preview, "ñ".repeat(300));
}

#[tokio::test]
async fn classifier_failure_is_an_item_error() {
    let harness = Harness::new(ScriptedClassifier::new());
    harness.store.put("b", "x.txt", "unscripted text");

    let response = handle_notification(&harness.router(), &notification(&[("b", "x.txt")])).await;

    assert_eq!(response["statusCode"], 207);
    let results = body_of(&response)["results"].clone();
    assert_eq!(results[0]["file"], "x.txt");
    assert_eq!(
        results[0]["error"],
        "Failed to classify sentiment: no scripted answer"
    );
    assert!(harness.normal.messages().is_empty());
}

#[tokio::test]
async fn queue_failure_is_an_item_error() {
    let harness =
        Harness::new(ScriptedClassifier::new().with_fallback(classification(Sentiment::Negative)));
    harness.store.put("b", "x.txt", "awful");
    harness.high.set_unavailable(true);

    let response = handle_notification(&harness.router(), &notification(&[("b", "x.txt")])).await;

    assert_eq!(response["statusCode"], 207);
    let results = body_of(&response)["results"].clone();
    assert_eq!(
        results[0]["error"],
        "Failed to access message queue: queue unavailable"
    );
}

#[tokio::test]
async fn encoded_keys_are_decoded_before_fetching() {
    let harness =
        Harness::new(ScriptedClassifier::new().with_fallback(classification(Sentiment::Positive)));
    harness.store.put("b", "inbox/my review!.txt", "nice");

    let response = handle_notification(
        &harness.router(),
        &notification(&[("b", "inbox/my+review%21.txt")]),
    )
    .await;

    let results = body_of(&response)["results"].clone();
    assert_eq!(results[0]["file"], "inbox/my review!.txt");
    assert_eq!(
        harness.normal.messages()[0].attributes["S3Key"],
        "inbox/my review!.txt"
    );
}

#[tokio::test]
async fn malformed_record_is_reported_without_aborting_the_batch() {
    let harness =
        Harness::new(ScriptedClassifier::new().with_fallback(classification(Sentiment::Positive)));
    harness.store.put("b", "ok.txt", "fine");
    let payload = json!({
        "Records": [
            { "eventName": "ObjectCreated:Put" },
            { "s3": { "bucket": { "name": "b" }, "object": { "key": "ok.txt" } } }
        ]
    });

    let response = handle_notification(&harness.router(), &payload).await;

    assert_eq!(response["statusCode"], 207);
    let results = body_of(&response)["results"].clone();
    assert_eq!(results[0]["file"], "unknown");
    assert!(
        results[0]["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid upload record")
    );
    assert_eq!(results[1]["queue"], "NormalQueue");
}

#[tokio::test]
async fn relocation_moves_object_under_processed_prefix() {
    let harness =
        Harness::new(ScriptedClassifier::new().with_fallback(classification(Sentiment::Positive)));
    harness.store.put("b", "uploads/team/note.txt", "hello there");
    harness.store.put("b", "flat.txt", "hello again");
    let router = harness.router().with_relocation("processed/");

    let response = handle_notification(
        &router,
        &notification(&[("b", "uploads/team/note.txt"), ("b", "flat.txt")]),
    )
    .await;

    assert_eq!(response["statusCode"], 200);
    assert!(!harness.store.contains("b", "uploads/team/note.txt"));
    assert!(harness.store.contains("b", "processed/team/note.txt"));
    assert!(!harness.store.contains("b", "flat.txt"));
    assert!(harness.store.contains("b", "processed/flat.txt"));
}

#[tokio::test]
async fn relocation_failure_is_reported_after_the_message_is_queued() {
    let harness =
        Harness::new(ScriptedClassifier::new().with_fallback(classification(Sentiment::Positive)));
    harness.store.put("b", "inbox/a.txt", "hello");
    harness.store.set_read_only(true);
    let router = harness.router().with_relocation("processed/");

    let response = handle_notification(&router, &notification(&[("b", "inbox/a.txt")])).await;

    assert_eq!(response["statusCode"], 207);
    let results = body_of(&response)["results"].clone();
    let error = results[0]["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to relocate object: copy to processed/a.txt"), "{error}");
    assert_eq!(harness.normal.messages().len(), 1);
    assert!(harness.store.contains("b", "inbox/a.txt"));
}

#[tokio::test]
async fn failed_delete_leaves_both_copies_and_says_so() {
    let harness =
        Harness::new(ScriptedClassifier::new().with_fallback(classification(Sentiment::Positive)));
    harness.store.put("b", "inbox/a.txt", "hello");
    harness.store.set_fail_deletes(true);
    let router = harness.router().with_relocation("processed/");

    let response = handle_notification(&router, &notification(&[("b", "inbox/a.txt")])).await;

    assert_eq!(response["statusCode"], 207);
    let results = body_of(&response)["results"].clone();
    let error = results[0]["error"].as_str().unwrap();
    assert!(
        error.starts_with(
            "Failed to relocate object: copied to processed/a.txt but original was not deleted"
        ),
        "{error}"
    );
    assert_eq!(harness.normal.messages().len(), 1);
    assert!(harness.store.contains("b", "inbox/a.txt"));
    assert!(harness.store.contains("b", "processed/a.txt"));
}

#[tokio::test]
async fn separator_only_file_is_skipped_as_empty() {
    let harness = Harness::new(ScriptedClassifier::new());
    harness.store.put("b", "seps.txt", "\u{1c}\u{1d}");

    let router = harness.router();

    let response = handle_notification(&router, &notification(&[("b", "seps.txt")])).await;

    assert_eq!(response["statusCode"], 200);
    assert_eq!(
        body_of(&response)["results"][0],
        json!({ "file": "seps.txt", "status": "empty_file" })
    );
    assert!(harness.classifier.calls().is_empty());
}
