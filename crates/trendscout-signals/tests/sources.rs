//! Integration tests for the signal collectors using wiremock HTTP mocks.

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use trendscout_core::{AppConfig, Category, CategoryRule, Registry};
use trendscout_signals::{
    run_keyword_discovery, Endpoints, SignalCollector, SignalError, SourceKind, SourceOutcome,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

fn test_config() -> AppConfig {
    AppConfig {
        log_level: "info".to_string(),
        keywords_path: PathBuf::from("daily_keywords.json"),
        notification_path: PathBuf::from("notification_data.json"),
        topics_cache_path: None,
        registry_path: None,
        request_timeout_secs: 5,
        user_agent: "trendscout-test/0.1".to_string(),
        inter_request_delay_ms: 0,
        per_source_limit: 8,
        max_keywords: 25,
        trends_seeds_per_category: 1,
        news_api_key: None,
        reddit_client_id: None,
        reddit_client_secret: None,
        reddit_user_agent: "trendscout-test/0.1".to_string(),
    }
}

fn collector(server: &MockServer, config: &AppConfig) -> SignalCollector {
    SignalCollector::with_endpoints(config, Endpoints::all_at(&server.uri()))
        .expect("collector construction should not fail")
}

fn registry_with_one_seed(seed: &str) -> Registry {
    Registry {
        categories: vec![CategoryRule {
            category: Category::ContentCreation,
            matchers: vec!["chatgpt".to_string()],
            seeds: vec![seed.to_string()],
        }],
        ..Registry::default()
    }
}

async fn mount_hackernews(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([101, 102, 103])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/item/101.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 101,
            "title": "ChatGPT outage leaves users frustrated",
            "score": 250,
            "url": "https://example.com/outage",
            "time": 1_740_826_800
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/item/102.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 102,
            "title": "A faster linker written in Zig",
            "score": 400
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/item/103.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn hackernews_keeps_tool_stories_and_caps_points() {
    let server = MockServer::start().await;
    mount_hackernews(&server).await;

    let topics = collector(&server, &test_config())
        .collect_from(SourceKind::HackerNews, &Registry::default(), now())
        .await
        .expect("hackernews should succeed");

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].keyword, "ChatGPT");
    assert_eq!(topics[0].source, "hackernews");
    assert_eq!(topics[0].score, 100);
    assert_eq!(topics[0].url.as_deref(), Some("https://example.com/outage"));
    assert_eq!(topics[0].timestamp, "2025-03-01T11:00:00+00:00");
}

#[tokio::test]
async fn hackernews_topstories_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = collector(&server, &test_config())
        .collect_from(SourceKind::HackerNews, &Registry::default(), now())
        .await;

    assert!(matches!(
        result,
        Err(SignalError::UnexpectedStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn per_source_limit_keeps_highest_scores() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2, 3])))
        .mount(&server)
        .await;
    for (id, points) in [(1, 20), (2, 70), (3, 45)] {
        Mock::given(method("GET"))
            .and(path(format!("/v0/item/{id}.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": format!("Gemini story {id}"),
                "score": points
            })))
            .mount(&server)
            .await;
    }

    let mut config = test_config();
    config.per_source_limit = 2;
    let topics = collector(&server, &config)
        .collect_from(SourceKind::HackerNews, &Registry::default(), now())
        .await
        .unwrap();

    let scores: Vec<u32> = topics.iter().map(|t| t.score).collect();
    assert_eq!(scores, vec![70, 45]);
}

#[tokio::test]
async fn per_source_limit_counts_controversy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2])))
        .mount(&server)
        .await;
    for (id, title, points) in [
        (1, "ChatGPT problems: issues crashes errors", 40),
        (2, "Gemini launches globally", 60),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/v0/item/{id}.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": title,
                "score": points
            })))
            .mount(&server)
            .await;
    }

    let mut config = test_config();
    config.per_source_limit = 1;
    let topics = collector(&server, &config)
        .collect_from(SourceKind::HackerNews, &Registry::default(), now())
        .await
        .unwrap();

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].keyword, "ChatGPT");
    assert_eq!(topics[0].score, 40);
    assert_eq!(topics[0].controversy_score, 30);
}

#[tokio::test]
async fn hackernews_fails_when_every_story_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2])))
        .mount(&server)
        .await;
    for id in [1, 2] {
        Mock::given(method("GET"))
            .and(path(format!("/v0/item/{id}.json")))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
    }

    let result = collector(&server, &test_config())
        .collect_from(SourceKind::HackerNews, &Registry::default(), now())
        .await;

    assert!(matches!(
        result,
        Err(SignalError::UnexpectedStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn hackernews_survives_some_failed_stories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/item/1.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/item/2.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "title": "Claude gets a new model",
            "score": 80
        })))
        .mount(&server)
        .await;

    let topics = collector(&server, &test_config())
        .collect_from(SourceKind::HackerNews, &Registry::default(), now())
        .await
        .expect("one good story is enough");

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].keyword, "Claude");
}

#[tokio::test]
async fn reddit_without_credentials_is_skipped() {
    let server = MockServer::start().await;

    let result = collector(&server, &test_config())
        .collect_from(SourceKind::Reddit, &Registry::default(), now())
        .await;

    assert!(matches!(result, Err(SignalError::MissingCredentials(_))));
}

#[tokio::test]
async fn reddit_reads_hot_posts_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access_token": "tok-123" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/OpenAI/hot"))
        .and(header("Authorization", "Bearer tok-123"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "children": [
                    { "data": {
                        "title": "Claude keeps refusing simple tasks",
                        "score": 1234,
                        "permalink": "/r/OpenAI/comments/abc/claude/",
                        "created_utc": 1_740_830_400.0
                    } },
                    { "data": { "title": "Weekend discussion thread", "score": 9000 } }
                ]
            }
        })))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.reddit_client_id = Some("id".to_string());
    config.reddit_client_secret = Some("secret".to_string());
    let registry = Registry {
        subreddits: vec!["OpenAI".to_string()],
        ..Registry::default()
    };

    let topics = collector(&server, &config)
        .collect_from(SourceKind::Reddit, &registry, now())
        .await
        .expect("reddit should succeed");

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].keyword, "Claude");
    assert_eq!(topics[0].source, "reddit_OpenAI");
    assert_eq!(topics[0].score, 100);
    assert_eq!(
        topics[0].url.as_deref(),
        Some("https://reddit.com/r/OpenAI/comments/abc/claude/")
    );
}

#[tokio::test]
async fn reddit_token_rejection_fails_the_source() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.reddit_client_id = Some("id".to_string());
    config.reddit_client_secret = Some("bad".to_string());

    let result = collector(&server, &config)
        .collect_from(SourceKind::Reddit, &Registry::default(), now())
        .await;

    assert!(matches!(result, Err(SignalError::Api { service: "reddit", .. })));
}

#[tokio::test]
async fn news_api_scores_articles_for_each_tool() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "\"ChatGPT\""))
        .and(query_param("language", "en"))
        .and(query_param("sortBy", "popularity"))
        .and(query_param("from", "2025-02-22"))
        .and(header("X-Api-Key", "news-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": { "id": "techcrunch", "name": "TechCrunch" },
                "title": "ChatGPT rolls out memory to everyone",
                "description": "An improved experience",
                "url": "https://techcrunch.com/chatgpt-memory",
                "publishedAt": "2025-03-01T08:00:00Z"
            }]
        })))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.news_api_key = Some("news-key".to_string());
    let registry = Registry {
        tools: vec!["ChatGPT".to_string()],
        ..Registry::default()
    };

    let topics = collector(&server, &config)
        .collect_from(SourceKind::NewsApi, &registry, now())
        .await
        .expect("news api should succeed");

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].keyword, "ChatGPT");
    assert_eq!(topics[0].source, "news_api");
    assert_eq!(topics[0].score, 88);
}

#[tokio::test]
async fn news_api_error_body_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid."
        })))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.news_api_key = Some("wrong".to_string());
    let registry = Registry {
        tools: vec!["ChatGPT".to_string()],
        ..Registry::default()
    };

    let result = collector(&server, &config)
        .collect_from(SourceKind::NewsApi, &registry, now())
        .await;

    match result {
        Err(SignalError::Api { service, message }) => {
            assert_eq!(service, "news_api");
            assert_eq!(message, "Your API key is invalid.");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

async fn mount_trends(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/trends/api/explore"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#")]}'
{"widgets":[{"id":"TIMESERIES","token":"ts-token","request":{"time":"today 3-m"}},{"id":"RELATED_QUERIES","token":"rq-token","request":{"restriction":{}}}]}"#,
        ))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trends/api/widgetdata/multiline"))
        .and(query_param("token", "ts-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#")]}',
{"default":{"timelineData":[{"time":"1","value":[40]},{"time":"2","value":[61]}]}}"#,
        ))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trends/api/widgetdata/relatedsearches"))
        .and(query_param("token", "rq-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#")]}',
{"default":{"rankedList":[{"rankedKeyword":[{"query":"chatgpt down","value":100},{"query":"chatgpt login","value":80}]},{"rankedKeyword":[{"query":"chatgpt rising","value":5000}]}]}}"#,
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn trends_reads_interest_and_top_related_queries() {
    let server = MockServer::start().await;
    mount_trends(&server).await;

    let topics = collector(&server, &test_config())
        .collect_from(SourceKind::GoogleTrends, &registry_with_one_seed("ChatGPT"), now())
        .await
        .expect("trends should succeed");

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].keyword, "ChatGPT");
    assert_eq!(topics[0].source, "google_trends");
    assert_eq!(topics[0].score, 50);
    assert_eq!(topics[0].related_terms, vec!["chatgpt down", "chatgpt login"]);
}

#[tokio::test]
async fn trends_fails_when_every_seed_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trends/api/explore"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = collector(&server, &test_config())
        .collect_from(SourceKind::GoogleTrends, &registry_with_one_seed("ChatGPT"), now())
        .await;

    assert!(matches!(
        result,
        Err(SignalError::UnexpectedStatus { status: 429, .. })
    ));
}

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>AI feed</title>
    <item>
      <title>Midjourney v7 draws criticism over artifacts</title>
      <link>https://example.com/mj</link>
      <description>Users call it worse than v6.</description>
      <pubDate>Sat, 01 Mar 2025 08:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Quarterly chip shipments</title>
      <link>https://example.com/chips</link>
      <description>Nothing about AI tools here.</description>
    </item>
  </channel>
</rss>"#;

#[tokio::test]
async fn rss_skips_failing_feed_and_tags_by_host() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/good.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let registry = Registry {
        rss_feeds: vec![
            format!("{}/broken.xml", server.uri()),
            format!("{}/good.xml", server.uri()),
        ],
        ..Registry::default()
    };

    let topics = collector(&server, &test_config())
        .collect_from(SourceKind::Rss, &registry, now())
        .await
        .expect("one good feed is enough");

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].keyword, "Midjourney");
    assert_eq!(topics[0].source, "rss_127.0.0.1");
    assert_eq!(topics[0].score, 98);
    assert_eq!(topics[0].content_snippet, "Users call it worse than v6.");
}

#[tokio::test]
async fn rss_fails_when_every_feed_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bad.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<rss><channel><item></channel>"))
        .mount(&server)
        .await;

    let registry = Registry {
        rss_feeds: vec![format!("{}/bad.xml", server.uri())],
        ..Registry::default()
    };

    let result = collector(&server, &test_config())
        .collect_from(SourceKind::Rss, &registry, now())
        .await;

    assert!(matches!(result, Err(SignalError::Xml(_))));
}

#[tokio::test]
async fn full_run_reports_every_source_and_survives_failures() {
    let server = MockServer::start().await;
    mount_hackernews(&server).await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .mount(&server)
        .await;
    // Trends is not mounted, so every seed gets a 404.

    let registry = Registry {
        rss_feeds: vec![format!("{}/feed.xml", server.uri())],
        ..registry_with_one_seed("ChatGPT")
    };

    let run = run_keyword_discovery(&collector(&server, &test_config()), &registry, 25, now()).await;

    let outcomes: Vec<(SourceKind, &SourceOutcome)> =
        run.reports.iter().map(|r| (r.source, &r.outcome)).collect();
    assert_eq!(outcomes.len(), 5);
    assert!(matches!(outcomes[0], (SourceKind::GoogleTrends, SourceOutcome::Failed(_))));
    assert!(matches!(outcomes[1], (SourceKind::Reddit, SourceOutcome::Skipped(_))));
    assert!(matches!(outcomes[2], (SourceKind::NewsApi, SourceOutcome::Skipped(_))));
    assert_eq!(outcomes[3], (SourceKind::HackerNews, &SourceOutcome::Collected(1)));
    assert_eq!(outcomes[4], (SourceKind::Rss, &SourceOutcome::Collected(1)));

    let keywords: Vec<&str> = run.keywords.iter().map(|k| k.keyword.as_str()).collect();
    assert_eq!(keywords.len(), 2);
    assert!(keywords.contains(&"ChatGPT"));
    assert!(keywords.contains(&"Midjourney"));
    assert!(run.summary.trending_analysis.multi_source_validation);
    assert_eq!(run.summary.content_data.total_keywords, 2);
}

#[tokio::test]
async fn run_with_no_topics_is_empty_not_an_error() {
    let server = MockServer::start().await;
    let registry = Registry {
        rss_feeds: Vec::new(),
        ..registry_with_one_seed("ChatGPT")
    };

    let run = run_keyword_discovery(&collector(&server, &test_config()), &registry, 25, now()).await;

    assert!(run.topics.is_empty());
    assert!(run.keywords.is_empty());
    assert!(run.summary.keyword_data.is_none());
    assert_eq!(run.summary.content_data.total_keywords, 0);
}
