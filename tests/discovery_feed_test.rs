use anyhow::Result;
use httpmock::prelude::*;
use pet_adopt::core::feed::{DiscoveryFeed, FeedOptions};
use pet_adopt::{ApiClient, ClientConfig, MemorySessionStore, PetsService, ToastLog};
use serde_json::json;
use std::sync::Arc;

fn pets_service(server: &MockServer) -> PetsService {
    let config = ClientConfig {
        api_base_url: server.url("/api"),
        ..Default::default()
    };
    let api = ApiClient::new(&config, Arc::new(MemorySessionStore::with_token("t"))).unwrap();
    PetsService::new(api)
}

fn pet(id: &str, name: &str) -> serde_json::Value {
    json!({"_id": id, "name": name, "species": "dog", "likeCount": 1})
}

fn options() -> FeedOptions {
    FeedOptions {
        page_size: 3,
        featured_limit: 2,
        location: Some("Austin".to_string()),
    }
}

fn mock_featured(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/pets/trending")
            .query_param("limit", "2");
        then.status(200).json_body(json!([pet("b", "Bolt")]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/pets/recommended");
        then.status(200)
            .json_body(json!({"pets": [pet("z", "Zed")]}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/pets/nearby")
            .query_param("location", "Austin");
        then.status(200).json_body(json!({"pets": [pet("c", "Coco")]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/pets/stats");
        then.status(200)
            .json_body(json!({"totalPets": 40, "available": 30, "adopted": 8}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/pets/insights");
        then.status(200).json_body(json!({
            "popularSpecies": [{"_id": "dog", "count": 25}],
            "averageAdoptionDays": 12.5
        }));
    });
}

#[tokio::test]
async fn test_feed_dedupes_main_grid_against_featured_sections() -> Result<()> {
    let server = MockServer::start();
    mock_featured(&server);
    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/pets")
            .query_param("page", "1")
            .query_param("limit", "3");
        then.status(200).json_body(json!({
            "pets": [pet("a", "Ace"), pet("b", "Bolt"), pet("c", "Coco"), pet("d", "Daisy")],
            "total": 4,
            "page": 1,
            "pages": 2
        }));
    });

    let toasts = ToastLog::new();
    let mut feed = DiscoveryFeed::new(pets_service(&server), toasts.clone(), options());
    feed.load().await?;

    list_mock.assert();
    let grid: Vec<&str> = feed.main_grid().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(grid, vec!["a", "d"]);
    assert_eq!(feed.pages(), 2);
    assert_eq!(feed.stats().data.total_pets, 40);
    assert_eq!(feed.insights().data.popular_species[0].name, "dog");
    assert!(toasts.snapshot().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_failing_section_surfaces_toast_and_keeps_rest() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/pets/trending");
        then.status(500).json_body(json!({"message": "cache offline"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/pets/recommended");
        then.status(200).json_body(json!([pet("z", "Zed")]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/pets/nearby");
        then.status(200).json_body(json!([]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/pets/stats");
        then.status(200).json_body(json!({}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/pets/insights");
        then.status(200).json_body(json!({}));
    });

    let toasts = ToastLog::new();
    let mut feed = DiscoveryFeed::new(pets_service(&server), toasts.clone(), options());
    feed.load_featured().await;

    assert_eq!(feed.trending().error.as_deref(), Some("cache offline"));
    assert_eq!(feed.recommended().data.len(), 1);
    let errors = toasts.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("trending"));
    Ok(())
}

#[tokio::test]
async fn test_filters_reach_server_and_reset_page() -> Result<()> {
    let server = MockServer::start();
    let page_two = server.mock(|when, then| {
        when.method(GET).path("/api/pets").query_param("page", "2");
        then.status(200)
            .json_body(json!({"pets": [pet("e", "Echo")], "total": 4, "page": 2, "pages": 2}));
    });
    let filtered = server.mock(|when, then| {
        when.method(GET)
            .path("/api/pets")
            .query_param("species", "cat")
            .query_param("page", "1");
        then.status(200)
            .json_body(json!({"pets": [pet("m", "Mittens")], "total": 1, "page": 1, "pages": 1}));
    });
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/api/pets")
            .query_param("species", "dog")
            .query_param("page", "1");
        then.status(200)
            .json_body(json!({"pets": [pet("a", "Ace")], "total": 4, "page": 1, "pages": 2}));
    });

    let mut feed = DiscoveryFeed::new(pets_service(&server), ToastLog::new(), options());
    feed.filters_mut().species = Some("dog".to_string());
    feed.refresh().await?;
    assert!(feed.go_to_page(2).await?);
    assert_eq!(feed.page(), 2);

    feed.filters_mut().species = Some("cat".to_string());
    feed.apply_filters().await?;

    first.assert_hits(1);
    page_two.assert_hits(1);
    filtered.assert_hits(1);
    assert_eq!(feed.page(), 1);
    assert_eq!(feed.pages(), 1);
    assert_eq!(feed.all()[0].name, "Mittens");

    // only one page now, so page 2 is out of range
    assert!(!feed.go_to_page(2).await?);
    filtered.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn test_like_round_trip_through_feed() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/pets");
        then.status(200)
            .json_body(json!({"pets": [pet("a", "Ace")], "total": 1, "page": 1, "pages": 1}));
    });
    let like_mock = server.mock(|when, then| {
        when.method(POST).path("/api/pets/a/like");
        then.status(200).json_body(json!({"isLiked": true, "likeCount": 7}));
    });

    let mut feed = DiscoveryFeed::new(pets_service(&server), ToastLog::new(), options());
    feed.refresh().await?;
    let state = feed.toggle_like("a").await?;

    like_mock.assert();
    assert!(state.is_liked);
    assert_eq!(feed.all()[0].like_count, 7);
    Ok(())
}
