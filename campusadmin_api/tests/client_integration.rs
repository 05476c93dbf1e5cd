use campusadmin_api::types::default_collection_paths;
use campusadmin_api::{Client, Error, ListQuery, Query};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_list_paginated_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("products_paginated.json");

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri()).unwrap();
    let query = ListQuery::default().with_page(2).with_limit(10);
    let resp = client.get_list("/products", &query).await.unwrap();

    let items = resp.items(&default_collection_paths("products")).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["_id"], "p11");

    let meta = resp.page_meta();
    assert!(meta.is_sufficient());
    assert_eq!(meta.total, Some(42));
    assert_eq!(meta.resolved_total_pages(), Some(5));
}

#[tokio::test]
async fn get_list_flat_body_has_no_meta() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("products_flat.json");

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri()).unwrap();
    let resp = client
        .get_list("/products", &ListQuery::default())
        .await
        .unwrap();

    assert_eq!(
        resp.items(&default_collection_paths("products")).unwrap().len(),
        3
    );
    assert!(!resp.page_meta().is_sufficient());
}

#[tokio::test]
async fn get_list_bare_array_body() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("jobs.json");

    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri()).unwrap();
    let resp = client.get_list("/jobs", &ListQuery::default()).await.unwrap();
    let items = resp.items(&default_collection_paths("jobs")).unwrap();
    assert_eq!(items[1]["title"], "Lab Assistant");
}

#[tokio::test]
async fn search_and_filters_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("search", "kit"))
        .and(query_param("category", "c3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"products\": []}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri()).unwrap();
    let query = ListQuery::default()
        .with_search("kit")
        .with_filter("category", "c3");
    assert!(client.get_list("/products", &query).await.is_ok());
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"users\": []}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri()).unwrap().with_token("s3cret");
    assert!(client.has_token());
    assert!(client.get_list("/users", &ListQuery::default()).await.is_ok());
}

#[tokio::test]
async fn get_list_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri()).unwrap();
    let err = client
        .get_list("/products", &ListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn get_list_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"message\": \"no token\"}"))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri()).unwrap();
    let err = client
        .get_list("/users", &ListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized { status: 401 }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn get_list_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri()).unwrap();
    let err = client
        .get_list("/products", &ListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn get_json_dashboard_summary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dashboard/stats"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("{\"data\": {\"totalUsers\": 12}}"),
        )
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri()).unwrap();
    let body = client.get_json("/dashboard/stats").await.unwrap();
    assert_eq!(body["data"]["totalUsers"], 12);
}
