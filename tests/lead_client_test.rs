use leadgrid::api::LeadClient;
use leadgrid::data::{LeadQuery, LeadSource};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// The client is blocking; it is built, used and dropped off the async runtime.
async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

fn page_body() -> serde_json::Value {
    json!({
        "content": [
            {"leadId": "1", "name": "Ada Lovelace", "state": "CA"},
            {"leadId": "2", "name": "Grace Hopper", "state": "VA"}
        ],
        "totalElements": 12,
        "totalPages": 3,
        "number": 1,
        "size": 5
    })
}

#[tokio::test]
async fn test_get_leads_sends_paging_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(query_param("page", "1"))
        .and(query_param("size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/api/", server.uri());
    let page = blocking(move || LeadClient::new(&base).get_leads(1, 5)).await.unwrap();
    assert_eq!(page.total_elements, 12);
    assert_eq!(page.page, 1);
    assert_eq!(page.content[1].name, "Grace Hopper");
}

#[tokio::test]
async fn test_get_lead_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leads/7"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "leadId": "7",
            "name": "Katherine Johnson",
            "linkedinAccountName": "kjohnson"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base = server.uri();
    let lead = blocking(move || {
        LeadClient::new(&base)
            .with_auth_token(Some("secret".to_string()))
            .get_lead("7")
    })
    .await
    .unwrap();
    assert_eq!(lead.lead_id, "7");
    assert_eq!(lead.linkedin_url(), "https://www.linkedin.com/in/kjohnson");
}

#[tokio::test]
async fn test_get_lead_error_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leads/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Lead not found"))
        .mount(&server)
        .await;

    let base = server.uri();
    let err = blocking(move || LeadClient::new(&base).get_lead("missing"))
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("API Error (404"), "{}", message);
    assert!(message.ends_with("Lead not found"), "{}", message);
}

#[tokio::test]
async fn test_search_repeats_filters_and_tolerates_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leads/search"))
        .and(query_param("searchTerm", "acme"))
        .and(query_param("state", "NY"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let base = server.uri();
    let page = blocking(move || {
        let mut query = LeadQuery::new(10).with_search_term("acme");
        query.filters.state = vec!["NY".to_string()];
        LeadClient::new(&base).search(&query)
    })
    .await
    .unwrap();
    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 0);
}

#[tokio::test]
async fn test_filter_options_degrade_per_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leads/distinct/states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["CA", "NY"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/leads/distinct/designations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let base = server.uri();
    let options = blocking(move || LeadClient::new(&base).filter_options()).await;
    assert_eq!(options.states, ["CA", "NY"]);
    assert!(options.designations.is_empty());
    // Unmatched requests get a 404 from the mock server
    assert!(options.occupations.is_empty());
}
