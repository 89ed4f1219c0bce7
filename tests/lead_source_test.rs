use leadgrid::data::{JsonFileSource, LeadQuery, LeadSource};
use std::fs;

fn write_leads(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("leads.json");
    let leads: Vec<serde_json::Value> = (1..=23)
        .map(|i| {
            serde_json::json!({
                "leadId": i.to_string(),
                "name": format!("Lead {:02}", i),
                "designation": if i % 2 == 0 { "CTO" } else { "VP Sales" },
                "occupation": "Software",
                "state": if i <= 10 { "CA" } else { "NY" },
                "sentDate": "2024-06-01",
                "sentBy": "team",
                "email": format!("lead{}@acme.io", i)
            })
        })
        .collect();
    fs::write(&path, serde_json::to_string(&leads).unwrap()).unwrap();
    path
}

#[test]
fn test_json_source_pages_like_the_backend() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonFileSource::open(write_leads(&dir)).unwrap();
    assert_eq!(source.len(), 23);

    let mut query = LeadQuery::new(10);
    let first = source.search(&query).unwrap();
    assert_eq!(first.total_elements, 23);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.content.len(), 10);

    query.page = 2;
    let last = source.search(&query).unwrap();
    assert_eq!(last.content.len(), 3);
    assert_eq!(last.content[0].name, "Lead 21");

    query.page = 9;
    assert!(source.search(&query).unwrap().content.is_empty());
}

#[test]
fn test_search_term_matches_email_and_resets_page() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonFileSource::open(write_leads(&dir)).unwrap();

    let mut query = LeadQuery::new(10);
    query.page = 2;
    let query = query.with_search_term("LEAD7@");
    assert_eq!(query.page, 0);

    let page = source.search(&query).unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].lead_id, "7");
}

#[test]
fn test_state_filter_and_options() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonFileSource::open(write_leads(&dir)).unwrap();

    let options = source.filter_options();
    assert_eq!(options.states, ["CA", "NY"]);
    assert_eq!(options.designations, ["CTO", "VP Sales"]);

    let mut query = LeadQuery::new(50);
    query.filters.state = vec!["NY".to_string()];
    query.filters.designation = vec!["cto".to_string()];
    let page = source.search(&query).unwrap();
    assert_eq!(page.total_elements, 6);
    assert!(page.content.iter().all(|l| l.state == "NY" && l.designation == "CTO"));
}

#[test]
fn test_missing_or_invalid_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(JsonFileSource::open(dir.path().join("missing.json")).is_err());

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{\"not\": \"an array\"}").unwrap();
    let err = JsonFileSource::open(&bad).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse leads file"));
}
