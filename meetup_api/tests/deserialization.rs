use meetup_api::types::{LegacyEnvelope, Page, Pages, Record};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_legacy_envelope() {
    let json = load_fixture("categories.json");
    let env: LegacyEnvelope = serde_json::from_str(&json).unwrap();
    assert_eq!(env.results.len(), 3);
    assert_eq!(env.results[0]["name"], "Arts");
    assert_eq!(env.results[2]["id"], 23);
}

#[test]
fn deserialize_modern_array() {
    let json = load_fixture("venues.json");
    let venues: Vec<Record> = serde_json::from_str(&json).unwrap();
    assert_eq!(venues.len(), 2);
    assert_eq!(venues[1]["address_1"], "397 Bridge St");
    // optional fields are simply absent on opaque records
    assert!(venues[1].get("zip").is_none());
}

#[test]
fn legacy_envelope_requires_results() {
    let json = r#"{"meta": {"count": 0}}"#;
    assert!(serde_json::from_str::<LegacyEnvelope>(json).is_err());
}

#[test]
fn pages_flatten_in_fetch_order_without_dedup() {
    let venues: Vec<Record> = serde_json::from_str(&load_fixture("venues.json")).unwrap();
    let pages = Pages::from(vec![
        Page::new(venues.clone(), None),
        Page::new(Vec::new(), None),
        Page::new(venues, None),
    ]);
    assert_eq!(pages.len(), 3);
    assert_eq!(pages.record_count(), 4);

    let flat = pages.into_records();
    assert_eq!(flat.len(), 4);
    assert_eq!(flat[0], flat[2]);
    assert_eq!(flat[1]["name"], "Recurse Center");
}
