use super::*;

#[test]
fn page_url_appends_page_parameter() {
    let url =
        CatalogClient::page_url("https://kari.com/catalog/muzhchinam/muzhskaya-obuv/", 3).unwrap();
    assert_eq!(
        url,
        "https://kari.com/catalog/muzhchinam/muzhskaya-obuv/?page=3"
    );
}

#[test]
fn page_url_replaces_existing_page_parameter() {
    let url = CatalogClient::page_url("https://kari.com/catalog/?page=9", 1).unwrap();
    assert_eq!(url, "https://kari.com/catalog/?page=1");
}

#[test]
fn page_url_keeps_other_parameters() {
    let url = CatalogClient::page_url("https://kari.com/catalog/?sort=price", 2).unwrap();
    assert_eq!(url, "https://kari.com/catalog/?sort=price&page=2");
}

#[test]
fn page_url_rejects_relative_base() {
    let err = CatalogClient::page_url("catalog/shoes", 1).unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidCatalogUrl { .. }),
        "expected InvalidCatalogUrl, got: {err:?}"
    );
}

#[test]
fn new_builds_client() {
    assert!(CatalogClient::new(5, "shoedb-test/0.1", 0, 0).is_ok());
}
