//! Unit tests for the ledger API client

use marketplace_client::{ApiConfig, LedgerClient, OfferAcceptance};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[path = "helpers.rs"]
mod test_helpers;
use test_helpers::{
    id, DUMMY_ASSET_SOURCE, DUMMY_ASSET_TARGET, DUMMY_ASSET_USER_PAY, DUMMY_ASSET_USER_RECEIVE,
    DUMMY_KEY_OWNER, DUMMY_OFFER_ID,
};

fn client_for(server: &MockServer) -> LedgerClient {
    LedgerClient::new(&ApiConfig {
        base_url: server.uri(),
        timeout_ms: 5_000,
    })
    .unwrap()
}

/// What is tested: GET offers/{id} decodes the ledger's camelCase wire shape
/// Why: every flow starts from a decoded offer
#[tokio::test]
async fn test_get_offer_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/offers/{}", DUMMY_OFFER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": DUMMY_OFFER_ID,
            "label": "firewood",
            "owners": [DUMMY_KEY_OWNER],
            "source": DUMMY_ASSET_SOURCE,
            "sourceQuantity": 2,
            "target": DUMMY_ASSET_TARGET,
            "targetQuantity": 3,
            "rules": [{"type": "EXCHANGE_ONCE"}],
            "status": "OPEN"
        })))
        .mount(&server)
        .await;

    let offer = client_for(&server)
        .get_offer(id(DUMMY_OFFER_ID))
        .await
        .unwrap();
    assert_eq!(offer.source_quantity, 2);
    assert_eq!(offer.target_quantity, 3);
    assert!(!offer.is_free());
    assert_eq!(offer.rules.len(), 1);
}

/// What is tested: a 404 maps to ApiError::NotFound
/// Why: flows branch on NotFound to tell benign-absent state from failure
#[tokio::test]
async fn test_not_found_maps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resources/unknown"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_resource("unknown")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

/// What is tested: a rejection body's error message is surfaced
/// Why: users see the ledger's reason, not a bare status code
#[tokio::test]
async fn test_ledger_rejection_message() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("/offers/{}/accept", DUMMY_OFFER_ID)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "offer is not open"
        })))
        .mount(&server)
        .await;

    let acceptance = OfferAcceptance {
        count: 1,
        source: None,
        target: id(DUMMY_ASSET_USER_RECEIVE),
    };
    let err = client_for(&server)
        .accept_offer(id(DUMMY_OFFER_ID), &acceptance)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("offer is not open"), "{}", err);
}

/// What is tested: the acceptance PATCH carries exactly count/source/target
/// Why: the ledger settles from this terse request; nothing else leaks in
#[tokio::test]
async fn test_accept_offer_patches() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("/offers/{}/accept", DUMMY_OFFER_ID)))
        .and(body_json(json!({
            "count": 3,
            "source": DUMMY_ASSET_USER_PAY,
            "target": DUMMY_ASSET_USER_RECEIVE
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("")))
        .expect(1)
        .mount(&server)
        .await;

    let acceptance = OfferAcceptance {
        count: 3,
        source: Some(id(DUMMY_ASSET_USER_PAY)),
        target: id(DUMMY_ASSET_USER_RECEIVE),
    };
    client_for(&server)
        .accept_offer(id(DUMMY_OFFER_ID), &acceptance)
        .await
        .unwrap();
}

/// What is tested: POST assets sends the creation payload and decodes the
/// created asset
/// Why: acceptance and offer flows both mint assets through this call
#[tokio::test]
async fn test_create_asset_posts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/assets"))
        .and(body_json(json!({"label": "pouch", "resource": "gold"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": DUMMY_ASSET_USER_RECEIVE,
            "label": "pouch",
            "resource": "gold",
            "quantity": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .create_asset(&marketplace_client::NewAsset {
            label: Some("pouch".to_string()),
            description: None,
            resource: "gold".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, id(DUMMY_ASSET_USER_RECEIVE));
    assert_eq!(created.quantity, 0);
}

/// What is tested: PATCH offers/{id}/close succeeds on an empty response
/// Why: closing an offer returns no body, only a status
#[tokio::test]
async fn test_close_offer() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("/offers/{}/close", DUMMY_OFFER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("")))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .close_offer(id(DUMMY_OFFER_ID))
        .await
        .unwrap();
}
