//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: QBO HTTP API → pages of normalized records

use qbo_sync::{
    AuthConfig, ConnectorConfig, Continuation, CustomerSyncParams, DateRange, Error,
    HttpFetcher, InvoiceSyncParams, ObjectStoreBlobStorage, QboConnector, SyncContext,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPANY: &str = "4620816365";

fn config(server: &MockServer) -> ConnectorConfig {
    let mut config = ConnectorConfig::default()
        .with_base_url(format!("{}/v3/company", server.uri()))
        .with_page_size(2)
        .with_pdf_page_size(2);
    config.http.requests_per_minute = 0;
    config.http.max_retries = 0;
    config
}

fn bearer() -> AuthConfig {
    AuthConfig::Bearer {
        token: "access-1".to_string(),
    }
}

fn context(server: &MockServer, auth: AuthConfig) -> SyncContext {
    let fetcher = HttpFetcher::from_config(&config(server), auth).unwrap();
    SyncContext::new(
        Arc::new(fetcher),
        Arc::new(ObjectStoreBlobStorage::in_memory()),
    )
}

async fn mount_query(server: &MockServer, query: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v3/company/{COMPANY}/query")))
        .and(query_param("query", query))
        .and(query_param("minorversion", "75"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_preferences(server: &MockServer, currency: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v3/company/{COMPANY}/preferences")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Preferences": {"CurrencyPrefs": {"HomeCurrency": {"value": currency}}}
        })))
        .mount(server)
        .await;
}

fn customer(id: &str, name: &str) -> Value {
    json!({
        "Id": id,
        "DisplayName": name,
        "GivenName": "Amy",
        "FamilyName": "Lauterbach",
        "Active": true,
        "Balance": 12.5,
        "PrimaryEmailAddr": {"Address": format!("{id}@example.com")},
        "BillAddr": {"Line1": "4581 Finch St.", "City": "Bayshore", "CountrySubDivisionCode": "CA", "PostalCode": "94326"},
        "MetaData": {"CreateTime": "2024-01-02T10:00:00-08:00", "LastUpdatedTime": "2024-03-04T11:30:00-08:00"}
    })
}

fn invoice(id: &str, currency: Option<&str>) -> Value {
    let mut invoice = json!({
        "Id": id,
        "DocNumber": format!("10{id}"),
        "TxnDate": "2024-05-01",
        "DueDate": "2024-05-31",
        "TotalAmt": 362.07,
        "Balance": 362.07,
        "CustomerRef": {"value": "1", "name": "Amy's Bird Sanctuary"},
        "BillEmail": {"Address": "birds@example.com"},
        "TxnTaxDetail": {"TotalTax": 26.82},
        "Line": [
            {
                "Id": "1", "LineNum": 1, "Amount": 275.0, "Description": "Rock Fountain",
                "DetailType": "SalesItemLineDetail",
                "SalesItemLineDetail": {"Qty": 1, "UnitPrice": 275, "ItemRef": {"value": "5", "name": "Rock Fountain"}}
            },
            {
                "Id": "2", "LineNum": 2, "Amount": 60.25, "Description": "Fountain Pump",
                "DetailType": "SalesItemLineDetail",
                "SalesItemLineDetail": {"Qty": 5, "UnitPrice": 12.05}
            },
            {"Amount": 335.25, "DetailType": "SubTotalLineDetail", "SubTotalLineDetail": {}}
        ],
        "MetaData": {"CreateTime": "2024-05-01T09:00:00-07:00", "LastUpdatedTime": "2024-05-02T09:00:00-07:00"}
    });
    if let Some(code) = currency {
        invoice["CurrencyRef"] = json!({"value": code});
    }
    invoice
}

// ============================================================================
// Customers
// ============================================================================

#[tokio::test]
async fn test_customers_two_pages_over_http() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "select * from Customer startposition 1 maxresults 2",
        json!({"QueryResponse": {"Customer": [customer("1", "Amy"), customer("2", "Bill")], "startPosition": 1, "maxResults": 2}}),
    )
    .await;
    mount_query(
        &server,
        "select * from Customer startposition 3 maxresults 2",
        json!({"QueryResponse": {"Customer": [customer("3", "Cool Cars")], "startPosition": 3, "maxResults": 1}}),
    )
    .await;

    let connector = QboConnector::new(config(&server));
    let params = CustomerSyncParams::new(COMPANY);
    let ctx = context(&server, bearer());

    let first = connector.sync_customers(&ctx, &params).await.unwrap();
    assert_eq!(first.result.len(), 2);
    assert_eq!(first.continuation, Some(Continuation::at(3)));

    let amy = &first.result[0];
    assert_eq!(amy.customer_id, "1");
    assert_eq!(amy.display_name.as_deref(), Some("Amy"));
    assert_eq!(amy.email.as_deref(), Some("1@example.com"));
    assert_eq!(
        amy.billing_address.as_ref().map(|a| a.summary.as_str()),
        Some("4581 Finch St., Bayshore, CA 94326")
    );

    let second = connector
        .sync_customers(&ctx.with_continuation(first.continuation), &params)
        .await
        .unwrap();
    assert_eq!(second.result.len(), 1);
    assert_eq!(second.result[0].customer_id, "3");
    assert!(second.is_last());
}

#[tokio::test]
async fn test_active_only_over_http() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "select * from Customer where Active = true startposition 1 maxresults 2",
        json!({"QueryResponse": {}}),
    )
    .await;

    let page = QboConnector::new(config(&server))
        .sync_customers(
            &context(&server, bearer()),
            &CustomerSyncParams::new(COMPANY).active_only(true),
        )
        .await
        .unwrap();

    assert!(page.result.is_empty());
    assert!(page.is_last());
}

#[tokio::test]
async fn test_unauthorized_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v3/company/{COMPANY}/query")))
        .respond_with(ResponseTemplate::new(401).set_body_string("AuthenticationFailed"))
        .mount(&server)
        .await;

    let err = QboConnector::new(config(&server))
        .sync_customers(&context(&server, bearer()), &CustomerSyncParams::new(COMPANY))
        .await
        .unwrap_err();

    assert!(err.is_auth_failure());
    assert!(matches!(err, Error::HttpStatus { status: 401, .. }));
}

#[tokio::test]
async fn test_refresh_flow_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v1/tokens/bearer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-access",
            "refresh_token": "rt-rotated",
            "expires_in": 3600,
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v3/company/{COMPANY}/query")))
        .and(header("Authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "QueryResponse": {"Customer": [customer("9", "Refreshed")]}
        })))
        .mount(&server)
        .await;

    let auth = AuthConfig::Oauth2Refresh {
        token_url: format!("{}/oauth2/v1/tokens/bearer", server.uri()),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        refresh_token: "rt-1".to_string(),
    };
    let page = QboConnector::new(config(&server))
        .sync_customers(&context(&server, auth), &CustomerSyncParams::new(COMPANY))
        .await
        .unwrap();

    assert_eq!(page.result[0].customer_id, "9");
}

// ============================================================================
// Invoices
// ============================================================================

#[tokio::test]
async fn test_invoices_with_pdfs_over_http() {
    let server = MockServer::start().await;
    mount_preferences(&server, "USD").await;
    mount_query(
        &server,
        "select * from Invoice where TxnDate >= '2024-01-01' and TxnDate <= '2024-12-31' startposition 1 maxresults 2",
        json!({"QueryResponse": {"Invoice": [invoice("130", None), invoice("131", Some("EUR"))]}}),
    )
    .await;
    for id in ["130", "131"] {
        Mock::given(method("GET"))
            .and(path(format!("/v3/company/{COMPANY}/invoice/{id}/pdf")))
            .and(header("Accept", "application/pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "application/pdf")
                    .set_body_bytes(format!("%PDF-{id}").into_bytes()),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let fetcher = HttpFetcher::from_config(&config(&server), bearer()).unwrap();
    let storage = Arc::new(ObjectStoreBlobStorage::in_memory());
    let ctx = SyncContext::new(Arc::new(fetcher), storage.clone());
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    );
    let params = InvoiceSyncParams::new(COMPANY)
        .date_range(Some(range))
        .include_pdfs(true);

    let page = QboConnector::new(config(&server))
        .sync_invoices(&ctx, &params)
        .await
        .unwrap();

    assert_eq!(page.continuation, Some(Continuation::at(3)));
    assert_eq!(page.result.len(), 2);

    let usd = &page.result[0];
    assert_eq!(usd.invoice_id, "130");
    assert_eq!(usd.currency, "USD");
    assert_eq!(usd.subtotal, Some(335.25));
    assert_eq!(usd.tax, Some(26.82));
    assert!(!usd.paid);
    assert_eq!(usd.line_items.len(), 2);
    assert_eq!(usd.line_items[0].summary, "1x Rock Fountain: $275.00");
    assert_eq!(usd.line_items[1].summary, "5x Fountain Pump: $60.25");

    let eur = &page.result[1];
    assert_eq!(eur.currency, "EUR");
    assert_eq!(eur.line_items[0].summary, "1x Rock Fountain: €275.00");

    for invoice in &page.result {
        let url = invoice.pdf.as_deref().unwrap();
        let body = storage.read_blob(url).await.unwrap();
        assert_eq!(body.as_ref(), format!("%PDF-{}", invoice.invoice_id).as_bytes());
    }
}

#[tokio::test]
async fn test_invoice_pdfs_to_local_dir() {
    let server = MockServer::start().await;
    mount_preferences(&server, "GBP").await;
    mount_query(
        &server,
        "select * from Invoice startposition 5 maxresults 2",
        json!({"QueryResponse": {"Invoice": [invoice("7", None)]}}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(format!("/v3/company/{COMPANY}/invoice/7/pdf")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-7".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let storage = ObjectStoreBlobStorage::local(dir.path()).unwrap();
    let fetcher = HttpFetcher::from_config(&config(&server), bearer()).unwrap();
    let ctx = SyncContext::new(Arc::new(fetcher), Arc::new(storage))
        .with_continuation(Some(Continuation::at(5)));

    let page = QboConnector::new(config(&server))
        .sync_invoices(&ctx, &InvoiceSyncParams::new(COMPANY).include_pdfs(true))
        .await
        .unwrap();

    assert!(page.is_last());
    let invoice = &page.result[0];
    assert_eq!(invoice.currency, "GBP");

    let url = invoice.pdf.as_deref().unwrap();
    assert!(url.starts_with("file://"));
    assert!(url.ends_with(".pdf"));
    let file = url.trim_start_matches("file://");
    assert_eq!(std::fs::read(file).unwrap(), b"%PDF-7");
}

#[tokio::test]
async fn test_preferences_error_fails_page() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "select * from Invoice startposition 1 maxresults 2",
        json!({"QueryResponse": {"Invoice": [invoice("1", None)]}}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(format!("/v3/company/{COMPANY}/preferences")))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let result = QboConnector::new(config(&server))
        .sync_invoices(&context(&server, bearer()), &InvoiceSyncParams::new(COMPANY))
        .await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 403, .. })));
}
