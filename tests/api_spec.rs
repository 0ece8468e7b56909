use axum::http::StatusCode;
use axum_test::TestServer;
use proposal_deck::api::create_router;
use proposal_deck::config::DeckConfig;
use proposal_deck::models::*;
use serde_json::{json, Value};

fn setup() -> TestServer {
    let app = create_router(DeckConfig::default());
    TestServer::new(app).expect("Failed to create test server")
}

fn sample_json() -> Value {
    serde_json::to_value(ProposalData::sample()).expect("Failed to serialize sample")
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();

        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }
}

mod generate {
    use super::*;

    #[tokio::test]
    async fn returns_a_pptx_attachment() {
        let server = setup();

        let response = server
            .post("/api/v1/generate")
            .json(&json!({ "data": sample_json(), "format": "pptx" }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("content-type"),
            OutputFormat::Pptx.content_type()
        );
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"proposal-Northwind.pptx\""
        );
        let bytes = response.as_bytes();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[tokio::test]
    async fn defaults_to_pptx_and_draft_name() {
        let server = setup();

        let response = server
            .post("/api/v1/generate")
            .json(&json!({ "data": {} }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"proposal-draft.pptx\""
        );
    }

    #[tokio::test]
    async fn treats_null_or_empty_format_as_pptx() {
        let server = setup();

        for format in [Value::Null, json!("")] {
            let response = server
                .post("/api/v1/generate")
                .json(&json!({ "data": {}, "format": format }))
                .await;

            response.assert_status_ok();
            assert_eq!(
                response.header("content-type"),
                OutputFormat::Pptx.content_type()
            );
        }
    }

    #[tokio::test]
    async fn rejects_missing_data() {
        let server = setup();

        let response = server
            .post("/api/v1/generate")
            .json(&json!({ "format": "pptx" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "Missing proposal data");
    }

    #[tokio::test]
    async fn rejects_pdf() {
        let server = setup();

        let response = server
            .post("/api/v1/generate")
            .json(&json!({ "data": sample_json(), "format": "pdf" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("pdf"));
    }

    #[tokio::test]
    async fn rejects_unknown_format() {
        let server = setup();

        let response = server
            .post("/api/v1/generate")
            .json(&json!({ "data": {}, "format": "keynote" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reports_the_slide_of_a_broken_logo() {
        let server = setup();
        let mut data = ProposalData::sample();
        data.cover.client_logo_base64 = Some("data:image/png;base64,***".to_string());

        let response = server
            .post("/api/v1/generate")
            .json(&json!({ "data": data }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().starts_with("slide 1 (Cover)"));
    }
}

mod preview {
    use super::*;

    #[tokio::test]
    async fn renders_the_cover_by_default() {
        let server = setup();

        let response = server.post("/api/v1/preview").json(&sample_json()).await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("data-section=\"cover\""));
        assert!(html.contains("Customer Portal Modernization"));
    }

    #[tokio::test]
    async fn renders_the_requested_slide() {
        let server = setup();

        let response = server
            .post("/api/v1/preview")
            .add_query_param("slide", 4)
            .json(&sample_json())
            .await;

        response.assert_status_ok();
        // Cover, challenge, solution, two scope pages: index 4 is scope page 2.
        let html = response.text();
        assert!(html.contains("data-section=\"scope\""));
        assert!(html.contains("Scope &amp; Features (2/2)"));
    }

    #[tokio::test]
    async fn returns_not_found_past_the_last_slide() {
        let server = setup();

        let response = server
            .post("/api/v1/preview")
            .add_query_param("slide", 99)
            .json(&sample_json())
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn renders_a_section_placeholder() {
        let server = setup();

        let response = server
            .post("/api/v1/preview/sections/risk")
            .json(&json!({}))
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Add team roles to see preview"));
    }

    #[tokio::test]
    async fn rejects_unknown_sections() {
        let server = setup();

        let response = server
            .post("/api/v1/preview/sections/appendix")
            .json(&json!({}))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}

mod layout {
    use super::*;

    #[tokio::test]
    async fn returns_deck_geometry() {
        let server = setup();

        let response = server.post("/api/v1/layout").json(&sample_json()).await;

        response.assert_status_ok();
        let deck: Value = response.json();
        let slides = deck["slides"].as_array().expect("slides array");
        assert_eq!(slides.len(), 8);
        assert_eq!(slides[0]["section"], "cover");
        assert_eq!(slides[0]["background"], "dark");
        assert_eq!(slides[7]["section"], "risk");
        let first = &slides[1]["elements"][0];
        assert_eq!(first["kind"]["type"], "slide_title");
        assert!(first["rect"]["left"].as_f64().is_some());
    }
}
