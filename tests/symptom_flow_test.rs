use anyhow::Result;
use httpmock::prelude::*;
use sq_client::adapters::http::build_client;
use sq_client::app::symptom_shell;
use sq_client::core::symptoms::SymptomRejection;
use sq_client::{AppError, HttpSymptomService, StaticCatalog, SymptomSelector};
use std::time::Duration;
use tokio::io::BufReader;

fn service(server: &MockServer) -> HttpSymptomService {
    HttpSymptomService::new(
        build_client(Duration::from_secs(5)).unwrap(),
        server.base_url(),
        "/",
    )
}

#[tokio::test]
async fn test_search_add_and_submit_against_backend() -> Result<()> {
    let server = MockServer::start();

    let search_mock = server.mock(|when, then| {
        when.method(GET).path("/search").query_param("query", "s");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!(["Itching", "Skin Rash", "Shivering"]));
    });

    let submit_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("symptoms=Skin+Rash&symptoms=Itching");
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<h2>Final prediction: Fungal infection</h2>");
    });

    let svc = service(&server);
    let mut selector = SymptomSelector::new(svc.clone(), svc);

    let options = selector.search("s").await?;
    assert_eq!(options, vec!["Itching", "Skin Rash", "Shivering"]);

    selector.add("Skin Rash")?;
    selector.add("Itching")?;
    assert_eq!(selector.options(), vec!["Shivering"]);

    let page = selector.submit().await?;

    search_mock.assert();
    submit_mock.assert();
    assert_eq!(page.status, 200);
    assert!(page.body.contains("Fungal infection"));
    Ok(())
}

#[tokio::test]
async fn test_submit_with_nothing_selected_never_posts() -> Result<()> {
    let server = MockServer::start();
    let submit_mock = server.mock(|when, then| {
        when.method(POST).path("/");
        then.status(200).body("should not be called");
    });

    let svc = service(&server);
    let selector = SymptomSelector::new(svc.clone(), svc);
    let err = selector.submit().await.unwrap_err();

    assert!(matches!(
        err,
        AppError::SymptomRejected(SymptomRejection::NothingSelected)
    ));
    submit_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_failed_search_surfaces_error_and_keeps_selection() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(500);
    });

    let svc = service(&server);
    let mut selector = SymptomSelector::new(svc.clone(), svc);
    selector.add("Chills")?;

    let err = selector.search("ch").await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(selector.selected().as_slice(), &["Chills".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_diagnose_reports_rejections_and_submits_the_rest() -> Result<()> {
    let server = MockServer::start();
    let submit_mock = server.mock(|when, then| {
        when.method(POST).path("/").body("symptoms=Chills");
        then.status(200).body("<p>ok</p>");
    });

    let svc = service(&server);
    let mut selector = SymptomSelector::new(svc.clone(), svc);
    let symptoms = vec!["Chills".to_string(), "Chills".to_string(), " ".to_string()];
    let mut out = Vec::new();

    let page = symptom_shell::diagnose(&mut selector, &symptoms, &mut out).await?;

    submit_mock.assert();
    assert_eq!(page.body, "<p>ok</p>");
    let printed = String::from_utf8(out)?;
    assert!(printed.contains("'Chills' is already selected"));
    assert!(printed.contains("symptom name is empty"));
    Ok(())
}

#[tokio::test]
async fn test_select_shell_runs_debounced_search_on_offline_catalog() -> Result<()> {
    let server = MockServer::start();
    let catalog = StaticCatalog::from_reader(
        "itching,skin_rash,nodal_skin_eruptions,chills,prognosis\n".as_bytes(),
    )?;
    let mut selector = SymptomSelector::new(catalog, service(&server));

    let input = BufReader::new(&b"search sk\nsearch skin\n"[..]);
    let mut out = Vec::new();
    let page = symptom_shell::run_select_shell(
        &mut selector,
        Duration::from_millis(20),
        input,
        &mut out,
    )
    .await?;

    assert!(page.is_none());
    let printed = String::from_utf8(out)?;
    assert!(printed.contains("  - Skin Rash"));
    assert!(printed.contains("  - Nodal Skin Eruptions"));
    assert!(!printed.contains("Chills"));
    Ok(())
}

#[tokio::test]
async fn test_select_shell_add_remove_and_submit() -> Result<()> {
    let server = MockServer::start();
    let submit_mock = server.mock(|when, then| {
        when.method(POST).path("/").body("symptoms=Vomiting");
        then.status(200).body("<p>GERD</p>");
    });

    let svc = service(&server);
    let mut selector = SymptomSelector::new(svc.clone(), svc);
    let script = "submit\nadd Chills\nadd Vomiting\nlist\nremove Chills\nremove Chills\nsubmit\n";
    let mut out = Vec::new();

    let page = symptom_shell::run_select_shell(
        &mut selector,
        Duration::from_millis(20),
        BufReader::new(script.as_bytes()),
        &mut out,
    )
    .await?;

    submit_mock.assert_hits(1);
    assert_eq!(page.map(|p| p.body).as_deref(), Some("<p>GERD</p>"));
    let printed = String::from_utf8(out)?;
    assert!(printed.contains("select at least one symptom before submitting"));
    assert!(printed.contains("'Chills' was not selected"));
    assert!(printed.contains("selected (1/10): Vomiting"));
    assert!(printed.contains("selected_symptoms=Chills,Vomiting"));
    Ok(())
}
