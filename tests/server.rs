//! HTTP tests for the catalog preview server.

use chrono::NaiveDate;
use nenamaga::models::Record;
use nenamaga::server::router;

fn record(id: &str, grade: u32, subject: &str, day: u32) -> Record {
    Record {
        id: id.to_string(),
        grade,
        subject: subject.to_string(),
        medium: "English".to_string(),
        year: 2023,
        term: 1,
        exam_type: "School Term Test".to_string(),
        title: format!("Grade {} {} 2023 Term 1", grade, subject),
        pdf_url: format!("https://drive.google.com/file/d/{}/view", id),
        download_url: None,
        file_size: None,
        notes: None,
        added_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
    }
}

async fn spawn() -> String {
    let records = vec![
        record("g7-maths-2023-t1-en", 7, "Maths", 20),
        record("g6-science-2023-t1-en", 6, "Science", 10),
    ];
    let app = router(records, "https://papers.example.org");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn health_reports_paper_count() {
    let base = spawn().await;
    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["papers"], 2);
}

#[tokio::test]
async fn papers_json_returns_catalog_in_order() {
    let base = spawn().await;
    let body: Vec<Record> = reqwest::get(format!("{}/papers.json", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0].id, "g7-maths-2023-t1-en");
}

#[tokio::test]
async fn unknown_paper_is_not_found() {
    let base = spawn().await;
    let resp = reqwest::get(format!("{}/papers/g9-nothing-2020-t1-en", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn search_endpoint_applies_filter() {
    let base = spawn().await;
    let body: serde_json::Value = reqwest::get(format!("{}/search?q=science", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["active"], true);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);

    let body: serde_json::Value = reqwest::get(format!("{}/search?q=s", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["active"], false);
}

#[tokio::test]
async fn sitemap_has_xml_headers() {
    let base = spawn().await;
    let resp = reqwest::get(format!("{}/sitemap.xml", base)).await.unwrap();
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "application/xml"
    );
    assert_eq!(
        resp.headers()["cache-control"].to_str().unwrap(),
        "public, max-age=3600"
    );
    let xml = resp.text().await.unwrap();
    assert!(xml.contains("<loc>https://papers.example.org/grade/7</loc>"));
}
