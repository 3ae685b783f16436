use async_trait::async_trait;
use chrono::NaiveDate;
use hubeau::analyzers::{StationStatus, TimeSeriesCandidate};
use hubeau::api::HubeauClient;
use hubeau::config::{PipelineConfig, StationSelection};
use hubeau::fetch::{HttpClient, PageRequest, Pagination};
use hubeau::models::AnalysePc;
use hubeau::pipeline::Pipeline;
use reqwest::Url;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::time::Duration;

/// Serves canned Hub'Eau pages keyed on the request path.
struct FakeHubeau {
    stations: Vec<Value>,
    analyses: Vec<Value>,
    seen: Mutex<Vec<Url>>,
}

impl FakeHubeau {
    fn new(stations: Vec<Value>, analyses: Vec<Value>) -> Self {
        Self {
            stations,
            analyses,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn requests_to(&self, path_suffix: &str) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.path().ends_with(path_suffix))
            .count()
    }

    fn page(items: &[Value], url: &Url) -> Value {
        let q = |name: &str| {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .and_then(|(_, v)| v.parse::<usize>().ok())
        };
        let size = q("size").unwrap_or(20);
        let start = match (q("start"), q("page")) {
            (Some(start), _) => start,
            (None, Some(page)) => (page - 1) * size,
            (None, None) => 0,
        };
        let data: Vec<Value> = items.iter().skip(start).take(size).cloned().collect();
        json!({"count": items.len(), "api_version": "2.0.1", "data": data})
    }
}

#[async_trait]
impl HttpClient for FakeHubeau {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let url = req.url().clone();
        self.seen.lock().unwrap().push(url.clone());

        let body = if url.path().ends_with("/station_pc") {
            Self::page(&self.stations, &url)
        } else if url.path().ends_with("/analyse_pc") {
            let code = url
                .query_pairs()
                .find(|(k, _)| k == "code_station")
                .map(|(_, v)| v.into_owned());
            let mine: Vec<Value> = self
                .analyses
                .iter()
                .filter(|a| a["code_station"].as_str() == code.as_deref())
                .cloned()
                .collect();
            Self::page(&mine, &url)
        } else {
            let resp = http::Response::builder().status(404).body(String::new()).unwrap();
            return Ok(reqwest::Response::from(resp));
        };

        let resp = http::Response::builder()
            .status(200)
            .header("content-type", "application/json")
            .body(body.to_string())
            .unwrap();
        Ok(reqwest::Response::from(resp))
    }
}

fn config(dir: &std::path::Path) -> PipelineConfig {
    PipelineConfig {
        output_dir: dir.to_path_buf(),
        pause: Duration::ZERO,
        ..Default::default()
    }
}

fn analysis(code: &str, date: &str, result: Value) -> Value {
    json!({
        "code_station": code,
        "libelle_parametre": "pH",
        "date_prelevement": date,
        "resultat": result
    })
}

#[tokio::test]
async fn test_ph_time_series_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeHubeau::new(
        vec![json!({"code_station": "A1", "libelle_station": "La Loire à Blois"})],
        vec![
            analysis("A1", "2020-01-01", json!(7.1)),
            analysis("A1", "2020-06-01", json!(7.3)),
            analysis("A1", "2020-06-01", json!("0")),
        ],
    );
    let client = HubeauClient::with_http_client(fake, "https://example.org/api/v2");
    let pipeline = Pipeline::new(client, config(dir.path()));

    let results = pipeline.run().await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, StationStatus::Ok);
    assert_eq!(results[0].analysis_count, Some(3));
    assert_eq!(
        results[0].tsa_candidates,
        vec![TimeSeriesCandidate {
            parameter: "pH".into(),
            n_measurements: 2,
            min_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            max_date: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
            time_span_days: 152,
        }]
    );

    let csv = std::fs::read_to_string(dir.path().join("tsa_analysis.csv")).unwrap();
    assert_eq!(
        csv.lines().nth(1),
        Some("A1;La Loire à Blois;pH;2;2020-01-01;2020-06-01;152")
    );
    let report: Vec<Value> =
        serde_json::from_slice(&std::fs::read(dir.path().join("tsa_report.json")).unwrap())
            .unwrap();
    assert_eq!(report[0]["tsa_candidates"][0]["time_span_days"], 152);
    assert!(report[0]["station"].get("longitude").is_none());
    assert!(dir.path().join("tsa_summary.md").exists());
}

#[tokio::test]
async fn test_station_without_analyses_has_no_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeHubeau::new(vec![json!({"code_station": "EMPTY"})], Vec::new());
    let client = HubeauClient::with_http_client(fake, "https://example.org/api/v2");
    let pipeline = Pipeline::new(client, config(dir.path()));

    let results = pipeline.run().await.unwrap();

    assert_eq!(results[0].status, StationStatus::Ok);
    assert_eq!(results[0].analysis_count, Some(0));
    assert!(results[0].tsa_candidates.is_empty());
}

#[tokio::test]
async fn test_station_selection_by_index() {
    let dir = tempfile::tempdir().unwrap();
    let stations = (0..250)
        .map(|i| json!({"code_station": format!("S{i:03}")}))
        .collect();
    let fake = FakeHubeau::new(stations, Vec::new());
    let client = HubeauClient::with_http_client(fake, "https://example.org/api/v2");
    let config = PipelineConfig {
        selection: StationSelection::Indices(vec![210, 5]),
        ..config(dir.path())
    };
    let pipeline = Pipeline::new(client, config);

    let stations = pipeline.select_stations().await.unwrap();

    let codes: Vec<_> = stations.iter().map(|s| s.display_code()).collect();
    assert_eq!(codes, ["S005", "S210"]);
}

#[tokio::test]
async fn test_full_pages_then_short_page() {
    let analyses: Vec<Value> = (0..2400)
        .map(|i| analysis("P1", "2021-01-01", json!(i + 1)))
        .collect();
    let fake = FakeHubeau::new(Vec::new(), analyses);
    let client = HubeauClient::with_http_client(fake, "https://example.org/api/v2");
    let request = client
        .qualite_rivieres()
        .analyses_request("P1", 1000, Pagination::Page)
        .unwrap();

    let collected = client.collect::<AnalysePc>(request).await;

    assert_eq!(collected.records.len(), 2400);
    assert!(!collected.truncated);
    assert_eq!(client.http().requests_to("/analyse_pc"), 3);
}

#[tokio::test]
async fn test_offset_walk_over_stations() {
    let stations: Vec<Value> = (0..7).map(|i| json!({"code_station": format!("S{i}")})).collect();
    let fake = FakeHubeau::new(stations, Vec::new());
    let client = HubeauClient::with_http_client(fake, "https://example.org/api/v2");
    let request: PageRequest = client
        .qualite_rivieres()
        .stations_request(3, Pagination::Offset);

    let collected = client.collect::<hubeau::models::StationPc>(request).await;

    assert_eq!(collected.records.len(), 7);
    assert_eq!(collected.records[6].display_code(), "S6");
    assert_eq!(client.http().requests_to("/station_pc"), 3);
}
