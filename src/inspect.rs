//! Schema inspection against live responses.
//!
//! These helpers read samples as raw JSON objects so that records which do
//! not match the declared models can still be described. Only
//! [`validate_endpoint`] decodes strictly.

use crate::api::{Api, Endpoint, HubeauClient};
use crate::error::{HubeauError, Result};
use crate::fetch::HttpClient;
use crate::models::{
    AnalysePc, ConditionEnvironnementalePc, ObsElab, ObservationTr, OperationPc, Record, Site,
    Station, StationPc, declared_fields,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const MAX_SAMPLE_VALUES: usize = 5;

/// Records fetched per endpoint by [`check_fields`].
pub const CHECK_SAMPLE_SIZE: usize = 20;

/// What a sample says about one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldInfo {
    /// JSON type names seen (`string`, `integer`, `float`, `boolean`, `array`, `object`, `null`).
    pub types: BTreeSet<&'static str>,
    /// Records of the sample in which the field is present.
    pub occurrences: usize,
    pub example: Value,
    /// Up to five distinct values, in order of appearance.
    pub samples: Vec<Value>,
}

impl FieldInfo {
    /// Rust type a model field would need to accept every value seen.
    ///
    /// `sample_len` is the number of records in the sample; a field absent
    /// from some of them is optional.
    pub fn suggested_type(&self, sample_len: usize) -> String {
        let mut types = self.types.clone();
        let optional = types.remove("null") || self.occurrences < sample_len;
        if types.contains("integer") && types.contains("float") {
            types.remove("integer");
        }

        let base = match types.len() {
            0 => "serde_json::Value".to_string(),
            1 => match types.first().copied().unwrap_or_default() {
                "string" => "String".to_string(),
                "integer" => "i64".to_string(),
                "float" => "f64".to_string(),
                "boolean" => "bool".to_string(),
                "array" if self.samples.iter().all(is_string_array) => "Vec<String>".to_string(),
                "array" => "Vec<serde_json::Value>".to_string(),
                "object" => "serde_json::Map<String, serde_json::Value>".to_string(),
                _ => "serde_json::Value".to_string(),
            },
            _ => "serde_json::Value".to_string(),
        };

        if optional && base != "serde_json::Value" {
            format!("Option<{base}>")
        } else {
            base
        }
    }
}

fn is_string_array(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(|v| v.is_string() || v.is_null()),
        _ => true,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Describes every field found in `records`, keyed by field name.
pub fn field_report(records: &[Map<String, Value>]) -> BTreeMap<String, FieldInfo> {
    let mut report: BTreeMap<String, FieldInfo> = BTreeMap::new();
    for record in records {
        for (key, value) in record {
            let info = report.entry(key.clone()).or_insert_with(|| FieldInfo {
                types: BTreeSet::new(),
                occurrences: 0,
                example: value.clone(),
                samples: Vec::new(),
            });
            info.types.insert(json_type(value));
            info.occurrences += 1;
            if info.samples.len() < MAX_SAMPLE_VALUES && !info.samples.contains(value) {
                info.samples.push(value.clone());
            }
        }
    }
    report
}

/// A Rust struct accepting every field of `report`.
pub fn struct_template(
    name: &str,
    report: &BTreeMap<String, FieldInfo>,
    sample_len: usize,
) -> String {
    let mut out = String::from("#[derive(Debug, Clone, Default, Serialize, Deserialize)]\n");
    out.push_str(&format!("pub struct {name} {{\n"));
    for (field, info) in report {
        out.push_str(&format!(
            "    pub {field}: {},\n",
            info.suggested_type(sample_len)
        ));
    }
    out.push_str("    #[serde(flatten)]\n    pub extra: Map<String, Value>,\n}\n");
    out
}

/// Field names declared by the model of `endpoint`.
pub fn model_fields(endpoint: Endpoint) -> BTreeSet<String> {
    match endpoint {
        Endpoint::StationPc => declared_fields::<StationPc>(),
        Endpoint::AnalysePc => declared_fields::<AnalysePc>(),
        Endpoint::OperationPc => declared_fields::<OperationPc>(),
        Endpoint::ConditionEnvironnementalePc => declared_fields::<ConditionEnvironnementalePc>(),
        Endpoint::Sites => declared_fields::<Site>(),
        Endpoint::Stations => declared_fields::<Station>(),
        Endpoint::ObservationsTr => declared_fields::<ObservationTr>(),
        Endpoint::ObsElab => declared_fields::<ObsElab>(),
    }
}

/// Difference between the fields a sample carries and those a model declares.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldDiff {
    /// In responses, not in the model.
    pub undocumented: BTreeSet<String>,
    /// In the model, not in responses. Usually fine for optional fields.
    pub missing: BTreeSet<String>,
    pub response_fields: BTreeSet<String>,
    pub model_fields: BTreeSet<String>,
}

pub fn diff_fields(records: &[Map<String, Value>], model_fields: BTreeSet<String>) -> FieldDiff {
    let response_fields: BTreeSet<String> =
        records.iter().flat_map(|r| r.keys().cloned()).collect();
    FieldDiff {
        undocumented: response_fields.difference(&model_fields).cloned().collect(),
        missing: model_fields.difference(&response_fields).cloned().collect(),
        response_fields,
        model_fields,
    }
}

async fn sample<C: HttpClient>(
    client: &HubeauClient<C>,
    endpoint: Endpoint,
    size: usize,
) -> Result<Vec<Map<String, Value>>> {
    let params = vec![("size".to_string(), size.to_string())];
    Ok(client.get_raw(endpoint, &params).await?.data)
}

/// Field report over a sample of `endpoint`, with the sample length.
pub async fn inspect_endpoint<C: HttpClient>(
    client: &HubeauClient<C>,
    endpoint: Endpoint,
) -> Result<(BTreeMap<String, FieldInfo>, usize)> {
    let records = sample(client, endpoint, endpoint.sample_size()).await?;
    info!(%endpoint, records = records.len(), "Inspecting sample");
    Ok((field_report(&records), records.len()))
}

/// Compares a sample of `endpoint` with its declared model.
pub async fn check_fields<C: HttpClient>(
    client: &HubeauClient<C>,
    endpoint: Endpoint,
) -> Result<FieldDiff> {
    let records = sample(client, endpoint, CHECK_SAMPLE_SIZE).await?;
    if records.is_empty() {
        warn!(%endpoint, "No data returned");
    }
    Ok(diff_fields(&records, model_fields(endpoint)))
}

async fn decode_page<C: HttpClient, T: Record>(
    client: &HubeauClient<C>,
    endpoint: Endpoint,
) -> Result<usize> {
    let params = vec![("size".to_string(), endpoint.sample_size().to_string())];
    let page = client.get_page::<T>(endpoint, &params).await?;
    let extra: BTreeSet<&String> = page.data.iter().flat_map(|r| r.extra_fields().keys()).collect();
    if !extra.is_empty() {
        warn!(%endpoint, ?extra, "Records carry undeclared fields");
    }
    Ok(page.data.len())
}

/// Strictly decodes one small page of `endpoint` and returns the record count.
///
/// Any record that does not fit its model fails the whole page.
pub async fn validate_endpoint<C: HttpClient>(
    client: &HubeauClient<C>,
    endpoint: Endpoint,
) -> Result<usize> {
    match endpoint {
        Endpoint::StationPc => decode_page::<C, StationPc>(client, endpoint).await,
        Endpoint::AnalysePc => decode_page::<C, AnalysePc>(client, endpoint).await,
        Endpoint::OperationPc => decode_page::<C, OperationPc>(client, endpoint).await,
        Endpoint::ConditionEnvironnementalePc => {
            decode_page::<C, ConditionEnvironnementalePc>(client, endpoint).await
        }
        Endpoint::Sites => decode_page::<C, Site>(client, endpoint).await,
        Endpoint::Stations => decode_page::<C, Station>(client, endpoint).await,
        Endpoint::ObservationsTr => decode_page::<C, ObservationTr>(client, endpoint).await,
        Endpoint::ObsElab => decode_page::<C, ObsElab>(client, endpoint).await,
    }
}

/// Count and field listing of one endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointSummary {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    fs::write(path, contents).map_err(|e| HubeauError::Io(path.to_path_buf(), e))
}

/// Samples every endpoint of `api` and saves what was found under `out_dir`.
///
/// Per endpoint this writes `<name>_sample.json` and `<name>_fields.txt`;
/// the combined summaries go to `explore_results.json`. An endpoint that
/// fails is reported in its summary and does not stop the others.
pub async fn explore<C: HttpClient>(
    client: &HubeauClient<C>,
    api: Api,
    out_dir: &Path,
) -> Result<Vec<EndpointSummary>> {
    fs::create_dir_all(out_dir).map_err(|e| HubeauError::Io(out_dir.to_path_buf(), e))?;

    let mut summaries = Vec::new();
    for &endpoint in api.endpoints() {
        let params = vec![("size".to_string(), endpoint.sample_size().to_string())];
        let page = match client.get_raw(endpoint, &params).await {
            Ok(page) => page,
            Err(e) => {
                warn!(%endpoint, error = %e, "Failed to sample endpoint");
                summaries.push(EndpointSummary {
                    endpoint: endpoint.name().to_string(),
                    count: None,
                    fields: Vec::new(),
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        let fields: Vec<String> = field_report(&page.data).into_keys().collect();
        let stem = endpoint.file_stem();
        write_file(
            &out_dir.join(format!("{stem}_sample.json")),
            serde_json::to_vec_pretty(&page.data)?,
        )?;
        write_file(&out_dir.join(format!("{stem}_fields.txt")), fields.join("\n"))?;

        info!(%endpoint, count = page.count, fields = fields.len(), "Explored endpoint");
        summaries.push(EndpointSummary {
            endpoint: endpoint.name().to_string(),
            count: Some(page.count),
            fields,
            error: None,
        });
    }

    write_file(
        &out_dir.join("explore_results.json"),
        serde_json::to_vec_pretty(&summaries)?,
    )?;
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{ScriptedClient, envelope};
    use serde_json::json;
    use tempfile::tempdir;

    fn records(values: Vec<Value>) -> Vec<Map<String, Value>> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_field_report_types_and_samples() {
        let sample = records(vec![
            json!({"code": "A", "flow": 1, "tags": ["x"]}),
            json!({"code": "B", "flow": 2.5, "tags": null}),
            json!({"code": "A", "flow": 3}),
        ]);

        let report = field_report(&sample);

        let code = &report["code"];
        assert_eq!(code.samples, vec![json!("A"), json!("B")]);
        assert_eq!(code.suggested_type(3), "String");
        assert_eq!(report["flow"].suggested_type(3), "f64");
        assert_eq!(report["tags"].suggested_type(3), "Option<Vec<String>>");
        assert_eq!(report["tags"].example, json!(["x"]));
    }

    #[test]
    fn test_mixed_types_fall_back_to_value() {
        let sample = records(vec![json!({"v": "1"}), json!({"v": 1})]);
        let report = field_report(&sample);

        assert_eq!(report["v"].suggested_type(2), "serde_json::Value");
    }

    #[test]
    fn test_diff_fields() {
        let sample = records(vec![json!({"code_station": "A1", "brand_new": 1})]);
        let diff = diff_fields(&sample, model_fields(Endpoint::StationPc));

        assert_eq!(diff.undocumented, BTreeSet::from(["brand_new".to_string()]));
        assert!(diff.missing.contains("libelle_station"));
        assert!(!diff.missing.contains("code_station"));
    }

    #[test]
    fn test_struct_template() {
        let sample = records(vec![json!({"code": "A"}), json!({})]);
        let template = struct_template("Thing", &field_report(&sample), 2);

        assert!(template.contains("pub struct Thing {"));
        assert!(template.contains("    pub code: Option<String>,"));
    }

    #[tokio::test]
    async fn test_validate_endpoint_reports_count() {
        let client = HubeauClient::with_http_client(
            ScriptedClient::new(|_| {
                (
                    200,
                    envelope(2, vec![json!({"code_station": "A1"}), json!({"code_station": "B2"})]),
                )
            }),
            "https://example.org/api/v2",
        );

        let n = validate_endpoint(&client, Endpoint::StationPc).await.unwrap();
        assert_eq!(n, 2);
    }

    #[tokio::test]
    async fn test_explore_writes_files_and_survives_failures() {
        let dir = tempdir().unwrap();
        let client = HubeauClient::with_http_client(
            ScriptedClient::new(|url| {
                if url.path().ends_with("observations_tr") {
                    return (503, String::new());
                }
                (200, envelope(42, vec![json!({"code_site": "X", "libelle_site": "Y"})]))
            }),
            "https://example.org/api/v2",
        );

        let summaries = explore(&client, Api::Hydrometrie, dir.path()).await.unwrap();

        assert_eq!(summaries.len(), 4);
        assert_eq!(summaries[0].count, Some(42));
        assert_eq!(summaries[0].fields, ["code_site", "libelle_site"]);
        assert!(summaries[2].error.is_some());
        assert!(dir.path().join("referentiel_sites_sample.json").exists());
        assert!(dir.path().join("obs_elab_fields.txt").exists());
        assert!(!dir.path().join("observations_tr_sample.json").exists());
        assert!(dir.path().join("explore_results.json").exists());
    }
}
