//! Integration test: full run against a local stub of both remote services.
//!
//! The info endpoint serves a canned payload; the manifest endpoint answers
//! per depot (body, HTTP 500, or an empty 200). Runs go through the real
//! curl-backed sources.

mod common;

use common::stub_server::{self, StubServer};
use dmf_core::fetch::HttpArtifactSource;
use dmf_core::http::HttpOptions;
use dmf_core::item::AppId;
use dmf_core::pipeline::{Pipeline, RunError, RunPlan};
use dmf_core::resolve::{HttpInfoSource, ResolveError};
use dmf_core::retry::RetryPolicy;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

const API_KEY: &str = "test-key";

const INFO: &str = r#"{
    "status": "success",
    "data": { "1000": { "depots": {
        "1001": { "manifests": { "public": { "gid": "5550001" } } },
        "2002": { "manifests": { "public": {} } },
        "3003": { "manifests": { "public": { "gid": "777" } } },
        "4004": { "manifests": { "public": { "gid": "888" } } },
        "5005": { "manifests": { "public": { "gid": "999" } } }
    } } }
}"#;

const LUA: &str = r#"-- generated
addappid(1000)
addappid(1001, 1, "ab12")
addappid(1001, 2, "cd34")
addappid(2002, 1, "ef56")
addappid(3003, 1, "0a0a")
addappid(4004, 1, "FFFF")
addappid(5005, 1, "beef")
"#;

fn manifest_body() -> Vec<u8> {
    (0u8..=255).cycle().take(16 * 1024).collect()
}

fn query(target: &str) -> HashMap<String, String> {
    url::Url::parse(&format!("http://stub{}", target))
        .map(|u| u.query_pairs().into_owned().collect())
        .unwrap_or_default()
}

fn start_services(info: &'static str) -> StubServer {
    stub_server::start(move |target| {
        if target.starts_with("/info/1000") {
            return (200, info.as_bytes().to_vec());
        }
        if target.starts_with("/manifest") {
            let q = query(target);
            if q.get("apikey").map(String::as_str) != Some(API_KEY) {
                return (403, Vec::new());
            }
            return match q.get("depotid").map(String::as_str) {
                Some("1001") => (200, manifest_body()),
                Some("3003") => (500, b"upstream error".to_vec()),
                Some("5005") => (200, Vec::new()),
                _ => (404, Vec::new()),
            };
        }
        (404, Vec::new())
    })
}

fn write_plan(root: &Path, lua: &str) -> RunPlan {
    let config_file = root.join("1000.lua");
    std::fs::write(&config_file, lua).unwrap();
    RunPlan {
        app: AppId::parse("1000").unwrap(),
        config_file,
        output_dir: root.join("depotcache"),
    }
}

fn sources(server: &StubServer) -> (HttpInfoSource, HttpArtifactSource) {
    let opts = HttpOptions::with_timeout(Duration::from_secs(10));
    (
        HttpInfoSource::new(format!("{}/info", server.base_url()), opts),
        HttpArtifactSource::new(format!("{}/manifest", server.base_url()), API_KEY, opts),
    )
}

#[test]
fn full_run_downloads_skips_and_reports_failures() {
    let server = start_services(INFO);
    let root = tempdir().unwrap();
    let plan = write_plan(root.path(), LUA);
    std::fs::create_dir_all(&plan.output_dir).unwrap();
    std::fs::write(plan.output_dir.join("4004_888.manifest"), vec![9u8; 512]).unwrap();

    let (info, artifacts) = sources(&server);
    let pipeline = Pipeline::new(&info, &artifacts, RetryPolicy::immediate(5));
    let summary = pipeline.run(&plan, &mut |_| {}).expect("run");

    assert_eq!(summary.downloaded, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.bytes_downloaded, manifest_body().len() as u64);
    assert_eq!(summary.unresolved.len(), 1);
    assert_eq!(summary.unresolved[0].as_str(), "2002");

    assert_eq!(summary.failed_count(), 2);
    let failed: Vec<(&str, &str, &str, u32)> = summary
        .failed
        .iter()
        .map(|f| (f.depot.as_str(), f.manifest.as_str(), f.error.as_str(), f.attempts))
        .collect();
    assert_eq!(
        failed,
        vec![
            ("3003", "777", "HTTP 500", 5),
            ("5005", "999", "empty response body", 5),
        ]
    );

    assert_eq!(server.count("/info/"), 1);
    assert_eq!(server.count("/manifest?apikey=test-key&depotid=1001&"), 1);
    assert_eq!(server.count("/manifest?apikey=test-key&depotid=3003&"), 5);
    assert_eq!(server.count("/manifest?apikey=test-key&depotid=5005&"), 5);
    assert_eq!(server.count("/manifest?apikey=test-key&depotid=4004&"), 0);
    assert_eq!(server.count("/manifest?apikey=test-key&depotid=2002&"), 0);

    let downloaded = std::fs::read(plan.output_dir.join("1001_5550001.manifest")).unwrap();
    assert_eq!(downloaded, manifest_body());
    assert!(!plan.output_dir.join("3003_777.manifest").exists());
    assert!(!plan.output_dir.join("5005_999.manifest").exists());
    let leftovers: Vec<_> = std::fs::read_dir(&plan.output_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
        .collect();
    assert!(leftovers.is_empty(), "no partial files may remain");
}

#[test]
fn second_run_makes_no_manifest_requests_for_present_files() {
    let server = start_services(INFO);
    let root = tempdir().unwrap();
    let plan = write_plan(root.path(), "addappid(1001, 1, \"ab12\")\n");
    let (info, artifacts) = sources(&server);
    let pipeline = Pipeline::new(&info, &artifacts, RetryPolicy::immediate(5));

    let first = pipeline.run(&plan, &mut |_| {}).unwrap();
    assert_eq!(first.downloaded, 1);
    let target = plan.output_dir.join("1001_5550001.manifest");
    let before = std::fs::read(&target).unwrap();
    let manifest_requests = server.count("/manifest");
    assert_eq!(manifest_requests, 1);

    let second = pipeline.run(&plan, &mut |_| {}).unwrap();
    assert_eq!(second.downloaded, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(second.bytes_skipped, before.len() as u64);
    assert_eq!(server.count("/manifest"), manifest_requests);
    assert_eq!(std::fs::read(&target).unwrap(), before);
}

#[test]
fn info_status_failure_is_fatal() {
    let server = start_services(r#"{"status":"failed","data":{}}"#);
    let root = tempdir().unwrap();
    let plan = write_plan(root.path(), LUA);
    let (info, artifacts) = sources(&server);
    let err = Pipeline::new(&info, &artifacts, RetryPolicy::immediate(5))
        .run(&plan, &mut |_| {})
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::InfoUnavailable {
            source: ResolveError::Status(_),
            ..
        }
    ));
    assert_eq!(server.count("/manifest"), 0);
}

#[test]
fn unreachable_info_service_is_fatal() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let root = tempdir().unwrap();
    let plan = write_plan(root.path(), LUA);
    let opts = HttpOptions::with_timeout(Duration::from_secs(5));
    let info = HttpInfoSource::new(format!("http://127.0.0.1:{}/info", port), opts);
    let artifacts =
        HttpArtifactSource::new(format!("http://127.0.0.1:{}/manifest", port), API_KEY, opts);
    let err = Pipeline::new(&info, &artifacts, RetryPolicy::immediate(5))
        .run(&plan, &mut |_| {})
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::InfoUnavailable {
            source: ResolveError::Transport(_),
            ..
        }
    ));
    assert!(!plan.output_dir.exists());
}
