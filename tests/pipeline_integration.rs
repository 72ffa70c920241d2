mod common;

use common::{read_entries, test_config, widgets_archive, zip_bytes};
use git_sourcezip::{
    ArchiveFetcher, PipelineError, PipelineOrchestrator, PipelineStage, RemoteArchiveRef,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WIDGETS_PATH: &str = "/acme/widgets/archive/refs/heads/main.zip";

async fn serve(server: &MockServer, status: u16, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(WIDGETS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_clean_zip_keeps_only_python_sources() {
    let server = MockServer::start().await;
    serve(&server, 200, widgets_archive()).await;

    let work = TempDir::new().unwrap();
    let remote = RemoteArchiveRef::new("acme", "widgets").unwrap();
    let mut orchestrator = PipelineOrchestrator::new(test_config(&server.uri())).unwrap();

    let report = orchestrator
        .fetch_clean_zip(&remote, work.path())
        .await
        .unwrap();

    assert_eq!(orchestrator.stage(), PipelineStage::Done);
    assert!(work.path().join("widgets-HEAD.zip").is_file());
    assert_eq!(
        fs::read_to_string(work.path().join("py_files/src/app.py")).unwrap(),
        "print('widgets')\n"
    );
    assert!(!work.path().join("py_files/README.md").exists());

    let cleaned = work.path().join("cleaned_widgets.zip");
    assert_eq!(report.cleaned.path, cleaned);
    assert_eq!(
        read_entries(&cleaned),
        vec![("src/app.py".to_string(), "print('widgets')\n".to_string())]
    );
    assert_eq!(report.stats.files_extracted, 1);
    assert_eq!(report.stats.entries_skipped, 1);
    assert_eq!(report.stats.entries_archived, 1);
    assert!(report.stats.fetch_duration <= report.stats.duration);
}

#[tokio::test]
async fn test_not_found_fails_before_extraction() {
    let server = MockServer::start().await;
    serve(&server, 404, b"Not Found".to_vec()).await;

    let work = TempDir::new().unwrap();
    let remote = RemoteArchiveRef::new("acme", "widgets").unwrap();
    let mut orchestrator = PipelineOrchestrator::new(test_config(&server.uri())).unwrap();

    let err = orchestrator
        .fetch_clean_zip(&remote, work.path())
        .await
        .unwrap_err();

    assert_eq!(orchestrator.stage(), PipelineStage::Failed);
    assert_eq!(err.stage(), Some(PipelineStage::Fetching));
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("Not Found"));

    assert!(!work.path().join("py_files").exists());
    assert!(!work.path().join("cleaned_widgets.zip").exists());
    assert!(!work.path().join("widgets-HEAD.zip").exists());
}

#[tokio::test]
async fn test_corrupt_archive_fails_in_extract_stage() {
    let server = MockServer::start().await;
    serve(&server, 200, b"this body is definitely not a zip archive at all".to_vec()).await;

    let work = TempDir::new().unwrap();
    let remote = RemoteArchiveRef::new("acme", "widgets").unwrap();
    let mut orchestrator = PipelineOrchestrator::new(test_config(&server.uri())).unwrap();

    let err = orchestrator
        .fetch_clean_zip(&remote, work.path())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(PipelineStage::Extracting));
    match err {
        PipelineError::Stage { error, .. } => {
            assert!(matches!(*error, PipelineError::ArchiveFormat { .. }))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!work.path().join("py_files").exists());
    assert!(!work.path().join("cleaned_widgets.zip").exists());
}

#[tokio::test]
async fn test_rerun_produces_identical_output() {
    let server = MockServer::start().await;
    serve(
        &server,
        200,
        zip_bytes(&[
            ("widgets-main/lib/core.py", "core = True\n"),
            ("widgets-main/lib/Helpers.PY", "helpers = True\n"),
            ("widgets-main/setup.cfg", "[metadata]\n"),
        ]),
    )
    .await;

    let work = TempDir::new().unwrap();
    let remote = RemoteArchiveRef::new("acme", "widgets").unwrap();
    let mut orchestrator = PipelineOrchestrator::new(test_config(&server.uri())).unwrap();

    let first = orchestrator
        .fetch_clean_zip(&remote, work.path())
        .await
        .unwrap();
    let first_entries = read_entries(&first.cleaned.path);

    fs::write(work.path().join("py_files/leftover.py"), "stale").unwrap();

    let second = orchestrator
        .fetch_clean_zip(&remote, work.path())
        .await
        .unwrap();

    assert_eq!(read_entries(&second.cleaned.path), first_entries);
    assert_eq!(second.cleaned.sha256, first.cleaned.sha256);
    assert_eq!(second.downloaded.sha256, first.downloaded.sha256);
    assert!(!work.path().join("py_files/leftover.py").exists());
}

#[tokio::test]
async fn test_fetcher_writes_full_body() {
    let server = MockServer::start().await;
    let body = widgets_archive();
    serve(&server, 200, body.clone()).await;

    let work = TempDir::new().unwrap();
    let destination = work.path().join("nested/dir/archive.zip");
    let fetcher = ArchiveFetcher::new(test_config(&server.uri()).remote).unwrap();
    let remote = RemoteArchiveRef::new("acme", "widgets").unwrap();

    let fetched = fetcher.fetch(&remote, Some(&destination)).await.unwrap();

    assert_eq!(fetched.path, destination);
    assert_eq!(fetched.bytes, body.len() as u64);
    assert_eq!(fs::read(&destination).unwrap(), body);
    assert_eq!(fetched.url, format!("{}{}", server.uri(), WIDGETS_PATH));
}

#[tokio::test]
async fn test_fetcher_server_error_carries_body() {
    let server = MockServer::start().await;
    serve(&server, 500, b"boom".to_vec()).await;

    let work = TempDir::new().unwrap();
    let destination = work.path().join("archive.zip");
    let fetcher = ArchiveFetcher::new(test_config(&server.uri()).remote).unwrap();
    let remote = RemoteArchiveRef::new("acme", "widgets").unwrap();

    let err = fetcher.fetch(&remote, Some(&destination)).await.unwrap_err();

    match err {
        PipelineError::RemoteFetch { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_unreachable_host_is_network_error_in_fetch_stage() {
    // Nothing listens on the discard port.
    let config = test_config("http://127.0.0.1:9");

    let work = TempDir::new().unwrap();
    let remote = RemoteArchiveRef::new("acme", "widgets").unwrap();
    let mut orchestrator = PipelineOrchestrator::new(config).unwrap();

    let err = orchestrator
        .fetch_clean_zip(&remote, work.path())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(PipelineStage::Fetching));
    assert_eq!(orchestrator.stage(), PipelineStage::Failed);
    match err {
        PipelineError::Stage { error, .. } => {
            assert!(matches!(*error, PipelineError::Network(_)));
        }
        other => panic!("unexpected error: {other}"),
    }

    let leftovers: Vec<String> = fs::read_dir(work.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}

#[cfg(unix)]
#[tokio::test]
async fn test_published_archives_are_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let server = MockServer::start().await;
    serve(&server, 200, widgets_archive()).await;

    let work = TempDir::new().unwrap();
    let remote = RemoteArchiveRef::new("acme", "widgets").unwrap();
    let mut orchestrator = PipelineOrchestrator::new(test_config(&server.uri())).unwrap();
    orchestrator
        .fetch_clean_zip(&remote, work.path())
        .await
        .unwrap();

    for name in ["widgets-HEAD.zip", "cleaned_widgets.zip"] {
        let mode = fs::metadata(work.path().join(name))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o644, "{name}");
    }
}
