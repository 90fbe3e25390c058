//! File-level diffs over the reference text scenarios

use chunkdiff::chunk::{Chunk, ChunkerConfig};
use chunkdiff::sync::{diff_files, file_diff, Delta, DiffError, Side};
use rand::Rng;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ORIGINAL: &str = "Hello everyone, this will be a very short text about nothing. \
Its only purpose is for testing. Testing should be sufficient. Yay";

fn reassemble(delta: &Delta) -> Vec<u8> {
    let mut all: Vec<&Chunk> = delta.reused.iter().chain(&delta.changed).collect();
    all.sort_by_key(|c| c.offset);
    all.iter().flat_map(|c| c.data.iter().copied()).collect()
}

async fn write_pair(dir: &TempDir, original: &[u8], updated: &[u8]) -> (PathBuf, PathBuf) {
    let original_path = dir.path().join("original");
    let updated_path = dir.path().join("updated");
    tokio::fs::write(&original_path, original).await.unwrap();
    tokio::fs::write(&updated_path, updated).await.unwrap();
    (original_path, updated_path)
}

/// (name, updated file, changed chunks, reused chunks) at chunk size 64
fn scenarios() -> Vec<(&'static str, String, usize, usize)> {
    vec![
        ("no change", ORIGINAL.to_string(), 0, 2),
        (
            "one change",
            ORIGINAL.replace("everyone", "evbryone"),
            1,
            1,
        ),
        (
            "two changes in the same chunk",
            ORIGINAL
                .replace("everyone", "evbryone")
                .replace("purpose is", "purpose IS"),
            1,
            1,
        ),
        (
            "chunk removal at the end",
            "Hello everyone, this will be a very short text about nothing. It".to_string(),
            1,
            0,
        ),
        (
            "chunk removal at the beginning",
            "s only purpose is for testing. Testing should be sufficient. Yay".to_string(),
            1,
            1,
        ),
        (
            "chunk switch",
            "s only purpose is for testing. Testing should be sufficient. \
YayHello everyone, this will be a very short text about nothing. It"
                .to_string(),
            3,
            0,
        ),
        (
            "addition at the end",
            format!("{} it's really exciting", ORIGINAL),
            2,
            0,
        ),
        (
            "addition at the beginning",
            format!("It's really exciting. {}", ORIGINAL),
            1,
            1,
        ),
    ]
}

#[tokio::test]
async fn test_reference_scenarios() {
    for (name, updated, changed, reused) in scenarios() {
        let dir = TempDir::new().unwrap();
        let (original_path, updated_path) =
            write_pair(&dir, ORIGINAL.as_bytes(), updated.as_bytes()).await;

        let delta = diff_files(&original_path, &updated_path, ChunkerConfig::new(64))
            .await
            .unwrap();

        assert_eq!(delta.changed.len(), changed, "{}: changed", name);
        assert_eq!(delta.reused.len(), reused, "{}: reused", name);
        assert_eq!(reassemble(&delta), updated.as_bytes(), "{}: reassembly", name);
    }
}

#[test]
fn test_reference_scenarios_streaming() {
    let dir = TempDir::new().unwrap();

    for (name, updated, changed, reused) in scenarios() {
        let original_path = dir.path().join("original");
        let updated_path = dir.path().join(name.replace(' ', "_"));
        std::fs::write(&original_path, ORIGINAL).unwrap();
        std::fs::write(&updated_path, &updated).unwrap();

        let delta = file_diff(
            File::open(&original_path).unwrap(),
            File::open(&updated_path).unwrap(),
            64,
        )
        .unwrap();

        assert_eq!(delta.changed.len(), changed, "{}: changed", name);
        assert_eq!(delta.reused.len(), reused, "{}: reused", name);
    }
}

#[tokio::test]
async fn test_large_file_reuse_percent() {
    let dir = TempDir::new().unwrap();
    let mut original = vec![0u8; 4 * 1024 * 1024];
    rand::thread_rng().fill(&mut original[..]);
    let mut updated = original.clone();
    updated.splice(1_000_000..1_000_100, b"replacement".iter().copied());
    updated.extend_from_slice(b"trailer");

    let (original_path, updated_path) = write_pair(&dir, &original, &updated).await;
    let delta = diff_files(&original_path, &updated_path, ChunkerConfig::new(8192))
        .await
        .unwrap();

    let stats = delta.stats();
    assert!(stats.changed_chunks > 0);
    assert!(stats.reuse_percent() > 95.0, "{}", stats);
}

#[tokio::test]
async fn test_missing_file_reports_side() {
    let dir = TempDir::new().unwrap();
    let (original_path, updated_path) = write_pair(&dir, b"original", b"updated").await;
    let missing = dir.path().join("missing");

    let err = diff_files(&missing, &updated_path, ChunkerConfig::new(64))
        .await
        .unwrap_err();
    assert!(matches!(err, DiffError::Io { side: Side::Original, .. }));

    let err = diff_files(&original_path, &missing, ChunkerConfig::new(64))
        .await
        .unwrap_err();
    assert!(matches!(err, DiffError::Io { side: Side::Updated, .. }));
}

#[tokio::test]
async fn test_invalid_chunk_size_checked_before_reading() {
    let missing = Path::new("/nonexistent/chunkdiff/original");

    for size in [3, 100] {
        let err = diff_files(missing, missing, ChunkerConfig::new(size))
            .await
            .unwrap_err();
        assert!(matches!(err, DiffError::Config(_)), "size {}", size);
    }
}
