use chunkdiff::chunk::ChunkerConfig;
use chunkdiff::metrics::init_metrics;
use chunkdiff::sync::diff_files;
use tempfile::TempDir;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("═══════════════════════════════════════════════════════════");
    println!("  chunkdiff demo: content-defined delta between two files");
    println!("═══════════════════════════════════════════════════════════\n");

    init_metrics();

    let temp_dir = TempDir::new()?;
    let original_path = temp_dir.path().join("original.txt");
    let updated_path = temp_dir.path().join("updated.txt");

    let original: String = (0..2000)
        .map(|i| format!("line {:04}: the quick brown fox jumps over the lazy dog\n", i))
        .collect();
    let updated = original
        .replace("line 0500: the quick", "line 0500: a slow")
        .replace("line 1500: ", "line 1500 (edited): ");

    tokio::fs::write(&original_path, &original).await?;
    tokio::fs::write(&updated_path, &updated).await?;
    println!("📄 Original: {} bytes", original.len());
    println!("📄 Updated:  {} bytes\n", updated.len());

    let config = ChunkerConfig::new(1024);
    let mut delta = diff_files(&original_path, &updated_path, config).await?;
    delta.sort_by_offset();

    println!("✓ {}\n", delta.stats());

    println!("🔁 Reused chunks (original offsets):");
    for chunk in delta.reused.iter().take(5) {
        println!(
            "   offset {:>6}  len {:>5}  {}",
            chunk.offset,
            chunk.length,
            &chunk.digest.to_hex()[..16]
        );
    }
    if delta.reused.len() > 5 {
        println!("   ... {} more", delta.reused.len() - 5);
    }

    println!("\n✏️  Changed chunks (updated offsets):");
    for chunk in &delta.changed {
        println!(
            "   offset {:>6}  len {:>5}  {}",
            chunk.offset,
            chunk.length,
            &chunk.digest.to_hex()[..16]
        );
    }

    Ok(())
}
