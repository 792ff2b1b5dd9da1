//! Snapshot export/import commands

use std::path::Path;

use anyhow::{Context, Result};
use kakeibo_core::{Database, ExpenseSnapshot};

/// Write every expense as a JSON snapshot to `output`, or stdout
pub fn cmd_export(db: &Database, output: Option<&Path>) -> Result<()> {
    let snapshot = db.export_snapshot().context("Failed to export expenses")?;
    let json = snapshot.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "✓ Exported {} expenses to {}",
                snapshot.metadata.total_records,
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Replace every stored expense with the snapshot in `file`
pub fn cmd_import(db: &Database, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let snapshot = ExpenseSnapshot::from_json(&json).context("Invalid snapshot file")?;

    let imported = db
        .import_snapshot(&snapshot)
        .context("Failed to import snapshot")?;

    println!(
        "✓ Imported {} expenses (snapshot from {}, version {})",
        imported, snapshot.metadata.created_at, snapshot.metadata.version
    );
    Ok(())
}
