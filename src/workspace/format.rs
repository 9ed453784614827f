//! Format tree, listing, and version results as text.

use crate::tree::{render_tree, render_tree_with};
use crate::workspace::types::{ListingOutput, TreeOutput, VersionsOutput};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Format the derived tree as an indented listing; folders in bold blue when `color`.
pub fn format_tree_text(data: &TreeOutput, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("{} @ v{}", data.workspace_id, data.version))
    ));
    if data.roots.is_empty() {
        out.push_str("Workspace is empty.\n");
        return out;
    }
    if color {
        out.push_str(&render_tree_with(&data.roots, |label| label.blue().bold().to_string()));
    } else {
        out.push_str(&render_tree(&data.roots));
    }
    out.push_str(&format!("\n{} file(s)\n", data.file_count));
    out
}

/// Format the flat listing as a path/size table.
pub fn format_listing_text(data: &ListingOutput) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Files")));
    if data.rows.is_empty() {
        out.push_str("No files.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Bytes"]);
    for row in &data.rows {
        table.add_row(vec![row.path.clone(), row.bytes.to_string()]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!(
        "Total: {} files, {} bytes.\n",
        data.rows.len(),
        data.total_bytes
    ));
    out
}

/// Format saved versions with their manifests.
pub fn format_versions_text(data: &VersionsOutput) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Versions")));
    if data.versions.is_empty() {
        out.push_str(&format!("No saved versions for {}.\n", data.workspace_id));
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Version", "Files", "Fingerprint", "Saved at"]);
    for info in &data.versions {
        table.add_row(vec![
            info.version.to_string(),
            info.manifest.entry_count.to_string(),
            info.manifest.fingerprint[..info.manifest.fingerprint.len().min(12)].to_string(),
            info.manifest.saved_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {} versions.\n", data.versions.len()));
    out
}
