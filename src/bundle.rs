//! Source-distribution validation and output-bundle assembly.
//!
//! `build` does not ship the style file alone: the OTF fonts, the vendor
//! licenses, and the README travel with it so the output directory is a
//! complete, installable package. A `manifest.json` records every file with
//! its SHA-256 digest, which makes two release bundles diffable without
//! unpacking fonts.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// File `fetch` writes next to the extracted distribution so `build` can
/// stamp the package header with the resolved FontAwesome version.
pub const VERSION_FILE: &str = "VERSION";

/// Font files the vendor ships that belong in the bundle.
const FONT_PREFIX: &str = "Font Awesome 6";

/// Manifest describing one assembled bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Version of fatex that assembled the bundle.
    pub generator_version: String,
    /// FontAwesome distribution version, when `fetch` recorded one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fa_version: Option<String>,
    /// Name of the emitted style file.
    pub style_file: String,
    /// Every file in the bundle, sorted by path.
    pub files: Vec<ManifestFile>,
}

/// A file entry in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    /// Path relative to the bundle root, with forward slashes.
    pub path: String,
    /// SHA-256 hash of file contents.
    pub sha256: String,
}

impl Manifest {
    /// Load a manifest from a bundle directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let manifest_path = dir.join("manifest.json");
        let content = fs::read_to_string(&manifest_path)
            .with_context(|| format!("failed to read '{}'", manifest_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse '{}'", manifest_path.display()))
    }

    /// Save the manifest into a bundle directory.
    ///
    /// Uses the same temp-and-rename pattern as the style-file write, so a
    /// failed save never leaves a truncated manifest in place.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let manifest_path = dir.join("manifest.json");
        let temp_path = dir.join("manifest.json.tmp");

        let content =
            serde_json::to_string_pretty(self).context("failed to serialize manifest")?;

        fs::write(&temp_path, content)
            .with_context(|| format!("failed to write '{}'", temp_path.display()))?;
        fs::rename(&temp_path, &manifest_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            anyhow::Error::new(e)
                .context(format!("failed to rename into '{}'", manifest_path.display()))
        })?;

        Ok(())
    }
}

/// Compute the SHA-256 hash of a file.
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let mut file =
        fs::File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Check that a directory holds a usable FontAwesome desktop distribution.
///
/// Requires `metadata/icons.json`, at least one `otfs/*.otf`, and a license
/// file at the distribution root; the first missing piece fails the run
/// with a message naming it.
pub fn validate_source(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("source directory '{}' does not exist", dir.display());
    }

    let metadata = dir.join("metadata").join("icons.json");
    if !metadata.is_file() {
        bail!(
            "required file '{}' not found; is '{}' an extracted FontAwesome desktop distribution?",
            metadata.display(),
            dir.display()
        );
    }

    let otfs = dir.join("otfs");
    if !dir_has_font(&otfs)? {
        bail!("no OTF font files found under '{}'", otfs.display());
    }

    if !dir_has_license(dir)? {
        bail!("no license file found in '{}'", dir.display());
    }

    Ok(())
}

fn dir_has_font(otfs: &Path) -> Result<bool> {
    if !otfs.is_dir() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(otfs)
        .with_context(|| format!("failed to list '{}'", otfs.display()))?;
    Ok(entries.any(|entry| {
        entry.is_ok_and(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("otf"))
        })
    }))
}

fn dir_has_license(dir: &Path) -> Result<bool> {
    let mut entries =
        fs::read_dir(dir).with_context(|| format!("failed to list '{}'", dir.display()))?;
    Ok(entries.any(|entry| {
        entry.is_ok_and(|e| {
            e.file_name()
                .to_string_lossy()
                .to_ascii_lowercase()
                .contains("license")
        })
    }))
}

/// Read the FontAwesome version `fetch` recorded, if any.
pub fn read_version(dir: &Path) -> Option<String> {
    fs::read_to_string(dir.join(VERSION_FILE))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Copy the distribution pieces into the bundle layout and write the
/// manifest.
///
/// Layout: `fonts/` holds the `Font Awesome 6 *` OTF files, `licenses/`
/// holds the vendor `*.txt` license files, `README.md` lands at the root
/// when the distribution carries one. The already-emitted style file is
/// hashed into the manifest alongside the copies.
pub fn assemble(
    source: &Path,
    output: &Path,
    style_file: &str,
    fa_version: Option<String>,
) -> Result<Manifest> {
    let mut files: Vec<ManifestFile> = Vec::new();

    // Fonts
    let fonts_out = output.join("fonts");
    for path in matching_files(&source.join("otfs"), |name| {
        name.starts_with(FONT_PREFIX) && name.to_ascii_lowercase().ends_with(".otf")
    })? {
        files.push(copy_into(&path, &fonts_out, output)?);
    }

    // Vendor licenses
    let licenses_out = output.join("licenses");
    for path in matching_files(source, |name| name.to_ascii_lowercase().ends_with(".txt"))? {
        files.push(copy_into(&path, &licenses_out, output)?);
    }

    // Readme
    let readme = source.join("README.md");
    if readme.is_file() {
        files.push(copy_into(&readme, output, output)?);
    }

    // The style file was emitted before assembly; record it too.
    let style_path = output.join(style_file);
    files.push(ManifestFile {
        path: style_file.to_string(),
        sha256: compute_file_hash(&style_path)?,
    });

    // read_dir order is platform-dependent; the manifest is not.
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let manifest = Manifest {
        generator_version: crate::VERSION.to_string(),
        fa_version,
        style_file: style_file.to_string(),
        files,
    };
    manifest.save(output)?;
    log::info!(
        "assembled bundle with {} files in {}",
        manifest.files.len(),
        output.display()
    );
    Ok(manifest)
}

/// Files directly under `dir` whose name satisfies `predicate`, sorted.
fn matching_files(dir: &Path, predicate: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to list '{}'", dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .is_some_and(|name| predicate(&name.to_string_lossy()))
        })
        .collect();
    matches.sort();
    Ok(matches)
}

/// Copy one file into `dest_dir`, returning its manifest entry relative to
/// `bundle_root`.
fn copy_into(file: &Path, dest_dir: &Path, bundle_root: &Path) -> Result<ManifestFile> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create '{}'", dest_dir.display()))?;
    let name = file
        .file_name()
        .with_context(|| format!("'{}' has no file name", file.display()))?;
    let dest = dest_dir.join(name);
    fs::copy(file, &dest)
        .with_context(|| format!("failed to copy '{}' to '{}'", file.display(), dest.display()))?;
    log::debug!("copied {} to {}", file.display(), dest.display());

    let relative = dest
        .strip_prefix(bundle_root)
        .unwrap_or(&dest)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Ok(ManifestFile {
        path: relative,
        sha256: compute_file_hash(&dest)?,
    })
}
