//! FontAwesome release discovery, download, and extraction.
//!
//! The vendor download page links the desktop distribution as
//! `fontawesome-<tier>-<version>-desktop.zip`. Discovery scans the page
//! HTML for that pattern; download goes through a TLS-pinned agent with a
//! host allowlist and a response size cap, and the archive is sanity-checked
//! against the ZIP magic bytes before anything touches the filesystem.

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use semver::Version;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use zip::ZipArchive;

use crate::bundle::VERSION_FILE;

/// Vendor download page scanned for the desktop release link.
pub const DOWNLOAD_PAGE_URL: &str = "https://fontawesome.com/download";

/// Global timeout for all HTTP operations (30 seconds).
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum response body size for the download page (10 MB).
const MAX_PAGE_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum response body size for the distribution archive (512 MB).
const MAX_ARCHIVE_SIZE: u64 = 512 * 1024 * 1024;

/// Allowlisted hostnames for release-related network requests.
///
/// The vendor serves the page and archive from its own hosts and mirrors
/// releases on GitHub. Any other host is rejected regardless of path.
const ALLOWED_HOSTS: &[&str] = &[
    "fontawesome.com",
    "use.fontawesome.com",
    "site-assets.fontawesome.com",
    "github.com",
    "objects.githubusercontent.com",
];

/// A resolved desktop-release download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseLink {
    /// Absolute archive URL.
    pub url: String,
    /// Version parsed out of the archive filename.
    pub version: Version,
}

fn link_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https://[A-Za-z0-9./_~-]*fontawesome-(free|pro)-([0-9]+\.[0-9]+\.[0-9]+)-desktop\.zip")
            .expect("static link pattern compiles")
    })
}

/// Validate that a URL is safe to use for release downloads.
///
/// Enforces HTTPS only and the vendor host allowlist.
pub fn validate_download_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).with_context(|| format!("invalid URL '{url}'"))?;

    match parsed.scheme() {
        "https" => {}
        scheme => bail!("insecure URL scheme '{scheme}' rejected; only HTTPS is allowed: {url}"),
    }

    let host = parsed.host_str().unwrap_or("");
    if !ALLOWED_HOSTS.contains(&host) {
        bail!(
            "URL host '{host}' is not in the allowed list for downloads (allowed: {}): {url}",
            ALLOWED_HOSTS.join(", ")
        );
    }

    Ok(())
}

/// Create a new HTTP agent configured with native-tls and a global timeout.
fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(HTTP_TIMEOUT))
        .build()
        .into()
}

/// Fetch the download page HTML.
fn fetch_page(url: &str) -> Result<String> {
    validate_download_url(url)?;

    let bytes = agent()
        .get(url)
        .header("User-Agent", "fatex")
        .call()
        .with_context(|| format!("failed to fetch download page '{url}'"))?
        .into_body()
        .with_config()
        .limit(MAX_PAGE_SIZE)
        .read_to_vec()
        .with_context(|| format!("failed to read download page '{url}'"))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Find the best desktop-release link for a tier in page HTML.
///
/// When the page carries links for several versions, the highest semver
/// wins.
pub fn find_download_link(html: &str, pro: bool) -> Option<ReleaseLink> {
    let tier = if pro { "pro" } else { "free" };
    let mut best: Option<ReleaseLink> = None;
    for captures in link_pattern().captures_iter(html) {
        if &captures[1] != tier {
            continue;
        }
        let Ok(version) = Version::parse(&captures[2]) else {
            continue;
        };
        if best.as_ref().is_none_or(|b| version > b.version) {
            best = Some(ReleaseLink {
                url: captures[0].to_string(),
                version,
            });
        }
    }
    best
}

/// Download the distribution archive and return its bytes.
///
/// # Errors
///
/// Fails when the URL is rejected by the allowlist, the request fails, the
/// body exceeds [`MAX_ARCHIVE_SIZE`], or the payload does not start with
/// the ZIP local-file signature (an HTML error page, typically).
pub fn download_archive(url: &str) -> Result<Vec<u8>> {
    validate_download_url(url)?;

    log::info!("downloading {url}");
    let bytes = agent()
        .get(url)
        .header("User-Agent", "fatex")
        .call()
        .with_context(|| format!("failed to download '{url}'"))?
        .into_body()
        .with_config()
        .limit(MAX_ARCHIVE_SIZE)
        .read_to_vec()
        .with_context(|| format!("failed to read archive from '{url}'"))?;

    validate_archive_content(&bytes)?;
    Ok(bytes)
}

/// Check that downloaded content begins with the ZIP local-file signature.
pub fn validate_archive_content(data: &[u8]) -> Result<()> {
    if data.len() < 4 || &data[..4] != b"PK\x03\x04" {
        let take = data.len().min(16);
        let preview: String = data[..take]
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect();
        bail!(
            "downloaded content does not look like a ZIP archive (expected PK\\x03\\x04 header), got \"{preview}\""
        );
    }
    Ok(())
}

/// Extract a distribution archive into `dest`, returning the file count.
///
/// The vendor archive wraps everything in a single
/// `fontawesome-<tier>-<version>-desktop/` folder; when every entry shares
/// one top-level directory it is stripped so `dest` holds `metadata/`,
/// `otfs/` and friends directly. Entries without a safe enclosed name are
/// skipped.
pub fn extract_archive(data: &[u8], dest: &Path) -> Result<usize> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).context("failed to open distribution archive")?;

    // First pass: does every entry share a single top-level directory?
    let mut shared_root: Option<String> = None;
    let mut uniform = true;
    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        let Some(path) = file.enclosed_name() else {
            continue;
        };
        let Some(root) = path.components().next() else {
            continue;
        };
        // A file sitting at the top level is its own root; stripping would
        // erase its name entirely.
        if !file.is_dir() && path.components().count() == 1 {
            uniform = false;
            break;
        }
        let root = root.as_os_str().to_string_lossy().into_owned();
        match &shared_root {
            None => shared_root = Some(root),
            Some(existing) if *existing == root => {}
            Some(_) => {
                uniform = false;
                break;
            }
        }
    }
    let strip_root = uniform && shared_root.is_some();

    let mut extracted = 0usize;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let Some(outpath) = file.enclosed_name() else {
            continue;
        };
        if file.is_dir() {
            continue;
        }

        let relative: std::path::PathBuf = if strip_root {
            outpath.components().skip(1).collect()
        } else {
            outpath.to_path_buf()
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let final_path = dest.join(&relative);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        let mut outfile = fs::File::create(&final_path)
            .with_context(|| format!("failed to create '{}'", final_path.display()))?;
        std::io::copy(&mut file, &mut outfile)
            .with_context(|| format!("failed to extract '{}'", final_path.display()))?;
        extracted += 1;
    }

    log::info!("extracted {extracted} files into {}", dest.display());
    Ok(extracted)
}

/// Full fetch workflow: discover the release link, download, extract, and
/// record the resolved version next to the extracted files.
pub fn run_fetch(page_url: &str, dest: &Path, pro: bool) -> Result<ReleaseLink> {
    let html = fetch_page(page_url)?;
    let release = find_download_link(&html, pro).ok_or_else(|| {
        anyhow!(
            "no {} desktop download link found on '{page_url}'",
            if pro { "pro" } else { "free" }
        )
    })?;
    log::info!("found FontAwesome {} at {}", release.version, release.url);

    let bytes = download_archive(&release.url)?;
    fs::create_dir_all(dest).with_context(|| format!("failed to create '{}'", dest.display()))?;
    extract_archive(&bytes, dest)?;

    // Recorded so `build` can stamp the package header with the version.
    fs::write(dest.join(VERSION_FILE), format!("{}\n", release.version))
        .with_context(|| format!("failed to record version in '{}'", dest.display()))?;

    Ok(release)
}
