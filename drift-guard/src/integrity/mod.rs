//! Integrity layer: content digests, the digest manifest, and the optional
//! bundle archive.
//!
//! Every artifact of a run is digested after all other writes complete. The
//! manifest lists one `<hex-digest>␠␠<relative-path>` line per artifact in
//! the order the artifacts were enumerated — never a directory scan — and
//! is itself excluded from its own contents. When a bundle archive is
//! produced, its digest is appended as the final entry.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{DriftError, Result};

/// Canonical file name of the digest manifest.
pub const DIGEST_MANIFEST_NAME: &str = "hashes.sha256";

/// Canonical file name of the bundle archive.
pub const BUNDLE_NAME: &str = "bundle.zip";

/// Streams a file through SHA-256 and returns the lowercase hex digest.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// One verified or mismatched manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestMismatch {
    /// Relative path as listed in the manifest.
    pub path: String,
    /// Digest recorded in the manifest.
    pub expected: String,
    /// Digest recomputed from the file, or `None` if it is unreadable.
    pub actual: Option<String>,
}

/// Writes the digest manifest for the enumerated artifacts of a run.
///
/// `rel_paths` must use forward slashes and is digested in the given
/// order. Returns the manifest path.
#[instrument(skip(rel_paths), fields(run_dir = %run_dir.display()))]
pub fn write_digest_manifest(run_dir: &Path, rel_paths: &[String]) -> Result<PathBuf> {
    let mut lines = Vec::with_capacity(rel_paths.len());
    for rel in rel_paths {
        let digest = sha256_file(&run_dir.join(rel))?;
        lines.push(format!("{digest}  {rel}"));
    }

    let manifest_path = run_dir.join(DIGEST_MANIFEST_NAME);
    let mut file = File::create(&manifest_path)?;
    file.write_all(lines.join("\n").as_bytes())?;
    file.write_all(b"\n")?;
    debug!(entries = rel_paths.len(), "Wrote digest manifest");
    Ok(manifest_path)
}

/// Recomputes every digest listed in a manifest and returns the mismatches.
///
/// An empty result means the artifact set is intact. Unreadable files are
/// reported with `actual = None`.
pub fn verify_digest_manifest(run_dir: &Path) -> Result<Vec<DigestMismatch>> {
    let manifest_path = run_dir.join(DIGEST_MANIFEST_NAME);
    let contents = std::fs::read_to_string(&manifest_path)?;

    let mut mismatches = Vec::new();
    for line in contents.lines().filter(|l| !l.trim().is_empty()) {
        let Some((expected, rel)) = line.split_once("  ") else {
            return Err(DriftError::Internal(format!(
                "malformed digest manifest line: {line}"
            )));
        };
        let actual = sha256_file(&run_dir.join(rel)).ok();
        if actual.as_deref() != Some(expected) {
            mismatches.push(DigestMismatch {
                path: rel.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }
    }
    Ok(mismatches)
}

/// Packages the enumerated artifacts into `bundle.zip` inside the run
/// directory. The digest manifest itself is never bundled.
#[instrument(skip(rel_paths), fields(run_dir = %run_dir.display()))]
pub fn write_bundle(run_dir: &Path, rel_paths: &[String]) -> Result<PathBuf> {
    let bundle_path = run_dir.join(BUNDLE_NAME);
    let file = File::create(&bundle_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for rel in rel_paths {
        zip.start_file(rel.clone(), options)?;
        let mut src = File::open(run_dir.join(rel))?;
        std::io::copy(&mut src, &mut zip)?;
    }
    zip.finish()?;
    debug!(entries = rel_paths.len(), "Wrote bundle archive");
    Ok(bundle_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, rel: &str, contents: &str) {
        if let Some(parent) = Path::new(rel).parent() {
            std::fs::create_dir_all(dir.join(parent)).unwrap();
        }
        std::fs::write(dir.join(rel), contents).unwrap();
    }

    #[test]
    fn test_sha256_known_value() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "empty.txt", "");
        let digest = sha256_file(&dir.path().join("empty.txt")).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_manifest_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "report.json", "{\"a\": 1}\n");
        write_file(dir.path(), "inputs/data.csv", "value\n1\n2\n");

        let rels = vec!["report.json".to_string(), "inputs/data.csv".to_string()];
        write_digest_manifest(dir.path(), &rels).unwrap();

        let mismatches = verify_digest_manifest(dir.path()).unwrap();
        assert!(mismatches.is_empty());
    }

    #[test]
    fn test_manifest_excludes_itself_and_orders_entries() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b.txt", "b");
        write_file(dir.path(), "a.txt", "a");

        let rels = vec!["b.txt".to_string(), "a.txt".to_string()];
        let manifest = write_digest_manifest(dir.path(), &rels).unwrap();

        let contents = std::fs::read_to_string(manifest).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("  b.txt"));
        assert!(lines[1].ends_with("  a.txt"));
        assert!(!contents.contains(DIGEST_MANIFEST_NAME));
    }

    #[test]
    fn test_single_byte_mutation_flags_exactly_one_line() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.txt", "alpha");
        write_file(dir.path(), "b.txt", "beta");
        let rels = vec!["a.txt".to_string(), "b.txt".to_string()];
        write_digest_manifest(dir.path(), &rels).unwrap();

        std::fs::write(dir.path().join("b.txt"), "betb").unwrap();

        let mismatches = verify_digest_manifest(dir.path()).unwrap();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].path, "b.txt");
        assert!(mismatches[0].actual.is_some());
    }

    #[test]
    fn test_deleted_artifact_reports_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.txt", "alpha");
        write_digest_manifest(dir.path(), &["a.txt".to_string()]).unwrap();
        std::fs::remove_file(dir.path().join("a.txt")).unwrap();

        let mismatches = verify_digest_manifest(dir.path()).unwrap();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].actual, None);
    }

    #[test]
    fn test_bundle_contains_enumerated_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "report.json", "{}");
        write_file(dir.path(), "inputs/data.csv", "x\n1\n");
        let rels = vec!["report.json".to_string(), "inputs/data.csv".to_string()];

        let bundle = write_bundle(dir.path(), &rels).unwrap();

        let file = File::open(bundle).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(archive.by_name("report.json").is_ok());
        assert!(archive.by_name("inputs/data.csv").is_ok());
    }
}
