//! Project scanning: which source files belong to the project.
//!
//! Two-tier selection policy, kept deliberately lenient: when a manifest
//! (`*.tsproj`) lists compile includes, only listed files count; when no
//! manifest is present or none parses, every file on disk with a matching
//! extension counts. Manifest-less projects still get documentation, at the
//! cost of possibly including files the build never compiles.

use crate::model::{ProjectInfo, SourceKind};
use crate::parser::xml;
use crate::report::Reporter;
use anyhow::Result;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const MSBUILD_NS: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

pub struct Scanner<'a> {
    root: PathBuf,
    includes: BTreeSet<String>,
    reporter: &'a dyn Reporter,
}

impl<'a> Scanner<'a> {
    /// Create a scanner for one project root, resolving the manifest
    /// include set up front.
    pub fn new(root: &Path, reporter: &'a dyn Reporter) -> Scanner<'a> {
        let includes = resolve_included_files(root, reporter);
        Scanner {
            root: root.to_path_buf(),
            includes,
            reporter,
        }
    }

    /// Recursively enumerate source files of one kind, sorted for
    /// deterministic output. Filtered by the manifest include set only when
    /// that set is non-empty.
    pub fn enumerate(&self, kind: SourceKind) -> Vec<PathBuf> {
        let pattern = format!("{}/**/*.{}", self.root.display(), kind.extension());
        let mut files: Vec<PathBuf> = match glob::glob(&pattern) {
            Ok(paths) => paths.filter_map(|r| r.ok()).filter(|p| p.is_file()).collect(),
            Err(e) => {
                self.reporter
                    .warn(&format!("invalid search pattern {}: {}", pattern, e));
                Vec::new()
            }
        };
        files.sort();
        if !self.includes.is_empty() {
            files.retain(|p| self.includes.contains(&self.relative_path(p)));
        }
        files
    }

    /// Project-relative path with forward-slash separators, the form used
    /// for manifest comparison and for display.
    pub fn relative_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Default project metadata, with the name overridden by the first
    /// manifest that declares one.
    pub fn project_info(&self) -> ProjectInfo {
        let mut info = ProjectInfo::default();
        for manifest in manifest_files(&self.root) {
            match manifest_name(&manifest) {
                Ok(Some(name)) => {
                    info.name = name;
                    break;
                }
                Ok(None) => {}
                Err(_) => {} // already warned while resolving includes
            }
        }
        info
    }
}

/// Union of the compile includes of every manifest under the root.
/// Per-manifest failure is a warning, not an error; the manifest simply
/// contributes nothing.
fn resolve_included_files(root: &Path, reporter: &dyn Reporter) -> BTreeSet<String> {
    let mut includes = BTreeSet::new();
    for manifest in manifest_files(root) {
        match manifest_includes(&manifest) {
            Ok(paths) => includes.extend(paths),
            Err(e) => reporter.warn(&format!(
                "could not read includes from {}: {}",
                manifest.display(),
                e
            )),
        }
    }
    includes
}

/// Manifest files directly under the project root (zero or more), sorted.
fn manifest_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match fs::read_dir(root) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("tsproj")
            })
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();
    files
}

/// Compile include references from one manifest. Both the msbuild-namespaced
/// and the bare element variant are recognized; separators are normalized
/// to forward slashes.
fn manifest_includes(manifest: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(manifest)?;
    let package = xml::parse(&content)?;
    let doc = package.as_document();

    let mut refs = Vec::new();
    for node in xml::nodes_ns(&doc, "//msb:Compile/@Include", "msb", MSBUILD_NS)? {
        if let Some(attr) = node.attribute() {
            refs.push(normalize_separators(attr.value()));
        }
    }
    for node in xml::nodes(&doc, "//Compile/@Include")? {
        if let Some(attr) = node.attribute() {
            refs.push(normalize_separators(attr.value()));
        }
    }
    Ok(refs)
}

/// The project name declared by a manifest, if any.
fn manifest_name(manifest: &Path) -> Result<Option<String>> {
    let content = fs::read_to_string(manifest)?;
    let package = xml::parse(&content)?;
    let doc = package.as_document();
    let name = xml::first_text(&doc, "//Name")?;
    Ok(if name.is_empty() { None } else { Some(name) })
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::RecordingReporter;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    const POU_STUB: &str = r#"<TcPlcObject><POU Name="X"><Declaration></Declaration></POU></TcPlcObject>"#;

    #[test]
    fn no_manifest_enumerates_everything() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "POUs/A.TcPOU", POU_STUB);
        write(dir.path(), "POUs/B.TcPOU", POU_STUB);
        write(dir.path(), "sub/deep/C.TcPOU", POU_STUB);

        let reporter = RecordingReporter::default();
        let scanner = Scanner::new(dir.path(), &reporter);
        assert_eq!(scanner.enumerate(SourceKind::Pou).len(), 3);
        assert!(scanner.enumerate(SourceKind::Dut).is_empty());
    }

    #[test]
    fn manifest_filters_to_listed_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "POUs/A.TcPOU", POU_STUB);
        write(dir.path(), "POUs/B.TcPOU", POU_STUB);
        write(dir.path(), "POUs/C.TcPOU", POU_STUB);
        write(
            dir.path(),
            "Plant.tsproj",
            r#"<TcSmProject><Project><Compile Include="POUs\A.TcPOU"/></Project></TcSmProject>"#,
        );

        let reporter = RecordingReporter::default();
        let scanner = Scanner::new(dir.path(), &reporter);
        let files = scanner.enumerate(SourceKind::Pou);
        assert_eq!(files.len(), 1);
        assert_eq!(scanner.relative_path(&files[0]), "POUs/A.TcPOU");
    }

    #[test]
    fn namespaced_manifest_variant_is_recognized() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "POUs/A.TcPOU", POU_STUB);
        write(dir.path(), "POUs/B.TcPOU", POU_STUB);
        write(
            dir.path(),
            "Plant.tsproj",
            r#"<Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <ItemGroup><Compile Include="POUs\B.TcPOU"/></ItemGroup>
</Project>"#,
        );

        let reporter = RecordingReporter::default();
        let scanner = Scanner::new(dir.path(), &reporter);
        let files = scanner.enumerate(SourceKind::Pou);
        assert_eq!(files.len(), 1);
        assert_eq!(scanner.relative_path(&files[0]), "POUs/B.TcPOU");
    }

    #[test]
    fn malformed_manifest_warns_and_falls_back_to_glob() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "POUs/A.TcPOU", POU_STUB);
        write(dir.path(), "Broken.tsproj", "<Project><unclosed>");

        let reporter = RecordingReporter::default();
        let scanner = Scanner::new(dir.path(), &reporter);
        assert_eq!(reporter.warnings.borrow().len(), 1);
        assert_eq!(scanner.enumerate(SourceKind::Pou).len(), 1);
    }

    #[test]
    fn include_sets_union_across_manifests() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "A.TcPOU", POU_STUB);
        write(dir.path(), "B.TcPOU", POU_STUB);
        write(dir.path(), "C.TcPOU", POU_STUB);
        write(
            dir.path(),
            "One.tsproj",
            r#"<P><Compile Include="A.TcPOU"/></P>"#,
        );
        write(
            dir.path(),
            "Two.tsproj",
            r#"<P><Compile Include="B.TcPOU"/></P>"#,
        );

        let reporter = RecordingReporter::default();
        let scanner = Scanner::new(dir.path(), &reporter);
        assert_eq!(scanner.enumerate(SourceKind::Pou).len(), 2);
    }

    #[test]
    fn project_name_comes_from_manifest() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "Plant.tsproj",
            r#"<TcSmProject><Name>Bottling Line</Name></TcSmProject>"#,
        );

        let reporter = RecordingReporter::default();
        let scanner = Scanner::new(dir.path(), &reporter);
        assert_eq!(scanner.project_info().name, "Bottling Line");
    }

    #[test]
    fn project_name_defaults_without_manifest() {
        let dir = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();
        let scanner = Scanner::new(dir.path(), &reporter);
        assert_eq!(scanner.project_info().name, "TwinCAT Project");
    }
}
