//! tcdoc — generate wiki documentation from a TwinCAT 3 PLC project.
//!
//! Scans a project tree for `*.TcPOU`, `*.TcDUT` and `*.TcGVL` sources,
//! recovers documentation and variable tables from the declaration text, and
//! writes a set of cross-linked pages:
//!
//! ```text
//! tcdoc path/to/project -o wiki
//! tcdoc path/to/project -f json -o out
//! ```

mod model;
mod parser;
mod render;
mod report;
mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use model::{ProjectDocument, SourceKind};
use report::{Reporter, StderrReporter};
use scanner::Scanner;

#[derive(Parser)]
#[command(
    name = "tcdoc",
    about = "Generate wiki documentation from TwinCAT 3 PLC project sources"
)]
struct Cli {
    /// Root directory of the TwinCAT project
    project_root: PathBuf,

    /// Output directory for generated pages
    #[arg(short = 'o', long, default_value = "wiki")]
    output: PathBuf,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.project_root.is_dir() {
        anyhow::bail!(
            "project root not found: {}",
            cli.project_root.display()
        );
    }

    let reporter = StderrReporter;
    let doc = build_document(&cli.project_root, &reporter);

    let renderer = render::create_renderer(&cli.format)?;
    let ext = renderer.file_extension();

    fs::create_dir_all(&cli.output).with_context(|| {
        format!(
            "failed to create output directory: {}",
            cli.output.display()
        )
    })?;

    for page in renderer.render(&doc) {
        let out_path = cli.output.join(format!("{}.{}", page.name, ext));
        fs::write(&out_path, &page.content)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    println!(
        "generated documentation for {} units in {}",
        doc.unit_count(),
        cli.output.display()
    );
    Ok(())
}

/// Scan and parse the whole project. Unreadable or unparseable files are
/// reported and skipped; an empty project still yields a valid document.
fn build_document(root: &Path, reporter: &dyn Reporter) -> ProjectDocument {
    let scanner = Scanner::new(root, reporter);
    ProjectDocument {
        info: scanner.project_info(),
        pous: collect_units(&scanner, SourceKind::Pou, parser::parse_pou, reporter),
        duts: collect_units(&scanner, SourceKind::Dut, parser::parse_dut, reporter),
        gvls: collect_units(&scanner, SourceKind::Gvl, parser::parse_gvl, reporter),
    }
}

/// Parse every enumerated file of one kind, containing failures at the file
/// boundary.
fn collect_units<T>(
    scanner: &Scanner,
    kind: SourceKind,
    parse: impl Fn(&str, &str) -> Result<T>,
    reporter: &dyn Reporter,
) -> Vec<T> {
    let mut units = Vec::new();
    for path in scanner.enumerate(kind) {
        let rel = scanner.relative_path(&path);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                reporter.error(&format!("skipping {}: {}", rel, e));
                continue;
            }
        };
        match parse(&content, &rel) {
            Ok(unit) => units.push(unit),
            Err(e) => reporter.error(&format!("skipping {}: {}", rel, e)),
        }
    }
    units
}
