//! Markdown wiki renderer.
//!
//! Produces the cross-linked page set: Home, one index page per kind, one
//! detail page per unit, and Project-Statistics. Output carries no
//! timestamps — rendering is a pure function of the ProjectDocument, so
//! re-running on unchanged input rewrites identical files.

use crate::model::*;
use crate::render::{Page, Renderer};

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &ProjectDocument) -> Vec<Page> {
        let mut pages = vec![
            Page::new("Home", home_page(doc)),
            Page::new("POUs", pou_index(doc)),
            Page::new("Data-Types", dut_index(doc)),
            Page::new("Global-Variables", gvl_index(doc)),
        ];
        for pou in &doc.pous {
            pages.push(Page::new(format!("POU-{}", pou.name), pou_page(pou)));
        }
        for dut in &doc.duts {
            pages.push(Page::new(format!("DUT-{}", dut.name), dut_page(dut)));
        }
        for gvl in &doc.gvls {
            pages.push(Page::new(format!("GVL-{}", gvl.name), gvl_page(gvl)));
        }
        pages.push(Page::new("Project-Statistics", statistics_page(doc)));
        pages
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

// -- Pages --------------------------------------------------------------------

fn home_page(doc: &ProjectDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", doc.info.name));
    if !doc.info.description.is_empty() {
        out.push_str(&format!("**{}**\n\n", doc.info.description));
    }
    out.push_str("## Project Overview\n\n");
    out.push_str(&format!(
        "- **POUs (Program Organization Units)**: {}\n",
        doc.pous.len()
    ));
    out.push_str(&format!("- **DUTs (Data Unit Types)**: {}\n", doc.duts.len()));
    out.push_str(&format!(
        "- **GVLs (Global Variable Lists)**: {}\n",
        doc.gvls.len()
    ));
    if !doc.info.version.is_empty() {
        out.push_str(&format!("- **Version**: {}\n", doc.info.version));
    }
    if !doc.info.author.is_empty() {
        out.push_str(&format!("- **Author**: {}\n", doc.info.author));
    }
    out.push('\n');
    out.push_str("## Navigation\n\n");
    out.push_str("- [POUs](POUs.md) - Programs, Function Blocks and Functions\n");
    out.push_str("- [Data Types](Data-Types.md) - Custom data types and structures\n");
    out.push_str("- [Global Variables](Global-Variables.md) - System-wide variables\n");
    out.push_str("- [Project Statistics](Project-Statistics.md) - Detailed project metrics\n");
    out
}

fn pou_index(doc: &ProjectDocument) -> String {
    let programs = by_subtype(&doc.pous, "PROGRAM");
    let function_blocks = by_subtype(&doc.pous, "FUNCTION_BLOCK");
    let functions = by_subtype(&doc.pous, "FUNCTION");

    let mut out = String::new();
    out.push_str("# Program Organization Units (POUs)\n\n");
    out.push_str("All Programs, Function Blocks and Functions in the project.\n\n");
    out.push_str("## Summary\n\n");
    out.push_str(&format!("Total POUs: **{}**\n\n", doc.pous.len()));
    out.push_str(&format!("- Programs: {}\n", programs.len()));
    out.push_str(&format!("- Function Blocks: {}\n", function_blocks.len()));
    out.push_str(&format!("- Functions: {}\n\n", functions.len()));
    pou_index_section(&mut out, "Programs", &programs);
    pou_index_section(&mut out, "Function Blocks", &function_blocks);
    pou_index_section(&mut out, "Functions", &functions);
    out
}

fn pou_index_section(out: &mut String, title: &str, pous: &[&Pou]) {
    out.push_str(&format!("## {}\n\n", title));
    for pou in pous {
        out.push_str(&format!("### [{}](POU-{}.md)\n\n", pou.name, pou.name));
        out.push_str(&format!("- **File**: `{}`\n", pou.path));
        out.push_str(&format!("- **Description**: {}\n", describe(&pou.docs)));
        out.push_str(&format!("- **Variables**: {}\n", pou.variables.len()));
        if !pou.docs.author.is_empty() {
            out.push_str(&format!("- **Author**: {}\n", pou.docs.author));
        }
        out.push('\n');
    }
}

fn pou_page(pou: &Pou) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", pou.name));
    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **Type**: {}\n", pou.subtype));
    out.push_str(&format!("- **File**: `{}`\n", pou.path));
    overview_docs(&mut out, &pou.docs);
    out.push('\n');
    out.push_str("## Variables\n\n");
    field_table(&mut out, &pou.variables, "*No variables declared*");
    if !pou.implementation.is_empty() {
        out.push_str("\n## Implementation\n\n");
        out.push_str("```pascal\n");
        out.push_str(&pou.implementation);
        out.push_str("\n```\n");
    }
    comments_section(&mut out, &pou.docs.comments, "Additional Comments");
    out.push_str("\n---\n*[Back to POUs Overview](POUs.md)*\n");
    out
}

fn dut_index(doc: &ProjectDocument) -> String {
    let structs: Vec<&Dut> = doc.duts.iter().filter(|d| d.kind == DutKind::Struct).collect();
    let enums: Vec<&Dut> = doc.duts.iter().filter(|d| d.kind == DutKind::Enum).collect();

    let mut out = String::new();
    out.push_str("# Data Unit Types (DUTs)\n\n");
    out.push_str("All custom data types defined in the project.\n\n");
    out.push_str("## Summary\n\n");
    out.push_str(&format!("Total DUTs: **{}**\n\n", doc.duts.len()));
    out.push_str(&format!("- Structures: {}\n", structs.len()));
    out.push_str(&format!("- Enumerations: {}\n\n", enums.len()));
    dut_index_section(&mut out, "Structures", "Members", &structs);
    dut_index_section(&mut out, "Enumerations", "Values", &enums);
    out
}

fn dut_index_section(out: &mut String, title: &str, counter: &str, duts: &[&Dut]) {
    out.push_str(&format!("## {}\n\n", title));
    for dut in duts {
        out.push_str(&format!("### [{}](DUT-{}.md)\n\n", dut.name, dut.name));
        out.push_str(&format!("- **File**: `{}`\n", dut.path));
        out.push_str(&format!("- **Description**: {}\n", describe(&dut.docs)));
        out.push_str(&format!("- **{}**: {}\n", counter, dut.members.len()));
        if !dut.docs.author.is_empty() {
            out.push_str(&format!("- **Author**: {}\n", dut.docs.author));
        }
        out.push('\n');
    }
}

fn dut_page(dut: &Dut) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", dut.name));
    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **Type**: {}\n", dut.kind.as_str()));
    out.push_str(&format!("- **File**: `{}`\n", dut.path));
    overview_docs(&mut out, &dut.docs);
    out.push('\n');
    let heading = match dut.kind {
        DutKind::Struct => "Members",
        DutKind::Enum => "Values",
    };
    out.push_str(&format!("## {}\n\n", heading));
    field_table(&mut out, &dut.members, "*No members defined*");
    comments_section(&mut out, &dut.docs.comments, "Comments");
    out.push_str("\n---\n*[Back to Data Types Overview](Data-Types.md)*\n");
    out
}

fn gvl_index(doc: &ProjectDocument) -> String {
    let total_vars: usize = doc.gvls.iter().map(|g| g.variables.len()).sum();

    let mut out = String::new();
    out.push_str("# Global Variable Lists (GVLs)\n\n");
    out.push_str("## Summary\n\n");
    out.push_str(&format!("Total GVLs: **{}**\n", doc.gvls.len()));
    out.push_str(&format!("Total Global Variables: **{}**\n\n", total_vars));
    for gvl in &doc.gvls {
        out.push_str(&format!("## [{}](GVL-{}.md)\n\n", gvl.name, gvl.name));
        out.push_str(&format!("- **File**: `{}`\n", gvl.path));
        out.push_str(&format!("- **Description**: {}\n", describe(&gvl.docs)));
        out.push_str(&format!("- **Variables**: {}\n\n", gvl.variables.len()));
        if !gvl.variables.is_empty() {
            out.push_str("### Key Variables\n\n");
            for var in gvl.variables.iter().take(5) {
                out.push_str(&format!("- `{}` ({})", var.name, var.ty));
                if !var.comment.is_empty() {
                    out.push_str(&format!(" - {}", var.comment));
                }
                out.push('\n');
            }
            if gvl.variables.len() > 5 {
                out.push_str(&format!("\n*... and {} more*\n", gvl.variables.len() - 5));
            }
            out.push('\n');
        }
    }
    out
}

fn gvl_page(gvl: &Gvl) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", gvl.name));
    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **File**: `{}`\n", gvl.path));
    overview_docs(&mut out, &gvl.docs);
    out.push('\n');
    out.push_str("## Variables\n\n");
    field_table(&mut out, &gvl.variables, "*No variables declared*");
    comments_section(&mut out, &gvl.docs.comments, "Comments");
    out.push_str("\n---\n*[Back to Global Variables Overview](Global-Variables.md)*\n");
    out
}

fn statistics_page(doc: &ProjectDocument) -> String {
    let programs = by_subtype(&doc.pous, "PROGRAM").len();
    let function_blocks = by_subtype(&doc.pous, "FUNCTION_BLOCK").len();
    let functions = by_subtype(&doc.pous, "FUNCTION").len();
    let structs = doc.duts.iter().filter(|d| d.kind == DutKind::Struct).count();
    let enums = doc.duts.iter().filter(|d| d.kind == DutKind::Enum).count();
    let local_vars: usize = doc.pous.iter().map(|p| p.variables.len()).sum();
    let global_vars: usize = doc.gvls.iter().map(|g| g.variables.len()).sum();

    let mut out = String::new();
    out.push_str("# Project Statistics\n\n");
    out.push_str("## Overview\n\n");
    out.push_str(&format!("Project: **{}**\n", doc.info.name));
    if !doc.info.version.is_empty() {
        out.push_str(&format!("Version: **{}**\n", doc.info.version));
    }
    if !doc.info.author.is_empty() {
        out.push_str(&format!("Author: **{}**\n", doc.info.author));
    }
    out.push('\n');
    out.push_str("## Code Statistics\n\n");
    out.push_str("### Components\n\n");
    out.push_str(&format!("- **Total POUs**: {}\n", doc.pous.len()));
    out.push_str(&format!("  - Programs: {}\n", programs));
    out.push_str(&format!("  - Function Blocks: {}\n", function_blocks));
    out.push_str(&format!("  - Functions: {}\n", functions));
    out.push_str(&format!("- **Total DUTs**: {}\n", doc.duts.len()));
    out.push_str(&format!("  - Structures: {}\n", structs));
    out.push_str(&format!("  - Enumerations: {}\n", enums));
    out.push_str(&format!("- **Total GVLs**: {}\n\n", doc.gvls.len()));
    out.push_str("### Variables\n\n");
    out.push_str(&format!("- **Local Variables**: {}\n", local_vars));
    out.push_str(&format!("- **Global Variables**: {}\n", global_vars));
    out.push_str(&format!("- **Total Variables**: {}\n\n", local_vars + global_vars));
    out.push_str("## Detailed Breakdown\n\n");
    out.push_str("### POUs by Complexity\n\n");
    out.push_str("| POU Name | Type | Variables | Comments |\n");
    out.push_str("|----------|------|-----------|----------|\n");
    for pou in &doc.pous {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            pou.name,
            pou.subtype,
            pou.variables.len(),
            pou.docs.comments.len()
        ));
    }
    out.push_str("\n### Data Types by Size\n\n");
    out.push_str("| DUT Name | Type | Members |\n");
    out.push_str("|----------|------|---------|\n");
    for dut in &doc.duts {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            dut.name,
            dut.kind.as_str(),
            dut.members.len()
        ));
    }
    out.push_str("\n### Global Variable Distribution\n\n");
    out.push_str("| GVL Name | Variables |\n");
    out.push_str("|----------|-----------|\n");
    for gvl in &doc.gvls {
        out.push_str(&format!("| {} | {} |\n", gvl.name, gvl.variables.len()));
    }
    out.push_str("\n## Code Quality Metrics\n\n");
    if doc.pous.is_empty() {
        out.push_str("- **Documentation Coverage**: N/A\n");
        out.push_str("- **Average Variables per POU**: N/A\n");
    } else {
        let documented = doc
            .pous
            .iter()
            .filter(|p| !p.docs.description.is_empty())
            .count();
        out.push_str(&format!(
            "- **Documentation Coverage**: {:.1}%\n",
            documented as f64 / doc.pous.len() as f64 * 100.0
        ));
        out.push_str(&format!(
            "- **Average Variables per POU**: {:.1}\n",
            local_vars as f64 / doc.pous.len() as f64
        ));
    }
    out
}

// -- Helpers ------------------------------------------------------------------

fn by_subtype<'a>(pous: &'a [Pou], subtype: &str) -> Vec<&'a Pou> {
    pous.iter().filter(|p| p.subtype == subtype).collect()
}

/// Documentation bullets for the Overview section of a detail page.
/// Only fields the source actually carries are emitted.
fn overview_docs(out: &mut String, docs: &Documentation) {
    if !docs.description.is_empty() {
        out.push_str(&format!("- **Description**: {}\n", docs.description));
    }
    if !docs.author.is_empty() {
        out.push_str(&format!("- **Author**: {}\n", docs.author));
    }
    if !docs.version.is_empty() {
        out.push_str(&format!("- **Version**: {}\n", docs.version));
    }
    if !docs.date.is_empty() {
        out.push_str(&format!("- **Date**: {}\n", docs.date));
    }
}

/// Description fallback used by every index page.
fn describe(docs: &Documentation) -> &str {
    if docs.description.is_empty() {
        "No description available"
    } else {
        &docs.description
    }
}

fn field_table(out: &mut String, fields: &[Field], empty_note: &str) {
    if fields.is_empty() {
        out.push_str(empty_note);
        out.push('\n');
        return;
    }
    out.push_str("| Name | Type | Default | Comment |\n");
    out.push_str("|------|------|---------|---------|\n");
    for field in fields {
        out.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            field.name,
            field.ty,
            dash(&field.default),
            dash(&field.comment)
        ));
    }
}

fn comments_section(out: &mut String, comments: &[String], title: &str) {
    if comments.is_empty() {
        return;
    }
    out.push_str(&format!("\n## {}\n\n", title));
    for comment in comments {
        out.push_str(&format!("- {}\n", comment));
    }
}

fn dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
