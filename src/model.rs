//! Data model for a parsed TwinCAT project — format-agnostic.
//!
//! Built once per generation run from the on-disk sources; never mutated
//! afterwards. `PartialEq` everywhere so whole-project comparisons work.

/// The three source file categories, distinguished by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Program Organization Unit (`*.TcPOU`)
    Pou,
    /// Data Unit Type (`*.TcDUT`)
    Dut,
    /// Global Variable List (`*.TcGVL`)
    Gvl,
}

impl SourceKind {
    /// File extension associated with this kind (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            SourceKind::Pou => "TcPOU",
            SourceKind::Dut => "TcDUT",
            SourceKind::Gvl => "TcGVL",
        }
    }
}

/// Documentation recovered from a declaration region.
///
/// All fields default to the empty string when the source carries no
/// matching comment. `comments` preserves every single-line comment in
/// encounter order, label lines included.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Documentation {
    pub description: String,
    pub author: String,
    pub version: String,
    pub date: String,
    pub comments: Vec<String>,
}

/// One declared variable or structure member.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Field {
    /// Identifier, never empty (unparseable names are dropped upstream).
    pub name: String,
    /// Raw type expression, passed through as written (array bounds,
    /// string lengths and the like are not interpreted).
    pub ty: String,
    /// Raw default value after `:=`, or empty.
    pub default: String,
    /// Trailing `//` comment on the same line, or empty.
    pub comment: String,
}

/// Program Organization Unit: PROGRAM, FUNCTION_BLOCK or FUNCTION.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Pou {
    pub name: String,
    /// Raw `SpecialFunc` attribute value; `PROGRAM` when absent.
    pub subtype: String,
    /// Project-relative path, forward-slash separated.
    pub path: String,
    pub docs: Documentation,
    pub variables: Vec<Field>,
    /// Structured Text body, passed through unparsed.
    pub implementation: String,
}

/// Structure vs. enumeration, detected from the declaration text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DutKind {
    #[default]
    Struct,
    Enum,
}

impl DutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DutKind::Struct => "STRUCT",
            DutKind::Enum => "ENUM",
        }
    }
}

/// Data Unit Type. Enumerations carry no members — value lists are not
/// extracted into the field model.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dut {
    pub name: String,
    pub kind: DutKind,
    pub path: String,
    pub docs: Documentation,
    pub members: Vec<Field>,
}

/// Global Variable List.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Gvl {
    pub name: String,
    pub path: String,
    pub docs: Documentation,
    pub variables: Vec<Field>,
}

/// Project-level metadata. The name may be overridden by the manifest's
/// `Name` element; everything else keeps its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        ProjectInfo {
            name: "TwinCAT Project".to_string(),
            description: String::new(),
            version: String::new(),
            author: String::new(),
        }
    }
}

/// The complete parsed project, handed to a renderer and discarded.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProjectDocument {
    pub info: ProjectInfo,
    pub pous: Vec<Pou>,
    pub duts: Vec<Dut>,
    pub gvls: Vec<Gvl>,
}

impl ProjectDocument {
    /// Total number of parsed units across all kinds.
    pub fn unit_count(&self) -> usize {
        self.pous.len() + self.duts.len() + self.gvls.len()
    }
}
