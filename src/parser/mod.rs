//! Source-file parsers — one entry point per file kind.
//!
//! Each parser unwraps the XML envelope, then hands the declaration text to
//! the extraction passes. A file whose top-level element is missing, or
//! whose XML does not parse, is an error for the caller to report and skip;
//! it never aborts the scan of the remaining project.

pub mod declaration;
pub mod xml;

use crate::model::{Dut, Gvl, Pou};
use anyhow::{anyhow, Result};
use declaration::Region;

/// Parse a `*.TcPOU` file into a Pou record.
pub fn parse_pou(content: &str, path: &str) -> Result<Pou> {
    let package = xml::parse(content)?;
    let doc = package.as_document();
    let node = xml::first_node(&doc, "//POU")?.ok_or_else(|| anyhow!("no POU element"))?;

    let name = xml::attribute(&node, "Name").unwrap_or("Unknown").to_string();
    let subtype = xml::attribute(&node, "SpecialFunc")
        .unwrap_or("PROGRAM")
        .to_string();
    let decl = xml::first_text(&doc, "//Declaration")?;
    let implementation = xml::first_text(&doc, "//Implementation/ST")?;

    Ok(Pou {
        name,
        subtype,
        path: path.to_string(),
        docs: declaration::extract_documentation(&decl),
        variables: declaration::extract_fields(&decl, Region::Local),
        implementation,
    })
}

/// Parse a `*.TcDUT` file into a Dut record.
pub fn parse_dut(content: &str, path: &str) -> Result<Dut> {
    let package = xml::parse(content)?;
    let doc = package.as_document();
    let node = xml::first_node(&doc, "//DUT")?.ok_or_else(|| anyhow!("no DUT element"))?;

    let name = xml::attribute(&node, "Name").unwrap_or("Unknown").to_string();
    let decl = xml::first_text(&doc, "//Declaration")?;

    Ok(Dut {
        name,
        kind: declaration::dut_kind(&decl),
        path: path.to_string(),
        docs: declaration::extract_documentation(&decl),
        members: declaration::extract_struct_members(&decl),
    })
}

/// Parse a `*.TcGVL` file into a Gvl record.
pub fn parse_gvl(content: &str, path: &str) -> Result<Gvl> {
    let package = xml::parse(content)?;
    let doc = package.as_document();
    let node = xml::first_node(&doc, "//GVL")?.ok_or_else(|| anyhow!("no GVL element"))?;

    let name = xml::attribute(&node, "Name").unwrap_or("Unknown").to_string();
    let decl = xml::first_text(&doc, "//Declaration")?;

    Ok(Gvl {
        name,
        path: path.to_string(),
        docs: declaration::extract_documentation(&decl),
        variables: declaration::extract_fields(&decl, Region::Global),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DutKind;

    const POU_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<TcPlcObject Version="1.1.0.1">
  <POU Name="FB_Motor" SpecialFunc="FUNCTION_BLOCK">
    <Declaration><![CDATA[
// Purpose: Motor control block
// Author: Jane Doe
// Version: 1.2
FUNCTION_BLOCK FB_Motor
VAR_INPUT
	bEnable : BOOL := FALSE; // enable request
END_VAR
VAR_OUTPUT
	bRunning : BOOL; // motor is running
END_VAR
VAR
	nCycles : DINT;
END_VAR
]]></Declaration>
    <Implementation>
      <ST><![CDATA[IF bEnable THEN
	bRunning := TRUE;
END_IF]]></ST>
    </Implementation>
  </POU>
</TcPlcObject>"#;

    #[test]
    fn pou_round_trip() {
        let pou = parse_pou(POU_XML, "POUs/FB_Motor.TcPOU").unwrap();
        assert_eq!(pou.name, "FB_Motor");
        assert_eq!(pou.subtype, "FUNCTION_BLOCK");
        assert_eq!(pou.path, "POUs/FB_Motor.TcPOU");
        assert_eq!(pou.docs.description, "Motor control block");
        assert_eq!(pou.docs.author, "Jane Doe");
        assert_eq!(pou.docs.version, "1.2");
        let names: Vec<&str> = pou.variables.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["bEnable", "bRunning", "nCycles"]);
        assert_eq!(pou.variables[0].default, "FALSE");
        assert_eq!(pou.variables[0].comment, "enable request");
        assert!(pou.implementation.starts_with("IF bEnable"));
    }

    #[test]
    fn pou_subtype_defaults_to_program() {
        let xml = r#"<TcPlcObject><POU Name="MAIN"><Declaration></Declaration></POU></TcPlcObject>"#;
        let pou = parse_pou(xml, "MAIN.TcPOU").unwrap();
        assert_eq!(pou.subtype, "PROGRAM");
    }

    #[test]
    fn pou_name_defaults_to_unknown() {
        let xml = r#"<TcPlcObject><POU><Declaration></Declaration></POU></TcPlcObject>"#;
        let pou = parse_pou(xml, "x.TcPOU").unwrap();
        assert_eq!(pou.name, "Unknown");
    }

    #[test]
    fn pou_missing_element_is_an_error() {
        let xml = r#"<TcPlcObject><Declaration></Declaration></TcPlcObject>"#;
        assert!(parse_pou(xml, "x.TcPOU").is_err());
    }

    #[test]
    fn dut_struct_members() {
        let xml = r#"<TcPlcObject>
  <DUT Name="ST_Conveyor">
    <Declaration><![CDATA[
(* Conveyor runtime data *)
TYPE ST_Conveyor :
STRUCT
	nSpeed : INT; // mm/s
	bJammed : BOOL;
END_STRUCT
END_TYPE
]]></Declaration>
  </DUT>
</TcPlcObject>"#;
        let dut = parse_dut(xml, "DUTs/ST_Conveyor.TcDUT").unwrap();
        assert_eq!(dut.name, "ST_Conveyor");
        assert_eq!(dut.kind, DutKind::Struct);
        assert_eq!(dut.docs.description, "Conveyor runtime data");
        assert_eq!(dut.members.len(), 2);
        assert_eq!(dut.members[1].name, "bJammed");
    }

    #[test]
    fn dut_enum_has_no_members() {
        let xml = r#"<TcPlcObject>
  <DUT Name="E_State">
    <Declaration><![CDATA[
TYPE E_State : // ENUM of machine states
(
	Idle := 0,
	Running := 1
);
END_TYPE
]]></Declaration>
  </DUT>
</TcPlcObject>"#;
        let dut = parse_dut(xml, "DUTs/E_State.TcDUT").unwrap();
        assert_eq!(dut.kind, DutKind::Enum);
        assert!(dut.members.is_empty());
    }

    #[test]
    fn gvl_scans_global_blocks_only() {
        let xml = r#"<TcPlcObject>
  <GVL Name="GVL_System">
    <Declaration><![CDATA[
// Description: System-wide state
VAR_GLOBAL
	nHeartbeat : UDINT; // increments each cycle
	bEstop : BOOL := FALSE;
END_VAR
]]></Declaration>
  </GVL>
</TcPlcObject>"#;
        let gvl = parse_gvl(xml, "GVLs/GVL_System.TcGVL").unwrap();
        assert_eq!(gvl.name, "GVL_System");
        assert_eq!(gvl.docs.description, "System-wide state");
        assert_eq!(gvl.variables.len(), 2);
        assert_eq!(gvl.variables[0].comment, "increments each cycle");
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_gvl("<GVL Name='x'>", "x.TcGVL").is_err());
    }
}
