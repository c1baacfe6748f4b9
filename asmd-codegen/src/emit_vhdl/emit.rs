/// Top-level composition: walks a normalized StateMachine and produces a
/// complete VHDL entity/architecture pair, block by block.
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::types::{edge_condition, generic_decl, port_decl, Direction};
use super::writer::CodeWriter;
use crate::model::{ClockType, StateMachine, VarMap, CLOCK_PORT, RESET_PORT};

const RULE: &str =
    "--------------------------------------------------------------------------------";
const ARCHITECTURE: &str = "Behavioral";
const STATE_TYPE: &str = "state";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
    /// The model reached the emitter in a state validation should have rejected.
    #[error("internal consistency fault: {0}")]
    Inconsistent(String),
    #[error("rendered text is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render a normalized state machine to a string.
pub fn emit(machine: &StateMachine, date: NaiveDate) -> Result<String, RenderError> {
    let mut buf = Vec::new();
    write_to(machine, date, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Render a normalized state machine into `out`, stopping at the first
/// failed write.
pub fn write_to<W: Write>(
    machine: &StateMachine,
    date: NaiveDate,
    out: W,
) -> Result<(), RenderError> {
    let name = entity_name(machine)?;
    let clock = clock_type(machine)?;
    debug!(entity = name, clock = clock.as_str(), "rendering VHDL");

    let mut w = CodeWriter::new(out, indent_unit(machine)?);
    emit_header(&mut w, machine, date)?;
    emit_imports(&mut w)?;
    emit_entity(&mut w, machine, name)?;
    emit_architecture(&mut w, machine, name, clock)?;
    w.finish()?;
    Ok(())
}

/// Render into `path`. The text goes to a temporary file next to `path`
/// that only replaces it once the whole render succeeded; on failure the
/// temporary file is removed and `path` is left untouched.
pub fn write_file(machine: &StateMachine, date: NaiveDate, path: &Path) -> Result<(), RenderError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    write_to(machine, date, BufWriter::new(tmp.as_file_mut()))?;
    tmp.persist(path).map_err(|e| RenderError::Io(e.error))?;
    info!(path = %path.display(), "wrote VHDL");
    Ok(())
}

fn entity_name(machine: &StateMachine) -> Result<&str, RenderError> {
    let name = machine.options.normalized_module_name.as_str();
    if name.is_empty() {
        return Err(RenderError::Inconsistent(
            "description has not been normalized".into(),
        ));
    }
    Ok(name)
}

fn clock_type(machine: &StateMachine) -> Result<ClockType, RenderError> {
    let raw = &machine.options.clock_type;
    ClockType::parse(raw)
        .ok_or_else(|| RenderError::Inconsistent(format!("unrecognized clock type '{raw}'")))
}

fn indent_unit(machine: &StateMachine) -> Result<&str, RenderError> {
    let unit = machine.options.indent.as_str();
    if unit.is_empty() {
        return Err(RenderError::Inconsistent("empty indentation unit".into()));
    }
    Ok(unit)
}

/// Keep free text inside a single `--` comment line.
fn comment_text(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn emit_header<W: Write>(
    w: &mut CodeWriter<W>,
    machine: &StateMachine,
    date: NaiveDate,
) -> io::Result<()> {
    let opts = &machine.options;
    w.blank()?;
    w.line(RULE)?;
    w.line(&format!("-- Module Name: {}", comment_text(&opts.module_name)))?;
    w.line(&format!("-- Author:      {}", comment_text(&opts.author)))?;
    w.line(&format!("-- Date:        {}", date.format("%-d %b %Y")))?;
    w.line("--")?;
    w.line(RULE)?;
    w.blank()?;
    w.blank()
}

// TODO: infer the minimal use-clause set from the declared types.
fn emit_imports<W: Write>(w: &mut CodeWriter<W>) -> io::Result<()> {
    w.line("library IEEE;")?;
    w.line("use IEEE.STD_LOGIC_1164.ALL;")?;
    w.line("use IEEE.NUMERIC_STD.ALL;")?;
    w.blank()
}

fn emit_entity<W: Write>(
    w: &mut CodeWriter<W>,
    machine: &StateMachine,
    name: &str,
) -> io::Result<()> {
    w.open(&format!("entity {name} is"))?;

    if !machine.parameters.is_empty() {
        w.open("generic (")?;
        let mut is_first = true;
        for (param, var) in &machine.parameters {
            list_item(w, &mut is_first, &generic_decl(param, var))?;
        }
        w.close(");")?;
    }

    if !machine.inputs.is_empty() || !machine.outputs.is_empty() {
        w.open("port (")?;
        // Inputs and outputs are one list; is_first carries over.
        let mut is_first = true;
        emit_ports(w, &mut is_first, &machine.inputs, Direction::In)?;
        emit_ports(w, &mut is_first, &machine.outputs, Direction::Out)?;
        w.close(");")?;
    }

    w.close(&format!("end {name};"))?;
    w.blank()
}

fn emit_ports<W: Write>(
    w: &mut CodeWriter<W>,
    is_first: &mut bool,
    ports: &VarMap,
    dir: Direction,
) -> io::Result<()> {
    for (port, var) in ports {
        list_item(w, is_first, &port_decl(port, dir, var))?;
    }
    Ok(())
}

/// One entry of a `;`-separated clause list. The first entry gets two
/// spaces where the rest get the separator, so entries line up.
fn list_item<W: Write>(w: &mut CodeWriter<W>, is_first: &mut bool, text: &str) -> io::Result<()> {
    let lead = if *is_first { "  " } else { "; " };
    *is_first = false;
    w.line(&format!("{lead}{text}"))
}

fn emit_architecture<W: Write>(
    w: &mut CodeWriter<W>,
    machine: &StateMachine,
    name: &str,
    clock: ClockType,
) -> io::Result<()> {
    let first = &machine.options.first_state;

    w.open(&format!("architecture {ARCHITECTURE} of {name} is"))?;
    w.line("-- FSM declarations")?;
    // No state set is modeled yet, so the enumeration is empty.
    w.line(&format!("type {STATE_TYPE} is ();"))?;
    w.line(&format!(
        "signal state_reg, state_next : {STATE_TYPE} := {first};"
    ))?;
    w.close_open("begin")?;

    emit_state_register(w, machine, clock)?;

    w.close(&format!("end {ARCHITECTURE};"))?;
    w.blank()
}

fn emit_state_register<W: Write>(
    w: &mut CodeWriter<W>,
    machine: &StateMachine,
    clock: ClockType,
) -> io::Result<()> {
    let first = &machine.options.first_state;
    let edge = edge_condition(clock);

    w.line("-- FSM state register")?;
    if machine.has_async_reset() {
        w.line(&format!("process({CLOCK_PORT}, {RESET_PORT})"))?;
        w.open("begin")?;
        w.open(&format!("if ({RESET_PORT}='1') then"))?;
        w.line(&format!("state_reg <= {first};"))?;
        w.close_open(&format!("elsif ({edge}) then"))?;
    } else {
        w.line(&format!("process({CLOCK_PORT})"))?;
        w.open("begin")?;
        w.open(&format!("if ({edge}) then"))?;
    }
    w.line("state_reg <= state_next;")?;
    w.close("end if;")?;
    w.close("end process;")
}
