/// Description compiler: decodes a JSON state machine description, checks
/// its invariants and fills in derived and default values.
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::model::{
    AsyncReset, ClockType, StateMachine, Variable, CLOCK_PORT, DEFAULT_INDENT, RESET_PORT,
};

/// First invariant a description violates. Checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no module name specified (Options.ModuleName)")]
    MissingModuleName,
    #[error("Options.ModuleName '{0}' has no identifier characters")]
    InvalidModuleName(String),
    #[error("Options.ClockType must be 'posedge' or 'negedge', not '{0}'")]
    InvalidClockType(String),
    #[error("Options.FirstState not specified")]
    MissingFirstState,
    #[error("no inputs specified")]
    NoInputs,
    #[error("'{0}' collides with a generated clock/reset port")]
    ReservedName(String),
    #[error("port '{0}' must have a BitWidth of at least 1")]
    ZeroWidth(String),
}

/// Compile a description from an already-parsed JSON value.
pub fn compile(description: &Value) -> Result<StateMachine, Error> {
    let machine = StateMachine::deserialize(description)?;
    Ok(prepare(&machine)?)
}

/// Compile a description from JSON text.
pub fn parse(text: &str) -> Result<StateMachine, Error> {
    let machine = decode(text)?;
    Ok(prepare(&machine)?)
}

/// Read and compile a description file.
pub fn load(path: &Path) -> Result<StateMachine, Error> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read description");
    parse(&text)
}

/// Decode JSON text into a raw, unvalidated description.
pub fn decode(text: &str) -> Result<StateMachine, Error> {
    Ok(serde_json::from_str(text)?)
}

/// Validate a raw description and return its normalized form.
pub fn prepare(machine: &StateMachine) -> Result<StateMachine, ValidationError> {
    validate(machine)?;
    Ok(normalize(machine))
}

/// Check the description's invariants, failing on the first violation.
///
/// `FirstState` is not checked against a declared state set; the model
/// has no state set yet.
pub fn validate(machine: &StateMachine) -> Result<(), ValidationError> {
    let opts = &machine.options;

    if opts.module_name.is_empty() {
        return Err(ValidationError::MissingModuleName);
    }
    if normalize_module_name(&opts.module_name).is_empty() {
        return Err(ValidationError::InvalidModuleName(opts.module_name.clone()));
    }
    if ClockType::parse(&opts.clock_type).is_none() {
        return Err(ValidationError::InvalidClockType(opts.clock_type.clone()));
    }
    if opts.first_state.is_empty() {
        return Err(ValidationError::MissingFirstState);
    }
    if machine.inputs.is_empty() {
        return Err(ValidationError::NoInputs);
    }

    let reset = opts.add_async_reset.is_enabled();
    let declared = machine
        .inputs
        .keys()
        .chain(machine.outputs.keys())
        .chain(machine.parameters.keys());
    for name in declared {
        if is_reserved(name, reset) {
            return Err(ValidationError::ReservedName(name.clone()));
        }
    }

    for (name, var) in machine.inputs.iter().chain(machine.outputs.iter()) {
        if var.bit_width == 0 {
            return Err(ValidationError::ZeroWidth(name.clone()));
        }
    }

    Ok(())
}

/// VHDL identifiers are case-insensitive, so `CLK` collides with `clk`.
fn is_reserved(name: &str, reset: bool) -> bool {
    name.eq_ignore_ascii_case(CLOCK_PORT) || (reset && name.eq_ignore_ascii_case(RESET_PORT))
}

/// Return the fully-resolved form of a description. Idempotent.
pub fn normalize(machine: &StateMachine) -> StateMachine {
    let mut out = machine.clone();

    let opts = &mut out.options;
    opts.normalized_module_name = normalize_module_name(&opts.module_name);
    opts.add_async_reset = opts.add_async_reset.resolve();
    if opts.indent.is_empty() {
        opts.indent = DEFAULT_INDENT.to_string();
    }
    if let Some(clock) = ClockType::parse(&opts.clock_type) {
        opts.clock_type = clock.as_str().to_string();
    }
    let reset = opts.add_async_reset == AsyncReset::Enabled;

    // Re-inserting an existing key keeps its position.
    out.inputs.insert(CLOCK_PORT.to_string(), Variable::bit());
    if reset {
        out.inputs.insert(RESET_PORT.to_string(), Variable::bit());
    }

    debug!(
        module = %out.options.normalized_module_name,
        clock = %out.options.clock_type,
        reset,
        inputs = out.inputs.len(),
        outputs = out.outputs.len(),
        "normalized description"
    );
    out
}

/// Strip spaces, tabs and hyphens so the name is a valid VHDL identifier.
pub fn normalize_module_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '-'))
        .collect()
}
