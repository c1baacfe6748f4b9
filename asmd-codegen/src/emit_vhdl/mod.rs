/// VHDL emitter: entity/architecture skeleton with the FSM state register.
mod emit;
mod types;
mod writer;

pub use emit::{emit, write_file, write_to, RenderError};
