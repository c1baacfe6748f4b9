//! Compiles ASMD state machine descriptions (JSON) into VHDL
//! entity/architecture skeletons with a clocked state register.
//!
//! Pipeline: [`compiler::parse`] (decode, validate, normalize) followed by
//! [`emit_vhdl::emit`] or [`emit_vhdl::write_file`].
pub mod compiler;
pub mod emit_vhdl;
pub mod error;
pub mod model;

pub use error::Error;
