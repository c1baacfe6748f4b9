/// Pure functions: model declarations -> VHDL declaration fragments.
use crate::model::{ClockType, Variable, CLOCK_PORT};

/// Port direction inside the entity's port clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

/// `std_logic` for one bit, `std_logic_vector (W-1 downto 0)` otherwise.
pub fn logic_type(bit_width: u64) -> String {
    if bit_width > 1 {
        format!("std_logic_vector ({} downto 0)", bit_width - 1)
    } else {
        "std_logic".to_string()
    }
}

/// A generic's declared type, falling back to the logic type for its width.
fn generic_type(var: &Variable) -> String {
    if var.ty.is_empty() {
        logic_type(var.bit_width)
    } else {
        var.ty.clone()
    }
}

/// `name: type := default`, without the default when none is given.
pub fn generic_decl(name: &str, var: &Variable) -> String {
    let ty = generic_type(var);
    if var.default_value.is_empty() {
        format!("{name}: {ty}")
    } else {
        format!("{name}: {ty} := {}", var.default_value)
    }
}

/// `name : in std_logic`, `name : out std_logic_vector (7 downto 0)`.
pub fn port_decl(name: &str, dir: Direction, var: &Variable) -> String {
    format!("{name} : {} {}", dir.as_str(), logic_type(var.bit_width))
}

/// Condition that is true on the active clock edge.
pub fn edge_condition(clock: ClockType) -> String {
    let level = match clock {
        ClockType::PosEdge => '1',
        ClockType::NegEdge => '0',
    };
    format!("{CLOCK_PORT}'event and {CLOCK_PORT}='{level}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(bit_width: u64, ty: &str, default_value: &str) -> Variable {
        Variable {
            bit_width,
            ty: ty.into(),
            default_value: default_value.into(),
        }
    }

    #[test]
    fn test_scalar_widths() {
        assert_eq!(logic_type(1), "std_logic");
        assert_eq!(logic_type(0), "std_logic");
    }

    #[test]
    fn test_vector_widths() {
        assert_eq!(logic_type(2), "std_logic_vector (1 downto 0)");
        assert_eq!(logic_type(8), "std_logic_vector (7 downto 0)");
        assert_eq!(logic_type(64), "std_logic_vector (63 downto 0)");
    }

    #[test]
    fn test_port_decl() {
        assert_eq!(
            port_decl("en", Direction::In, &Variable::bit()),
            "en : in std_logic"
        );
        assert_eq!(
            port_decl("count", Direction::Out, &var(4, "", "")),
            "count : out std_logic_vector (3 downto 0)"
        );
    }

    #[test]
    fn test_generic_decl() {
        assert_eq!(
            generic_decl("WIDTH", &var(1, "integer", "8")),
            "WIDTH: integer := 8"
        );
        assert_eq!(
            generic_decl("INIT", &var(4, "", "\"0000\"")),
            "INIT: std_logic_vector (3 downto 0) := \"0000\""
        );
        assert_eq!(generic_decl("DEPTH", &var(1, "natural", "")), "DEPTH: natural");
    }

    #[test]
    fn test_edge_condition() {
        assert_eq!(edge_condition(ClockType::PosEdge), "clk'event and clk='1'");
        assert_eq!(edge_condition(ClockType::NegEdge), "clk'event and clk='0'");
    }
}
