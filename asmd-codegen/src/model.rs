/// ASMD state machine description model.
/// Deserialized from the JSON description, then validated and normalized
/// by the compiler. Treated as read-only once normalized.
use indexmap::IndexMap;
use serde::Deserialize;

/// Ordered name -> declaration map. Iteration order is document order,
/// which is also the order ports and generics are rendered in.
pub type VarMap = IndexMap<String, Variable>;

/// Clock port injected into `Inputs` during normalization.
pub const CLOCK_PORT: &str = "clk";
/// Asynchronous reset port injected when the reset is enabled.
pub const RESET_PORT: &str = "rst";
/// Indentation unit used when `Options.Indent` is empty.
pub const DEFAULT_INDENT: &str = "    ";

/// Active clock edge of the state register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockType {
    PosEdge,
    NegEdge,
}

impl ClockType {
    /// Case-insensitive parse of `posedge` / `negedge`.
    pub fn parse(s: &str) -> Option<ClockType> {
        match s.to_ascii_lowercase().as_str() {
            "posedge" => Some(ClockType::PosEdge),
            "negedge" => Some(ClockType::NegEdge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClockType::PosEdge => "posedge",
            ClockType::NegEdge => "negedge",
        }
    }
}

/// `AddAsyncReset` as written in the description: `true`, `false`, or
/// absent/`null`. Normalization resolves `Unspecified` to `Enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<bool>")]
pub enum AsyncReset {
    #[default]
    Unspecified,
    Enabled,
    Disabled,
}

impl From<Option<bool>> for AsyncReset {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => AsyncReset::Unspecified,
            Some(true) => AsyncReset::Enabled,
            Some(false) => AsyncReset::Disabled,
        }
    }
}

impl AsyncReset {
    /// Apply the default-enabled policy.
    pub fn resolve(self) -> AsyncReset {
        match self {
            AsyncReset::Unspecified => AsyncReset::Enabled,
            resolved => resolved,
        }
    }

    pub fn is_enabled(self) -> bool {
        self.resolve() == AsyncReset::Enabled
    }
}

/// Module-level settings (`Options` in the description).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Options {
    /// Human-facing module name, used verbatim in the header comment.
    pub module_name: String,
    /// `module_name` with spaces, tabs and hyphens removed. Derived only.
    #[serde(skip)]
    pub normalized_module_name: String,
    /// `posedge` or `negedge`, any case.
    pub clock_type: String,
    pub add_async_reset: AsyncReset,
    /// Initial state of the machine.
    pub first_state: String,
    /// Indentation unit for the generated source.
    pub indent: String,
    pub author: String,
}

/// A port, generic, or register declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Variable {
    /// Widths above 1 render as `std_logic_vector`.
    pub bit_width: u64,
    /// Free-form VHDL type (`natural`, `integer`, ...). Empty means `std_logic`.
    #[serde(rename = "Type")]
    pub ty: String,
    /// Literal text used verbatim, e.g. as a generic default.
    pub default_value: String,
}

impl Default for Variable {
    fn default() -> Self {
        Self::bit()
    }
}

impl Variable {
    /// Single-bit `std_logic` with no default.
    pub fn bit() -> Self {
        Self {
            bit_width: 1,
            ty: String::new(),
            default_value: String::new(),
        }
    }

    pub fn is_vector(&self) -> bool {
        self.bit_width > 1
    }
}

/// A named sub-block. Declared and carried through normalization; not
/// rendered yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FunctionalUnit {
    pub inputs: VarMap,
    pub outputs: VarMap,
    pub registers: VarMap,
}

/// Root of a state machine description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StateMachine {
    pub options: Options,
    pub inputs: VarMap,
    pub outputs: VarMap,
    pub parameters: VarMap,
    pub registers: VarMap,
    pub functional_units: IndexMap<String, FunctionalUnit>,
}

impl StateMachine {
    /// Whether the state register gets an asynchronous reset port.
    pub fn has_async_reset(&self) -> bool {
        self.options.add_async_reset.is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> StateMachine {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_clock_type_parse_ignores_case() {
        assert_eq!(ClockType::parse("posedge"), Some(ClockType::PosEdge));
        assert_eq!(ClockType::parse("PosEdge"), Some(ClockType::PosEdge));
        assert_eq!(ClockType::parse("NEGEDGE"), Some(ClockType::NegEdge));
        assert_eq!(ClockType::parse("rising"), None);
        assert_eq!(ClockType::parse(""), None);
    }

    #[test]
    fn test_async_reset_tri_state() {
        let absent = decode(json!({"Options": {}}));
        assert_eq!(absent.options.add_async_reset, AsyncReset::Unspecified);

        let null = decode(json!({"Options": {"AddAsyncReset": null}}));
        assert_eq!(null.options.add_async_reset, AsyncReset::Unspecified);

        let on = decode(json!({"Options": {"AddAsyncReset": true}}));
        assert_eq!(on.options.add_async_reset, AsyncReset::Enabled);

        let off = decode(json!({"Options": {"AddAsyncReset": false}}));
        assert_eq!(off.options.add_async_reset, AsyncReset::Disabled);
    }

    #[test]
    fn test_async_reset_defaults_to_enabled() {
        assert!(AsyncReset::Unspecified.is_enabled());
        assert!(AsyncReset::Enabled.is_enabled());
        assert!(!AsyncReset::Disabled.is_enabled());
        assert_eq!(AsyncReset::Unspecified.resolve(), AsyncReset::Enabled);
    }

    #[test]
    fn test_variable_width_defaults_to_one() {
        let m = decode(json!({
            "Parameters": {"WIDTH": {"Type": "integer", "DefaultValue": "8"}}
        }));
        let width = &m.parameters["WIDTH"];
        assert_eq!(width.bit_width, 1);
        assert_eq!(width.ty, "integer");
        assert_eq!(width.default_value, "8");
        assert!(!width.is_vector());
    }

    #[test]
    fn test_maps_keep_document_order() {
        let m = decode(json!({
            "Inputs": {"zeta": {}, "alpha": {}, "mid": {"BitWidth": 4}}
        }));
        let names: Vec<&str> = m.inputs.keys().map(String::as_str).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert!(m.inputs["mid"].is_vector());
    }

    #[test]
    fn test_functional_units_decode() {
        let m = decode(json!({
            "FunctionalUnits": {
                "adder": {
                    "Inputs": {"a": {"BitWidth": 8}, "b": {"BitWidth": 8}},
                    "Outputs": {"sum": {"BitWidth": 9}}
                }
            }
        }));
        let adder = &m.functional_units["adder"];
        assert_eq!(adder.inputs.len(), 2);
        assert_eq!(adder.outputs["sum"].bit_width, 9);
        assert!(adder.registers.is_empty());
    }

    #[test]
    fn test_normalized_name_is_not_read_from_input() {
        let m = decode(json!({
            "Options": {"ModuleName": "a b", "NormalizedModuleName": "zzz"}
        }));
        assert_eq!(m.options.normalized_module_name, "");
    }
}
