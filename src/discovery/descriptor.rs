//! Test method descriptors: one discovered test method of one test case.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use testup_core::{last_segment, qualified_test_name, strip_spec_ordinal};

use super::case::CaseStyle;

/// Pairs a test case with one of its test methods.
///
/// Descriptors are derived data: they are rebuilt on every discovery pass and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMethod {
    case: String,
    style: CaseStyle,
    method: String,
}

impl TestMethod {
    pub fn new(case: impl Into<String>, style: CaseStyle, method: impl Into<String>) -> Self {
        Self {
            case: case.into(),
            style,
            method: method.into(),
        }
    }

    /// Qualified name of the owning case.
    pub fn case_name(&self) -> &str {
        &self.case
    }

    pub fn style(&self) -> CaseStyle {
        self.style
    }

    /// Raw method identifier as defined on the class table.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Human-readable name.
    ///
    /// Plain methods display as-is. Spec methods display as `<innermost describe> <it description>`,
    /// e.g. `when empty has no faces` for `TC_Mesh::when empty#test_0001_has no faces`.
    pub fn display_name(&self) -> String {
        match self.style {
            CaseStyle::Plain => self.method.clone(),
            CaseStyle::Spec => format!(
                "{} {}",
                last_segment(&self.case),
                strip_spec_ordinal(&self.method)
            ),
        }
    }

    /// Selector string that asks the execution engine to run exactly this method.
    pub fn selector(&self) -> String {
        match self.style {
            CaseStyle::Plain => self.method.clone(),
            CaseStyle::Spec => qualified_test_name(&self.case, self.method.trim()),
        }
    }
}

impl fmt::Display for TestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl Serialize for TestMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TestMethod", 4)?;
        state.serialize_field("name", &self.display_name())?;
        state.serialize_field("method", &self.method)?;
        state.serialize_field("case", &self.case)?;
        state.serialize_field("selector", &self.selector())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_method_names() {
        let method = TestMethod::new("TC_Edge", CaseStyle::Plain, "test_length");
        assert_eq!(method.display_name(), "test_length");
        assert_eq!(method.selector(), "test_length");
        assert_eq!(method.to_string(), "test_length");
    }

    #[test]
    fn test_spec_method_names() {
        let method = TestMethod::new("TC_Mesh::when empty", CaseStyle::Spec, "test_0002_has no faces");
        assert_eq!(method.display_name(), "when empty has no faces");
        assert_eq!(method.selector(), "TC_Mesh::when empty#test_0002_has no faces");
    }

    #[test]
    fn test_spec_selector_trims_method() {
        let method = TestMethod::new("TC_Mesh", CaseStyle::Spec, "test_0001_pads ");
        assert_eq!(method.selector(), "TC_Mesh#test_0001_pads");
    }

    #[test]
    fn test_serializes_display_and_selector() {
        let method = TestMethod::new("TC_Mesh", CaseStyle::Spec, "test_0001_works");
        let json = serde_json::to_value(&method).unwrap();
        assert_eq!(json["name"], "TC_Mesh works");
        assert_eq!(json["selector"], "TC_Mesh#test_0001_works");
        assert_eq!(json["method"], "test_0001_works");
    }
}
