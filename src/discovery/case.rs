//! Test cases as a tagged variant over the two supported styles.

use serde::Serialize;

use super::descriptor::TestMethod;

/// How a test case was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStyle {
    /// `TestUp.TestCase(...)`: a flat class whose `test_*` functions are the tests.
    Plain,
    /// `describe(...)`: a specification with `it` blocks and optional nested describes.
    Spec,
}

/// A flat test case. `methods` already includes methods inherited from a base case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainCase {
    name: String,
    methods: Vec<String>,
}

impl PlainCase {
    /// Methods are sorted and de-duplicated.
    pub fn new(name: impl Into<String>, methods: impl IntoIterator<Item = String>) -> Self {
        let mut methods: Vec<String> = methods.into_iter().collect();
        methods.sort();
        methods.dedup();
        Self {
            name: name.into(),
            methods,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }
}

/// A specification case and its nested children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCase {
    name: String,
    methods: Vec<String>,
    children: Vec<SpecCase>,
}

impl SpecCase {
    /// Own methods are sorted (the padded ordinal keeps declaration order); children keep theirs.
    pub fn new(name: impl Into<String>, methods: impl IntoIterator<Item = String>, children: Vec<SpecCase>) -> Self {
        let mut methods: Vec<String> = methods.into_iter().collect();
        methods.sort();
        methods.dedup();
        Self {
            name: name.into(),
            methods,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn children(&self) -> &[SpecCase] {
        &self.children
    }

    fn collect_methods(&self, out: &mut Vec<TestMethod>) {
        out.extend(
            self.methods
                .iter()
                .map(|method| TestMethod::new(self.name.as_str(), CaseStyle::Spec, method.as_str())),
        );
        for child in &self.children {
            child.collect_methods(out);
        }
    }
}

/// One runnable test case discovered in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestCase {
    Plain(PlainCase),
    Spec(SpecCase),
}

impl TestCase {
    pub fn name(&self) -> &str {
        match self {
            TestCase::Plain(case) => case.name(),
            TestCase::Spec(case) => case.name(),
        }
    }

    pub fn style(&self) -> CaseStyle {
        match self {
            TestCase::Plain(_) => CaseStyle::Plain,
            TestCase::Spec(_) => CaseStyle::Spec,
        }
    }

    pub fn is_spec(&self) -> bool {
        matches!(self, TestCase::Spec(_))
    }

    /// Enumerate every test method of this case.
    ///
    /// Plain cases yield their methods in identifier order. Spec cases yield their own `it` methods
    /// followed by those of every nested child, depth first.
    pub fn test_methods(&self) -> Vec<TestMethod> {
        match self {
            TestCase::Plain(case) => case
                .methods
                .iter()
                .map(|method| TestMethod::new(case.name.as_str(), CaseStyle::Plain, method.as_str()))
                .collect(),
            TestCase::Spec(case) => {
                let mut methods = Vec::new();
                case.collect_methods(&mut methods);
                methods
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(methods: &[TestMethod]) -> Vec<String> {
        methods.iter().map(TestMethod::selector).collect()
    }

    #[test]
    fn test_plain_methods_sorted_and_unique() {
        let case = TestCase::Plain(PlainCase::new(
            "TC_Edge",
            ["test_b".to_string(), "test_a".to_string(), "test_b".to_string()],
        ));

        assert_eq!(names(&case.test_methods()), vec!["test_a", "test_b"]);
        assert!(!case.is_spec());
    }

    #[test]
    fn test_spec_with_two_children_yields_four_methods() {
        let child = |name: &str| {
            SpecCase::new(
                format!("TC_Spec::{name}"),
                ["test_0001_one".to_string(), "test_0002_two".to_string()],
                Vec::new(),
            )
        };
        let case = TestCase::Spec(SpecCase::new("TC_Spec", Vec::new(), vec![child("a"), child("b")]));

        let methods = case.test_methods();
        assert_eq!(methods.len(), 4);
        assert_eq!(methods[0].selector(), "TC_Spec::a#test_0001_one");
        assert_eq!(methods[3].selector(), "TC_Spec::b#test_0002_two");
        assert_eq!(case.style(), CaseStyle::Spec);
    }

    #[test]
    fn test_spec_own_methods_come_before_children() {
        let nested = SpecCase::new("TC_Spec::inner", ["test_0001_inner".to_string()], Vec::new());
        let case = TestCase::Spec(SpecCase::new(
            "TC_Spec",
            ["test_0002_second".to_string(), "test_0001_first".to_string()],
            vec![nested],
        ));

        assert_eq!(
            names(&case.test_methods()),
            vec![
                "TC_Spec#test_0001_first",
                "TC_Spec#test_0002_second",
                "TC_Spec::inner#test_0001_inner",
            ]
        );
    }
}
