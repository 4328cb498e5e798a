//! Name derivation helpers for files, cases and test methods.

use std::path::Path;

use crate::conventions::{
    METHOD_SEPARATOR, NESTED_SEPARATOR, SPEC_ORDINAL_WIDTH, TEST_FILE_PREFIX, TEST_METHOD_PREFIX,
};

/// Check whether a method identifier follows the test naming convention.
///
/// The `test_` prefix is matched case-insensitively, so `Test_Foo` and `TEST_bar` qualify.
pub fn is_test_method(name: &str) -> bool {
    name.get(..TEST_METHOD_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(TEST_METHOD_PREFIX))
}

/// Check whether a file name (not a path) names a test case source.
///
/// ## Parameters
/// - `file_name`: the base name, e.g. `TC_Model.lua`.
/// - `prefix`: required base name prefix, normally [`TEST_FILE_PREFIX`].
/// - `extension`: required extension without the dot, normally `lua`.
pub fn is_test_source(file_name: &str, prefix: &str, extension: &str) -> bool {
    let path = Path::new(file_name);
    file_name.starts_with(prefix)
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == extension)
}

/// Check a file name against the default `TC_*.lua` convention.
pub fn is_default_test_source(file_name: &str) -> bool {
    is_test_source(file_name, TEST_FILE_PREFIX, crate::conventions::SOURCE_EXTENSION)
}

/// Derive the logical test case name a source file is expected to define.
///
/// The logical name is the file's base name without its extension: `suite/TC_Edge.lua` ⇒ `TC_Edge`.
pub fn logical_name(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}

/// Build the method identifier for the `ordinal`-th `it` block of a specification case.
///
/// ## Examples
/// ```rust
/// assert_eq!(testup_core::spec_method_id(3, "adds faces"), "test_0003_adds faces");
/// ```
pub fn spec_method_id(ordinal: usize, description: &str) -> String {
    format!(
        "{TEST_METHOD_PREFIX}{ordinal:0width$}_{description}",
        width = SPEC_ORDINAL_WIDTH
    )
}

/// Strip the `test_NNNN_` ordinal from a specification method identifier.
///
/// Identifiers that don't carry an ordinal are returned unchanged.
pub fn strip_spec_ordinal(method: &str) -> &str {
    let Some(rest) = method.strip_prefix(TEST_METHOD_PREFIX) else {
        return method;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return method;
    }
    rest[digits..].strip_prefix('_').unwrap_or(method)
}

/// Qualified name of a nested specification case.
pub fn nested_name(parent: &str, child: &str) -> String {
    format!("{parent}{NESTED_SEPARATOR}{child}")
}

/// Whether a qualified case name belongs to a nested (non top-level) case.
pub fn is_nested(name: &str) -> bool {
    name.contains(NESTED_SEPARATOR)
}

/// The last segment of a qualified case name (`A::b::c` ⇒ `c`).
pub fn last_segment(name: &str) -> &str {
    name.rsplit(NESTED_SEPARATOR).next().unwrap_or(name)
}

/// Whether `name` is `logical` itself or one of its nested descendants.
///
/// `TC_Foo` covers `TC_Foo` and `TC_Foo::bar` but not `TC_FooBar`.
pub fn is_within(name: &str, logical: &str) -> bool {
    match name.strip_prefix(logical) {
        Some("") => true,
        Some(rest) => rest.starts_with(NESTED_SEPARATOR),
        None => false,
    }
}

/// Fully qualified test name used in result records (`Case#method`).
pub fn qualified_test_name(case: &str, method: &str) -> String {
    format!("{case}{METHOD_SEPARATOR}{method}")
}
