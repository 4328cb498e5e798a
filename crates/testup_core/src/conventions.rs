//! Well-known names and separators.

/// File name prefix of a test case source file (`TC_Foo.lua`).
pub const TEST_FILE_PREFIX: &str = "TC_";

/// Extension of test case source files.
pub const SOURCE_EXTENSION: &str = "lua";

/// Prefix of test method identifiers, matched case-insensitively.
pub const TEST_METHOD_PREFIX: &str = "test_";

/// Separator between a specification case and its nested children (`Parent::child`).
pub const NESTED_SEPARATOR: &str = "::";

/// Separator between a case name and a method in selectors and qualified test names.
pub const METHOD_SEPARATOR: char = '#';

/// Width of the padded ordinal in specification method identifiers (`test_0001_...`).
pub const SPEC_ORDINAL_WIDTH: usize = 4;

/// Name of the global table exposing the test API to Lua sources.
pub const API_TABLE: &str = "TestUp";

/// Field holding the qualified name on every class table.
pub const CLASS_NAME_FIELD: &str = "__name";

/// Field the `before` hook is stored under.
pub const SETUP_FIELD: &str = "setup";

/// Field the `after` hook is stored under.
pub const TEARDOWN_FIELD: &str = "teardown";
