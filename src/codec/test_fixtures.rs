//! Shared test fixtures for codec tests.

/// Strings that are easy to get wrong when quoting or escaping.
pub const AWKWARD_STRINGS: &[&str] = &[
    "",
    " leading",
    "trailing ",
    " ",
    "it's",
    "\"double\"",
    "back\\slash\\",
    "null",
    "True",
    "~",
    "yes",
    "123",
    "-1",
    "1e3",
    ".inf",
    "0x1F",
    "#comment",
    "a: b",
    "- item",
    "[flow]",
    "{map}",
    "&anchor *alias !tag %dir @at `tick",
    "|",
    ">",
    "tab\tinside",
    "line\nbreak",
    "carriage\rreturn",
    "nul\0byte",
    "bell\u{7}",
    "escape\u{1b}[0m",
    "del\u{7f}",
    "c1\u{80}\u{85}\u{9f}",
    "nbsp\u{a0}",
    "separators\u{2028}and\u{2029}",
    "bom\u{feff}",
    "nonchar\u{fffe}\u{ffff}",
    "astral \u{1F600}",
    "grüße ☃",
    "$GLOBALS['x']",
    "?>",
    "'; phpinfo(); //",
];
