//! Built-in rule tables for a Swift SDK ported to a Kotlin SDK

pub const ORIGIN_EXTENSION: &str = "swift";
pub const DESTINATION_LANGUAGE: &str = "Kotlin";

pub const EXCLUDE_PATTERNS: [&str; 13] = [
    r"\.vscode/",
    r"\.git/",
    r"(^|/)Demo/",
    r"(^|/)Tests/",
    r"(^|/)Fixtures/",
    r"\.xcodeproj/",
    r"\.xcworkspace/",
    r"\.build/",
    r"Package\.resolved$",
    r"Podfile\.lock$",
    r"\.gitignore$",
    r"README\.md$",
    r"CHANGELOG\.md$",
];

pub const INCLUDE_PREFIXES: [&str; 1] = ["Sources/"];

pub const PORTABLE_KEYWORDS: [&str; 16] = [
    "public",
    "struct",
    "class",
    "enum",
    "func",
    "protocol",
    "Configuration",
    "Manager",
    "Service",
    "Component",
    "Model",
    "API",
    "Network",
    "Cache",
    "Localization",
    "Translation",
];

pub const PRESENTATION_KEYWORDS: [&str; 9] = [
    "import SwiftUI",
    "import UIKit",
    "@State",
    "@Binding",
    "@ObservedObject",
    "View",
    "PreviewProvider",
    "XCTest",
    "test",
];

pub const EXPORTED_MARKERS: [&str; 1] = ["public"];
pub const FUNCTION_MARKERS: [&str; 1] = ["func"];
pub const TYPE_MARKERS: [&str; 3] = ["struct", "class", "enum"];

/// (origin prefix, destination prefix)
pub const MAPPING_PREFIXES: [(&str, &str); 1] = [("Sources/", "library/io/reachu/")];

pub const EXTENSION_MAP: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "swift" => "kt",
};

pub const SEARCH_DEPTH: usize = 8;
