// Shared helpers for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use testreport::engine::{Plan, PlannedFailure, PlannedSuite, PlannedTest};

/// Assert every opening tag has a matching closing tag, in order
pub fn assert_well_formed(xml: &str) {
    let mut stack: Vec<String> = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find('<') {
        let end = rest[start..]
            .find('>')
            .map(|e| start + e)
            .unwrap_or_else(|| panic!("unterminated tag in:\n{}", xml));
        let tag = &rest[start + 1..end];
        rest = &rest[end + 1..];

        if tag.starts_with('?') || tag.starts_with('!') {
            continue;
        }
        if let Some(name) = tag.strip_prefix('/') {
            let open = stack
                .pop()
                .unwrap_or_else(|| panic!("orphan closing tag </{}> in:\n{}", name, xml));
            assert_eq!(open, name.trim(), "mismatched closing tag in:\n{}", xml);
            continue;
        }
        if tag.ends_with('/') {
            continue;
        }
        let name = tag.split_whitespace().next().unwrap_or_default();
        stack.push(name.to_string());
    }

    assert!(stack.is_empty(), "unclosed tags {:?} in:\n{}", stack, xml);
}

pub fn failure(condition: &str, file: &str, line: u32) -> PlannedFailure {
    PlannedFailure {
        condition: condition.to_string(),
        file: file.to_string(),
        line,
    }
}

/// `SuiteX` (t1 passes, t2 fails once) and `SuiteY` (setup fails)
pub fn two_suite_plan() -> Plan {
    let mut suite_y = PlannedSuite::new("SuiteY", vec![PlannedTest::passing("y1")]);
    suite_y.setup_fails = true;

    Plan {
        suites: vec![
            PlannedSuite::new(
                "SuiteX",
                vec![
                    PlannedTest::passing("t1"),
                    PlannedTest::failing("t2", vec![failure("x == 1", "suite_x.c", 42)]),
                ],
            ),
            suite_y,
        ],
    }
}

pub fn results_path(dir: &Path, root: &str) -> PathBuf {
    dir.join(format!("{}-Results.xml", root))
}

pub fn listing_path(dir: &Path, root: &str) -> PathBuf {
    dir.join(format!("{}-Listing.xml", root))
}

pub fn root_in(dir: &Path, root: &str) -> String {
    dir.join(root).to_string_lossy().into_owned()
}
