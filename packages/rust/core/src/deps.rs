//! Dependency sniffing for Python starter code.
//!
//! Starter code from the problem sources references types and modules it does
//! not import (`List[int]`, `ListNode`, `deque`). [`sniff`] matches the code
//! against a fixed pattern table and [`complete_code`] prefixes the imports and
//! class definitions the matches require.

use std::sync::LazyLock;

use regex::Regex;

use leettutor_shared::DependencyFinding;

/// Code cell content used when no source supplies starter code.
pub const PLACEHOLDER_STARTER: &str = "# Write your solution here\n";

const TREE_NODE: &str = "class TreeNode:
    def __init__(self, val=0, left=None, right=None):
        self.val = val
        self.left = left
        self.right = right";

const LIST_NODE: &str = "class ListNode:
    def __init__(self, val=0, next=None):
        self.val = val
        self.next = next";

const GRAPH_NODE: &str = "class Node:
    def __init__(self, val=0, neighbors=None):
        self.val = val
        self.neighbors = neighbors if neighbors is not None else []";

/// (pattern, emission, description), in detection order.
const TABLE: &[(&str, &str, &str)] = &[
    (r"List\[", "from typing import List", "List type annotation"),
    (r"Optional\[", "from typing import Optional", "Optional type annotation"),
    (r"Dict\[", "from typing import Dict", "Dict type annotation"),
    (r"Set\[", "from typing import Set", "Set type annotation"),
    (r"Tuple\[", "from typing import Tuple", "Tuple type annotation"),
    (r"Union\[", "from typing import Union", "Union type annotation"),
    (r"TreeNode", TREE_NODE, "Binary tree node definition"),
    (r"ListNode", LIST_NODE, "Linked list node definition"),
    (r"\bNode\b", GRAPH_NODE, "Generic node definition"),
    (r"collections\.", "import collections", "Collections module"),
    (r"defaultdict", "from collections import defaultdict", "DefaultDict import"),
    (r"deque", "from collections import deque", "Deque import"),
    (r"Counter", "from collections import Counter", "Counter import"),
    (r"heapq\.", "import heapq", "Heapq module"),
    (r"bisect\.", "import bisect", "Bisect module"),
    (r"math\.", "import math", "Math module"),
    (r"itertools\.", "import itertools", "Itertools module"),
];

struct Pattern {
    regex: Regex,
    finding: DependencyFinding,
}

static PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    TABLE
        .iter()
        .map(|&(pattern, emission, description)| Pattern {
            regex: Regex::new(pattern).expect("valid regex"),
            finding: DependencyFinding {
                description,
                emission,
            },
        })
        .collect()
});

/// Findings for every table entry whose pattern occurs in `code`, in table
/// order. Each entry contributes at most once.
pub fn sniff(code: &str) -> Vec<DependencyFinding> {
    PATTERNS
        .iter()
        .filter(|p| p.regex.is_match(code))
        .map(|p| p.finding.clone())
        .collect()
}

/// Imports, a blank line, then class definitions. Empty without findings.
pub fn preamble(findings: &[DependencyFinding]) -> String {
    let mut imports: Vec<&str> = Vec::new();
    let mut classes: Vec<&str> = Vec::new();

    for finding in findings {
        let bucket = if finding.is_import() {
            &mut imports
        } else {
            &mut classes
        };
        if !bucket.contains(&finding.emission) {
            bucket.push(finding.emission);
        }
    }

    let mut lines = imports;
    lines.push("");
    lines.extend(classes);
    lines.join("\n").trim().to_string()
}

/// The starter code with its preamble prepended, or the starter code verbatim
/// when nothing was found.
pub fn complete_code(starter: &str, findings: &[DependencyFinding]) -> String {
    let preamble = preamble(findings);
    if preamble.is_empty() {
        starter.to_string()
    } else {
        format!("# Required imports and definitions\n{preamble}\n\n{starter}")
    }
}

/// Dependency summary line: descriptions joined by `, `.
pub fn summary(findings: &[DependencyFinding]) -> String {
    findings
        .iter()
        .map(|f| f.description)
        .collect::<Vec<_>>()
        .join(", ")
}
