//! `bosun list` / `tree` / `deps` / `rdeps` - graph queries.

use std::collections::BTreeSet;

use anyhow::Result;
use serde::Serialize;

use crate::core::address::Address;
use crate::core::graph::TargetGraph;
use crate::core::target::TargetKind;
use crate::core::workspace::Workspace;
use crate::util::diagnostic::suggestions;

/// Filters for `bosun list`.
#[derive(Debug, Default, Clone)]
pub struct ListFilter {
    pub kind: Option<TargetKind>,
    pub tag: Option<String>,
}

/// One row of `bosun list` output.
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub address: Address,
    pub kind: TargetKind,
    pub tags: Vec<String>,
}

/// List declared targets, filtered and in address order.
pub fn list_targets(ws: &Workspace, filter: &ListFilter) -> Vec<ListEntry> {
    ws.targets()
        .filter(|(_, t)| filter.kind.map_or(true, |k| t.kind == k))
        .filter(|(_, t)| filter.tag.as_deref().map_or(true, |tag| t.has_tag(tag)))
        .map(|(address, t)| ListEntry {
            address,
            kind: t.kind,
            tags: t.tags.clone(),
        })
        .collect()
}

/// Resolve a CLI address argument against the declared target set.
pub fn resolve_cli_address(graph: &TargetGraph, spec: &str) -> Result<Address> {
    let address = Address::parse_cli(spec)?;
    if graph.contains(&address) {
        Ok(address)
    } else {
        anyhow::bail!(
            "no target declared at `{}`\n{}",
            address,
            suggestions::TARGET_NOT_FOUND
        )
    }
}

/// Render the dependency tree rooted at `root`.
///
/// Repeated subtrees are elided with a `(*)` marker.
pub fn render_tree(graph: &TargetGraph, root: Address, max_depth: usize) -> String {
    let mut out = String::new();
    let mut seen = BTreeSet::new();
    render_node(graph, root, 0, max_depth, &mut seen, &mut out);
    out
}

fn render_node(
    graph: &TargetGraph,
    address: Address,
    depth: usize,
    max_depth: usize,
    seen: &mut BTreeSet<Address>,
    out: &mut String,
) {
    if depth > max_depth {
        return;
    }

    let is_repeat = !seen.insert(address);

    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };
    let marker = if is_repeat { " (*)" } else { "" };
    out.push_str(&format!("{}{}{}\n", prefix, address, marker));

    if is_repeat {
        return;
    }

    for dep in graph.deps(&address) {
        render_node(graph, dep, depth + 1, max_depth, seen, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::WorkspaceFixture;
    use crate::util::config::Config;

    fn sample() -> (tempfile::TempDir, Workspace) {
        let fixture = WorkspaceFixture::new()
            .with_build_file(
                "base",
                "[targets.base]\nkind = \"library\"\nsources = [\"*.py\"]\ntags = [\"core\"]\n",
            )
            .with_build_file(
                "app",
                r#"
[targets.app]
kind = "library"
sources = ["*.py"]
dependencies = ["//base"]

[targets.tests]
kind = "test"
sources = ["*_test.py"]
dependencies = [":app", "//base"]
"#,
            )
            .with_source("base/a.py", "")
            .with_source("app/a.py", "")
            .with_source("app/a_test.py", "");
        let tmp = fixture.materialize();
        let ws = Workspace::load(tmp.path(), Config::default()).unwrap();
        (tmp, ws)
    }

    #[test]
    fn list_filters_by_kind_and_tag() {
        let (_tmp, ws) = sample();

        let all = list_targets(&ws, &ListFilter::default());
        assert_eq!(all.len(), 3);

        let tests = list_targets(
            &ws,
            &ListFilter {
                kind: Some(TargetKind::Test),
                tag: None,
            },
        );
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].address.to_string(), "//app:tests");

        let tagged = list_targets(
            &ws,
            &ListFilter {
                kind: None,
                tag: Some("core".to_string()),
            },
        );
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].address.to_string(), "//base:base");
    }

    #[test]
    fn tree_elides_repeats() {
        let (_tmp, ws) = sample();
        let graph = TargetGraph::build(&ws);

        let tree = render_tree(&graph, Address::new("app", "tests"), usize::MAX);
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines[0], "//app:tests");
        assert!(lines.iter().any(|l| l.contains("//base:base (*)")));
    }

    #[test]
    fn cli_address_resolution_rejects_unknown() {
        let (_tmp, ws) = sample();
        let graph = TargetGraph::build(&ws);

        let addr = resolve_cli_address(&graph, "app:tests").unwrap();
        assert_eq!(addr.to_string(), "//app:tests");

        let err = resolve_cli_address(&graph, "//app:missing").unwrap_err();
        assert!(err.to_string().contains("bosun list"));
    }
}
