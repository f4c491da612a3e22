use anyhow::{Context, Result};
use serde_json::json;
use std::process::ExitCode;
use wildac::fragment::parse_wildcard;
use wildac::{WildcardMatcher, WildcardPattern};

pub fn cmd_inspect(pattern: String, wildcard: String, json_output: bool) -> Result<ExitCode> {
    let wildcard_byte = parse_wildcard(&wildcard)?;
    let parsed = WildcardPattern::new(&pattern, wildcard_byte)
        .with_context(|| format!("Cannot inspect pattern '{}'", pattern))?;
    let matcher = WildcardMatcher::new(parsed)?;
    let automaton = matcher.automaton();
    let stats = automaton.stats();

    if json_output {
        let trie = automaton.trie();
        let nodes: Vec<_> = trie
            .nodes()
            .iter()
            .enumerate()
            .map(|(id, node)| {
                json!({
                    "id": id,
                    "label": String::from_utf8_lossy(&trie.label(id as u32)),
                    "depth": node.depth(),
                    "parent": node.parent(),
                    "failure": node.failure(),
                    "output": node.output(),
                    "children": node
                        .children()
                        .map(|(b, c)| json!({ "byte": String::from_utf8_lossy(&[b]), "node": c }))
                        .collect::<Vec<_>>(),
                    "fragments": node.terminals(),
                })
            })
            .collect();
        let fragments: Vec<_> = matcher
            .pattern()
            .fragments()
            .iter()
            .map(|f| {
                json!({
                    "text": String::from_utf8_lossy(f.text()),
                    "offset": f.offset(),
                })
            })
            .collect();

        let output = json!({
            "pattern": pattern,
            "wildcard": wildcard,
            "pattern_len": matcher.pattern().len(),
            "fragments": fragments,
            "stats": stats,
            "nodes": nodes,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Pattern:   {}", pattern);
        println!("Wildcard:  {}", wildcard);
        println!("Length:    {}", matcher.pattern().len());
        println!();
        println!("Fragments ({}):", matcher.pattern().fragments().len());
        for (id, fragment) in matcher.pattern().fragments().iter().enumerate() {
            println!("  {}: {}", id, fragment);
        }
        println!();
        println!(
            "Automaton: {} nodes, {} edges, {} terminal nodes, max depth {}",
            stats.node_count, stats.edge_count, stats.terminal_nodes, stats.max_depth
        );
        println!();
        println!("{}", automaton.dump());
    }

    Ok(ExitCode::SUCCESS)
}
