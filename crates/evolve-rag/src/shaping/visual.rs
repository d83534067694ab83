//! Chart/diagram attachment decision and sanitization

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ResponseBlock;

/// Queries asking for a mermaid diagram
pub const MERMAID_KEYWORDS: &[&str] = &[
    "hierarchy",
    "flowchart",
    "structure",
    "organization",
    "flow",
    "process",
];

/// Queries asking for a Chart.js chart
pub const CHART_KEYWORDS: &[&str] = &["chart", "graph", "plot", "visualization", "diagram"];

static MERMAID_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```mermaid\n?").expect("valid mermaid fence pattern"));
static ANY_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\n?").expect("valid fence pattern"));
static CHART_CONFIG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)const\s+config\s*=\s*\{.*?\};").expect("valid chart config pattern")
});

/// Kind of visual block a query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    Mermaid,
    Chart,
}

impl VisualKind {
    /// Classify a query by case-insensitive substring match; mermaid wins ties
    pub fn detect(query: &str) -> Option<Self> {
        let lower = query.to_lowercase();
        if MERMAID_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Some(Self::Mermaid)
        } else if CHART_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Some(Self::Chart)
        } else {
            None
        }
    }
}

/// Decide which block, if any, the secondary output becomes
pub fn attachment_for(original_query: &str, secondary_output: &str) -> Option<ResponseBlock> {
    if secondary_output.trim().is_empty() {
        return None;
    }

    match VisualKind::detect(original_query)? {
        VisualKind::Mermaid => Some(ResponseBlock::Mermaid(clean_mermaid(secondary_output))),
        VisualKind::Chart => Some(ResponseBlock::Chart(clean_chart(secondary_output))),
    }
}

/// Strip markdown fences around mermaid source
pub fn clean_mermaid(code: &str) -> String {
    let code = MERMAID_FENCE.replace_all(code, "");
    let code = ANY_FENCE.replace_all(&code, "");
    code.trim().to_string()
}

/// Extract the `const config = {...};` assignment, or keep the trimmed output
pub fn clean_chart(code: &str) -> String {
    match CHART_CONFIG.find(code) {
        Some(m) => m.as_str().to_string(),
        None => code.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_mermaid_strips_fences() {
        assert_eq!(clean_mermaid("```mermaid\nA-->B\n```"), "A-->B");
        assert_eq!(clean_mermaid("  ```\ngraph TD\nA-->B\n```\n  "), "graph TD\nA-->B");
        assert_eq!(clean_mermaid("A-->B"), "A-->B");
    }

    #[test]
    fn test_clean_chart_extracts_config() {
        let output = "Here is your chart:\nconst config = {a:1};\nEnjoy!";
        assert_eq!(clean_chart(output), "const config = {a:1};");
    }

    #[test]
    fn test_clean_chart_spans_lines_non_greedy() {
        let output = "const config = {\n  type: 'bar',\n  data: {}\n};\nconst other = {b:2};";
        assert_eq!(
            clean_chart(output),
            "const config = {\n  type: 'bar',\n  data: {}\n};"
        );
    }

    #[test]
    fn test_clean_chart_without_config_is_trimmed() {
        assert_eq!(
            clean_chart("  {\"type\": \"bar\"}\n"),
            "{\"type\": \"bar\"}"
        );
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(VisualKind::detect("Show the HIERARCHY"), Some(VisualKind::Mermaid));
        assert_eq!(VisualKind::detect("Plot revenue"), Some(VisualKind::Chart));
        assert_eq!(VisualKind::detect("What is the refund policy?"), None);
    }

    #[test]
    fn test_mermaid_takes_precedence() {
        assert_eq!(VisualKind::detect("flowchart and chart"), Some(VisualKind::Mermaid));
        let block = attachment_for("draw a flowchart chart", "const config = {a:1};");
        assert!(matches!(block, Some(ResponseBlock::Mermaid(_))));
    }

    #[test]
    fn test_substring_match_counts() {
        // "workflow" contains "flow"
        assert_eq!(VisualKind::detect("our workflow"), Some(VisualKind::Mermaid));
    }

    #[test]
    fn test_blank_output_attaches_nothing() {
        assert_eq!(attachment_for("show a chart", "   \n"), None);
        assert_eq!(attachment_for("show a chart", ""), None);
    }

    #[test]
    fn test_no_keyword_attaches_nothing() {
        assert_eq!(attachment_for("tell me about refunds", "A-->B"), None);
    }

    #[test]
    fn test_chart_attachment() {
        assert_eq!(
            attachment_for("Give me a graph of sales", "Sure. const config = {a:1}; done"),
            Some(ResponseBlock::Chart("const config = {a:1};".to_string()))
        );
    }
}
