//! Code pre-validator.
//!
//! Cheap line-oriented heuristics that catch obviously broken submissions
//! before they reach the reviewer: bracket balance, missing semicolons in
//! Java, indentation problems in Python. It is a lint, not a parser; anything
//! it lets through is judged by the reviewer.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    C,
    Go,
    Other,
}

impl Language {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "python" | "python3" | "py" => Language::Python,
            "javascript" | "js" => Language::JavaScript,
            "typescript" | "ts" => Language::TypeScript,
            "java" => Language::Java,
            "cpp" | "c++" | "cc" => Language::Cpp,
            "c" => Language::C,
            "go" | "golang" => Language::Go,
            _ => Language::Other,
        }
    }

    fn hash_comments(&self) -> bool {
        matches!(self, Language::Python)
    }

    fn backtick_strings(&self) -> bool {
        matches!(self, Language::JavaScript | Language::TypeScript | Language::Go)
    }

    fn regex_literals(&self) -> bool {
        matches!(self, Language::JavaScript | Language::TypeScript)
    }

    /// Unknown languages may use `'` for lifetimes or labels, not strings.
    fn single_quote_strings(&self) -> bool {
        *self != Language::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Empty,
    Unbalanced,
    Unclosed,
    MissingSemicolon,
    MixedIndentation,
    ExpectedIndent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    /// 1-based; absent for whole-file issues.
    pub line: Option<usize>,
    pub message: String,
}

impl Issue {
    fn error(kind: IssueKind, line: Option<usize>, message: String) -> Self {
        Self { kind, severity: Severity::Error, line, message }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecheckReport {
    /// False when at least one issue is an error. Warnings never block.
    pub ok: bool,
    pub issues: Vec<Issue>,
}

impl PrecheckReport {
    fn from_issues(issues: Vec<Issue>) -> Self {
        let ok = issues.iter().all(|i| i.severity != Severity::Error);
        Self { ok, issues }
    }
}

/// Run every check that applies to `language`.
pub fn precheck(code: &str, language: &str) -> PrecheckReport {
    if code.trim().is_empty() {
        return PrecheckReport::from_issues(vec![Issue::error(
            IssueKind::Empty,
            None,
            "Submission is empty".to_string(),
        )]);
    }

    let lang = Language::parse(language);
    let raw: Vec<&str> = code.lines().collect();
    let cleaned = strip_literals(&raw, lang);

    let mut issues = check_brackets(&cleaned);
    if lang == Language::Other {
        // Grammar unknown: bracket findings are advisory only.
        for issue in &mut issues {
            issue.severity = Severity::Warning;
        }
    }
    match lang {
        Language::Java => issues.extend(check_semicolons(&cleaned)),
        Language::Python => {
            issues.extend(check_mixed_indentation(&raw));
            issues.extend(check_expected_indent(&raw, &cleaned));
        }
        _ => {}
    }
    issues.sort_by_key(|i| i.line.unwrap_or(0));
    PrecheckReport::from_issues(issues)
}

/// SHA-256 of the code with trailing whitespace and surrounding blank lines removed.
pub fn fingerprint(code: &str) -> String {
    let lines: Vec<&str> = code.lines().map(str::trim_end).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);

    let mut hasher = Sha256::new();
    hasher.update(lines[start..end].join("\n").as_bytes());
    format!("{:x}", hasher.finalize())
}

// ── Literal stripping ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
enum Scan {
    Code,
    Str(char),
    TripleStr(char),
    Backtick,
    Regex { in_class: bool },
    BlockComment,
}

/// Remove string contents and comments, line by line. Quote characters stay
/// as placeholders so `x = "a;"` still reads as a statement. Multi-line
/// literals (triple quotes, backticks, block comments) carry across lines;
/// ordinary strings end at the end of their line.
fn strip_literals(lines: &[&str], lang: Language) -> Vec<String> {
    let mut state = Scan::Code;
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        let chars: Vec<char> = line.chars().collect();
        let mut cleaned = String::with_capacity(chars.len());
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            match state {
                Scan::Code => {
                    if lang.hash_comments() && c == '#' {
                        break;
                    }
                    if !lang.hash_comments() && c == '/' && next == Some('/') {
                        break;
                    }
                    if !lang.hash_comments() && c == '/' && next == Some('*') {
                        state = Scan::BlockComment;
                        i += 2;
                        continue;
                    }
                    if lang == Language::Python && (c == '"' || c == '\'') && starts_triple(&chars, i, c) {
                        cleaned.push(c);
                        state = Scan::TripleStr(c);
                        i += 3;
                        continue;
                    }
                    if lang.regex_literals() && c == '/' && regex_may_start(&cleaned) {
                        cleaned.push(c);
                        state = Scan::Regex { in_class: false };
                    } else if c == '"' || (c == '\'' && lang.single_quote_strings()) {
                        cleaned.push(c);
                        state = Scan::Str(c);
                    } else if c == '`' && lang.backtick_strings() {
                        cleaned.push(c);
                        state = Scan::Backtick;
                    } else {
                        cleaned.push(c);
                    }
                }
                Scan::Str(q) => {
                    if c == '\\' {
                        i += 2;
                        continue;
                    }
                    if c == q {
                        cleaned.push(c);
                        state = Scan::Code;
                    }
                }
                Scan::TripleStr(q) => {
                    if c == '\\' {
                        i += 2;
                        continue;
                    }
                    if c == q && starts_triple(&chars, i, q) {
                        cleaned.push(q);
                        state = Scan::Code;
                        i += 3;
                        continue;
                    }
                }
                Scan::Backtick => {
                    if c == '\\' && lang != Language::Go {
                        i += 2;
                        continue;
                    }
                    if c == '`' {
                        cleaned.push(c);
                        state = Scan::Code;
                    }
                }
                Scan::Regex { in_class } => {
                    if c == '\\' {
                        i += 2;
                        continue;
                    }
                    if in_class {
                        if c == ']' {
                            state = Scan::Regex { in_class: false };
                        }
                    } else if c == '[' {
                        state = Scan::Regex { in_class: true };
                    } else if c == '/' {
                        cleaned.push(c);
                        state = Scan::Code;
                    }
                }
                Scan::BlockComment => {
                    if c == '*' && next == Some('/') {
                        state = Scan::Code;
                        i += 2;
                        continue;
                    }
                }
            }
            i += 1;
        }

        if matches!(state, Scan::Str(_) | Scan::Regex { .. }) {
            state = Scan::Code;
        }
        out.push(cleaned);
    }
    out
}

const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "in", "of", "void", "delete", "throw", "new", "yield", "await",
];

/// A `/` opens a regex literal, not a division, when nothing that could be a
/// dividend precedes it on the line.
fn regex_may_start(cleaned: &str) -> bool {
    let before = cleaned.trim_end();
    let Some(last) = before.chars().last() else {
        return true;
    };
    if "(,=:[!&|?{};+-*%<>~^".contains(last) {
        return true;
    }
    let word: String = before
        .chars()
        .rev()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    REGEX_PRECEDING_KEYWORDS.contains(&word.as_str())
        && before[..before.len() - word.len()]
            .chars()
            .last()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '$' || c == '.'))
}

fn starts_triple(chars: &[char], i: usize, q: char) -> bool {
    chars.get(i + 1) == Some(&q) && chars.get(i + 2) == Some(&q)
}

// ── Brackets ──────────────────────────────────────────────────────────────────

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Stops at the first stray or mismatched closer; otherwise reports every opener left at EOF.
fn check_brackets(cleaned: &[String]) -> Vec<Issue> {
    let mut stack: Vec<(char, usize)> = Vec::new();

    for (idx, line) in cleaned.iter().enumerate() {
        let line_no = idx + 1;
        for c in line.chars() {
            match c {
                '(' | '[' | '{' => stack.push((c, line_no)),
                ')' | ']' | '}' => match stack.pop() {
                    None => {
                        return vec![Issue::error(
                            IssueKind::Unbalanced,
                            Some(line_no),
                            format!("Unexpected '{c}' with nothing to close"),
                        )];
                    }
                    Some((open, opened_at)) if closer_for(open) != c => {
                        return vec![Issue::error(
                            IssueKind::Unbalanced,
                            Some(line_no),
                            format!(
                                "Found '{c}' but '{open}' from line {opened_at} expects '{}'",
                                closer_for(open)
                            ),
                        )];
                    }
                    Some(_) => {}
                },
                _ => {}
            }
        }
    }

    stack
        .into_iter()
        .map(|(open, line_no)| {
            Issue::error(
                IssueKind::Unclosed,
                Some(line_no),
                format!("'{open}' is never closed"),
            )
        })
        .collect()
}

// ── Java semicolons ───────────────────────────────────────────────────────────

const JAVA_BLOCK_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "try", "catch", "finally", "switch", "case", "default",
    "class", "interface", "enum", "record", "public", "private", "protected", "static", "abstract",
    "final", "synchronized",
];

const CONTINUATION_ENDINGS: &[char] = &[
    ';', '{', '}', ',', ':', '(', '[', '+', '-', '*', '/', '%', '=', '&', '|', '?', '<', '>', '!', '.',
];

fn check_semicolons(cleaned: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut depth: i32 = 0;

    for (idx, line) in cleaned.iter().enumerate() {
        let depth_before = depth;
        for c in line.chars() {
            match c {
                '(' | '[' => depth += 1,
                ')' | ']' => depth -= 1,
                _ => {}
            }
        }

        let text = line.trim();
        if text.is_empty() || depth_before > 0 || depth > 0 {
            continue;
        }
        if text.starts_with('@') || text.ends_with(CONTINUATION_ENDINGS) {
            continue;
        }
        let first_word = text
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .next()
            .unwrap_or("");
        if JAVA_BLOCK_KEYWORDS.contains(&first_word) {
            continue;
        }
        let continues = cleaned[idx + 1..]
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .is_some_and(|l| l.starts_with(['{', '}', '.', '+', '-', '*', '/', '&', '|', '?', ':']));
        if continues {
            continue;
        }

        issues.push(Issue::error(
            IssueKind::MissingSemicolon,
            Some(idx + 1),
            "Statement may be missing a ';'".to_string(),
        ));
    }
    issues
}

// ── Python indentation ────────────────────────────────────────────────────────

fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

fn indent_width(line: &str) -> usize {
    leading_whitespace(line)
        .chars()
        .map(|c| if c == '\t' { 8 } else { 1 })
        .sum()
}

/// One warning, at the first line that disagrees with the style seen so far.
fn check_mixed_indentation(raw: &[&str]) -> Option<Issue> {
    let mut seen_tabs = false;
    let mut seen_spaces = false;

    for (idx, line) in raw.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let ws = leading_whitespace(line);
        let tabs = ws.contains('\t');
        let spaces = ws.contains(' ');
        if (tabs && spaces) || (tabs && seen_spaces) || (spaces && seen_tabs) {
            return Some(Issue {
                kind: IssueKind::MixedIndentation,
                severity: Severity::Warning,
                line: Some(idx + 1),
                message: "Indentation mixes tabs and spaces".to_string(),
            });
        }
        seen_tabs |= tabs;
        seen_spaces |= spaces;
    }
    None
}

fn check_expected_indent(raw: &[&str], cleaned: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut depth: i32 = 0;

    for (idx, line) in cleaned.iter().enumerate() {
        for c in line.chars() {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                _ => {}
            }
        }
        if depth > 0 || !line.trim_end().ends_with(':') {
            continue;
        }

        let opener_width = indent_width(raw[idx]);
        let next = (idx + 1..cleaned.len()).find(|&j| !cleaned[j].trim().is_empty());
        match next {
            Some(j) if indent_width(raw[j]) > opener_width => {}
            Some(j) => issues.push(Issue::error(
                IssueKind::ExpectedIndent,
                Some(j + 1),
                format!("Expected an indented block after line {}", idx + 1),
            )),
            None => issues.push(Issue::error(
                IssueKind::ExpectedIndent,
                Some(idx + 1),
                "Block opened here has no body".to_string(),
            )),
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(report: &PrecheckReport) -> Vec<IssueKind> {
        report.issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_empty_code() {
        let report = precheck("  \n\t\n", "python");
        assert!(!report.ok);
        assert_eq!(kinds(&report), vec![IssueKind::Empty]);
    }

    #[test]
    fn test_clean_python_passes() {
        let code = "def two_sum(nums, target):\n    seen = {}\n    for i, n in enumerate(nums):\n        if target - n in seen:\n            return [seen[target - n], i]\n        seen[n] = i\n    return []\n";
        let report = precheck(code, "python");
        assert!(report.ok, "{:?}", report.issues);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_brackets_inside_strings_and_comments_ignored() {
        let code = "s = \"(((\"  # )))\nt = '[' \nprint(s, t)\n";
        assert!(precheck(code, "python").ok);

        let js = "const a = `{\n  ${x}\n`; // }\n/* ( */ f();\n";
        assert!(precheck(js, "javascript").ok);
    }

    #[test]
    fn test_js_regex_literals_are_not_brackets() {
        let code = "function clean(s) {\n  const re = /[({]+/g;\n  return s.replace(/\\(/g, '');\n}\n";
        let report = precheck(code, "javascript");
        assert!(report.ok, "{:?}", report.issues);

        let ts = "const half = (a: number, b: number) => (a + b) / 2 / (b || 1);\n";
        assert!(precheck(ts, "typescript").ok);
    }

    #[test]
    fn test_unknown_language_tolerates_lifetimes_and_never_blocks() {
        let rust = "fn first<'a>(x: &'a str) -> &'a str { x }\n";
        let report = precheck(rust, "rust");
        assert!(report.ok, "{:?}", report.issues);
        assert!(report.issues.is_empty());

        let broken = precheck("fn f() { g(1; }\n", "rust");
        assert!(broken.ok);
        assert_eq!(broken.issues[0].kind, IssueKind::Unbalanced);
        assert_eq!(broken.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_triple_quoted_docstring_spans_lines() {
        let code = "def f():\n    \"\"\"Returns (\n    a tuple\n    \"\"\"\n    return (1, 2)\n";
        let report = precheck(code, "python");
        assert!(report.ok, "{:?}", report.issues);
    }

    #[test]
    fn test_mismatched_closer_stops_at_first_error() {
        let code = "int main() {\n  foo(1];\n  bar(;\n}\n";
        let report = precheck(code, "cpp");
        assert_eq!(kinds(&report), vec![IssueKind::Unbalanced]);
        assert_eq!(report.issues[0].line, Some(2));
    }

    #[test]
    fn test_stray_closer() {
        let report = precheck("x = 1)\n", "python");
        assert_eq!(kinds(&report), vec![IssueKind::Unbalanced]);
        assert_eq!(report.issues[0].line, Some(1));
    }

    #[test]
    fn test_unclosed_openers_reported_at_their_line() {
        let code = "function f() {\n  if (x) {\n    return [1, 2;\n";
        let report = precheck(code, "javascript");
        assert!(!report.ok);
        let lines: Vec<_> = report.issues.iter().map(|i| (i.kind, i.line)).collect();
        assert_eq!(
            lines,
            vec![
                (IssueKind::Unclosed, Some(1)),
                (IssueKind::Unclosed, Some(2)),
                (IssueKind::Unclosed, Some(3)),
            ]
        );
    }

    #[test]
    fn test_java_missing_semicolon() {
        let code = "class Solution {\n    int add(int a, int b) {\n        int c = a + b\n        return c;\n    }\n}\n";
        let report = precheck(code, "java");
        assert_eq!(kinds(&report), vec![IssueKind::MissingSemicolon]);
        assert_eq!(report.issues[0].line, Some(3));
    }

    #[test]
    fn test_java_allman_braces_and_chains_pass() {
        let code = "@Override\npublic int size()\n{\n    return list.stream()\n        .filter(x -> x > 0)\n        .count();\n}\n";
        let report = precheck(code, "java");
        assert!(report.ok, "{:?}", report.issues);
    }

    #[test]
    fn test_semicolon_check_only_for_java() {
        assert!(precheck("int x = 1\n", "cpp").ok);
    }

    #[test]
    fn test_python_expected_indent() {
        let code = "def f(x):\nreturn x\n";
        let report = precheck(code, "python");
        assert_eq!(kinds(&report), vec![IssueKind::ExpectedIndent]);
        assert_eq!(report.issues[0].line, Some(2));
    }

    #[test]
    fn test_python_block_without_body_at_eof() {
        let report = precheck("for i in range(3):\n", "python");
        assert_eq!(kinds(&report), vec![IssueKind::ExpectedIndent]);
        assert_eq!(report.issues[0].line, Some(1));
    }

    #[test]
    fn test_python_dict_literal_colons_ignored() {
        let code = "d = {\n    'a':\n        1,\n}\n";
        assert!(precheck(code, "python").ok);
    }

    #[test]
    fn test_mixed_indentation_is_only_a_warning() {
        let code = "if True:\n    x = 1\n\ty = 2\n";
        let report = precheck(code, "python");
        assert!(report.ok);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::MixedIndentation);
        assert_eq!(report.issues[0].severity, Severity::Warning);
        assert_eq!(report.issues[0].line, Some(3));
    }

    #[test]
    fn test_fingerprint_ignores_trailing_whitespace_and_blank_edges() {
        let a = fingerprint("\n\ndef f():  \n    return 1\n\n");
        let b = fingerprint("def f():\n    return 1");
        assert_eq!(a, b);
        assert_ne!(a, fingerprint("def f():\n    return 2"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_report_serializes_snake_case() {
        let report = precheck("(", "go");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["issues"][0]["kind"], "unclosed");
        assert_eq!(json["issues"][0]["severity"], "error");
    }
}
