//! Markdown to styled lines with comrak.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{Arena, Options, parse_document};
use unicode_width::UnicodeWidthStr;

use super::{InlineSpan, InlineStyle, LineKind, RenderedLine};

const QUOTE_PREFIX: &str = "│ ";
const CODE_INDENT: &str = "    ";

/// Render markdown source to display lines wrapped at `width` columns.
pub fn render_markdown(source: &str, width: usize) -> Vec<RenderedLine> {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);
    let mut out = Vec::new();
    let ctx = BlockContext {
        width: width.max(8),
        prefix: String::new(),
    };
    render_block(root, &ctx, &mut out);
    while out.last().is_some_and(|l| l.kind == LineKind::Empty) {
        out.pop();
    }
    out
}

fn create_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options
}

#[derive(Debug, Clone)]
struct BlockContext {
    width: usize,
    /// Prefix for every line of the block (quote bars, list indentation).
    prefix: String,
}

impl BlockContext {
    fn nested(&self, extra: &str) -> Self {
        Self {
            width: self.width,
            prefix: format!("{}{extra}", self.prefix),
        }
    }
}

fn render_block<'a>(node: &'a AstNode<'a>, ctx: &BlockContext, out: &mut Vec<RenderedLine>) {
    match &node.data.borrow().value {
        NodeValue::Document => {
            for child in node.children() {
                render_block(child, ctx, out);
            }
        }
        NodeValue::Heading(heading) => {
            let spans = collect_inline(node);
            let marker = format!("{} ", "#".repeat(usize::from(heading.level)));
            push_wrapped(
                out,
                &spans,
                ctx,
                &marker,
                LineKind::Heading(heading.level),
            );
            push_gap(out, ctx);
        }
        NodeValue::Paragraph => {
            let spans = collect_inline(node);
            push_wrapped(out, &spans, ctx, "", LineKind::Paragraph);
            push_gap(out, ctx);
        }
        NodeValue::CodeBlock(block) => {
            for line in block.literal.trim_end_matches('\n').lines() {
                out.push(RenderedLine {
                    kind: LineKind::CodeBlock,
                    spans: vec![InlineSpan::new(
                        format!("{}{CODE_INDENT}{line}", ctx.prefix),
                        InlineStyle {
                            code: true,
                            ..InlineStyle::default()
                        },
                    )],
                });
            }
            push_gap(out, ctx);
        }
        NodeValue::List(list) => {
            let mut number = list.start;
            for item in node.children() {
                let marker = match list.list_type {
                    ListType::Bullet => task_marker(item).unwrap_or("•").to_string(),
                    ListType::Ordered => format!("{number}."),
                };
                number += 1;
                render_list_item(item, ctx, &marker, out);
            }
            push_gap(out, ctx);
        }
        NodeValue::BlockQuote => {
            let inner = ctx.nested(QUOTE_PREFIX);
            for child in node.children() {
                render_block(child, &inner, out);
            }
            if out.last().is_some_and(|l| l.kind == LineKind::Empty) {
                out.pop();
            }
            push_gap(out, ctx);
        }
        NodeValue::ThematicBreak => {
            let rule_width = ctx.width.saturating_sub(ctx.prefix.width()).max(3);
            out.push(RenderedLine::plain(
                format!("{}{}", ctx.prefix, "─".repeat(rule_width)),
                LineKind::Rule,
            ));
            push_gap(out, ctx);
        }
        NodeValue::HtmlBlock(html) => {
            for line in html.literal.lines() {
                out.push(RenderedLine::plain(
                    format!("{}{line}", ctx.prefix),
                    LineKind::Paragraph,
                ));
            }
            push_gap(out, ctx);
        }
        NodeValue::Table(_) => {
            for row in node.children() {
                let cells: Vec<String> = row
                    .children()
                    .map(|cell| spans_text(&collect_inline(cell)))
                    .collect();
                out.push(RenderedLine::plain(
                    format!("{}{}", ctx.prefix, cells.join(" │ ")),
                    LineKind::Paragraph,
                ));
            }
            push_gap(out, ctx);
        }
        _ => {
            for child in node.children() {
                render_block(child, ctx, out);
            }
        }
    }
}

fn render_list_item<'a>(
    item: &'a AstNode<'a>,
    ctx: &BlockContext,
    marker: &str,
    out: &mut Vec<RenderedLine>,
) {
    let hang = " ".repeat(marker.width() + 1);
    let inner = ctx.nested(&hang);
    let mut first = true;
    for child in item.children() {
        let is_paragraph = matches!(child.data.borrow().value, NodeValue::Paragraph);
        if first && is_paragraph {
            let spans = collect_inline(child);
            let lead = format!("{marker} ");
            push_wrapped(out, &spans, ctx, &lead, LineKind::ListItem);
            first = false;
            continue;
        }
        if matches!(child.data.borrow().value, NodeValue::TaskItem(_)) {
            continue;
        }
        render_block(child, &inner, out);
        if out.last().is_some_and(|l| l.kind == LineKind::Empty) {
            out.pop();
        }
        first = false;
    }
}

fn task_marker<'a>(item: &'a AstNode<'a>) -> Option<&'static str> {
    match &item.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(if symbol.is_some() { "☑" } else { "☐" }),
        _ => None,
    }
}

fn push_gap(out: &mut Vec<RenderedLine>, ctx: &BlockContext) {
    if out.last().is_some_and(|l| l.kind == LineKind::Empty) {
        return;
    }
    let bar = ctx.prefix.trim_end();
    if bar.is_empty() {
        out.push(RenderedLine::empty());
    } else {
        out.push(RenderedLine {
            kind: LineKind::Empty,
            spans: vec![InlineSpan::new(bar, InlineStyle::default())],
        });
    }
}

fn collect_inline<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in node.children() {
        collect_inline_recursive(child, InlineStyle::default(), &mut spans);
    }
    spans
}

fn collect_inline_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    let nested = |next: InlineStyle, spans: &mut Vec<InlineSpan>| {
        for child in node.children() {
            collect_inline_recursive(child, next, spans);
        }
    };
    match &node.data.borrow().value {
        NodeValue::Text(text) => spans.push(InlineSpan::new(text.clone(), style)),
        NodeValue::Code(code) => spans.push(InlineSpan::new(
            code.literal.clone(),
            InlineStyle {
                code: true,
                ..InlineStyle::default()
            },
        )),
        NodeValue::SoftBreak | NodeValue::LineBreak => spans.push(InlineSpan::new(" ", style)),
        NodeValue::HtmlInline(html) => spans.push(InlineSpan::new(html.clone(), style)),
        NodeValue::Emph => nested(
            InlineStyle {
                emphasis: true,
                ..style
            },
            spans,
        ),
        NodeValue::Strong => nested(
            InlineStyle {
                strong: true,
                ..style
            },
            spans,
        ),
        NodeValue::Strikethrough => nested(
            InlineStyle {
                strikethrough: true,
                ..style
            },
            spans,
        ),
        NodeValue::Link(_) => nested(InlineStyle { link: true, ..style }, spans),
        NodeValue::Image(image) => {
            let mut alt = Vec::new();
            nested(style, &mut alt);
            let label = spans_text(&alt);
            let shown = if label.is_empty() { &image.url } else { &label };
            spans.push(InlineSpan::new(format!("[image: {shown}]"), style));
        }
        _ => nested(style, spans),
    }
}

fn spans_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// Word-wrap spans into lines. `lead` starts the first line; continuation
/// lines are indented to match it.
fn push_wrapped(
    out: &mut Vec<RenderedLine>,
    spans: &[InlineSpan],
    ctx: &BlockContext,
    lead: &str,
    kind: LineKind,
) {
    let plain = InlineStyle::default();
    let first_prefix = format!("{}{lead}", ctx.prefix);
    let rest_prefix = format!("{}{}", ctx.prefix, " ".repeat(lead.width()));
    let limit = ctx.width.max(first_prefix.width() + 1);

    let mut line: Vec<InlineSpan> = vec![InlineSpan::new(first_prefix.clone(), plain)];
    let mut used = first_prefix.width();
    let mut line_has_words = false;

    for span in spans {
        for word in split_keep_spaces(&span.text) {
            let word_width = word.width();
            let is_space = word.trim().is_empty();
            if is_space && !line_has_words {
                continue;
            }
            if !is_space && line_has_words && used + word_width > limit {
                trim_trailing_space(&mut line);
                out.push(RenderedLine {
                    kind,
                    spans: std::mem::take(&mut line),
                });
                line.push(InlineSpan::new(rest_prefix.clone(), plain));
                used = rest_prefix.width();
                line_has_words = false;
            }
            append(&mut line, word, span.style);
            used += word_width;
            line_has_words |= !is_space;
        }
    }
    trim_trailing_space(&mut line);
    out.push(RenderedLine { kind, spans: line });
}

fn split_keep_spaces(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|s| s != space) {
            parts.push(&text[start..idx]);
            start = idx;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

fn append(line: &mut Vec<InlineSpan>, text: &str, style: InlineStyle) {
    // Index 0 is the line prefix and never absorbs words.
    if line.len() > 1
        && let Some(last) = line.last_mut()
        && last.style == style
    {
        last.text.push_str(text);
        return;
    }
    line.push(InlineSpan::new(text, style));
}

fn trim_trailing_space(line: &mut Vec<InlineSpan>) {
    while line.len() > 1 {
        let Some(last) = line.last_mut() else {
            break;
        };
        let trimmed_len = last.text.trim_end().len();
        if trimmed_len > 0 {
            last.text.truncate(trimmed_len);
            break;
        }
        line.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[RenderedLine]) -> Vec<String> {
        lines.iter().map(RenderedLine::text).collect()
    }

    #[test]
    fn test_heading_keeps_marker_and_level() {
        let lines = render_markdown("## Section\n\nBody text", 80);
        assert_eq!(lines[0].kind, LineKind::Heading(2));
        assert_eq!(lines[0].text(), "## Section");
        assert_eq!(texts(&lines), vec!["## Section", "", "Body text"]);
    }

    #[test]
    fn test_inline_styles_are_tracked() {
        let lines = render_markdown("plain **bold** and `code`", 80);
        let bold = lines[0]
            .spans
            .iter()
            .find(|s| s.text == "bold")
            .expect("bold span");
        assert!(bold.style.strong);
        let code = lines[0]
            .spans
            .iter()
            .find(|s| s.text == "code")
            .expect("code span");
        assert!(code.style.code);
    }

    #[test]
    fn test_paragraph_wraps_at_width() {
        let lines = render_markdown("one two three four five six", 14);
        let rendered = texts(&lines);
        assert!(rendered.len() > 1, "expected wrapping, got {rendered:?}");
        for line in &rendered {
            assert!(line.width() <= 14, "line too wide: {line:?}");
        }
        assert_eq!(rendered.join(" "), "one two three four five six");
    }

    #[test]
    fn test_lists_use_markers() {
        let lines = render_markdown("- apple\n- pear\n\n3. third\n4. fourth", 80);
        let rendered = texts(&lines);
        assert!(rendered.contains(&"• apple".to_string()));
        assert!(rendered.contains(&"3. third".to_string()));
        assert!(rendered.contains(&"4. fourth".to_string()));
    }

    #[test]
    fn test_task_items_show_checkbox() {
        let lines = render_markdown("- [x] done\n- [ ] todo", 80);
        let rendered = texts(&lines);
        assert!(rendered.iter().any(|l| l.contains("done")));
        assert!(rendered.iter().any(|l| l.contains("todo")));
    }

    #[test]
    fn test_code_block_is_indented_verbatim() {
        let lines = render_markdown("```rust\nfn main() {}\n```", 80);
        assert_eq!(lines[0].kind, LineKind::CodeBlock);
        assert_eq!(lines[0].text(), "    fn main() {}");
    }

    #[test]
    fn test_quote_lines_are_prefixed() {
        let lines = render_markdown("> quoted words", 80);
        assert_eq!(lines[0].text(), "│ quoted words");
    }

    #[test]
    fn test_rule_spans_width() {
        let lines = render_markdown("---", 20);
        assert_eq!(lines[0].kind, LineKind::Rule);
        assert_eq!(lines[0].text().width(), 20);
    }

    #[test]
    fn test_empty_source_renders_nothing() {
        assert!(render_markdown("", 80).is_empty());
    }
}
