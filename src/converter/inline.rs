//! Inline content - turns runs into formatted spans and spans into Markdown.

use super::ConversionContext;
use crate::render::escape_html_attr;
use rs_docx::document::{BreakType, CharType, Deletion, Run, RunContent};
use tracing::warn;

pub(crate) const PAGE_BREAK: &str = "\n\n---\n\n";

/// Character formatting that survives into the Markdown output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Emphasis {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub inserted: bool,
    pub deleted: bool,
}

/// Text sharing one [`Emphasis`], or a bookmark anchor when `anchor` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Span {
    pub text: String,
    pub emphasis: Emphasis,
    pub anchor: Option<String>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn anchor(name: impl Into<String>) -> Self {
        Self {
            anchor: Some(name.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldPhase {
    Instruction,
    Result,
}

/// Tracks complex-field state (`w:fldChar`) across the runs of a paragraph.
///
/// Field instructions are hidden; field results stay visible. Fields nest.
#[derive(Debug, Default)]
pub(crate) struct FieldTracker {
    stack: Vec<FieldPhase>,
}

impl FieldTracker {
    fn in_instruction(&self) -> bool {
        self.stack.last() == Some(&FieldPhase::Instruction)
    }

    /// Copy of `run` holding only the content visible outside field instructions.
    pub fn visible<'a>(&mut self, run: &Run<'a>) -> Run<'a> {
        let mut visible = run.clone();
        visible.content.clear();

        for content in &run.content {
            match content {
                RunContent::FieldChar(fc) => match fc.ty {
                    Some(CharType::Begin) => self.stack.push(FieldPhase::Instruction),
                    Some(CharType::Separate) => {
                        if let Some(top) = self.stack.last_mut() {
                            *top = FieldPhase::Result;
                        }
                    }
                    Some(CharType::End) => {
                        self.stack.pop();
                    }
                    None => {}
                },
                RunContent::InstrText(_) | RunContent::DelInstrText(_) => {}
                _ if self.in_instruction() => {}
                _ => visible.content.push(content.clone()),
            }
        }

        visible
    }
}

/// Plain text of a run: text, breaks, images and note markers.
pub(crate) fn run_text<'a>(run: &Run<'a>, context: &mut ConversionContext<'a>) -> String {
    let mut text = String::new();
    for content in &run.content {
        match content {
            RunContent::Text(t) => text.push_str(&t.text),
            RunContent::Tab(_) => text.push('\t'),
            RunContent::Break(br) => match br.ty {
                Some(BreakType::Page) => text.push_str(PAGE_BREAK),
                _ => text.push('\n'),
            },
            RunContent::CarriageReturn(_) => text.push('\n'),
            RunContent::Drawing(drawing) => match context.drawing_image(drawing) {
                Ok(Some(markup)) => text.push_str(&markup),
                Ok(None) => {}
                Err(err) => warn!(error = %err, "skipping drawing image"),
            },
            RunContent::Pict(pict) => match context.pict_image(pict) {
                Ok(Some(markup)) => text.push_str(&markup),
                Ok(None) => {}
                Err(err) => warn!(error = %err, "skipping VML image"),
            },
            RunContent::CommentReference(cref) => {
                if let Some(id) = &cref.id {
                    text.push_str(&context.notes().comment(id.as_ref()));
                }
            }
            RunContent::FootnoteReference(fref) => {
                if let Some(id) = fref.id.as_ref().and_then(|id| id.parse::<isize>().ok()) {
                    text.push_str(&context.notes().footnote(id));
                }
            }
            RunContent::EndnoteReference(eref) => {
                if let Some(id) = eref.id.as_ref().and_then(|id| id.parse::<isize>().ok()) {
                    text.push_str(&context.notes().endnote(id));
                }
            }
            _ => {}
        }
    }
    text
}

/// Text removed under track changes.
pub(crate) fn deleted_text(deletion: &Deletion<'_>) -> String {
    deletion
        .runs
        .iter()
        .flat_map(|run| run.content.iter())
        .filter_map(|content| match content {
            RunContent::DelText(t) => Some(&*t.text),
            _ => None,
        })
        .collect()
}

/// Effective emphasis of a run after style inheritance.
pub(crate) fn run_emphasis<'a>(
    run: &Run<'a>,
    context: &ConversionContext<'a>,
    para_style_id: Option<&str>,
) -> Emphasis {
    let run_style_id = run
        .property
        .as_ref()
        .and_then(|p| p.style_id.as_ref())
        .map(|s| s.value.as_ref());
    let props = context.run_property(run.property.as_ref(), run_style_id, para_style_id);

    Emphasis {
        bold: props.bold.as_ref().is_some_and(|b| b.value.unwrap_or(true)),
        italic: props.italics.as_ref().is_some_and(|i| i.value.unwrap_or(true)),
        underline: props.underline.is_some(),
        strike: props.strike.as_ref().is_some_and(|s| s.value.unwrap_or(true)),
        ..Default::default()
    }
}

/// Splits run text into spans, keeping page breaks unformatted.
pub(crate) fn spans_for(text: &str, emphasis: Emphasis) -> Vec<Span> {
    let mut spans = Vec::new();
    for (i, part) in text.split(PAGE_BREAK).enumerate() {
        if i > 0 {
            spans.push(Span::plain(PAGE_BREAK));
        }
        if !part.is_empty() {
            spans.push(Span {
                text: part.to_string(),
                emphasis,
                anchor: None,
            });
        }
    }
    spans
}

/// Merges neighbouring spans that carry identical formatting.
pub(crate) fn merge(spans: Vec<Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if last.emphasis == span.emphasis && last.anchor == span.anchor => {
                last.text.push_str(&span.text);
            }
            _ => merged.push(span),
        }
    }
    merged
}

fn split_outer_whitespace(text: &str) -> (&str, &str, &str) {
    let is_pad = |c: char| c.is_whitespace() && c != '\n';
    let core = text.trim_start_matches(is_pad);
    let lead = &text[..text.len() - core.len()];
    let core_trimmed = core.trim_end_matches(is_pad);
    let trail = &core[core_trimmed.len()..];
    (lead, core_trimmed, trail)
}

/// Wraps `text` in `open`/`close` without enclosing outer whitespace.
///
/// Multi-line text is wrapped line by line so markers never span a newline.
pub(crate) fn wrap(text: &str, open: &str, close: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let (lead, core, trail) = split_outer_whitespace(text);
    let body = if core.contains('\n') {
        core.split('\n')
            .map(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return line.to_string();
                }
                let start = line.len() - line.trim_start().len();
                let end = line.trim_end().len();
                format!(
                    "{}{}{}{}{}",
                    &line[..start],
                    open,
                    trimmed,
                    close,
                    &line[end..]
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        format!("{}{}{}", open, core.trim(), close)
    };

    format!("{}{}{}", lead, body, trail)
}

/// Renders spans to Markdown with inline HTML where Markdown has no syntax.
pub(crate) fn render(spans: &[Span], context: &ConversionContext<'_>) -> String {
    let mut out = String::new();

    for span in spans {
        if let Some(anchor) = &span.anchor {
            out.push_str(&format!("<a id=\"{}\"></a>", escape_html_attr(anchor)));
        }

        let e = span.emphasis;
        let mut text = span.text.clone();

        if e.deleted {
            text = wrap(&text, "~~", "~~");
        }
        if e.inserted {
            text = wrap(&text, "<ins>", "</ins>");
        }
        if e.underline && !e.inserted && context.html_underline() {
            text = wrap(&text, "<u>", "</u>");
        }
        if e.strike && !e.deleted {
            text = if context.html_strikethrough() {
                wrap(&text, "<s>", "</s>")
            } else {
                wrap(&text, "~~", "~~")
            };
        }
        text = match (e.bold, e.italic) {
            (true, true) => wrap(&text, "<strong><em>", "</em></strong>"),
            (true, false) => wrap(&text, "<strong>", "</strong>"),
            (false, true) => wrap(&text, "<em>", "</em>"),
            (false, false) => text,
        };

        out.push_str(&text);
    }

    out
}
