//! Paragraph converter - handles paragraph elements and their structure.

use super::inline::{self, FieldTracker, Span};
use super::ConversionContext;
use crate::render::{escape_html_attr, escape_link_destination, escape_link_text};
use crate::Result;
use rs_docx::document::{BodyContent, Hyperlink, Paragraph, ParagraphContent};
use rs_docx::formatting::JustificationVal;

/// Converter for Paragraph elements.
pub struct ParagraphConverter;

impl ParagraphConverter {
    /// Converts a Paragraph to Markdown.
    ///
    /// Returns an empty string for paragraphs with no visible content.
    pub fn convert<'a>(
        para: &Paragraph<'a>,
        context: &mut ConversionContext<'a>,
    ) -> Result<String> {
        let mut fields = FieldTracker::default();
        let spans = inline::merge(Self::collect_spans(para, context, &mut fields)?);

        // Bookmarks before any text become anchors on their own line.
        let leading = spans
            .iter()
            .take_while(|s| s.text.is_empty() && s.anchor.is_some())
            .count();
        let anchor_tags: String = spans[..leading]
            .iter()
            .filter_map(|s| s.anchor.as_deref())
            .map(|name| format!("<a id=\"{}\"></a>", escape_html_attr(name)))
            .collect();

        let text = inline::render(&spans[leading..], context);

        let is_empty = if context.preserve_whitespace() {
            text.is_empty()
        } else {
            text.trim().is_empty()
        };
        if is_empty {
            return Ok(anchor_tags);
        }

        let formatted = Self::apply_paragraph_formatting(para, text, context);
        if formatted.is_empty() || anchor_tags.is_empty() {
            Ok(formatted)
        } else {
            Ok(format!("{}\n{}", anchor_tags, formatted))
        }
    }

    fn collect_spans<'a>(
        para: &Paragraph<'a>,
        context: &mut ConversionContext<'a>,
        fields: &mut FieldTracker,
    ) -> Result<Vec<Span>> {
        let mut spans = Vec::new();
        let para_style_id = para
            .property
            .as_ref()
            .and_then(|p| p.style_id.as_ref())
            .map(|s| s.value.as_ref());

        for content in &para.content {
            match content {
                ParagraphContent::Run(run) => {
                    let visible = fields.visible(run);
                    if visible.content.is_empty() {
                        continue;
                    }
                    let text = inline::run_text(&visible, context);
                    if !text.is_empty() {
                        let emphasis = inline::run_emphasis(&visible, context, para_style_id);
                        spans.extend(inline::spans_for(&text, emphasis));
                    }
                }
                ParagraphContent::Link(link) => {
                    let markdown = Self::convert_hyperlink(link, context, para_style_id);
                    if !markdown.is_empty() {
                        spans.push(Span::plain(markdown));
                    }
                }
                ParagraphContent::BookmarkStart(bookmark) => {
                    if let Some(name) = &bookmark.name {
                        spans.push(Span::anchor(name.to_string()));
                    }
                }
                ParagraphContent::SDT(sdt) => {
                    if let Some(sdt_content) = &sdt.content {
                        for child in &sdt_content.content {
                            if let BodyContent::Paragraph(inner) = child {
                                spans.extend(Self::collect_spans(inner, context, fields)?);
                            }
                        }
                    }
                }
                ParagraphContent::Insertion(ins) => {
                    for run in &ins.runs {
                        let text = inline::run_text(run, context);
                        if text.is_empty() {
                            continue;
                        }
                        let mut emphasis = inline::run_emphasis(run, context, para_style_id);
                        emphasis.inserted = true;
                        spans.extend(inline::spans_for(&text, emphasis));
                    }
                }
                ParagraphContent::Deletion(del) => {
                    let text = inline::deleted_text(del);
                    if !text.is_empty() {
                        let mut span = Span::plain(text);
                        span.emphasis.deleted = true;
                        spans.push(span);
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Applies heading, list and alignment formatting to rendered text.
    fn apply_paragraph_formatting<'a>(
        para: &Paragraph<'a>,
        text: String,
        context: &mut ConversionContext<'a>,
    ) -> String {
        let para_style_id = para
            .property
            .as_ref()
            .and_then(|p| p.style_id.as_ref())
            .map(|s| s.value.as_ref());
        let props = context.paragraph_property(para.property.as_ref(), para_style_id);

        let mut prefix = String::new();
        let mut is_heading = false;

        if let Some(style) = &props.style_id {
            if let Some(level) = context.localization().heading_level(&style.value) {
                if text.trim().is_empty() {
                    return String::new();
                }
                prefix.push_str(&"#".repeat(level));
                prefix.push(' ');
                is_heading = true;
            }
        }

        if let Some(num_pr) = &props.numbering {
            if let (Some(num_id), Some(ilvl)) = (&num_pr.id, &num_pr.level) {
                let num_id = num_id.value as i32;
                let ilvl = ilvl.value as i32;
                let marker = context.next_list_marker(num_id, ilvl);

                if let Some(heading) = context.localization().heading_for_marker(&marker) {
                    prefix = heading;
                    prefix.push(' ');
                    is_heading = true;
                } else if is_heading {
                    if !marker.is_empty() {
                        prefix.push_str(&marker);
                        prefix.push(' ');
                    }
                } else {
                    prefix.push_str(&"  ".repeat(context.list_indent(num_id, ilvl)));
                    if !marker.is_empty() {
                        prefix.push_str(&marker);
                        prefix.push(' ');
                    }
                }
            }
        }

        let body = if context.preserve_whitespace() {
            text.as_str()
        } else {
            text.trim()
        };
        let line = format!("{}{}", prefix, body);

        if is_heading {
            return line;
        }
        match props.justification.as_ref().map(|jc| &jc.value) {
            Some(JustificationVal::Center) => {
                format!("<div style=\"text-align: center;\">{}</div>", line)
            }
            Some(JustificationVal::Right) => {
                format!("<div style=\"text-align: right;\">{}</div>", line)
            }
            _ => line,
        }
    }

    /// Converts a hyperlink to Markdown link syntax.
    fn convert_hyperlink<'a>(
        link: &Hyperlink<'a>,
        context: &mut ConversionContext<'a>,
        para_style_id: Option<&str>,
    ) -> String {
        let mut fields = FieldTracker::default();
        let mut spans = Vec::new();
        for run in &link.content {
            let visible = fields.visible(run);
            let text = inline::run_text(&visible, context);
            if !text.is_empty() {
                let emphasis = inline::run_emphasis(&visible, context, para_style_id);
                spans.extend(inline::spans_for(&text, emphasis));
            }
        }
        let label = inline::render(&inline::merge(spans), context);

        let url = if let Some(anchor) = &link.anchor {
            format!("#{}", anchor)
        } else if let Some(id) = &link.id {
            context
                .relationship_target(id.as_ref())
                .map(str::to_owned)
                .unwrap_or_else(|| "#".to_string())
        } else {
            "#".to_string()
        };

        if label.is_empty() {
            url
        } else {
            format!(
                "[{}]({})",
                escape_link_text(&label),
                escape_link_destination(&url)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::MediaExtractor;
    use crate::{ConvertOptions, Language};
    use rs_docx::document::{BookmarkStart, Run, RunContent, Text};
    use rs_docx::formatting::{ParagraphProperty, ParagraphStyleId};
    use rs_docx::Docx;
    use std::borrow::Cow;

    fn text_run(text: &'static str) -> Run<'static> {
        let mut run = Run::default();
        run.content.push(RunContent::Text(Text {
            text: text.into(),
            ..Default::default()
        }));
        run
    }

    fn styled(style: &'static str) -> Paragraph<'static> {
        let mut para = Paragraph::default();
        para.property = Some(ParagraphProperty {
            style_id: Some(ParagraphStyleId {
                value: style.into(),
            }),
            ..Default::default()
        });
        para
    }

    fn bookmark(name: &'static str) -> ParagraphContent<'static> {
        ParagraphContent::BookmarkStart(BookmarkStart {
            name: Some(Cow::Borrowed(name)),
            ..Default::default()
        })
    }

    fn convert_with(docx: &Docx<'_>, options: &ConvertOptions, para: &Paragraph<'_>) -> String {
        let mut context = ConversionContext::new(docx, options, MediaExtractor::skip());
        ParagraphConverter::convert(para, &mut context).expect("Conversion failed")
    }

    fn convert(para: &Paragraph<'_>) -> String {
        convert_with(&Docx::default(), &ConvertOptions::default(), para)
    }

    #[test]
    fn test_toc_anchor_link() {
        let mut link = Hyperlink {
            anchor: Some(Cow::Borrowed("_Toc123456789")),
            ..Default::default()
        };
        link.content.push(text_run("Introduction"));

        let mut para = Paragraph::default();
        para.content.push(ParagraphContent::Link(link));

        assert_eq!(convert(&para), "[Introduction](#_Toc123456789)");
    }

    #[test]
    fn test_link_without_text_is_bare_url() {
        let link = Hyperlink {
            anchor: Some(Cow::Borrowed("target")),
            ..Default::default()
        };
        let mut para = Paragraph::default();
        para.content.push(ParagraphContent::Link(link));

        assert_eq!(convert(&para), "#target");
    }

    #[test]
    fn test_link_text_and_destination_are_escaped() {
        let mut link = Hyperlink {
            anchor: Some(Cow::Borrowed("my anchor")),
            ..Default::default()
        };
        link.content.push(text_run("see [1]"));
        let mut para = Paragraph::default();
        para.content.push(ParagraphContent::Link(link));

        assert_eq!(convert(&para), "[see \\[1\\]](#my\\ anchor)");
    }

    #[test]
    fn test_toc_anchor_target() {
        let mut para = Paragraph::default();
        para.content.push(bookmark("_Toc123456789"));
        para.content.push(ParagraphContent::Run(text_run("Chapter 1")));

        assert_eq!(convert(&para), "<a id=\"_Toc123456789\"></a>\nChapter 1");
    }

    #[test]
    fn test_anchor_placement_header() {
        let mut para = styled("Heading1");
        para.content.push(bookmark("header_anchor"));
        para.content.push(ParagraphContent::Run(text_run("Header Title")));

        assert_eq!(convert(&para), "<a id=\"header_anchor\"></a>\n# Header Title");
    }

    #[test]
    fn test_adjacent_anchors() {
        let mut para = Paragraph::default();
        para.content.push(bookmark("anchor1"));
        para.content.push(bookmark("anchor2"));
        para.content.push(ParagraphContent::Run(text_run("Content")));

        assert_eq!(
            convert(&para),
            "<a id=\"anchor1\"></a><a id=\"anchor2\"></a>\nContent"
        );
    }

    #[test]
    fn test_anchor_only_paragraph_keeps_anchor() {
        let mut para = Paragraph::default();
        para.content.push(bookmark("a\"b"));

        assert_eq!(convert(&para), "<a id=\"a&quot;b\"></a>");
    }

    #[test]
    fn test_empty_heading_is_dropped() {
        let mut para = styled("Heading2");
        para.content.push(ParagraphContent::Run(text_run("   ")));

        assert_eq!(convert(&para), "");
    }

    #[test]
    fn test_korean_heading_style_needs_korean_language() {
        let mut para = styled("제목2");
        para.content.push(ParagraphContent::Run(text_run("개요")));

        assert_eq!(convert(&para), "개요");

        let options = ConvertOptions {
            language: Language::Korean,
            ..Default::default()
        };
        assert_eq!(convert_with(&Docx::default(), &options, &para), "## 개요");
    }

    #[test]
    fn test_centered_paragraph_is_wrapped_in_div() {
        use hard_xml::XmlRead;

        let para = Paragraph::from_str(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Middle</w:t></w:r></w:p>"#,
        )
        .expect("paragraph xml");

        assert_eq!(
            convert(&para),
            "<div style=\"text-align: center;\">Middle</div>"
        );
    }

    #[test]
    fn test_run_formatting_is_rendered() {
        use hard_xml::XmlRead;

        let para = Paragraph::from_str(
            r#"<w:p>
                <w:r><w:rPr><w:b/></w:rPr><w:t>Bold </w:t></w:r>
                <w:r><w:rPr><w:i/></w:rPr><w:t>italic</w:t></w:r>
                <w:r><w:rPr><w:strike/></w:rPr><w:t>gone</w:t></w:r>
            </w:p>"#,
        )
        .expect("paragraph xml");

        assert_eq!(
            convert(&para),
            "<strong>Bold</strong> <em>italic</em>~~gone~~"
        );
    }

    #[test]
    fn test_preserve_whitespace_option() {
        let mut para = Paragraph::default();
        para.content
            .push(ParagraphContent::Run(text_run("  Keep Surrounding Spaces  ")));

        let options = ConvertOptions {
            preserve_whitespace: true,
            ..Default::default()
        };
        assert_eq!(
            convert_with(&Docx::default(), &options, &para),
            "  Keep Surrounding Spaces  "
        );
        assert_eq!(convert(&para), "Keep Surrounding Spaces");
    }

    #[test]
    fn test_deep_list_indentation_not_clamped() {
        use rs_docx::document::{
            AbstractNum, AbstractNumId, Level, LevelStart, LevelText, Num, NumFmt, Numbering,
        };

        let mut para = Paragraph::default();
        para.property = Some(ParagraphProperty {
            numbering: Some(rs_docx::formatting::NumberingProperty::from((
                2isize, 3isize,
            ))),
            ..Default::default()
        });
        para.content.push(ParagraphContent::Run(text_run("Deep Item")));

        let abstract_num = AbstractNum {
            abstract_num_id: Some(1),
            levels: vec![Level {
                i_level: Some(3),
                start: Some(LevelStart { value: Some(1) }),
                number_format: Some(NumFmt {
                    value: Cow::Borrowed("decimal"),
                }),
                level_text: Some(LevelText {
                    value: Some(Cow::Borrowed("%4.")),
                }),
                ..Default::default()
            }],
            ..Default::default()
        };
        let num = Num {
            num_id: Some(2),
            abstract_num_id: Some(AbstractNumId { value: Some(1) }),
            ..Default::default()
        };
        let docx = Docx {
            numbering: Some(Numbering {
                abstract_numberings: vec![abstract_num],
                numberings: vec![num],
            }),
            ..Default::default()
        };

        assert_eq!(
            convert_with(&docx, &ConvertOptions::default(), &para),
            "      1. Deep Item"
        );
    }

    #[test]
    fn test_empty_list_marker_adds_no_space() {
        use rs_docx::document::{AbstractNum, AbstractNumId, Level, LevelText, Num, NumFmt, Numbering};

        let silent = |ilvl: isize| Level {
            i_level: Some(ilvl as _),
            number_format: Some(NumFmt {
                value: Cow::Borrowed("none"),
            }),
            level_text: Some(LevelText {
                value: Some(Cow::Borrowed("")),
            }),
            ..Default::default()
        };
        let docx = Docx {
            numbering: Some(Numbering {
                abstract_numberings: vec![AbstractNum {
                    abstract_num_id: Some(1),
                    levels: vec![silent(0), silent(1)],
                    ..Default::default()
                }],
                numberings: vec![Num {
                    num_id: Some(3),
                    abstract_num_id: Some(AbstractNumId { value: Some(1) }),
                    ..Default::default()
                }],
            }),
            ..Default::default()
        };
        let numbered = |para: Paragraph<'static>, ilvl: isize| {
            let mut para = para;
            let mut property = para.property.take().unwrap_or_default();
            property.numbering = Some(rs_docx::formatting::NumberingProperty::from((3isize, ilvl)));
            para.property = Some(property);
            para
        };

        let mut heading = numbered(styled("Heading1"), 0);
        heading.content.push(ParagraphContent::Run(text_run("Title")));
        let mut item = numbered(Paragraph::default(), 1);
        item.content.push(ParagraphContent::Run(text_run("Nested")));

        let options = ConvertOptions::default();
        assert_eq!(convert_with(&docx, &options, &heading), "# Title");
        assert_eq!(convert_with(&docx, &options, &item), "  Nested");
    }

    #[test]
    fn test_korean_article_marker_becomes_heading() {
        use rs_docx::document::{
            AbstractNum, AbstractNumId, Level, LevelStart, LevelText, Num, NumFmt, Numbering,
        };

        let mut para = Paragraph::default();
        para.property = Some(ParagraphProperty {
            numbering: Some(rs_docx::formatting::NumberingProperty::from((
                7isize, 0isize,
            ))),
            ..Default::default()
        });
        para.content.push(ParagraphContent::Run(text_run("(목적)")));

        let docx = Docx {
            numbering: Some(Numbering {
                abstract_numberings: vec![AbstractNum {
                    abstract_num_id: Some(4),
                    levels: vec![Level {
                        i_level: Some(0),
                        start: Some(LevelStart { value: Some(1) }),
                        number_format: Some(NumFmt {
                            value: Cow::Borrowed("decimal"),
                        }),
                        level_text: Some(LevelText {
                            value: Some(Cow::Borrowed("제%1조")),
                        }),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                numberings: vec![Num {
                    num_id: Some(7),
                    abstract_num_id: Some(AbstractNumId { value: Some(4) }),
                    ..Default::default()
                }],
            }),
            ..Default::default()
        };
        let options = ConvertOptions {
            language: Language::Korean,
            ..Default::default()
        };

        assert_eq!(convert_with(&docx, &options, &para), "### 제1조 (목적)");
    }

    #[test]
    fn test_duplicate_footnote_references_reuse_index() {
        use rs_docx::document::{FootNote, FootNotes, FootnoteReference};

        let mut note_para = Paragraph::default();
        note_para
            .content
            .push(ParagraphContent::Run(text_run("Same footnote text")));

        let docx = Docx {
            footnotes: Some(FootNotes {
                content: vec![FootNote {
                    id: Some(5),
                    content: vec![BodyContent::Paragraph(note_para)],
                    ..Default::default()
                }],
            }),
            ..Default::default()
        };

        let mut para = Paragraph::default();
        for _ in 0..2 {
            let mut run = Run::default();
            run.content
                .push(RunContent::FootnoteReference(FootnoteReference {
                    id: Some(Cow::Borrowed("5")),
                    ..Default::default()
                }));
            para.content.push(ParagraphContent::Run(run));
        }

        let options = ConvertOptions::default();
        let mut context = ConversionContext::new(&docx, &options, MediaExtractor::skip());
        let md = ParagraphConverter::convert(&para, &mut context).expect("Conversion failed");
        assert_eq!(md, "[^1][^1]");
        assert_eq!(context.notes().footnote_count(), 1);
    }

    #[test]
    fn test_duplicate_comment_references_reuse_definition() {
        use rs_docx::document::{Comment, CommentReference, Comments};

        let mut comment_para = Paragraph::default();
        comment_para
            .content
            .push(ParagraphContent::Run(text_run("Shared comment")));

        let docx = Docx {
            comments: Some(Comments {
                comments: vec![Comment {
                    id: Some(9),
                    author: Cow::Borrowed("tester"),
                    content: comment_para,
                }],
            }),
            ..Default::default()
        };

        let mut para = Paragraph::default();
        for _ in 0..2 {
            let mut run = Run::default();
            run.content
                .push(RunContent::CommentReference(CommentReference {
                    id: Some(Cow::Borrowed("9")),
                }));
            para.content.push(ParagraphContent::Run(run));
        }

        let options = ConvertOptions::default();
        let mut context = ConversionContext::new(&docx, &options, MediaExtractor::skip());
        let md = ParagraphConverter::convert(&para, &mut context).expect("Conversion failed");
        assert_eq!(md, "[^c9][^c9]");
        assert_eq!(context.notes().comment_count(), 1);
        assert_eq!(
            context.note_definitions().comments,
            vec![("9".to_string(), "Shared comment".to_string())]
        );
    }

    #[test]
    fn test_field_code_within_single_run_preserves_visible_text() {
        use hard_xml::XmlRead;

        let run = Run::from_str(
            r#"<w:r>
                <w:t>prefix </w:t>
                <w:fldChar w:fldCharType="begin"/>
                <w:instrText>PAGEREF _Ref</w:instrText>
                <w:t>hidden </w:t>
                <w:fldChar w:fldCharType="separate"/>
                <w:t>Visible</w:t>
                <w:fldChar w:fldCharType="end"/>
                <w:t> suffix</w:t>
            </w:r>"#,
        )
        .expect("Failed to parse run XML");
        let mut para = Paragraph::default();
        para.content.push(ParagraphContent::Run(run));

        assert_eq!(convert(&para), "prefix Visible suffix");
    }

    #[test]
    fn test_tracked_changes() {
        use hard_xml::XmlRead;

        let para = Paragraph::from_str(
            r#"<w:p>
                <w:r><w:t>Keep </w:t></w:r>
                <w:ins w:id="1" w:author="a"><w:r><w:t>added</w:t></w:r></w:ins>
                <w:del w:id="2" w:author="a"><w:r><w:delText>removed</w:delText></w:r></w:del>
            </w:p>"#,
        )
        .expect("paragraph xml");

        assert_eq!(convert(&para), "Keep <ins>added</ins>~~removed~~");
    }
}
