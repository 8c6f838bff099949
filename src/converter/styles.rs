//! Style sheet - resolves `basedOn` inheritance and layers formatting.

use rs_docx::formatting::{CharacterProperty, ParagraphProperty};
use rs_docx::styles::{Style, Styles};
use std::collections::HashMap;

/// Index over the document's style definitions.
pub struct StyleSheet<'a> {
    styles: &'a Styles<'a>,
    by_id: HashMap<&'a str, &'a Style<'a>>,
}

impl<'a> StyleSheet<'a> {
    pub fn new(styles: &'a Styles<'a>) -> Self {
        let by_id = styles
            .styles
            .iter()
            .map(|style| (style.style_id.as_ref(), style))
            .collect();
        Self { styles, by_id }
    }

    /// Style ids from the root ancestor down to `style_id` itself.
    ///
    /// Stops at unknown ids and at the first repeated id.
    fn lineage(&self, style_id: &str) -> Vec<&'a Style<'a>> {
        let mut chain: Vec<&'a Style<'a>> = Vec::new();
        let mut next = Some(style_id);

        while let Some(id) = next {
            let Some(style) = self.by_id.get(id).copied() else {
                break;
            };
            if chain.iter().any(|seen| seen.style_id == style.style_id) {
                break;
            }
            chain.push(style);
            next = style.base.as_ref().map(|b| b.value.as_ref());
        }

        chain.reverse();
        chain
    }

    /// Effective run formatting.
    ///
    /// Layers, lowest priority first: document defaults, the paragraph style
    /// chain, the character style chain, then direct run formatting.
    pub fn run_property(
        &self,
        direct: Option<&CharacterProperty<'a>>,
        run_style_id: Option<&str>,
        para_style_id: Option<&str>,
    ) -> CharacterProperty<'a> {
        let mut merged = CharacterProperty::default();

        if let Some(defaults) = &self.styles.default {
            if let Some(r_pr) = &defaults.character.inner {
                overlay_character(&mut merged, r_pr);
            }
        }

        for style_id in [para_style_id, run_style_id].into_iter().flatten() {
            for style in self.lineage(style_id) {
                if let Some(r_pr) = &style.character {
                    overlay_character(&mut merged, r_pr);
                }
            }
        }

        if let Some(direct) = direct {
            overlay_character(&mut merged, direct);
        }

        merged
    }

    /// Effective paragraph formatting: defaults, style chain, direct.
    pub fn paragraph_property(
        &self,
        direct: Option<&ParagraphProperty<'a>>,
        para_style_id: Option<&str>,
    ) -> ParagraphProperty<'a> {
        let mut merged = ParagraphProperty::default();

        if let Some(defaults) = &self.styles.default {
            if let Some(p_pr) = &defaults.paragraph.inner {
                overlay_paragraph(&mut merged, p_pr);
            }
        }

        if let Some(style_id) = para_style_id {
            for style in self.lineage(style_id) {
                if let Some(p_pr) = &style.paragraph {
                    overlay_paragraph(&mut merged, p_pr);
                }
            }
        }

        if let Some(direct) = direct {
            overlay_paragraph(&mut merged, direct);
        }

        merged
    }
}

fn overlay_character<'a>(target: &mut CharacterProperty<'a>, top: &CharacterProperty<'a>) {
    if top.bold.is_some() {
        target.bold = top.bold.clone();
    }
    if top.italics.is_some() {
        target.italics = top.italics.clone();
    }
    if top.strike.is_some() {
        target.strike = top.strike.clone();
    }
    if top.underline.is_some() {
        target.underline = top.underline.clone();
    }
}

fn overlay_paragraph<'a>(target: &mut ParagraphProperty<'a>, top: &ParagraphProperty<'a>) {
    if top.justification.is_some() {
        target.justification = top.justification.clone();
    }
    if top.numbering.is_some() {
        target.numbering = top.numbering.clone();
    }
    if top.style_id.is_some() {
        target.style_id = top.style_id.clone();
    }
}
