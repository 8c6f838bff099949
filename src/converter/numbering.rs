//! List numbering - counters, marker formatting and indentation.

use rs_docx::Docx;
use std::collections::HashMap;
use tracing::debug;

const MAX_LEVELS: usize = 9;

/// `w:numFmt` values this converter knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberFormat {
    Decimal,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
    Bullet,
    Ganada,
    Chosung,
    Geonodeo,
    EnclosedCircle,
    Other,
}

impl NumberFormat {
    fn parse(value: &str) -> Self {
        match value {
            "decimal" => Self::Decimal,
            "lowerLetter" => Self::LowerLetter,
            "upperLetter" => Self::UpperLetter,
            "lowerRoman" => Self::LowerRoman,
            "upperRoman" => Self::UpperRoman,
            "bullet" | "none" => Self::Bullet,
            "ganada" | "korean" | "koreanCounting" => Self::Ganada,
            "chosung" => Self::Chosung,
            "geonodeo" => Self::Geonodeo,
            "decimalEnclosedCircle" => Self::EnclosedCircle,
            _ => Self::Other,
        }
    }

    /// Formats where a bare counter reads as `N.`.
    fn takes_period(self) -> bool {
        matches!(
            self,
            Self::Decimal | Self::LowerLetter | Self::UpperLetter | Self::LowerRoman | Self::UpperRoman
        )
    }

    fn render(self, value: i32) -> String {
        const GANADA: [char; 14] = [
            '가', '나', '다', '라', '마', '바', '사', '아', '자', '차', '카', '타', '파', '하',
        ];
        const CHOSUNG: [char; 14] = [
            'ㄱ', 'ㄴ', 'ㄷ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅅ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
        ];
        const GEONODEO: [char; 14] = [
            '거', '너', '더', '러', '머', '버', '서', '어', '저', '처', '커', '터', '퍼', '허',
        ];

        let rendered = match self {
            Self::Bullet => Some("-".to_string()),
            Self::LowerLetter => latin_letter(value, b'a'),
            Self::UpperLetter => latin_letter(value, b'A'),
            Self::LowerRoman => roman(value).map(|r| r.to_lowercase()),
            Self::UpperRoman => roman(value),
            Self::Ganada => from_table(&GANADA, value),
            Self::Chosung => from_table(&CHOSUNG, value),
            Self::Geonodeo => from_table(&GEONODEO, value),
            Self::EnclosedCircle => enclosed_circle(value),
            Self::Decimal | Self::Other => None,
        };
        rendered.unwrap_or_else(|| value.to_string())
    }
}

fn latin_letter(value: i32, base: u8) -> Option<String> {
    (1..=26)
        .contains(&value)
        .then(|| char::from(base + (value - 1) as u8).to_string())
}

fn from_table(table: &[char], value: i32) -> Option<String> {
    usize::try_from(value - 1)
        .ok()
        .and_then(|idx| table.get(idx))
        .map(char::to_string)
}

fn enclosed_circle(value: i32) -> Option<String> {
    // ①..⑳ then ㉑..㊿
    let code = match value {
        1..=20 => 0x2460 + (value as u32 - 1),
        21..=35 => 0x3251 + (value as u32 - 21),
        36..=50 => 0x32B1 + (value as u32 - 36),
        _ => return None,
    };
    char::from_u32(code).map(String::from)
}

fn roman(mut value: i32) -> Option<String> {
    const TABLE: [(i32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    if value <= 0 {
        return None;
    }
    let mut out = String::new();
    for (amount, symbol) in TABLE {
        while value >= amount {
            out.push_str(symbol);
            value -= amount;
        }
    }
    Some(out)
}

#[derive(Debug, Clone)]
struct LevelDef {
    start: i32,
    format: NumberFormat,
    text: Option<String>,
}

/// Counter state shared by every numbering instance of one abstract definition.
pub struct ListTracker {
    /// numId -> abstractNumId
    instances: HashMap<i32, i32>,
    /// abstractNumId -> ilvl -> level definition
    definitions: HashMap<i32, HashMap<i32, LevelDef>>,
    /// (numId, ilvl) -> startOverride
    start_overrides: HashMap<(i32, i32), i32>,
    /// abstractNumId -> level treated as indentation zero
    base_levels: HashMap<i32, i32>,
    /// abstractNumId -> current value per level, `None` until first use
    counters: HashMap<i32, [Option<i32>; MAX_LEVELS]>,
}

impl ListTracker {
    pub fn new(docx: &Docx<'_>) -> Self {
        let mut tracker = Self {
            instances: HashMap::new(),
            definitions: HashMap::new(),
            start_overrides: HashMap::new(),
            base_levels: HashMap::new(),
            counters: HashMap::new(),
        };

        let Some(numbering) = &docx.numbering else {
            return tracker;
        };

        for abstract_num in &numbering.abstract_numberings {
            let abstract_id = abstract_num.abstract_num_id.unwrap_or(0) as i32;
            let levels = tracker.definitions.entry(abstract_id).or_default();

            for level in &abstract_num.levels {
                let ilvl = level.i_level.unwrap_or(0) as i32;
                let text = level
                    .level_text
                    .as_ref()
                    .and_then(|t| t.value.as_ref())
                    .map(|v| v.to_string());

                // Statute-style lists (제%1조) start their visual hierarchy here.
                if text
                    .as_deref()
                    .is_some_and(|t| t.contains('%') && t.contains('제') && t.contains('조'))
                {
                    tracker.base_levels.entry(abstract_id).or_insert(ilvl);
                }

                levels.insert(
                    ilvl,
                    LevelDef {
                        start: level
                            .start
                            .as_ref()
                            .and_then(|s| s.value)
                            .map(|v| v as i32)
                            .unwrap_or(1),
                        format: level
                            .number_format
                            .as_ref()
                            .map(|f| NumberFormat::parse(f.value.as_ref()))
                            .unwrap_or(NumberFormat::Decimal),
                        text,
                    },
                );
            }
        }

        for num in &numbering.numberings {
            let (Some(num_id), Some(abstract_ref)) = (num.num_id, &num.abstract_num_id) else {
                continue;
            };
            let num_id = num_id as i32;
            if let Some(abstract_id) = abstract_ref.value {
                tracker.instances.insert(num_id, abstract_id as i32);
            }
            for level_override in &num.level_overrides {
                if let (Some(ilvl), Some(start)) = (
                    level_override.i_level,
                    level_override.start_override.as_ref().and_then(|s| s.value),
                ) {
                    tracker
                        .start_overrides
                        .insert((num_id, ilvl as i32), start as i32);
                }
            }
        }

        debug!(
            instances = tracker.instances.len(),
            definitions = tracker.definitions.len(),
            "loaded numbering definitions"
        );
        tracker
    }

    /// Indentation depth of a list item, relative to its list's base level.
    pub fn indent(&self, num_id: i32, ilvl: i32) -> usize {
        let base = self
            .instances
            .get(&num_id)
            .and_then(|abstract_id| self.base_levels.get(abstract_id))
            .copied()
            .unwrap_or(0);
        (ilvl - base).max(0) as usize
    }

    fn first_value(&self, num_id: i32, ilvl: i32, level: &LevelDef) -> i32 {
        self.start_overrides
            .get(&(num_id, ilvl))
            .copied()
            .unwrap_or(level.start)
    }

    /// Advances the counter for `(num_id, ilvl)` and returns the marker text.
    pub fn next_marker(&mut self, num_id: i32, ilvl: i32) -> String {
        let Some(&abstract_id) = self.instances.get(&num_id) else {
            return "-".to_string();
        };
        let Some(levels) = self.definitions.get(&abstract_id) else {
            return "-".to_string();
        };
        let Some(level) = levels.get(&ilvl).or_else(|| {
            levels
                .iter()
                .min_by_key(|(lvl, _)| **lvl)
                .map(|(_, def)| def)
        }) else {
            return "-".to_string();
        };

        let idx = ilvl.clamp(0, MAX_LEVELS as i32 - 1) as usize;
        let first = self.first_value(num_id, ilvl, level);
        let counters = self
            .counters
            .entry(abstract_id)
            .or_insert([None; MAX_LEVELS]);
        let current = counters[idx].map_or(first, |value| value + 1);
        counters[idx] = Some(current);
        for deeper in counters.iter_mut().skip(idx + 1) {
            *deeper = None;
        }
        let counters = *counters;

        let Some(template) = &level.text else {
            let value = level.format.render(current);
            return if level.format.takes_period() {
                format!("{}.", value)
            } else {
                value
            };
        };

        let mut marker = template.clone();
        for (i, count) in counters.iter().enumerate() {
            let placeholder = format!("%{}", i + 1);
            if !marker.contains(&placeholder) {
                continue;
            }
            let def = levels.get(&(i as i32));
            let format = def.map(|def| def.format).unwrap_or(NumberFormat::Decimal);
            // An ancestor level that never appeared reads as its first value.
            let value = count.unwrap_or_else(|| match def {
                Some(def) => self.first_value(num_id, i as i32, def),
                None => 1,
            });
            marker = marker.replace(&placeholder, &format.render(value));
        }
        marker
    }
}
