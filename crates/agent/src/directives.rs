//! Parser for the bracketed directive tags the generator embeds in its
//! answers (`[TAG: payload]`). A tiny fixed grammar instead of ad hoc
//! pattern matching: each tag is extracted at most once, in a fixed order,
//! and stripped from the narrative as it is found.

/// The closed set of directive tags, in extraction order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `[ID: X]`: which catalog document the answer actually addresses.
    Id,
    /// `[OPCIONES: a | b | c]`: short follow-up phrases.
    Options,
    /// `[APLICA: SI|NO]`: whether the summary card should be shown.
    Applies,
    /// `[DURACION: ...]`: case-specific duration for the side card.
    Duration,
    /// `[ACREDITACION: ...]`: case-specific documentation for the side card.
    Accreditation,
}

impl Directive {
    pub const EXTRACTION_ORDER: [Directive; 5] = [
        Directive::Id,
        Directive::Options,
        Directive::Applies,
        Directive::Duration,
        Directive::Accreditation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Options => "OPCIONES",
            Self::Applies => "APLICA",
            Self::Duration => "DURACION",
            Self::Accreditation => "ACREDITACION",
        }
    }
}

/// Extracted payloads; `None`/empty means the tag was absent and the
/// document-derived default applies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectiveSet {
    pub id: Option<String>,
    pub options: Vec<String>,
    pub applies: Option<bool>,
    pub duration: Option<String>,
    pub accreditation: Option<String>,
}

/// Parses one generated response. Returns the narrative with all recognized
/// tags stripped, plus the extracted payloads.
pub fn parse(text: &str) -> (String, DirectiveSet) {
    let mut narrative = text.to_owned();
    let mut set = DirectiveSet::default();

    for directive in Directive::EXTRACTION_ORDER {
        let Some(payload) = extract(&mut narrative, directive) else {
            continue;
        };
        match directive {
            Directive::Id => set.id = Some(payload),
            Directive::Options => {
                set.options = payload
                    .split('|')
                    .map(|option| option.trim().to_owned())
                    .filter(|option| !option.is_empty())
                    .collect();
            }
            Directive::Applies => set.applies = Some(payload.eq_ignore_ascii_case("si")),
            Directive::Duration => set.duration = Some(payload),
            Directive::Accreditation => set.accreditation = Some(payload),
        }
    }

    (narrative.trim().to_owned(), set)
}

/// Removes the first `[LABEL: payload]` occurrence and returns the trimmed
/// payload. The payload runs to the first `]`.
fn extract(text: &mut String, directive: Directive) -> Option<String> {
    let opener = format!("[{}:", directive.label());
    let start = text.find(&opener)?;
    let payload_start = start + opener.len();
    let payload_len = text[payload_start..].find(']')?;
    let payload = text[payload_start..payload_start + payload_len].trim().to_owned();
    text.replace_range(start..payload_start + payload_len + 1, "");
    Some(payload)
}

#[cfg(test)]
mod tests {
    use super::{parse, DirectiveSet};

    #[test]
    fn full_tag_set_is_extracted_and_stripped() {
        let raw = "[ID: K] Corresponde el **tiempo indispensable**.\n\
                   [DURACION: Tiempo indispensable]\n\
                   [ACREDITACION: Justificante del especialista]\n\
                   [APLICA: SI]\n\
                   [OPCIONES: Sedación | Urgencias | Segundo grado]";

        let (narrative, set) = parse(raw);
        assert_eq!(set.id.as_deref(), Some("K"));
        assert_eq!(set.options, vec!["Sedación", "Urgencias", "Segundo grado"]);
        assert_eq!(set.applies, Some(true));
        assert_eq!(set.duration.as_deref(), Some("Tiempo indispensable"));
        assert_eq!(set.accreditation.as_deref(), Some("Justificante del especialista"));
        assert!(!narrative.contains('['));
        assert!(narrative.contains("tiempo indispensable"));
    }

    #[test]
    fn absent_tags_leave_defaults() {
        let (narrative, set) = parse("Texto sin etiquetas.");
        assert_eq!(narrative, "Texto sin etiquetas.");
        assert_eq!(set, DirectiveSet::default());
        assert!(set.applies.is_none());
        assert!(set.options.is_empty());
    }

    #[test]
    fn applies_no_hides_the_card() {
        let (_, set) = parse("No corresponde permiso. [APLICA: NO]");
        assert_eq!(set.applies, Some(false));
    }

    #[test]
    fn unterminated_tag_is_left_in_place() {
        let (narrative, set) = parse("[ID: K sin cierre");
        assert_eq!(set.id, None);
        assert_eq!(narrative, "[ID: K sin cierre");
    }

    #[test]
    fn only_first_occurrence_of_a_tag_is_consumed() {
        let (narrative, set) = parse("[ID: A] texto [ID: B]");
        assert_eq!(set.id.as_deref(), Some("A"));
        assert!(narrative.contains("[ID: B]"));
    }
}
