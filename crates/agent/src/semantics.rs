//! Lexical query understanding: guardrail veto, subject/negation/cohabitation
//! flags, relationship-degree resolution and intent classification. All rules
//! run over the normalized query; the knowledge tables live in `permia-core`.

use permia_core::knowledge::{medical, relationship};
use permia_core::PermitCode;

use crate::text::{contains_phrase, normalize};

/// One intent code per classification rule. `Permit` codes map 1:1 onto
/// catalog documents; `Animal` is the out-of-scope veto.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    Animal,
    Permit(PermitCode),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubjectFlags {
    pub has_negation: bool,
    pub is_self: bool,
    pub is_cohabiting: bool,
}

/// Output of the analyzer. `intents` preserves first-insertion order (useful
/// for diagnostics only; retrieval re-sorts by legal precedence).
#[derive(Clone, Debug, Default)]
pub struct SemanticAnalysis {
    pub insights: Vec<String>,
    pub intents: Vec<Intent>,
    pub flags: SubjectFlags,
}

impl SemanticAnalysis {
    pub fn is_out_of_scope(&self) -> bool {
        self.intents.contains(&Intent::Animal)
    }

    pub fn has_permit(&self, code: PermitCode) -> bool {
        self.intents.contains(&Intent::Permit(code))
    }

    pub fn permit_intents(&self) -> impl Iterator<Item = PermitCode> + '_ {
        self.intents.iter().filter_map(|intent| match intent {
            Intent::Permit(code) => Some(*code),
            Intent::Animal => None,
        })
    }
}

/// Negative phrases and dissolved-bond vocabulary. A leading `no ` counts too.
const NEGATION_TERMS: &[&str] = &[
    "no estoy",
    "no es",
    "divorciado",
    "divorciada",
    "separado",
    "separada",
    "exmujer",
    "exmarido",
    "exsuegro",
    "exsuegra",
    "expareja",
];

/// First-person markers tied to personal appointments, matched on word
/// boundaries.
const SELF_PHRASES: &[&str] = &[
    "yo",
    "tengo",
    "mi cita",
    "mi ope",
    "me operan",
    "me mudo",
    "voy al medico",
    "mi medico",
    "mi dentista",
    "mi analitica",
];

const COHABITATION_TERMS: &[&str] =
    &["convivo", "empadronado", "vivimos", "mi casa", "domicilio comun"];

const DEATH_TERMS: &[&str] = &[
    "muerto",
    "fallece",
    "fallecido",
    "fallecida",
    "fallecimiento",
    "fallecer",
    "tanatorio",
    "entierro",
    "funeral",
    "muerte",
    "defuncion",
    "sepelio",
    "obito",
];

const RELOCATION_TERMS: &[&str] =
    &["muda", "mudanza", "mudo", "casa nueva", "domicilio", "traslado", "vivienda"];

const EXAM_TERMS: &[&str] = &["examen", "oposicion", "prueba oficial", "carne", "selectividad"];

const BIRTH_TERMS: &[&str] = &["embarazo", "parto", "adopcion", "prenatal", "acogimiento"];

const BREASTFEEDING_TERMS: &[&str] = &["pecho", "lactancia", "bebe", "biberon"];

const PREMATURE_TERMS: &[&str] = &["prematuro", "incubadora"];

const DEPENDENCY_TERMS: &[&str] =
    &["discapacidad", "dependencia", "guarda legal", "reduccion", "minusvalia"];

const MARRIAGE_TERMS: &[&str] = &["boda", "matrimonio", "pareja de hecho", "casarse"];

/// Ordered classification rules; a query may match several.
const INTENT_RULES: &[(&[&str], PermitCode)] = &[
    (medical::CIRUGIA_GRAVE, PermitCode::A),
    (DEATH_TERMS, PermitCode::B),
    (RELOCATION_TERMS, PermitCode::C),
    (EXAM_TERMS, PermitCode::D),
    (medical::PRUEBAS_PROPIAS, PermitCode::E),
    (BIRTH_TERMS, PermitCode::F),
    (BREASTFEEDING_TERMS, PermitCode::G),
    (PREMATURE_TERMS, PermitCode::H),
    (DEPENDENCY_TERMS, PermitCode::I),
    (medical::INVASIVO_ESPECIALISTA, PermitCode::K),
    (MARRIAGE_TERMS, PermitCode::M),
    (medical::RUTINA_FAMILIAR, PermitCode::N),
];

#[derive(Clone, Debug, Default)]
pub struct SemanticAnalyzer;

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, query: &str) -> SemanticAnalysis {
        let q = normalize(query);
        let mut insights = Vec::new();
        let mut intents: Vec<Intent> = Vec::new();

        // Absolute-priority veto: non-human dependents end the analysis.
        if relationship::ANIMAL_TERMS.iter().any(|term| q.contains(term)) {
            insights.push("out of scope: query mentions a non-human dependent".to_owned());
            return SemanticAnalysis {
                insights,
                intents: vec![Intent::Animal],
                flags: SubjectFlags::default(),
            };
        }

        let has_negation =
            NEGATION_TERMS.iter().any(|term| q.contains(term)) || q.starts_with("no ");
        if has_negation {
            insights.push("negation/rupture: possible end of affinity or denied condition".to_owned());
        }

        let is_self = SELF_PHRASES.iter().any(|phrase| contains_phrase(&q, phrase));
        insights.push(
            if is_self { "subject: the requester" } else { "subject: third party or relative" }
                .to_owned(),
        );

        let is_cohabiting = COHABITATION_TERMS.iter().any(|term| q.contains(term));
        if is_cohabiting {
            insights.push("cohabitation: accredited shared-residence claim detected".to_owned());
        }

        self.resolve_relationship(&q, has_negation, &mut insights);

        for (terms, code) in INTENT_RULES {
            if matches_lexicon(&q, terms) {
                push_unique(&mut intents, Intent::Permit(*code));
            }
        }

        // "My own specialist visit" is self-care (E) unless a major procedure
        // (A) is also in play.
        if is_self
            && intents.contains(&Intent::Permit(PermitCode::K))
            && matches_lexicon(&q, medical::PRUEBAS_PROPIAS)
            && !intents.contains(&Intent::Permit(PermitCode::A))
        {
            push_unique(&mut intents, Intent::Permit(PermitCode::E));
        }

        // Cohabiting dependents qualify broadly for care permits.
        if is_cohabiting {
            push_unique(&mut intents, Intent::Permit(PermitCode::A));
            push_unique(&mut intents, Intent::Permit(PermitCode::N));
        }

        SemanticAnalysis {
            insights,
            intents,
            flags: SubjectFlags { has_negation, is_self, is_cohabiting },
        }
    }

    /// Scans relationship terms longest-first so multi-word terms beat their
    /// substrings; only the first hit is recorded.
    fn resolve_relationship(&self, q: &str, has_negation: bool, insights: &mut Vec<String>) {
        let mut mapping: Vec<&(&str, &str)> = relationship::SEMANTIC_MAPPING.iter().collect();
        mapping.sort_by_key(|(term, _)| std::cmp::Reverse(term.len()));

        for (term, degree) in mapping {
            if q.contains(&normalize(term)) {
                if has_negation {
                    insights.push(format!(
                        "affinity at risk: `{term}` mentioned in a negation/separation context"
                    ));
                } else {
                    insights.push(format!("relationship: `{term}` resolves to {degree}"));
                }
                break;
            }
        }
    }
}

fn matches_lexicon(q: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| q.contains(&normalize(term)))
}

fn push_unique(intents: &mut Vec<Intent>, intent: Intent) {
    if !intents.contains(&intent) {
        intents.push(intent);
    }
}
