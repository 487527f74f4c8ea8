use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Single-letter identifier of one Art. 11 leave category.
///
/// Intent codes produced by the semantic analyzer map 1:1 onto these, so the
/// enum is closed: a code with no catalog document simply never retrieves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PermitCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
}

impl PermitCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::I => "I",
            Self::J => "J",
            Self::K => "K",
            Self::L => "L",
            Self::M => "M",
            Self::N => "N",
        }
    }
}

impl fmt::Display for PermitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PermitCode {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "E" => Ok(Self::E),
            "F" => Ok(Self::F),
            "G" => Ok(Self::G),
            "H" => Ok(Self::H),
            "I" => Ok(Self::I),
            "J" => Ok(Self::J),
            "K" => Ok(Self::K),
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "N" => Ok(Self::N),
            other => Err(CatalogError::UnknownCode(other.to_owned())),
        }
    }
}

/// Staff regime the catalog belongs to. Each variant carries its own statute
/// reference; the narrative rules that depend on it live in the agent crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Funcionario,
    Laboral,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Funcionario => "FUNCIONARIO",
            Self::Laboral => "LABORAL",
        }
    }

    /// Legal source the narrative must cite.
    pub fn statute(&self) -> &'static str {
        match self {
            Self::Funcionario => "Acuerdo de Personal Funcionario",
            Self::Laboral => "Convenio Colectivo del Personal Laboral",
        }
    }

    pub fn statute_label(&self) -> &'static str {
        match self {
            Self::Funcionario => "ACUERDO",
            Self::Laboral => "CONVENIO",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "funcionario" => Ok(Self::Funcionario),
            "laboral" => Ok(Self::Laboral),
            other => Err(CatalogError::UnknownRole(other.to_owned())),
        }
    }
}

/// The "ten second" summary shown next to every answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitSummary {
    /// What the employee is entitled to, in one line.
    pub entitlement: String,
    /// Which situations the permit covers.
    pub coverage: String,
    /// How the situation is proven.
    pub proof: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// One leave category of the Art. 11 catalog. Immutable after load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub id: PermitCode,
    pub letter: String,
    pub title: String,
    pub summary: PermitSummary,
    pub detailed_duration: String,
    pub beneficiaries: String,
    pub conditions: String,
    pub required_documentation: String,
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown permit code `{0}`")]
    UnknownCode(String),
    #[error("unknown staff role `{0}` (expected funcionario|laboral)")]
    UnknownRole(String),
    #[error("duplicate permit id `{0}` in catalog")]
    DuplicateId(PermitCode),
    #[error("duplicate permit letter `{0}` in catalog")]
    DuplicateLetter(String),
    #[error("catalog payload could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ordered, read-only collection of policy documents for one role, with O(1)
/// id and letter lookup. Catalog order is the tie-breaker for scored search.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    documents: Vec<PolicyDocument>,
    by_id: HashMap<PermitCode, usize>,
    by_letter: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_documents(documents: Vec<PolicyDocument>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(documents.len());
        let mut by_letter = HashMap::with_capacity(documents.len());

        for (index, document) in documents.iter().enumerate() {
            if by_id.insert(document.id, index).is_some() {
                return Err(CatalogError::DuplicateId(document.id));
            }
            let letter_key = document.letter.to_lowercase();
            if by_letter.insert(letter_key, index).is_some() {
                return Err(CatalogError::DuplicateLetter(document.letter.clone()));
            }
        }

        Ok(Self { documents, by_id, by_letter })
    }

    pub fn from_json(payload: &str) -> Result<Self, CatalogError> {
        let documents: Vec<PolicyDocument> = serde_json::from_str(payload)?;
        Self::from_documents(documents)
    }

    pub fn by_id(&self, code: PermitCode) -> Option<&PolicyDocument> {
        self.by_id.get(&code).map(|index| &self.documents[*index])
    }

    /// Case-insensitive exact match against a document's letter or id.
    pub fn by_letter_or_id(&self, needle: &str) -> Option<&PolicyDocument> {
        let lowered = needle.to_lowercase();
        if let Some(index) = self.by_letter.get(&lowered) {
            return Some(&self.documents[*index]);
        }
        self.documents.iter().find(|document| document.id.as_str().to_lowercase() == lowered)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PolicyDocument> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, PermitCode, PolicyDocument, Role};
    use crate::fixtures;

    fn duplicate_of(document: &PolicyDocument) -> PolicyDocument {
        document.clone()
    }

    #[test]
    fn permit_code_round_trips_through_str() {
        for raw in ["A", "k", " m "] {
            let code: PermitCode = raw.parse().expect("letter should parse");
            assert_eq!(code.as_str(), raw.trim().to_ascii_uppercase());
        }
        assert!("Z".parse::<PermitCode>().is_err());
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let mut documents: Vec<_> = fixtures::demo_catalog(Role::Funcionario).iter().cloned().collect();
        let clone = duplicate_of(&documents[0]);
        documents.push(clone);

        assert!(matches!(
            Catalog::from_documents(documents),
            Err(CatalogError::DuplicateId(PermitCode::A))
        ));
    }

    #[test]
    fn letter_lookup_is_case_insensitive() {
        let catalog = fixtures::demo_catalog(Role::Laboral);
        let document = catalog.by_letter_or_id("m").expect("letter m should resolve");
        assert_eq!(document.id, PermitCode::M);
    }

    #[test]
    fn role_parses_and_labels() {
        let role: Role = "Funcionario".parse().expect("role should parse");
        assert_eq!(role.label(), "FUNCIONARIO");
        assert_eq!(role.statute_label(), "ACUERDO");
        assert!("becario".parse::<Role>().is_err());
    }
}
