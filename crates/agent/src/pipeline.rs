//! The query pipeline: guardrail, retrieval, grounded generation with
//! credential rotation, directive post-processing and the local fallback.
//! This is the only module that owns mutable session state (the history and
//! the pool counters).

use std::sync::Arc;
use std::time::Duration;

use permia_core::{Catalog, PermitCode, PolicyDocument, Role};
use tracing::{debug, info, warn};

use crate::client::{GenerationClient, GenerationRequest};
use crate::conversation::ConversationContext;
use crate::credentials::{CredentialPool, PoolStatus};
use crate::directives;
use crate::prompt::PromptBuilder;
use crate::retrieval::ContextRetriever;
use crate::semantics::SemanticAnalyzer;

/// Fixed refusal for queries about non-human dependents.
pub const OUT_OF_SCOPE_MESSAGE: &str = "El Art. 11 de los Permisos Retribuidos del Ayuntamiento \
     de Villalbilla aplica exclusivamente a familiares humanos y convivientes. No existe permiso \
     por motivos relacionados con animales o mascotas.";

/// Fixed reformulation request when no document can be resolved.
pub const CLARIFICATION_MESSAGE: &str = "No encuentro ese permiso específico en el Art. 11. \
     ¿Podrías reformularlo o decirme el motivo (ej: médico, fallecimiento, mudanza)?";

/// Narrative served when every credential failed; the operative card next to
/// it carries the document data verbatim, so the answer stays usable.
const FALLBACK_NARRATIVE: &str = "Lo siento, el servicio de IA está saturado en todas nuestras \
     cuentas en este momento. Como delegado, te confirmo que según el Art. 11 te corresponde lo \
     indicado arriba. No olvides presentar el justificante médico correspondiente.";

const HINT_OPTIONS: &str = "Opciones de consulta adicionales:";
const HINT_NEW_QUERY: &str =
    "Para más aclaraciones o detalles específicos, se recomienda realizar una nueva consulta.";
const HINT_LOCAL_MODE: &str = "Modo Local activado por error de conexión (Saturación de API).";

/// Queries at most this many characters long are treated as continuations of
/// the previous turn when retrieval finds nothing on its own.
const CONTINUATION_MAX_LEN: usize = 4;

/// The card data accompanying a narrative: duration and documentation may be
/// case-refined by the generator, beneficiaries and conditions never are.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperativeAnswer {
    pub duration: String,
    pub beneficiaries: String,
    pub conditions: String,
    pub documentation: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub interpretation_title: String,
    pub context_id: PermitCode,
    /// Whether the summary card applies to this concrete case.
    pub show_card: bool,
    pub operative: OperativeAnswer,
    /// One-line entitlement excerpt from the resolved document.
    pub excerpt: String,
    pub narrative: String,
    pub clarification_options: Vec<String>,
    pub next_step_hint: String,
}

/// Outcome of one query. `Error` is a user-facing refusal or clarification
/// request, not a fault; faults degrade into the fallback `Success`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryResult {
    Success(Box<Answer>),
    Error { message: String },
}

/// Point-in-time diagnostics for operators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineStatus {
    pub model: String,
    pub pool: PoolStatus,
}

pub struct Assistant {
    role: Role,
    catalog: Arc<Catalog>,
    pool: Arc<CredentialPool>,
    client: Arc<dyn GenerationClient>,
    model: String,
    rotation_pause: Duration,
    analyzer: SemanticAnalyzer,
    history: ConversationContext,
}

impl Assistant {
    pub fn new(
        role: Role,
        catalog: Arc<Catalog>,
        pool: Arc<CredentialPool>,
        client: Arc<dyn GenerationClient>,
        model: impl Into<String>,
        rotation_pause: Duration,
    ) -> Self {
        Self {
            role,
            catalog,
            pool,
            client,
            model: model.into(),
            rotation_pause,
            analyzer: SemanticAnalyzer::new(),
            history: ConversationContext::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn history(&self) -> &ConversationContext {
        &self.history
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus { model: self.model.clone(), pool: self.pool.status() }
    }

    /// Answers one query against the session history.
    pub async fn process_query(&mut self, query: &str) -> QueryResult {
        self.process_query_with_context(query, None).await
    }

    /// Like [`process_query`](Self::process_query), but the caller may pin a
    /// prior context id (a clicked follow-up chip) to continue from when the
    /// query itself resolves nothing. A fresh retrieval hit always wins over
    /// the pinned context; a topic change beats a follow-up.
    pub async fn process_query_with_context(
        &mut self,
        query: &str,
        prior_context: Option<PermitCode>,
    ) -> QueryResult {
        let catalog = Arc::clone(&self.catalog);
        let trimmed = query.trim();

        let analysis = self.analyzer.analyze(trimmed);
        for insight in &analysis.insights {
            debug!(%insight, "semantic insight");
        }
        if analysis.is_out_of_scope() {
            info!("query vetoed by non-human-dependent guardrail");
            return QueryResult::Error { message: OUT_OF_SCOPE_MESSAGE.to_owned() };
        }

        let document =
            ContextRetriever::new(&catalog).retrieve(trimmed, &analysis).or_else(|| {
                // Short follow-ups ("y?", "más") stay on the previous topic;
                // anything longer that resolves nothing is a genuine miss.
                if trimmed.chars().count() <= CONTINUATION_MAX_LEN {
                    prior_context
                        .or_else(|| self.history.latest_context())
                        .and_then(|code| catalog.by_id(code))
                } else {
                    None
                }
            });
        let Some(document) = document else {
            return QueryResult::Error { message: CLARIFICATION_MESSAGE.to_owned() };
        };
        debug!(permit = %document.id, "resolved grounding document");

        let builder = PromptBuilder::new(self.role, &catalog);
        let request = GenerationRequest {
            model: self.model.clone(),
            system_instruction: builder.system_instruction(),
            prompt: builder.grounding_prompt(document, &self.history, trimmed),
        };

        let answer = match self.generate_with_rotation(&request).await {
            Some(text) => self.compose_generated(&catalog, document, &text),
            None => fallback_answer(document),
        };

        self.history.record(trimmed, &answer.narrative, answer.context_id);
        QueryResult::Success(Box::new(answer))
    }

    /// Runs one attempt per pooled credential, rotating between failures.
    /// `None` means the pool is empty or exhausted and the caller should
    /// degrade to the local fallback.
    async fn generate_with_rotation(&self, request: &GenerationRequest) -> Option<String> {
        let pool_size = self.pool.size();
        for attempt in 0..pool_size {
            let lease = self.pool.begin_attempt()?;
            match self.client.generate(&lease.credential, request).await {
                Ok(text) => return Some(text),
                Err(error) => {
                    warn!(
                        credential_index = lease.index,
                        attempt = attempt + 1,
                        %error,
                        "generation attempt failed"
                    );
                    if attempt + 1 < pool_size {
                        self.pool.rotate();
                        tokio::time::sleep(self.rotation_pause).await;
                    } else {
                        self.pool.record_exhaustion();
                    }
                }
            }
        }
        if pool_size == 0 {
            warn!("credential pool is empty; serving local fallback");
        }
        None
    }

    /// Applies the parsed directives: the `[ID: ...]` correction may swap the
    /// grounding document, `[APLICA: ...]` gates the card, duration and
    /// accreditation refinements replace the document defaults.
    fn compose_generated(
        &self,
        catalog: &Catalog,
        retrieved: &PolicyDocument,
        text: &str,
    ) -> Answer {
        let (narrative, set) = directives::parse(text);

        let document = set
            .id
            .as_deref()
            .and_then(|id| catalog.by_letter_or_id(id))
            .unwrap_or(retrieved);
        if document.id != retrieved.id {
            debug!(retrieved = %retrieved.id, corrected = %document.id, "generator corrected context id");
        }

        let next_step_hint =
            if set.options.is_empty() { HINT_NEW_QUERY } else { HINT_OPTIONS };

        Answer {
            interpretation_title: document.title.clone(),
            context_id: document.id,
            show_card: set.applies.unwrap_or(true),
            operative: OperativeAnswer {
                duration: set.duration.unwrap_or_else(|| document.summary.entitlement.clone()),
                beneficiaries: document.beneficiaries.clone(),
                conditions: document.conditions.clone(),
                documentation: set
                    .accreditation
                    .unwrap_or_else(|| document.required_documentation.clone()),
            },
            excerpt: document.summary.coverage.clone(),
            narrative,
            clarification_options: set.options,
            next_step_hint: next_step_hint.to_owned(),
        }
    }
}

/// Degraded answer built entirely from the document: no generation involved,
/// every operative field verbatim from the catalog.
fn fallback_answer(document: &PolicyDocument) -> Answer {
    Answer {
        interpretation_title: format!("(Motor Local) Sobre {}:", document.title),
        context_id: document.id,
        show_card: true,
        operative: OperativeAnswer {
            duration: document.summary.entitlement.clone(),
            beneficiaries: document.beneficiaries.clone(),
            conditions: document.conditions.clone(),
            documentation: document.required_documentation.clone(),
        },
        excerpt: document.summary.coverage.clone(),
        narrative: FALLBACK_NARRATIVE.to_owned(),
        clarification_options: Vec::new(),
        next_step_hint: HINT_LOCAL_MODE.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use permia_core::{fixtures, PermitCode, Role};
    use secrecy::SecretString;

    use super::{Assistant, QueryResult};
    use crate::client::{GenerationClient, GenerationError, GenerationRequest};
    use crate::credentials::CredentialPool;

    struct StaticClient {
        reply: Result<String, GenerationError>,
    }

    #[async_trait]
    impl GenerationClient for StaticClient {
        async fn generate(
            &self,
            _credential: &SecretString,
            _request: &GenerationRequest,
        ) -> Result<String, GenerationError> {
            self.reply.clone()
        }
    }

    fn assistant_with(reply: Result<String, GenerationError>, credentials: usize) -> Assistant {
        let catalog = Arc::new(fixtures::demo_catalog(Role::Funcionario));
        let pool = Arc::new(CredentialPool::new(
            (0..credentials).map(|n| SecretString::from(format!("key-{n}"))).collect(),
        ));
        Assistant::new(
            Role::Funcionario,
            catalog,
            pool,
            Arc::new(StaticClient { reply }),
            "test-model",
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn guardrail_refuses_before_any_generation() {
        let mut assistant =
            assistant_with(Err(GenerationError::Status { status: 500 }), 1);
        let result = assistant.process_query("permiso porque mi gato está enfermo").await;

        assert!(matches!(result, QueryResult::Error { ref message }
            if message.contains("animales o mascotas")));
        // The guardrail short-circuits: no attempt was counted.
        assert_eq!(assistant.status().pool.total_requests, 0);
        assert!(assistant.history().is_empty());
    }

    #[tokio::test]
    async fn unresolvable_query_asks_for_reformulation() {
        let documents: Vec<_> = fixtures::demo_catalog(Role::Funcionario)
            .iter()
            .filter(|document| document.id == PermitCode::M)
            .cloned()
            .collect();
        let catalog =
            Arc::new(permia_core::Catalog::from_documents(documents).expect("reduced catalog"));
        let pool = Arc::new(CredentialPool::new(vec![SecretString::from("key".to_owned())]));
        let mut assistant = Assistant::new(
            Role::Funcionario,
            catalog,
            pool,
            Arc::new(StaticClient { reply: Ok("[ID: M] texto".to_owned()) }),
            "test-model",
            Duration::ZERO,
        );

        let result = assistant.process_query("xyzzy plugh").await;
        assert!(matches!(result, QueryResult::Error { ref message }
            if message.contains("reformularlo")));
    }

    #[tokio::test]
    async fn id_directive_swaps_the_grounding_document() {
        let mut assistant = assistant_with(
            Ok("[ID: N] Corresponde acompañamiento al médico de familia. [APLICA: SI]".to_owned()),
            1,
        );

        // Retrieval lands on M; the generator corrects to N.
        let result = assistant.process_query("¿Cuántos días por boda?").await;
        let QueryResult::Success(answer) = result else {
            panic!("expected success");
        };
        assert_eq!(answer.context_id, PermitCode::N);
        assert!(answer.show_card);
        assert_eq!(assistant.history().latest_context(), Some(PermitCode::N));
    }

    #[tokio::test]
    async fn pinned_context_resolves_short_followups_without_history() {
        let documents: Vec<_> = fixtures::demo_catalog(Role::Funcionario)
            .iter()
            .filter(|document| matches!(document.id, PermitCode::B | PermitCode::M))
            .cloned()
            .collect();
        let catalog =
            Arc::new(permia_core::Catalog::from_documents(documents).expect("reduced catalog"));
        let pool = Arc::new(CredentialPool::new(vec![SecretString::from("key".to_owned())]));
        let mut assistant = Assistant::new(
            Role::Funcionario,
            catalog,
            pool,
            Arc::new(StaticClient { reply: Ok("Detalle del apartado.".to_owned()) }),
            "test-model",
            Duration::ZERO,
        );

        let result =
            assistant.process_query_with_context("más", Some(PermitCode::M)).await;
        let QueryResult::Success(answer) = result else {
            panic!("expected success");
        };
        assert_eq!(answer.context_id, PermitCode::M);
    }

    #[tokio::test]
    async fn fresh_retrieval_beats_pinned_context() {
        let mut assistant = assistant_with(Ok("[APLICA: SI] Detalle.".to_owned()), 1);

        let result = assistant
            .process_query_with_context("me mudo de vivienda", Some(PermitCode::M))
            .await;
        let QueryResult::Success(answer) = result else {
            panic!("expected success");
        };
        assert_eq!(answer.context_id, PermitCode::C);
    }

    #[tokio::test]
    async fn empty_pool_serves_fallback_without_counting() {
        let mut assistant = assistant_with(Ok("nunca llega".to_owned()), 0);

        let result = assistant.process_query("¿Cuántos días por boda?").await;
        let QueryResult::Success(answer) = result else {
            panic!("expected fallback success");
        };
        assert!(answer.narrative.contains("saturado"));
        let status = assistant.status();
        assert_eq!(status.pool.total_requests, 0);
        assert_eq!(status.pool.failures, 0);
    }
}
