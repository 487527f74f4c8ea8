//! End-to-end pipeline tests over a scripted generation client: rotation
//! accounting, the local fallback, continuation handling and directive
//! post-processing, with no network involved.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use permia_agent::client::{GenerationClient, GenerationError, GenerationRequest};
use permia_agent::credentials::CredentialPool;
use permia_agent::pipeline::{Assistant, QueryResult};
use permia_core::{fixtures, Catalog, PermitCode, Role};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

/// Replays a queue of canned outcomes and records which credential each
/// attempt used.
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    seen_credentials: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen_credentials: Mutex::new(Vec::new()),
        }
    }

    async fn seen_credentials(&self) -> Vec<String> {
        self.seen_credentials.lock().await.clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(
        &self,
        credential: &SecretString,
        _request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        self.seen_credentials.lock().await.push(credential.expose_secret().to_owned());
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(GenerationError::Status { status: 429 }))
    }
}

fn credentials(count: usize) -> Vec<SecretString> {
    (0..count).map(|n| SecretString::from(format!("key-{n}"))).collect()
}

fn assistant(
    catalog: Catalog,
    pool_size: usize,
    client: Arc<ScriptedClient>,
) -> (Assistant, Arc<CredentialPool>) {
    let pool = Arc::new(CredentialPool::new(credentials(pool_size)));
    let assistant = Assistant::new(
        Role::Funcionario,
        Arc::new(catalog),
        Arc::clone(&pool),
        client,
        "test-model",
        Duration::ZERO,
    );
    (assistant, pool)
}

fn reduced_catalog(codes: &[PermitCode]) -> Catalog {
    let documents: Vec<_> = fixtures::demo_catalog(Role::Funcionario)
        .iter()
        .filter(|document| codes.contains(&document.id))
        .cloned()
        .collect();
    Catalog::from_documents(documents).expect("reduced catalog")
}

#[tokio::test]
async fn marriage_query_is_answered_from_the_marriage_document() {
    let client = Arc::new(ScriptedClient::new(vec![Ok(
        "[ID: M] Corresponden **15 días naturales**. [APLICA: SI] [OPCIONES: Pareja de hecho | Documentación]".to_owned(),
    )]));
    let (mut assistant, _) =
        assistant(fixtures::demo_catalog(Role::Funcionario), 1, Arc::clone(&client));

    let result = assistant.process_query("¿Cuántos días por boda?").await;
    let QueryResult::Success(answer) = result else {
        panic!("expected success");
    };
    assert_eq!(answer.context_id, PermitCode::M);
    assert_eq!(answer.interpretation_title, "Matrimonio o inscripción como pareja de hecho");
    assert!(answer.show_card);
    assert!(answer.narrative.contains("15 días naturales"));
    assert!(!answer.narrative.contains('['));
    assert_eq!(answer.clarification_options, vec!["Pareja de hecho", "Documentación"]);
    assert_eq!(answer.next_step_hint, "Opciones de consulta adicionales:");
    assert_eq!(assistant.history().len(), 1);
}

#[tokio::test]
async fn two_failures_rotate_through_the_pool_before_succeeding() {
    let client = Arc::new(ScriptedClient::new(vec![
        Err(GenerationError::Status { status: 429 }),
        Err(GenerationError::DeadlineExceeded),
        Ok("[ID: M] Tercera cuenta responde.".to_owned()),
    ]));
    let (mut assistant, pool) =
        assistant(fixtures::demo_catalog(Role::Funcionario), 3, Arc::clone(&client));

    let result = assistant.process_query("¿Cuántos días por boda?").await;
    assert!(matches!(result, QueryResult::Success(_)));

    assert_eq!(
        client.seen_credentials().await,
        vec!["key-0".to_owned(), "key-1".to_owned(), "key-2".to_owned()]
    );
    let status = pool.status();
    assert_eq!(status.total_requests, 3);
    assert_eq!(status.usage, vec![1, 1, 1]);
    assert_eq!(status.rotations, 2);
    assert_eq!(status.failures, 0);
    assert_eq!(status.cursor, 2);
}

#[tokio::test]
async fn exhausted_pool_degrades_to_document_fallback() {
    let client = Arc::new(ScriptedClient::new(vec![
        Err(GenerationError::Status { status: 429 }),
        Err(GenerationError::Status { status: 503 }),
        Err(GenerationError::EmptyResponse),
    ]));
    let (mut assistant, pool) =
        assistant(fixtures::demo_catalog(Role::Funcionario), 3, Arc::clone(&client));

    let result = assistant.process_query("¿Cuántos días por boda?").await;
    let QueryResult::Success(answer) = result else {
        panic!("fallback is still a success");
    };

    let marriage = fixtures::demo_catalog(Role::Funcionario);
    let document = marriage.by_id(PermitCode::M).expect("fixture M");
    assert!(answer.narrative.contains("saturado"));
    assert!(answer.interpretation_title.starts_with("(Motor Local)"));
    assert_eq!(answer.operative.duration, document.summary.entitlement);
    assert_eq!(answer.operative.documentation, document.required_documentation);
    assert!(answer.show_card);
    assert!(answer.clarification_options.is_empty());
    assert!(answer.next_step_hint.contains("Modo Local"));

    let status = pool.status();
    assert_eq!(status.total_requests, 3);
    assert_eq!(status.rotations, 2);
    assert_eq!(status.failures, 1);
}

#[tokio::test]
async fn single_credential_never_rotates() {
    let client =
        Arc::new(ScriptedClient::new(vec![Err(GenerationError::Status { status: 500 })]));
    let (mut assistant, pool) =
        assistant(fixtures::demo_catalog(Role::Funcionario), 1, client);

    let result = assistant.process_query("¿Cuántos días por boda?").await;
    assert!(matches!(result, QueryResult::Success(_)));

    let status = pool.status();
    assert_eq!(status.rotations, 0);
    assert_eq!(status.failures, 1);
    assert_eq!(status.total_requests, 1);
}

#[tokio::test]
async fn empty_pool_answers_locally_with_untouched_counters() {
    let client = Arc::new(ScriptedClient::new(Vec::new()));
    let (mut assistant, pool) =
        assistant(fixtures::demo_catalog(Role::Funcionario), 0, Arc::clone(&client));

    let result = assistant.process_query("¿Cuántos días por boda?").await;
    let QueryResult::Success(answer) = result else {
        panic!("expected fallback success");
    };
    assert!(answer.narrative.contains("saturado"));
    assert!(client.seen_credentials().await.is_empty());

    let status = pool.status();
    assert_eq!(status.total_requests, 0);
    assert_eq!(status.failures, 0);
    assert_eq!(status.rotations, 0);
}

#[tokio::test]
async fn short_followup_reuses_the_previous_context() {
    // Only B and M: nothing scores for "y?", so the continuation rule is the
    // only way the second turn can resolve.
    let client = Arc::new(ScriptedClient::new(vec![
        Ok("[ID: M] Corresponden 15 días naturales.".to_owned()),
        Ok("Los días son naturales, no hábiles.".to_owned()),
    ]));
    let (mut assistant, _) =
        assistant(reduced_catalog(&[PermitCode::B, PermitCode::M]), 1, client);

    let first = assistant.process_query("¿Cuántos días por boda?").await;
    assert!(matches!(first, QueryResult::Success(_)));

    let second = assistant.process_query("y?").await;
    let QueryResult::Success(answer) = second else {
        panic!("continuation should resolve");
    };
    assert_eq!(answer.context_id, PermitCode::M);
    assert_eq!(assistant.history().len(), 2);
}

#[tokio::test]
async fn long_unresolvable_query_is_not_a_continuation() {
    let client = Arc::new(ScriptedClient::new(vec![Ok(
        "[ID: M] Corresponden 15 días naturales.".to_owned(),
    )]));
    let (mut assistant, _) =
        assistant(reduced_catalog(&[PermitCode::B, PermitCode::M]), 1, client);

    let first = assistant.process_query("¿Cuántos días por boda?").await;
    assert!(matches!(first, QueryResult::Success(_)));

    let second = assistant.process_query("xyzzy plugh nada que ver").await;
    assert!(matches!(second, QueryResult::Error { ref message }
        if message.contains("reformularlo")));
    // Refusals never enter the history.
    assert_eq!(assistant.history().len(), 1);
}

#[tokio::test]
async fn animal_guardrail_refuses_without_spending_credentials() {
    let client = Arc::new(ScriptedClient::new(Vec::new()));
    let (mut assistant, pool) =
        assistant(fixtures::demo_catalog(Role::Funcionario), 2, Arc::clone(&client));

    let result = assistant.process_query("necesito llevar a mi perro al veterinario").await;
    assert!(matches!(result, QueryResult::Error { ref message }
        if message.contains("animales o mascotas")));
    assert!(client.seen_credentials().await.is_empty());
    assert_eq!(pool.status().total_requests, 0);
}
