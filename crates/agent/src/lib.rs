//! Query-understanding and answer-generation engine for the Art. 11 leave
//! assistant. The pipeline runs guardrail analysis, document retrieval and
//! grounded generation with credential rotation, degrading to a local
//! document-only answer when every credential fails.

pub mod client;
pub mod conversation;
pub mod credentials;
pub mod directives;
pub mod pipeline;
pub mod prompt;
pub mod retrieval;
pub mod semantics;
pub mod text;

pub use client::{GeminiClient, GenerationClient, GenerationError, GenerationRequest};
pub use conversation::{ConversationContext, ConversationTurn};
pub use credentials::{CredentialLease, CredentialPool, PoolStatus};
pub use pipeline::{
    Answer, Assistant, EngineStatus, OperativeAnswer, QueryResult, CLARIFICATION_MESSAGE,
    OUT_OF_SCOPE_MESSAGE,
};
pub use retrieval::ContextRetriever;
pub use semantics::{Intent, SemanticAnalysis, SemanticAnalyzer, SubjectFlags};
