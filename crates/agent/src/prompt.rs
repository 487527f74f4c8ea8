//! Prompt construction: the fixed system instruction (knowledge tables,
//! tone, directive-tag rules, role-specific clauses) and the per-query
//! grounding prompt embedding the resolved document and the conversation so
//! far. All of it is data the generation service consumes; none of it is
//! interpreted locally.

use permia_core::knowledge::{self, relationship};
use permia_core::{Catalog, PolicyDocument, Role};
use serde_json::json;

use crate::conversation::ConversationContext;

pub struct PromptBuilder<'a> {
    role: Role,
    catalog: &'a Catalog,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(role: Role, catalog: &'a Catalog) -> Self {
        Self { role, catalog }
    }

    /// Per-query prompt: history (oldest first), the resolved document as
    /// JSON, the raw query, and the response contract.
    pub fn grounding_prompt(
        &self,
        document: &PolicyDocument,
        history: &ConversationContext,
        query: &str,
    ) -> String {
        let mut prompt = String::new();

        if !history.is_empty() {
            prompt.push_str("HISTORIAL DE LA CONVERSACIÓN:\n");
            for turn in history.turns() {
                prompt.push_str(&format!(
                    "USUARIO: {}\nASISTENTE: {}\n\n",
                    turn.query, turn.response_text
                ));
            }
            prompt.push('\n');
        }

        let document_json = serde_json::to_string(document).unwrap_or_default();
        prompt.push_str(&format!(
            "CONTEXTO NORMATIVO ACTUAL:\n\
             - Tipo de Personal: {}\n\
             - Datos del Permiso: {}\n\n\
             CONSULTA DEL USUARIO: {}\n\n\
             INSTRUCCIONES DE RESPUESTA:\n\
             - Responde basándote en el CONTEXTO NORMATIVO ACTUAL y el HISTORIAL.\n\
             - Si la consulta del usuario cambia de tema respecto al historial, prioriza los datos del nuevo permiso e indica su ID.\n\
             - Usa [TITULO: ...] para encabezados técnicos.\n\
             - No olvides incluir [ID: ...] al inicio y [OPCIONES: ...] al final.\n\
             - Si el usuario pregunta algo que ya se respondió, aclara el matiz solicitado.",
            self.role.label(),
            document_json,
            query
        ));

        prompt
    }

    /// Fixed system instruction for the session: tone, knowledge tables,
    /// role-specific clauses and the directive-tag contract. The available-id
    /// list keeps the generator's `[ID: ...]` corrections inside the catalog.
    pub fn system_instruction(&self) -> String {
        let interpretations = json!(knowledge::INTERPRETATIONS
            .iter()
            .map(|(context, rule)| json!({ "contexto": context, "regla": rule }))
            .collect::<Vec<_>>())
        .to_string();
        let kinship_table = knowledge::table_as_json(relationship::SEMANTIC_MAPPING);
        let id_list = json!(self
            .catalog
            .iter()
            .map(|document| json!({ "id": document.id, "title": document.title }))
            .collect::<Vec<_>>())
        .to_string();

        format!(
            "Eres un Sistema de Información Normativa del Ayuntamiento de Villalbilla.\n\
             Tu función es proporcionar datos técnicos precisos sobre los permisos del Art. 11 basándote EXCLUSIVAMENTE en el {statute}.\n\n\
             TONO: Estrictamente OBJETIVO, TÉCNICO e IMPERSONAL.\n\
             - No uses la segunda persona (\"tienes\", \"debes\", \"te corresponde\").\n\
             - No uses fórmulas de cercanía (\"compañero\", \"hola\", \"entiendo\").\n\
             - Usa la tercera persona o formas impersonales (\"Corresponden...\", \"Es necesario...\", \"Se establece...\").\n\n\
             FORMATO: Usa Markdown para mejorar la legibilidad.\n\
             - Usa **negritas** para términos clave y plazos.\n\
             - Usa listas con guiones si es necesario.\n\
             - Usa [TITULO: Nombre del Título] en una línea aparte para separar secciones principales.\n\n\
             OPCIONES DE SEGUIMIENTO: Incluye al final 2 o 3 opciones de aclaración cortas con el formato [OPCIONES: Opción 1 | Opción 2 | Opción 3].\n\n\
             CONOCIMIENTO DEL EXPERTO: {interpretations}\n\
             TABLA DE PARENTESCOS: {kinship_table}\n\n\
             REGLAS ESPECÍFICAS ({statute_label}):\n{role_rules}\n\n\
             REGLAS DE ORO:\n\
             1. Diferencia el Apartado K (Urgencias/Especialistas) del N (Gripes/Médico Familia).\n\
             2. Menciona la posibilidad de días alternos en hospitalización si procede.\n\
             3. Si faltan datos (parentesco, localidad), indícalo de forma objetiva.\n\
             4. EXÁMENES (Apartado D): La duración es estrictamente el 'Día de su celebración', sin ampliación por localidad distinta.\n\
             5. APLICABILIDAD: Si el permiso NO aplica al caso concreto (ej: mascota, amigo, grados no cubiertos), incluye al final la etiqueta [APLICA: NO]. Si aplica, usa [APLICA: SI].\n\
             6. IDENTIFICACIÓN: Al principio de la respuesta, indica siempre el ID del apartado que estás explicando usando la etiqueta [ID: X] (ej: [ID: K] o [ID: A]). Esto es CRÍTICO para la sincronización del sistema.\n\
             7. REFINAMIENTO DE TARJETAS TÉCNICAS (DURACIÓN Y ACREDITACIÓN):\n\
             - Al final de tu respuesta, extrae ÚNICAMENTE los datos aplicables a la consulta específica para las tarjetas laterales.\n\
             - Formato: [DURACION: Texto corto con el plazo específico] y [ACREDITACION: Documentos específicos para este caso].\n\
             - Si la consulta es sobre un familiar de 2º grado, en [DURACION] solo pondrás el plazo para el 2º grado, NO el de 1º.\n\
             - Si la consulta es una explicación general o no hay plazo concreto, usa [DURACION: No aplica] y [ACREDITACION: No aplica].\n\
             - Sé extremadamente conciso en estas etiquetas.\n\n\
             LISTA DE IDs DISPONIBLES: {id_list}",
            statute = self.role.statute(),
            statute_label = self.role.statute_label(),
            role_rules = role_rules(self.role),
            interpretations = interpretations,
            kinship_table = kinship_table,
            id_list = id_list,
        )
    }
}

fn role_rules(role: Role) -> &'static str {
    match role {
        Role::Funcionario => {
            "- Menciona que para hospitalización el hecho causante debe producirse dentro de la \
             jornada laboral para computar el día.\n\
             - Refiere siempre al \"Acuerdo\" como fuente legal."
        }
        Role::Laboral => {
            "- En intervenciones sin ingreso, recalca que el reposo domiciliario es OBLIGATORIO y \
             debe constar en el volante para dar derecho a días adicionales.\n\
             - Refiere siempre al \"Convenio\" como fuente legal."
        }
    }
}
