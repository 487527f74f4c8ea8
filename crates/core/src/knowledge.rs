//! Static reference tables fed to the semantic analyzer and embedded in the
//! generation system instruction. Content mirrors the joint committee's
//! interpretation sheets; treat it as data, not logic.

/// Kinship terms and their legal degree classification.
pub mod relationship {
    /// Term → degree, as the committee resolves it. Multi-word entries must
    /// win over their substrings, so consumers scan longest-first.
    pub const SEMANTIC_MAPPING: &[(&str, &str)] = &[
        ("padre", "1er grado"),
        ("madre", "1er grado"),
        ("hijo", "1er grado"),
        ("hija", "1er grado"),
        ("abuelo", "2º grado"),
        ("abuela", "2º grado"),
        ("nieto", "2º grado"),
        ("nieta", "2º grado"),
        ("hermano", "2º grado"),
        ("hermana", "2º grado"),
        ("cuñado", "2º grado"),
        ("cuñada", "2º grado"),
        ("suegro", "1er grado"),
        ("suegra", "1er grado"),
        ("yerno", "1er grado"),
        ("nuera", "1er grado"),
        ("mujer", "cónyuge"),
        ("marido", "cónyuge"),
        ("esposa", "cónyuge"),
        ("esposo", "cónyuge"),
        ("pareja", "cónyuge/pareja de hecho"),
        ("abuelo de mi mujer", "2º grado afinidad"),
        ("abuela de mi mujer", "2º grado afinidad"),
        ("abuelo de mi marido", "2º grado afinidad"),
        ("abuela de mi marido", "2º grado afinidad"),
        ("amigo", "conviviente (si acredita cuidado efectivo)"),
        ("amiga", "conviviente (si acredita cuidado efectivo)"),
        ("tia", "3er grado (no cubierto)"),
        ("tio", "3er grado (no cubierto)"),
        ("sobrino", "3er grado (no cubierto)"),
        ("sobrina", "3er grado (no cubierto)"),
    ];

    pub const FIRST_DEGREE: &[&str] =
        &["Padres", "Hijos", "Cónyuge", "Pareja de hecho", "Suegros", "Yernos", "Nueras"];

    pub const SECOND_DEGREE: &[&str] =
        &["Abuelos", "Nietos", "Hermanos", "Cuñados", "Abuelos del cónyuge"];

    /// Categories explicitly outside the permit system.
    pub const EXCLUSIONS: &[(&str, &str)] = &[
        (
            "animales",
            "No dan derecho a permiso (perro, gato, mascota, tortuga, etc.). Los permisos son \
             exclusivos para familiares humanos o convivientes acreditados.",
        ),
        (
            "amigos",
            "No dan derecho a permiso, salvo que se acredite convivencia efectiva y necesidad de \
             cuidado (Apartado A).",
        ),
    ];

    /// Non-human dependents. Any hit is an absolute-priority veto.
    pub const ANIMAL_TERMS: &[&str] = &[
        "perro",
        "gato",
        "mascota",
        "tortuga",
        "pajaro",
        "caballo",
        "veterinario",
        "canino",
        "felino",
    ];
}

/// Medical vocabulary grouped by the permit category it signals.
pub mod medical {
    /// Major procedures and hospital admissions (permit A).
    pub const CIRUGIA_GRAVE: &[&str] = &[
        "operacion",
        "cirugia",
        "intervencion",
        "ingreso",
        "hospitalizacion",
        "enfermedad grave",
        "cricotiroidectomia",
        "apendicectomia",
        "quirofano",
        "postoperatorio",
        "bypass",
        "mastectomia",
        "accidente",
        "grave",
        "uci",
        "uiv",
    ];

    /// Invasive or specialist procedures for relatives (permit K).
    pub const INVASIVO_ESPECIALISTA: &[&str] = &[
        "colonoscopia",
        "endoscopia",
        "biopsia",
        "sedacion",
        "anestesia general",
        "tac con contraste",
        "oncologia",
        "especialista",
        "pruebas invasivas",
        "puncion",
        "cateterismo",
        "resonancia",
    ];

    /// Routine self-care appointments (permit E).
    pub const PRUEBAS_PROPIAS: &[&str] = &[
        "analitica",
        "analisis de sangre",
        "radiografia",
        "ecografia",
        "dentista",
        "oculista",
        "revision",
        "chequeo",
        "doctor",
        "medico",
        "podologo",
        "oftalmologo",
    ];

    /// Routine family-care visits and school duties (permit N).
    pub const RUTINA_FAMILIAR: &[&str] = &[
        "pediatra",
        "medico de cabecera",
        "gripe",
        "indisposicion",
        "fiebre",
        "tutoria",
        "escolar",
        "reunion colegio",
        "vacuna",
        "enfermera",
    ];
}

/// Committee rulings the generator must honor, verbatim.
pub const INTERPRETATIONS: &[(&str, &str)] = &[
    (
        "Animales/Mascotas",
        "Denegar cualquier solicitud relacionada con animales. Responder que el Art. 11 solo \
         contempla familiares humanos.",
    ),
    (
        "Hospitalización/Enfermedad",
        "Los días se pueden disfrutar de forma alterna mientras dure el ingreso o el reposo \
         prescrito.",
    ),
    (
        "Fallecimiento",
        "Si el fallecimiento es después de tu jornada, el permiso empieza al día siguiente. Si el \
         entierro es en otra localidad, se aplican los días de distinta localidad.",
    ),
    (
        "Diferencia K vs N",
        "Apartado K = Solo Urgencias, Especialistas o Pruebas Invasivas (sedación). Apartado N = \
         Consultas rutinarias, gripes, tutorías escolares.",
    ),
];

/// Renders a table of (key, value) pairs as a JSON object string for prompt
/// embedding. Insertion order is preserved.
pub fn table_as_json(table: &[(&str, &str)]) -> String {
    let mut map = serde_json::Map::with_capacity(table.len());
    for (key, value) in table {
        map.insert((*key).to_owned(), serde_json::Value::String((*value).to_owned()));
    }
    serde_json::Value::Object(map).to_string()
}

#[cfg(test)]
mod tests {
    use super::{relationship, table_as_json};

    #[test]
    fn multiword_relationship_terms_are_present_for_longest_first_scan() {
        let longest = relationship::SEMANTIC_MAPPING
            .iter()
            .map(|(term, _)| term.len())
            .max()
            .unwrap_or_default();
        assert!(longest >= "abuela de mi marido".len());
    }

    #[test]
    fn table_renders_as_json_object() {
        let rendered = table_as_json(&[("padre", "1er grado")]);
        assert_eq!(rendered, r#"{"padre":"1er grado"}"#);
    }
}
