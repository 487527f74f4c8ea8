//! Deterministic demo catalogs for both staff regimes. Production catalogs
//! are supplied by an external loader; these exist so the CLI and tests run
//! without one. Wording is abbreviated from the Art. 11 tables.

use crate::catalog::{Catalog, FaqEntry, PermitCode, PermitSummary, PolicyDocument, Role};

#[allow(clippy::too_many_arguments)]
fn doc(
    id: PermitCode,
    title: &str,
    entitlement: &str,
    coverage: &str,
    proof: &str,
    detailed_duration: &str,
    beneficiaries: &str,
    conditions: &str,
    required_documentation: &str,
    faq: &[(&str, &str)],
) -> PolicyDocument {
    PolicyDocument {
        id,
        letter: id.as_str().to_owned(),
        title: title.to_owned(),
        summary: PermitSummary {
            entitlement: entitlement.to_owned(),
            coverage: coverage.to_owned(),
            proof: proof.to_owned(),
        },
        detailed_duration: detailed_duration.to_owned(),
        beneficiaries: beneficiaries.to_owned(),
        conditions: conditions.to_owned(),
        required_documentation: required_documentation.to_owned(),
        faq: faq
            .iter()
            .map(|(question, answer)| FaqEntry {
                question: (*question).to_owned(),
                answer: (*answer).to_owned(),
            })
            .collect(),
    }
}

/// Builds the demo catalog for one role. Ids start at `A` and keep the
/// statutory order, which retrieval relies on for tie-breaking.
pub fn demo_catalog(role: Role) -> Catalog {
    let hospital_conditions = match role {
        Role::Funcionario => {
            "El hecho causante debe producirse dentro de la jornada laboral para computar el día."
        }
        Role::Laboral => {
            "En intervenciones sin ingreso, el reposo domiciliario debe constar en el volante."
        }
    };

    let documents = vec![
        doc(
            PermitCode::A,
            "Enfermedad grave, hospitalización o intervención quirúrgica de familiar",
            "3 días hábiles; 5 si es en distinta localidad",
            "Ingreso, cirugía con reposo u enfermedad grave de familiar hasta 2º grado o conviviente",
            "Justificante de ingreso o informe médico",
            "3 días hábiles (1er y 2º grado). 5 días hábiles si el hecho ocurre en distinta \
             localidad. Disfrutables de forma alterna mientras dure el ingreso.",
            "Familiares hasta 2º grado por consanguinidad o afinidad, y convivientes acreditados",
            hospital_conditions,
            "Justificante del centro hospitalario o informe médico que acredite el ingreso, la \
             intervención o el reposo prescrito",
            &[
                (
                    "¿Puedo partir los días?",
                    "Sí, los días pueden disfrutarse de forma alterna mientras dure el ingreso o \
                     el reposo prescrito.",
                ),
                (
                    "¿Cuenta un amigo que vive conmigo?",
                    "Solo si se acredita convivencia efectiva y necesidad de cuidado.",
                ),
            ],
        ),
        doc(
            PermitCode::B,
            "Fallecimiento de familiar",
            "3 días hábiles; 5 si es en distinta localidad",
            "Fallecimiento de familiar hasta 2º grado",
            "Certificado de defunción o documento del tanatorio",
            "3 días hábiles (1er y 2º grado). 5 días hábiles si el sepelio es en distinta \
             localidad. Si el fallecimiento es tras la jornada, el permiso empieza al día \
             siguiente.",
            "Familiares hasta 2º grado por consanguinidad o afinidad",
            "El permiso se inicia el día del hecho causante o el siguiente si ocurre tras la \
             jornada",
            "Certificado de defunción o justificante del tanatorio",
            &[(
                "¿Y si el entierro es en otra provincia?",
                "Se aplican los días previstos para distinta localidad.",
            )],
        ),
        doc(
            PermitCode::C,
            "Traslado de domicilio habitual",
            "1 día natural",
            "Mudanza del domicilio habitual del empleado",
            "Volante de empadronamiento o contrato",
            "1 día natural, ampliable a 2 si el traslado es a distinta localidad.",
            "El propio empleado",
            "Debe tratarse del domicilio habitual, no de segundas residencias",
            "Volante de empadronamiento, contrato de alquiler o escritura",
            &[],
        ),
        doc(
            PermitCode::D,
            "Exámenes y pruebas oficiales",
            "El día de su celebración",
            "Exámenes finales, oposiciones y pruebas oficiales de aptitud",
            "Justificante de asistencia a la prueba",
            "El día de su celebración, sin ampliación por localidad distinta.",
            "El propio empleado",
            "La prueba debe ser oficial y coincidir con la jornada",
            "Justificante de asistencia expedido por el centro examinador",
            &[],
        ),
        doc(
            PermitCode::E,
            "Asistencia a consultas médicas propias",
            "El tiempo indispensable",
            "Consultas, analíticas y revisiones médicas del propio empleado",
            "Justificante de la cita con hora de entrada y salida",
            "El tiempo indispensable para la asistencia, con obligación de reincorporarse.",
            "El propio empleado",
            "Debe intentarse concertar la cita fuera de la jornada cuando sea posible",
            "Justificante de asistencia con hora de entrada y salida de la consulta",
            &[(
                "¿Incluye al dentista?",
                "Sí, las consultas propias incluyen dentista, oculista y análogas.",
            )],
        ),
        doc(
            PermitCode::F,
            "Nacimiento, adopción o acogimiento",
            "Según normativa estatal aplicable",
            "Embarazo, parto, adopción y acogimiento",
            "Libro de familia o resolución administrativa",
            "Según la normativa estatal vigente en materia de nacimiento y cuidado de menor.",
            "Progenitores y adoptantes",
            "Compatible con los permisos retribuidos municipales que correspondan",
            "Libro de familia, certificado de nacimiento o resolución de adopción/acogimiento",
            &[],
        ),
        doc(
            PermitCode::G,
            "Lactancia de menor de doce meses",
            "1 hora diaria de ausencia",
            "Lactancia de hijo menor de doce meses",
            "Certificado de nacimiento",
            "1 hora diaria, divisible en dos fracciones o acumulable en jornadas completas.",
            "Cualquiera de los progenitores",
            "Solo uno de los progenitores si ambos trabajan",
            "Certificado de nacimiento y declaración del otro progenitor",
            &[],
        ),
        doc(
            PermitCode::H,
            "Hospitalización de recién nacido prematuro",
            "Hasta 2 horas diarias retribuidas",
            "Neonato hospitalizado tras el parto o nacido prematuro",
            "Informe del servicio de neonatología",
            "Ausencia de hasta 2 horas diarias retribuidas mientras dure la hospitalización.",
            "Progenitores del neonato",
            "Mientras se mantenga la hospitalización del recién nacido",
            "Informe médico del servicio de neonatología",
            &[],
        ),
        doc(
            PermitCode::I,
            "Reducción de jornada por guarda legal o dependencia",
            "Reducción con disminución proporcional de retribuciones",
            "Guarda legal de menor, persona con discapacidad o familiar dependiente",
            "Resolución de dependencia o certificado de discapacidad",
            "Reducción de entre un octavo y la mitad de la jornada.",
            "Empleados con guarda legal o cuidado directo de familiar dependiente",
            "La reducción conlleva disminución proporcional de retribuciones",
            "Certificado de discapacidad, resolución de dependencia o documentación de la guarda",
            &[],
        ),
        doc(
            PermitCode::K,
            "Acompañamiento a especialista y pruebas invasivas de familiares",
            "El tiempo indispensable",
            "Urgencias, consultas de especialista y pruebas invasivas de familiares hasta 2º grado",
            "Justificante de la cita del especialista",
            "El tiempo indispensable para el acompañamiento, incluida la sedación y recuperación.",
            "Familiares hasta 2º grado",
            "Solo especialista, urgencias o pruebas con sedación; las consultas rutinarias van por \
             la bolsa del apartado N",
            "Justificante de la consulta de especialista o de la prueba, con hora de entrada y \
             salida",
            &[(
                "¿Vale para el médico de cabecera de mi hijo?",
                "No, la consulta rutinaria se atiende con la bolsa de horas del apartado N.",
            )],
        ),
        doc(
            PermitCode::M,
            "Matrimonio o inscripción como pareja de hecho",
            "15 días naturales",
            "Matrimonio civil o religioso e inscripción registral como pareja de hecho",
            "Certificado de matrimonio o inscripción",
            "15 días naturales consecutivos, acumulables a vacaciones previa autorización.",
            "El propio empleado",
            "Un único disfrute por hecho causante",
            "Certificado literal de matrimonio o certificado de inscripción como pareja de hecho",
            &[(
                "¿Cuántos días por boda?",
                "15 días naturales consecutivos desde el hecho causante.",
            )],
        ),
        doc(
            PermitCode::N,
            "Bolsa de horas para consultas rutinarias de familiares",
            "Bolsa anual de 28 horas",
            "Médico de cabecera, pediatra, tutorías escolares e indisposiciones de familiares",
            "Justificante de la cita o de la tutoría",
            "Bolsa anual de 28 horas, descontadas por el tiempo efectivamente empleado.",
            "Familiares de 1er grado y menores a cargo",
            "Agotada la bolsa, el tiempo se recupera o se descuenta",
            "Justificante de asistencia a la consulta o convocatoria de la tutoría",
            &[],
        ),
    ];

    Catalog::from_documents(documents).unwrap_or_else(|error| {
        // The fixture tables are compile-time data; a duplicate here is a bug.
        panic!("demo catalog is internally inconsistent: {error}")
    })
}
