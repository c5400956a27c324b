//! Typed representation of one validated contract submission.
//!
//! Serde renames pin the wire format to the public form contract
//! (camelCase, Spanish field names); the Rust side stays snake_case.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::submission::sanitize::clean_text;

/// One validated form submission, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSubmission {
    pub personal: PersonalInfo,
    pub company: CompanyInfo,
    pub contract: ContractInfo,
    pub terms: TermsAcceptance,

    /// Client-supplied metadata. Advisory only: nothing in here is
    /// trusted for integrity.
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<ClientMeta>,
}

/// Signer identity and contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub nombre: String,
    pub apellido: String,
    pub rut: String,
    pub email: String,
    pub telefono: String,
    pub direccion: String,
    pub ciudad: String,
    pub region: String,
}

/// Contracting company details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub razon_social: String,
    pub rut_empresa: String,
    pub giro: String,
    pub direccion_empresa: String,
    pub ciudad_empresa: String,
    pub representante_legal: String,
    pub cargo_representante: String,
}

/// Requested contract terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    pub tipo_contrato: ContractType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminos_especiales: Option<String>,
}

/// The contract types the intake form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Servicios,
    Suministro,
    Consultoria,
    Confidencialidad,
    Otro,
}

impl ContractType {
    pub const ALL: [ContractType; 5] = [
        ContractType::Servicios,
        ContractType::Suministro,
        ContractType::Consultoria,
        ContractType::Confidencialidad,
        ContractType::Otro,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContractType::Servicios => "servicios",
            ContractType::Suministro => "suministro",
            ContractType::Consultoria => "consultoria",
            ContractType::Confidencialidad => "confidencialidad",
            ContractType::Otro => "otro",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == raw)
    }
}

/// Acceptance flags. The schema requires all three to be true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsAcceptance {
    pub acepta_terminos: bool,
    pub acepta_politica_privacidad: bool,
    pub acepta_tratamiento_datos: bool,
}

/// Client-supplied metadata block (`_meta` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ContractSubmission {
    /// Return the submission with every string field cleaned.
    ///
    /// Field presence and types never change; only string content does.
    /// Idempotent: cleaning an already-clean submission is a no-op.
    pub fn sanitized(self) -> Self {
        Self {
            personal: PersonalInfo {
                nombre: clean_text(&self.personal.nombre),
                apellido: clean_text(&self.personal.apellido),
                rut: clean_text(&self.personal.rut),
                email: clean_text(&self.personal.email),
                telefono: clean_text(&self.personal.telefono),
                direccion: clean_text(&self.personal.direccion),
                ciudad: clean_text(&self.personal.ciudad),
                region: clean_text(&self.personal.region),
            },
            company: CompanyInfo {
                razon_social: clean_text(&self.company.razon_social),
                rut_empresa: clean_text(&self.company.rut_empresa),
                giro: clean_text(&self.company.giro),
                direccion_empresa: clean_text(&self.company.direccion_empresa),
                ciudad_empresa: clean_text(&self.company.ciudad_empresa),
                representante_legal: clean_text(&self.company.representante_legal),
                cargo_representante: clean_text(&self.company.cargo_representante),
            },
            contract: ContractInfo {
                tipo_contrato: self.contract.tipo_contrato,
                terminos_especiales: self
                    .contract
                    .terminos_especiales
                    .as_deref()
                    .map(clean_text),
            },
            terms: self.terms,
            meta: self.meta.map(|m| ClientMeta {
                timestamp: m.timestamp.as_deref().map(clean_text),
                token: m.token.as_deref().map(clean_text),
                checksum: m.checksum.as_deref().map(clean_text),
                user_agent: m.user_agent.as_deref().map(clean_text),
                source: m.source.as_deref().map(clean_text),
            }),
        }
    }
}

/// The payload actually delivered to the workflow webhook: the sanitized
/// submission plus server-observed metadata, flattened at the top level.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardedSubmission {
    #[serde(flatten)]
    pub submission: ContractSubmission,
    pub submitted_at: String,
    pub submitted_from: String,
}

/// Generate an opaque submission identifier: current time plus a random
/// uppercase suffix, e.g. `CONT-1722873600123-X7K2PQ9ZD`.
pub fn new_contract_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect();
    format!("CONT-{millis}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_format_uses_form_field_names() {
        let submission = ContractSubmission {
            personal: PersonalInfo {
                nombre: "Ana".into(),
                apellido: "Rojas".into(),
                rut: "12.345.678-5".into(),
                email: "ana@example.com".into(),
                telefono: "+56 9 1234 5678".into(),
                direccion: "Av. Siempre Viva 742".into(),
                ciudad: "Santiago".into(),
                region: "RM".into(),
            },
            company: CompanyInfo {
                razon_social: "Acme SpA".into(),
                rut_empresa: "76.543.210-K".into(),
                giro: "Servicios de software".into(),
                direccion_empresa: "Av. Apoquindo 1234".into(),
                ciudad_empresa: "Santiago".into(),
                representante_legal: "Ana Rojas".into(),
                cargo_representante: "Gerente General".into(),
            },
            contract: ContractInfo {
                tipo_contrato: ContractType::Servicios,
                terminos_especiales: None,
            },
            terms: TermsAcceptance {
                acepta_terminos: true,
                acepta_politica_privacidad: true,
                acepta_tratamiento_datos: true,
            },
            meta: None,
        };

        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["company"]["razonSocial"], json!("Acme SpA"));
        assert_eq!(value["contract"]["tipoContrato"], json!("servicios"));
        assert_eq!(value["terms"]["aceptaTerminos"], json!(true));
        assert!(value.get("_meta").is_none());
    }

    #[test]
    fn forwarded_payload_flattens_server_metadata() {
        let submission: ContractSubmission = serde_json::from_value(json!({
            "personal": {
                "nombre": "Ana", "apellido": "Rojas", "rut": "12.345.678-5",
                "email": "ana@example.com", "telefono": "+56912345678",
                "direccion": "Calle 1", "ciudad": "Santiago", "region": "RM"
            },
            "company": {
                "razonSocial": "Acme SpA", "rutEmpresa": "76.543.210-K",
                "giro": "Software", "direccionEmpresa": "Calle 2",
                "ciudadEmpresa": "Santiago", "representanteLegal": "Ana Rojas",
                "cargoRepresentante": "Gerente"
            },
            "contract": { "tipoContrato": "otro" },
            "terms": {
                "aceptaTerminos": true,
                "aceptaPoliticaPrivacidad": true,
                "aceptaTratamientoDatos": true
            }
        }))
        .unwrap();

        let forwarded = ForwardedSubmission {
            submission,
            submitted_at: "2026-08-05T12:00:00.000Z".into(),
            submitted_from: "203.0.113.9".into(),
        };
        let value = serde_json::to_value(&forwarded).unwrap();
        assert_eq!(value["submittedAt"], json!("2026-08-05T12:00:00.000Z"));
        assert_eq!(value["submittedFrom"], json!("203.0.113.9"));
        assert_eq!(value["personal"]["nombre"], json!("Ana"));
    }

    #[test]
    fn contract_id_shape() {
        let id = new_contract_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "CONT");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn contract_type_parse_round_trip() {
        for t in ContractType::ALL {
            assert_eq!(ContractType::parse(t.as_str()), Some(t));
        }
        assert_eq!(ContractType::parse("arriendo"), None);
    }
}
