//! Structural payload validation.
//!
//! # Responsibilities
//! - Check required fields, types, formats and enumerations
//! - Collect every violation so the caller can report them all at once
//! - Build the typed submission only when the payload is fully valid
//!
//! # Design Decisions
//! - Collect-all, not fail-fast: a form user should see the complete
//!   list of corrections in one round trip
//! - Structural checks only; RUT checksums and geography are the
//!   downstream workflow's business
//! - Field paths in errors use the wire names (`terms.aceptaTerminos`)

use serde_json::{Map, Value};
use std::fmt;

use crate::submission::model::{
    ClientMeta, CompanyInfo, ContractInfo, ContractSubmission, ContractType, PersonalInfo,
    TermsAcceptance,
};

/// Longest accepted single-line field.
const MAX_TEXT_LEN: usize = 256;
/// Longest accepted free-text field (special terms).
const MAX_FREE_TEXT_LEN: usize = 4096;

/// One field-level violation: the wire path and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.path, self.message)
    }
}

/// Validate a raw contract payload.
///
/// Returns the typed submission, or every violation found.
pub fn validate_contract(raw: &Value) -> Result<ContractSubmission, Vec<FieldError>> {
    let mut errors = Vec::new();

    if !raw.is_object() {
        return Err(vec![FieldError::new("payload", "must be a JSON object")]);
    }

    let personal = validate_personal(raw, &mut errors);
    let company = validate_company(raw, &mut errors);
    let contract = validate_contract_info(raw, &mut errors);
    let terms = validate_terms(raw, &mut errors);
    let meta = validate_meta(raw, &mut errors);

    match (personal, company, contract, terms) {
        (Some(personal), Some(company), Some(contract), Some(terms)) if errors.is_empty() => {
            Ok(ContractSubmission {
                personal,
                company,
                contract,
                terms,
                meta,
            })
        }
        _ => Err(errors),
    }
}

/// Validate a raw lead payload: `contact.email` must exist and look like
/// an email address. Everything else is passed through untouched.
pub fn validate_lead(raw: &Value) -> Result<(), Vec<FieldError>> {
    if !raw.is_object() {
        return Err(vec![FieldError::new("payload", "must be a JSON object")]);
    }

    let mut errors = Vec::new();
    match raw.get("contact") {
        Some(Value::Object(contact)) => match contact.get("email") {
            Some(Value::String(email)) if is_valid_email(email) => {}
            Some(Value::String(_)) => {
                errors.push(FieldError::new("contact.email", "must be a valid email address"));
            }
            Some(_) => errors.push(FieldError::new("contact.email", "must be a string")),
            None => errors.push(FieldError::new("contact.email", "is required")),
        },
        Some(_) => errors.push(FieldError::new("contact", "must be an object")),
        None => errors.push(FieldError::new("contact", "is required")),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Basic `user@domain.tld` shape check. Intentionally loose: anything
/// stricter belongs to a confirmation email, not a regex.
pub fn is_valid_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

fn section<'a>(
    raw: &'a Value,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a Map<String, Value>> {
    match raw.get(name) {
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            errors.push(FieldError::new(name, "must be an object"));
            None
        }
        None => {
            errors.push(FieldError::new(name, "is required"));
            None
        }
    }
}

fn required_text(
    map: &Map<String, Value>,
    section_name: &str,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let path = || format!("{section_name}.{field}");
    match map.get(field) {
        Some(Value::String(s)) => {
            if s.trim().is_empty() {
                errors.push(FieldError::new(path(), "must not be empty"));
                None
            } else if s.chars().count() > MAX_TEXT_LEN {
                errors.push(FieldError::new(
                    path(),
                    format!("must be at most {MAX_TEXT_LEN} characters"),
                ));
                None
            } else {
                Some(s.clone())
            }
        }
        Some(_) => {
            errors.push(FieldError::new(path(), "must be a string"));
            None
        }
        None => {
            errors.push(FieldError::new(path(), "is required"));
            None
        }
    }
}

fn optional_text(
    map: &Map<String, Value>,
    section_name: &str,
    field: &str,
    max_len: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let path = || format!("{section_name}.{field}");
    match map.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            if s.chars().count() > max_len {
                errors.push(FieldError::new(
                    path(),
                    format!("must be at most {max_len} characters"),
                ));
                None
            } else {
                Some(s.clone())
            }
        }
        Some(_) => {
            errors.push(FieldError::new(path(), "must be a string"));
            None
        }
    }
}

fn accepted_flag(
    map: &Map<String, Value>,
    section_name: &str,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<bool> {
    let path = || format!("{section_name}.{field}");
    match map.get(field) {
        Some(Value::Bool(true)) => Some(true),
        Some(Value::Bool(false)) => {
            errors.push(FieldError::new(path(), "must be accepted"));
            None
        }
        Some(_) => {
            errors.push(FieldError::new(path(), "must be a boolean"));
            None
        }
        None => {
            errors.push(FieldError::new(path(), "is required"));
            None
        }
    }
}

fn validate_personal(raw: &Value, errors: &mut Vec<FieldError>) -> Option<PersonalInfo> {
    let map = section(raw, "personal", errors)?;

    let nombre = required_text(map, "personal", "nombre", errors);
    let apellido = required_text(map, "personal", "apellido", errors);
    let rut = required_text(map, "personal", "rut", errors);
    let email = match required_text(map, "personal", "email", errors) {
        Some(email) if !is_valid_email(&email) => {
            errors.push(FieldError::new(
                "personal.email",
                "must be a valid email address",
            ));
            None
        }
        other => other,
    };
    let telefono = required_text(map, "personal", "telefono", errors);
    let direccion = required_text(map, "personal", "direccion", errors);
    let ciudad = required_text(map, "personal", "ciudad", errors);
    let region = required_text(map, "personal", "region", errors);

    Some(PersonalInfo {
        nombre: nombre?,
        apellido: apellido?,
        rut: rut?,
        email: email?,
        telefono: telefono?,
        direccion: direccion?,
        ciudad: ciudad?,
        region: region?,
    })
}

fn validate_company(raw: &Value, errors: &mut Vec<FieldError>) -> Option<CompanyInfo> {
    let map = section(raw, "company", errors)?;

    let razon_social = required_text(map, "company", "razonSocial", errors);
    let rut_empresa = required_text(map, "company", "rutEmpresa", errors);
    let giro = required_text(map, "company", "giro", errors);
    let direccion_empresa = required_text(map, "company", "direccionEmpresa", errors);
    let ciudad_empresa = required_text(map, "company", "ciudadEmpresa", errors);
    let representante_legal = required_text(map, "company", "representanteLegal", errors);
    let cargo_representante = required_text(map, "company", "cargoRepresentante", errors);

    Some(CompanyInfo {
        razon_social: razon_social?,
        rut_empresa: rut_empresa?,
        giro: giro?,
        direccion_empresa: direccion_empresa?,
        ciudad_empresa: ciudad_empresa?,
        representante_legal: representante_legal?,
        cargo_representante: cargo_representante?,
    })
}

fn validate_contract_info(raw: &Value, errors: &mut Vec<FieldError>) -> Option<ContractInfo> {
    let map = section(raw, "contract", errors)?;

    let tipo_contrato = match required_text(map, "contract", "tipoContrato", errors) {
        Some(raw_type) => match ContractType::parse(&raw_type) {
            Some(t) => Some(t),
            None => {
                let allowed: Vec<&str> = ContractType::ALL.iter().map(|t| t.as_str()).collect();
                errors.push(FieldError::new(
                    "contract.tipoContrato",
                    format!("must be one of: {}", allowed.join(", ")),
                ));
                None
            }
        },
        None => None,
    };
    let terminos_especiales = optional_text(
        map,
        "contract",
        "terminosEspeciales",
        MAX_FREE_TEXT_LEN,
        errors,
    );

    Some(ContractInfo {
        tipo_contrato: tipo_contrato?,
        terminos_especiales,
    })
}

fn validate_terms(raw: &Value, errors: &mut Vec<FieldError>) -> Option<TermsAcceptance> {
    let map = section(raw, "terms", errors)?;

    let acepta_terminos = accepted_flag(map, "terms", "aceptaTerminos", errors);
    let acepta_politica_privacidad = accepted_flag(map, "terms", "aceptaPoliticaPrivacidad", errors);
    let acepta_tratamiento_datos = accepted_flag(map, "terms", "aceptaTratamientoDatos", errors);

    Some(TermsAcceptance {
        acepta_terminos: acepta_terminos?,
        acepta_politica_privacidad: acepta_politica_privacidad?,
        acepta_tratamiento_datos: acepta_tratamiento_datos?,
    })
}

fn validate_meta(raw: &Value, errors: &mut Vec<FieldError>) -> Option<ClientMeta> {
    let map = match raw.get("_meta") {
        None | Some(Value::Null) => return None,
        Some(Value::Object(map)) => map,
        Some(_) => {
            errors.push(FieldError::new("_meta", "must be an object"));
            return None;
        }
    };

    Some(ClientMeta {
        timestamp: optional_text(map, "_meta", "timestamp", MAX_TEXT_LEN, errors),
        token: optional_text(map, "_meta", "token", MAX_TEXT_LEN, errors),
        checksum: optional_text(map, "_meta", "checksum", MAX_TEXT_LEN, errors),
        user_agent: optional_text(map, "_meta", "userAgent", MAX_TEXT_LEN, errors),
        source: optional_text(map, "_meta", "source", MAX_TEXT_LEN, errors),
    })
}
