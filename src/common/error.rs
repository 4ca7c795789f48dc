use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Campos obrigatórios ausentes antes de calcular/salvar (bloqueia a operação)
    #[error("Campos obrigatórios ausentes: {0}")]
    MissingRequiredFields(String),

    // Edição de valores sem informar o novo status
    #[error("Alteração de valores exige um status")]
    StatusRequiredForEdit,

    #[error("Valor da dívida deve ser maior que zero")]
    DebtNotComputable,

    #[error("Valores fora da faixa calculável")]
    CalculationOverflow,

    #[error("Valor da proposta não pode ser negativo")]
    NegativeProposalValue,

    #[error("Período inválido: {0}")]
    InvalidReportPeriod(i64),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Proposta não encontrada")]
    ProposalNotFound,

    #[error("Lead não encontrado")]
    LeadNotFound,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// `Ok` quando todos os campos estão presentes; senão lista os que faltam.
    pub fn check_required(fields: &[(&str, bool)]) -> Result<(), AppError> {
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingRequiredFields(missing.join(", ")))
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MissingRequiredFields(_)
            | AppError::StatusRequiredForEdit
            | AppError::NegativeProposalValue
            | AppError::InvalidReportPeriod(_) => StatusCode::BAD_REQUEST,
            AppError::DebtNotComputable | AppError::CalculationOverflow => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound | AppError::ProposalNotFound | AppError::LeadNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::MissingRequiredFields(fields) => {
                let body = Json(json!({
                    "error": "Preencha todos os campos obrigatórios.",
                    "details": fields,
                }));
                return (status, body).into_response();
            }
            AppError::StatusRequiredForEdit => {
                "Ao editar valores da proposta, informe também o status.".to_string()
            }
            AppError::DebtNotComputable => {
                "Informe um valor de dívida maior que zero para calcular a proposta.".to_string()
            }
            AppError::CalculationOverflow => {
                "Os valores informados estão fora da faixa que a calculadora suporta.".to_string()
            }
            AppError::NegativeProposalValue => {
                "O valor da proposta não pode ser negativo.".to_string()
            }
            AppError::InvalidReportPeriod(days) => {
                format!("Período de {} dias não suportado. Use 7, 30, 90 ou 365.", days)
            }
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.".to_string(),
            AppError::InvalidCredentials => "E-mail ou senha inválidos.".to_string(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".to_string(),
            AppError::UserNotFound => "Usuário não encontrado.".to_string(),
            AppError::ProposalNotFound => "Proposta não encontrada.".to_string(),
            AppError::LeadNotFound => "Lead não encontrado.".to_string(),

            // Todos os outros erros viram 500. O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
