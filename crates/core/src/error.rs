use crate::types::TemplateId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: TemplateId },

    #[error("Validation failed: {0}")]
    Validation(String),
}
