use thiserror::Error;

/// Errors raised while setting up an import session.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Model(#[from] intake_model::ModelError),

    #[error(transparent)]
    Mapping(#[from] intake_map::MappingError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
