use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessorError {

    #[error("member `{member}` is declared as `{declared}`, cannot be read as `{requested}`")]
    TypeMismatch {
        member: &'static str,
        declared: &'static str,
        requested: &'static str,
    },

    #[error("type `{type_name}` declares member `{member}` more than once")]
    DuplicateMember {
        type_name: &'static str,
        member: &'static str,
    },

    #[error("type `{type_name}` has no accessible member `{member}`")]
    UnknownMember {
        type_name: &'static str,
        member: String,
    },

    #[error("invalid value `{value}` for {key}")]
    InvalidConfig {
        key: &'static str,
        value: String,
    },
}
