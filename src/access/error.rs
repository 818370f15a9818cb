/// Static misconfiguration of the role tables. Raised at startup only; a
/// running gate never produces one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleConfigError {
    #[error("role table `{table}` is empty")]
    EmptyRoleSet { table: String },
    #[error("role table `{table}` lists `{role}` more than once")]
    DuplicateRole { table: String, role: String },
    #[error("role table `{table}` contains a blank role name")]
    BlankRole { table: String },
    #[error("unknown role scope `{0}`; expected one of: organization, realm")]
    UnknownScope(String),
    #[error("unknown privilege tier `{0}`; expected one of: admin, resource")]
    UnknownTier(String),
}
