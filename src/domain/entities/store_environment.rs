use serde::Deserialize;

/// The server environment where a signed transaction was generated.
///
/// Only transactions backed by the signed-transaction API generation carry
/// an environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum StoreEnvironment {
    /// The transaction was generated in the production environment.
    Production,
    /// The transaction was generated while testing in the sandbox.
    Sandbox,

    #[serde(untagged)]
    Other(String),
}
