/// One row of the legacy table store, columns copied out verbatim.
///
/// A column missing from the stored row reads as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyRecord {
    pub key: String,
    pub date: String,
    pub company: String,
    pub project: String,
    pub sub_project: String,
    pub hours: String,
    pub description: String,
}
