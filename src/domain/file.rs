use serde::Deserialize;

use super::FileId;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub file_id: FileId,
    pub display_name: String,
}
