use serde::{Deserialize, Serialize};

/// One assessment result, attributed to the subject heading above its table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub subject: String,
    pub task: String,
    pub result: String,
    pub date: String,
}
