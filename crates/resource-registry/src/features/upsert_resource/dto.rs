use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertResourceCommand {
    pub id: String,
    pub name: String,
    pub protocol: String,
    pub endpoint: String,
    pub sensitivity: String,
    pub owning_teams: BTreeSet<String>,
    pub authorized_teams: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceView {
    pub id: String,
    pub name: String,
    pub protocol: String,
    pub sensitivity: String,
    pub authorized_teams: BTreeSet<String>,
    pub retired: bool,
}

impl From<kernel::Resource> for ResourceView {
    fn from(resource: kernel::Resource) -> Self {
        Self {
            id: resource.id.to_string(),
            name: resource.name,
            protocol: resource.protocol,
            sensitivity: format!("{:?}", resource.sensitivity).to_ascii_lowercase(),
            authorized_teams: resource.authorized_teams,
            retired: resource.retired,
        }
    }
}
