use serde::{Deserialize, Serialize};

use crate::entity::{Record, non_empty};
use crate::id::EntityId;

/// A remote machine that rules and sessions refer to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: Option<EntityId>,
    pub label: Option<String>,
    pub address: Option<String>,
    pub port: Option<u16>,
}

impl Record for Host {
    const KIND: &'static str = "host";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.map(|id| id.to_string()),
            "label" => non_empty(self.label.as_deref()),
            "address" => non_empty(self.address.as_deref()),
            "port" => self.port.map(|p| p.to_string()),
            _ => None,
        }
    }
}
