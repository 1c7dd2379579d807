use serde::{Deserialize, Serialize};

use crate::binding::{BindingSpec, ForwardingType};
use crate::entity::{Record, Relation, non_empty};
use crate::id::EntityId;
use crate::models::Host;

/// Port-forwarding rule attached to a host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PfRule {
    pub id: Option<EntityId>,
    pub label: Option<String>,
    pub host: Option<EntityId>,
    pub pf_type: Option<ForwardingType>,
    #[serde(flatten)]
    pub binding: BindingSpec,
}

impl PfRule {
    /// Replace the four binding positions at once.
    pub fn apply_binding(&mut self, binding: BindingSpec) {
        self.binding = binding;
    }
}

impl Record for PfRule {
    const KIND: &'static str = "pfrule";

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

    fn relations(&self) -> Vec<Relation> {
        self.host
            .map(|id| Relation::new(Host::KIND, id))
            .into_iter()
            .collect()
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.map(|id| id.to_string()),
            "label" => non_empty(self.label.as_deref()),
            "host" => self.host.map(|id| id.to_string()),
            "type" | "pf_type" => self.pf_type.map(|t| t.letter().to_string()),
            "binding" => (!self.binding.is_empty()).then(|| self.binding.to_string()),
            "bound_address" => non_empty(self.binding.bound_address.as_deref()),
            "local_port" => non_empty(Some(self.binding.local_port.as_str())),
            "hostname" => non_empty(Some(self.binding.hostname.as_str())),
            "remote_port" => non_empty(Some(self.binding.remote_port.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_the_only_relation() {
        let rule = PfRule {
            host: Some(EntityId::new(7)),
            ..PfRule::default()
        };
        assert_eq!(rule.relations(), vec![Relation::new("host", EntityId::new(7))]);
        assert!(PfRule::default().relations().is_empty());
    }

    #[test]
    fn binding_field_is_unset_until_a_binding_is_applied() {
        let mut rule = PfRule::default();
        assert_eq!(rule.field("binding"), None);
        rule.apply_binding(ForwardingType::Local.parse_binding("8080:example.com:80").unwrap());
        assert_eq!(rule.field("binding").as_deref(), Some("8080:example.com:80"));
        assert_eq!(rule.field("hostname").as_deref(), Some("example.com"));
    }

    #[test]
    fn serializes_with_flat_binding_and_type_letter() {
        let rule = PfRule {
            id: Some(EntityId::new(1)),
            label: None,
            host: Some(EntityId::new(2)),
            pf_type: Some(ForwardingType::Dynamic),
            binding: ForwardingType::Dynamic.parse_binding("9050").unwrap(),
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["pf_type"], "D");
        assert_eq!(json["local_port"], "9050");
        assert_eq!(json["hostname"], "");
        let back: PfRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }
}
