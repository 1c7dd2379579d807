use sshconfig_core::{CoreResult, Record};
use sshconfig_store::{GetStrategy, Storage};

/// Handle given to entity handlers for resolving related records.
pub struct RelationResolver<'a, S, G> {
    storage: &'a S,
    strategy: &'a G,
}

impl<'a, S, G> RelationResolver<'a, S, G>
where
    S: Storage,
    G: GetStrategy,
{
    pub fn new(storage: &'a S, strategy: &'a G) -> Self {
        Self { storage, strategy }
    }

    /// Resolve the single record of type `R` named by `token`.
    pub fn get<R: Record>(&self, token: &str) -> CoreResult<R> {
        self.strategy.get(self.storage, token)
    }
}
