//! Resolve user tokens (IDs or labels) into stored records.

use sshconfig_core::{CoreError, CoreResult, EntityId, Record};
use sshconfig_store::{Filter, Predicate, Storage};

/// Split tokens into ID candidates and label candidates.
///
/// Numeric tokens are tried as IDs; every token, numeric or not, is also
/// tried as a label.
pub fn parse_ids_names(tokens: &[String]) -> (Vec<EntityId>, Vec<String>) {
    let ids = tokens
        .iter()
        .filter_map(|t| t.parse::<EntityId>().ok())
        .collect();
    (ids, tokens.to_vec())
}

/// Records whose id or label matches any token, each at most once.
///
/// Results follow the order of the first token that matched them.
pub fn get_objects<S: Storage, R: Record>(storage: &S, tokens: &[String]) -> CoreResult<Vec<R>> {
    let (ids, names) = parse_ids_names(tokens);
    let filter = Filter::any([Predicate::IdIn(ids), Predicate::LabelIn(names)]);
    let mut records: Vec<R> = storage.filter(&filter)?;

    if records.is_empty() {
        return Err(CoreError::does_not_exist(format!(
            "no {} matches {}",
            R::KIND,
            tokens.join(", ")
        )));
    }

    records.sort_by_key(|r| first_matching_token(tokens, r));
    tracing::debug!(kind = R::KIND, count = records.len(), "resolved entries");
    Ok(records)
}

fn first_matching_token<R: Record>(tokens: &[String], record: &R) -> usize {
    tokens
        .iter()
        .position(|t| {
            record.label() == Some(t.as_str())
                || record.id().is_some_and(|id| t.parse::<EntityId>() == Ok(id))
        })
        .unwrap_or(usize::MAX)
}
