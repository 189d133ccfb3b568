//! Command implementations.

pub mod add;
pub mod cite;
pub mod date;
pub mod items;
pub mod taxonomy;
pub mod timeline;
pub mod translate;

pub use self::add::execute_add;
pub use self::cite::execute_cite;
pub use self::date::execute_date;
pub use self::items::{execute_delete, execute_list, execute_show};
pub use self::taxonomy::{execute_facets, execute_tags};
pub use self::timeline::execute_timeline;
pub use self::translate::execute_translate;

use crate::error::{CliError, Result};
use chronicle_domain::traits::ArchiveStore;
use chronicle_domain::{ArchiveItem, ItemId, ItemType};
use chronicle_store::SqliteStore;

/// Parse an item ID argument.
pub(crate) fn parse_item_id(input: &str) -> Result<ItemId> {
    ItemId::from_string(input).map_err(CliError::InvalidInput)
}

/// Parse an item type argument.
pub(crate) fn parse_item_type(input: &str) -> Result<ItemType> {
    input.parse().map_err(CliError::InvalidInput)
}

/// Fetch an item or fail with `NotFound`.
pub(crate) fn load_item(store: &SqliteStore, id: &str) -> Result<ArchiveItem> {
    let id = parse_item_id(id)?;
    store
        .get_item(id)?
        .ok_or_else(|| CliError::NotFound(format!("No item with ID {}", id)))
}

/// Current time as Unix seconds.
pub(crate) fn now_secs() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

/// Drop blank entries and surrounding whitespace from a delimited list.
pub(crate) fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_id() {
        let id = ItemId::new();
        assert_eq!(parse_item_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_item_id("nope"), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_item_type() {
        assert_eq!(parse_item_type("Photo").unwrap(), ItemType::Photo);
        assert!(parse_item_type("sculpture").is_err());
    }

    #[test]
    fn test_load_missing_item() {
        let store = SqliteStore::new(":memory:").unwrap();
        let result = load_item(&store, &ItemId::new().to_string());
        assert!(matches!(result, Err(CliError::NotFound(_))));
    }

    #[test]
    fn test_clean_list() {
        let values = vec![" a ".to_string(), "".to_string(), "b".to_string()];
        assert_eq!(clean_list(&values), vec!["a", "b"]);
    }
}
