//! Show, list and delete commands.

use crate::cli::{DeleteArgs, ListArgs, ShowArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chronicle_domain::traits::ArchiveStore;
use chronicle_domain::ItemListQuery;
use chronicle_store::SqliteStore;
use std::io::{self, Write};

/// Execute the show command.
pub fn execute_show(args: ShowArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let item = super::load_item(store, &args.id)?;
    let translations = store.get_translations(item.id, None)?;
    println!("{}", formatter.format_item(&item, &translations)?);
    Ok(())
}

/// Execute the list command.
pub fn execute_list(
    args: ListArgs,
    store: &SqliteStore,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let query = list_query(&args, config.settings.page_size)?;
    let items = store.list_items(&query)?;
    println!("{}", formatter.format_items(&items)?);
    Ok(())
}

/// Build the store query for one page of results.
fn list_query(args: &ListArgs, page_size: usize) -> Result<ItemListQuery> {
    if args.page == 0 {
        return Err(CliError::InvalidInput("Pages start at 1".to_string()));
    }
    let limit = args.limit.unwrap_or(page_size);
    if limit == 0 {
        return Err(CliError::InvalidInput("--limit must be greater than 0".to_string()));
    }

    Ok(ItemListQuery {
        item_type: args.item_type.as_deref().map(super::parse_item_type).transpose()?,
        tag: args
            .tag
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string),
        limit: Some(limit),
        offset: (args.page - 1) * limit,
    })
}

/// Execute the delete command.
pub fn execute_delete(args: DeleteArgs, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    let item = super::load_item(store, &args.id)?;

    // Confirm deletion unless --yes is specified
    if !args.yes {
        println!("About to delete '{}' ({})", item.title, item.id);
        print!("Continue? [y/N] ");
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    store.delete_item(item.id)?;
    println!("{}", formatter.success(&format!("Deleted '{}'", item.title)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use chronicle_domain::{ArchiveItem, ItemType};

    fn list_args(page: usize, limit: Option<usize>) -> ListArgs {
        ListArgs {
            item_type: None,
            tag: None,
            limit,
            page,
        }
    }

    #[test]
    fn test_list_query_paging() {
        let query = list_query(&list_args(3, None), 20).unwrap();
        assert_eq!(query.limit, Some(20));
        assert_eq!(query.offset, 40);

        let query = list_query(&list_args(2, Some(5)), 20).unwrap();
        assert_eq!(query.offset, 5);
    }

    #[test]
    fn test_list_query_filters() {
        let args = ListArgs {
            item_type: Some("photo".to_string()),
            tag: Some("  ".to_string()),
            limit: None,
            page: 1,
        };
        let query = list_query(&args, 10).unwrap();
        assert_eq!(query.item_type, Some(ItemType::Photo));
        assert!(query.tag.is_none());
    }

    #[test]
    fn test_list_query_rejects_bad_paging() {
        assert!(list_query(&list_args(0, None), 20).is_err());
        assert!(list_query(&list_args(1, Some(0)), 20).is_err());
    }

    #[test]
    fn test_delete_with_yes() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let id = store
            .insert_item(&ArchiveItem::new("Old map", ItemType::Photo, "ayse", 0))
            .unwrap();

        let args = DeleteArgs {
            id: id.to_string(),
            yes: true,
        };
        execute_delete(args, &mut store, &Formatter::new(OutputFormat::Table, false)).unwrap();
        assert!(store.get_item(id).unwrap().is_none());
    }
}
