//! Command dispatch: load the item file, run the core operation, print.

use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{DefaultTreeBuilder, TreeBuilder, TreeService};
use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::{expand_path, OutputFormat, Settings};
use crate::domain::{DomainError, GridRow, ItemAttributes, ItemId, TreeItem};
use crate::infrastructure::traits::RealFileSystem;
use crate::infrastructure::{InfraError, ItemLoader};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    if !settings.color {
        colored::control::set_override(false);
    }
    debug!("settings: {:?}", settings);
    let ctx = Context {
        settings,
        loader: ItemLoader::new(Arc::new(RealFileSystem)),
    };

    match command {
        Commands::Flatten { file, format } => {
            ctx.flatten(file, format.unwrap_or(ctx.settings.format))
        }
        Commands::Tree { file } => ctx.tree(file),
        Commands::Get { file, id } => ctx.get(file, &id.item_id()?),
        Commands::Children { file, id, all } => ctx.children(file, &id.item_id()?, *all),
        Commands::Parents { file, id } => ctx.parents(file, &id.item_id()?),
        Commands::Remove { file, id } => ctx.remove(file, &id.item_id()?),
        Commands::Check { file } => ctx.check(file),
        Commands::Config => {
            output::info(&ctx.settings.to_toml()?);
            Ok(())
        }
        Commands::Completion { .. } => Ok(()),
    }
}

struct Context {
    settings: Settings,
    loader: ItemLoader,
}

impl Context {
    fn load(&self, file: &Path) -> CliResult<TreeService> {
        Ok(self.loader.load_service(&expand_path(file))?)
    }

    fn builder(&self) -> DefaultTreeBuilder {
        DefaultTreeBuilder::new(self.settings.label_key.clone())
    }

    #[instrument(level = "debug", skip(self))]
    fn flatten(&self, file: &Path, format: OutputFormat) -> CliResult<()> {
        let service = self.load(file)?;
        let rows = self.builder().build_flat_tree(&service);
        print_rows(&rows, format)
    }

    #[instrument(level = "debug", skip(self))]
    fn tree(&self, file: &Path) -> CliResult<()> {
        let service = self.load(file)?;
        let rows = self.builder().build_flat_tree(&service);
        for tree in rows.to_tree_strings() {
            output::info(&tree);
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn get(&self, file: &Path, id: &ItemId) -> CliResult<()> {
        let service = self.load(file)?;
        let item = require(&service, id)?;
        let json = serde_json::to_string_pretty(item)
            .map_err(|e| InfraError::io("serialize item", e.into()))?;
        output::info(&json);
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn children(&self, file: &Path, id: &ItemId, all: bool) -> CliResult<()> {
        let service = self.load(file)?;
        require(&service, id)?;
        let items = if all {
            service.get_all_children(id)
        } else {
            service.get_children(id)
        };
        self.print_items(&items);
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn parents(&self, file: &Path, id: &ItemId) -> CliResult<()> {
        let service = self.load(file)?;
        require(&service, id)?;
        self.print_items(&service.get_all_parents(id));
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn remove(&self, file: &Path, id: &ItemId) -> CliResult<()> {
        let mut service = self.load(file)?;
        let removed = service.remove_item(id);
        if removed.is_empty() {
            output::warning(&format!("item {} not found, nothing removed", id));
        } else {
            output::removed(&removed);
        }
        let rows = self.builder().build_flat_tree(&service);
        print_rows(&rows, self.settings.format)
    }

    #[instrument(level = "debug", skip(self))]
    fn check(&self, file: &Path) -> CliResult<()> {
        let service = self.load(file)?;
        let rows = self.builder().build_flat_tree(&service);
        let reachable: HashSet<&ItemId> = rows.iter().map(|row| &row.id).collect();
        let dangling: Vec<_> = service
            .get_all_items()
            .into_iter()
            .filter(|item| !reachable.contains(&item.id))
            .collect();

        output::header(&file.display());
        output::detail(&format!("items: {}", service.len()));
        output::detail(&format!("roots: {}", service.get_root_items().len()));
        output::detail(&format!("rows:  {}", rows.len()));

        if dangling.is_empty() {
            output::success("all items reachable from a root");
        } else {
            output::warning(&format!("{} dangling items", dangling.len()));
            for item in &dangling {
                output::dangling(&item.id, &item.parent);
            }
        }
        Ok(())
    }

    fn print_items(&self, items: &[&TreeItem]) {
        for item in items {
            let label = item
                .attributes
                .label(&self.settings.label_key)
                .unwrap_or_else(|| item.id.to_string());
            output::item(&item.id, &label, &item.parent);
        }
    }
}

fn require<'s>(service: &'s TreeService, id: &ItemId) -> CliResult<&'s TreeItem> {
    service
        .get_item(id)
        .ok_or_else(|| InfraError::from(DomainError::NotFound(id.clone())).into())
}

fn print_rows(rows: &[GridRow], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(rows)
                .map_err(|e| InfraError::io("serialize rows", e.into()))?;
            output::info(&json);
        }
        OutputFormat::Table => {
            for line in format_table(rows) {
                output::info(&line);
            }
        }
    }
    Ok(())
}

/// Aligned text table; labels are indented by level.
pub fn format_table(rows: &[GridRow]) -> Vec<String> {
    let label_width = rows
        .iter()
        .map(|row| row.level * 2 + row.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Label".len());

    let mut lines = vec![format!(
        "{:>4}  {:<8}{:<width$}  {}",
        "#",
        "Category",
        "Label",
        "Path",
        width = label_width
    )];
    lines.extend(rows.iter().map(|row| {
        let label = format!("{}{}", "  ".repeat(row.level), row.label);
        format!(
            "{:>4}  {:<8}{:<width$}  {}",
            row.row_number,
            row.category.to_string(),
            label,
            row.path.join("/"),
            width = label_width
        )
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, ParentId};

    #[test]
    fn test_format_table_indents_by_level() {
        let service = TreeService::new(vec![
            TreeItem::labeled(1, ParentId::Root, "A"),
            TreeItem::labeled(2, ItemId::from(1), "B"),
        ])
        .unwrap();
        let rows = DefaultTreeBuilder::default().build_flat_tree(&service);

        let lines = format_table(&rows);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Category"));
        assert!(lines[1].contains(&Category::Group.to_string()));
        assert!(lines[2].contains("  B"));
        assert!(lines[2].trim_end().ends_with("1/2"));
    }
}
