//! Implementation of the `etomyte list` command.

use std::collections::BTreeMap;

use etomyte_core::application::ContentProvider;

use crate::{
    cli::{ListArgs, ListFormat, ListKind, global::GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let provider = super::open_site(&global.project_dir(), &config)?;
    let kinds = match args.kind {
        Some(kind) => vec![kind],
        None => ListKind::ALL.to_vec(),
    };
    let listing = collect(&provider, &kinds);

    let format = if output.wants_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            for (kind, names) in &listing {
                output.header(&format!("{}:", title(*kind)))?;
                if names.is_empty() {
                    output.print("  (none)")?;
                }
                for name in names {
                    output.print(&format!("  {name}"))?;
                }
            }
        }

        // Machine formats bypass quiet mode so pipes always get data.
        ListFormat::List => {
            let single = listing.len() == 1;
            for (kind, names) in &listing {
                for name in names {
                    if single {
                        output.emit(name)?;
                    } else {
                        output.emit(&format!("{kind}\t{name}"))?;
                    }
                }
            }
        }

        ListFormat::Json => {
            let map: BTreeMap<String, &Vec<String>> = listing
                .iter()
                .map(|(kind, names)| (kind.to_string(), names))
                .collect();
            output.json(&map)?;
        }

        ListFormat::Csv => {
            output.emit("kind,name")?;
            for (kind, names) in &listing {
                for name in names {
                    output.emit(&format!("{kind},{}", csv_field(name)))?;
                }
            }
        }
    }

    Ok(())
}

fn collect(provider: &dyn ContentProvider, kinds: &[ListKind]) -> Vec<(ListKind, Vec<String>)> {
    kinds
        .iter()
        .map(|kind| (*kind, provider.list(kind.class())))
        .collect()
}

fn title(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Pages => "Pages",
        ListKind::Templates => "Templates",
        ListKind::Snippets => "Snippets",
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
