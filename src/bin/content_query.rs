//! Query CLI over the published content registry.
//!
//! Every command prints JSON on stdout. Lookups that find nothing print an
//! error on stderr and exit 1, mirroring the NotFound outcome of the library.

use anyhow::{Context, Result, bail};
use lessonbank::{
    Difficulty, EntryFilter, Library, load_library, resolve_content_root,
    runtime::{init_logging, take_root_flag},
    split_list,
};
use serde::Serialize;
use serde_json::json;
use std::env;
use std::ffi::OsString;

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

enum Command {
    Catalogs,
    Catalog(String),
    Entry(String, String),
    Siblings(String, String),
    Xref(String),
    Filter(String, EntryFilter),
    Next(String, String),
    Prev(String, String),
    Stats(String),
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: content-query [--root DIR] <command>\n\nCommands:\n  catalogs                       List catalogs in registration order.\n  catalog <id>                   Print one catalog.\n  entry <catalog> <entry>        Print one entry with its category and position.\n  siblings <catalog> <entry>     Entries in other catalogs sharing the crossLanguageId.\n  xref <crossLanguageId>         Every entry carrying the id.\n  filter <catalog> [--tags a,b] [--all-tags a,b] [--difficulty d] [--max-difficulty d] [--quiz] [--challenge]\n  next <catalog> <entry>         The following entry in catalog order.\n  prev <catalog> <entry>         The preceding entry in catalog order.\n  stats <catalog>                Entry, quiz, and challenge counts."
    );
    std::process::exit(code);
}

fn parse_command(args: Vec<String>) -> Result<Command> {
    let mut args = args.into_iter();
    let Some(name) = args.next() else {
        usage(1);
    };
    let command = match name.as_str() {
        "catalogs" => Command::Catalogs,
        "catalog" => Command::Catalog(required(&mut args, &name, "id")?),
        "entry" => Command::Entry(
            required(&mut args, &name, "catalog")?,
            required(&mut args, &name, "entry")?,
        ),
        "siblings" => Command::Siblings(
            required(&mut args, &name, "catalog")?,
            required(&mut args, &name, "entry")?,
        ),
        "xref" => Command::Xref(required(&mut args, &name, "crossLanguageId")?),
        "next" => Command::Next(
            required(&mut args, &name, "catalog")?,
            required(&mut args, &name, "entry")?,
        ),
        "prev" => Command::Prev(
            required(&mut args, &name, "catalog")?,
            required(&mut args, &name, "entry")?,
        ),
        "stats" => Command::Stats(required(&mut args, &name, "catalog")?),
        "filter" => {
            let catalog = required(&mut args, &name, "catalog")?;
            Command::Filter(catalog, parse_filter(&mut args)?)
        }
        "--help" | "-h" | "help" => usage(0),
        other => bail!("unknown command '{other}' (see --help)"),
    };
    if let Some(extra) = args.next() {
        bail!("unexpected argument '{extra}' for '{name}'");
    }
    Ok(command)
}

fn required(args: &mut impl Iterator<Item = String>, command: &str, what: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("'{command}' requires <{what}>"))
}

fn parse_filter(args: &mut impl Iterator<Item = String>) -> Result<EntryFilter> {
    let mut filter = EntryFilter::default();
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--tags" => filter.any_tags = split_list(&required(args, &flag, "tags")?),
            "--all-tags" => filter.all_tags = split_list(&required(args, &flag, "tags")?),
            "--difficulty" => {
                filter.difficulty = Some(parse_difficulty(&required(args, &flag, "difficulty")?)?)
            }
            "--max-difficulty" => {
                filter.max_difficulty =
                    Some(parse_difficulty(&required(args, &flag, "difficulty")?)?)
            }
            "--quiz" => filter.has_quiz = true,
            "--challenge" => filter.has_challenge = true,
            other => bail!("unknown filter flag '{other}'"),
        }
    }
    Ok(filter)
}

fn parse_difficulty(value: &str) -> Result<Difficulty> {
    let difficulty = Difficulty::parse(value);
    if !difficulty.is_known() {
        bail!("unknown difficulty '{value}' (expected beginner, intermediate, or advanced)");
    }
    Ok(difficulty)
}

fn run() -> Result<()> {
    let args: Vec<OsString> = env::args_os().skip(1).collect();
    let (root, rest) = take_root_flag(args)?;
    let rest = rest
        .into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|_| anyhow::anyhow!("Invalid UTF-8 in argument"))
        })
        .collect::<Result<Vec<_>>>()?;
    let command = parse_command(rest)?;

    let root = resolve_content_root(root.as_deref())?;
    let library = load_library(&root)?;
    execute(&library, command)
}

fn execute(library: &Library, command: Command) -> Result<()> {
    match command {
        Command::Catalogs => {
            let listing: Vec<_> = library
                .registry()
                .catalogs()
                .map(|catalog| {
                    json!({
                        "id": catalog.id(),
                        "kind": catalog.metadata.kind,
                        "label": catalog.metadata.label,
                        "icon": catalog.metadata.icon,
                        "color": catalog.metadata.color,
                        "tagline": catalog.metadata.tagline,
                        "categories": catalog.categories.len(),
                        "entries": catalog.entry_count(),
                    })
                })
                .collect();
            print_json(&listing)
        }
        Command::Catalog(id) => {
            let catalog = library
                .get_catalog(&id)
                .with_context(|| format!("catalog '{id}' not found"))?;
            print_json(catalog)
        }
        Command::Entry(catalog, entry) => {
            let located = library
                .locate_entry(&catalog, &entry)
                .with_context(|| format!("entry '{entry}' not found in catalog '{catalog}'"))?;
            print_json(&json!({
                "catalogId": located.catalog_id,
                "categoryId": located.category.id,
                "position": located.position,
                "entry": located.entry,
            }))
        }
        Command::Siblings(catalog, entry) => {
            if library.get_entry(&catalog, &entry).is_none() {
                bail!("entry '{entry}' not found in catalog '{catalog}'");
            }
            print_json(&library.get_cross_language_siblings(&catalog, &entry))
        }
        Command::Xref(id) => print_json(&library.lookup_cross_references(&id)),
        Command::Filter(catalog, filter) => {
            let entries = library
                .filter(&catalog, &filter)
                .with_context(|| format!("catalog '{catalog}' not found"))?;
            print_json(&entries)
        }
        Command::Next(catalog, entry) => {
            ensure_entry(library, &catalog, &entry)?;
            let next = library.next_entry(&catalog, &entry);
            print_json(&next.map(|located| located.entry.id.clone()))
        }
        Command::Prev(catalog, entry) => {
            ensure_entry(library, &catalog, &entry)?;
            let previous = library.previous_entry(&catalog, &entry);
            print_json(&previous.map(|located| located.entry.id.clone()))
        }
        Command::Stats(catalog) => {
            let stats = library
                .catalog_stats(&catalog)
                .with_context(|| format!("catalog '{catalog}' not found"))?;
            print_json(&stats)
        }
    }
}

fn ensure_entry(library: &Library, catalog: &str, entry: &str) -> Result<()> {
    if library.get_entry(catalog, entry).is_none() {
        bail!("entry '{entry}' not found in catalog '{catalog}'");
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
