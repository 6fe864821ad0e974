//! `flock import` command - CSV import with merge/replace reconciliation

use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::entity::Record;
use crate::core::identity::EntityPrefix;
use crate::core::{store, Project};
use crate::import::materialize::RowView;
use crate::import::parser::CsvTable;
use crate::import::{mapper, materialize, parser, resolve, ColumnMap, ImportMode};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Collection to import into (members, visitors, converts)
    #[arg(value_parser = parse_entity_type)]
    pub entity: Option<EntityPrefix>,

    /// CSV file to import
    pub file: Option<PathBuf>,

    /// Print a CSV template for the collection instead of importing
    #[arg(long)]
    pub template: bool,

    /// How the batch combines with the existing collection. Replace is
    /// destructive: the previous collection is discarded with no undo.
    #[arg(long, value_enum, default_value_t = ImportMode::Replace)]
    pub mode: ImportMode,

    /// Enable column mapping (auto-proposed, overridable) instead of
    /// requiring the exact header set
    #[arg(long)]
    pub map: bool,

    /// Override a proposed mapping: --col "Full Name=Name" (repeatable,
    /// implies --map)
    #[arg(long = "col", value_name = "FIELD=HEADER")]
    pub cols: Vec<String>,

    /// Review the proposed mapping interactively (implies --map)
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Validate and report without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_entity_type(s: &str) -> std::result::Result<EntityPrefix, String> {
    match s.to_lowercase().as_str() {
        "members" | "member" | "mbr" => Ok(EntityPrefix::Mbr),
        "visitors" | "visitor" | "vis" => Ok(EntityPrefix::Vis),
        "converts" | "convert" | "cvt" => Ok(EntityPrefix::Cvt),
        _ => Err(format!(
            "Unsupported collection: '{}'. Supported: members, visitors, converts",
            s
        )),
    }
}

/// Import statistics
#[derive(Default)]
struct ImportStats {
    rows_processed: usize,
    existing_records: usize,
    duplicates_skipped: usize,
    final_count: usize,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    // Handle template generation
    if args.template {
        let entity = args.entity.ok_or_else(|| {
            miette::miette!(
                "Collection required for template generation. Usage: flock import --template members"
            )
        })?;
        return generate_template(entity);
    }

    let entity = args.entity.ok_or_else(|| {
        miette::miette!("Collection required. Usage: flock import members data.csv")
    })?;

    let file_path = args
        .file
        .clone()
        .ok_or_else(|| miette::miette!("CSV file required. Usage: flock import members data.csv"))?;

    if !file_path.exists() {
        return Err(miette::miette!("File not found: {}", file_path.display()));
    }

    let project = super::open_project(global)?;
    let mapping_mode = args.map || args.interactive || !args.cols.is_empty();

    if !global.quiet {
        println!(
            "{} Importing {} from {} in {} mode{}",
            style("→").blue(),
            style(entity.collection_dir()).cyan(),
            style(file_path.display()).yellow(),
            style(args.mode).cyan(),
            if args.dry_run {
                style(" (dry run)").dim().to_string()
            } else {
                String::new()
            }
        );
        println!();
    }

    let text = std::fs::read_to_string(&file_path).into_diagnostic()?;
    let table = parser::parse(&text).map_err(|e| miette::miette!("{}", e))?;

    // Header gate: strict header check, or a validated column map
    let map = if mapping_mode {
        let mut map = mapper::auto_map(entity, &table.headers);
        apply_overrides(entity, &table, &mut map, &args.cols)?;
        if args.interactive {
            review_mapping(entity, &table, &mut map)?;
        }
        mapper::validate_map(entity, &map).map_err(|e| miette::miette!("{}", e))?;
        Some(map)
    } else {
        mapper::validate_strict(entity, &table.headers).map_err(|e| miette::miette!("{}", e))?;
        None
    };

    let stats = match entity {
        EntityPrefix::Mbr => import_collection(
            &project,
            entity,
            &table,
            map.as_ref(),
            args.mode,
            args.dry_run,
            materialize::member,
        )?,
        EntityPrefix::Vis => import_collection(
            &project,
            entity,
            &table,
            map.as_ref(),
            args.mode,
            args.dry_run,
            materialize::visitor,
        )?,
        EntityPrefix::Cvt => import_collection(
            &project,
            entity,
            &table,
            map.as_ref(),
            args.mode,
            args.dry_run,
            materialize::convert,
        )?,
    };

    if !global.quiet {
        println!("{}", style("─".repeat(50)).dim());
        println!("{}", style("Import Summary").bold());
        println!("{}", style("─".repeat(50)).dim());
        println!("  Rows processed:     {}", style(stats.rows_processed).cyan());
        if args.mode == ImportMode::Merge {
            println!(
                "  Existing records:   {}",
                style(stats.existing_records).cyan()
            );
            println!(
                "  Duplicates skipped: {}",
                style(stats.duplicates_skipped).dim()
            );
        } else if stats.existing_records > 0 {
            println!(
                "  Records replaced:   {}",
                style(stats.existing_records).red()
            );
        }
        println!(
            "  Collection size:    {}",
            style(stats.final_count).green()
        );

        if args.dry_run {
            println!();
            println!(
                "{}",
                style("Dry run complete. Nothing was written.").yellow()
            );
        }
    }

    Ok(())
}

/// Print a CSV template for a collection (headers only, like the export)
fn generate_template(entity: EntityPrefix) -> Result<()> {
    println!("{}", mapper::mappable_headers(entity).join(","));

    // Usage hint to stderr so it doesn't interfere with redirected output
    eprintln!();
    eprintln!(
        "{} Template generated. Redirect to file: flock import --template {} > {}.csv",
        style("→").blue(),
        entity.collection_dir(),
        entity.collection_dir()
    );

    Ok(())
}

/// Apply --col "FIELD=HEADER" overrides onto the proposed map
fn apply_overrides(
    entity: EntityPrefix,
    table: &CsvTable,
    map: &mut ColumnMap,
    overrides: &[String],
) -> Result<()> {
    for raw in overrides {
        let (field, source) = raw.split_once('=').ok_or_else(|| {
            miette::miette!("invalid --col '{}': expected FIELD=HEADER", raw)
        })?;
        let field = field.trim();
        let source = source.trim();

        if !mapper::mappable_headers(entity).iter().any(|f| *f == field) {
            return Err(miette::miette!(
                "unknown field '{}' for {} (valid: {})",
                field,
                entity.collection_dir(),
                mapper::mappable_headers(entity).join(", ")
            ));
        }
        if source.is_empty() {
            map.unset(field);
            continue;
        }
        if table.header_index(source).is_none() {
            return Err(miette::miette!(
                "source header '{}' not present in the CSV (headers: {})",
                source,
                table.headers.join(", ")
            ));
        }
        map.set(field, source);
    }
    Ok(())
}

/// Interactive review: one select per field, defaulting to the proposal
fn review_mapping(
    entity: EntityPrefix,
    table: &CsvTable,
    map: &mut ColumnMap,
) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut items: Vec<String> = vec!["(not mapped)".to_string()];
    items.extend(table.headers.iter().cloned());

    for field in mapper::mappable_headers(entity) {
        let default = map
            .get(field)
            .and_then(|source| table.header_index(source))
            .map(|idx| idx + 1)
            .unwrap_or(0);

        let chosen = Select::with_theme(&theme)
            .with_prompt(field)
            .items(&items)
            .default(default)
            .interact()
            .into_diagnostic()?;

        if chosen == 0 {
            map.unset(field);
        } else {
            map.set(field, &table.headers[chosen - 1]);
        }
    }
    Ok(())
}

/// Materialize the batch, combine it with the existing collection, and
/// (unless dry-running) replace the stored collection with the result.
fn import_collection<T, F>(
    project: &Project,
    entity: EntityPrefix,
    table: &CsvTable,
    map: Option<&ColumnMap>,
    mode: ImportMode,
    dry_run: bool,
    build: F,
) -> Result<ImportStats>
where
    T: Record + 'static,
    F: Fn(&RowView) -> T,
{
    let batch: Vec<T> = table
        .rows
        .iter()
        .map(|row| build(&RowView::new(table, row, map)))
        .collect();

    let dir = project.collection_dir(entity);
    let existing: Vec<T> = store::load_all(&dir).map_err(|e| miette::miette!("{}", e))?;

    let mut stats = ImportStats {
        rows_processed: batch.len(),
        existing_records: existing.len(),
        ..ImportStats::default()
    };

    let combined_input = existing.len() + batch.len();
    let resolved = resolve::resolve(mode, existing, batch);
    stats.final_count = resolved.len();
    if mode == ImportMode::Merge {
        stats.duplicates_skipped = combined_input - resolved.len();
    }

    if !dry_run {
        store::replace_all(&dir, &resolved).map_err(|e| miette::miette!("{}", e))?;
    }

    Ok(stats)
}
