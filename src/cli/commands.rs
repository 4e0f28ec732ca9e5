//! Command dispatch
//!
//! Thin handlers over the service container; all user-facing text goes
//! through `cli::output` and every failure maps to a sysexits code in main.

use std::io;
use std::path::Path;

use clap::{Command, CommandFactory};
use clap_complete::{generate, Generator};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands, ShowFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{self, Settings};
use crate::domain::{
    reparent, DropZoneClassifier, MergeError, Placement, PlacementIntent, PointerPos, TargetRect,
};
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // Completions need no settings and must not fail on a broken config.
    if let Commands::Completion { shell } = &cli.command {
        return _completion(*shell);
    }

    let settings = Settings::load(cli.local_dir.as_deref())?;
    debug!("effective settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Commands::Merge {
            language,
            file,
            snippet,
            write,
        } => _merge(&container, language, file, snippet.as_deref(), *write),
        Commands::Classify {
            x,
            y,
            top,
            left,
            width,
            height,
            fraction,
        } => _classify(
            &container,
            PointerPos::new(*x, *y),
            TargetRect::new(*top, *left, *width, *height),
            *fraction,
        ),
        Commands::Move {
            snapshot,
            source,
            target,
            placement,
        } => _move(&container, snapshot, source, target, (*placement).into()),
        Commands::Add {
            snapshot,
            id,
            label,
            parent,
        } => _add(
            &container,
            snapshot,
            id.clone(),
            label.clone(),
            parent.as_deref(),
        ),
        Commands::Remove { snapshot, id } => _remove(&container, snapshot, id),
        Commands::Show { snapshot, format } => _show(&container, snapshot, *format),
        Commands::Instructions { language } => _instructions(&container, language.as_deref()),
        Commands::Config { command } => _config(&container, command, cli.local_dir.as_deref()),
        Commands::Completion { .. } => unreachable!("handled before settings load"),
    }
}

#[instrument(skip(container))]
fn _merge(
    container: &ServiceContainer,
    language: &str,
    file: &Path,
    snippet: Option<&Path>,
    write: bool,
) -> CliResult<()> {
    let snippet_text = match snippet {
        Some(path) => container
            .fs
            .read_to_string(path)
            .with_path_context("read snippet", path)?,
        None => {
            io::read_to_string(io::stdin()).map_err(|e| ApplicationError::OperationFailed {
                context: "read snippet from stdin".to_string(),
                source: e,
            })?
        }
    };

    if write {
        container
            .merge
            .merge_into_file(language, file, &snippet_text)?;
        output::success(&format!(
            "merged {} snippet into {}",
            language,
            file.display()
        ));
    } else {
        let merged = container.merge.merge_text(language, file, &snippet_text)?;
        output::info(&merged);
    }
    Ok(())
}

fn _classify(
    container: &ServiceContainer,
    pointer: PointerPos,
    rect: TargetRect,
    fraction: Option<f64>,
) -> CliResult<()> {
    let fraction = match fraction {
        Some(value) => {
            if !value.is_finite() || value <= 0.0 || value >= 1.0 {
                return Err(CliError::InvalidArgs(format!(
                    "fraction must be strictly between 0 and 1, got {value}"
                )));
            }
            value
        }
        None => container.settings.classifier.drop_fraction,
    };

    let placement = DropZoneClassifier::new(fraction).classify(pointer, rect);
    output::info(&placement);
    Ok(())
}

#[instrument(skip(container))]
fn _move(
    container: &ServiceContainer,
    snapshot: &Path,
    source: &str,
    target: &str,
    placement: Placement,
) -> CliResult<()> {
    let mut store = container.snapshot.load(snapshot)?;
    let intent = PlacementIntent::new(placement, target);

    match reparent(&mut store, source, &intent) {
        Ok(()) => {
            container.snapshot.save(snapshot, &store)?;
            output::success(&format!("moved {source} {placement} {target}"));
            Ok(())
        }
        // Self-moves and root-sibling drops are shrugged off; the snapshot
        // file is left byte-identical.
        Err(e) if e.is_noop() => {
            output::warning(&e);
            Ok(())
        }
        Err(e) => Err(CliError::App(e.into())),
    }
}

fn _add(
    container: &ServiceContainer,
    snapshot: &Path,
    id: Option<String>,
    label: Option<String>,
    parent: Option<&str>,
) -> CliResult<()> {
    let mut store = container.snapshot.load(snapshot)?;
    let id = store
        .insert(id, label, parent)
        .map_err(ApplicationError::from)?;
    container.snapshot.save(snapshot, &store)?;
    output::action("added", &id);
    Ok(())
}

fn _remove(container: &ServiceContainer, snapshot: &Path, id: &str) -> CliResult<()> {
    let mut store = container.snapshot.load(snapshot)?;
    let removed = store.remove(id).map_err(ApplicationError::from)?;
    container.snapshot.save(snapshot, &store)?;
    output::action("removed", &removed.id);
    if !removed.children.is_empty() {
        output::warning(&format!(
            "{} child node(s) promoted to roots",
            removed.children.len()
        ));
    }
    Ok(())
}

fn _show(container: &ServiceContainer, snapshot: &Path, format: ShowFormat) -> CliResult<()> {
    let store = container.snapshot.load(snapshot)?;
    match format {
        ShowFormat::Ascii => {
            for tree in store.to_tree_strings() {
                output::info(tree.to_string().trim_end());
            }
        }
        ShowFormat::Markdown => output::info(store.to_markdown().trim_end()),
    }
    Ok(())
}

fn _instructions(container: &ServiceContainer, language: Option<&str>) -> CliResult<()> {
    let registry = container.merge.registry();
    match language {
        Some(tag) => {
            let strategy = registry
                .strategy(tag)
                .ok_or_else(|| ApplicationError::from(MergeError::UnknownLanguage(tag.into())))?;
            output::info(strategy.prompt_instructions());
        }
        None => output::info(&registry.prompt_instructions()),
    }
    Ok(())
}

fn _config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    local_dir: Option<&Path>,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(container.settings.to_toml()?.trim_end());
            Ok(())
        }
        ConfigCommands::Init { global } => _config_init(container, *global, local_dir),
        ConfigCommands::Path => {
            output::header("Config locations");
            match config::global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", &"<no config directory available>"),
            }
            let local = config::local_config_path(local_dir.unwrap_or(Path::new(".")));
            output::action("local", &local.display());
            Ok(())
        }
    }
}

fn _config_init(container: &ServiceContainer, global: bool, local_dir: Option<&Path>) -> CliResult<()> {
    let path = if global {
        config::global_config_path().ok_or_else(|| {
            CliError::InvalidArgs("cannot determine the global config directory".to_string())
        })?
    } else {
        config::local_config_path(local_dir.unwrap_or(Path::new(".")))
    };

    if container.fs.exists(&path) {
        return Err(CliError::InvalidArgs(format!(
            "config already exists: {}",
            path.display()
        )));
    }

    container
        .fs
        .ensure_parent(&path)
        .with_path_context("create config directory", &path)?;
    container
        .fs
        .write_atomic(&path, &Settings::template())
        .with_path_context("write config template", &path)?;
    output::success(&format!("created {}", path.display()));
    Ok(())
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn _completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    print_completions(shell, &mut cmd);
    Ok(())
}
