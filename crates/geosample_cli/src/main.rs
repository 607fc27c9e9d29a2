//! Terminal host for the geological sample manager.
//!
//! # Responsibility
//! - Map subcommands onto the core user-action handlers.
//! - Draw the table after every action that redraws it.
//!
//! Handler failures were already shown to the user as notices; they only
//! set the exit status here.

mod cli;
mod terminal;

use anyhow::Context;
use clap::Parser;
use cli::{Args, Command};
use geosample_core::db::open_db;
use geosample_core::{
    draw_table, init_logging, today_utc, AppConfig, AppError, SampleApp, SampleId,
    SqliteLocalStorage, TableView,
};
use log::info;
use std::process::ExitCode;
use terminal::TerminalUi;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.downcast_ref::<AppError>().is_some() => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.resolve_config();
    start_logging(&config);

    let conn = open_db(&config.db_path)
        .with_context(|| format!("opening `{}`", config.db_path.display()))?;
    let assume_yes = matches!(
        args.command,
        Command::Delete { yes: true, .. } | Command::Clear { yes: true }
    );
    let mut app = SampleApp::new(SqliteLocalStorage::new(&conn), TerminalUi { assume_yes });

    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&args.command)
    );
    match args.command {
        Command::List => print_table(&app.render()?),
        Command::Add(fields) => print_table(&app.submit_sample(fields.into())?),
        Command::Edit(edit) => {
            let id = SampleId::new(edit.id.as_str());
            app.begin_edit(&id)?;
            for (field, value) in edit.changes() {
                app.set_edit_field(&id, field, value)?;
            }
            print_table(&app.commit_edit(&id)?);
        }
        Command::Delete { id, .. } => {
            if let Some(view) = app.delete_sample(&SampleId::new(id))? {
                print_table(&view);
            }
        }
        Command::Clear { .. } => {
            if let Some(view) = app.clear_all()? {
                print_table(&view);
            }
        }
        Command::Export { .. } => {
            let path = app.export_csv(&config.export_dir, today_utc())?;
            println!("{}", path.display());
        }
        Command::Map(map) => {
            match (map.id, map.lat, map.lon) {
                (Some(id), _, _) => app.open_sample_on_map(&SampleId::new(id))?,
                (None, lat, lon) => app.open_on_map(
                    lat.as_deref().unwrap_or_default(),
                    lon.as_deref().unwrap_or_default(),
                )?,
            };
        }
    }
    Ok(())
}

fn start_logging(config: &AppConfig) {
    let log_dir = config.log_dir.to_string_lossy();
    if let Err(err) = init_logging(&config.log_level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn print_table(view: &TableView) {
    println!("{}", draw_table(view));
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List => "list",
        Command::Add(_) => "add",
        Command::Edit(_) => "edit",
        Command::Delete { .. } => "delete",
        Command::Clear { .. } => "clear",
        Command::Export { .. } => "export",
        Command::Map(_) => "map",
    }
}
