//! Command-line arguments.
//!
//! Every location/level flag falls back to its environment variable, then to
//! the `AppConfig` default.

use clap::{Args as ClapArgs, Parser, Subcommand};
use geosample_core::config::{DB_PATH_ENV, EXPORT_DIR_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
use geosample_core::{AppConfig, SampleField, SampleFields};
use std::path::PathBuf;

/// Local manager for geological sample records.
#[derive(Parser, Debug)]
#[command(name = "geosamples", version)]
#[command(about = "Record, edit, export and map geological samples stored locally")]
pub struct Args {
    /// SQLite database file holding the samples
    #[arg(long, global = true, env = DB_PATH_ENV)]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true, env = LOG_DIR_ENV)]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = LOG_LEVEL_ENV)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draw the sample table
    List,
    /// Record a new sample
    Add(AddArgs),
    /// Edit fields of one sample; fields not given keep their value
    Edit(EditArgs),
    /// Delete one sample
    Delete {
        /// Sample id as shown by `list`
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Delete every sample
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Write the samples to `datos_geologicos_<date>.csv`
    Export {
        /// Target directory
        #[arg(long, env = EXPORT_DIR_ENV)]
        dir: Option<PathBuf>,
    },
    /// Open a map search for a sample or for manual coordinates
    Map(MapArgs),
}

#[derive(ClapArgs, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub numero_muestra: String,
    #[arg(long)]
    pub localidad: String,
    #[arg(long)]
    pub pais: String,
    #[arg(long, allow_hyphen_values = true)]
    pub latitud: String,
    #[arg(long, allow_hyphen_values = true)]
    pub longitud: String,
    #[arg(long)]
    pub mineralogia: String,
    #[arg(long)]
    pub paleontologia: String,
}

impl From<AddArgs> for SampleFields {
    fn from(value: AddArgs) -> Self {
        Self {
            numero_muestra: value.numero_muestra,
            localidad: value.localidad,
            pais: value.pais,
            latitud: value.latitud,
            longitud: value.longitud,
            mineralogia: value.mineralogia,
            paleontologia: value.paleontologia,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct EditArgs {
    /// Sample id as shown by `list`
    pub id: String,
    #[arg(long)]
    pub numero_muestra: Option<String>,
    #[arg(long)]
    pub localidad: Option<String>,
    #[arg(long)]
    pub pais: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub latitud: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub longitud: Option<String>,
    #[arg(long)]
    pub mineralogia: Option<String>,
    #[arg(long)]
    pub paleontologia: Option<String>,
}

impl EditArgs {
    /// Field overrides given on the command line, in column order.
    pub fn changes(&self) -> Vec<(SampleField, String)> {
        let values = [
            &self.numero_muestra,
            &self.localidad,
            &self.pais,
            &self.latitud,
            &self.longitud,
            &self.mineralogia,
            &self.paleontologia,
        ];
        SampleField::ALL
            .into_iter()
            .zip(values)
            .filter_map(|(field, value)| value.clone().map(|value| (field, value)))
            .collect()
    }
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = true)]
pub struct MapArgs {
    /// Use the stored coordinates of this sample
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub id: Option<String>,
    /// Manual latitude
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    pub lat: Option<String>,
    /// Manual longitude
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lon: Option<String>,
}

impl Args {
    /// Merges flags over environment-derived defaults.
    pub fn resolve_config(&self) -> AppConfig {
        let mut config = AppConfig::from_env();
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = log_dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Command::Export { dir: Some(dir) } = &self.command {
            config.export_dir = dir.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::{Args, Command};
    use clap::{CommandFactory, Parser};
    use geosample_core::SampleField;

    #[test]
    fn clap_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn edit_collects_only_given_fields() {
        let args = Args::try_parse_from([
            "geosamples",
            "edit",
            "abc",
            "--pais",
            "Chile",
            "--latitud",
            "-33.4",
        ])
        .unwrap();

        let Command::Edit(edit) = args.command else {
            panic!("expected edit command");
        };
        assert_eq!(edit.id, "abc");
        assert_eq!(
            edit.changes(),
            vec![
                (SampleField::Pais, "Chile".to_string()),
                (SampleField::Latitud, "-33.4".to_string()),
            ]
        );
    }

    #[test]
    fn map_requires_id_or_both_coordinates() {
        assert!(Args::try_parse_from(["geosamples", "map"]).is_err());
        assert!(Args::try_parse_from(["geosamples", "map", "--lat", "1"]).is_err());
        assert!(Args::try_parse_from(["geosamples", "map", "--lat", "1", "--lon", "2"]).is_ok());
        assert!(Args::try_parse_from(["geosamples", "map", "--id", "x"]).is_ok());
    }

    #[test]
    fn db_flag_overrides_config() {
        let args = Args::try_parse_from(["geosamples", "--db", "/tmp/x.db", "list"]).unwrap();
        assert_eq!(args.resolve_config().db_path, std::path::PathBuf::from("/tmp/x.db"));
    }
}
