mod display;
mod import;
mod state;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lotofacil_db::models::{DrawCollection, Period, Strategy};
use lotofacil_db::store::{data_dir, draws_path, load_draws};
use lotofacil_engine::analysis::Analysis;
use lotofacil_engine::config::load_config_or_default;
use lotofacil_engine::error::AnalysisError;
use lotofacil_engine::frequency::compute_stats;
use lotofacil_engine::generators::{generate, suggest_all};

use crate::display::{
    display_draws, display_import_summary, display_sequences, display_stats, display_suggestions,
    display_window,
};
use crate::state::{RotationState, config_path, rotation_path};

#[derive(Parser)]
#[command(name = "lotofacil", about = "Suggestions de grilles Lotofácil à partir de l'historique")]
struct Cli {
    /// Répertoire des données (tirages, configuration, rotation)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Remplacer l'historique par un export JSON ou CSV
    Import {
        /// Fichier JSON (format de l'API) ou CSV séparé par ';'
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Afficher le chemin du fichier des tirages
    DataPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Afficher les fréquences et retards sur une période
    Stats {
        #[arg(short, long, value_enum, default_value = "all")]
        period: Period,

        /// Date de référence (AAAA-MM-JJ), par défaut celle du dernier tirage
        #[arg(long, value_parser = parse_anchor)]
        as_of: Option<NaiveDate>,
    },

    /// Classement des séquences par colonne
    Sequences {
        #[arg(short, long, value_enum, default_value = "all")]
        period: Period,

        /// Nombre de séquences affichées par colonne
        #[arg(short, long, default_value = "10")]
        top: usize,

        #[arg(long, value_parser = parse_anchor)]
        as_of: Option<NaiveDate>,
    },

    /// Suggérer des grilles
    Suggest {
        #[arg(short, long, value_enum, default_value = "all")]
        period: Period,

        /// Stratégie unique, toutes par défaut
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_parser = parse_anchor)]
        as_of: Option<NaiveDate>,

        /// Sortie JSON au lieu des tableaux
        #[arg(long)]
        json: bool,
    },
}

fn parse_anchor(raw: &str) -> Result<NaiveDate, String> {
    lotofacil_db::store::parse_date(raw).ok_or_else(|| format!("date invalide '{raw}' (AAAA-MM-JJ ou JJ/MM/AAAA)"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Erreur: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let dir = cli.data.unwrap_or_else(data_dir);
    debug!(dir = %dir.display(), "répertoire des données");

    match cli.command {
        Command::Import { file } => cmd_import(&dir, &file),
        Command::DataPath => {
            println!("{}", draws_path(&dir).display());
            Ok(())
        }
        Command::List { last } => cmd_list(&dir, last),
        Command::Stats { period, as_of } => cmd_stats(&dir, period, as_of),
        Command::Sequences { period, top, as_of } => cmd_sequences(&dir, period, top, as_of),
        Command::Suggest {
            period,
            strategy,
            seed,
            as_of,
            json,
        } => cmd_suggest(&dir, period, strategy, seed, as_of, json),
    }
}

/// `None` si aucun historique : le message est déjà affiché.
fn open_draws(dir: &Path) -> Result<Option<DrawCollection>> {
    let path = draws_path(dir);
    if !path.exists() {
        println!("Aucun historique. Lancez d'abord : lotofacil import --file <export>");
        return Ok(None);
    }
    let collection = load_draws(&path)?;
    if collection.is_empty() {
        println!("Historique vide. Lancez d'abord : lotofacil import --file <export>");
        return Ok(None);
    }
    Ok(Some(collection))
}

/// Construit l'analyse ; une période vide est signalée sans échec de la commande.
fn analyse<'a>(
    dir: &Path,
    collection: &'a DrawCollection,
    period: Period,
    as_of: Option<NaiveDate>,
) -> Result<Option<Analysis<'a>>> {
    let config = load_config_or_default(&config_path(dir))?;
    match Analysis::for_period(collection.as_slice(), period, as_of, config) {
        Ok(analysis) => Ok(Some(analysis)),
        Err(e @ AnalysisError::EmptyPeriod { .. }) => {
            println!("{e}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_import(dir: &Path, file: &Path) -> Result<()> {
    let result = import::import_file(file, &draws_path(dir))?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(dir: &Path, last: usize) -> Result<()> {
    let Some(collection) = open_draws(dir)? else {
        return Ok(());
    };
    let config = load_config_or_default(&config_path(dir))?;
    let n = last.min(collection.len());
    display_draws(&collection.as_slice()[..n], config.low_max);
    Ok(())
}

fn cmd_stats(dir: &Path, period: Period, as_of: Option<NaiveDate>) -> Result<()> {
    let Some(collection) = open_draws(dir)? else {
        return Ok(());
    };
    let Some(analysis) = analyse(dir, &collection, period, as_of)? else {
        return Ok(());
    };
    display_window(&analysis);
    display_stats(&compute_stats(analysis.draws));
    Ok(())
}

fn cmd_sequences(dir: &Path, period: Period, top: usize, as_of: Option<NaiveDate>) -> Result<()> {
    let Some(collection) = open_draws(dir)? else {
        return Ok(());
    };
    let Some(analysis) = analyse(dir, &collection, period, as_of)? else {
        return Ok(());
    };
    display_window(&analysis);
    display_sequences(&analysis.rankings, top);
    Ok(())
}

fn cmd_suggest(
    dir: &Path,
    period: Period,
    strategy: Option<Strategy>,
    seed: Option<u64>,
    as_of: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let Some(collection) = open_draws(dir)? else {
        return Ok(());
    };
    let Some(analysis) = analyse(dir, &collection, period, as_of)? else {
        return Ok(());
    };

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let state_path = rotation_path(dir);
    let state = RotationState::load(&state_path)?;
    let (suggestions, cursor) = match strategy {
        Some(strategy) => {
            let (suggestion, cursor) = generate(strategy, &analysis, state.cursor, &mut rng);
            (vec![suggestion], cursor)
        }
        None => suggest_all(&analysis, state.cursor, &mut rng),
    };
    if cursor != state.cursor {
        RotationState { cursor }.save(&state_path)?;
    }

    if json {
        let out = serde_json::to_string_pretty(&suggestions).context("Sérialisation des suggestions")?;
        println!("{out}");
    } else {
        display_window(&analysis);
        display_suggestions(&suggestions);
    }
    Ok(())
}
