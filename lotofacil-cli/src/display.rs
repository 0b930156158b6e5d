use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use textplots::Plot;

use crate::import::ImportResult;
use lotofacil_db::models::{Draw, NumberStats, Suggestion, format_numbers};
use lotofacil_engine::analysis::Analysis;
use lotofacil_engine::sequence::ColumnRanking;

const DATE_FORMAT: &str = "%d/%m/%Y";

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Nombre de pairs et de bas (≤ `low_max`) d'un tirage.
pub fn draw_profile(draw: &Draw, low_max: u8) -> (usize, usize) {
    let even = draw.numbers.iter().filter(|&&n| n % 2 == 0).count();
    let low = draw.numbers.iter().filter(|&&n| n <= low_max).count();
    (even, low)
}

pub fn display_draws(draws: &[Draw], low_max: u8) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let low_header = format!("Bas (≤ {low_max})");
    let mut table = new_table(vec!["Concours", "Date", "Numéros", "Pairs", low_header.as_str()]);
    for draw in draws {
        let (even, low) = draw_profile(draw, low_max);
        table.add_row(vec![
            draw.contest.to_string(),
            draw.date.format(DATE_FORMAT).to_string(),
            format_numbers(&draw.numbers),
            even.to_string(),
            low.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total enregistrements lus : {}", result.total_records);
    println!("  Importés                  : {}", result.imported);
    println!("  Doublons ignorés          : {}", result.duplicates);
    if result.errors > 0 {
        println!("  Rejetés (invalides)       : {}", result.errors);
    }
}

/// En-tête commun : période, taille et bornes de la fenêtre.
pub fn display_window(analysis: &Analysis) {
    let latest = analysis.latest();
    let oldest = analysis.draws.last().unwrap_or(latest);
    println!(
        "\nPériode {} : {} tirage(s), concours {} à {} (du {} au {})\n",
        analysis.period,
        analysis.draws.len(),
        oldest.contest,
        latest.contest,
        oldest.date.format(DATE_FORMAT),
        latest.date.format(DATE_FORMAT),
    );
}

pub fn display_stats(stats: &[NumberStats]) {
    println!("── Numéros (1-25) ──");
    let mut table = new_table(vec!["Numéro", "Fréquence", "Col. 1", "Col. 2", "Col. 3", "Retard"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    let len = sorted.len();
    for (i, stat) in sorted.iter().enumerate() {
        let color = if i < 5 {
            Color::Green
        } else if i + 5 >= len {
            Color::Red
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(format!("{:02}", stat.number)).fg(color),
            Cell::new(stat.frequency.to_string()),
            Cell::new(stat.columns[0].to_string()),
            Cell::new(stat.columns[1].to_string()),
            Cell::new(stat.columns[2].to_string()),
            Cell::new(stat.gap.to_string()),
        ]);
    }
    println!("{table}");

    display_frequency_chart(stats);
}

fn display_frequency_chart(stats: &[NumberStats]) {
    let max = stats.iter().map(|s| s.frequency).max().unwrap_or(0);
    if max == 0 {
        return;
    }
    println!("\n── Fréquence par numéro ──\n");
    let points: Vec<(f32, f32)> = stats
        .iter()
        .map(|s| (s.number as f32, s.frequency as f32))
        .collect();
    let shape = textplots::Shape::Bars(&points);
    let mut chart = textplots::Chart::new_with_y_range(120, 40, 0.5, 25.5, 0.0, max as f32 + 1.0);
    println!("{}", chart.lineplot(&shape));
}

pub fn display_sequences(rankings: &[ColumnRanking], top: usize) {
    for ranking in rankings {
        println!(
            "\n── Colonne {} : {} séquence(s) distincte(s) ──",
            ranking.column + 1,
            ranking.len()
        );
        let mut table = new_table(vec!["Rang", "Séquence", "Vue", "Dernière apparition"]);
        for (i, rank) in ranking.ranks.iter().take(top).enumerate() {
            let last_seen = match rank.last_seen {
                0 => "dernier tirage".to_string(),
                n => format!("il y a {n} tirage(s)"),
            };
            table.add_row(vec![
                (i + 1).to_string(),
                format_numbers(&rank.sequence),
                rank.count.to_string(),
                last_seen,
            ]);
        }
        println!("{table}");
    }
}

pub fn display_suggestions(suggestions: &[Suggestion]) {
    println!("\n🎲 Suggestions de grilles\n");

    let mut table = new_table(vec!["#", "Stratégie", "Numéros", "Détails"]);
    for (i, sug) in suggestions.iter().enumerate() {
        let mut details: Vec<String> = sug.columns.iter().map(|c| c.to_string()).collect();
        details.extend(sug.notes.iter().cloned());
        let adjusted = sug.columns.iter().any(|c| c.adjusted);

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(sug.strategy.label()),
            Cell::new(format_numbers(&sug.numbers)).fg(Color::Green),
            Cell::new(details.join("\n")).fg(if adjusted { Color::Yellow } else { Color::White }),
        ]);
    }
    println!("{table}");
}
