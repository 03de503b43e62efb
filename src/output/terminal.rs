// Colored terminal output for lexicons, year counters, similarity tables and
// attributed names. The main.rs command handlers delegate here.

use colored::Colorize;

use crate::error::AnalysisError;
use crate::frequency::counter::CountMode;
use crate::lexicon::{GenderLexicons, Lexicon};
use crate::names::NameAttribution;
use crate::pipeline::{CounterPair, SimilarityReport};
use crate::embedding::similarity::SimilarityTable;

/// Display both lexicons, one line each.
pub fn display_lexicons(lexicons: &GenderLexicons) {
    println!("\n{}", "=== Gender Lexicons ===".bold());
    print_lexicon("Woman", &lexicons.woman);
    print_lexicon("Man", &lexicons.man);
    println!();
}

fn print_lexicon(label: &str, lexicon: &Lexicon) {
    let words: Vec<&str> = lexicon.iter().collect();
    println!(
        "  {:<6} ({:>2})  {}",
        label.bold(),
        lexicon.len(),
        words.join(", ")
    );
}

/// Display per-year woman/man counts and their ratio.
pub fn display_counters(pair: &CounterPair, mode: CountMode) {
    let title = match mode {
        CountMode::Raw => "Raw Frequencies",
        CountMode::Smoothed => "Smoothed Log Frequencies",
    };
    println!(
        "\n{}",
        format!("=== {title} ({} years) ===", pair.woman.len()).bold()
    );

    if pair.woman.is_empty() {
        println!("  No documents counted.");
        return;
    }

    println!(
        "  {:>6}  {:>12}  {:>12}  {:>8}",
        "Year".dimmed(),
        "Woman".dimmed(),
        "Man".dimmed(),
        "Ratio".dimmed(),
    );
    println!("  {}", "-".repeat(44).dimmed());

    for ratio in &pair.ratios {
        println!(
            "  {:>6}  {:>12}  {:>12}  {:>8}",
            ratio.year,
            format_value(pair.woman.get(ratio.year), mode),
            format_value(pair.man.get(ratio.year), mode),
            colorize_ratio(ratio.ratio),
        );
    }

    println!();
    println!(
        "  Totals: woman {}  man {}",
        format_value(pair.woman.total(), mode),
        format_value(pair.man.total(), mode),
    );
}

/// Display the neighbour tables for both lexicons, then the name tables when
/// names were attributed.
pub fn display_similarity(report: &SimilarityReport) {
    print_table("Woman Lexicon", &report.woman, report.k);
    print_table("Man Lexicon", &report.man, report.k);
    display_name_similarity(report);
}

/// Display only the neighbour tables of attributed names.
pub fn display_name_similarity(report: &SimilarityReport) {
    if report.female_names.is_empty() && report.male_names.is_empty() {
        return;
    }
    print_table("Female Name", &report.female_names, report.k);
    print_table("Male Name", &report.male_names, report.k);
}

fn print_table(label: &str, table: &SimilarityTable, k: usize) {
    println!(
        "\n{}",
        format!("=== {label} Neighbours (top {k}) ===").bold()
    );
    if table.is_empty() {
        println!("  {}", "No query word is in the embedding vocabulary.".dimmed());
        return;
    }
    for (word, neighbors) in table.iter() {
        let list: Vec<String> = neighbors
            .iter()
            .map(|n| format!("{} {}", n.word, format!("({:.2})", n.similarity).dimmed()))
            .collect();
        println!("  {:<14} {}", word.bold(), list.join(", "));
    }
}

/// Display male and female given names.
pub fn display_names(attribution: &NameAttribution) {
    println!(
        "\n{}",
        format!("=== Attributed Names ({} total) ===", attribution.len()).bold()
    );
    for (label, names) in [("Female", &attribution.female), ("Male", &attribution.male)] {
        let joined = names.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
        println!(
            "  {:<7} ({:>3})  {}",
            label.bold(),
            names.len(),
            super::truncate_chars(&joined, 160)
        );
    }
}

/// Warn about documents skipped at ingest.
pub fn display_rejected(rejected: &[AnalysisError]) {
    if rejected.is_empty() {
        return;
    }
    println!(
        "\n  {} {} document(s) skipped:",
        "Warning:".yellow(),
        rejected.len()
    );
    for err in rejected {
        println!("    {}", err.to_string().dimmed());
    }
}

fn format_value(value: f64, mode: CountMode) -> String {
    match mode {
        CountMode::Raw => format!("{value:.0}"),
        CountMode::Smoothed => format!("{value:.2}"),
    }
}

/// Man/woman ratio: above 1 leans male, below 1 leans female.
fn colorize_ratio(ratio: f64) -> colored::ColoredString {
    let text = format!("{ratio:.2}");
    if ratio > 1.0 {
        text.cyan()
    } else if ratio < 1.0 {
        text.magenta()
    } else {
        text.normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_format_by_mode() {
        assert_eq!(format_value(3.0, CountMode::Raw), "3");
        assert_eq!(format_value(-1.23456, CountMode::Smoothed), "-1.23");
    }
}
