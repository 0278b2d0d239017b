// Colored terminal output for frequency tables and the topic catalog.
//
// main.rs display paths delegate here.

use colored::Colorize;

use super::format_rate;
use crate::topics::{FrequencyTable, TopicCatalog};

/// Display the frequency table, one block per document.
///
/// Bars are scaled against the highest rate in the whole table so blocks
/// can be compared with each other.
pub fn display_table(table: &FrequencyTable) {
    if table.is_empty() {
        println!("No documents analyzed.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Topic words per 1000 words ({} documents) ===",
            table.rows.len()
        )
        .bold()
    );

    let bar_width: usize = 30;
    let max_rate = table.max_rate();
    let label_width = table.topics.iter().map(|t| t.len()).max().unwrap_or(0);

    for row in &table.rows {
        println!();
        println!(
            "  {}  {}",
            row.document.bold(),
            format!("({} words)", row.total_words).dimmed()
        );

        for topic in &row.topics {
            let filled = if max_rate > 0.0 {
                ((topic.rate / max_rate) * bar_width as f64).round() as usize
            } else {
                0
            };
            let empty = bar_width.saturating_sub(filled);
            let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

            let share = if max_rate > 0.0 { topic.rate / max_rate } else { 0.0 };
            let colored_bar = if share >= 0.66 {
                bar.bright_green()
            } else if share >= 0.33 {
                bar.bright_yellow()
            } else {
                bar.bright_blue()
            };

            println!(
                "    {:<width$} {} {:>7}  {}",
                topic.topic,
                colored_bar,
                format_rate(topic.rate),
                format!("{} hits", topic.hits).dimmed(),
                width = label_width,
            );
        }
    }
    println!();
}

/// Display the catalog's topics and keywords, flagging keywords that
/// normalization makes unreachable.
pub fn display_topics(catalog: &TopicCatalog) {
    println!(
        "\n{}",
        format!("=== Topics ({}) ===", catalog.len()).bold()
    );

    for (i, topic) in catalog.topics().iter().enumerate() {
        println!();
        println!("  {:>2}. {}", i + 1, topic.name.bold());
        println!("      Keywords: {}", topic.keywords.join(", ").dimmed());

        let unmatchable = topic.unmatchable_keywords();
        if !unmatchable.is_empty() {
            println!(
                "      {} never matches after normalization: {}",
                "Warning:".yellow(),
                unmatchable.join(", ")
            );
        }
    }
    println!();
}
