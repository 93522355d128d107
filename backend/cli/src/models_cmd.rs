//! CLI Models Command
//!
//! Lists the selectable Groq models.

use groqchat_core::ModelChoice;

use crate::terminal_output::{render_table, Column};

/// Render the model table, marking `current`.
pub fn render(current: ModelChoice, color: bool) -> String {
    let columns = [Column::left(""), Column::left("Model"), Column::right("Context")];
    let rows: Vec<Vec<String>> = ModelChoice::ALL
        .iter()
        .map(|model| {
            vec![
                if *model == current { "*".to_string() } else { String::new() },
                model.id().to_string(),
                model.context_tokens().to_string(),
            ]
        })
        .collect();
    render_table(&columns, &rows, color)
}

pub fn run(current: ModelChoice, color: bool) {
    println!("\nAvailable models (* = selected)\n");
    print!("{}", render(current, color));
}
