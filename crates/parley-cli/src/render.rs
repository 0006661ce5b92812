use anyhow::{anyhow, Result};
use bat::WrappingMode;
use console::style;
use parley::conversation::ConversationResult;
use parley::systems::expert::EXPERT_NAME;
use parley::systems::researcher::Note;

const THEME: &str = "ansi";

pub fn conversation(result: &ConversationResult) -> Result<()> {
    for entry in &result.conversation {
        println!("\n{}", header(&entry.agent));
        markdown(&entry.message)?;
    }

    if !result.notes.is_empty() {
        println!("\n{}", style("Notes").bold().underlined());
        markdown(&notes_markdown(&result.notes))?;
    }
    println!();
    Ok(())
}

fn header(agent: &str) -> String {
    let name = if agent == EXPERT_NAME {
        style(agent).green().bold()
    } else {
        style(agent).cyan().bold()
    };
    format!("{} {}", style("●").dim(), name)
}

fn notes_markdown(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|note| {
            format!(
                "- **{}** ({}): {}",
                note.topic,
                note.timestamp.format("%H:%M:%S"),
                note.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn markdown(content: &str) -> Result<()> {
    bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(THEME)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print()
        .map_err(|e| anyhow!("failed to render output: {}", e))?;
    Ok(())
}
