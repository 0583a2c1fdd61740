use std::io::{self, BufRead, Write};

use leafid_core::assistant::{Assistant, PlantAssistant};
use leafid_core::metadata::MetadataTable;

/// Answer one question, or run an interactive session when none is given.
pub fn cmd_chat(query: Option<String>, auto_clear: bool) -> Result<(), String> {
    let mut assistant =
        PlantAssistant::new(MetadataTable::reference()).with_auto_clear(auto_clear);

    if let Some(query) = query {
        println!("{}", assistant.chat(&query));
        return Ok(());
    }

    println!("{}", assistant.chat("hello"));
    println!("Type a question, \"reset\" to clear history, or \"quit\" to leave.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout
            .flush()
            .map_err(|e| format!("Failed to write prompt: {}", e))?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| format!("Failed to read input: {}", e))?;
        if read == 0 {
            break;
        }

        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "reset" => {
                assistant.clear_history();
                println!("Chat reset! What would you like to know?");
            }
            query => println!("{}", assistant.chat(query)),
        }
    }
    Ok(())
}
