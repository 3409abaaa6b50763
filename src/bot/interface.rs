use std::io::Write;

/// Where the bot's sentences go.
pub trait Speaker {
    fn speak(&mut self, text: &str);
    /// Called before waiting for the next line of input.
    fn prompt(&mut self) {}
}

/// Talks on stdout, `User: ` / `Nova: ` style.
#[derive(Debug, Default)]
pub struct ConsoleSpeaker;

/// Keeps every sentence instead of printing it.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Transcript(pub Vec<String>);

impl Speaker for ConsoleSpeaker {
    fn speak(&mut self, text: &str) {
        println!("Nova: {text}");
    }
    fn prompt(&mut self) {
        print!("User: ");
        let _ = std::io::stdout().flush();
    }
}

#[cfg(test)]
impl Speaker for Transcript {
    fn speak(&mut self, text: &str) {
        self.0.push(String::from(text));
    }
}
