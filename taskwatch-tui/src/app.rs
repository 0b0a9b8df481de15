use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;

pub struct App {
    pub messages: Vec<String>,
    pub input: String,
    pub input_mode: InputMode,
    pub scroll_state: ListState,
    pub should_quit: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

impl App {
    pub fn new() -> App {
        App {
            messages: vec![
                "Welcome to taskwatch".to_string(),
                "Press e to type a command, q to quit. Type /help for commands.".to_string(),
            ],
            input: String::new(),
            input_mode: InputMode::Normal,
            scroll_state: ListState::default(),
            should_quit: false,
        }
    }

    /// Appends a timestamped line to the activity panel and scrolls to it.
    pub fn add_message(&mut self, msg: impl AsRef<str>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.messages.push(format!("[{stamp}] {}", msg.as_ref()));
        self.scroll_state.select(Some(self.messages.len() - 1));
    }

    /// Applies a key press. Returns the submitted line when Enter is pressed
    /// on non-empty input.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<String> {
        match self.input_mode {
            InputMode::Normal => match code {
                KeyCode::Char('e') => self.input_mode = InputMode::Editing,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            InputMode::Editing => match code {
                KeyCode::Enter => {
                    let line = std::mem::take(&mut self.input);
                    let line = line.trim();
                    if !line.is_empty() {
                        return Some(line.to_string());
                    }
                }
                KeyCode::Char(c) => self.input.push(c),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Esc => self.input_mode = InputMode::Normal,
                _ => {}
            },
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_line(app: &mut App, text: &str) {
        for c in text.chars() {
            assert!(app.handle_key(KeyCode::Char(c)).is_none());
        }
    }

    #[test]
    fn test_quit_only_in_normal_mode() {
        let mut app = App::new();
        app.handle_key(KeyCode::Char('e'));
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.input, "q");

        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_enter_submits_and_clears_input() {
        let mut app = App::new();
        app.handle_key(KeyCode::Char('e'));
        type_line(&mut app, "/stop abc");
        app.handle_key(KeyCode::Backspace);

        assert_eq!(app.handle_key(KeyCode::Enter).as_deref(), Some("/stop ab"));
        assert!(app.input.is_empty());
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_blank_enter_submits_nothing() {
        let mut app = App::new();
        app.handle_key(KeyCode::Char('e'));
        type_line(&mut app, "   ");
        assert!(app.handle_key(KeyCode::Enter).is_none());
    }

    #[test]
    fn test_add_message_scrolls_to_latest() {
        let mut app = App::new();
        app.add_message("Task started");
        assert!(app.messages.last().unwrap().ends_with("Task started"));
        assert_eq!(app.scroll_state.selected(), Some(app.messages.len() - 1));
    }
}
