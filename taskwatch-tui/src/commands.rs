use taskwatch_core::JobForm;

pub const HELP: &[&str] = &[
    "/start name=value ... @name=path ...   submit a job and follow it",
    "/stop [task_id]                        stop a task (defaults to the tracked one)",
    "/help                                  show this help",
    "Values containing spaces can be quoted: comment=\"nice post\"",
];

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Start(JobForm),
    Stop(Option<String>),
    Help,
}

/// Parses one line typed into the input box.
pub fn parse(input: &str) -> Result<Command, String> {
    let args = split_args(input)?;
    let Some((head, rest)) = args.split_first() else {
        return Err("Empty command".into());
    };

    match head.as_str() {
        "/start" => {
            let mut form = JobForm::new();
            for arg in rest {
                form.push_assignment(arg).map_err(|e| e.to_string())?;
            }
            Ok(Command::Start(form))
        }
        "/stop" => match rest {
            [] => Ok(Command::Stop(None)),
            [id] => Ok(Command::Stop(Some(id.clone()))),
            _ => Err("Usage: /stop [task_id]".into()),
        },
        "/help" => Ok(Command::Help),
        other => Err(format!("Unknown command `{other}`. Type /help for commands.")),
    }
}

/// Splits on whitespace, keeping double-quoted runs together.
fn split_args(input: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }

    if in_quotes {
        return Err("Unterminated quote".into());
    }
    if pending {
        args.push(current);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_with_fields_and_files() {
        let cmd = parse(r#"/start post_ids=1,2 comment="nice post" @token_file=/tmp/t.txt"#).unwrap();
        let Command::Start(form) = cmd else {
            panic!("expected start");
        };
        assert_eq!(form.field("post_ids"), Some("1,2"));
        assert_eq!(form.field("comment"), Some("nice post"));
        assert_eq!(form.files()[0].name, "token_file");
    }

    #[test]
    fn test_start_rejects_bare_word() {
        assert!(parse("/start oops").is_err());
    }

    #[test]
    fn test_stop_variants() {
        assert_eq!(parse("/stop").unwrap(), Command::Stop(None));
        assert_eq!(
            parse("/stop abc123").unwrap(),
            Command::Stop(Some("abc123".into()))
        );
        assert!(parse("/stop a b").is_err());
    }

    #[test]
    fn test_unknown_and_empty() {
        assert!(parse("hello").unwrap_err().contains("Unknown command"));
        assert_eq!(parse("   ").unwrap_err(), "Empty command");
        assert_eq!(parse("/help").unwrap(), Command::Help);
    }

    #[test]
    fn test_split_args_quotes() {
        assert_eq!(
            split_args(r#"a "b c" d="" "#).unwrap(),
            ["a", "b c", "d="]
        );
        assert!(split_args(r#"a "b"#).is_err());
    }
}
