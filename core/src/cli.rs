use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use reqwest::Url;
use taskwatch_core::JobForm;

/// Start, stop, and watch jobs on a taskwatch job server.
#[derive(Parser, Debug)]
#[command(name = "taskwatch", version, about = "Job lifecycle client")]
pub struct Cli {
    /// Config file (default: ./taskwatch.{toml,yaml,json} if present).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Job server URL, overriding `server.base_url`.
    #[arg(long = "server", global = true)]
    pub server: Option<Url>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a job and follow its progress.
    Start {
        /// Form field as `name=value`. Repeatable.
        #[arg(long = "field", short = 'f', value_name = "NAME=VALUE")]
        fields: Vec<String>,
        /// File attachment as `name=path`. Repeatable.
        #[arg(long = "file", value_name = "NAME=PATH")]
        files: Vec<String>,
        /// Print the task id and exit without polling.
        #[arg(long = "no-watch")]
        no_watch: bool,
    },

    /// Request termination of a task.
    Stop {
        /// Task identifier returned by `start`.
        id: String,
    },

    /// Fetch the status of a task once.
    Status {
        /// Task identifier returned by `start`.
        id: String,
    },
}

/// Builds the job form from `--field` and `--file` arguments.
pub fn build_form(fields: &[String], files: &[String]) -> Result<JobForm> {
    let mut form = JobForm::new();
    for field in fields {
        form.push_assignment(field)?;
    }
    for file in files {
        form.push_assignment(&format!("@{file}"))?;
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start() {
        let cli = Cli::try_parse_from([
            "taskwatch",
            "--server",
            "http://localhost:10000",
            "start",
            "-f",
            "post_ids=1,2",
            "--field",
            "delay=3",
            "--file",
            "tokens=tokens.txt",
            "--no-watch",
        ])
        .unwrap();

        assert_eq!(cli.server.unwrap().as_str(), "http://localhost:10000/");
        let Command::Start {
            fields,
            files,
            no_watch,
        } = cli.command
        else {
            panic!("expected start");
        };
        assert_eq!(fields, ["post_ids=1,2", "delay=3"]);
        assert_eq!(files, ["tokens=tokens.txt"]);
        assert!(no_watch);
    }

    #[test]
    fn test_parse_stop() {
        let cli = Cli::try_parse_from(["taskwatch", "stop", "abc123"]).unwrap();
        assert!(matches!(cli.command, Command::Stop { id } if id == "abc123"));
    }

    #[test]
    fn test_stop_requires_id() {
        assert!(Cli::try_parse_from(["taskwatch", "stop"]).is_err());
    }

    #[test]
    fn test_build_form() {
        let form = build_form(
            &["post_ids=1".to_string(), "comment=hi=there".to_string()],
            &["tokens=/tmp/tokens.txt".to_string()],
        )
        .unwrap();

        assert_eq!(form.field("post_ids"), Some("1"));
        assert_eq!(form.field("comment"), Some("hi=there"));
        assert_eq!(form.files().len(), 1);
        assert_eq!(form.files()[0].name, "tokens");
    }

    #[test]
    fn test_build_form_rejects_bare_value() {
        assert!(build_form(&["novalue".to_string()], &[]).is_err());
    }
}
