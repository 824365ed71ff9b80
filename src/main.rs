mod cli;
mod config;
mod engine;
mod error;
mod git;
mod paths;
mod shell;

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use std::io::BufRead;
use std::path::Path;
use std::process::{Command, ExitCode, Stdio};

use cli::{BranchCommands, Cli, Commands, ConfigCommands, WorkspaceCommands};
use config::ConfigStore;
use engine::WorkspaceEngine;
use error::GitxError;
use git::GitProcess;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            let code = err
                .downcast_ref::<GitxError>()
                .map(GitxError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code.clamp(1, 255) as u8)
        }
    }
}

/// Ask a yes/no question on stderr and read the answer from stdin.
/// EOF or anything other than y/yes declines.
fn prompt_confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Launch the configured editor against the worktree, detached with
/// discarded output. A missing or broken editor never fails the workflow.
fn launch_editor(editor: &str, path: &Path) {
    if editor.is_empty() {
        return;
    }
    let spawned = Command::new(editor)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if let Err(err) = spawned {
        log::debug!("could not launch editor '{editor}': {err}");
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = ConfigStore::load()?;
    let git = GitProcess;
    let engine = WorkspaceEngine::new(&git, &prompt_confirm);

    match cli.command {
        Commands::Clone { repo } => {
            let path = engine.clone_workspace(&mut cfg, &repo)?;
            eprintln!("{} workspace created at {}", "done:".green().bold(), path.display());
            // stdout: path for the shell wrapper to cd into
            println!("{}", path.display());
            Ok(())
        }
        Commands::Go { repo, branch } => go(&engine, &mut cfg, &repo, &branch),
        Commands::Workspace { command } => match command {
            WorkspaceCommands::Add { repo, branch } => {
                let path = engine.ensure_worktree(&mut cfg, &repo, &branch)?;
                eprintln!("{} worktree created at {}", "done:".green().bold(), path.display());
                println!("{}", path.display());
                Ok(())
            }
            WorkspaceCommands::Go { repo, branch } => go(&engine, &mut cfg, &repo, &branch),
            WorkspaceCommands::List { repo } => {
                for path in engine.list(&cfg, &repo)? {
                    println!("{}", path.display());
                }
                Ok(())
            }
        },
        Commands::Branch { command } => match command {
            BranchCommands::Add { repo, branch } => {
                engine.branch_add(&cfg, &repo, &branch)?;
                eprintln!("{} branch '{branch}' created and pushed", "done:".green().bold());
                Ok(())
            }
            BranchCommands::Delete { repo, branch } => {
                engine.branch_delete(&cfg, &repo, &branch)?;
                eprintln!("{} branch '{branch}' deleted", "done:".green().bold());
                Ok(())
            }
            BranchCommands::List { repo } => {
                for branch in engine.branch_list(&cfg, &repo)? {
                    println!("{branch}");
                }
                Ok(())
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => match cfg.get_value(&key) {
                Some(serde_json::Value::String(s)) => {
                    println!("{s}");
                    Ok(())
                }
                Some(value) => {
                    println!("{}", serde_json::to_string_pretty(value)?);
                    Ok(())
                }
                None => anyhow::bail!("config key not found: {key}"),
            },
            ConfigCommands::Set { key, value } => {
                cfg.set_value(&key, &value)?;
                cfg.save()?;
                Ok(())
            }
            ConfigCommands::Show => {
                println!("{}", serde_json::to_string_pretty(cfg.raw())?);
                Ok(())
            }
        },
        Commands::ShellSetup {
            posix,
            bash,
            zsh,
            fish,
        } => {
            let shell = if fish {
                Some(shell::Shell::Fish)
            } else if zsh {
                Some(shell::Shell::Zsh)
            } else if posix || bash {
                Some(shell::Shell::Bash)
            } else {
                None
            };
            shell::print_shell_setup(shell)
        }
    }
}

fn go(engine: &WorkspaceEngine, cfg: &mut ConfigStore, repo: &str, branch: &str) -> Result<()> {
    let path = engine.go(cfg, repo, branch)?;
    launch_editor(&cfg.globals().editor, &path);
    // stdout: path for the shell wrapper to cd into
    println!("{}", path.display());
    Ok(())
}
