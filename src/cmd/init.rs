//! `lazyctx init`: write a starter config into the current directory.

use crate::cmd::InitArgs;
use crate::config::discovery::PROJECT_CONFIG_NAME;
use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const TEMPLATE: &str = r#"# lazyctx configuration
elasticsearch-url: http://localhost:9200
index: logstash-*

# Fields holding the entry time and text
timestamp-field: "@timestamp"
message-field: message

# Fields that identify one log stream; context views stay inside the
# stream of the selected entry
context-fields:
  - host
  - program

# Appended to context field names in exact-match queries
term-suffix: .raw

# Stripped from every message before display
# message-cleanup-regex: "^\\[\\d+\\] "
# ignore-blanks: true

# search-size: 300
# page-size: 500
# context-before: 200
# context-after: 200
# request-timeout-secs: 30

# friendly-names:
#   csv: ~/.config/lazyctx/names.csv
#   context-cleanup-regex: "\\.example\\.com"
"#;

#[derive(Debug)]
pub enum InitError {
    AlreadyExists(PathBuf),
    Io(PathBuf, io::Error),
}

/// Write the template into `dir`; refuses to overwrite unless `force`.
pub fn init_in(dir: &Path, force: bool) -> Result<PathBuf, InitError> {
    let path = dir.join(PROJECT_CONFIG_NAME);
    if path.exists() && !force {
        return Err(InitError::AlreadyExists(path));
    }
    fs::write(&path, TEMPLATE).map_err(|e| InitError::Io(path.clone(), e))?;
    Ok(path)
}

pub fn run(args: &InitArgs) -> Result<(), i32> {
    let cwd = std::env::current_dir().map_err(|e| {
        eprintln!("error: cannot determine current directory: {}", e);
        1
    })?;

    match init_in(&cwd, args.force) {
        Ok(path) => {
            println!("{} {}", "Created".green(), path.display());
            Ok(())
        }
        Err(InitError::AlreadyExists(path)) => {
            eprintln!(
                "error: {} already exists\n  = help: use --force to overwrite",
                path.display()
            );
            Err(1)
        }
        Err(InitError::Io(path, e)) => {
            eprintln!("error: cannot write {}: {}", path.display(), e);
            Err(1)
        }
    }
}
