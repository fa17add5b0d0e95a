use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use keyfs_store::StoreConfig;
use keyfs_vfs::{glob, mkdir_all, FileInfo, FileSystem, ObjectFs, VfsError};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref(), cli.root.as_deref())?;
    debug!(?config, "opening store");
    let fs = ObjectFs::new(config.open().context("cannot open store")?);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&fs, cli.command, cli.format, &mut out)
}

/// Pick the store: `--root` wins, then `--config`, then the default.
pub fn resolve_config(config: Option<&Path>, root: Option<&Path>) -> anyhow::Result<StoreConfig> {
    if let Some(root) = root {
        return Ok(StoreConfig::Local {
            root: root.to_path_buf(),
        });
    }
    match config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display())),
        None => Ok(StoreConfig::default()),
    }
}

pub fn execute<F: FileSystem>(
    fs: &F,
    command: Command,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Command::Stat(args) => cmd_stat(fs, args, format, out),
        Command::Ls(args) => cmd_ls(fs, args, format, out),
        Command::Cat(args) => cmd_cat(fs, args, out),
        Command::Put(args) => cmd_put(fs, args, format, out),
        Command::Rm(args) => {
            fs.remove(&args.path).map_err(|e| report(&args.path, e))?;
            Ok(())
        }
        Command::Mkdir(args) => {
            let made = if args.parents {
                mkdir_all(fs, &args.path)
            } else {
                fs.mkdir(&args.path)
            };
            made.map_err(|e| report(&args.path, e))
        }
        Command::Glob(args) => cmd_glob(fs, args, format, out),
    }
}

/// Turn a filesystem error into the message printed after `keyfs: `.
fn report(path: &str, err: VfsError) -> anyhow::Error {
    if err.is_not_found() {
        anyhow::anyhow!("{path}: no such file or directory")
    } else {
        anyhow::anyhow!("{path}: {err}")
    }
}

fn cmd_stat<F: FileSystem>(
    fs: &F,
    args: StatArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let info = fs.stat(&args.path).map_err(|e| report(&args.path, e))?;
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?,
        OutputFormat::Text => {
            writeln!(out, "  Name: {}", info.name.bold())?;
            writeln!(out, "  Kind: {}", info.kind.to_string().cyan())?;
            writeln!(out, "  Size: {}", info.size)?;
            match info.modified {
                Some(at) => writeln!(out, "  Modified: {}", at.to_rfc3339())?,
                None => writeln!(out, "  Modified: {}", "-".dimmed())?,
            }
        }
    }
    Ok(())
}

fn cmd_ls<F: FileSystem>(
    fs: &F,
    args: LsArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let entries = fs.read_dir(&args.path).map_err(|e| report(&args.path, e))?;
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?,
        OutputFormat::Text => {
            for entry in &entries {
                writeln!(out, "{}", format_entry(entry))?;
            }
        }
    }
    Ok(())
}

fn format_entry(entry: &FileInfo) -> String {
    if entry.is_dir() {
        format!("{:>10}  {}/", "-", entry.name.blue().bold())
    } else {
        format!("{:>10}  {}", entry.size, entry.name)
    }
}

fn cmd_cat<F: FileSystem>(fs: &F, args: CatArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let data = fs.read_file(&args.path).map_err(|e| report(&args.path, e))?;
    out.write_all(&data)?;
    Ok(())
}

fn cmd_put<F: FileSystem>(
    fs: &F,
    args: PutArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let data = match &args.file {
        Some(file) => {
            std::fs::read(file).with_context(|| format!("cannot read {}", file.display()))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("cannot read stdin")?;
            buf
        }
    };
    let info = fs
        .write_file(&args.path, &data)
        .map_err(|e| report(&args.path, e))?;
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?,
        OutputFormat::Text => writeln!(
            out,
            "{} Wrote {} bytes to {}",
            "✓".green().bold(),
            info.size,
            args.path.bold()
        )?,
    }
    Ok(())
}

fn cmd_glob<F: FileSystem>(
    fs: &F,
    args: GlobArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let matches = glob(fs, &args.prefix, &args.pattern).map_err(|e| report(&args.pattern, e))?;
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&matches)?)?,
        OutputFormat::Text => {
            for path in &matches {
                writeln!(out, "{path}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfs_store::InMemoryBlobStore;

    fn memory_fs() -> ObjectFs<InMemoryBlobStore> {
        ObjectFs::new(InMemoryBlobStore::new())
    }

    fn run<F: FileSystem>(fs: &F, command: Command, format: OutputFormat) -> anyhow::Result<String> {
        let mut out = Vec::new();
        execute(fs, command, format, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    // -----------------------------------------------------------------------
    // Config resolution
    // -----------------------------------------------------------------------

    #[test]
    fn root_flag_overrides_config() {
        let config = resolve_config(Some(Path::new("/no/such/file.toml")), Some(Path::new("/data")))
            .unwrap();
        assert_eq!(
            config,
            StoreConfig::Local {
                root: "/data".into()
            }
        );
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyfs.toml");
        std::fs::write(&path, "backend = \"memory\"\n").unwrap();
        assert_eq!(resolve_config(Some(&path), None).unwrap(), StoreConfig::Memory);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(resolve_config(Some(Path::new("/no/such/file.toml")), None).is_err());
    }

    #[test]
    fn defaults_without_flags() {
        assert_eq!(resolve_config(None, None).unwrap(), StoreConfig::default());
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    #[test]
    fn put_from_file_then_cat() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("in.txt");
        std::fs::write(&local, b"hello").unwrap();

        let fs = memory_fs();
        let put = PutArgs {
            path: "docs/a.txt".into(),
            file: Some(local),
        };
        run(&fs, Command::Put(put), OutputFormat::Text).unwrap();

        let cat = CatArgs {
            path: "docs/a.txt".into(),
        };
        assert_eq!(run(&fs, Command::Cat(cat), OutputFormat::Text).unwrap(), "hello");
    }

    #[test]
    fn ls_json_lists_children() {
        let fs = memory_fs();
        fs.write_file("d/f.txt", b"abc").unwrap();
        fs.write_file("d/sub/g.txt", b"x").unwrap();

        let out = run(&fs, Command::Ls(LsArgs { path: "d".into() }), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let names: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["f.txt", "sub"]);
        assert_eq!(value[1]["kind"], "directory");
    }

    #[test]
    fn stat_missing_reports_no_such_file() {
        let fs = memory_fs();
        let err = run(&fs, Command::Stat(StatArgs { path: "nope".into() }), OutputFormat::Text)
            .unwrap_err();
        assert_eq!(err.to_string(), "nope: no such file or directory");
    }

    #[test]
    fn mkdir_with_and_without_parents() {
        let fs = memory_fs();
        let flat = MkdirArgs {
            path: "a/b".into(),
            parents: false,
        };
        assert!(run(&fs, Command::Mkdir(flat), OutputFormat::Text).is_err());

        let deep = MkdirArgs {
            path: "a/b".into(),
            parents: true,
        };
        run(&fs, Command::Mkdir(deep), OutputFormat::Text).unwrap();
        assert!(fs.stat("a/b").unwrap().is_dir());
    }

    #[test]
    fn rm_non_empty_directory_fails() {
        let fs = memory_fs();
        fs.write_file("d/f", b"x").unwrap();
        let err = run(&fs, Command::Rm(RmArgs { path: "d".into() }), OutputFormat::Text)
            .unwrap_err();
        assert!(err.to_string().contains("directory not empty"), "{err}");
    }

    #[test]
    fn glob_text_output() {
        let fs = memory_fs();
        for file in ["x/y/0.txt", "x/y/1.txt", "x/2.txt"] {
            fs.write_file(file, b"x").unwrap();
        }
        let args = GlobArgs {
            pattern: "x/*".into(),
            prefix: String::new(),
        };
        assert_eq!(
            run(&fs, Command::Glob(args), OutputFormat::Text).unwrap(),
            "x/2.txt\nx/y\n"
        );
    }
}
