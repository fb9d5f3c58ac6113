use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use gog_repo::Repository;
use gog_types::ObjectId;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("cannot read current directory")?;
    let mut out = std::io::stdout().lock();
    match cli.command {
        Command::Init(args) => cmd_init(args, &mut out),
        Command::CatFile(args) => cmd_cat_file(args, &cwd, &mut out),
        Command::HashObject(args) => cmd_hash_object(args, &mut out),
    }
}

fn cmd_init(args: InitArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));
    let repo = Repository::init(&path)?;
    writeln!(
        out,
        "{} Initialized empty gog repository in {}",
        "✓".green().bold(),
        repo.git_dir().display().to_string().bold()
    )?;
    Ok(())
}

fn cmd_cat_file(args: CatFileArgs, cwd: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let repo = Repository::locate(cwd, true)?.context("not a git repository")?;
    let id: ObjectId = args
        .object
        .parse()
        .with_context(|| format!("invalid object id {:?}", args.object))?;
    let object = repo.read_object(&id, args.kind)?;
    out.write_all(&object.serialize())?;
    out.flush()?;
    Ok(())
}

fn cmd_hash_object(args: HashObjectArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let id = gog_repo::hash_object(&args.file, args.kind, !args.write)?;
    writeln!(out, "{id}")?;
    Ok(())
}
