use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gog_types::ObjectKind;

#[derive(Parser)]
#[command(
    name = "gog",
    about = "gog — a small subset of git's object database",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty repository
    Init(InitArgs),
    /// Print the contents of a repository object
    CatFile(CatFileArgs),
    /// Compute an object ID and optionally store the object
    HashObject(HashObjectArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Work tree to create (defaults to the current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CatFileArgs {
    /// Expected object type (blob, commit, tree, tag)
    pub kind: ObjectKind,
    /// Object ID (40 hex characters)
    pub object: String,
}

#[derive(Args)]
pub struct HashObjectArgs {
    /// Object type to create
    #[arg(short = 't', long = "type", default_value = "blob")]
    pub kind: ObjectKind,
    /// Write the object into the repository instead of only hashing it
    #[arg(short, long)]
    pub write: bool,
    pub file: PathBuf,
}
