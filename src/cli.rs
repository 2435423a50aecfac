//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "glossline", about = "corpus alignment normalization tool.")]
/// Holds every command that is callable by the `glossline` command.
pub enum Glossline {
    #[structopt(about = "Convert raw corpus exports into normalized tables")]
    Convert(Convert),
}

#[derive(Debug, StructOpt)]
/// Convert command and parameters.
pub struct Convert {
    #[structopt(parse(from_os_str), help = "raw corpus exports location")]
    pub raw: PathBuf,
    #[structopt(parse(from_os_str), help = "destination of output tables")]
    pub dst: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "inventory",
        help = "grapheme-to-IPA inventory TSV"
    )]
    pub inventory: Option<PathBuf>,
}
