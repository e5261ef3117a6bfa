use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use bsv_types::{Cid, Codec, HashCode};

#[derive(Parser)]
#[command(
    name = "bsv",
    about = "Content-addressed block service",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Block repository directory
    #[arg(long, global = true, default_value = ".bsv")]
    pub repo: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Another repository to use as a peer for fetches and announcements
    #[arg(long, global = true)]
    pub peer: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a file as a block and print its identifier
    Put(PutArgs),
    /// Write a block's payload to stdout or a file
    Get(GetArgs),
    /// Delete a block from the local repository
    Rm(CidArgs),
    /// Report whether a block is present locally
    Has(CidArgs),
    /// Store every regular file in a directory as one batch
    Import(ImportArgs),
}

#[derive(Args)]
pub struct PutArgs {
    pub file: PathBuf,
    #[arg(long, default_value = "raw")]
    pub codec: Codec,
    #[arg(long, default_value = "sha2-256")]
    pub hash: HashCode,
}

#[derive(Args)]
pub struct GetArgs {
    pub cid: Cid,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CidArgs {
    pub cid: Cid,
}

#[derive(Args)]
pub struct ImportArgs {
    pub dir: PathBuf,
    #[arg(long, default_value = "raw")]
    pub codec: Codec,
    #[arg(long, default_value = "sha2-256")]
    pub hash: HashCode,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CID: &str = "bafkreifzjut3te2nhyekklss27nh3k72ysco7y32koao5eei66wof36n5e";

    #[test]
    fn parse_put_defaults() {
        let cli = Cli::try_parse_from(["bsv", "put", "a.txt"]).unwrap();
        if let Command::Put(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("a.txt"));
            assert_eq!(args.codec, Codec::Raw);
            assert_eq!(args.hash, HashCode::Sha2_256);
        } else { panic!("wrong command"); }
        assert_eq!(cli.repo, PathBuf::from(".bsv"));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_put_with_options() {
        let cli = Cli::try_parse_from([
            "bsv", "put", "a.txt", "--codec", "dag-cbor", "--hash", "blake3",
        ])
        .unwrap();
        if let Command::Put(args) = cli.command {
            assert_eq!(args.codec, Codec::DagCbor);
            assert_eq!(args.hash, HashCode::Blake3);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_get_with_output() {
        let cli = Cli::try_parse_from(["bsv", "get", CID, "-o", "out.bin"]).unwrap();
        if let Command::Get(args) = cli.command {
            assert_eq!(args.cid.to_string(), CID);
            assert_eq!(args.output, Some(PathBuf::from("out.bin")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_accepts_v0_and_other_multibases() {
        let cli = Cli::try_parse_from(["bsv", "has", "QmaozNR7DZHQK1ZcU9p7QdrshMvXqWK6gpu5rmrkPdT3L4"]).unwrap();
        assert!(matches!(cli.command, Command::Has(_)));

        let base16 = "f01551220b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
        let cli = Cli::try_parse_from(["bsv", "rm", base16]).unwrap();
        if let Command::Rm(args) = cli.command {
            assert_eq!(args.cid.to_string(), CID);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_rejects_bad_cid() {
        assert!(Cli::try_parse_from(["bsv", "rm", "not-a-cid"]).is_err());
    }

    #[test]
    fn parse_global_options() {
        let cli = Cli::try_parse_from([
            "bsv", "has", CID, "--repo", "/tmp/a", "--peer", "/tmp/b", "-v", "--format", "json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Has(_)));
        assert_eq!(cli.repo, PathBuf::from("/tmp/a"));
        assert_eq!(cli.peer, Some(PathBuf::from("/tmp/b")));
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn parse_import() {
        let cli = Cli::try_parse_from(["bsv", "import", "docs"]).unwrap();
        assert!(matches!(cli.command, Command::Import(_)));
    }
}
