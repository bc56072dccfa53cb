use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "remap",
    about = "remap — cross-version registry mapping generator",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

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
    /// Generate a mapping artifact for a version pair
    Generate(GenerateArgs),
    /// Write override stubs for every identifier with no mapping
    Stubs(StubsArgs),
    /// Decode an artifact and print a per-category summary
    Inspect(InspectArgs),
    /// Fully decode an artifact, verifying checksum and layout
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Source protocol version
    pub from: String,
    /// Target protocol version
    pub to: String,
    /// Directory holding per-version registry documents (mapping-<version>.json)
    #[arg(long, default_value = "mappings")]
    pub registry_dir: PathBuf,
    /// Directory holding override documents (mapping-<from>to<to>.json)
    #[arg(long, default_value = "overrides")]
    pub override_dir: PathBuf,
    /// Build configuration document
    #[arg(long, default_value = "remap.json")]
    pub config: PathBuf,
    /// Directory the artifact is published into
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,
    /// Unix timestamp (seconds) stamped into the artifact instead of now
    #[arg(long)]
    pub timestamp: Option<i64>,
}

#[derive(Args)]
pub struct StubsArgs {
    /// Source protocol version
    pub from: String,
    /// Target protocol version
    pub to: String,
    #[arg(long, default_value = "mappings")]
    pub registry_dir: PathBuf,
    #[arg(long, default_value = "overrides")]
    pub override_dir: PathBuf,
    #[arg(long, default_value = "remap.json")]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Artifact to inspect
    pub artifact: PathBuf,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Artifact to verify
    pub artifact: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_generate() {
        let cli = Cli::try_parse_from(["remap", "generate", "1.19", "1.20"]).unwrap();
        if let Command::Generate(args) = cli.command {
            assert_eq!(args.from, "1.19");
            assert_eq!(args.to, "1.20");
            assert_eq!(args.registry_dir, PathBuf::from("mappings"));
            assert_eq!(args.timestamp, None);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_generate_with_dirs() {
        let cli = Cli::try_parse_from([
            "remap",
            "generate",
            "1.19",
            "1.20",
            "--registry-dir",
            "/data/reg",
            "--output-dir",
            "/data/out",
            "--timestamp",
            "1700000000",
        ])
        .unwrap();
        if let Command::Generate(args) = cli.command {
            assert_eq!(args.registry_dir, PathBuf::from("/data/reg"));
            assert_eq!(args.output_dir, PathBuf::from("/data/out"));
            assert_eq!(args.timestamp, Some(1_700_000_000));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_stubs() {
        let cli = Cli::try_parse_from(["remap", "stubs", "1.19", "1.20"]).unwrap();
        assert!(matches!(cli.command, Command::Stubs(_)));
    }

    #[test]
    fn parse_inspect() {
        let cli = Cli::try_parse_from(["remap", "inspect", "out.rmap"]).unwrap();
        if let Command::Inspect(args) = cli.command {
            assert_eq!(args.artifact, PathBuf::from("out.rmap"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_verify() {
        let cli = Cli::try_parse_from(["remap", "verify", "out.rmap"]).unwrap();
        assert!(matches!(cli.command, Command::Verify(_)));
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["remap", "--format", "json", "inspect", "x.rmap"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["remap", "--verbose", "verify", "x.rmap"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn missing_versions_rejected() {
        assert!(Cli::try_parse_from(["remap", "generate", "1.19"]).is_err());
    }
}
