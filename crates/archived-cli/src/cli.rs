use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "archived",
    about = "Item Archive: a directory-backed store of tagged items and containers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Archive root directory (must end in `.container`). Defaults to the
    /// current directory, or the config file's root for `serve`.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty archive root directory
    Init(InitArgs),
    /// Show an entry's metadata and, for containers, its children
    Read(ReadArgs),
    /// Create an item or container
    Create(CreateArgs),
    /// Move an entry to a new path
    Mv(MoveArgs),
    /// Delete an entry and everything below it
    Rm(DeleteArgs),
    /// Find entries whose id, tags or description match every query term
    Search(SearchArgs),
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub dir: PathBuf,
}

#[derive(Args)]
pub struct ReadArgs {
    /// Slash-separated path of encoded names; empty reads the root.
    pub path: Option<String>,
}

#[derive(Args)]
pub struct CreateArgs {
    pub id: String,
    /// Parent container path; defaults to the root.
    #[arg(short, long)]
    pub parent: Option<String>,
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Image file; the format is taken from its extension.
    #[arg(long)]
    pub image: Option<PathBuf>,
    #[arg(long)]
    pub container: bool,
}

#[derive(Args)]
pub struct MoveArgs {
    pub src: String,
    pub dest: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub path: String,
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(default_value = "")]
    pub query: String,
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["archived", "init", "home.container"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.dir, PathBuf::from("home.container"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_read_root() {
        let cli = Cli::try_parse_from(["archived", "read"]).unwrap();
        if let Command::Read(args) = cli.command {
            assert!(args.path.is_none());
        } else {
            panic!("wrong command");
        }
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.root.is_none());
    }

    #[test]
    fn parse_create_with_tags() {
        let cli = Cli::try_parse_from([
            "archived",
            "create",
            "apple",
            "-t",
            "fruit",
            "--tag",
            "red",
            "--parent",
            "pantry.container",
            "-d",
            "crunchy",
        ])
        .unwrap();
        if let Command::Create(args) = cli.command {
            assert_eq!(args.id, "apple");
            assert_eq!(args.tags, vec!["fruit", "red"]);
            assert_eq!(args.parent.as_deref(), Some("pantry.container"));
            assert_eq!(args.description.as_deref(), Some("crunchy"));
            assert!(!args.container);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_mv() {
        let cli = Cli::try_parse_from(["archived", "mv", "a.item", "b.container/a.item"]).unwrap();
        if let Command::Mv(args) = cli.command {
            assert_eq!(args.src, "a.item");
            assert_eq!(args.dest, "b.container/a.item");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_search_global_flags() {
        let cli = Cli::try_parse_from([
            "archived",
            "search",
            "fruit red",
            "--format",
            "json",
            "--root",
            "/srv/home.container",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.root, Some(PathBuf::from("/srv/home.container")));
        if let Command::Search(args) = cli.command {
            assert_eq!(args.query, "fruit red");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["archived", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("0.0.0.0:8080".parse().unwrap()));
            assert!(args.config.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn rm_requires_path() {
        assert!(Cli::try_parse_from(["archived", "rm"]).is_err());
    }
}
