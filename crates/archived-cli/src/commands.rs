use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;

use archived_protocol::{ReadResponse, SearchResponse};
use archived_server::{ArchiveServer, ServerConfig};
use archived_store::{Archive, ReadResult};
use archived_types::{EntryMetadata, Image, ImageFormat};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let root = cli.root;
    match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::Read(args) => cmd_read(&open(root)?, args, &format),
        Command::Create(args) => cmd_create(&open(root)?, args),
        Command::Mv(args) => cmd_move(&open(root)?, args),
        Command::Rm(args) => cmd_delete(&open(root)?, args),
        Command::Search(args) => cmd_search(&open(root)?, args, &format),
        Command::Serve(args) => cmd_serve(args, root),
    }
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    Ok(cwd.join(path))
}

fn open(root: Option<PathBuf>) -> anyhow::Result<Archive> {
    let root = absolute(&root.unwrap_or_else(|| PathBuf::from(".")))?;
    Archive::open(&root).with_context(|| format!("cannot open archive at {}", root.display()))
}

/// Split a slash-separated CLI path into its encoded-name segments.
fn segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let dir = absolute(&args.dir)?;
    // Validates the root name before anything is created.
    Archive::open(&dir)?;
    std::fs::create_dir_all(&dir).with_context(|| format!("cannot create {}", dir.display()))?;
    println!("{} Initialized archive in {}", "✓".green().bold(), dir.display().to_string().bold());
    Ok(())
}

fn print_metadata(meta: &EntryMetadata, indent: &str) {
    println!("{indent}{} {}", meta.kind.to_string().dimmed(), meta.id.bold());
    if !meta.tags.is_empty() {
        println!("{indent}  Tags: {}", meta.tags.join(", ").cyan());
    }
    if let Some(description) = meta.description.as_deref().filter(|d| !d.is_empty()) {
        println!("{indent}  Description: {description}");
    }
    if let Some(image) = &meta.image {
        println!("{indent}  Image: {} ({} bytes)", image.format.to_string().yellow(), image.data.len());
    }
}

fn print_read(result: &ReadResult) {
    print_metadata(&result.metadata, "");
    let Some(children) = &result.children else {
        return;
    };
    if children.is_empty() {
        println!("  {}", "(empty)".dimmed());
        return;
    }
    for name in &children.containers {
        println!("  {}/", name.blue().bold());
    }
    for name in &children.items {
        println!("  {name}");
    }
}

fn cmd_read(archive: &Archive, args: ReadArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let path = segments(args.path.as_deref().unwrap_or(""));
    let result = archive.read(&path)?;
    match format {
        OutputFormat::Text => print_read(&result),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ReadResponse::from(result))?)
        }
    }
    Ok(())
}

fn load_image(path: &Path) -> anyhow::Result<Image> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let Some(format) = ImageFormat::from_extension(ext) else {
        bail!("unsupported image type: {}", path.display());
    };
    let data = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(Image::new(format, data))
}

fn cmd_create(archive: &Archive, args: CreateArgs) -> anyhow::Result<()> {
    let mut meta = if args.container {
        EntryMetadata::container(args.id)
    } else {
        EntryMetadata::item(args.id)
    }
    .with_tags(args.tags);
    if let Some(description) = args.description {
        meta = meta.with_description(description);
    }
    if let Some(image) = &args.image {
        meta = meta.with_image(load_image(image)?);
    }

    let parent = segments(args.parent.as_deref().unwrap_or(""));
    let created = archive.create(&parent, &meta)?;
    println!("{} Created {}", "✓".green().bold(), created.join("/").bold());
    Ok(())
}

fn cmd_move(archive: &Archive, args: MoveArgs) -> anyhow::Result<()> {
    archive.move_entry(&segments(&args.src), &segments(&args.dest))?;
    println!("{} Moved {} → {}", "✓".green().bold(), args.src.yellow(), args.dest.yellow());
    Ok(())
}

fn cmd_delete(archive: &Archive, args: DeleteArgs) -> anyhow::Result<()> {
    archive.delete(&segments(&args.path))?;
    println!("{} Deleted {}", "✓".green().bold(), args.path.yellow());
    Ok(())
}

fn cmd_search(archive: &Archive, args: SearchArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let hits = archive.search(&args.query);
    match format {
        OutputFormat::Json => {
            let response: SearchResponse = hits.into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text if hits.is_empty() => println!("No matches."),
        OutputFormat::Text => {
            for hit in &hits {
                println!("{}", hit.path.join("/").bold());
                if !hit.metadata.tags.is_empty() {
                    println!("  Tags: {}", hit.metadata.tags.join(", ").cyan());
                }
            }
            println!("{} match(es)", hits.len());
        }
    }
    Ok(())
}

fn cmd_serve(args: ServeArgs, root: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(root) = root {
        config.archive_root = root;
    }
    config.archive_root = absolute(&config.archive_root)?;

    let server = ArchiveServer::new(config)?;
    println!(
        "Archive server on {} (root: {})",
        server.config().bind_addr.to_string().bold(),
        server.archive().root().display()
    );
    let runtime = tokio::runtime::Runtime::new().context("cannot start async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        use clap::Parser;
        Cli::try_parse_from(std::iter::once("archived").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn segments_skip_empty_parts() {
        assert_eq!(segments("a.container//b.item/"), vec!["a.container", "b.item"]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn init_rejects_non_container_name() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("home");
        let dir = dir.to_str().unwrap();
        assert!(run_command(cli(&["init", dir])).is_err());
        assert!(!tmp.path().join("home").exists());
    }

    #[test]
    fn init_create_move_delete() {
        let tmp = tempfile::tempdir().unwrap();
        let root_path = tmp.path().join("home.container");
        let root = root_path.to_str().unwrap();

        run_command(cli(&["init", root])).unwrap();
        assert!(root_path.is_dir());

        run_command(cli(&["create", "box", "--container", "--root", root])).unwrap();
        run_command(cli(&["create", "apple", "-t", "fruit", "-p", "box.container", "--root", root]))
            .unwrap();
        assert!(root_path.join("box.container/apple.fruit.item/description.txt").is_file());

        run_command(cli(&["read", "box.container", "--root", root])).unwrap();
        run_command(cli(&["search", "fruit", "--format", "json", "--root", root])).unwrap();

        run_command(cli(&["mv", "box.container/apple.fruit.item", "apple.fruit.item", "--root", root]))
            .unwrap();
        assert!(root_path.join("apple.fruit.item").is_dir());

        run_command(cli(&["rm", "box.container", "--root", root])).unwrap();
        assert!(!root_path.join("box.container").exists());
        assert!(run_command(cli(&["rm", "box.container", "--root", root])).is_err());
    }

    #[test]
    fn create_with_image_file() {
        let tmp = tempfile::tempdir().unwrap();
        let root_path = tmp.path().join("home.container");
        std::fs::create_dir(&root_path).unwrap();
        let image = tmp.path().join("logo.svg");
        std::fs::write(&image, b"<svg/>").unwrap();

        run_command(cli(&[
            "create",
            "logo",
            "--image",
            image.to_str().unwrap(),
            "--root",
            root_path.to_str().unwrap(),
        ]))
        .unwrap();

        let archive = Archive::open(&root_path).unwrap();
        let meta = archive.read(&["logo.item"]).unwrap().metadata;
        assert_eq!(meta.image, Some(Image::new(ImageFormat::Svg, b"<svg/>".to_vec())));
    }

    #[test]
    fn unsupported_image_extension() {
        assert!(load_image(Path::new("photo.bmp")).is_err());
    }
}
